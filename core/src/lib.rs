//! Async client core for the FBX4VRM bug-report server.
//!
//! # Overview
//! Reports avatar-conversion diagnostics and bug reports to the server,
//! fetches the catalog of reported avatars and inspects the report queue.
//!
//! # Design
//! - `Fbx4vrmClient` is caller-owned and configured at construction; there
//!   is no process-wide instance.
//! - Each operation has a pure `build_*` step producing an `HttpRequest`
//!   and an async step that runs it through a `Transport` and returns an
//!   `ApiResponse<T>` envelope.
//! - Callback-style `*_then` wrappers live in [`callback`] and are thin
//!   adapters over the result-returning operations.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod callback;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod report;
pub mod transport;
pub mod types;

pub use client::Fbx4vrmClient;
pub use config::ClientConfig;
pub use envelope::{ApiResponse, BusinessStatus};
pub use error::{ApiError, ConfigError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use report::BugReportRequest;
pub use transport::{ReqwestTransport, Transport};
pub use types::{
    ApiInfoResponse, AvatarInfo, AvatarListResponse, BugReportResponse, QueueStatsResponse,
    QueueSubmitResponse,
};
