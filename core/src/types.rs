//! Response DTOs for the FBX4VRM API.
//!
//! # Design
//! Every response type is `#[serde(default)]`: the server omits fields
//! freely and a missing field takes its zero value instead of failing the
//! whole parse. Status and message fields that feed the business-failure
//! path are `Option` so "absent" stays distinguishable from "empty".
//! These types are defined independently of the mock-server crate; the
//! integration tests catch schema drift between the two.

use serde::{Deserialize, Serialize};

use crate::envelope::BusinessStatus;

/// `GET /api/v1/fbx4vrm`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiInfoResponse {
    pub api: String,
    pub version: String,
    pub documentation: String,
}

/// One row of the avatar catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarInfo {
    pub id: String,
    /// Internal name, matching the FBX/VRM file name.
    pub name: String,
    /// Human-facing name; may be empty.
    pub display_name: String,
    /// Version of the avatar package itself, not of the converter.
    pub package_version: String,
    pub booth_url: String,
    pub avatar_number: u32,
    pub version_index: u32,
    /// Issue for this avatar version.
    pub issue_number: String,
    pub github_issue_url: String,
    /// Issue for the avatar as a whole.
    pub parent_issue_number: String,
    pub parent_issue_url: String,
    pub report_count: u32,
    pub last_reported: String,
    pub platforms: Vec<String>,
    /// Outcome of the last conversion test, if any was recorded.
    pub result_success: Option<bool>,
    /// Content-derived identifier, `booth:{id}` or `vrm:{hash}`.
    pub avatar_uid: String,
    pub source_type: String,
    pub author: String,
    pub reference_url: String,
}

impl AvatarInfo {
    /// `display_name` when set, otherwise the internal `name`.
    pub fn display_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}

/// `GET /api/v1/fbx4vrm/avatars`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarListResponse {
    pub success: bool,
    pub avatars: Vec<AvatarInfo>,
}

/// `POST /api/v1/fbx4vrm/bug-reports`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BugReportResponse {
    pub status: Option<String>,
    pub report_id: String,
    pub avatar_id: String,
    pub avatar_name: String,
    pub tracking_url: String,
    pub github_issue_url: String,
    pub is_new_issue: bool,
}

pub const STATUS_ACCEPTED: &str = "accepted";
pub const STATUS_QUEUED: &str = "queued";

impl BugReportResponse {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(STATUS_ACCEPTED)
    }
}

impl BusinessStatus for BugReportResponse {
    fn is_success(&self) -> bool {
        BugReportResponse::is_success(self)
    }

    // The direct endpoint carries no message field; its status is reported.
    fn rejection_message(&self) -> Option<&str> {
        self.status.as_deref()
    }
}

/// `POST /bug-reports/queue/submit`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueSubmitResponse {
    pub status: Option<String>,
    pub queue_id: String,
    pub message: Option<String>,
}

impl QueueSubmitResponse {
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(STATUS_QUEUED)
    }
}

impl BusinessStatus for QueueSubmitResponse {
    fn is_success(&self) -> bool {
        QueueSubmitResponse::is_success(self)
    }

    fn rejection_message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// `GET /bug-reports/queue/stats`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueStatsResponse {
    pub pending: u32,
    pub processing: u32,
    pub completed: u32,
    pub failed: u32,
}
