//! Domain client for the FBX4VRM report server.
//!
//! # Design
//! `Fbx4vrmClient` holds the base URL, the verbose flag and a [`Transport`].
//! Each operation is split into a pure `build_*` method producing an
//! [`HttpRequest`] and an async method that sends it and wraps the outcome
//! in an [`ApiResponse`]. Every async operation issues exactly one request
//! and never retries; retry policy belongs to the caller.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::envelope::ApiResponse;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::report::BugReportRequest;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{
    ApiInfoResponse, AvatarListResponse, BugReportResponse, QueueStatsResponse,
    QueueSubmitResponse,
};

pub const API_PREFIX: &str = "/api/v1/fbx4vrm";
pub const QUEUE_PREFIX: &str = "/bug-reports/queue";

/// Async client for the FBX4VRM API, generic over its transport.
#[derive(Debug, Clone)]
pub struct Fbx4vrmClient<T = ReqwestTransport> {
    base_url: String,
    verbose_logging: bool,
    transport: T,
}

impl Fbx4vrmClient<ReqwestTransport> {
    /// Build a client with a reqwest transport configured from `config`.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(&config.base_url, transport)
            .with_verbose_logging(config.verbose_logging))
    }
}

impl<T> Fbx4vrmClient<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            verbose_logging: false,
            transport,
        }
    }

    pub fn with_verbose_logging(mut self, verbose: bool) -> Self {
        self.verbose_logging = verbose;
        self
    }

    pub fn server_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: &str) {
        self.base_url = base_url.trim_end_matches('/').to_string();
    }

    pub fn verbose_logging(&self) -> bool {
        self.verbose_logging
    }

    pub fn set_verbose_logging(&mut self, verbose: bool) {
        self.verbose_logging = verbose;
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn build_get_api_info(&self) -> HttpRequest {
        self.get(API_PREFIX)
    }

    pub fn build_get_avatar_list(&self) -> HttpRequest {
        self.get(&format!("{API_PREFIX}/avatars"))
    }

    pub fn build_get_queue_stats(&self) -> HttpRequest {
        self.get(&format!("{QUEUE_PREFIX}/stats"))
    }

    /// Normalizes the report identity, then serializes it for the queue.
    pub fn build_submit_to_queue(
        &self,
        request: &mut BugReportRequest,
    ) -> Result<HttpRequest, ApiError> {
        request.ensure_identity();
        self.post_json(&format!("{QUEUE_PREFIX}/submit"), request)
    }

    /// Normalizes the report identity, then serializes it for the direct
    /// (legacy) endpoint.
    pub fn build_submit_bug_report(
        &self,
        request: &mut BugReportRequest,
    ) -> Result<HttpRequest, ApiError> {
        request.ensure_identity();
        self.post_json(&format!("{API_PREFIX}/bug-reports"), request)
    }

    fn get(&self, endpoint: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{endpoint}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn post_json<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{endpoint}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

impl<T: Transport> Fbx4vrmClient<T> {
    pub async fn get_api_info(&self) -> ApiResponse<ApiInfoResponse> {
        self.send(self.build_get_api_info()).await
    }

    /// Avatars that have received at least one report.
    pub async fn get_avatar_list(&self) -> ApiResponse<AvatarListResponse> {
        self.send(self.build_get_avatar_list()).await
    }

    /// Submit a report for background processing. This is the recommended
    /// path; business success means `status == "queued"`, checked by
    /// [`ApiResponse::into_accepted`].
    pub async fn submit_to_queue(
        &self,
        mut request: BugReportRequest,
    ) -> ApiResponse<QueueSubmitResponse> {
        match self.build_submit_to_queue(&mut request) {
            Ok(http) => self.send(http).await,
            Err(err) => ApiResponse::failure(err, 0, None),
        }
    }

    pub async fn get_queue_stats(&self) -> ApiResponse<QueueStatsResponse> {
        self.send(self.build_get_queue_stats()).await
    }

    /// Submit a report for immediate processing. Prefer
    /// [`submit_to_queue`](Self::submit_to_queue).
    pub async fn submit_bug_report(
        &self,
        mut request: BugReportRequest,
    ) -> ApiResponse<BugReportResponse> {
        match self.build_submit_bug_report(&mut request) {
            Ok(http) => self.send(http).await,
            Err(err) => ApiResponse::failure(err, 0, None),
        }
    }

    /// Probe the server with `get_api_info` and describe the result.
    pub async fn test_connection(&self) -> (bool, String) {
        let response = self.get_api_info().await;
        match response.data() {
            Some(info) => (true, format!("Connected to {} v{}", info.api, info.version)),
            None => (
                false,
                response
                    .error_message()
                    .unwrap_or_else(|| "Connection failed".to_string()),
            ),
        }
    }

    async fn send<R: DeserializeOwned>(&self, request: HttpRequest) -> ApiResponse<R> {
        if self.verbose_logging {
            tracing::debug!(
                method = request.method.as_str(),
                url = %request.path,
                "Sending request"
            );
            if let Some(body) = &request.body {
                tracing::debug!(body = %body, "Request body");
            }
        }

        let outcome = self.transport.execute(request).await;

        if self.verbose_logging {
            if let Ok(response) = &outcome {
                tracing::debug!(
                    status = response.status,
                    body = %response.body,
                    "Response received"
                );
            }
        }

        ApiResponse::from_transport(outcome)
    }
}
