//! Success/failure wrapper returned by every client operation.
//!
//! # Design
//! `ApiResponse<T>` stores a `Result<T, ApiError>` next to the diagnostic
//! fields (status code, raw body), so "ok with data" and "failed with error"
//! are the only states it can be in. Business-level status checks live in
//! [`ApiResponse::into_accepted`], driven by the [`BusinessStatus`] trait.

use serde::de::DeserializeOwned;

use crate::error::{ApiError, TransportError};
use crate::http::HttpResponse;

/// Fallback message when neither the envelope nor the server explains a
/// failure.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Response DTOs whose body carries a domain status distinct from HTTP
/// success.
pub trait BusinessStatus {
    /// Whether the server accepted the request.
    fn is_success(&self) -> bool;

    /// Server-provided text to surface when `is_success` is false.
    fn rejection_message(&self) -> Option<&str>;
}

/// Outcome of one request: parsed data or an error, plus the raw status
/// code and body for diagnostics.
#[derive(Debug, Clone)]
pub struct ApiResponse<T> {
    result: Result<T, ApiError>,
    status_code: u16,
    raw_body: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T, status_code: u16, raw_body: String) -> Self {
        Self {
            result: Ok(data),
            status_code,
            raw_body: Some(raw_body),
        }
    }

    pub fn failure(error: ApiError, status_code: u16, raw_body: Option<String>) -> Self {
        Self {
            result: Err(error),
            status_code,
            raw_body,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    pub fn data(&self) -> Option<&T> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&ApiError> {
        self.result.as_ref().err()
    }

    /// The caller-facing error text, `None` on success.
    pub fn error_message(&self) -> Option<String> {
        self.error().map(ToString::to_string)
    }

    /// HTTP status code, or 0 when no response was received.
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn raw_body(&self) -> Option<&str> {
        self.raw_body.as_deref()
    }

    pub fn into_result(self) -> Result<T, ApiError> {
        self.result
    }
}

impl<T: BusinessStatus> ApiResponse<T> {
    /// Unwrap the envelope and require business-level success.
    ///
    /// Failure message precedence: the envelope's own error, then the
    /// server's rejection text, then [`UNKNOWN_ERROR`].
    pub fn into_accepted(self) -> Result<T, ApiError> {
        let data = self.result?;
        if data.is_success() {
            return Ok(data);
        }
        let message = data.rejection_message().unwrap_or(UNKNOWN_ERROR).to_string();
        Err(ApiError::Rejected(message))
    }
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Classify a transport result and parse its body as `T`.
    pub fn from_transport(outcome: Result<HttpResponse, TransportError>) -> Self {
        let response = match outcome {
            Ok(response) => response,
            Err(err) => {
                let error = ApiError::from(err);
                tracing::error!(error = %error, "Request failed");
                return Self::failure(error, 0, None);
            }
        };

        if !response.is_success() {
            let error = ApiError::Http {
                status: response.status,
                detail: reason_phrase(response.status).to_string(),
            };
            tracing::error!(status = response.status, error = %error, "Request failed");
            return Self::failure(error, response.status, Some(response.body));
        }

        match serde_json::from_str::<T>(&response.body) {
            Ok(data) => Self::success(data, response.status, response.body),
            Err(e) => {
                tracing::error!(
                    status = response.status,
                    error = %e,
                    "Failed to parse response JSON"
                );
                Self::failure(
                    ApiError::Deserialization(e.to_string()),
                    response.status,
                    Some(response.body),
                )
            }
        }
    }
}

fn reason_phrase(status: u16) -> &'static str {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown status")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ApiInfoResponse, QueueSubmitResponse};

    fn response(status: u16, body: &str) -> Result<HttpResponse, TransportError> {
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        })
    }

    #[test]
    fn parses_successful_body() {
        let env: ApiResponse<ApiInfoResponse> = ApiResponse::from_transport(response(
            200,
            r#"{"api":"fbx4vrm","version":"1.2.0","documentation":"https://x"}"#,
        ));
        assert!(env.is_ok());
        assert_eq!(env.status_code(), 200);
        assert_eq!(env.data().unwrap().version, "1.2.0");
        assert!(env.error().is_none());
    }

    #[test]
    fn unparsable_body_keeps_raw_text() {
        let env: ApiResponse<ApiInfoResponse> =
            ApiResponse::from_transport(response(200, "<html>"));
        assert!(!env.is_ok());
        assert_eq!(env.error_message().as_deref(), Some("Failed to parse response JSON"));
        assert_eq!(env.raw_body(), Some("<html>"));
        assert_eq!(env.status_code(), 200);
    }

    #[test]
    fn empty_body_is_a_parse_failure() {
        let env: ApiResponse<ApiInfoResponse> = ApiResponse::from_transport(response(200, ""));
        assert!(matches!(env.error(), Some(ApiError::Deserialization(_))));
    }

    #[test]
    fn non_success_status_is_http_error() {
        let env: ApiResponse<QueueSubmitResponse> = ApiResponse::from_transport(response(503, ""));
        assert!(!env.is_ok());
        assert_eq!(env.status_code(), 503);
        let message = env.error_message().unwrap();
        assert!(message.starts_with("HTTP error 503"), "{message}");
        assert_eq!(message, "HTTP error 503: Service Unavailable");
    }

    #[test]
    fn transport_failure_is_connection_error() {
        let env: ApiResponse<ApiInfoResponse> =
            ApiResponse::from_transport(Err(TransportError::new("connection refused")));
        assert_eq!(env.status_code(), 0);
        assert!(env.raw_body().is_none());
        assert_eq!(
            env.error_message().as_deref(),
            Some("Connection error: connection refused")
        );
    }

    #[test]
    fn accepted_requires_business_success() {
        let env: ApiResponse<QueueSubmitResponse> =
            ApiResponse::from_transport(response(200, r#"{"status":"queued","queue_id":"q-1"}"#));
        let data = env.into_accepted().unwrap();
        assert_eq!(data.queue_id, "q-1");
    }

    #[test]
    fn rejection_surfaces_server_message() {
        let env: ApiResponse<QueueSubmitResponse> = ApiResponse::from_transport(response(
            200,
            r#"{"status":"rejected","message":"duplicate"}"#,
        ));
        assert!(env.is_ok());
        let err = env.into_accepted().unwrap_err();
        assert_eq!(err.to_string(), "duplicate");
    }

    #[test]
    fn rejection_without_message_is_unknown_error() {
        let env: ApiResponse<QueueSubmitResponse> =
            ApiResponse::from_transport(response(200, r#"{"status":"paused"}"#));
        assert_eq!(env.into_accepted().unwrap_err().to_string(), UNKNOWN_ERROR);
    }

    #[test]
    fn envelope_error_wins_over_business_status() {
        let env: ApiResponse<QueueSubmitResponse> = ApiResponse::from_transport(response(
            500,
            r#"{"status":"rejected","message":"ignored"}"#,
        ));
        let err = env.into_accepted().unwrap_err();
        assert!(matches!(err, ApiError::Http { status: 500, .. }));
    }
}
