//! Callback-style wrappers over the result-returning operations.
//!
//! Each `*_then` method awaits the matching operation and calls exactly one
//! of `on_success` / `on_error`, exactly once. Business-level rejections
//! (queue status other than `queued`, direct status other than `accepted`)
//! take the error path just like transport and parse failures.

use crate::client::Fbx4vrmClient;
use crate::error::ApiError;
use crate::report::BugReportRequest;
use crate::transport::Transport;
use crate::types::{
    ApiInfoResponse, AvatarListResponse, BugReportResponse, QueueStatsResponse,
    QueueSubmitResponse,
};

/// Route a result to the matching callback, passing errors as their
/// caller-facing message.
pub fn dispatch<D>(
    result: Result<D, ApiError>,
    on_success: impl FnOnce(D),
    on_error: impl FnOnce(String),
) {
    match result {
        Ok(data) => on_success(data),
        Err(err) => on_error(err.to_string()),
    }
}

impl<T: Transport> Fbx4vrmClient<T> {
    pub async fn get_api_info_then(
        &self,
        on_success: impl FnOnce(ApiInfoResponse),
        on_error: impl FnOnce(String),
    ) {
        dispatch(self.get_api_info().await.into_result(), on_success, on_error);
    }

    pub async fn get_avatar_list_then(
        &self,
        on_success: impl FnOnce(AvatarListResponse),
        on_error: impl FnOnce(String),
    ) {
        dispatch(self.get_avatar_list().await.into_result(), on_success, on_error);
    }

    pub async fn submit_to_queue_then(
        &self,
        request: BugReportRequest,
        on_success: impl FnOnce(QueueSubmitResponse),
        on_error: impl FnOnce(String),
    ) {
        dispatch(
            self.submit_to_queue(request).await.into_accepted(),
            on_success,
            on_error,
        );
    }

    pub async fn get_queue_stats_then(
        &self,
        on_success: impl FnOnce(QueueStatsResponse),
        on_error: impl FnOnce(String),
    ) {
        dispatch(self.get_queue_stats().await.into_result(), on_success, on_error);
    }

    pub async fn submit_bug_report_then(
        &self,
        request: BugReportRequest,
        on_success: impl FnOnce(BugReportResponse),
        on_error: impl FnOnce(String),
    ) {
        dispatch(
            self.submit_bug_report(request).await.into_accepted(),
            on_success,
            on_error,
        );
    }

    /// Callback form of [`test_connection`](Fbx4vrmClient::test_connection).
    pub async fn test_connection_then(&self, callback: impl FnOnce(bool, String)) {
        let (connected, message) = self.test_connection().await;
        callback(connected, message);
    }
}
