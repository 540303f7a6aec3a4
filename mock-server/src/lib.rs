//! In-memory stand-in for the FBX4VRM report server.
//!
//! Serves the same endpoints as the real server with just enough behavior
//! to exercise the client: the direct endpoint registers avatars, both
//! submission endpoints reject repeated report ids, and stats reflect what
//! was queued.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{extract::State, routing::get, routing::post, Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const API_VERSION: &str = "1.2.0";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiInfo {
    pub api: String,
    pub version: String,
    pub documentation: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Avatar {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub package_version: String,
    pub avatar_number: u32,
    pub issue_number: String,
    pub github_issue_url: String,
    pub report_count: u32,
    pub last_reported: String,
    pub platforms: Vec<String>,
    pub result_success: Option<bool>,
    pub avatar_uid: String,
    pub source_type: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AvatarList {
    pub success: bool,
    pub avatars: Vec<Avatar>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ReportAccepted {
    pub status: String,
    pub report_id: String,
    pub avatar_id: String,
    pub avatar_name: String,
    pub tracking_url: String,
    pub github_issue_url: String,
    pub is_new_issue: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct QueueReceipt {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    pub pending: u32,
    pub processing: u32,
    pub completed: u32,
    pub failed: u32,
}

/// The subset of a bug report the mock server looks at.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IncomingReport {
    pub report_id: String,
    pub timestamp: String,
    pub platform: String,
    pub source_model: Option<IncomingSourceModel>,
    pub result: Option<IncomingResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IncomingSourceModel {
    pub name: String,
    pub avatar_id: Option<String>,
    pub package_version: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IncomingResult {
    pub success: bool,
}

#[derive(Debug, Default)]
pub struct ServerState {
    avatars: Vec<Avatar>,
    reports: HashMap<String, String>,
    queued: HashSet<String>,
}

pub type Db = Arc<RwLock<ServerState>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(ServerState::default()));
    Router::new()
        .route("/api/v1/fbx4vrm", get(api_info))
        .route("/api/v1/fbx4vrm/avatars", get(list_avatars))
        .route("/api/v1/fbx4vrm/bug-reports", post(submit_bug_report))
        .route("/bug-reports/queue/submit", post(submit_to_queue))
        .route("/bug-reports/queue/stats", get(queue_stats))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn api_info() -> Json<ApiInfo> {
    Json(ApiInfo {
        api: "fbx4vrm".to_string(),
        version: API_VERSION.to_string(),
        documentation: "/docs".to_string(),
    })
}

async fn list_avatars(State(db): State<Db>) -> Json<AvatarList> {
    let state = db.read().await;
    Json(AvatarList {
        success: true,
        avatars: state.avatars.clone(),
    })
}

async fn submit_bug_report(
    State(db): State<Db>,
    Json(report): Json<IncomingReport>,
) -> Json<ReportAccepted> {
    let Some(source) = report.source_model else {
        tracing::info!(report_id = %report.report_id, "Rejected report without source model");
        return Json(ReportAccepted {
            status: "rejected".to_string(),
            report_id: report.report_id,
            ..ReportAccepted::default()
        });
    };

    let mut state = db.write().await;
    if state.reports.contains_key(&report.report_id) {
        tracing::info!(report_id = %report.report_id, "Rejected duplicate bug report");
        return Json(ReportAccepted {
            status: "rejected".to_string(),
            report_id: report.report_id,
            ..ReportAccepted::default()
        });
    }

    let existing = state.avatars.iter().position(|a| match &source.avatar_id {
        Some(id) => &a.id == id,
        None => a.name == source.name,
    });
    let is_new_issue = existing.is_none();
    let index = match existing {
        Some(index) => index,
        None => {
            let number = state.avatars.len() as u32 + 1;
            let id = Uuid::new_v4().simple().to_string();
            state.avatars.push(Avatar {
                id,
                name: source.name.clone(),
                package_version: source.package_version.clone(),
                avatar_number: number,
                issue_number: number.to_string(),
                github_issue_url: format!("https://issues.example/fbx4vrm/{number}"),
                avatar_uid: format!("custom:{}", source.name),
                source_type: "custom".to_string(),
                ..Avatar::default()
            });
            state.avatars.len() - 1
        }
    };

    let avatar = &mut state.avatars[index];
    avatar.report_count += 1;
    avatar.last_reported = if report.timestamp.is_empty() {
        Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
    } else {
        report.timestamp.clone()
    };
    if !report.platform.is_empty() && !avatar.platforms.contains(&report.platform) {
        avatar.platforms.push(report.platform.clone());
    }
    avatar.result_success = report.result.as_ref().map(|r| r.success);

    let response = ReportAccepted {
        status: "accepted".to_string(),
        report_id: report.report_id.clone(),
        avatar_id: avatar.id.clone(),
        avatar_name: avatar.name.clone(),
        tracking_url: format!("/reports/{}", report.report_id),
        github_issue_url: avatar.github_issue_url.clone(),
        is_new_issue,
    };
    let avatar_id = avatar.id.clone();
    state.reports.insert(report.report_id, avatar_id);

    tracing::info!(avatar = %response.avatar_name, is_new_issue, "Accepted bug report");
    Json(response)
}

async fn submit_to_queue(
    State(db): State<Db>,
    Json(report): Json<IncomingReport>,
) -> Json<QueueReceipt> {
    if report.report_id.is_empty() {
        return Json(rejected("report_id is required"));
    }

    let mut state = db.write().await;
    if !state.queued.insert(report.report_id.clone()) {
        tracing::info!(report_id = %report.report_id, "Rejected duplicate queue submission");
        return Json(rejected("duplicate"));
    }

    Json(QueueReceipt {
        status: "queued".to_string(),
        queue_id: Some(Uuid::new_v4().to_string()),
        message: Some("Report queued for processing".to_string()),
    })
}

async fn queue_stats(State(db): State<Db>) -> Json<QueueStats> {
    let state = db.read().await;
    Json(QueueStats {
        pending: state.queued.len() as u32,
        ..QueueStats::default()
    })
}

fn rejected(message: &str) -> QueueReceipt {
    QueueReceipt {
        status: "rejected".to_string(),
        queue_id: None,
        message: Some(message.to_string()),
    }
}
