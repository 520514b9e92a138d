use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct SubmitJobRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitJobResponse {
    pub job_id: Uuid,
    pub message: String,
}

/// POST /api/job
///
/// Stores the job title and description. Both are optional and default to empty.
pub async fn handle_submit_job(
    State(state): State<AppState>,
    Json(request): Json<SubmitJobRequest>,
) -> Json<SubmitJobResponse> {
    let job_id = state.jobs.create(
        request.title.unwrap_or_default(),
        request.description.unwrap_or_default(),
    );
    info!(%job_id, "Job details saved");

    Json(SubmitJobResponse {
        job_id,
        message: "Job details saved successfully".to_string(),
    })
}
