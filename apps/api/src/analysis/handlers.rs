//! Axum route handler for resume analysis.

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    Json,
};
use tracing::{debug, error};

use crate::analysis::analyzer::analyze;
use crate::errors::AppError;
use crate::extraction::extract_text;
use crate::models::analysis::AnalysisResult;
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";
const JOB_ID_FIELD: &str = "job_id";

#[derive(Debug, Default)]
struct AnalyzeForm {
    resume: Option<ResumeUpload>,
    job_id: Option<String>,
}

#[derive(Debug)]
struct ResumeUpload {
    file_name: String,
    bytes: Bytes,
}

/// POST /api/analyze
///
/// Multipart form: file field `resume`, text field `job_id`.
/// Extracts the resume text, looks up the job, and returns the model's verdict.
/// Upstream model failures still return 200 with a degraded result.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    debug!("Received analyze request");

    let form = read_analyze_form(&mut multipart).await?;

    let Some(resume) = form.resume else {
        error!("No resume file in request");
        return Err(AppError::Validation("No resume file provided".to_string()));
    };

    let Some(job) = form
        .job_id
        .as_deref()
        .and_then(|id| state.jobs.get_by_token(id))
    else {
        error!("Invalid job ID: {:?}", form.job_id);
        return Err(AppError::Validation("Invalid job ID".to_string()));
    };

    debug!("Processing file: {}", resume.file_name);
    let resume_text = extract_text(&resume.file_name, resume.bytes).await?;

    debug!(job_id = %job.id, "Calling Gemini for analysis");
    let result = analyze(&state.generator, &resume_text, &job.title, &job.description).await?;

    debug!(
        score = result.score,
        degraded = result.is_degraded(),
        "Analysis completed"
    );
    Ok(Json(result))
}

async fn read_analyze_form(multipart: &mut Multipart) -> Result<AnalyzeForm, AppError> {
    let mut form = AnalyzeForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                // A part without a filename is a plain form value, not an upload.
                let Some(file_name) = field.file_name().map(str::to_owned) else {
                    debug!("Ignoring non-file resume field");
                    continue;
                };
                let bytes = field.bytes().await?;
                form.resume = Some(ResumeUpload { file_name, bytes });
            }
            Some(JOB_ID_FIELD) => {
                form.job_id = Some(field.text().await?);
            }
            _ => {}
        }
    }

    Ok(form)
}
