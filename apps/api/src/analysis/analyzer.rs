//! Analysis client: resume text and job in, normalized `AnalysisResult` out.
//!
//! Upstream trouble never becomes an HTTP error: transport failures, bad
//! status codes, unparseable or unrecognized replies and a crashed generation
//! task all come back as a degraded result (score 0, `error` set) so the
//! caller can render it like any other verdict. A missing API key is the one
//! failure returned as `Err`.

use std::sync::Arc;

use tracing::{error, warn};

use crate::analysis::prompts::build_analysis_prompt;
use crate::errors::AppError;
use crate::llm_client::fences::parse_json_lenient;
use crate::llm_client::{GeneratedText, LlmError, TextGenerator};
use crate::models::analysis::AnalysisResult;

const TRANSPORT_SUMMARY: &str = "Failed to analyze resume due to an API connection error.";
const PARSE_SUMMARY: &str = "Failed to analyze resume due to a response parsing error.";
const GENERIC_SUMMARY: &str = "Failed to analyze resume due to an error.";

pub async fn analyze(
    generator: &Arc<dyn TextGenerator>,
    resume_text: &str,
    job_title: &str,
    job_description: &str,
) -> Result<AnalysisResult, AppError> {
    let prompt = build_analysis_prompt(resume_text, job_title, job_description);

    // Run the call on its own task so a panicking backend degrades the result
    // instead of tearing down the request.
    let generator = Arc::clone(generator);
    let outcome = tokio::spawn(async move { generator.generate(&prompt).await }).await;

    let generated = match outcome {
        Ok(Ok(generated)) => generated,
        Ok(Err(LlmError::MissingApiKey)) => {
            return Err(AppError::Config(LlmError::MissingApiKey.to_string()));
        }
        Ok(Err(e @ (LlmError::Http(_) | LlmError::Api { .. }))) => {
            warn!("Generation API request failed: {e}");
            return Ok(AnalysisResult::degraded(
                format!("API request failed: {e}"),
                TRANSPORT_SUMMARY,
            ));
        }
        Ok(Err(LlmError::Parse(e))) => {
            warn!("Generation API returned a non-JSON body: {e}");
            return Ok(parse_failure(&e));
        }
        Err(join_err) => {
            error!("Generation task failed: {join_err}");
            return Ok(AnalysisResult::degraded(
                join_err.to_string(),
                GENERIC_SUMMARY,
            ));
        }
    };

    if let GeneratedText::Unrecognized(raw) = &generated {
        warn!("Unrecognized generation response shape: {raw}");
        return Ok(AnalysisResult::degraded(
            format!("Failed to parse response as JSON: unrecognized response shape: {raw}"),
            PARSE_SUMMARY,
        ));
    }

    match parse_json_lenient::<AnalysisResult>(generated.text()) {
        Ok(result) => Ok(result),
        Err(e) => {
            warn!(
                "Failed to parse analysis JSON: {e}; response text: {}",
                generated.text()
            );
            Ok(parse_failure(&e))
        }
    }
}

fn parse_failure(e: &serde_json::Error) -> AnalysisResult {
    AnalysisResult::degraded(
        format!("Failed to parse response as JSON: {e}"),
        PARSE_SUMMARY,
    )
}
