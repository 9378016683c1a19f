//! Axum route handlers for the Evaluation API.
//!
//! Stateless: every request carries its own documents as plain text and gets
//! the parsed records back alongside the evaluation. Nothing is persisted.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::evaluation::BatchEvaluation;
use crate::extraction::JobContext;
use crate::models::evaluation::Evaluation;
use crate::models::job::JobRequirement;
use crate::models::resume::ParsedResume;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ParseResumeRequest {
    pub resume_text: String,
}

#[derive(Debug, Deserialize)]
pub struct ParseJobRequest {
    pub job_text: String,
    #[serde(flatten)]
    pub context: JobContext,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub resume_text: String,
    pub job_text: String,
    #[serde(flatten)]
    pub context: JobContext,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub resume: ParsedResume,
    pub job: JobRequirement,
    pub evaluation: Evaluation,
}

#[derive(Debug, Deserialize)]
pub struct BatchEvaluateRequest {
    pub job_text: String,
    #[serde(flatten)]
    pub context: JobContext,
    pub resumes: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchEvaluateResponse {
    pub job: JobRequirement,
    #[serde(flatten)]
    pub batch: BatchEvaluation,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/parse
///
/// Extracts structured fields from resume text. Empty text yields a record
/// with every field absent.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    Json(request): Json<ParseResumeRequest>,
) -> Result<Json<ParsedResume>, AppError> {
    Ok(Json(state.engine.parse_resume(&request.resume_text)))
}

/// POST /api/v1/jobs/parse
pub async fn handle_parse_job(
    State(state): State<AppState>,
    Json(request): Json<ParseJobRequest>,
) -> Result<Json<JobRequirement>, AppError> {
    Ok(Json(state.engine.parse_job(&request.job_text, request.context)))
}

/// POST /api/v1/evaluations
///
/// Parses both documents and scores the pair.
pub async fn handle_evaluate(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    let resume = state.engine.parse_resume(&request.resume_text);
    let job = state.engine.parse_job(&request.job_text, request.context);
    let evaluation = state.engine.evaluate(&resume, &job).await;

    Ok(Json(EvaluateResponse {
        resume,
        job,
        evaluation,
    }))
}

/// POST /api/v1/evaluations/batch
///
/// Scores one job against many resumes; results are ranked best first.
pub async fn handle_evaluate_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchEvaluateRequest>,
) -> Result<Json<BatchEvaluateResponse>, AppError> {
    let max = state.config.max_batch_size;
    if request.resumes.len() > max {
        return Err(AppError::Validation(format!(
            "batch of {} resumes exceeds the limit of {max}",
            request.resumes.len()
        )));
    }

    let job = Arc::new(state.engine.parse_job(&request.job_text, request.context));
    let resumes = request
        .resumes
        .iter()
        .map(|text| state.engine.parse_resume(text))
        .collect();

    let batch = state
        .engine
        .evaluate_batch(Arc::clone(&job), resumes)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("evaluation task failed: {e}")))?;

    Ok(Json(BatchEvaluateResponse {
        job: Arc::unwrap_or_clone(job),
        batch,
    }))
}
