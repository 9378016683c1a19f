//! Evaluation engine — parse, score and rank.
//!
//! `EvaluationEngine` owns the validated policy, the compiled extractor and the
//! semantic scorer chosen at startup. It holds no mutable state, so one
//! instance is shared (behind an `Arc`) by every request and batch worker.

pub mod handlers;

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info};

use crate::extraction::{Extractor, JobContext};
use crate::models::evaluation::{Evaluation, EvaluationSummary};
use crate::models::job::JobRequirement;
use crate::models::resume::ParsedResume;
use crate::policy::ScoringPolicy;
use crate::scoring::aggregator::{aggregate, summarize};
use crate::scoring::hard_match::{score_hard_match, HardMatch};
use crate::scoring::semantic::SemanticScorer;

/// Evaluations of one job against many resumes, best first.
#[derive(Debug, Clone, Serialize)]
pub struct BatchEvaluation {
    pub evaluations: Vec<Evaluation>,
    pub summary: EvaluationSummary,
}

pub struct EvaluationEngine {
    policy: Arc<ScoringPolicy>,
    extractor: Extractor,
    semantic: Arc<dyn SemanticScorer>,
}

impl EvaluationEngine {
    /// `policy` must already be validated.
    pub fn new(policy: ScoringPolicy, semantic: Arc<dyn SemanticScorer>) -> Self {
        let extractor = Extractor::new(&policy);
        Self {
            policy: Arc::new(policy),
            extractor,
            semantic,
        }
    }

    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn semantic_backend(&self) -> &'static str {
        self.semantic.backend()
    }

    pub fn parse_resume(&self, text: &str) -> ParsedResume {
        self.extractor.parse_resume(text)
    }

    pub fn parse_job(&self, text: &str, context: JobContext) -> JobRequirement {
        self.extractor.parse_job(text, context)
    }

    pub fn score_hard(&self, resume: &ParsedResume, job: &JobRequirement) -> HardMatch {
        score_hard_match(resume, job, &self.policy)
    }

    /// Scores one pair. Never fails: a missing semantic signal only changes how
    /// the relevance score is blended.
    pub async fn evaluate(&self, resume: &ParsedResume, job: &JobRequirement) -> Evaluation {
        let hard = self.score_hard(resume, job);
        debug!(
            resume_id = %resume.id,
            job_id = %job.id,
            hard_match_score = hard.score,
            breakdown = ?hard.breakdown,
            "Hard match computed"
        );

        let semantic = self
            .semantic
            .score(&resume.raw_text, &job.raw_description)
            .await;

        let evaluation = aggregate(resume, job, hard, semantic, &self.policy);
        info!(
            resume_id = %evaluation.resume_id,
            job_id = %evaluation.job_id,
            relevance = evaluation.relevance_score,
            semantic = ?evaluation.semantic_match_score,
            verdict = evaluation.verdict.as_str(),
            "Evaluation complete"
        );
        evaluation
    }

    /// Evaluates every resume against `job` concurrently and ranks the results
    /// by relevance (descending), then resume id.
    pub async fn evaluate_batch(
        self: &Arc<Self>,
        job: Arc<JobRequirement>,
        resumes: Vec<ParsedResume>,
    ) -> Result<BatchEvaluation, JoinError> {
        let mut tasks = JoinSet::new();
        for resume in resumes {
            let engine = Arc::clone(self);
            let job = Arc::clone(&job);
            tasks.spawn(async move { engine.evaluate(&resume, &job).await });
        }

        let mut evaluations = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            evaluations.push(joined?);
        }

        rank(&mut evaluations);
        let summary = summarize(&evaluations);
        info!(
            job_id = %job.id,
            total = summary.total,
            high = summary.high,
            medium = summary.medium,
            low = summary.low,
            "Batch evaluation complete"
        );

        Ok(BatchEvaluation {
            evaluations,
            summary,
        })
    }
}

/// Highest relevance first; equal scores ordered by resume id.
pub fn rank(evaluations: &mut [Evaluation]) {
    evaluations.sort_by(rank_order);
}

fn rank_order(a: &Evaluation, b: &Evaluation) -> Ordering {
    b.relevance_score
        .total_cmp(&a.relevance_score)
        .then_with(|| a.resume_id.cmp(&b.resume_id))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
