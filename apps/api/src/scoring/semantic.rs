//! Semantic Scorer — optional embedding-based similarity of the full texts.
//!
//! Two implementations behind one trait, chosen once at startup:
//! `EmbeddingScorer` (real backend) and `AbsentScorer` (no backend configured).
//! Neither ever fails the evaluation: any backend problem becomes `None`,
//! which the aggregator treats as "signal absent", never as a zero score.
//!
//! `AppState` carries the chosen scorer as `Arc<dyn SemanticScorer>` inside the
//! evaluation engine.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::embedding_client::{EmbeddingBackend, EmbeddingError};

/// One retry after the first attempt, then degrade to absent.
const MAX_RETRIES: u32 = 1;
const RETRY_DELAY: Duration = Duration::from_millis(500);

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait SemanticScorer: Send + Sync {
    /// Similarity of the two texts on a 0–100 scale, or `None` when unavailable.
    async fn score(&self, resume_text: &str, job_text: &str) -> Option<f64>;

    /// Backend label for logs.
    fn backend(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// AbsentScorer — no backend configured
// ────────────────────────────────────────────────────────────────────────────

pub struct AbsentScorer;

#[async_trait]
impl SemanticScorer for AbsentScorer {
    async fn score(&self, _resume_text: &str, _job_text: &str) -> Option<f64> {
        None
    }

    fn backend(&self) -> &'static str {
        "absent"
    }
}

// ────────────────────────────────────────────────────────────────────────────
// EmbeddingScorer — cosine similarity of two embeddings
// ────────────────────────────────────────────────────────────────────────────

pub struct EmbeddingScorer {
    backend: Arc<dyn EmbeddingBackend>,
    attempt_timeout: Duration,
}

impl EmbeddingScorer {
    pub fn new(backend: Arc<dyn EmbeddingBackend>, attempt_timeout: Duration) -> Self {
        Self {
            backend,
            attempt_timeout,
        }
    }

    async fn embed_pair(&self, resume_text: &str, job_text: &str) -> Result<(Vec<f32>, Vec<f32>), EmbeddingError> {
        tokio::try_join!(self.backend.embed(resume_text), self.backend.embed(job_text))
    }
}

#[async_trait]
impl SemanticScorer for EmbeddingScorer {
    async fn score(&self, resume_text: &str, job_text: &str) -> Option<f64> {
        if resume_text.trim().is_empty() || job_text.trim().is_empty() {
            debug!("Empty text, skipping semantic scoring");
            return None;
        }

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                tokio::time::sleep(RETRY_DELAY).await;
            }

            match tokio::time::timeout(self.attempt_timeout, self.embed_pair(resume_text, job_text)).await {
                Ok(Ok((resume_vec, job_vec))) => {
                    return match cosine_similarity(&resume_vec, &job_vec) {
                        Ok(cosine) => Some(cosine.max(0.0) * 100.0),
                        Err(e) => {
                            // Not transient, so no retry.
                            warn!(error = %e, "Unusable embeddings, semantic score absent");
                            None
                        }
                    };
                }
                Ok(Err(e)) => {
                    warn!(attempt = attempt + 1, error = %e, "Embedding call failed");
                }
                Err(_) => {
                    warn!(
                        attempt = attempt + 1,
                        timeout_ms = self.attempt_timeout.as_millis() as u64,
                        "Embedding call timed out"
                    );
                }
            }
        }

        warn!("Embedding backend unavailable, semantic score absent");
        None
    }

    fn backend(&self) -> &'static str {
        "embedding"
    }
}

/// Cosine similarity in [-1, 1]. Empty, mismatched, zero or non-finite
/// vectors are errors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, EmbeddingError> {
    if a.is_empty() || b.is_empty() {
        return Err(EmbeddingError::EmptyEmbedding);
    }
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0_f64, 0.0_f64, 0.0_f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(EmbeddingError::ZeroVector);
    }

    let cosine = dot / (norm_a.sqrt() * norm_b.sqrt());
    if !cosine.is_finite() {
        return Err(EmbeddingError::NonFinite);
    }
    Ok(cosine.clamp(-1.0, 1.0))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
