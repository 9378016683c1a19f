use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    High,
    Medium,
    Low,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::High => "HIGH",
            Verdict::Medium => "MEDIUM",
            Verdict::Low => "LOW",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Fuzzy,
    None,
}

/// How a single requirement skill was (or was not) satisfied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatchDetail {
    pub requirement: String,
    pub must_have: bool,
    /// Best-matching candidate skill, if any candidate skills exist.
    pub candidate: Option<String>,
    pub similarity: f64,
    pub kind: MatchKind,
}

/// The four hard-match sub-scores, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HardMatchBreakdown {
    pub skill_score: f64,
    pub experience_score: f64,
    pub education_score: f64,
    pub project_certification_score: f64,
}

/// Result of scoring one (resume, job) pair. Immutable; a re-run produces a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub resume_id: Uuid,
    pub job_id: Uuid,
    pub hard_match_score: f64,
    /// `None` when no semantic backend produced a score.
    pub semantic_match_score: Option<f64>,
    pub relevance_score: f64,
    pub verdict: Verdict,
    /// Matched must-have skills.
    pub matched_skills: BTreeSet<String>,
    /// Must-have skills with no match on the resume.
    pub missing_skills: BTreeSet<String>,
    pub matched_good_to_have_skills: BTreeSet<String>,
    pub skill_details: Vec<SkillMatchDetail>,
    pub breakdown: HardMatchBreakdown,
    pub feedback: String,
    pub suggestions: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Verdict distribution across a batch of evaluations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub total: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub mean_relevance: Option<f64>,
}
