//! Evaluation Aggregator — final relevance, verdict, feedback and suggestions.

use chrono::Utc;

use crate::models::evaluation::{Evaluation, EvaluationSummary, Verdict};
use crate::models::job::JobRequirement;
use crate::models::resume::ParsedResume;
use crate::policy::{ScoringPolicy, VerdictThresholds};

use super::hard_match::HardMatch;
use super::suggestions::suggestions;

/// Weighted blend of hard and semantic scores. With no semantic score the hard
/// score carries the full weight, so absence never drags the result down.
pub fn relevance_score(hard_match_score: f64, semantic_match_score: Option<f64>, policy: &ScoringPolicy) -> f64 {
    let score = match semantic_match_score {
        Some(semantic) => hard_match_score * policy.hard_weight + semantic * policy.semantic_weight,
        None => hard_match_score,
    };
    score.clamp(0.0, 100.0)
}

/// Step function; each tier includes its lower bound.
pub fn verdict(relevance_score: f64, thresholds: &VerdictThresholds) -> Verdict {
    if relevance_score >= thresholds.high {
        Verdict::High
    } else if relevance_score >= thresholds.medium {
        Verdict::Medium
    } else {
        Verdict::Low
    }
}

/// `Overall relevance score: X% | Matched N skills | Missing M key skills`;
/// the match/miss parts are left out when their count is zero.
pub fn feedback_line(relevance_score: f64, matched: usize, missing: usize) -> String {
    let mut line = format!("Overall relevance score: {:.1}%", relevance_score);
    if matched > 0 {
        line.push_str(&format!(" | Matched {} skills", matched));
    }
    if missing > 0 {
        line.push_str(&format!(" | Missing {} key skills", missing));
    }
    line
}

pub fn aggregate(
    resume: &ParsedResume,
    job: &JobRequirement,
    hard: HardMatch,
    semantic_match_score: Option<f64>,
    policy: &ScoringPolicy,
) -> Evaluation {
    let HardMatch {
        skills,
        breakdown,
        score: hard_match_score,
    } = hard;
    let relevance = relevance_score(hard_match_score, semantic_match_score, policy);
    let verdict = verdict(relevance, &policy.verdict_thresholds);

    let feedback = feedback_line(relevance, skills.matched_must.len(), skills.missing_must.len());
    let suggestions = suggestions(
        &breakdown,
        &skills.missing_must,
        semantic_match_score,
        relevance,
        policy,
    );

    Evaluation {
        resume_id: resume.id,
        job_id: job.id,
        hard_match_score,
        semantic_match_score,
        relevance_score: relevance,
        verdict,
        matched_skills: skills.matched_must,
        missing_skills: skills.missing_must,
        matched_good_to_have_skills: skills.matched_good,
        skill_details: skills.details,
        breakdown,
        feedback,
        suggestions,
        timestamp: Utc::now(),
    }
}

pub fn summarize(evaluations: &[Evaluation]) -> EvaluationSummary {
    let count = |v: Verdict| evaluations.iter().filter(|e| e.verdict == v).count();
    let mean_relevance = if evaluations.is_empty() {
        None
    } else {
        Some(evaluations.iter().map(|e| e.relevance_score).sum::<f64>() / evaluations.len() as f64)
    };

    EvaluationSummary {
        total: evaluations.len(),
        high: count(Verdict::High),
        medium: count(Verdict::Medium),
        low: count(Verdict::Low),
        mean_relevance,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
