//! Skill Matcher — best-candidate similarity per requirement skill.
//!
//! Every requirement is judged independently against the whole candidate set
//! (one candidate may satisfy several requirements). Exact equality scores 1.0;
//! otherwise the normalized Levenshtein ratio is used. A requirement counts as
//! matched when its best similarity reaches `policy.fuzzy_threshold`.

use std::collections::BTreeSet;

use crate::models::evaluation::{MatchKind, SkillMatchDetail};
use crate::policy::ScoringPolicy;

/// Outcome of matching a candidate skill set against a job's skill requirements.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillMatchResult {
    pub matched_must: BTreeSet<String>,
    pub missing_must: BTreeSet<String>,
    pub matched_good: BTreeSet<String>,
    pub missing_good: BTreeSet<String>,
    /// One entry per requirement: must-haves first, each group in sorted order.
    pub details: Vec<SkillMatchDetail>,
    /// Weighted overlap in [0, 1].
    pub score: f64,
}

/// Edit-distance similarity in [0, 1]; 1.0 only for identical strings.
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    strsim::normalized_levenshtein(a, b).clamp(0.0, 1.0)
}

/// Best candidate for `requirement`. Equal similarities resolve to the
/// lexicographically smallest candidate (the set is iterated in order and only a
/// strictly better score replaces the current best).
pub fn best_match<'a>(requirement: &str, candidates: &'a BTreeSet<String>) -> Option<(&'a str, f64)> {
    if let Some(exact) = candidates.get(requirement) {
        return Some((exact.as_str(), 1.0));
    }

    let mut best: Option<(&str, f64)> = None;
    for candidate in candidates {
        let sim = similarity(requirement, candidate);
        match best {
            Some((_, best_sim)) if sim <= best_sim => {}
            _ => best = Some((candidate.as_str(), sim)),
        }
    }
    best
}

pub fn match_skills(
    candidates: &BTreeSet<String>,
    must_have: &BTreeSet<String>,
    good_to_have: &BTreeSet<String>,
    policy: &ScoringPolicy,
) -> SkillMatchResult {
    let mut result = SkillMatchResult {
        matched_must: BTreeSet::new(),
        missing_must: BTreeSet::new(),
        matched_good: BTreeSet::new(),
        missing_good: BTreeSet::new(),
        details: Vec::with_capacity(must_have.len() + good_to_have.len()),
        score: 1.0,
    };

    for (requirements, is_must) in [(must_have, true), (good_to_have, false)] {
        for requirement in requirements {
            let detail = judge(requirement, is_must, candidates, policy.fuzzy_threshold);
            let matched = detail.kind != MatchKind::None;
            let (hit, miss) = if is_must {
                (&mut result.matched_must, &mut result.missing_must)
            } else {
                (&mut result.matched_good, &mut result.missing_good)
            };
            if matched {
                hit.insert(requirement.clone());
            } else {
                miss.insert(requirement.clone());
            }
            result.details.push(detail);
        }
    }

    let total = must_have.len() as f64 * policy.must_have_weight
        + good_to_have.len() as f64 * policy.good_to_have_weight;
    if total > 0.0 {
        let earned = result.matched_must.len() as f64 * policy.must_have_weight
            + result.matched_good.len() as f64 * policy.good_to_have_weight;
        result.score = (earned / total).clamp(0.0, 1.0);
    }

    result
}

fn judge(
    requirement: &str,
    must_have: bool,
    candidates: &BTreeSet<String>,
    threshold: f64,
) -> SkillMatchDetail {
    let (candidate, similarity) = match best_match(requirement, candidates) {
        Some((c, s)) => (Some(c.to_string()), s),
        None => (None, 0.0),
    };

    let kind = if candidate.is_none() {
        MatchKind::None
    } else if similarity >= 1.0 {
        MatchKind::Exact
    } else if similarity >= threshold {
        MatchKind::Fuzzy
    } else {
        MatchKind::None
    };

    SkillMatchDetail {
        requirement: requirement.to_string(),
        must_have,
        candidate,
        similarity,
        kind,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
