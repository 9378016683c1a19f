//! Hard-Match Scorer — lexical/structured fit on a 0–100 scale.
//!
//! Four independent sub-scores in [0, 1], combined with
//! `policy.sub_score_weights`:
//!   skills (skill matcher overlap), experience (linear ramp to the required
//!   years), education (ordinal degree comparison), projects/certifications
//!   (share of must-have skills evidenced in project and certification text).

use std::collections::BTreeSet;

use crate::extraction::vocabulary::contains_term;
use crate::models::evaluation::HardMatchBreakdown;
use crate::models::job::{ExperienceRequirement, JobRequirement};
use crate::models::resume::{EducationEntry, ParsedResume};
use crate::policy::ScoringPolicy;

use super::skill_matcher::{match_skills, SkillMatchResult};

#[derive(Debug, Clone, PartialEq)]
pub struct HardMatch {
    pub skills: SkillMatchResult,
    pub breakdown: HardMatchBreakdown,
    /// 0–100.
    pub score: f64,
}

pub fn score_hard_match(resume: &ParsedResume, job: &JobRequirement, policy: &ScoringPolicy) -> HardMatch {
    let skills = match_skills(
        &resume.skills,
        &job.must_have_skills,
        &job.good_to_have_skills,
        policy,
    );

    let breakdown = HardMatchBreakdown {
        skill_score: skills.score,
        experience_score: experience_score(resume.experience_years, job.experience_required),
        education_score: education_score(&resume.education, &job.education, policy),
        project_certification_score: project_certification_score(resume, &job.must_have_skills),
    };

    HardMatch {
        skills,
        score: weighted_total(&breakdown, policy),
        breakdown,
    }
}

/// 100 × weighted sum of the breakdown, clamped to [0, 100].
pub fn weighted_total(breakdown: &HardMatchBreakdown, policy: &ScoringPolicy) -> f64 {
    let w = &policy.sub_score_weights;
    let sum = breakdown.skill_score * w.skills
        + breakdown.experience_score * w.experience
        + breakdown.education_score * w.education
        + breakdown.project_certification_score * w.projects;
    (sum * 100.0).clamp(0.0, 100.0)
}

pub fn experience_score(candidate_years: Option<f64>, required: ExperienceRequirement) -> f64 {
    let required_years = match required {
        ExperienceRequirement::Unspecified => return 1.0,
        ExperienceRequirement::Years(y) if y <= 0.0 => return 1.0,
        ExperienceRequirement::Years(y) => y,
    };
    match candidate_years {
        Some(years) if years > 0.0 => (years / required_years).min(1.0),
        _ => 0.0,
    }
}

/// 1.0 when the candidate holds a degree at or above the lowest acceptable
/// level, `policy.lower_degree_credit` for any lower recognised degree, else 0.
/// Requirements naming no level known to the policy count as no requirement.
pub fn education_score(
    education: &[EducationEntry],
    required: &BTreeSet<String>,
    policy: &ScoringPolicy,
) -> f64 {
    let Some(min_required) = required.iter().filter_map(|name| policy.degree_rank(name)).min() else {
        return 1.0;
    };

    let best_held = education
        .iter()
        .filter_map(|entry| entry.level.as_deref())
        .filter_map(|level| policy.degree_rank(level))
        .max();

    match best_held {
        Some(rank) if rank >= min_required => 1.0,
        Some(_) => policy.lower_degree_credit,
        None => 0.0,
    }
}

pub fn project_certification_score(resume: &ParsedResume, must_have: &BTreeSet<String>) -> f64 {
    if must_have.is_empty() {
        return 1.0;
    }

    let evidence = resume
        .projects
        .iter()
        .chain(resume.certifications.iter())
        .map(|s| s.to_lowercase())
        .collect::<Vec<_>>()
        .join("\n");
    if evidence.is_empty() {
        return 0.0;
    }

    let found = must_have
        .iter()
        .filter(|skill| contains_term(&evidence, skill))
        .count();
    (found as f64 / must_have.len() as f64).min(1.0)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
