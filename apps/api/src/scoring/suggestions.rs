//! Improvement suggestions keyed to scoring deficiencies.
//!
//! Each `Deficiency` maps to exactly one fixed template. Detection runs in a
//! fixed order so the same evaluation always yields the same list.

use std::collections::BTreeSet;

use crate::models::evaluation::HardMatchBreakdown;
use crate::policy::ScoringPolicy;

/// Missing must-have skills named in a suggestion.
const MAX_NAMED_SKILLS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deficiency {
    MissingSkills(Vec<String>),
    LowSkillAlignment,
    LowExperience,
    LowEducation,
    LowProjectEvidence,
    LowSemanticAlignment,
    LowRelevance,
}

impl Deficiency {
    pub fn suggestion(&self) -> String {
        match self {
            Deficiency::MissingSkills(skills) => {
                format!("Learn these key skills: {}", skills.join(", "))
            }
            Deficiency::LowSkillAlignment => {
                "List the job's required technologies you have used in a dedicated skills section".to_string()
            }
            Deficiency::LowExperience => {
                "Gain practical experience through internships or freelance work".to_string()
            }
            Deficiency::LowEducation => {
                "Pursue a relevant certification to strengthen your educational background".to_string()
            }
            Deficiency::LowProjectEvidence => "Add relevant projects to showcase your skills".to_string(),
            Deficiency::LowSemanticAlignment => {
                "Describe your experience in terms closer to the job's responsibilities".to_string()
            }
            Deficiency::LowRelevance => {
                "Optimize your resume keywords for better ATS compatibility".to_string()
            }
        }
    }
}

/// Deficiencies in presentation order. A sub-score strictly below
/// `policy.suggestion_floor` is a deficiency; the semantic score uses the same
/// floor on its 0–100 scale.
pub fn detect_deficiencies(
    breakdown: &HardMatchBreakdown,
    missing_skills: &BTreeSet<String>,
    semantic_score: Option<f64>,
    relevance_score: f64,
    policy: &ScoringPolicy,
) -> Vec<Deficiency> {
    let floor = policy.suggestion_floor;
    let mut out = Vec::new();

    if !missing_skills.is_empty() {
        let named = missing_skills.iter().take(MAX_NAMED_SKILLS).cloned().collect();
        out.push(Deficiency::MissingSkills(named));
    }
    if breakdown.skill_score < floor {
        out.push(Deficiency::LowSkillAlignment);
    }
    if breakdown.experience_score < floor {
        out.push(Deficiency::LowExperience);
    }
    if breakdown.education_score < floor {
        out.push(Deficiency::LowEducation);
    }
    if breakdown.project_certification_score < floor {
        out.push(Deficiency::LowProjectEvidence);
    }
    if semantic_score.is_some_and(|s| s < floor * 100.0) {
        out.push(Deficiency::LowSemanticAlignment);
    }
    if relevance_score < policy.verdict_thresholds.medium {
        out.push(Deficiency::LowRelevance);
    }

    out
}

pub fn suggestions(
    breakdown: &HardMatchBreakdown,
    missing_skills: &BTreeSet<String>,
    semantic_score: Option<f64>,
    relevance_score: f64,
    policy: &ScoringPolicy,
) -> Vec<String> {
    detect_deficiencies(breakdown, missing_skills, semantic_score, relevance_score, policy)
        .iter()
        .map(Deficiency::suggestion)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breakdown(skill: f64, exp: f64, edu: f64, proj: f64) -> HardMatchBreakdown {
        HardMatchBreakdown {
            skill_score: skill,
            experience_score: exp,
            education_score: edu,
            project_certification_score: proj,
        }
    }

    #[test]
    fn test_strong_profile_gets_no_suggestions() {
        let policy = ScoringPolicy::default();
        let out = suggestions(&breakdown(1.0, 1.0, 1.0, 1.0), &BTreeSet::new(), Some(80.0), 95.0, &policy);
        assert!(out.is_empty());
    }

    #[test]
    fn test_missing_skills_named_up_to_three_in_order() {
        let policy = ScoringPolicy::default();
        let missing: BTreeSet<String> = ["terraform", "aws", "kafka", "docker"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let out = suggestions(&breakdown(0.6, 1.0, 1.0, 1.0), &missing, None, 80.0, &policy);
        assert_eq!(out, vec!["Learn these key skills: aws, docker, kafka".to_string()]);
    }

    #[test]
    fn test_low_education_suggests_certification() {
        let policy = ScoringPolicy::default();
        let found = detect_deficiencies(&breakdown(1.0, 1.0, 0.0, 1.0), &BTreeSet::new(), None, 85.0, &policy);
        assert_eq!(found, vec![Deficiency::LowEducation]);
        assert!(found[0].suggestion().contains("certification"));
    }

    #[test]
    fn test_floor_is_exclusive() {
        let policy = ScoringPolicy::default();
        // lower_degree_credit sits exactly on the floor
        let found = detect_deficiencies(&breakdown(1.0, 1.0, 0.5, 1.0), &BTreeSet::new(), Some(50.0), 90.0, &policy);
        assert!(found.is_empty());
    }

    #[test]
    fn test_fixed_order_for_weak_profile() {
        let policy = ScoringPolicy::default();
        let missing: BTreeSet<String> = ["rust".to_string()].into_iter().collect();
        let found = detect_deficiencies(&breakdown(0.0, 0.0, 0.0, 0.0), &missing, Some(10.0), 4.0, &policy);
        assert_eq!(
            found,
            vec![
                Deficiency::MissingSkills(vec!["rust".to_string()]),
                Deficiency::LowSkillAlignment,
                Deficiency::LowExperience,
                Deficiency::LowEducation,
                Deficiency::LowProjectEvidence,
                Deficiency::LowSemanticAlignment,
                Deficiency::LowRelevance,
            ]
        );
    }

    #[test]
    fn test_absent_semantic_is_not_a_deficiency() {
        let policy = ScoringPolicy::default();
        let found = detect_deficiencies(&breakdown(1.0, 1.0, 1.0, 1.0), &BTreeSet::new(), None, 100.0, &policy);
        assert!(!found.contains(&Deficiency::LowSemanticAlignment));
    }
}
