use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum experience asked for by a job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "years", rename_all = "snake_case")]
pub enum ExperienceRequirement {
    #[default]
    Unspecified,
    Years(f64),
}

/// Structured view of a job description. Produced once per upload, never mutated.
///
/// `must_have_skills` and `good_to_have_skills` are disjoint; a skill cued both
/// ways is kept as must-have.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequirement {
    pub id: Uuid,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub must_have_skills: BTreeSet<String>,
    pub good_to_have_skills: BTreeSet<String>,
    pub experience_required: ExperienceRequirement,
    /// Acceptable degree level names (canonical policy names).
    pub education: BTreeSet<String>,
    pub raw_description: String,
}

impl JobRequirement {
    pub fn empty(raw_description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: None,
            company: None,
            location: None,
            must_have_skills: BTreeSet::new(),
            good_to_have_skills: BTreeSet::new(),
            experience_required: ExperienceRequirement::Unspecified,
            education: BTreeSet::new(),
            raw_description: raw_description.into(),
        }
    }
}
