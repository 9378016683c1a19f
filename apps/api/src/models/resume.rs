use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A year range detected on an experience line. `end_year = None` means "present".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSpan {
    pub start_year: u16,
    pub end_year: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub role: Option<String>,
    pub company: Option<String>,
    pub duration: Option<YearSpan>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    /// Degree text as written on the resume.
    pub degree: Option<String>,
    /// Canonical degree level name from the policy ladder, if recognised.
    pub level: Option<String>,
    pub institution: Option<String>,
    pub year: Option<u16>,
}

/// Structured view of a resume. Produced once per upload, never mutated.
///
/// Skills are lower-cased and deduplicated (`BTreeSet` keeps them ordered for
/// deterministic output). Every scalar field that may be missing is an `Option`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub skills: BTreeSet<String>,
    pub experience: Vec<ExperienceEntry>,
    /// Best estimate of total professional experience in years.
    pub experience_years: Option<f64>,
    pub education: Vec<EducationEntry>,
    pub projects: Vec<String>,
    pub certifications: BTreeSet<String>,
    pub raw_text: String,
}

impl ParsedResume {
    /// A record with every field absent. Used for empty input.
    pub fn empty(raw_text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: None,
            email: None,
            phone: None,
            skills: BTreeSet::new(),
            experience: Vec::new(),
            experience_years: None,
            education: Vec::new(),
            projects: Vec::new(),
            certifications: BTreeSet::new(),
            raw_text: raw_text.into(),
        }
    }
}
