//! Entity / requirement extraction.
//!
//! `Extractor` compiles the policy vocabulary and degree ladder once and is then
//! shared (read-only) by every parse. Parsing never fails: missing information
//! shows up as absent fields.

pub mod contact;
pub mod jd_parser;
pub mod normalizer;
pub mod resume_parser;
pub mod sections;
pub mod vocabulary;

use chrono::{Datelike, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::models::job::JobRequirement;
use crate::models::resume::ParsedResume;
use crate::policy::ScoringPolicy;
use vocabulary::{DegreeMatcher, SkillVocabulary};

/// Caller-supplied job metadata that is not reliably present in the text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobContext {
    pub company: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Extractor {
    vocabulary: SkillVocabulary,
    degrees: DegreeMatcher,
    /// Year that open-ended ("present") experience spans run until.
    reference_year: u16,
}

impl Extractor {
    pub fn new(policy: &ScoringPolicy) -> Self {
        let current_year = u16::try_from(Utc::now().year()).unwrap_or(u16::MAX);
        Self {
            vocabulary: SkillVocabulary::from_policy(policy),
            degrees: DegreeMatcher::from_policy(policy),
            reference_year: current_year,
        }
    }

    pub fn with_reference_year(mut self, year: u16) -> Self {
        self.reference_year = year;
        self
    }

    pub fn vocabulary(&self) -> &SkillVocabulary {
        &self.vocabulary
    }

    pub fn degrees(&self) -> &DegreeMatcher {
        &self.degrees
    }

    pub fn reference_year(&self) -> u16 {
        self.reference_year
    }

    pub fn parse_resume(&self, text: &str) -> ParsedResume {
        let resume = resume_parser::parse_resume(self, text);
        debug!(
            resume_id = %resume.id,
            skills = resume.skills.len(),
            experience = resume.experience.len(),
            education = resume.education.len(),
            "Parsed resume"
        );
        resume
    }

    pub fn parse_job(&self, text: &str, context: JobContext) -> JobRequirement {
        let job = jd_parser::parse_job(self, text, context);
        debug!(
            job_id = %job.id,
            must_have = job.must_have_skills.len(),
            good_to_have = job.good_to_have_skills.len(),
            "Parsed job description"
        );
        job
    }
}
