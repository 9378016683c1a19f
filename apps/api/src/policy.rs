//! Scoring policy — every tunable weight, threshold and vocabulary used by the
//! extractors and scorers, consolidated into one immutable value.
//!
//! Loaded once at startup (defaults, optionally overridden by a JSON file) and
//! validated before any evaluation runs. An invalid policy is fatal.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Failed to read policy file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse policy file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{name} must be within [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{name} weights must sum to 1.0, got {sum}")]
    WeightSum { name: &'static str, sum: f64 },

    #[error("must_have_weight ({must}) must be greater than good_to_have_weight ({good}) and both positive")]
    SkillWeightOrder { must: f64, good: f64 },

    #[error("high verdict threshold ({high}) must be greater than medium threshold ({medium})")]
    ThresholdOrder { high: f64, medium: f64 },

    #[error("fuzzy_threshold must be greater than 0")]
    ZeroFuzzyThreshold,

    #[error("skill vocabulary is empty")]
    EmptyVocabulary,

    #[error("degree level '{0}' is declared more than once or shares its rank with another level")]
    DuplicateDegreeLevel(String),
}

/// Relative weights of the four hard-match sub-scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubScoreWeights {
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
    pub projects: f64,
}

impl Default for SubScoreWeights {
    fn default() -> Self {
        Self {
            skills: 0.50,
            experience: 0.20,
            education: 0.15,
            projects: 0.15,
        }
    }
}

impl SubScoreWeights {
    fn sum(&self) -> f64 {
        self.skills + self.experience + self.education + self.projects
    }
}

/// Verdict tier boundaries on the 0–100 relevance scale. Lower bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerdictThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for VerdictThresholds {
    fn default() -> Self {
        Self {
            high: 75.0,
            medium: 50.0,
        }
    }
}

/// One rung of the education ladder. Higher rank = more advanced degree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegreeLevel {
    pub name: String,
    pub rank: u8,
    /// Lower-cased spellings that identify this level in free text. The name
    /// itself is only a label; bare words like `master` need degree context
    /// (`master's`, `master of`) so job titles such as `Scrum Master` don't count.
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    /// Minimum similarity for a requirement skill to count as matched.
    pub fuzzy_threshold: f64,
    pub must_have_weight: f64,
    pub good_to_have_weight: f64,
    pub sub_score_weights: SubScoreWeights,
    pub hard_weight: f64,
    pub semantic_weight: f64,
    pub verdict_thresholds: VerdictThresholds,
    /// Education credit when the candidate holds a degree below the required level.
    pub lower_degree_credit: f64,
    /// Sub-scores below this value trigger their suggestion template.
    pub suggestion_floor: f64,
    pub skill_vocabulary: Vec<String>,
    pub degree_levels: Vec<DegreeLevel>,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.8,
            must_have_weight: 2.0,
            good_to_have_weight: 1.0,
            sub_score_weights: SubScoreWeights::default(),
            hard_weight: 0.6,
            semantic_weight: 0.4,
            verdict_thresholds: VerdictThresholds::default(),
            lower_degree_credit: 0.5,
            suggestion_floor: 0.5,
            skill_vocabulary: DEFAULT_SKILL_VOCABULARY
                .iter()
                .map(|s| s.to_string())
                .collect(),
            degree_levels: default_degree_levels(),
        }
    }
}

impl ScoringPolicy {
    /// Reads a JSON policy file. Fields missing from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, PolicyError> {
        let raw = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut policy: ScoringPolicy = serde_json::from_str(&raw)?;
        policy.normalize_vocabulary();
        Ok(policy)
    }

    /// Checks every invariant the scorers rely on.
    pub fn validate(&self) -> Result<(), PolicyError> {
        check_range("fuzzy_threshold", self.fuzzy_threshold, 0.0, 1.0)?;
        if self.fuzzy_threshold == 0.0 {
            return Err(PolicyError::ZeroFuzzyThreshold);
        }
        check_range("lower_degree_credit", self.lower_degree_credit, 0.0, 1.0)?;
        check_range("suggestion_floor", self.suggestion_floor, 0.0, 1.0)?;

        if !(self.good_to_have_weight > 0.0 && self.must_have_weight > self.good_to_have_weight) {
            return Err(PolicyError::SkillWeightOrder {
                must: self.must_have_weight,
                good: self.good_to_have_weight,
            });
        }

        let w = &self.sub_score_weights;
        for (name, value) in [
            ("sub_score_weights.skills", w.skills),
            ("sub_score_weights.experience", w.experience),
            ("sub_score_weights.education", w.education),
            ("sub_score_weights.projects", w.projects),
            ("hard_weight", self.hard_weight),
            ("semantic_weight", self.semantic_weight),
        ] {
            check_range(name, value, 0.0, 1.0)?;
        }
        check_sum("sub_score", w.sum())?;
        check_sum("hard/semantic", self.hard_weight + self.semantic_weight)?;

        let t = &self.verdict_thresholds;
        check_range("verdict_thresholds.high", t.high, 0.0, 100.0)?;
        check_range("verdict_thresholds.medium", t.medium, 0.0, 100.0)?;
        if t.high <= t.medium {
            return Err(PolicyError::ThresholdOrder {
                high: t.high,
                medium: t.medium,
            });
        }

        if self.skill_vocabulary.iter().all(|s| s.trim().is_empty()) {
            return Err(PolicyError::EmptyVocabulary);
        }

        let mut names = HashSet::new();
        let mut ranks = HashSet::new();
        for level in &self.degree_levels {
            if !names.insert(level.name.to_lowercase()) || !ranks.insert(level.rank) {
                return Err(PolicyError::DuplicateDegreeLevel(level.name.clone()));
            }
        }

        Ok(())
    }

    /// Looks up a degree level by canonical name (case-insensitive).
    pub fn degree_level(&self, name: &str) -> Option<&DegreeLevel> {
        self.degree_levels
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
    }

    pub fn degree_rank(&self, name: &str) -> Option<u8> {
        self.degree_level(name).map(|l| l.rank)
    }

    fn normalize_vocabulary(&mut self) {
        let mut seen = HashSet::new();
        self.skill_vocabulary = self
            .skill_vocabulary
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect();
        for level in &mut self.degree_levels {
            for alias in &mut level.aliases {
                *alias = alias.trim().to_lowercase();
            }
        }
    }
}

fn check_range(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), PolicyError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(PolicyError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

fn check_sum(name: &'static str, sum: f64) -> Result<(), PolicyError> {
    if (sum - 1.0).abs() <= WEIGHT_SUM_TOLERANCE {
        Ok(())
    } else {
        Err(PolicyError::WeightSum { name, sum })
    }
}

const DEFAULT_SKILL_VOCABULARY: &[&str] = &[
    "python",
    "java",
    "javascript",
    "typescript",
    "rust",
    "golang",
    "c++",
    "c#",
    "ruby",
    "php",
    "scala",
    "kotlin",
    "swift",
    "react",
    "angular",
    "vue",
    "node.js",
    "django",
    "flask",
    "fastapi",
    "spring",
    "spring boot",
    "docker",
    "kubernetes",
    "terraform",
    "aws",
    "azure",
    "gcp",
    "git",
    "jenkins",
    "ci/cd",
    "linux",
    "machine learning",
    "deep learning",
    "nlp",
    "computer vision",
    "data science",
    "data analysis",
    "sql",
    "nosql",
    "mongodb",
    "postgresql",
    "mysql",
    "redis",
    "kafka",
    "spark",
    "hadoop",
    "html",
    "css",
    "tensorflow",
    "pytorch",
    "pandas",
    "numpy",
    "scikit-learn",
    "rest api",
    "graphql",
    "microservices",
    "devops",
    "agile",
    "scrum",
    "analytics",
    "tableau",
    "power bi",
    "excel",
    "communication",
    "leadership",
];

fn default_degree_levels() -> Vec<DegreeLevel> {
    let level = |name: &str, rank: u8, aliases: &[&str]| DegreeLevel {
        name: name.to_string(),
        rank,
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
    };
    vec![
        level("Diploma", 1, &["diploma", "associate degree", "associate's"]),
        level(
            "Bachelor",
            2,
            &[
                "bachelor's", "bachelor’s", "bachelor of", "bachelor in", "bachelor degree",
                "bachelors degree", "bachelors in", "bachelors of", "b.tech", "btech", "b.e",
                "b.sc", "bsc", "b.s", "b.a", "bca", "undergraduate",
            ],
        ),
        level(
            "Master",
            3,
            &[
                "master's", "master’s", "master of", "master in", "master degree",
                "masters degree", "masters in", "masters of", "m.tech", "mtech", "m.e", "m.sc",
                "msc", "m.s", "mba", "mca", "postgraduate",
            ],
        ),
        level("Doctorate", 4, &["phd", "ph.d", "doctorate", "doctoral"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_policy_is_valid() {
        ScoringPolicy::default().validate().unwrap();
    }

    #[test]
    fn test_sub_score_weights_must_sum_to_one() {
        let policy = ScoringPolicy {
            sub_score_weights: SubScoreWeights {
                skills: 0.6,
                ..SubScoreWeights::default()
            },
            ..ScoringPolicy::default()
        };
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::WeightSum { name: "sub_score", .. })
        ));
    }

    #[test]
    fn test_hard_semantic_weights_must_sum_to_one() {
        let policy = ScoringPolicy {
            hard_weight: 0.7,
            ..ScoringPolicy::default()
        };
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::WeightSum { .. })
        ));
    }

    #[test]
    fn test_must_have_weight_must_exceed_good_to_have() {
        let policy = ScoringPolicy {
            must_have_weight: 1.0,
            good_to_have_weight: 1.0,
            ..ScoringPolicy::default()
        };
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::SkillWeightOrder { .. })
        ));
    }

    #[test]
    fn test_threshold_order_enforced() {
        let policy = ScoringPolicy {
            verdict_thresholds: VerdictThresholds {
                high: 50.0,
                medium: 60.0,
            },
            ..ScoringPolicy::default()
        };
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::ThresholdOrder { .. })
        ));
    }

    #[test]
    fn test_fuzzy_threshold_out_of_range() {
        let policy = ScoringPolicy {
            fuzzy_threshold: 1.5,
            ..ScoringPolicy::default()
        };
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::OutOfRange {
                name: "fuzzy_threshold",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_fuzzy_threshold_rejected() {
        let policy = ScoringPolicy {
            fuzzy_threshold: 0.0,
            ..ScoringPolicy::default()
        };
        assert!(matches!(policy.validate(), Err(PolicyError::ZeroFuzzyThreshold)));
    }

    #[test]
    fn test_duplicate_degree_rank_rejected() {
        let mut policy = ScoringPolicy::default();
        policy.degree_levels.push(DegreeLevel {
            name: "Certificate".to_string(),
            rank: 1,
            aliases: vec!["certificate".to_string()],
        });
        assert!(matches!(
            policy.validate(),
            Err(PolicyError::DuplicateDegreeLevel(_))
        ));
    }

    #[test]
    fn test_degree_rank_lookup_is_case_insensitive() {
        let policy = ScoringPolicy::default();
        assert_eq!(policy.degree_rank("master"), Some(3));
        assert_eq!(policy.degree_rank("DOCTORATE"), Some(4));
        assert_eq!(policy.degree_rank("Apprenticeship"), None);
    }

    #[test]
    fn test_from_file_overrides_subset_and_normalizes_vocabulary() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"fuzzy_threshold": 0.9, "skill_vocabulary": ["Rust", " rust ", "Kafka"]}}"#
        )
        .unwrap();

        let policy = ScoringPolicy::from_file(file.path()).unwrap();
        assert!((policy.fuzzy_threshold - 0.9).abs() < f64::EPSILON);
        assert_eq!(policy.skill_vocabulary, vec!["rust", "kafka"]);
        // untouched fields keep their defaults
        assert!((policy.hard_weight - 0.6).abs() < f64::EPSILON);
        policy.validate().unwrap();
    }

    #[test]
    fn test_from_file_missing_path_is_io_error() {
        let err = ScoringPolicy::from_file(Path::new("/nonexistent/policy.json")).unwrap_err();
        assert!(matches!(err, PolicyError::Io { .. }));
    }

    #[test]
    fn test_from_file_malformed_json_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = ScoringPolicy::from_file(file.path()).unwrap_err();
        assert!(matches!(err, PolicyError::Parse(_)));
    }
}
