//! Vocabulary matching — curated skill terms and degree aliases compiled into
//! boundary-aware, case-insensitive patterns.
//!
//! A term matches only when it is not glued to other word characters, so `java`
//! does not fire inside `javascript` while `c++` and `node.js` still match.

use regex::Regex;
use tracing::warn;

use crate::policy::ScoringPolicy;

/// A vocabulary term located in a piece of folded text. Offsets are byte offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermHit {
    pub term: String,
    pub start: usize,
    pub end: usize,
}

/// Compiles a term into a pattern whose capture group 1 spans the term itself.
pub fn term_pattern(term: &str) -> Option<Regex> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return None;
    }
    let pattern = format!(r"(?:^|[^\w+#])({})(?:$|[^\w+#])", regex::escape(&term));
    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("Skipping vocabulary term '{term}': {e}");
            None
        }
    }
}

/// Whether `term` occurs in `folded_text` as a standalone word or phrase.
pub fn contains_term(folded_text: &str, term: &str) -> bool {
    term_pattern(term)
        .map(|re| re.is_match(folded_text))
        .unwrap_or(false)
}

fn find_all(re: &Regex, folded_text: &str) -> Vec<(usize, usize)> {
    // Boundary characters are consumed by each match, so scan from each hit's
    // term end to pick up back-to-back occurrences.
    let mut hits = Vec::new();
    let mut offset = 0;
    while offset <= folded_text.len() {
        let Some(caps) = re.captures_at(folded_text, offset) else {
            break;
        };
        let Some(m) = caps.get(1) else {
            break;
        };
        hits.push((m.start(), m.end()));
        offset = m.end();
    }
    hits
}

/// The curated skill vocabulary from the scoring policy.
#[derive(Debug, Clone)]
pub struct SkillVocabulary {
    terms: Vec<(String, Regex)>,
}

impl SkillVocabulary {
    pub fn from_policy(policy: &ScoringPolicy) -> Self {
        Self::new(&policy.skill_vocabulary)
    }

    pub fn new(terms: &[String]) -> Self {
        let mut seen = std::collections::HashSet::new();
        let terms = terms
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| seen.insert(t.clone()))
            .filter_map(|t| term_pattern(&t).map(|re| (t, re)))
            .collect();
        Self { terms }
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Every occurrence of every vocabulary term in `folded_text`, ordered by position.
    pub fn find(&self, folded_text: &str) -> Vec<TermHit> {
        let mut hits: Vec<TermHit> = self
            .terms
            .iter()
            .flat_map(|(term, re)| {
                find_all(re, folded_text)
                    .into_iter()
                    .map(move |(start, end)| TermHit {
                        term: term.clone(),
                        start,
                        end,
                    })
            })
            .collect();
        hits.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.term.cmp(&b.term)));
        hits
    }

    /// Distinct vocabulary terms present in `folded_text`.
    pub fn terms_in(&self, folded_text: &str) -> Vec<String> {
        self.terms
            .iter()
            .filter(|(_, re)| re.is_match(folded_text))
            .map(|(term, _)| term.clone())
            .collect()
    }
}

/// Degree aliases grouped by the canonical level they identify.
#[derive(Debug, Clone)]
pub struct DegreeMatcher {
    levels: Vec<(String, u8, Vec<Regex>)>,
}

impl DegreeMatcher {
    pub fn from_policy(policy: &ScoringPolicy) -> Self {
        let levels = policy
            .degree_levels
            .iter()
            .map(|level| {
                let aliases: Vec<Regex> =
                    level.aliases.iter().filter_map(|a| term_pattern(a)).collect();
                (level.name.clone(), level.rank, aliases)
            })
            .collect();
        Self { levels }
    }

    /// Highest-ranked degree level mentioned in `folded_text`.
    pub fn detect(&self, folded_text: &str) -> Option<&str> {
        self.levels
            .iter()
            .filter(|(_, _, aliases)| aliases.iter().any(|re| re.is_match(folded_text)))
            .max_by_key(|(_, rank, _)| *rank)
            .map(|(name, _, _)| name.as_str())
    }

    /// Every degree level mentioned in `folded_text`.
    pub fn detect_all(&self, folded_text: &str) -> Vec<&str> {
        self.levels
            .iter()
            .filter(|(_, _, aliases)| aliases.iter().any(|re| re.is_match(folded_text)))
            .map(|(name, _, _)| name.as_str())
            .collect()
    }
}
