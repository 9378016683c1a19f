//! JD Parser — extracts skill requirements, experience threshold and education
//! levels from a raw job description.
//!
//! Skills are split into must-have and good-to-have by cue phrases. Within a
//! clause, each skill takes the tier of the nearest cue; a clause without cues
//! inherits the tier of the enclosing `Header:` line; anything else is must-have.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extraction::normalizer::{normalize, NormalizedText};
use crate::extraction::resume_parser::clean_skill_item;
use crate::extraction::vocabulary::{term_pattern, TermHit};
use crate::extraction::{Extractor, JobContext};
use crate::models::job::{ExperienceRequirement, JobRequirement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillTier {
    MustHave,
    GoodToHave,
}

const MUST_CUES: &[&str] = &[
    "required",
    "requirement",
    "requirements",
    "must have",
    "must-have",
    "mandatory",
    "essential",
    "minimum qualifications",
];

const GOOD_CUES: &[&str] = &[
    "preferred",
    "nice to have",
    "nice-to-have",
    "good to have",
    "good-to-have",
    "bonus",
    "a plus",
    "desirable",
    "desired",
    "optional",
    "advantageous",
];

/// Must-have cues first so that equal-distance ties resolve to must-have.
static CUES: Lazy<Vec<(Regex, SkillTier)>> = Lazy::new(|| {
    MUST_CUES
        .iter()
        .map(|c| (c, SkillTier::MustHave))
        .chain(GOOD_CUES.iter().map(|c| (c, SkillTier::GoodToHave)))
        .filter_map(|(c, tier)| term_pattern(c).map(|re| (re, tier)))
        .collect()
});

static CLAUSE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.;!?](?:\s|$)").expect("static clause regex"));

static LIST_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;|•·]").expect("static split regex"));

/// Headers that introduce a list of skills rather than prose.
static LIST_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?:required|must[- ]have|mandatory|preferred|desired|bonus|good[- ]to[- ]have|nice[- ]to[- ]have)(?:\s+(?:technical\s+)?(?:skills?|qualifications?|technologies))?|(?:technical\s+|key\s+|core\s+)?skills?|tech stack|technologies)$",
    )
    .expect("static list header regex")
});

static TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:job\s*title|position|role)\s*:\s*(.+)$").expect("static title regex")
});

static COMPANY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:company|organi[sz]ation)\s*:\s*(.+)$").expect("static company regex"));

static LOCATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^location\s*:\s*(.+)$").expect("static location regex"));

/// Years patterns in priority order. Group 1 is the (lower-bound) number of years.
static EXPERIENCE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(\d{1,2}(?:\.\d)?)\s*(?:\+|(?:-|–|to)\s*\d{1,2})?\s*\+?\s*(?:years?|yrs?)\b[^.\n]{0,40}?\bexperience",
        r"experience\s*:?\s*(?:of\s+)?(\d{1,2}(?:\.\d)?)\s*(?:\+|(?:-|–|to)\s*\d{1,2})?\s*\+?\s*(?:years?|yrs?)",
        r"(?:minimum|at least|min\.?)\s+(?:of\s+)?(\d{1,2}(?:\.\d)?)\s*\+?\s*(?:years?|yrs?)",
        r"(\d{1,2}(?:\.\d)?)\s*\+\s*(?:years?|yrs?)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static experience regex"))
    .collect()
});

const ITEM_PREFIXES: &[&str] = &[
    "experience with ",
    "experience in ",
    "knowledge of ",
    "familiarity with ",
    "proficiency in ",
    "proficient in ",
    "strong ",
];

const ITEM_SUFFIXES: &[&str] = &[
    " is a plus",
    " a plus",
    " experience",
    " required",
    " preferred",
    " knowledge",
    " skills",
];

const MAX_HEADER_WORDS: usize = 5;
const MAX_TITLE_CHARS: usize = 80;

pub(crate) fn parse_job(extractor: &Extractor, raw_text: &str, context: JobContext) -> JobRequirement {
    let normalized = normalize(raw_text);
    let mut job = JobRequirement::empty(raw_text);
    job.company = context.company.filter(|c| !c.trim().is_empty());
    job.location = context.location.filter(|l| !l.trim().is_empty());
    if normalized.is_empty() {
        return job;
    }

    job.title = extract_title(&normalized);
    job.company = job.company.or_else(|| first_capture(&COMPANY, &normalized));
    job.location = job.location.or_else(|| first_capture(&LOCATION, &normalized));

    let (must, good) = extract_skill_tiers(extractor, &normalized);
    job.good_to_have_skills = good.difference(&must).cloned().collect();
    job.must_have_skills = must;
    job.experience_required = extract_experience_requirement(&normalized.folded);
    job.education = extractor
        .degrees()
        .detect_all(&normalized.folded)
        .into_iter()
        .map(str::to_string)
        .collect();
    job
}

fn first_capture(re: &Regex, normalized: &NormalizedText) -> Option<String> {
    normalized
        .lines
        .iter()
        .find_map(|line| re.captures(line)?.get(1).map(|m| m.as_str().trim().to_string()))
        .filter(|s| !s.is_empty())
}

fn extract_title(normalized: &NormalizedText) -> Option<String> {
    first_capture(&TITLE, normalized).or_else(|| {
        let first = normalized.lines.first()?;
        (first.chars().count() <= MAX_TITLE_CHARS && line_header(first).is_none())
            .then(|| first.clone())
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Skill tiers
// ────────────────────────────────────────────────────────────────────────────

/// `Header: rest` split of a line, when the part before the colon is short
/// enough to be a label. A short cue-only line (`Nice to have`) is a header too.
fn line_header(line: &str) -> Option<(String, String)> {
    if let Some((head, rest)) = line.split_once(':') {
        let words = head.split_whitespace().count();
        if (1..=MAX_HEADER_WORDS).contains(&words) {
            return Some((head.trim().to_lowercase(), rest.trim().to_string()));
        }
        return None;
    }
    let folded = line.to_lowercase();
    let short = line.split_whitespace().count() <= MAX_HEADER_WORDS;
    (short && cue_tier(&folded).is_some()).then(|| (folded.trim().to_string(), String::new()))
}

fn cue_tier(folded: &str) -> Option<SkillTier> {
    CUES.iter()
        .find(|(re, _)| re.is_match(folded))
        .map(|(_, tier)| *tier)
}

fn cue_hits(folded_clause: &str) -> Vec<(usize, usize, SkillTier)> {
    CUES.iter()
        .flat_map(|(re, tier)| {
            re.captures_iter(folded_clause)
                .filter_map(|c| c.get(1))
                .map(move |m| (m.start(), m.end(), *tier))
        })
        .collect()
}

fn span_gap(a: (usize, usize), b: (usize, usize)) -> usize {
    if a.1 <= b.0 {
        b.0 - a.1
    } else if b.1 <= a.0 {
        a.0 - b.1
    } else {
        0
    }
}

/// Tier of the cue nearest to `span`; must-have wins ties.
fn nearest_cue_tier(span: (usize, usize), cues: &[(usize, usize, SkillTier)]) -> Option<SkillTier> {
    let mut best: Option<(usize, SkillTier)> = None;
    for &(start, end, tier) in cues {
        let gap = span_gap(span, (start, end));
        let closer = match best {
            None => true,
            Some((best_gap, best_tier)) => {
                gap < best_gap
                    || (gap == best_gap
                        && tier == SkillTier::MustHave
                        && best_tier == SkillTier::GoodToHave)
            }
        };
        if closer {
            best = Some((gap, tier));
        }
    }
    best.map(|(_, tier)| tier)
}

/// Drops hits whose span lies inside a longer hit (`spring` inside `spring boot`).
fn outermost_hits(hits: Vec<TermHit>) -> Vec<TermHit> {
    hits.iter()
        .filter(|h| {
            !hits.iter().any(|o| {
                o.start <= h.start && h.end <= o.end && (o.end - o.start) > (h.end - h.start)
            })
        })
        .cloned()
        .collect()
}

fn split_clauses(line: &str) -> Vec<&str> {
    CLAUSE_END
        .split(line)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect()
}

fn extract_skill_tiers(
    extractor: &Extractor,
    normalized: &NormalizedText,
) -> (BTreeSet<String>, BTreeSet<String>) {
    let mut must = BTreeSet::new();
    let mut good = BTreeSet::new();
    let mut push = |skill: String, tier: SkillTier| match tier {
        SkillTier::MustHave => {
            must.insert(skill);
        }
        SkillTier::GoodToHave => {
            good.insert(skill);
        }
    };

    let mut mode: Option<SkillTier> = None;
    let mut list_mode = false;

    for line in &normalized.lines {
        if let Some((head, _)) = line_header(line) {
            mode = cue_tier(&head);
            list_mode = LIST_HEADER.is_match(&head);
        }

        for clause in split_clauses(line) {
            let folded = clause.to_lowercase();
            let cues = cue_hits(&folded);

            for hit in outermost_hits(extractor.vocabulary().find(&folded)) {
                let tier = nearest_cue_tier((hit.start, hit.end), &cues)
                    .or(mode)
                    .unwrap_or(SkillTier::MustHave);
                push(hit.term, tier);
            }

            for (item, tier) in list_items(extractor, clause, mode, list_mode) {
                push(item, tier);
            }
        }
    }

    (must, good)
}

/// Free-form items of a skill list: `Preferred: A, B` clauses, or plain
/// comma-separated clauses while a list header is in effect.
fn list_items(
    extractor: &Extractor,
    clause: &str,
    mode: Option<SkillTier>,
    list_mode: bool,
) -> Vec<(String, SkillTier)> {
    let (body, tier) = match clause.split_once(':') {
        Some((label, body)) => {
            let label = label.trim().to_lowercase();
            if !LIST_HEADER.is_match(&label) {
                return Vec::new();
            }
            (body, cue_tier(&label).or(mode).unwrap_or(SkillTier::MustHave))
        }
        None if list_mode => (clause, mode.unwrap_or(SkillTier::MustHave)),
        None => return Vec::new(),
    };

    LIST_SPLIT
        .split(body)
        .filter_map(|raw| clean_requirement_item(extractor, raw))
        .map(|item| (item, tier))
        .collect()
}

fn clean_requirement_item(extractor: &Extractor, raw: &str) -> Option<String> {
    let mut item = raw.trim().trim_end_matches('.').trim().to_lowercase();
    for prefix in ITEM_PREFIXES {
        if let Some(rest) = item.strip_prefix(prefix) {
            item = rest.to_string();
        }
    }
    loop {
        let Some(rest) = ITEM_SUFFIXES.iter().find_map(|s| item.strip_suffix(s)) else {
            break;
        };
        item = rest.to_string();
    }
    // Degree requirements are captured as education, not skills; a bare cue
    // (`Nice to have` on its own line) is a header, not an item.
    if extractor.degrees().detect(&item).is_some() || cue_tier(&item).is_some() {
        return None;
    }
    clean_skill_item(&item)
}

// ────────────────────────────────────────────────────────────────────────────
// Experience threshold
// ────────────────────────────────────────────────────────────────────────────

/// First matching years pattern wins; a range yields its lower bound.
pub(crate) fn extract_experience_requirement(folded: &str) -> ExperienceRequirement {
    EXPERIENCE_PATTERNS
        .iter()
        .find_map(|re| re.captures(folded)?.get(1)?.as_str().parse::<f64>().ok())
        .map(|years| ExperienceRequirement::Years(years.max(0.0)))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ScoringPolicy;

    const STARTUP_JD: &str = r#"
        Senior Rust Engineer — Core Infrastructure
        We move fast and own everything end-to-end. You will architect distributed systems,
        spearhead performance initiatives, and drive reliability from zero to production.
        Requirements: 5+ years Rust required, systems programming required, distributed systems expertise required.
        Nice to have: Kubernetes, Kafka experience a plus.
        About Us: Fast-paced Series B startup disrupting fintech infrastructure.
    "#;

    const ENTERPRISE_JD: &str = r#"
        Software Engineer — Platform Team
        Join our collaborative team to contribute to our microservices platform.
        You will partner with product managers and support reliability goals.
        Required: Java, Spring Boot, SQL. Preferred: Kubernetes, CI/CD experience.
        About: Global enterprise with 50,000 employees focused on financial services.
    "#;

    const RESEARCH_JD: &str = r#"
        Research Scientist — ML Systems
        Investigate novel approaches to large language model training efficiency.
        Required: PhD in CS/ML, experience with PyTorch.
        About: Research lab at the frontier of AI.
    "#;

    fn extractor() -> Extractor {
        Extractor::new(&ScoringPolicy::default())
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_startup_jd_tiers_and_experience() {
        let job = extractor().parse_job(STARTUP_JD, JobContext::default());
        assert_eq!(
            job.title.as_deref(),
            Some("Senior Rust Engineer — Core Infrastructure")
        );
        assert_eq!(job.must_have_skills, set(&["rust"]));
        assert_eq!(job.good_to_have_skills, set(&["kafka", "kubernetes"]));
        assert_eq!(job.experience_required, ExperienceRequirement::Years(5.0));
        assert!(job.education.is_empty());
    }

    #[test]
    fn test_enterprise_jd_inline_required_and_preferred_lists() {
        let job = extractor().parse_job(ENTERPRISE_JD, JobContext::default());
        assert_eq!(
            job.must_have_skills,
            set(&["java", "microservices", "spring boot", "sql"])
        );
        assert_eq!(job.good_to_have_skills, set(&["ci/cd", "kubernetes"]));
        assert_eq!(job.experience_required, ExperienceRequirement::Unspecified);
    }

    #[test]
    fn test_research_jd_degree_goes_to_education_not_skills() {
        let job = extractor().parse_job(RESEARCH_JD, JobContext::default());
        assert_eq!(job.must_have_skills, set(&["pytorch"]));
        assert_eq!(job.education, set(&["Doctorate"]));
    }

    #[test]
    fn test_must_and_good_are_disjoint() {
        let text = "Python required.\nNice to have: Python, Docker";
        let job = extractor().parse_job(text, JobContext::default());
        assert!(job.must_have_skills.contains("python"));
        assert!(!job.good_to_have_skills.contains("python"));
        assert!(job.good_to_have_skills.contains("docker"));
        assert!(job
            .must_have_skills
            .is_disjoint(&job.good_to_have_skills));
    }

    #[test]
    fn test_nearest_cue_wins_within_clause() {
        let job = extractor().parse_job(
            "Backend role\nPython required, Docker preferred",
            JobContext::default(),
        );
        assert_eq!(job.must_have_skills, set(&["python"]));
        assert_eq!(job.good_to_have_skills, set(&["docker"]));
    }

    #[test]
    fn test_skill_without_cue_defaults_to_must_have() {
        let job = extractor().parse_job(
            "Data Analyst\nYou will build dashboards in Tableau and SQL",
            JobContext::default(),
        );
        assert_eq!(job.must_have_skills, set(&["sql", "tableau"]));
        assert!(job.good_to_have_skills.is_empty());
    }

    #[test]
    fn test_header_tier_carries_to_following_lines() {
        let text = "Platform Engineer\nNice to have\nTerraform\nKafka\nResponsibilities:\nRun Docker fleets";
        let job = extractor().parse_job(text, JobContext::default());
        assert_eq!(job.good_to_have_skills, set(&["kafka", "terraform"]));
        assert_eq!(job.must_have_skills, set(&["docker"]));
    }

    #[test]
    fn test_education_requirement_lists_all_levels() {
        let job = extractor().parse_job(
            "Analyst\nBachelor's or Master's degree in statistics",
            JobContext::default(),
        );
        assert_eq!(job.education, set(&["Bachelor", "Master"]));
    }

    #[test]
    fn test_scrum_master_role_is_not_a_degree_requirement() {
        let job = extractor().parse_job(
            "Agile Coach\nExperience as a Scrum Master required",
            JobContext::default(),
        );
        assert!(job.education.is_empty(), "{:?}", job.education);
    }

    #[test]
    fn test_context_company_and_location_take_precedence() {
        let text = "Position: Data Engineer\nCompany: Initech\nLocation: Remote";
        let job = extractor().parse_job(
            text,
            JobContext {
                company: Some("Globex".to_string()),
                location: None,
            },
        );
        assert_eq!(job.title.as_deref(), Some("Data Engineer"));
        assert_eq!(job.company.as_deref(), Some("Globex"));
        assert_eq!(job.location.as_deref(), Some("Remote"));
    }

    #[test]
    fn test_experience_requirement_forms() {
        assert_eq!(
            extract_experience_requirement("3-5 years of experience in backend"),
            ExperienceRequirement::Years(3.0)
        );
        assert_eq!(
            extract_experience_requirement("experience: 4 years"),
            ExperienceRequirement::Years(4.0)
        );
        assert_eq!(
            extract_experience_requirement("at least 2 years in a similar role"),
            ExperienceRequirement::Years(2.0)
        );
        assert_eq!(
            extract_experience_requirement("7+ yrs golang"),
            ExperienceRequirement::Years(7.0)
        );
        assert_eq!(
            extract_experience_requirement("founded 20 years ago"),
            ExperienceRequirement::Unspecified
        );
    }

    #[test]
    fn test_empty_job_is_fully_absent() {
        let job = extractor().parse_job("  \n ", JobContext::default());
        assert_eq!(job.title, None);
        assert_eq!(job.company, None);
        assert!(job.must_have_skills.is_empty());
        assert!(job.good_to_have_skills.is_empty());
        assert_eq!(job.experience_required, ExperienceRequirement::Unspecified);
        assert!(job.education.is_empty());
    }

    #[test]
    fn test_nearest_cue_tier_tie_prefers_must_have() {
        let cues = vec![(0, 5, SkillTier::GoodToHave), (20, 25, SkillTier::MustHave)];
        assert_eq!(nearest_cue_tier((10, 15), &cues), Some(SkillTier::MustHave));
        assert_eq!(nearest_cue_tier((10, 15), &[]), None);
    }
}
