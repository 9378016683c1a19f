//! Resume parser — best-effort extraction of a `ParsedResume` from normalized text.
//!
//! Each field is produced by an independent rule. A rule that finds nothing
//! leaves its field absent; nothing here returns an error.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extraction::contact::{extract_email, extract_phone};
use crate::extraction::normalizer::{normalize, NormalizedText};
use crate::extraction::sections::{
    detect_header, has_section, lines_of, segment, Section, SectionKind,
};
use crate::extraction::Extractor;
use crate::models::resume::{EducationEntry, ExperienceEntry, ParsedResume, YearSpan};

/// Year range such as `Jan 2019 - Present` or `2016 – 2019`.
static YEAR_SPAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\(?\s*(?:(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+)?((?:19|20)\d{2})\s*(?:-|–|—|to|until)\s*(?:(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+)?((?:19|20)\d{2}|present|current|now|till date)\s*\)?",
    )
    .expect("static year span regex")
});

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").expect("static year regex"));

/// Explicit claims like `5+ years of experience` or `3.5 yrs professional experience`.
static EXPERIENCE_CLAIM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2}(?:\.\d)?)\s*\+?\s*(?:years?|yrs?)\.?\s+(?:of\s+)?(?:[a-z-]+\s+){0,2}?experience")
        .expect("static experience claim regex")
});

/// `X at Y` / `X @ Y` separator on a title line.
static ROLE_AT_COMPANY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i) (?:at|@) ").expect("static role/company separator regex"));

static SKILL_LIST_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,;|•·]").expect("static split regex"));

const ROLE_WORDS: &[&str] = &[
    "engineer",
    "developer",
    "manager",
    "analyst",
    "intern",
    "scientist",
    "designer",
    "consultant",
    "lead",
    "architect",
    "specialist",
    "administrator",
    "director",
    "officer",
    "associate",
    "coordinator",
    "executive",
    "researcher",
    "assistant",
    "programmer",
    "tester",
];

const INSTITUTION_WORDS: &[&str] = &[
    "university",
    "college",
    "institute",
    "school",
    "academy",
    "polytechnic",
    "iit",
    "nit",
];

const MAX_PROJECT_CHARS: usize = 300;
const MAX_NAME_WORDS: usize = 4;

pub(crate) fn parse_resume(extractor: &Extractor, raw_text: &str) -> ParsedResume {
    let normalized = normalize(raw_text);
    let mut resume = ParsedResume::empty(raw_text);
    if normalized.is_empty() {
        return resume;
    }

    let sections = segment(&normalized.lines);
    let text = normalized.text();

    resume.name = extract_name(&normalized);
    resume.email = extract_email(&text);
    resume.phone = extract_phone(&text);
    resume.skills = extract_skills(extractor, &normalized, &sections);
    resume.experience = extract_experience(&sections);
    resume.experience_years =
        estimate_experience_years(&normalized.folded, &resume.experience, extractor.reference_year());
    resume.education = extract_education(extractor, &normalized, &sections);
    resume.projects = extract_projects(&sections);
    resume.certifications = extract_certifications(&sections);
    resume
}

fn extract_name(normalized: &NormalizedText) -> Option<String> {
    let first = normalized.lines.first()?;
    let words = first.split_whitespace().count();
    let plausible = words <= MAX_NAME_WORDS
        && first.chars().count() > 2
        && !first.chars().any(|c| c.is_ascii_digit() || c == '@' || c == ':')
        && detect_header(first).is_none();
    plausible.then(|| first.clone())
}

// ────────────────────────────────────────────────────────────────────────────
// Skills
// ────────────────────────────────────────────────────────────────────────────

/// Vocabulary hits inside the Skills section (whole document when there is
/// none), plus free-form items listed in the Skills section.
fn extract_skills(
    extractor: &Extractor,
    normalized: &NormalizedText,
    sections: &[Section],
) -> BTreeSet<String> {
    let mut skills = BTreeSet::new();

    if has_section(sections, SectionKind::Skills) {
        let skill_lines = lines_of(sections, SectionKind::Skills);
        let folded = skill_lines.join("\n").to_lowercase();
        skills.extend(extractor.vocabulary().terms_in(&folded));
        for line in skill_lines {
            skills.extend(split_skill_list(line));
        }
    } else {
        skills.extend(extractor.vocabulary().terms_in(&normalized.folded));
    }

    skills
}

/// Splits a delimited skill list into cleaned, lower-cased items.
/// A leading `Category:` label is dropped.
pub(crate) fn split_skill_list(line: &str) -> Vec<String> {
    let body = match line.split_once(':') {
        Some((label, rest)) if label.split_whitespace().count() <= 3 => rest,
        _ => line,
    };
    SKILL_LIST_SPLIT
        .split(body)
        .filter_map(clean_skill_item)
        .collect()
}

pub(crate) fn clean_skill_item(item: &str) -> Option<String> {
    let cleaned = item
        .trim()
        .trim_end_matches(['.', ')'])
        .trim_start_matches('(')
        .trim()
        .to_lowercase();
    let chars = cleaned.chars().count();
    let plausible = (2..=40).contains(&chars)
        && cleaned.split_whitespace().count() <= 4
        && cleaned.chars().any(|c| c.is_alphabetic())
        && !cleaned.chars().any(|c| c.is_ascii_digit());
    plausible.then_some(cleaned)
}

// ────────────────────────────────────────────────────────────────────────────
// Experience
// ────────────────────────────────────────────────────────────────────────────

fn extract_experience(sections: &[Section]) -> Vec<ExperienceEntry> {
    let mut entries: Vec<ExperienceEntry> = Vec::new();

    for line in lines_of(sections, SectionKind::Experience) {
        let span = parse_year_span(line);
        let remainder = match YEAR_SPAN.find(line) {
            Some(m) => format!("{} {}", &line[..m.start()], &line[m.end()..]),
            None => line.to_string(),
        };
        let remainder = trim_separators(&remainder);

        if remainder.is_empty() {
            // A date-only line belongs to the entry above it.
            if let (Some(span), Some(last)) = (span, entries.last_mut()) {
                if last.duration.is_none() {
                    last.duration = Some(span);
                }
            }
            continue;
        }

        if span.is_none() && !looks_like_title_line(&remainder) {
            continue;
        }

        let (role, company) = split_role_company(&remainder);
        entries.push(ExperienceEntry {
            role,
            company,
            duration: span,
        });
    }

    entries
}

pub(crate) fn parse_year_span(line: &str) -> Option<YearSpan> {
    let caps = YEAR_SPAN.captures(line)?;
    let start_year: u16 = caps.get(1)?.as_str().parse().ok()?;
    let end = caps.get(2)?.as_str();
    let end_year = end.parse::<u16>().ok();
    if let Some(end_year) = end_year {
        if end_year < start_year {
            return None;
        }
    }
    Some(YearSpan {
        start_year,
        end_year,
    })
}

fn trim_separators(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| matches!(c, '(' | ')' | '[' | ']' | ',' | '-' | '–' | '—' | '|' | ':' | ' '))
        .to_string()
}

fn looks_like_title_line(text: &str) -> bool {
    let lower = text.to_lowercase();
    let words = text.split_whitespace().count();
    words <= 12
        && (lower.contains(" at ")
            || text.contains(" @ ")
            || text.contains(" | ")
            || ROLE_WORDS.iter().any(|w| lower.split_whitespace().any(|t| t.trim_matches(',') == *w)))
}

fn has_role_word(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|t| ROLE_WORDS.contains(&t))
}

/// Role/company guess for a title line. `X at Y` / `X @ Y` is read as role then
/// company; otherwise the part carrying a role word is the role.
pub(crate) fn split_role_company(text: &str) -> (Option<String>, Option<String>) {
    if let Some(sep) = ROLE_AT_COMPANY.find(text) {
        let role = trim_separators(&text[..sep.start()]);
        let company = trim_separators(&text[sep.end()..]);
        return (non_empty(role), non_empty(company));
    }

    let parts: Vec<String> = text
        .split([',', '|', '–', '—'])
        .flat_map(|p| p.split(" - "))
        .map(trim_separators)
        .filter(|p| !p.is_empty())
        .collect();

    match parts.as_slice() {
        [] => (None, None),
        [only] => {
            if has_role_word(only) {
                (Some(only.clone()), None)
            } else {
                (None, Some(only.clone()))
            }
        }
        [first, second, ..] => {
            if !has_role_word(first) && has_role_word(second) {
                (Some(second.clone()), Some(first.clone()))
            } else {
                (Some(first.clone()), Some(second.clone()))
            }
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

/// Max of any explicit years-of-experience claim and the total length of the
/// merged dated spans. `present` resolves to `reference_year`.
pub(crate) fn estimate_experience_years(
    folded: &str,
    entries: &[ExperienceEntry],
    reference_year: u16,
) -> Option<f64> {
    let claimed = EXPERIENCE_CLAIM
        .captures_iter(folded)
        .filter_map(|c| c.get(1)?.as_str().parse::<f64>().ok())
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));

    let mut spans: Vec<(u16, u16)> = entries
        .iter()
        .filter_map(|e| e.duration)
        .filter(|s| s.start_year <= reference_year)
        .map(|s| (s.start_year, s.end_year.unwrap_or(reference_year).min(reference_year)))
        .filter(|(start, end)| end >= start)
        .collect();
    spans.sort_unstable();

    let mut merged: Vec<(u16, u16)> = Vec::new();
    for (start, end) in spans {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    let spanned = (!merged.is_empty())
        .then(|| merged.iter().map(|(s, e)| f64::from(e - s)).sum::<f64>());

    match (claimed, spanned) {
        (Some(c), Some(s)) => Some(c.max(s)),
        (c, s) => c.or(s),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Education
// ────────────────────────────────────────────────────────────────────────────

fn extract_education(
    extractor: &Extractor,
    normalized: &NormalizedText,
    sections: &[Section],
) -> Vec<EducationEntry> {
    let lines: Vec<&str> = if has_section(sections, SectionKind::Education) {
        lines_of(sections, SectionKind::Education)
    } else {
        // No Education header: fall back to any line naming a degree.
        normalized
            .lines
            .iter()
            .map(String::as_str)
            .filter(|l| extractor.degrees().detect(&l.to_lowercase()).is_some())
            .collect()
    };

    let mut entries: Vec<EducationEntry> = Vec::new();
    for line in lines {
        let folded = line.to_lowercase();
        let level = extractor.degrees().detect(&folded).map(str::to_string);
        let institution = find_institution(line);
        let year = YEAR
            .captures_iter(line)
            .filter_map(|c| c.get(1)?.as_str().parse::<u16>().ok())
            .last();

        match (level.is_some(), institution.is_some()) {
            (true, _) => entries.push(EducationEntry {
                degree: Some(degree_text(line)),
                level,
                institution,
                year,
            }),
            (false, true) => {
                // An institution line right after a degree line completes it.
                if let Some(last) = entries.last_mut().filter(|e| e.institution.is_none()) {
                    last.institution = institution;
                    last.year = last.year.or(year);
                } else {
                    entries.push(EducationEntry {
                        degree: None,
                        level: None,
                        institution,
                        year,
                    });
                }
            }
            (false, false) => {}
        }
    }
    entries
}

fn segments(line: &str) -> impl Iterator<Item = &str> {
    line.split([',', '|', '–', '—', '(', ')'])
        .flat_map(|p| p.split(" - "))
        .map(str::trim)
        .filter(|p| !p.is_empty())
}

fn find_institution(line: &str) -> Option<String> {
    segments(line)
        .find(|seg| {
            let lower = seg.to_lowercase();
            lower
                .split(|c: char| !c.is_alphanumeric())
                .any(|t| INSTITUTION_WORDS.contains(&t))
        })
        .map(|seg| YEAR.replace_all(seg, "").trim().to_string())
        .filter(|s| !s.is_empty())
}

fn degree_text(line: &str) -> String {
    segments(line)
        .next()
        .map(|seg| YEAR.replace_all(seg, "").trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| line.to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Projects & certifications
// ────────────────────────────────────────────────────────────────────────────

fn extract_projects(sections: &[Section]) -> Vec<String> {
    lines_of(sections, SectionKind::Projects)
        .into_iter()
        .map(|line| line.chars().take(MAX_PROJECT_CHARS).collect())
        .collect()
}

/// Lines of a Certifications section, plus `... Certified ...` lines anywhere else.
fn extract_certifications(sections: &[Section]) -> BTreeSet<String> {
    let mut certifications: BTreeSet<String> = lines_of(sections, SectionKind::Certifications)
        .into_iter()
        .map(str::to_string)
        .collect();

    for section in sections.iter().filter(|s| s.kind != SectionKind::Certifications) {
        for line in &section.lines {
            let lower = line.to_lowercase();
            if lower.contains("certified") || lower.contains("certification") {
                certifications.insert(line.clone());
            }
        }
    }
    certifications
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ScoringPolicy;

    const RESUME: &str = r#"
        Jane Doe
        jane.doe@example.com | +1 (555) 123-4567

        Summary
        Backend engineer with 6+ years of experience building data platforms.

        Skills
        Languages: Python, Rust, SQL
        Tools: Docker; Kubernetes | Airflow

        Experience
        Senior Engineer at Acme Corp (2019 - Present)
        • Built ingestion pipelines in Python handling 2M events/day
        Beta Analytics — Data Engineer
        Jan 2016 – Dec 2019

        Education
        B.Tech in Computer Science, IIT Delhi, 2015
        M.S. Computer Science
        Stanford University 2017

        Projects
        Open-source Kafka connector written in Rust with Docker packaging

        Certifications
        AWS Certified Solutions Architect
    "#;

    fn extractor() -> Extractor {
        Extractor::new(&ScoringPolicy::default()).with_reference_year(2024)
    }

    #[test]
    fn test_full_resume_contact_fields() {
        let r = extractor().parse_resume(RESUME);
        assert_eq!(r.name.as_deref(), Some("Jane Doe"));
        assert_eq!(r.email.as_deref(), Some("jane.doe@example.com"));
        assert_eq!(r.phone.as_deref(), Some("+1 (555) 123-4567"));
        assert_eq!(r.raw_text, RESUME);
    }

    #[test]
    fn test_skills_come_from_skills_section() {
        let r = extractor().parse_resume(RESUME);
        for skill in ["python", "rust", "sql", "docker", "kubernetes", "airflow"] {
            assert!(r.skills.contains(skill), "missing {skill}: {:?}", r.skills);
        }
        // "kafka" only appears under Projects, outside the Skills section
        assert!(!r.skills.contains("kafka"));
        assert!(r.skills.iter().all(|s| *s == s.to_lowercase()));
    }

    #[test]
    fn test_skills_fall_back_to_whole_document() {
        let r = extractor().parse_resume("John Smith\nBuilt services in Java and Docker on AWS.");
        let skills: Vec<&str> = r.skills.iter().map(String::as_str).collect();
        assert_eq!(skills, vec!["aws", "docker", "java"]);
    }

    #[test]
    fn test_experience_entries() {
        let r = extractor().parse_resume(RESUME);
        assert_eq!(r.experience.len(), 2);

        let acme = &r.experience[0];
        assert_eq!(acme.role.as_deref(), Some("Senior Engineer"));
        assert_eq!(acme.company.as_deref(), Some("Acme Corp"));
        assert_eq!(
            acme.duration,
            Some(YearSpan {
                start_year: 2019,
                end_year: None
            })
        );

        let beta = &r.experience[1];
        assert_eq!(beta.role.as_deref(), Some("Data Engineer"));
        assert_eq!(beta.company.as_deref(), Some("Beta Analytics"));
        assert_eq!(
            beta.duration,
            Some(YearSpan {
                start_year: 2016,
                end_year: Some(2019)
            })
        );
    }

    #[test]
    fn test_experience_years_takes_max_of_claim_and_spans() {
        let r = extractor().parse_resume(RESUME);
        // spans 2016–2019 and 2019–2024 merge to 8 years; claim is 6
        assert_eq!(r.experience_years, Some(8.0));
    }

    #[test]
    fn test_experience_years_from_claim_only() {
        let years = estimate_experience_years("over 3.5 yrs of professional experience", &[], 2024);
        assert_eq!(years, Some(3.5));
        assert_eq!(estimate_experience_years("no claim here", &[], 2024), None);
    }

    #[test]
    fn test_education_entries() {
        let r = extractor().parse_resume(RESUME);
        assert_eq!(r.education.len(), 2);
        assert_eq!(r.education[0].level.as_deref(), Some("Bachelor"));
        assert_eq!(r.education[0].institution.as_deref(), Some("IIT Delhi"));
        assert_eq!(r.education[0].year, Some(2015));
        assert_eq!(r.education[1].level.as_deref(), Some("Master"));
        assert_eq!(
            r.education[1].institution.as_deref(),
            Some("Stanford University")
        );
        assert_eq!(r.education[1].year, Some(2017));
    }

    #[test]
    fn test_scrum_master_job_is_not_an_education_entry() {
        let r = extractor().parse_resume("Kim Park\nScrum Master at Initech 2018 - 2022");
        assert!(r.education.is_empty(), "{:?}", r.education);

        let r = extractor().parse_resume("Kim Park\nMaster of Science, Carnegie Mellon University");
        assert_eq!(r.education.len(), 1);
        assert_eq!(r.education[0].level.as_deref(), Some("Master"));
    }

    #[test]
    fn test_projects_and_certifications() {
        let r = extractor().parse_resume(RESUME);
        assert_eq!(r.projects.len(), 1);
        assert!(r.projects[0].contains("Kafka connector"));
        assert!(r
            .certifications
            .contains("AWS Certified Solutions Architect"));
    }

    #[test]
    fn test_empty_input_yields_all_absent() {
        let r = extractor().parse_resume("   \n  ");
        assert_eq!(r.name, None);
        assert_eq!(r.email, None);
        assert_eq!(r.phone, None);
        assert!(r.skills.is_empty());
        assert!(r.experience.is_empty());
        assert_eq!(r.experience_years, None);
        assert!(r.education.is_empty());
        assert!(r.projects.is_empty());
        assert!(r.certifications.is_empty());
    }

    #[test]
    fn test_name_rejected_when_first_line_is_not_a_name() {
        let r = extractor().parse_resume("jane@example.com\nSkills: Python");
        assert_eq!(r.name, None);
        let r = extractor().parse_resume("Experience\nEngineer at X 2020 - 2021");
        assert_eq!(r.name, None);
    }

    #[test]
    fn test_split_skill_list_drops_label_and_noise() {
        assert_eq!(
            split_skill_list("Frameworks: Django, Flask; React."),
            vec!["django", "flask", "react"]
        );
        assert!(split_skill_list("3 years, x").is_empty());
    }

    #[test]
    fn test_split_role_company_variants() {
        assert_eq!(
            split_role_company("Intern @ Globex"),
            (Some("Intern".to_string()), Some("Globex".to_string()))
        );
        assert_eq!(
            split_role_company("Initech, Software Developer"),
            (
                Some("Software Developer".to_string()),
                Some("Initech".to_string())
            )
        );
        assert_eq!(
            split_role_company("Umbrella Corp"),
            (None, Some("Umbrella Corp".to_string()))
        );
    }

    #[test]
    fn test_non_ascii_title_line_splits_on_char_boundaries() {
        let r = extractor().parse_resume("Experience\nİ Engineer at Ürün Labs 2019 - 2021");
        assert_eq!(r.experience.len(), 1);
        assert_eq!(r.experience[0].role.as_deref(), Some("İ Engineer"));
        assert_eq!(r.experience[0].company.as_deref(), Some("Ürün Labs"));
        assert_eq!(
            split_role_company("İİ Analyst AT Straße GmbH"),
            (
                Some("İİ Analyst".to_string()),
                Some("Straße GmbH".to_string())
            )
        );
    }

    #[test]
    fn test_year_span_rejects_reversed_range() {
        assert_eq!(parse_year_span("2020 - 2018"), None);
        assert_eq!(
            parse_year_span("Mar 2018 to Now"),
            Some(YearSpan {
                start_year: 2018,
                end_year: None
            })
        );
    }
}
