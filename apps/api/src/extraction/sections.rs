//! Section segmentation — splits a resume into blocks keyed by recognised headers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    /// Lines before the first recognised header.
    Preamble,
    Summary,
    Skills,
    Experience,
    Education,
    Projects,
    Certifications,
    /// A recognised header the engine does not extract from (awards, hobbies, ...).
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub kind: SectionKind,
    pub lines: Vec<String>,
}

const HEADER_SYNONYMS: &[(&str, SectionKind)] = &[
    ("summary", SectionKind::Summary),
    ("professional summary", SectionKind::Summary),
    ("profile", SectionKind::Summary),
    ("objective", SectionKind::Summary),
    ("career objective", SectionKind::Summary),
    ("about me", SectionKind::Summary),
    ("skills", SectionKind::Skills),
    ("skill", SectionKind::Skills),
    ("technical skills", SectionKind::Skills),
    ("key skills", SectionKind::Skills),
    ("core skills", SectionKind::Skills),
    ("core competencies", SectionKind::Skills),
    ("competencies", SectionKind::Skills),
    ("technologies", SectionKind::Skills),
    ("tech stack", SectionKind::Skills),
    ("skills & tools", SectionKind::Skills),
    ("experience", SectionKind::Experience),
    ("work experience", SectionKind::Experience),
    ("professional experience", SectionKind::Experience),
    ("employment", SectionKind::Experience),
    ("employment history", SectionKind::Experience),
    ("work history", SectionKind::Experience),
    ("career history", SectionKind::Experience),
    ("internships", SectionKind::Experience),
    ("education", SectionKind::Education),
    ("academic background", SectionKind::Education),
    ("academics", SectionKind::Education),
    ("qualifications", SectionKind::Education),
    ("educational qualifications", SectionKind::Education),
    ("academic qualifications", SectionKind::Education),
    ("projects", SectionKind::Projects),
    ("project", SectionKind::Projects),
    ("personal projects", SectionKind::Projects),
    ("academic projects", SectionKind::Projects),
    ("key projects", SectionKind::Projects),
    ("certifications", SectionKind::Certifications),
    ("certification", SectionKind::Certifications),
    ("certificates", SectionKind::Certifications),
    ("licenses & certifications", SectionKind::Certifications),
    ("licenses and certifications", SectionKind::Certifications),
    ("achievements", SectionKind::Other),
    ("awards", SectionKind::Other),
    ("honors", SectionKind::Other),
    ("interests", SectionKind::Other),
    ("hobbies", SectionKind::Other),
    ("publications", SectionKind::Other),
    ("references", SectionKind::Other),
    ("volunteering", SectionKind::Other),
];

/// Recognises a header line. Returns the section kind plus any inline content
/// following a `Header:` prefix (e.g. `Skills: Python, SQL`).
pub fn detect_header(line: &str) -> Option<(SectionKind, Option<String>)> {
    let (head, rest) = match line.split_once(':') {
        Some((head, rest)) => (head, Some(rest.trim())),
        None => (line, None),
    };
    let key = head
        .trim()
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '&')
        .to_lowercase();

    let kind = HEADER_SYNONYMS
        .iter()
        .find(|(synonym, _)| *synonym == key)
        .map(|(_, kind)| *kind)?;

    let inline = rest.filter(|r| !r.is_empty()).map(str::to_string);
    // `Awards: ...` style labels inside another section are content, not headers.
    if kind == SectionKind::Other && inline.is_some() {
        return None;
    }
    Some((kind, inline))
}

/// Splits lines into consecutive sections. Content before the first header
/// becomes a `Preamble` section.
pub fn segment(lines: &[String]) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current = Section {
        kind: SectionKind::Preamble,
        lines: Vec::new(),
    };

    for line in lines {
        match detect_header(line) {
            Some((kind, inline)) => {
                if current.kind != SectionKind::Preamble || !current.lines.is_empty() {
                    sections.push(current);
                }
                current = Section {
                    kind,
                    lines: inline.into_iter().collect(),
                };
            }
            None => current.lines.push(line.clone()),
        }
    }
    if current.kind != SectionKind::Preamble || !current.lines.is_empty() {
        sections.push(current);
    }
    sections
}

/// All lines belonging to sections of `kind`, in document order.
pub fn lines_of<'a>(sections: &'a [Section], kind: SectionKind) -> Vec<&'a str> {
    sections
        .iter()
        .filter(|s| s.kind == kind)
        .flat_map(|s| s.lines.iter().map(String::as_str))
        .collect()
}

pub fn has_section(sections: &[Section], kind: SectionKind) -> bool {
    sections.iter().any(|s| s.kind == kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_detect_header_plain_and_synonyms() {
        assert_eq!(
            detect_header("EXPERIENCE"),
            Some((SectionKind::Experience, None))
        );
        assert_eq!(
            detect_header("Work History:"),
            Some((SectionKind::Experience, None))
        );
        assert_eq!(
            detect_header("## Technical Skills"),
            Some((SectionKind::Skills, None))
        );
        assert_eq!(
            detect_header("Academic Background"),
            Some((SectionKind::Education, None))
        );
    }

    #[test]
    fn test_detect_header_with_inline_content() {
        assert_eq!(
            detect_header("Skills: Python, SQL"),
            Some((SectionKind::Skills, Some("Python, SQL".to_string())))
        );
    }

    #[test]
    fn test_non_header_lines_rejected() {
        assert_eq!(detect_header("Built experience tooling for teams"), None);
        assert_eq!(detect_header("Role: Backend Engineer"), None);
    }

    #[test]
    fn test_segment_groups_lines_under_headers() {
        let lines = owned(&[
            "Jane Doe",
            "jane@example.com",
            "Skills",
            "Python, SQL",
            "Experience",
            "Engineer at Acme 2019 - 2021",
            "Education: B.Tech, IIT Delhi",
        ]);
        let sections = segment(&lines);
        assert_eq!(sections.len(), 4);
        assert_eq!(sections[0].kind, SectionKind::Preamble);
        assert_eq!(sections[0].lines, vec!["Jane Doe", "jane@example.com"]);
        assert_eq!(lines_of(&sections, SectionKind::Skills), vec!["Python, SQL"]);
        assert_eq!(
            lines_of(&sections, SectionKind::Education),
            vec!["B.Tech, IIT Delhi"]
        );
    }

    #[test]
    fn test_segment_merges_repeated_kinds_in_order() {
        let lines = owned(&["Projects", "A", "Awards", "X", "Personal Projects", "B"]);
        let sections = segment(&lines);
        assert_eq!(lines_of(&sections, SectionKind::Projects), vec!["A", "B"]);
        assert!(has_section(&sections, SectionKind::Other));
        assert!(!has_section(&sections, SectionKind::Preamble));
    }

    #[test]
    fn test_segment_without_headers_is_single_preamble() {
        let sections = segment(&owned(&["just some text"]));
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].kind, SectionKind::Preamble);
    }
}
