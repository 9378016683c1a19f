//! Text Normalizer — cleans raw extracted text before any parsing.
//!
//! Line structure is preserved (section detection depends on it); within a line,
//! whitespace runs collapse to one space and leading bullet glyphs are stripped.

use once_cell::sync::Lazy;
use regex::Regex;

static BULLET_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[•\-\*–—▪◦●·►➢✓>]+|\(?\d{1,2}[.)])\s+").expect("static bullet regex")
});

/// Normalized document: cleaned lines in original case plus a case-folded copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedText {
    pub lines: Vec<String>,
    /// `lines` joined with `\n` and lower-cased.
    pub folded: String,
}

impl NormalizedText {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Cleaned lines joined with `\n`, original case.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

pub fn normalize(raw: &str) -> NormalizedText {
    let lines: Vec<String> = raw.lines().filter_map(normalize_line).collect();
    let folded = lines.join("\n").to_lowercase();
    NormalizedText { lines, folded }
}

/// Cleans a single line. Returns `None` when nothing is left.
pub fn normalize_line(line: &str) -> Option<String> {
    let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
    let stripped = BULLET_PREFIX.replace(&collapsed, "");
    let cleaned = stripped.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
