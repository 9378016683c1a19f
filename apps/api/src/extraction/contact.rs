//! Contact field patterns. First plausible match wins; no match means absent.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("static email regex")
});

static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[+(]?[0-9][0-9 .\-()]{8,}[0-9]").expect("static phone regex"));

const MIN_PHONE_DIGITS: usize = 10;
const MAX_PHONE_DIGITS: usize = 15;

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL.find(text).map(|m| m.as_str().to_string())
}

/// First candidate with a plausible digit count (10–15, E.164 upper bound).
pub fn extract_phone(text: &str) -> Option<String> {
    PHONE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .find(|candidate| {
            let digits = candidate.chars().filter(|c| c.is_ascii_digit()).count();
            (MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) && !looks_like_year_range(candidate)
        })
        .map(str::to_string)
}

fn looks_like_year_range(candidate: &str) -> bool {
    let parts: Vec<&str> = candidate
        .split(|c: char| !c.is_ascii_digit())
        .filter(|p| !p.is_empty())
        .collect();
    parts.len() >= 2
        && parts
            .iter()
            .all(|p| p.len() == 4 && (p.starts_with("19") || p.starts_with("20")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_first_match_wins() {
        let text = "Contact: jane.doe+jobs@example.co.uk or jd@other.io";
        assert_eq!(
            extract_email(text).as_deref(),
            Some("jane.doe+jobs@example.co.uk")
        );
    }

    #[test]
    fn test_email_absent() {
        assert_eq!(extract_email("no contact here @ all"), None);
    }

    #[test]
    fn test_phone_formats() {
        assert_eq!(
            extract_phone("Phone: +1 (555) 123-4567").as_deref(),
            Some("+1 (555) 123-4567")
        );
        assert_eq!(
            extract_phone("call 98765 43210 today").as_deref(),
            Some("98765 43210")
        );
    }

    #[test]
    fn test_phone_rejects_short_numbers_and_year_ranges() {
        assert_eq!(extract_phone("Engineer 2015 - 2019, 2019 - 2023"), None);
        assert_eq!(extract_phone("ext 123-4567"), None);
    }
}
