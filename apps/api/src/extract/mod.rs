// Pattern extractors: pure regex/keyword heuristics over the plain-text form
// of a document. Each extractor favors a labeled-section search and falls back
// to a whole-document scan, trading recall for precision on structured
// résumés. No extractor touches the network or any shared state.

pub mod contact;
pub mod education;
pub mod jd;
pub mod position;
pub mod sections;
pub mod skills;
pub mod tenure;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::candidate::RawCandidateFields;

static PHONE_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\+84|0)\d{9,10}").unwrap());
static URL_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)https?://").unwrap());

/// Runs every pattern extractor and assembles the raw candidate fields — the
/// pattern half of the two-path extraction pipeline. The output goes through
/// the same cleaning pass as AI output (screening::reconcile).
pub fn extract_candidate_fields(text: &str) -> RawCandidateFields {
    RawCandidateFields {
        name: contact::extract_name(text),
        email: contact::extract_email(text),
        phone: contact::extract_phone(text),
        date_of_birth: contact::extract_date_of_birth(text),
        address: contact::extract_address(text),
        position: position::extract_position(text),
        years_experience: Some(tenure::extract_years_experience(text) as f64),
        summary: sections::extract_summary(text),
        skills: to_values(skills::extract_skills(text)),
        education: education::extract_education(text)
            .into_iter()
            .map(|e| serde_json::to_value(e).unwrap_or_default())
            .collect(),
        experiences: to_values(sections::extract_experiences(text)),
        projects: to_values(sections::extract_projects(text)),
        social_links: to_values(contact::extract_social_links(text)),
    }
}

fn to_values(items: Vec<String>) -> Vec<serde_json::Value> {
    items.into_iter().map(serde_json::Value::String).collect()
}

/// True when the line carries an email-like `@`.
pub(crate) fn has_email(line: &str) -> bool {
    line.contains('@')
}

/// True when the line carries a Vietnamese phone-shaped digit run.
pub(crate) fn has_phone_shape(line: &str) -> bool {
    PHONE_SHAPE.is_match(line)
}

/// True when the line carries an http(s) URL.
pub(crate) fn has_url(line: &str) -> bool {
    URL_SHAPE.is_match(line)
}

/// Case-sensitive word-boundary containment. Both sides are expected to be
/// lowercased by the caller. Boundaries treat `_` like a word character, the
/// same as regex `\b`, which keeps "sql" from matching inside "mysql".
pub(crate) fn contains_word(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut start = 0;
    while let Some(pos) = haystack[start..].find(needle) {
        let begin = start + pos;
        let end = begin + needle.len();
        let before_ok = haystack[..begin].chars().next_back().map_or(true, |c| !is_word(c));
        let after_ok = haystack[end..].chars().next().map_or(true, |c| !is_word(c));
        if before_ok && after_ok {
            return true;
        }
        start = end;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_word_respects_boundaries() {
        assert!(contains_word("python and sql", "sql"));
        assert!(!contains_word("mysql only", "sql"));
        assert!(contains_word("uses c++ daily", "c++"));
        assert!(!contains_word("postgresql", "sql"));
    }

    #[test]
    fn test_contains_word_at_line_edges() {
        assert!(contains_word("sql", "sql"));
        assert!(contains_word("sql server", "sql"));
        assert!(contains_word("knows sql", "sql"));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let text = "Nguyen Van An\nData Engineer\nEmail: an.nguyen@example.com\nPhone: 0987654321\nSkills: Python, SQL, AWS\n";
        let first = extract_candidate_fields(text);
        let second = extract_candidate_fields(text);
        assert_eq!(first.name, second.name);
        assert_eq!(first.email, second.email);
        assert_eq!(first.phone, second.phone);
        assert_eq!(first.skills, second.skills);
        assert_eq!(first.years_experience, second.years_experience);
    }
}
