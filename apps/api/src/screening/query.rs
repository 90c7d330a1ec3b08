//! Natural-language search decomposition. A query like "có 3 năm kn data
//! engineer, biết aws" becomes the same position/years/skill predicates the
//! filter endpoint takes, reusing the extraction vocabularies. This is
//! query-time filtering only — nothing is re-extracted.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::extract::{contains_word, position::TITLE_KEYWORDS, skills::SKILL_VOCABULARY};
use crate::screening::store::SearchFilters;

static YEARS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"có\s+(\d+)\s*(?:năm|years?|kn)").unwrap(),
        Regex::new(r"(\d+)\s*(?:năm|years?|kn)\s*(?:kinh\s+nghiệm|experience|kn)").unwrap(),
        Regex::new(r"(\d+)\s*(?:năm|years?)\s*(?:với|with)").unwrap(),
        Regex::new(r"(?:hơn|over|more\s+than)\s+(\d+)\s*(?:năm|years?)").unwrap(),
        Regex::new(r"(\d+)\s*\+?\s*(?:năm|years?)").unwrap(),
    ]
});

/// Decomposes a free-text query into structured search filters.
pub fn parse_query(query: &str) -> SearchFilters {
    let query_lower = query.to_lowercase();

    let min_years = YEARS_PATTERNS
        .iter()
        .find_map(|pattern| {
            pattern
                .captures(&query_lower)
                .and_then(|caps| caps.get(1))
                .and_then(|m| m.as_str().parse::<i32>().ok())
        })
        .unwrap_or(0);

    // Longest keyword first so "business analyst" beats "ba".
    let mut title_keywords: Vec<&str> = TITLE_KEYWORDS
        .iter()
        .flat_map(|(_, keywords)| keywords.iter().copied())
        .collect();
    title_keywords.sort_by_key(|kw| std::cmp::Reverse(kw.len()));
    let position = title_keywords
        .into_iter()
        .find(|kw| contains_word(&query_lower, kw))
        .map(|kw| kw.to_string());

    // Longest skills first so "machine learning" is found before bare terms.
    let mut vocabulary: Vec<&str> = SKILL_VOCABULARY.to_vec();
    vocabulary.sort_by_key(|s| std::cmp::Reverse(s.len()));
    let skills: Vec<String> = vocabulary
        .into_iter()
        .filter(|skill| {
            // The position keyword should not double as a skill hit.
            position.as_deref() != Some(*skill) && contains_word(&query_lower, skill)
        })
        .map(|s| s.to_string())
        .collect();

    SearchFilters {
        position,
        min_years,
        skills,
    }
}
