//! Job-title recognition against a curated canonical-title map. Longer
//! surface keywords outrank shorter ones so "business analyst" beats "ba".

use once_cell::sync::Lazy;
use regex::Regex;

use super::contains_word;

/// Canonical title → surface keyword synonyms, most specific synonyms first.
pub const TITLE_KEYWORDS: &[(&str, &[&str])] = &[
    ("Business Analyst", &["business analyst", "ba", "business analysis", "functional analyst"]),
    ("Data Engineer", &["data engineer", "data engineering", "etl engineer", "big data engineer"]),
    ("Data Analyst", &["data analyst", "data analysis", "business intelligence analyst", "bi analyst"]),
    ("Data Scientist", &["data scientist", "data science"]),
    ("Backend Engineer", &["backend engineer", "backend developer", "server developer", "api developer"]),
    ("Frontend Engineer", &["frontend engineer", "frontend developer", "ui developer", "web developer"]),
    ("Fullstack Engineer", &["fullstack", "full stack", "full-stack engineer", "full-stack developer"]),
    ("AI Engineer", &["ai engineer", "machine learning engineer", "ml engineer", "deep learning engineer"]),
    ("DevOps Engineer", &["devops engineer", "devops", "sre", "site reliability engineer"]),
    ("Software Engineer", &["software engineer", "software developer", "developer", "programmer"]),
    ("Mobile Developer", &["mobile developer", "ios developer", "android developer", "react native"]),
    ("Product Manager", &["product manager", "pm", "product owner"]),
    ("Project Manager", &["project manager", "project management", "scrum master"]),
    ("QA Engineer", &["qa engineer", "qa", "quality assurance", "test engineer", "tester"]),
    ("System Analyst", &["system analyst", "systems analyst", "it analyst"]),
    ("Business Intelligence", &["business intelligence", "bi developer", "bi engineer"]),
];

/// Recognized canonical title. The first 150 lines are searched first; when
/// nothing matches there the whole document is retried. Among titles whose
/// keywords match, the longest (most specific) keyword wins.
pub fn extract_position(text: &str) -> Option<String> {
    let head: String = text
        .lines()
        .take(150)
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase();

    if let Some(title) = best_title_in(&head) {
        return Some(title);
    }
    best_title_in(&text.to_lowercase())
}

fn best_title_in(text_lower: &str) -> Option<String> {
    let mut best: Option<(usize, &str)> = None;
    for (title, keywords) in TITLE_KEYWORDS {
        for kw in *keywords {
            if contains_word(text_lower, kw) {
                if best.map_or(true, |(len, _)| kw.len() > len) {
                    best = Some((kw.len(), title));
                }
                break;
            }
        }
    }
    best.map(|(_, title)| title.to_string())
}

static SENIORITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(thực\s+tập\s+sinh|intern|trainee|junior|senior|lead|principal)\b").unwrap()
});

/// Strips seniority/intern qualifiers from a title string. "Senior Data
/// Engineer" and "Thực tập sinh Business Analyst" both reduce to the bare
/// role name.
pub fn strip_seniority(title: &str) -> String {
    let stripped = SENIORITY.replace_all(title, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Maps free-form title text onto the canonical vocabulary; unrecognized
/// titles are kept but title-cased. Empty input maps to None.
pub fn normalize_title(raw: &str) -> Option<String> {
    let stripped = strip_seniority(raw);
    let lower = stripped.to_lowercase();
    if lower.trim().is_empty() {
        return None;
    }
    if let Some(title) = best_title_in(&lower) {
        return Some(title);
    }
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(
            trimmed
                .split_whitespace()
                .map(|w| {
                    let mut chars = w.chars();
                    match chars.next() {
                        Some(c) => c.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                        None => String::new(),
                    }
                })
                .collect::<Vec<_>>()
                .join(" "),
        )
    }
}
