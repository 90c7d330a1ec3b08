//! Pattern-based requirement extraction from a job description — the fallback
//! path when AI extraction is unavailable or its position check fails. Reuses
//! the shared title/skill/tenure extractors and adds JD-specific hiring
//! phrasing on top.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{position, skills, tenure};
use crate::models::requirement::RequirementRecord;

static JD_TITLE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // "TUYỂN (THỰC TẬP SINH) BUSINESS ANALYST", "hiring backend engineer"
        Regex::new(
            r"(?i)(?:tuyển|tìm|recruit|hiring|looking\s+for)\s+(?:thực\s+tập\s+sinh\s+|intern\s+|trainee\s+)?([a-zA-Z ]*?(?:engineer|developer|analyst|manager|scientist|ba)\b)",
        )
        .unwrap(),
        // "Vị trí: Business Analyst", "Position: Data Engineer"
        Regex::new(
            r"(?i)(?:vị\s+trí|position|role|chức\s+danh)[\s:]+([a-zA-Z ]*?(?:engineer|developer|analyst|manager|scientist|ba)\b)",
        )
        .unwrap(),
    ]
});

static JD_YEARS_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?:yêu cầu|requirement|require)\s+(?:ít nhất|at least|minimum)\s+(\d+)\s*(?:năm|years?)").unwrap(),
        Regex::new(r"(?:kinh nghiệm|experience)\s*(?:ít nhất|at least|minimum)\s+(\d+)\s*(?:năm|years?)").unwrap(),
        Regex::new(r"(\d+)\+?\s*(?:năm|years?)\s*(?:kinh nghiệm|experience)").unwrap(),
    ]
});

static SKILL_SECTION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?is)(?:yêu cầu|requirement|kỹ năng|skills?)[\s:]+(.*?)(?:\n\n|\n[A-Z]|$)").unwrap(),
        Regex::new(r"(?is)(?:phải có|must have|required)[\s:]+(.*?)(?:\n\n|\n[A-Z]|$)").unwrap(),
        Regex::new(r"(?is)(?:ưu tiên|preferred|nice to have)[\s:]+(.*?)(?:\n\n|\n[A-Z]|$)").unwrap(),
    ]
});

static REQUIREMENT_LINE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)(?:yêu cầu|requirement|phải có|must have)[\s:]+(.+)").unwrap(),
        Regex::new(r"(?i)(?:ưu tiên|preferred|nice to have)[\s:]+(.+)").unwrap(),
    ]
});

const MAX_REQUIREMENTS: usize = 10;

/// Full requirement record from pattern extraction alone.
pub fn extract_requirements(jd_text: &str) -> RequirementRecord {
    RequirementRecord {
        position: extract_jd_position(jd_text),
        years: extract_jd_years(jd_text),
        skills: extract_jd_skills(jd_text),
        requirements: extract_requirement_lines(jd_text),
    }
}

/// The recruited title: the first 10 lines (usually the posting headline)
/// are tried first, then JD hiring phrases, then the whole document.
fn extract_jd_position(jd_text: &str) -> Option<String> {
    let head: String = jd_text.lines().take(10).collect::<Vec<_>>().join("\n");
    if let Some(found) = position::extract_position(&head) {
        return Some(found);
    }

    for pattern in JD_TITLE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(jd_text) {
            let phrase = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            if let Some(normalized) = position::normalize_title(phrase) {
                return Some(normalized);
            }
        }
    }

    position::extract_position(jd_text)
}

fn extract_jd_years(jd_text: &str) -> u32 {
    let years = tenure::extract_years_experience(jd_text);
    if years > 0 {
        return years;
    }
    let jd_lower = jd_text.to_lowercase();
    for pattern in JD_YEARS_PATTERNS.iter() {
        if let Some(value) = pattern
            .captures(&jd_lower)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
        {
            return value;
        }
    }
    0
}

/// Vocabulary skills from the whole document plus any extra hits inside
/// requirement-looking sections.
fn extract_jd_skills(jd_text: &str) -> Vec<String> {
    let mut found = skills::extract_skills(jd_text);
    for pattern in SKILL_SECTION_PATTERNS.iter() {
        for caps in pattern.captures_iter(jd_text) {
            let section = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            for skill in skills::extract_skills(section) {
                if !found.contains(&skill) {
                    found.push(skill);
                }
            }
        }
    }
    found
}

fn extract_requirement_lines(jd_text: &str) -> Vec<String> {
    let mut requirements = Vec::new();
    for pattern in REQUIREMENT_LINE_PATTERNS.iter() {
        for line in jd_text.lines() {
            if let Some(caps) = pattern.captures(line) {
                let text = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
                if text.len() > 10 && text.len() < 200 && !requirements.contains(&text.to_string()) {
                    requirements.push(text.to_string());
                }
            }
        }
    }
    requirements.truncate(MAX_REQUIREMENTS);
    requirements
}
