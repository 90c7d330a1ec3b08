//! Section-based extractors: the free-text summary plus the work-experience
//! and project paragraph lists. Experiences and projects share one algorithm
//! with different keyword sets: find the section header, delimit it by the
//! next recognized header (or a 50-line cap), and group consecutive
//! non-blank lines into one paragraph per block.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{has_email, has_phone_shape, has_url};

const SUMMARY_HEADERS: &[&str] =
    &["summary", "about", "objective", "giới thiệu", "profile", "overview", "mô tả"];

/// Self-introduction paragraph: up to 10 substantial lines following a
/// summary-section header, or up to 3 long contact-free lines from the top of
/// the body when no header exists.
pub fn extract_summary(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().collect();

    let header = lines.iter().position(|line| {
        let lower = line.to_lowercase();
        SUMMARY_HEADERS.iter().any(|kw| lower.contains(kw))
    });

    if let Some(start) = header {
        let collected: Vec<&str> = lines
            .iter()
            .skip(start + 1)
            .take(10)
            .map(|l| l.trim())
            .filter(|l| l.len() > 20)
            .collect();
        if !collected.is_empty() {
            return Some(collected.join(" "));
        }
    }

    // No header: take long descriptive lines near the top, skipping the first
    // 3 lines (name/contact block).
    let mut collected = Vec::new();
    for line in lines.iter().skip(3).take(12) {
        let line = line.trim();
        if line.len() > 30 && line.len() < 300 && !has_email(line) && !has_phone_shape(line) && !has_url(line)
        {
            collected.push(line);
            if collected.len() >= 3 {
                break;
            }
        }
    }
    if collected.is_empty() {
        None
    } else {
        Some(collected.join(" "))
    }
}

const EXPERIENCE_HEADERS: &[&str] = &[
    "work experience", "professional experience", "employment history", "kinh nghiệm",
    "kinh nghiệm làm việc", "quá trình làm việc", "career", "work history", "employment",
];

const EXPERIENCE_NEXT_SECTIONS: &[&str] = &[
    "education", "học vấn", "skills", "kỹ năng", "projects", "dự án", "certificates",
    "chứng chỉ", "awards", "giải thưởng", "languages", "ngôn ngữ",
];

const EXPERIENCE_FALLBACK_KEYWORDS: &[&str] = &[
    "worked at", "company", "developer", "engineer", "analyst", "tại", "công ty", "position",
    "vị trí", "role", "vai trò",
];

const PROJECT_HEADERS: &[&str] = &[
    "projects", "dự án", "portfolio", "personal projects", "side projects", "open source",
    "project experience",
];

const PROJECT_NEXT_SECTIONS: &[&str] = &[
    "education", "học vấn", "skills", "kỹ năng", "certificates", "chứng chỉ", "awards",
    "languages",
];

const PROJECT_FALLBACK_KEYWORDS: &[&str] = &[
    "project", "system", "application", "app", "website", "platform", "tool", "dự án",
    "hệ thống", "ứng dụng",
];

const MAX_SECTION_ENTRIES: usize = 15;

/// Work-experience paragraphs, one per blank-line-delimited block.
pub fn extract_experiences(text: &str) -> Vec<String> {
    extract_section_entries(
        text,
        EXPERIENCE_HEADERS,
        EXPERIENCE_NEXT_SECTIONS,
        EXPERIENCE_FALLBACK_KEYWORDS,
    )
}

/// Project paragraphs, same shape as experiences with project keyword sets.
pub fn extract_projects(text: &str) -> Vec<String> {
    extract_section_entries(
        text,
        PROJECT_HEADERS,
        PROJECT_NEXT_SECTIONS,
        PROJECT_FALLBACK_KEYWORDS,
    )
}

fn extract_section_entries(
    text: &str,
    headers: &[&str],
    next_sections: &[&str],
    fallback_keywords: &[&str],
) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let mut entries: Vec<String> = Vec::new();

    if let Some(start) = find_section_header(&lines, headers) {
        let end = find_section_end(&lines, start, next_sections);
        let mut block: Vec<&str> = Vec::new();
        for line in &lines[start..end] {
            let line = line.trim();
            if line.is_empty() {
                flush_block(&mut block, &mut entries);
                continue;
            }
            if keepable_line(line) {
                block.push(line);
            }
        }
        flush_block(&mut block, &mut entries);
    }

    // No section found (or it yielded nothing): collect keyword-bearing lines
    // from the whole document.
    if entries.is_empty() {
        for line in &lines {
            let line_clean = line.trim();
            let lower = line_clean.to_lowercase();
            if fallback_keywords.iter().any(|kw| lower.contains(kw))
                && line_clean.len() > 10
                && line_clean.len() < 300
                && line_clean.chars().any(|c| c.is_alphabetic())
            {
                let entry = line_clean.to_string();
                if !entries.contains(&entry) {
                    entries.push(entry);
                }
            }
        }
    }

    entries.truncate(MAX_SECTION_ENTRIES);
    entries
}

fn find_section_header(lines: &[&str], headers: &[&str]) -> Option<usize> {
    lines.iter().position(|line| {
        let lower = line.to_lowercase();
        let lower = lower.trim();
        headers.iter().any(|kw| lower.contains(kw)) && (line.trim().len() < 50 || line.contains(':'))
    }).map(|i| i + 1)
}

fn find_section_end(lines: &[&str], start: usize, next_sections: &[&str]) -> usize {
    let cap = (start + 50).min(lines.len());
    for (i, line) in lines.iter().enumerate().take(cap).skip(start) {
        let lower = line.to_lowercase();
        let lower = lower.trim();
        if next_sections.iter().any(|kw| lower.contains(kw)) && lower.len() < 30 {
            return i;
        }
    }
    cap.max(start)
}

static PURE_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,2}[/-]\d{1,2}[/-]\d{2,4}$").unwrap());

fn keepable_line(line: &str) -> bool {
    line.len() > 5 && line.chars().any(|c| c.is_alphabetic()) && !PURE_DATE.is_match(line)
}

fn flush_block(block: &mut Vec<&str>, entries: &mut Vec<String>) {
    if block.is_empty() {
        return;
    }
    let paragraph = block.join(" ");
    if paragraph.len() > 15 && !entries.contains(&paragraph) {
        entries.push(paragraph);
    }
    block.clear();
}
