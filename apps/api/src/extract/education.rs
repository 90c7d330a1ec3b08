//! Education extraction. Within an education section, consecutive non-empty
//! lines form one entry per blank-line-delimited block; school, degree, major
//! and graduation year are tagged by keyword presence inside each line. When
//! no section exists, degree/institution keyword lines across the whole
//! document are collected instead, merging duplicates by school.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{has_email, has_phone_shape, has_url};
use crate::models::candidate::EducationEntry;

const SECTION_KEYWORDS: &[&str] = &[
    "education", "học vấn", "trình độ học vấn", "học tập", "academic", "university", "đại học",
    "college", "cao đẳng", "institute", "viện", "degree", "bằng cấp", "bachelor", "master",
    "phd", "tiến sĩ", "thạc sĩ", "cử nhân",
];

const SCHOOL_KEYWORDS: &[&str] =
    &["university", "đại học", "college", "cao đẳng", "institute", "viện", "school", "trường"];

const DEGREE_KEYWORDS: &[&str] = &[
    "bachelor", "cử nhân", "master", "thạc sĩ", "phd", "tiến sĩ", "degree", "bằng", "engineer",
    "kỹ sư",
];

const MAJOR_KEYWORDS: &[&str] = &["major", "chuyên ngành", "specialization", "ngành"];

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(19|20)\d{2}\b").unwrap());

const MAX_ENTRIES: usize = 10;

/// Education entries, at most 10, duplicates merged by school.
pub fn extract_education(text: &str) -> Vec<EducationEntry> {
    let lines: Vec<&str> = text.lines().collect();

    let section_start = lines.iter().position(|line| {
        let lower = line.to_lowercase();
        SECTION_KEYWORDS.iter().any(|kw| lower.contains(kw))
            && (line.trim().len() < 50 || line.contains(':'))
    });

    let mut entries = match section_start {
        Some(i) => entries_from_section(&lines, i + 1),
        None => entries_from_keyword_lines(&lines),
    };

    // A section that produced nothing still falls back to the whole document.
    if entries.is_empty() && section_start.is_some() {
        entries = entries_from_keyword_lines(&lines);
    }

    entries.truncate(MAX_ENTRIES);
    entries
}

fn entries_from_section(lines: &[&str], start: usize) -> Vec<EducationEntry> {
    let end = (start + 30).min(lines.len());
    let mut entries: Vec<EducationEntry> = Vec::new();
    let mut current = EducationEntry::default();

    for line in &lines[start..end] {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                entries.push(std::mem::take(&mut current));
            }
            continue;
        }
        if has_email(line) || has_phone_shape(line) || has_url(line) {
            continue;
        }
        let lower = line.to_lowercase();
        if SCHOOL_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            match &current.school {
                None => current.school = Some(line.to_string()),
                Some(existing) if line.len() > existing.len() => {
                    current.school = Some(line.to_string())
                }
                _ => {}
            }
        }
        if current.degree.is_none() && DEGREE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            current.degree = Some(line.to_string());
        }
        if current.major.is_none() && MAJOR_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            current.major = Some(line.to_string());
        }
        if current.year.is_none() {
            if let Some(year) = YEAR.find(line) {
                current.year = Some(year.as_str().to_string());
            }
        }
    }
    if !current.is_empty() {
        entries.push(current);
    }
    entries
}

fn entries_from_keyword_lines(lines: &[&str]) -> Vec<EducationEntry> {
    let mut entries: Vec<EducationEntry> = Vec::new();

    for line in lines {
        let line_clean = line.trim();
        if line_clean.len() < 10 || line_clean.len() > 200 {
            continue;
        }
        if has_email(line_clean) || has_phone_shape(line_clean) || has_url(line_clean) {
            continue;
        }
        let lower = line_clean.to_lowercase();
        let mut entry = EducationEntry::default();

        if SCHOOL_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            entry.school = Some(line_clean.to_string());
        }
        if DEGREE_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            entry.degree = Some(line_clean.to_string());
        }
        if MAJOR_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            // Prefer the text after a separator when the line is labeled
            let tail = [':', '-', '–']
                .iter()
                .find_map(|sep| line_clean.split_once(*sep).map(|(_, t)| t.trim()))
                .filter(|t| !t.is_empty());
            entry.major = Some(tail.unwrap_or(line_clean).to_string());
        }
        if let Some(year) = YEAR.find(line_clean) {
            let value: i32 = year.as_str().parse().unwrap_or(0);
            if (1950..=2030).contains(&value) {
                entry.year = Some(year.as_str().to_string());
            }
        }

        if entry.is_empty() {
            continue;
        }

        // Merge rather than duplicate when the school already appeared.
        if let Some(existing) = entries
            .iter_mut()
            .find(|e| e.school.is_some() && e.school == entry.school)
        {
            if existing.degree.is_none() {
                existing.degree = entry.degree.take();
            }
            if existing.major.is_none() {
                existing.major = entry.major.take();
            }
            if existing.year.is_none() {
                existing.year = entry.year.take();
            }
            continue;
        }
        entries.push(entry);
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_groups_blocks_into_entries() {
        let text = "EDUCATION\nHanoi University of Science and Technology\nBachelor of Computer Science\n2016\n\nFPT College\nDiploma degree\n";
        let entries = extract_education(text);
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].school.as_deref(),
            Some("Hanoi University of Science and Technology")
        );
        assert_eq!(
            entries[0].degree.as_deref(),
            Some("Bachelor of Computer Science")
        );
        assert_eq!(entries[0].year.as_deref(), Some("2016"));
        assert_eq!(entries[1].school.as_deref(), Some("FPT College"));
    }

    #[test]
    fn test_year_attaches_to_containing_entry() {
        let text = "EDUCATION\nForeign Trade University, graduated 2019\n";
        let entries = extract_education(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].year.as_deref(), Some("2019"));
    }

    #[test]
    fn test_whole_document_fallback_without_section_header() {
        // No standalone header line, but a degree keyword inside a long line
        let text = "Worked five years after earning a Bachelor in Finance back in 2012 at a large firm with offices everywhere\n";
        let entries = extract_education(text);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].degree.is_some());
    }

    #[test]
    fn test_fallback_merges_duplicate_schools() {
        let long_pad = "with a large campus";
        let text = format!(
            "Studied at Hanoi University {long_pad}\nStudied at Hanoi University {long_pad}\n"
        );
        let entries = entries_from_keyword_lines(&text.lines().collect::<Vec<_>>());
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_entries_capped_at_ten() {
        let mut text = String::from("EDUCATION\n");
        for i in 0..15 {
            text.push_str(&format!("University of Placeholder Number {i}\n\n"));
        }
        assert!(extract_education(&text).len() <= 10);
    }

    #[test]
    fn test_contact_lines_ignored_inside_section() {
        let text = "EDUCATION\nadmissions@university.edu\nVinh University\n";
        let entries = extract_education(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].school.as_deref(), Some("Vinh University"));
    }
}
