//! Reconciliation and cleaning: every raw extraction result — AI or pattern —
//! passes through here exactly once before anything downstream sees it.
//! Placeholder denylisting, phone/email validation and list flattening all
//! live in this module rather than at the call sites.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::extract;
use crate::extract::position::strip_seniority;
use crate::models::candidate::{CandidateRecord, EducationEntry, RawCandidateFields};
use crate::models::requirement::{RawRequirementFields, RequirementRecord};

/// Values an AI model emits in place of "unknown". Any scalar equal to one of
/// these (case-insensitive, after trimming) is treated as absent.
const PLACEHOLDERS: &[&str] = &["null", "none", "n/a", "undefined", "not available", ""];

static PHONE_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\+84|0)\d{9,10}").unwrap());

/// Which source produced the requirement record for a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementSource {
    Ai,
    Pattern,
}

/// Selection rule for the job-description path: the AI result is used only
/// when its position survived as a real value — non-empty and not the literal
/// string "null" after trimming. Anything else discards the ENTIRE AI result
/// and recomputes the requirement from pattern extraction. This is an
/// all-or-nothing fallback per document, never a field-by-field blend.
pub fn resolve_requirement(
    ai_fields: Option<RawRequirementFields>,
    jd_text: &str,
) -> (RequirementRecord, RequirementSource) {
    if let Some(raw) = ai_fields {
        let position_ok = raw
            .position
            .as_deref()
            .map(str::trim)
            .is_some_and(|p| !p.is_empty() && !p.eq_ignore_ascii_case("null"));
        if position_ok {
            return (clean_requirement(raw), RequirementSource::Ai);
        }
    }
    (extract::jd::extract_requirements(jd_text), RequirementSource::Pattern)
}

/// One validation pass from raw candidate fields to a clean record.
pub fn clean_candidate(raw: RawCandidateFields) -> CandidateRecord {
    CandidateRecord {
        name: clean_name(raw.name),
        email: clean_email(raw.email),
        phone: clean_phone(raw.phone),
        date_of_birth: clean_scalar(raw.date_of_birth),
        address: clean_scalar(raw.address),
        position: clean_scalar(raw.position),
        years_experience: clean_years(raw.years_experience),
        summary: clean_scalar(raw.summary),
        social_links: clean_string_list(raw.social_links),
        education: clean_education_list(raw.education),
        skills: clean_string_list(raw.skills),
        experiences: clean_string_list(raw.experiences),
        projects: clean_string_list(raw.projects),
    }
}

/// One validation pass from raw requirement fields to a clean record.
pub fn clean_requirement(raw: RawRequirementFields) -> RequirementRecord {
    let position = clean_scalar(raw.position).and_then(|p| {
        let stripped = strip_seniority(&p);
        (stripped.len() > 2).then_some(stripped)
    });
    let mut requirements = clean_string_list(raw.requirements);
    requirements.truncate(10);

    RequirementRecord {
        position,
        years: clean_years(raw.years),
        skills: clean_string_list(raw.skills),
        requirements,
    }
}

/// Field-by-field merge of two cleaned candidate records. List fields are
/// unioned with the AI entries first and de-duplicated by a case- and
/// whitespace-insensitive key; years take the maximum; scalars prefer the AI
/// value and fall back to the pattern value.
pub fn merge_candidates(ai: CandidateRecord, pattern: CandidateRecord) -> CandidateRecord {
    CandidateRecord {
        name: ai.name.or(pattern.name),
        email: ai.email.or(pattern.email),
        phone: ai.phone.or(pattern.phone),
        date_of_birth: ai.date_of_birth.or(pattern.date_of_birth),
        address: ai.address.or(pattern.address),
        position: ai.position.or(pattern.position),
        summary: ai.summary.or(pattern.summary),
        years_experience: ai.years_experience.max(pattern.years_experience),
        social_links: merge_string_lists(ai.social_links, pattern.social_links),
        skills: merge_string_lists(ai.skills, pattern.skills),
        experiences: merge_string_lists(ai.experiences, pattern.experiences),
        projects: merge_string_lists(ai.projects, pattern.projects),
        education: merge_education_lists(ai.education, pattern.education),
    }
}

fn is_placeholder(value: &str) -> bool {
    PLACEHOLDERS.contains(&value.to_lowercase().as_str())
}

fn clean_scalar(value: Option<String>) -> Option<String> {
    let value = value?.trim().to_string();
    (!is_placeholder(&value)).then_some(value)
}

/// Email needs exactly one `@` with a non-empty local part and domain.
fn clean_email(value: Option<String>) -> Option<String> {
    let value = clean_scalar(value)?;
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => Some(value),
        _ => None,
    }
}

/// Normalizes a phone value to digits and `+`, then validates Vietnamese
/// shapes: 10 digits starting with `0`, or `+84` plus 9 digits. A bare
/// 10-11 digit run without a leading `0` gets one prefixed.
fn clean_phone(value: Option<String>) -> Option<String> {
    let value = clean_scalar(value)?;
    let digits: String = value.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect();
    if digits.chars().filter(|c| c.is_ascii_digit()).count() < 10 {
        return None;
    }
    if digits.starts_with("+84") {
        return (digits.len() == 12).then_some(digits);
    }
    if digits.starts_with('0') {
        return (10..=11).contains(&digits.len()).then_some(digits);
    }
    if digits.chars().all(|c| c.is_ascii_digit()) && (10..=11).contains(&digits.len()) {
        return Some(format!("0{digits}"));
    }
    None
}

/// A name must not carry an email or a phone-shaped digit run, which guards
/// against an AI model echoing the whole contact line.
fn clean_name(value: Option<String>) -> Option<String> {
    let value = clean_scalar(value)?;
    if value.len() < 3 || value.contains('@') || PHONE_SHAPE.is_match(&value) {
        return None;
    }
    Some(value)
}

fn clean_years(value: Option<f64>) -> u32 {
    value.map(|y| y.max(0.0) as u32).unwrap_or(0)
}

fn dedup_key(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Keeps non-placeholder string entries verbatim (trimmed, never truncated),
/// stringifying stray scalars, de-duplicated case/whitespace-insensitively.
fn clean_string_list(values: Vec<serde_json::Value>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        let text = match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => continue,
            other => other.to_string(),
        };
        let text = text.trim().to_string();
        if text.is_empty() || is_placeholder(&text) {
            continue;
        }
        let key = dedup_key(&text);
        if !seen.contains(&key) {
            seen.push(key);
            cleaned.push(text);
        }
    }
    cleaned
}

/// Education entries keep only their non-placeholder sub-fields; a bare
/// string entry is treated as a school name. Entries with nothing left are
/// dropped, duplicates collapse by canonical serialization.
fn clean_education_list(values: Vec<serde_json::Value>) -> Vec<EducationEntry> {
    let mut cleaned: Vec<EducationEntry> = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        let entry = match value {
            serde_json::Value::Object(map) => EducationEntry {
                school: object_field(&map, "school"),
                degree: object_field(&map, "degree"),
                major: object_field(&map, "major"),
                year: object_field(&map, "year"),
            },
            serde_json::Value::String(s) => EducationEntry {
                school: clean_scalar(Some(s)),
                ..Default::default()
            },
            _ => continue,
        };
        if entry.is_empty() {
            continue;
        }
        let key = entry.canonical_key();
        if !seen.contains(&key) {
            seen.push(key);
            cleaned.push(entry);
        }
    }
    cleaned
}

fn object_field(map: &serde_json::Map<String, serde_json::Value>, key: &str) -> Option<String> {
    let text = match map.get(key)? {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => return None,
        other => other.to_string(),
    };
    clean_scalar(Some(text))
}

fn merge_string_lists(primary: Vec<String>, secondary: Vec<String>) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    for item in primary.into_iter().chain(secondary) {
        let key = dedup_key(&item);
        if !seen.contains(&key) {
            seen.push(key);
            merged.push(item);
        }
    }
    merged
}

fn merge_education_lists(primary: Vec<EducationEntry>, secondary: Vec<EducationEntry>) -> Vec<EducationEntry> {
    let mut merged: Vec<EducationEntry> = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    for entry in primary.into_iter().chain(secondary) {
        let key = entry.canonical_key();
        if !seen.contains(&key) {
            seen.push(key);
            merged.push(entry);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_with_phone(phone: &str) -> RawCandidateFields {
        RawCandidateFields {
            phone: Some(phone.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_phone_plus84_normalized() {
        let record = clean_candidate(raw_with_phone("+84 987-654-321"));
        assert_eq!(record.phone.as_deref(), Some("+84987654321"));
    }

    #[test]
    fn test_phone_too_short_rejected() {
        let record = clean_candidate(raw_with_phone("987654321"));
        assert!(record.phone.is_none());
    }

    #[test]
    fn test_phone_local_passes_unchanged() {
        let record = clean_candidate(raw_with_phone("0987654321"));
        assert_eq!(record.phone.as_deref(), Some("0987654321"));
    }

    #[test]
    fn test_phone_bare_digits_get_zero_prefix() {
        let record = clean_candidate(raw_with_phone("9876543210"));
        assert_eq!(record.phone.as_deref(), Some("09876543210"));
    }

    #[test]
    fn test_placeholder_scalars_become_absent() {
        let raw = RawCandidateFields {
            name: Some("null".to_string()),
            address: Some("  N/A ".to_string()),
            summary: Some("undefined".to_string()),
            ..Default::default()
        };
        let record = clean_candidate(raw);
        assert!(record.name.is_none());
        assert!(record.address.is_none());
        assert!(record.summary.is_none());
    }

    #[test]
    fn test_email_needs_exactly_one_at() {
        let ok = RawCandidateFields {
            email: Some("a@b.com".to_string()),
            ..Default::default()
        };
        assert!(clean_candidate(ok).email.is_some());

        for bad in ["a@@b.com", "@b.com", "a@", "plain"] {
            let raw = RawCandidateFields {
                email: Some(bad.to_string()),
                ..Default::default()
            };
            assert!(clean_candidate(raw).email.is_none(), "accepted {bad}");
        }
    }

    #[test]
    fn test_name_rejects_contact_shaped_values() {
        for bad in ["an@example.com", "An 0987654321", "ab"] {
            let raw = RawCandidateFields {
                name: Some(bad.to_string()),
                ..Default::default()
            };
            assert!(clean_candidate(raw).name.is_none(), "accepted {bad}");
        }
    }

    #[test]
    fn test_list_entries_kept_verbatim_and_deduped() {
        let raw = RawCandidateFields {
            skills: vec![json!("Python"), json!(" python "), json!("null"), json!(42)],
            ..Default::default()
        };
        let record = clean_candidate(raw);
        assert_eq!(record.skills, vec!["Python".to_string(), "42".to_string()]);
    }

    #[test]
    fn test_education_objects_keep_present_keys_only() {
        let raw = RawCandidateFields {
            education: vec![json!({"school": "FPT University", "degree": "null", "year": 2020})],
            ..Default::default()
        };
        let record = clean_candidate(raw);
        assert_eq!(record.education.len(), 1);
        assert_eq!(record.education[0].school.as_deref(), Some("FPT University"));
        assert!(record.education[0].degree.is_none());
        assert_eq!(record.education[0].year.as_deref(), Some("2020"));
    }

    #[test]
    fn test_requirement_position_strips_seniority() {
        let raw = RawRequirementFields {
            position: Some("Senior Data Engineer".to_string()),
            ..Default::default()
        };
        assert_eq!(
            clean_requirement(raw).position.as_deref(),
            Some("Data Engineer")
        );
    }

    #[test]
    fn test_requirement_position_dropped_when_nothing_remains() {
        let raw = RawRequirementFields {
            position: Some("Intern".to_string()),
            ..Default::default()
        };
        assert!(clean_requirement(raw).position.is_none());
    }

    #[test]
    fn test_requirements_capped_at_ten() {
        let raw = RawRequirementFields {
            requirements: (0..15).map(|i| json!(format!("requirement number {i}"))).collect(),
            ..Default::default()
        };
        assert_eq!(clean_requirement(raw).requirements.len(), 10);
    }

    #[test]
    fn test_negative_years_clamped() {
        let raw = RawRequirementFields {
            years: Some(-3.0),
            ..Default::default()
        };
        assert_eq!(clean_requirement(raw).years, 0);
    }

    #[test]
    fn test_resolve_uses_ai_when_position_is_real() {
        let ai = RawRequirementFields {
            position: Some("Data Engineer".to_string()),
            years: Some(3.0),
            skills: vec![json!("python")],
            ..Default::default()
        };
        let (record, source) = resolve_requirement(Some(ai), "irrelevant jd text");
        assert_eq!(source, RequirementSource::Ai);
        assert_eq!(record.position.as_deref(), Some("Data Engineer"));
        assert_eq!(record.years, 3);
    }

    #[test]
    fn test_resolve_discards_entire_ai_result_on_literal_null_position() {
        // The AI skills list must NOT leak into the pattern-derived record.
        let ai = RawRequirementFields {
            position: Some("null".to_string()),
            skills: vec![json!("made-up-skill")],
            ..Default::default()
        };
        let jd = "TUYỂN DATA ENGINEER\nYêu cầu: Python, SQL\n";
        let (record, source) = resolve_requirement(Some(ai), jd);
        assert_eq!(source, RequirementSource::Pattern);
        assert_eq!(record.position.as_deref(), Some("Data Engineer"));
        assert!(!record.skills.contains(&"made-up-skill".to_string()));
        assert!(record.skills.contains(&"python".to_string()));
    }

    #[test]
    fn test_resolve_falls_back_when_ai_result_missing() {
        let jd = "Hiring backend engineer, 2 years experience, Docker required";
        let (record, source) = resolve_requirement(None, jd);
        assert_eq!(source, RequirementSource::Pattern);
        assert_eq!(record.position.as_deref(), Some("Backend Engineer"));
    }

    #[test]
    fn test_merge_prefers_ai_scalars_and_max_years() {
        let ai = CandidateRecord {
            name: Some("Nguyen Van An".to_string()),
            years_experience: 3,
            ..Default::default()
        };
        let pattern = CandidateRecord {
            name: Some("Different Name".to_string()),
            email: Some("an@example.com".to_string()),
            years_experience: 5,
            ..Default::default()
        };
        let merged = merge_candidates(ai, pattern);
        assert_eq!(merged.name.as_deref(), Some("Nguyen Van An"));
        assert_eq!(merged.email.as_deref(), Some("an@example.com"));
        assert_eq!(merged.years_experience, 5);
    }

    #[test]
    fn test_merge_unions_lists_ai_first_without_duplicates() {
        let ai = CandidateRecord {
            skills: vec!["Python".to_string(), "SQL".to_string()],
            ..Default::default()
        };
        let pattern = CandidateRecord {
            skills: vec!["python".to_string(), "docker".to_string()],
            ..Default::default()
        };
        let merged = merge_candidates(ai, pattern);
        assert_eq!(
            merged.skills,
            vec!["Python".to_string(), "SQL".to_string(), "docker".to_string()]
        );
    }

    #[test]
    fn test_merge_education_dedups_by_canonical_form() {
        let entry = |school: &str| EducationEntry {
            school: Some(school.to_string()),
            ..Default::default()
        };
        let merged = merge_candidates(
            CandidateRecord {
                education: vec![entry("FPT University")],
                ..Default::default()
            },
            CandidateRecord {
                education: vec![entry("fpt  university"), entry("Vinh University")],
                ..Default::default()
            },
        );
        assert_eq!(merged.education.len(), 2);
    }
}
