//! Years-of-experience extraction. Explicit "X years" statements win; when
//! none are present the total is reconstructed from employment date ranges.

use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;

static YEAR_STATEMENTS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(\d+)\s*\+?\s*(?:years?|năm)\s*(?:of\s+)?experience").unwrap(),
        Regex::new(r"(\d+)\s*\+?\s*(?:years?|năm)").unwrap(),
        Regex::new(r"(?:hơn|over|more\s+than)\s+(\d+)\s*(?:years?|năm)").unwrap(),
        Regex::new(r"(\d+)\s*(?:years?|năm)\s*(?:kinh\s+nghiệm|experience)").unwrap(),
        Regex::new(r"experience[:\s]+(\d+)\s*(?:years?|năm)").unwrap(),
        Regex::new(r"(\d+)\s*(?:years?|năm)\s*(?:kn|kinh nghiệm)").unwrap(),
    ]
});

static MONTH_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})[/-](\d{4})\s*[-–—]\s*(\d{1,2})[/-](\d{4})").unwrap());
static YEAR_RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4})\s*[-–—]\s*(\d{4})").unwrap());
static OPEN_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d{4})\s*[-–—]\s*(?:present|hiện tại|nay)").unwrap());

/// Total years of experience. Explicit numeric statements in (0, 50] are
/// collected across the whole document and the maximum wins; otherwise the
/// month spans of plausible date ranges ((0, 600] months each) are summed
/// and converted to rounded years.
pub fn extract_years_experience(text: &str) -> u32 {
    let text_lower = text.to_lowercase();

    let mut stated: Vec<u32> = Vec::new();
    for pattern in YEAR_STATEMENTS.iter() {
        for caps in pattern.captures_iter(&text_lower) {
            if let Some(years) = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) {
                if (1..=50).contains(&years) {
                    stated.push(years);
                }
            }
        }
    }
    if let Some(max) = stated.into_iter().max() {
        return max;
    }

    let mut total_months: i64 = 0;
    for caps in MONTH_RANGE.captures_iter(text) {
        let (sm, sy, em, ey) = (
            parse_i64(&caps, 1),
            parse_i64(&caps, 2),
            parse_i64(&caps, 3),
            parse_i64(&caps, 4),
        );
        let months = (ey - sy) * 12 + (em - sm);
        if (1..=600).contains(&months) {
            total_months += months;
        }
    }
    for caps in YEAR_RANGE.captures_iter(text) {
        let months = (parse_i64(&caps, 2) - parse_i64(&caps, 1)) * 12;
        if (1..=600).contains(&months) {
            total_months += months;
        }
    }
    let current_year = chrono::Utc::now().year() as i64;
    for caps in OPEN_RANGE.captures_iter(text) {
        let months = (current_year - parse_i64(&caps, 1)) * 12;
        if (1..=600).contains(&months) {
            total_months += months;
        }
    }

    if total_months > 0 {
        (total_months as f64 / 12.0).round() as u32
    } else {
        0
    }
}

fn parse_i64(caps: &regex::Captures<'_>, idx: usize) -> i64 {
    caps.get(idx)
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .unwrap_or(0)
}
