//! Contact-block extractors: email, phone, name, date of birth, address and
//! social links. These all assume the contact details live near the top of
//! the document and restrict their line windows accordingly.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{has_email, has_phone_shape, has_url};

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").unwrap());

/// First email-shaped substring anywhere in the text.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL.find(text).map(|m| m.as_str().to_string())
}

static PHONE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        // Labeled number, e.g. "SDT: 0912345678"
        Regex::new(r"(?i)(?:phone|điện thoại|mobile|sdt|tel)[\s:]*([+0]\d{9,11})").unwrap(),
        // Vietnamese mobile prefixes
        Regex::new(r"\b(0[35789]\d{8})\b").unwrap(),
        Regex::new(r"(\+84[35789]\d{8})\b").unwrap(),
        Regex::new(r"\b(0\d{9})\b").unwrap(),
    ]
});

const PHONE_STOPWORDS: &[&str] = &["fax", "tax", "account", "bank"];

/// First valid Vietnamese phone number within the first 50 lines. Lines that
/// mention financial identifiers are skipped to avoid matching fax/tax/bank
/// numbers from a footer.
pub fn extract_phone(text: &str) -> Option<String> {
    for line in text.lines().take(50) {
        let line_lower = line.to_lowercase();
        if PHONE_STOPWORDS.iter().any(|kw| line_lower.contains(kw)) {
            continue;
        }
        for pattern in PHONE_PATTERNS.iter() {
            for caps in pattern.captures_iter(line) {
                let raw = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                let digits: String = raw.chars().filter(|c| c.is_ascii_digit() || *c == '+').collect();
                if let Some(valid) = validate_phone(&digits) {
                    return Some(valid);
                }
            }
        }
    }
    None
}

fn validate_phone(digits: &str) -> Option<String> {
    if let Some(rest) = digits.strip_prefix("+84") {
        if rest.len() == 9 {
            return Some(digits.to_string());
        }
    } else if digits.starts_with('0') {
        if digits.len() == 10 {
            return Some(digits.to_string());
        }
    } else if let Some(rest) = digits.strip_prefix("84") {
        if rest.len() == 9 {
            return Some(format!("0{rest}"));
        }
    }
    None
}

const NAME_FORBIDDEN: &[&str] = &[
    "địa chỉ", "address", "bank", "account", "sdt", "phone", "email", "ngày", "tháng", "năm",
    "họ tên", "name", "cv", "resume", "curriculum", "vitae", "contact", "mobile", "tel",
    "linkedin", "github", "facebook", "http",
];

static NAME_LABELED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:họ\s+tên|name|full\s+name)[\s:]+([A-Za-zÀ-ỹ ]{5,50})").unwrap());
static NAME_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-zÀ-ỹ ]{5,60}$").unwrap());
static TRAILING_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,.;:]+$").unwrap());
static WORD_EDGE_JUNK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^A-Za-zÀ-ỹ]+|[^A-Za-zÀ-ỹ]+$").unwrap());
static LETTERS_AND_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-zÀ-ỹ ]+[,.]?$").unwrap());

fn is_forbidden(candidate: &str) -> bool {
    let lower = candidate.to_lowercase();
    NAME_FORBIDDEN.iter().any(|kw| lower.contains(kw))
}

fn title_case(words: &str) -> String {
    words
        .split_whitespace()
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Candidate name via a tiered strategy: explicit label, pure-name line in the
/// first 5 lines, relaxed scan of the first 40 lines, and finally the email
/// local part. Each tier short-circuits on its first acceptable match.
pub fn extract_name(text: &str) -> Option<String> {
    // Tier 1: "Họ tên:" / "Name:" / "Full Name:" label
    for caps in NAME_LABELED.captures_iter(text) {
        let raw = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
        let name = TRAILING_PUNCT.replace(raw, "").to_string();
        let words = name.split_whitespace().count();
        if (2..=5).contains(&words)
            && !is_forbidden(&name)
            && !has_email(&name)
            && !has_phone_shape(&name)
        {
            return Some(title_case(&name));
        }
    }

    let lines: Vec<&str> = text.lines().collect();

    // Tier 2: an unlabeled pure-name line near the very top
    for line in lines.iter().take(5) {
        let line = line.trim();
        if line.is_empty() || has_email(line) || has_phone_shape(line) || has_url(line) {
            continue;
        }
        if !NAME_SHAPE.is_match(line) {
            continue;
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        if (2..=5).contains(&words.len()) && !is_forbidden(line) {
            return Some(title_case(line));
        }
    }

    // Tier 3: relaxed scan over the first 40 lines
    for line in lines.iter().take(40) {
        let line = line.trim();
        if line.is_empty() || line.len() > 80 {
            continue;
        }
        if has_email(line) || has_phone_shape(line) || has_url(line) {
            continue;
        }
        if line.chars().filter(|c| c.is_ascii_digit()).count() > 4 {
            continue;
        }
        if is_forbidden(line) || !line.chars().any(|c| c.is_alphabetic()) {
            continue;
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        if !(2..=5).contains(&words.len()) {
            continue;
        }
        let cleaned: Vec<String> = words
            .iter()
            .map(|w| WORD_EDGE_JUNK.replace_all(w, "").to_string())
            .filter(|w| w.chars().any(|c| c.is_alphabetic()) && (2..=20).contains(&w.chars().count()))
            .collect();
        if cleaned.len() < 2 {
            continue;
        }
        let full = cleaned.join(" ");
        if LETTERS_AND_SPACES.is_match(&full) {
            let full = full.trim_end_matches([',', '.']).to_string();
            if !is_forbidden(&full) && full.split_whitespace().count() >= 2 {
                return Some(title_case(&full));
            }
        }
    }

    // Tier 4: derive from the email local part
    if let Some(email) = extract_email(text) {
        let local = email.split('@').next().unwrap_or_default();
        let letters: String = local.chars().filter(|c| c.is_alphabetic()).collect();
        if (8..=30).contains(&letters.chars().count()) {
            return Some(title_case(&letters));
        }
    }

    None
}

static DOB_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"\b(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})\b").unwrap(),
        Regex::new(r"\b(\d{4}[/-]\d{1,2}[/-]\d{1,2})\b").unwrap(),
        Regex::new(r"(?i)\b(ngày\s+\d{1,2}\s+tháng\s+\d{1,2}\s+năm\s+\d{4})\b").unwrap(),
    ]
});
static FOUR_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").unwrap());

const DOB_SKIP_MARKERS: &[&str] = &["experience", "kinh nghiệm", "worked", "from", "to"];

/// Date of birth within the first 30 lines. Lines that look like employment
/// date ranges are skipped, and the embedded year must fall in [1900, 2010]
/// to count as a birth year.
pub fn extract_date_of_birth(text: &str) -> Option<String> {
    for line in text.lines().take(30) {
        let line_lower = line.to_lowercase();
        if DOB_SKIP_MARKERS.iter().any(|kw| line_lower.contains(kw)) {
            continue;
        }
        for pattern in DOB_PATTERNS.iter() {
            if let Some(caps) = pattern.captures(line) {
                let date_str = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
                if let Some(year) = FOUR_DIGITS
                    .find(date_str)
                    .and_then(|m| m.as_str().parse::<i32>().ok())
                {
                    if (1900..=2010).contains(&year) {
                        return Some(date_str.to_string());
                    }
                }
            }
        }
    }
    None
}

const ADDRESS_LABELS: &[&str] = &["địa chỉ", "address", "location", "nơi ở", "residence", "địa điểm"];

/// Labeled address within the first 40 lines: either the text after a
/// `:`/`=`/`-` separator on the label line, or the following line when the
/// label line is short. Rejects anything carrying an email, phone or URL.
pub fn extract_address(text: &str) -> Option<String> {
    let lines: Vec<&str> = text.lines().take(40).collect();
    for (i, line) in lines.iter().enumerate() {
        let line_lower = line.to_lowercase();
        if !ADDRESS_LABELS.iter().any(|kw| line_lower.contains(kw)) {
            continue;
        }
        for sep in [':', '=', '-'] {
            if let Some((_, tail)) = line.split_once(sep) {
                let addr = tail.trim();
                if addr.len() > 5
                    && addr.len() < 200
                    && !has_email(addr)
                    && !has_phone_shape(addr)
                {
                    return Some(addr.to_string());
                }
            }
        }
        if line.trim().len() < 30 {
            if let Some(next) = lines.get(i + 1) {
                let next = next.trim();
                if next.len() > 5
                    && next.len() < 200
                    && !has_email(next)
                    && !has_phone_shape(next)
                    && !has_url(next)
                {
                    return Some(next.to_string());
                }
            }
        }
    }
    None
}

static SOCIAL_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    let full = [
        "linkedin.com", "github.com", "facebook.com", "twitter.com", "x.com", "instagram.com",
        "youtube.com", "behance.net", "dribbble.com",
    ];
    let mut patterns: Vec<Regex> = full
        .iter()
        .map(|domain| {
            Regex::new(&format!(
                r"(?i)https?://(?:www\.)?({}/[^\s)\]]+)",
                regex::escape(domain)
            ))
            .unwrap()
        })
        .collect();
    patterns.push(Regex::new(r"(?i)https?://(?:www\.)?(portfolio[^\s)\]]+)").unwrap());
    // Bare-domain short forms
    patterns.push(Regex::new(r"(?i)\b(github\.com/[a-zA-Z0-9_-]+)").unwrap());
    patterns.push(Regex::new(r"(?i)\b(linkedin\.com/in/[a-zA-Z0-9_-]+)").unwrap());
    patterns
});

/// All recognized social/profile links, normalized to https URLs, trailing
/// punctuation stripped, de-duplicated in discovery order.
pub fn extract_social_links(text: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for pattern in SOCIAL_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let part = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let url = format!("https://{part}");
            let url = url.trim_end_matches(['.', ',', ';', ')', ']']).to_string();
            if url.len() < 200 && !found.contains(&url) {
                found.push(url);
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_email_first_match() {
        let text = "Contact: an.nguyen@example.com or backup@mail.vn";
        assert_eq!(extract_email(text).as_deref(), Some("an.nguyen@example.com"));
    }

    #[test]
    fn test_extract_email_none() {
        assert!(extract_email("no contact details here").is_none());
    }

    #[test]
    fn test_extract_phone_mobile_prefix() {
        assert_eq!(
            extract_phone("Phone: 0987654321").as_deref(),
            Some("0987654321")
        );
    }

    #[test]
    fn test_extract_phone_plus84() {
        assert_eq!(
            extract_phone("Mobile +84387654321").as_deref(),
            Some("+84387654321")
        );
    }

    #[test]
    fn test_extract_phone_skips_financial_lines() {
        let text = "Bank account: 0987654321\nTel: 0912345678";
        assert_eq!(extract_phone(text).as_deref(), Some("0912345678"));
    }

    #[test]
    fn test_extract_phone_ignores_short_runs() {
        assert!(extract_phone("call 12345").is_none());
    }

    #[test]
    fn test_extract_phone_only_scans_contact_block() {
        let mut text = String::new();
        for _ in 0..60 {
            text.push_str("filler line\n");
        }
        text.push_str("0987654321\n");
        assert!(extract_phone(&text).is_none());
    }

    #[test]
    fn test_extract_name_labeled() {
        let text = "Họ tên: nguyen van an\nemail: a@b.com";
        assert_eq!(extract_name(text).as_deref(), Some("Nguyen Van An"));
    }

    #[test]
    fn test_extract_name_first_line() {
        let text = "Tran Thi Binh\nData Analyst\nbinh.tran@mail.com";
        assert_eq!(extract_name(text).as_deref(), Some("Tran Thi Binh"));
    }

    #[test]
    fn test_extract_name_skips_contact_lines() {
        let text = "an.nguyen@example.com\n0987654321\nLe Van Cuong\n";
        assert_eq!(extract_name(text).as_deref(), Some("Le Van Cuong"));
    }

    #[test]
    fn test_extract_name_email_fallback() {
        let text = "0987654321\nnguyenvanhung@example.com";
        assert_eq!(extract_name(text).as_deref(), Some("Nguyenvanhung"));
    }

    #[test]
    fn test_extract_name_rejects_forbidden_keywords() {
        // "Curriculum Vitae" is a two-word letters-only line but forbidden
        let text = "Curriculum Vitae\ncontact@example.com\n";
        assert!(extract_name(text).is_none());
    }

    #[test]
    fn test_extract_dob_slash_format() {
        assert_eq!(
            extract_date_of_birth("DOB: 15/03/1995").as_deref(),
            Some("15/03/1995")
        );
    }

    #[test]
    fn test_extract_dob_rejects_recent_years() {
        // 2021 is outside the [1900, 2010] birth-year window
        assert!(extract_date_of_birth("Joined 15/03/2021").is_none());
    }

    #[test]
    fn test_extract_dob_skips_experience_lines() {
        let text = "Experience: 01/2005 - 01/2010\nBorn 02/02/1990";
        assert_eq!(extract_date_of_birth(text).as_deref(), Some("02/02/1990"));
    }

    #[test]
    fn test_extract_address_after_separator() {
        let text = "Address: 12 Ly Thuong Kiet, Hoan Kiem, Ha Noi";
        assert_eq!(
            extract_address(text).as_deref(),
            Some("12 Ly Thuong Kiet, Hoan Kiem, Ha Noi")
        );
    }

    #[test]
    fn test_extract_address_next_line_for_short_label() {
        let text = "Địa chỉ\n45 Nguyen Trai, Thanh Xuan, Ha Noi\n";
        assert_eq!(
            extract_address(text).as_deref(),
            Some("45 Nguyen Trai, Thanh Xuan, Ha Noi")
        );
    }

    #[test]
    fn test_extract_address_rejects_contact_noise() {
        let text = "Address: an.nguyen@example.com";
        assert!(extract_address(text).is_none());
    }

    #[test]
    fn test_extract_social_links_full_and_bare() {
        let text = "https://www.linkedin.com/in/annguyen and github.com/annguyen";
        let links = extract_social_links(text);
        assert_eq!(
            links,
            vec![
                "https://linkedin.com/in/annguyen".to_string(),
                "https://github.com/annguyen".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_social_links_dedup_and_strip_punct() {
        let text = "github.com/annguyen, github.com/annguyen.";
        let links = extract_social_links(text);
        assert_eq!(links, vec!["https://github.com/annguyen".to_string()]);
    }
}
