//! Prompt construction for the two structured-extraction calls. Documents are
//! truncated by character count before embedding: résumés keep the first
//! 20 000 and last 10 000 characters once they pass 30 000, job descriptions
//! keep only the first 10 000.

const CANDIDATE_HEAD_CHARS: usize = 20_000;
const CANDIDATE_TAIL_CHARS: usize = 10_000;
const CANDIDATE_MAX_CHARS: usize = 30_000;
const JD_MAX_CHARS: usize = 10_000;

/// System prompt for candidate extraction — enforces JSON-only output.
pub const CANDIDATE_SYSTEM: &str = "You are an expert résumé analyst. \
    Extract structured candidate information from the résumé you are given. \
    Extract ONLY what the résumé actually states — never guess or invent. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// System prompt for job-description extraction — enforces JSON-only output.
pub const REQUIREMENT_SYSTEM: &str = "You are an expert job-description analyst. \
    Extract the hiring requirements from the job description you are given. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

const CANDIDATE_PROMPT_TEMPLATE: &str = r#"Extract structured information from the résumé below. The résumé may be in Vietnamese or English.

Return a JSON object with this EXACT schema (no extra fields):
{
  "name": "full name or null",
  "email": "address@example.com or null",
  "phone": "0xxxxxxxxx / +84xxxxxxxxx or null",
  "date_of_birth": "as written in the résumé, or null",
  "address": "full address or null",
  "position": "current or desired job title, or null",
  "years_experience": 0,
  "skills": ["skill1", "skill2"],
  "summary": "self-introduction paragraph or null",
  "education": [
    {"school": "...", "degree": "...", "major": "...", "year": "..."}
  ],
  "experiences": ["company - role (period): description", "..."],
  "projects": ["project name: description", "..."],
  "social_links": ["https://linkedin.com/in/...", "https://github.com/..."]
}

Field rules:
- name: usually the first line or after a "Họ tên:" / "Name:" / "Full Name:" label; 2-5 words, never an email or phone number.
- email: any xxx@xxx.xxx form, anywhere in the document; the first or primary one.
- phone: Vietnamese numbers are 10 digits starting with 0, or +84 followed by 9 digits; strip spaces and dashes.
- date_of_birth: forms like DD/MM/YYYY, DD-MM-YYYY, YYYY-MM-DD, or "ngày D tháng M năm YYYY"; keep the original wording.
- address: after "Địa chỉ:" / "Address:" / "Location:" labels or inside the personal-details block; keep the whole address.
- years_experience: total years across all jobs, or the explicitly stated number; integer, 0 when unknown.
- skills: every technical skill, tool and language mentioned, from the skills section and the rest of the document.
- education: one entry per school/degree; include only the sub-fields actually present.
- experiences: one string per job, keeping company, role, period and description.
- projects: one string per project, keeping name, description and technologies.
- social_links: full URLs for LinkedIn, GitHub, Facebook, portfolios and similar profiles.

Use null for missing string fields and [] for missing lists. Respond with the JSON object only.

RÉSUMÉ:
{cv_text}"#;

const REQUIREMENT_PROMPT_TEMPLATE: &str = r#"Extract the hiring requirements from the job description below. The document may be in Vietnamese or English.

Return a JSON object with this EXACT schema (no extra fields):
{
  "position": "the recruited job title or null",
  "years": 0,
  "skills": ["skill1", "skill2"],
  "requirements": ["non-skill requirement 1", "..."]
}

Field rules:
- position: THE MOST IMPORTANT FIELD. Read the title and the first 5 lines carefully — the recruited role is usually there ("TUYỂN THỰC TẬP SINH BUSINESS ANALYST" means "Business Analyst", "Vị trí: Data Engineer" means "Data Engineer"). Drop qualifiers such as "thực tập sinh", "intern", "trainee", "junior", "senior", "lead", "principal". Search the whole document before giving up; only then use null.
- years: the minimum years of experience required ("3 năm kinh nghiệm", "5+ years experience", "minimum 3 years"); integer, 0 when no requirement is stated.
- skills: every required or preferred technology, tool and skill, especially under "Yêu cầu", "Kỹ năng", "Skills", "Must have", "Required".
- requirements: other non-skill requirements such as degrees, communication or teamwork.

Use null for a missing position and [] for missing lists. Respond with the JSON object only.

JOB DESCRIPTION:
{jd_text}"#;

/// Builds the candidate-extraction prompt, truncating long résumés to their
/// head and tail so the personal-details block and the closing skill/project
/// sections both survive.
pub fn candidate_prompt(cv_text: &str) -> String {
    let content = if cv_text.chars().count() > CANDIDATE_MAX_CHARS {
        format!(
            "{}\n\n...[middle of the document omitted]...\n\n{}",
            prefix_chars(cv_text, CANDIDATE_HEAD_CHARS),
            suffix_chars(cv_text, CANDIDATE_TAIL_CHARS)
        )
    } else {
        cv_text.to_string()
    };
    CANDIDATE_PROMPT_TEMPLATE.replace("{cv_text}", &content)
}

/// Builds the requirement-extraction prompt, keeping only the head of an
/// oversized job description (the title and requirements come first).
pub fn requirement_prompt(jd_text: &str) -> String {
    let content = if jd_text.chars().count() > JD_MAX_CHARS {
        format!("{}\n... (truncated)", prefix_chars(jd_text, JD_MAX_CHARS))
    } else {
        jd_text.to_string()
    };
    REQUIREMENT_PROMPT_TEMPLATE.replace("{jd_text}", &content)
}

fn prefix_chars(text: &str, n: usize) -> &str {
    match text.char_indices().nth(n) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn suffix_chars(text: &str, n: usize) -> &str {
    let total = text.chars().count();
    if total <= n {
        return text;
    }
    match text.char_indices().nth(total - n) {
        Some((idx, _)) => &text[idx..],
        None => text,
    }
}
