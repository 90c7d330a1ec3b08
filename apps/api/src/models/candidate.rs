use serde::{Deserialize, Serialize};

/// One education entry. Only the sub-fields that were actually found are
/// serialized — an unknown degree is an absent key, not a null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub major: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
}

impl EducationEntry {
    pub fn is_empty(&self) -> bool {
        self.school.is_none() && self.degree.is_none() && self.major.is_none() && self.year.is_none()
    }

    /// Stable key used for de-duplication across extraction sources.
    pub fn canonical_key(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            normalized(&self.school),
            normalized(&self.degree),
            normalized(&self.major),
            normalized(&self.year),
        )
    }
}

fn normalized(field: &Option<String>) -> String {
    field
        .as_deref()
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase())
        .unwrap_or_default()
}

/// A fully cleaned candidate profile. Scalars are trimmed and non-empty or
/// absent; list fields are de-duplicated in discovery order. Records are
/// constructed once per pipeline run and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub social_links: Vec<String>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    /// The title as stated in the résumé itself, kept for display. Matching
    /// compares it against the JD target title (see screening::matching).
    pub position: Option<String>,
    pub years_experience: u32,
    pub summary: Option<String>,
    pub experiences: Vec<String>,
    pub projects: Vec<String>,
}

/// Untrusted candidate fields as returned by an AI provider or assembled by
/// the pattern extractors. Every scalar is optional and list entries are raw
/// JSON values; all placeholder/denylist normalization happens in one pass in
/// screening::reconcile rather than being scattered at the call sites.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCandidateFields {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub years_experience: Option<f64>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub skills: Vec<serde_json::Value>,
    #[serde(default)]
    pub education: Vec<serde_json::Value>,
    #[serde(default)]
    pub experiences: Vec<serde_json::Value>,
    #[serde(default)]
    pub projects: Vec<serde_json::Value>,
    #[serde(default)]
    pub social_links: Vec<serde_json::Value>,
}
