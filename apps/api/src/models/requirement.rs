use serde::{Deserialize, Serialize};

/// Cleaned hiring requirements extracted from a job description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequirementRecord {
    /// Title the document is recruiting for, canonicalized when recognized.
    pub position: Option<String>,
    /// Minimum required years of experience.
    pub years: u32,
    pub skills: Vec<String>,
    /// Free-text non-skill requirements, capped at 10 entries.
    pub requirements: Vec<String>,
}

/// Untrusted requirement fields as returned by an AI provider. Cleaned in one
/// pass by screening::reconcile::clean_requirement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRequirementFields {
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub years: Option<f64>,
    #[serde(default)]
    pub skills: Vec<serde_json::Value>,
    #[serde(default)]
    pub requirements: Vec<serde_json::Value>,
}
