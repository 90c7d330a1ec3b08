use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// One persisted analysis: the cleaned candidate record, the JD-derived
/// requirement record and the match outcome, flattened for storage. Identity
/// is the candidate email — a new analysis with the same email replaces the
/// previous row ("latest analysis wins").
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisRow {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub social_links: Vec<String>,
    pub education: Value,
    pub candidate_position: Option<String>,
    pub candidate_years: i32,
    pub candidate_skills: Vec<String>,
    pub target_position: Option<String>,
    pub required_years: i32,
    pub required_skills: Vec<String>,
    pub summary: Option<String>,
    pub experiences: Vec<String>,
    pub projects: Vec<String>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub score: f64,
    pub created_at: DateTime<Utc>,
}
