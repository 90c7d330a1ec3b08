//! Persistence for completed analyses. Storage identity is the candidate
//! email: saving an analysis deletes any prior row with the same email before
//! inserting, so the latest analysis wins instead of accumulating history.

use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::analysis::AnalysisRow;
use crate::screening::pipeline::Analysis;

/// Query-time predicates over already-persisted, already-cleaned fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub position: Option<String>,
    pub min_years: i32,
    pub skills: Vec<String>,
}

pub async fn save_analysis(pool: &PgPool, analysis: &Analysis) -> Result<AnalysisRow, AppError> {
    let candidate = &analysis.candidate;
    let requirement = &analysis.requirement;
    let education = serde_json::to_value(&candidate.education)
        .unwrap_or_else(|_| serde_json::Value::Array(vec![]));

    let mut tx = pool.begin().await?;

    if let Some(email) = &candidate.email {
        sqlx::query("DELETE FROM analyses WHERE email = $1")
            .bind(email)
            .execute(&mut *tx)
            .await?;
    }

    let row: AnalysisRow = sqlx::query_as(
        r#"
        INSERT INTO analyses
            (name, email, phone, date_of_birth, address, social_links, education,
             candidate_position, candidate_years, candidate_skills,
             target_position, required_years, required_skills,
             summary, experiences, projects,
             matched_skills, missing_skills, score)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                $11, $12, $13, $14, $15, $16, $17, $18, $19)
        RETURNING *
        "#,
    )
    .bind(&candidate.name)
    .bind(&candidate.email)
    .bind(&candidate.phone)
    .bind(&candidate.date_of_birth)
    .bind(&candidate.address)
    .bind(&candidate.social_links)
    .bind(&education)
    .bind(&candidate.position)
    .bind(candidate.years_experience as i32)
    .bind(&candidate.skills)
    .bind(&requirement.position)
    .bind(requirement.years as i32)
    .bind(&requirement.skills)
    .bind(&candidate.summary)
    .bind(&candidate.experiences)
    .bind(&candidate.projects)
    .bind(&analysis.match_result.matched_skills)
    .bind(&analysis.match_result.missing_skills)
    .bind(analysis.match_result.score)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(row)
}

/// All analyses, best score first.
pub async fn list_analyses(pool: &PgPool) -> Result<Vec<AnalysisRow>, AppError> {
    let rows = sqlx::query_as(
        "SELECT * FROM analyses ORDER BY score DESC, created_at DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Filtered analyses: position substring over the candidate and JD titles,
/// minimum candidate years, and any-of skill substrings.
pub async fn filter_analyses(
    pool: &PgPool,
    filters: &SearchFilters,
) -> Result<Vec<AnalysisRow>, AppError> {
    let position_pattern = filters
        .position
        .as_deref()
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .map(|p| format!("%{p}%"))
        .unwrap_or_default();
    let skill_patterns: Vec<String> = filters
        .skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{s}%"))
        .collect();

    let rows = sqlx::query_as(
        r#"
        SELECT * FROM analyses
        WHERE ($1 = '' OR candidate_position ILIKE $1 OR target_position ILIKE $1)
          AND candidate_years >= $2
          AND (cardinality($3::text[]) = 0
               OR array_to_string(candidate_skills, ',') ILIKE ANY($3::text[]))
        ORDER BY score DESC, created_at DESC
        "#,
    )
    .bind(position_pattern)
    .bind(filters.min_years)
    .bind(&skill_patterns)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
