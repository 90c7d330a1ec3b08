use axum::extract::{Multipart, Query, State};
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::analysis::AnalysisRow;
use crate::screening::query::parse_query;
use crate::screening::store::{filter_analyses, list_analyses, save_analysis, SearchFilters};
use crate::screening::{pipeline, reader};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub id: Uuid,
    pub name: String,
    pub candidate_position: Option<String>,
    pub score: f64,
    pub message: String,
}

/// POST /api/v1/analyses — multipart upload: a résumé file plus a `jd_text`
/// form field. Decodes, runs the full pipeline and persists the outcome.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut jd_text: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
                file = Some((file_name, data));
            }
            "jd_text" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read jd_text: {e}")))?;
                jd_text = Some(text);
            }
            _ => {}
        }
    }

    let (file_name, data) =
        file.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    let jd_text = jd_text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Missing 'jd_text' field".to_string()))?;

    let cv_text = reader::decode_document(&file_name, &data)?;
    info!(
        file = file_name,
        chars = cv_text.len(),
        lines = cv_text.lines().count(),
        "decoded résumé document"
    );

    // Candidate extraction mandates a working AI adapter; without a
    // credential this request cannot proceed (the JD-only fallback does not
    // apply to the résumé path).
    let llm = state.llm.as_ref().ok_or_else(|| {
        AppError::Validation(
            "No AI credential configured. Set OPENAI_API_KEY, ANTHROPIC_API_KEY or GEMINI_API_KEY."
                .to_string(),
        )
    })?;

    let analysis = pipeline::analyze(&cv_text, &jd_text, llm).await?;
    let row = save_analysis(&state.db, &analysis).await?;

    Ok(Json(AnalyzeResponse {
        id: row.id,
        name: row.name.clone().unwrap_or_else(|| "(unknown)".to_string()),
        candidate_position: row.candidate_position.clone(),
        score: row.score,
        message: "Analysis complete".to_string(),
    }))
}

/// GET /api/v1/analyses — all analyses, best score first.
pub async fn handle_list(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnalysisRow>>, AppError> {
    Ok(Json(list_analyses(&state.db).await?))
}

#[derive(Debug, Deserialize)]
pub struct FilterParams {
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub min_years: i32,
    #[serde(default)]
    pub skill: Option<String>,
}

/// GET /api/v1/analyses/filter
pub async fn handle_filter(
    State(state): State<AppState>,
    Query(params): Query<FilterParams>,
) -> Result<Json<Vec<AnalysisRow>>, AppError> {
    let filters = SearchFilters {
        position: params.position,
        min_years: params.min_years.max(0),
        skills: params.skill.into_iter().collect(),
    };
    Ok(Json(filter_analyses(&state.db, &filters).await?))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// GET /api/v1/analyses/search — decomposes a natural-language query into
/// the same position/years/skill predicates as the filter endpoint.
pub async fn handle_search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<AnalysisRow>>, AppError> {
    if params.q.trim().is_empty() {
        return Ok(Json(vec![]));
    }
    let filters = parse_query(&params.q);
    Ok(Json(filter_analyses(&state.db, &filters).await?))
}
