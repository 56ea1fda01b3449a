use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::profile::{CandidateProfile, JobPosting};
use crate::matching::ranker::{Page, PageRequest, ScoredJob};
use crate::matching::scorer::MatchBreakdown;
use crate::matching::service::recommend_for_candidate;
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub size: Option<usize>,
}

/// GET /api/v1/candidates/:id/recommendations
pub async fn handle_recommendations(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<ScoredJob>>, AppError> {
    let request = validate_page(&query, state.config.max_page_size)?;
    let page = recommend_for_candidate(
        state.store.as_ref(),
        state.scorer.as_ref(),
        candidate_id,
        request,
        Utc::now(),
    )
    .await?;
    Ok(Json(page))
}

fn validate_page(query: &PageQuery, max_size: usize) -> Result<PageRequest, AppError> {
    let size = query.size.unwrap_or(DEFAULT_PAGE_SIZE);
    if !(1..=max_size).contains(&size) {
        return Err(AppError::Validation(format!(
            "size must be between 1 and {max_size}"
        )));
    }
    Ok(PageRequest {
        page: query.page.unwrap_or(0),
        size,
    })
}

#[derive(Debug, Deserialize)]
pub struct JobPostingInput {
    pub skills: Option<String>,
    pub experience: Option<String>,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub candidate: CandidateProfile,
    pub job: JobPostingInput,
}

/// POST /api/v1/match/score
pub async fn handle_score(
    State(state): State<AppState>,
    Json(req): Json<ScoreRequest>,
) -> Json<MatchBreakdown> {
    let posting = JobPosting {
        skills: req.job.skills.as_deref(),
        experience: req.job.experience.as_deref(),
        location: req.job.location.as_deref(),
        created_at: req.job.created_at,
    };
    Json(state.scorer.score(&req.candidate, &posting, Utc::now()))
}
