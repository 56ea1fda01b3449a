use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::matching::profile::CandidateProfile;
use crate::matching::ranker::{recommend, Page, PageRequest, ScoredJob};
use crate::matching::scorer::MatchScorer;
use crate::store::PortalStore;

/// Loads the candidate (plus primary resume) and all approved jobs, then ranks them.
pub async fn recommend_for_candidate(
    store: &dyn PortalStore,
    scorer: &dyn MatchScorer,
    candidate_id: Uuid,
    request: PageRequest,
    now: DateTime<Utc>,
) -> Result<Page<ScoredJob>, AppError> {
    let candidate = store
        .find_candidate(candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;

    let primary_resume = store.primary_resume(candidate_id).await?;
    let profile = CandidateProfile::from_candidate(&candidate, primary_resume.as_ref());
    let jobs = store.approved_jobs().await?;

    info!(
        %candidate_id,
        jobs = jobs.len(),
        with_resume = primary_resume.is_some(),
        page = request.page,
        size = request.size,
        "Ranking job recommendations"
    );

    Ok(recommend(scorer, &profile, jobs, request, now))
}
