//! Recommendation Ranker: scores every approved job for a candidate, sorts, and pages.
//!
//! Full scan and full sort per request: O(n log n) in the number of approved jobs, nothing
//! cached between calls. Fine at portal scale; a bounded top-K heap would be the next step
//! if job volume grows, at the cost of the exact total ordering beyond the requested page.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matching::profile::CandidateProfile;
use crate::matching::scorer::{MatchBreakdown, MatchScorer};
use crate::models::JobRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

/// A job together with how well it matches the candidate.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredJob {
    pub job: JobRow,
    pub match_score: f64,
    pub breakdown: MatchBreakdown,
}

/// Scores `jobs` for `candidate`, sorts by score descending, and returns the requested page.
///
/// The sort is stable: equal scores keep their input order.
pub fn recommend(
    scorer: &dyn MatchScorer,
    candidate: &CandidateProfile,
    jobs: Vec<JobRow>,
    request: PageRequest,
    now: DateTime<Utc>,
) -> Page<ScoredJob> {
    let mut scored: Vec<ScoredJob> = jobs
        .into_iter()
        .map(|job| {
            let breakdown = scorer.score(candidate, &job.posting(), now);
            ScoredJob {
                match_score: breakdown.score,
                breakdown,
                job,
            }
        })
        .collect();

    // Highest match score first
    scored.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(Ordering::Equal)
    });

    paginate(scored, request)
}

/// Slices `[offset, offset + size)` out of `items`, bounded to its length.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> Page<T> {
    let total_elements = items.len();
    let start = request.offset().min(total_elements);
    let end = start.saturating_add(request.size).min(total_elements);
    let total_pages = if request.size == 0 {
        0
    } else {
        total_elements.div_ceil(request.size)
    };

    Page {
        content: items.into_iter().skip(start).take(end - start).collect(),
        page: request.page,
        size: request.size,
        total_elements,
        total_pages,
    }
}
