//! Match Scoring: candidate ↔ job relevance in [0, 1].
//!
//! `score = 0.4·skills + 0.3·experience + 0.2·location + 0.1·freshness`, clamped.
//!
//! A sub-score is only computed when both sides supplied the underlying string. When either
//! is missing its weighted term is omitted (contributes 0, weights are not renormalized).
//! Freshness is always present.
//!
//! `AppState` holds an `Arc<dyn MatchScorer>`; `WeightedMatchScorer` is the default.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::matching::profile::{CandidateProfile, JobPosting};

static YEARS_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\s*-\s*([0-9]+)\s*(?:years?|yrs?)").unwrap());
static YEARS_SINGLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)\s*(?:years?|yrs?)").unwrap());

/// Sub-score used when the job lists no skills at all.
const NEUTRAL_SKILLS_SCORE: f64 = 0.5;
/// Sub-score used when the job states no years requirement.
const NO_REQUIREMENT_EXPERIENCE_SCORE: f64 = 0.8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchWeights {
    pub skills: f64,
    pub experience: f64,
    pub location: f64,
    pub freshness: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            skills: 0.4,
            experience: 0.3,
            location: 0.2,
            freshness: 0.1,
        }
    }
}

/// Per-dimension sub-scores plus the combined score. `None` marks an omitted term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchBreakdown {
    pub skills: Option<f64>,
    pub experience: Option<f64>,
    pub location: Option<f64>,
    pub freshness: f64,
    pub score: f64,
}

/// The match scorer trait. Implementations must be deterministic for a given `now`.
pub trait MatchScorer: Send + Sync {
    fn score(
        &self,
        candidate: &CandidateProfile,
        job: &JobPosting<'_>,
        now: DateTime<Utc>,
    ) -> MatchBreakdown;
}

#[derive(Debug, Clone, Default)]
pub struct WeightedMatchScorer {
    weights: MatchWeights,
}

impl WeightedMatchScorer {
    pub fn new(weights: MatchWeights) -> Self {
        Self { weights }
    }
}

impl MatchScorer for WeightedMatchScorer {
    fn score(
        &self,
        candidate: &CandidateProfile,
        job: &JobPosting<'_>,
        now: DateTime<Utc>,
    ) -> MatchBreakdown {
        let skills = both(candidate.skills.as_deref(), job.skills).map(|(c, j)| skills_match(c, j));
        let experience = both(candidate.experience.as_deref(), job.experience)
            .map(|(c, j)| experience_match(c, j));
        let location =
            both(candidate.location.as_deref(), job.location).map(|(c, j)| location_match(c, j));
        let freshness = freshness_score(job.created_at, now);

        let w = &self.weights;
        let score = (skills.map_or(0.0, |s| w.skills * s)
            + experience.map_or(0.0, |s| w.experience * s)
            + location.map_or(0.0, |s| w.location * s)
            + w.freshness * freshness)
            .clamp(0.0, 1.0);

        MatchBreakdown {
            skills,
            experience,
            location,
            freshness,
            score,
        }
    }
}

fn both<'a>(a: Option<&'a str>, b: Option<&'a str>) -> Option<(&'a str, &'a str)> {
    Some((a?, b?))
}

/// Fraction of the job's required skills the candidate lists.
pub fn skills_match(candidate_skills: &str, job_skills: &str) -> f64 {
    let required = skill_set(job_skills);
    if required.is_empty() {
        return NEUTRAL_SKILLS_SCORE;
    }
    let held = skill_set(candidate_skills);
    let covered = required.iter().filter(|s| held.contains(*s)).count();
    covered as f64 / required.len() as f64
}

/// Splits on `,` `;` and newlines; trimmed, lowercased, blanks dropped.
pub fn skill_set(text: &str) -> HashSet<String> {
    text.split([',', ';', '\n'])
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

pub fn experience_match(candidate_experience: &str, job_experience: &str) -> f64 {
    let required = experience_years(job_experience);
    if required == 0 {
        return NO_REQUIREMENT_EXPERIENCE_SCORE;
    }
    let held = experience_years(candidate_experience);
    let required_f = required as f64;

    if held >= required {
        1.0
    } else if held as f64 >= required_f * 0.7 {
        0.8
    } else if held as f64 >= required_f * 0.5 {
        0.6
    } else {
        0.3
    }
}

/// Whole years stated in `text`: the midpoint of an `N-M years` range, else `N years`,
/// else 0. Counts that do not fit a `u32` are 0.
pub fn experience_years(text: &str) -> u32 {
    let text = text.to_lowercase();

    if let Some(caps) = YEARS_RANGE.captures(&text) {
        let low = caps[1].parse::<u64>().ok();
        let high = caps[2].parse::<u64>().ok();
        if let (Some(low), Some(high)) = (low, high) {
            return u32::try_from(midpoint(low, high)).unwrap_or(0);
        }
    }

    YEARS_SINGLE
        .captures(&text)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .unwrap_or(0)
}

/// Floor of `(low + high) / 2` without overflowing.
fn midpoint(low: u64, high: u64) -> u64 {
    low / 2 + high / 2 + (low % 2 + high % 2) / 2
}

pub fn location_match(candidate_location: &str, job_location: &str) -> f64 {
    let job = job_location.to_lowercase();
    if job.contains("remote") {
        return 1.0;
    }
    let candidate = candidate_location.to_lowercase();

    if candidate == job {
        1.0
    } else if candidate.contains(&job) || job.contains(&candidate) {
        0.8
    } else {
        0.3
    }
}

/// Step score over whole calendar days since the job was posted.
pub fn freshness_score(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let days = (now.date_naive() - created_at.date_naive()).num_days();
    match days {
        d if d <= 7 => 1.0,
        d if d <= 30 => 0.8,
        d if d <= 60 => 0.6,
        _ => 0.4,
    }
}
