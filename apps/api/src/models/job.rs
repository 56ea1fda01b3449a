use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Moderation state a job must be in before candidates can see it.
pub const JOB_STATUS_APPROVED: &str = "approved";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub recruiter_id: Uuid,
    pub title: String,
    pub company: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
    pub skills: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub status: String,
    pub application_deadline: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
