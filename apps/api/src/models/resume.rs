use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub storage_key: String,
    pub file_size: i64,
    pub file_type: String,
    pub is_primary: bool,
    /// Derived fields below are overwritten wholesale on every extraction.
    pub extracted_text: Option<String>,
    pub skills: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a freshly uploaded resume, before any extraction ran.
#[derive(Debug, Clone)]
pub struct NewResume {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub storage_key: String,
    pub file_size: i64,
    pub file_type: String,
    pub is_primary: bool,
}
