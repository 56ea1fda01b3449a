use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::extractor::ExtractedDocument;
use crate::models::job::JOB_STATUS_APPROVED;
use crate::models::{CandidateRow, JobRow, NewResume, ResumeRow};
use crate::store::PortalStore;

#[derive(Clone)]
pub struct PgPortalStore {
    pool: PgPool,
}

impl PgPortalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PortalStore for PgPortalStore {
    async fn find_candidate(&self, id: Uuid) -> Result<Option<CandidateRow>, AppError> {
        Ok(
            sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn approved_jobs(&self) -> Result<Vec<JobRow>, AppError> {
        Ok(sqlx::query_as::<_, JobRow>(
            "SELECT * FROM jobs WHERE status = $1 ORDER BY created_at ASC, id ASC",
        )
        .bind(JOB_STATUS_APPROVED)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn primary_resume(&self, candidate_id: Uuid) -> Result<Option<ResumeRow>, AppError> {
        Ok(sqlx::query_as::<_, ResumeRow>(
            r#"
            SELECT * FROM resumes
            WHERE user_id = $1 AND is_primary
            ORDER BY uploaded_at DESC
            LIMIT 1
            "#,
        )
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn find_resume(&self, id: Uuid) -> Result<Option<ResumeRow>, AppError> {
        Ok(
            sqlx::query_as::<_, ResumeRow>("SELECT * FROM resumes WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn insert_resume(&self, resume: NewResume) -> Result<ResumeRow, AppError> {
        if resume.is_primary {
            let cleared = sqlx::query(
                "UPDATE resumes SET is_primary = FALSE, updated_at = NOW()
                 WHERE user_id = $1 AND is_primary",
            )
            .bind(resume.user_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
            if cleared > 0 {
                info!(
                    "Cleared primary flag on {cleared} resume(s) of candidate {}",
                    resume.user_id
                );
            }
        }

        let row = sqlx::query_as::<_, ResumeRow>(
            r#"
            INSERT INTO resumes
                (id, user_id, file_name, storage_key, file_size, file_type, is_primary)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(resume.id)
        .bind(resume.user_id)
        .bind(&resume.file_name)
        .bind(&resume.storage_key)
        .bind(resume.file_size)
        .bind(&resume.file_type)
        .bind(resume.is_primary)
        .fetch_one(&self.pool)
        .await?;

        info!("Inserted resume {} for candidate {}", row.id, row.user_id);
        Ok(row)
    }

    async fn save_extraction(
        &self,
        resume_id: Uuid,
        doc: &ExtractedDocument,
    ) -> Result<ResumeRow, AppError> {
        sqlx::query_as::<_, ResumeRow>(
            r#"
            UPDATE resumes
            SET extracted_text = $2, skills = $3, experience = $4, education = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(resume_id)
        .bind(&doc.raw_text)
        .bind(&doc.skills)
        .bind(&doc.experience)
        .bind(&doc.education)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))
    }
}
