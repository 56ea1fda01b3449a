//! Persistence and file-storage collaborators.
//!
//! Handlers and pipelines only see the traits; `main` wires the Postgres and S3
//! implementations into `AppState`.

pub mod postgres;
pub mod s3;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::extractor::ExtractedDocument;
use crate::models::{CandidateRow, JobRow, NewResume, ResumeRow};

pub use postgres::PgPortalStore;
pub use s3::S3ResumeStorage;

/// Read/write access to candidates, jobs, and resumes.
#[async_trait]
pub trait PortalStore: Send + Sync {
    async fn find_candidate(&self, id: Uuid) -> Result<Option<CandidateRow>, AppError>;

    /// Every approved job, oldest first, ties broken by id.
    async fn approved_jobs(&self) -> Result<Vec<JobRow>, AppError>;

    async fn primary_resume(&self, candidate_id: Uuid) -> Result<Option<ResumeRow>, AppError>;

    async fn find_resume(&self, id: Uuid) -> Result<Option<ResumeRow>, AppError>;

    /// Inserts a resume. A primary resume un-flags the candidate's other resumes first.
    async fn insert_resume(&self, resume: NewResume) -> Result<ResumeRow, AppError>;

    /// Overwrites the derived fields of a resume with `doc`.
    async fn save_extraction(
        &self,
        resume_id: Uuid,
        doc: &ExtractedDocument,
    ) -> Result<ResumeRow, AppError>;
}

/// Raw bytes of uploaded resume files, addressed by storage key.
#[async_trait]
pub trait ResumeStorage: Send + Sync {
    async fn put(&self, key: &str, body: Bytes, content_type: &str) -> Result<(), AppError>;

    async fn get(&self, key: &str) -> Result<Bytes, AppError>;
}
