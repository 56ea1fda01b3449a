//! In-memory `PortalStore` / `ResumeStorage` doubles and row fixtures for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::extractor::ExtractedDocument;
use crate::models::job::JOB_STATUS_APPROVED;
use crate::models::{CandidateRow, JobRow, NewResume, ResumeRow};
use crate::store::{PortalStore, ResumeStorage};

/// Fixed "now" for anything freshness-dependent.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

pub fn candidate(
    skills: Option<&str>,
    experience: Option<&str>,
    location: Option<&str>,
) -> CandidateRow {
    CandidateRow {
        id: Uuid::new_v4(),
        name: "Test Candidate".to_string(),
        email: format!("{}@example.com", Uuid::new_v4()),
        location: location.map(String::from),
        skills: skills.map(String::from),
        experience: experience.map(String::from),
        education: None,
        created_at: fixed_now(),
    }
}

pub fn job(
    title: &str,
    skills: Option<&str>,
    experience: Option<&str>,
    location: Option<&str>,
    created_at: DateTime<Utc>,
) -> JobRow {
    JobRow {
        id: Uuid::new_v4(),
        recruiter_id: Uuid::new_v4(),
        title: title.to_string(),
        company: Some("Acme".to_string()),
        description: None,
        location: location.map(String::from),
        job_type: Some("FULL_TIME".to_string()),
        min_salary: None,
        max_salary: None,
        skills: skills.map(String::from),
        experience: experience.map(String::from),
        education: None,
        status: JOB_STATUS_APPROVED.to_string(),
        application_deadline: None,
        created_at,
        updated_at: created_at,
    }
}

#[derive(Default)]
pub struct MemoryStore {
    candidates: Mutex<Vec<CandidateRow>>,
    jobs: Mutex<Vec<JobRow>>,
    resumes: Mutex<Vec<ResumeRow>>,
}

impl MemoryStore {
    pub fn add_candidate(&self, candidate: CandidateRow) {
        self.candidates.lock().unwrap().push(candidate);
    }

    pub fn add_job(&self, job: JobRow) {
        self.jobs.lock().unwrap().push(job);
    }

    pub fn resumes_of(&self, candidate_id: Uuid) -> Vec<ResumeRow> {
        self.resumes
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == candidate_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl PortalStore for MemoryStore {
    async fn find_candidate(&self, id: Uuid) -> Result<Option<CandidateRow>, AppError> {
        Ok(self
            .candidates
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn approved_jobs(&self) -> Result<Vec<JobRow>, AppError> {
        let mut jobs: Vec<JobRow> = self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| j.status == JOB_STATUS_APPROVED)
            .cloned()
            .collect();
        jobs.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(jobs)
    }

    async fn primary_resume(&self, candidate_id: Uuid) -> Result<Option<ResumeRow>, AppError> {
        Ok(self
            .resumes
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.user_id == candidate_id && r.is_primary)
            .cloned())
    }

    async fn find_resume(&self, id: Uuid) -> Result<Option<ResumeRow>, AppError> {
        Ok(self
            .resumes
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn insert_resume(&self, resume: NewResume) -> Result<ResumeRow, AppError> {
        let mut resumes = self.resumes.lock().unwrap();
        if resume.is_primary {
            for existing in resumes.iter_mut().filter(|r| r.user_id == resume.user_id) {
                existing.is_primary = false;
            }
        }
        let now = Utc::now();
        let row = ResumeRow {
            id: resume.id,
            user_id: resume.user_id,
            file_name: resume.file_name,
            storage_key: resume.storage_key,
            file_size: resume.file_size,
            file_type: resume.file_type,
            is_primary: resume.is_primary,
            extracted_text: None,
            skills: None,
            experience: None,
            education: None,
            uploaded_at: now,
            updated_at: now,
        };
        resumes.push(row.clone());
        Ok(row)
    }

    async fn save_extraction(
        &self,
        resume_id: Uuid,
        doc: &ExtractedDocument,
    ) -> Result<ResumeRow, AppError> {
        let mut resumes = self.resumes.lock().unwrap();
        let row = resumes
            .iter_mut()
            .find(|r| r.id == resume_id)
            .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;
        row.extracted_text = Some(doc.raw_text.clone());
        row.skills = Some(doc.skills.clone());
        row.experience = Some(doc.experience.clone());
        row.education = Some(doc.education.clone());
        row.updated_at = Utc::now();
        Ok(row.clone())
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    objects: Mutex<HashMap<String, Bytes>>,
}

impl MemoryStorage {
    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl ResumeStorage for MemoryStorage {
    async fn put(&self, key: &str, body: Bytes, _content_type: &str) -> Result<(), AppError> {
        self.objects.lock().unwrap().insert(key.to_string(), body);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, AppError> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| AppError::Storage(format!("No object at '{key}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_resume(user_id: Uuid, is_primary: bool) -> NewResume {
        NewResume {
            id: Uuid::new_v4(),
            user_id,
            file_name: "cv.pdf".to_string(),
            storage_key: "resumes/cv.pdf".to_string(),
            file_size: 10,
            file_type: "pdf".to_string(),
            is_primary,
        }
    }

    #[tokio::test]
    async fn test_new_primary_clears_previous_primary() {
        let store = MemoryStore::default();
        let user = Uuid::new_v4();
        let first = store.insert_resume(new_resume(user, true)).await.unwrap();
        let second = store.insert_resume(new_resume(user, true)).await.unwrap();

        let primary = store.primary_resume(user).await.unwrap().unwrap();
        assert_eq!(primary.id, second.id);
        let first_now = store.find_resume(first.id).await.unwrap().unwrap();
        assert!(!first_now.is_primary);
    }

    #[tokio::test]
    async fn test_approved_jobs_skips_other_statuses() {
        let store = MemoryStore::default();
        let mut pending = job("Pending", None, None, None, fixed_now());
        pending.status = "pending".to_string();
        store.add_job(pending);
        store.add_job(job("Live", None, None, None, fixed_now()));

        let jobs = store.approved_jobs().await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Live");
    }
}
