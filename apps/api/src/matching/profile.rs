use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{CandidateRow, JobRow, ResumeRow};

/// The candidate side of a match. Fields stay optional: a missing field drops its
/// weighted term from the score instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub skills: Option<String>,
    pub experience: Option<String>,
    pub location: Option<String>,
}

impl CandidateProfile {
    /// Profile fields enriched with what was extracted from the primary resume.
    pub fn from_candidate(candidate: &CandidateRow, primary_resume: Option<&ResumeRow>) -> Self {
        let resume_skills = primary_resume.and_then(|r| r.skills.as_deref());
        let resume_experience = primary_resume.and_then(|r| r.experience.as_deref());

        Self {
            skills: combine(candidate.skills.as_deref(), resume_skills, ", "),
            experience: combine(candidate.experience.as_deref(), resume_experience, " "),
            location: candidate.location.clone(),
        }
    }
}

fn combine(profile: Option<&str>, resume: Option<&str>, separator: &str) -> Option<String> {
    match (profile, resume) {
        (Some(p), Some(r)) => Some(format!("{p}{separator}{r}")),
        (Some(p), None) => Some(p.to_string()),
        (None, Some(r)) => Some(r.to_string()),
        (None, None) => None,
    }
}

/// Read-only view of the job fields the scorer looks at.
#[derive(Debug, Clone, Copy)]
pub struct JobPosting<'a> {
    pub skills: Option<&'a str>,
    pub experience: Option<&'a str>,
    pub location: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

impl JobRow {
    pub fn posting(&self) -> JobPosting<'_> {
        JobPosting {
            skills: self.skills.as_deref(),
            experience: self.experience.as_deref(),
            location: self.location.as_deref(),
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::{candidate, fixed_now};
    use uuid::Uuid;

    fn resume(skills: Option<&str>, experience: Option<&str>) -> ResumeRow {
        ResumeRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            file_name: "cv.pdf".to_string(),
            storage_key: "resumes/cv.pdf".to_string(),
            file_size: 1,
            file_type: "pdf".to_string(),
            is_primary: true,
            extracted_text: None,
            skills: skills.map(String::from),
            experience: experience.map(String::from),
            education: None,
            uploaded_at: fixed_now(),
            updated_at: fixed_now(),
        }
    }

    #[test]
    fn test_profile_without_resume_is_candidate_fields() {
        let c = candidate(Some("Rust"), Some("4 years"), Some("Berlin"));
        let profile = CandidateProfile::from_candidate(&c, None);
        assert_eq!(profile.skills.as_deref(), Some("Rust"));
        assert_eq!(profile.experience.as_deref(), Some("4 years"));
        assert_eq!(profile.location.as_deref(), Some("Berlin"));
    }

    #[test]
    fn test_resume_fields_are_appended() {
        let c = candidate(Some("Rust"), Some("Backend"), None);
        let r = resume(Some("Docker, AWS"), Some("6 years"));
        let profile = CandidateProfile::from_candidate(&c, Some(&r));
        assert_eq!(profile.skills.as_deref(), Some("Rust, Docker, AWS"));
        assert_eq!(profile.experience.as_deref(), Some("Backend 6 years"));
        assert_eq!(profile.location, None);
    }

    #[test]
    fn test_resume_fills_missing_profile_fields() {
        let c = candidate(None, None, Some("Remote"));
        let r = resume(Some("Java"), None);
        let profile = CandidateProfile::from_candidate(&c, Some(&r));
        assert_eq!(profile.skills.as_deref(), Some("Java"));
        assert_eq!(profile.experience, None);
    }
}
