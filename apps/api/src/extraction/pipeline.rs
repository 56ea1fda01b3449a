use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::reader::DocumentFormat;
use crate::models::{NewResume, ResumeRow};
use crate::state::AppState;

/// A resume file as received from the client.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub candidate_id: Uuid,
    pub file_name: String,
    pub bytes: Bytes,
    pub is_primary: bool,
}

/// Checks an upload before anything is stored. Returns the detected format.
pub fn validate_upload(
    file_name: &str,
    size: usize,
    max_bytes: usize,
) -> Result<DocumentFormat, AppError> {
    if size == 0 {
        return Err(AppError::Validation("File is empty".to_string()));
    }
    if file_name.trim().is_empty() {
        return Err(AppError::Validation("File name is missing".to_string()));
    }
    let format = DocumentFormat::from_path(file_name).map_err(|_| {
        AppError::Validation(
            "Invalid file type. Only PDF, DOC, and DOCX files are allowed".to_string(),
        )
    })?;
    if size > max_bytes {
        return Err(AppError::Validation(format!(
            "File size too large. Maximum size is {max_bytes} bytes"
        )));
    }
    Ok(format)
}

/// Last path component of a client-supplied file name.
fn base_name(file_name: &str) -> &str {
    file_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(file_name)
}

/// Stores the file, records the resume, then extracts it.
///
/// An extraction failure here does not undo the upload: the resume is returned without
/// derived fields and can be re-extracted later.
pub async fn upload_resume(state: &AppState, upload: ResumeUpload) -> Result<ResumeRow, AppError> {
    let file_name = base_name(&upload.file_name).to_string();
    let size = upload.bytes.len();
    let format = validate_upload(&file_name, size, state.config.max_upload_bytes)?;

    let candidate_id = upload.candidate_id;
    state
        .store
        .find_candidate(candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {candidate_id} not found")))?;

    let resume_id = Uuid::new_v4();
    let storage_key = format!("resumes/{candidate_id}/{resume_id}_{file_name}");
    state
        .storage
        .put(&storage_key, upload.bytes, format.content_type())
        .await?;

    let row = state
        .store
        .insert_resume(NewResume {
            id: resume_id,
            user_id: candidate_id,
            file_name,
            storage_key,
            file_size: i64::try_from(size).unwrap_or(i64::MAX),
            file_type: format.extension().to_string(),
            is_primary: upload.is_primary,
        })
        .await?;

    match extract_resume(state, row.id).await {
        Ok(extracted) => Ok(extracted),
        Err(e) => {
            warn!(
                %resume_id,
                error = %e,
                "Resume stored but text extraction failed"
            );
            Ok(row)
        }
    }
}

/// (Re-)extracts a stored resume and overwrites its derived fields.
pub async fn extract_resume(state: &AppState, resume_id: Uuid) -> Result<ResumeRow, AppError> {
    let resume = state
        .store
        .find_resume(resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;

    let doc = state
        .extractor
        .extract_file(state.reader.as_ref(), &resume.storage_key)
        .await?;

    info!(
        %resume_id,
        skills = %doc.skills,
        experience = %doc.experience,
        "Extracted resume"
    );

    state.store.save_extraction(resume_id, &doc).await
}
