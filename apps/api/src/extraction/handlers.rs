use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::extractor::ExtractedDocument;
use crate::extraction::pipeline::{extract_resume, upload_resume, ResumeUpload};
use crate::models::ResumeRow;
use crate::state::AppState;

/// POST /api/v1/candidates/:id/resumes
///
/// Multipart body: `file` (the resume) and an optional `is_primary` flag.
pub async fn handle_upload(
    State(state): State<AppState>,
    Path(candidate_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    let mut file: Option<(String, bytes::Bytes)> = None;
    let mut is_primary = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let body = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                file = Some((file_name, body));
            }
            Some("is_primary") => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read is_primary: {e}")))?;
                is_primary = parse_flag(&raw)?;
            }
            _ => {}
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| AppError::Validation("Missing multipart field 'file'".to_string()))?;

    let row = upload_resume(
        &state,
        ResumeUpload {
            candidate_id,
            file_name,
            bytes,
            is_primary,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(row)))
}

fn parse_flag(raw: &str) -> Result<bool, AppError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" => Ok(false),
        "true" | "1" | "on" => Ok(true),
        other => Err(AppError::Validation(format!(
            "is_primary must be true or false, got '{other}'"
        ))),
    }
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    let resume = state
        .store
        .find_resume(resume_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Resume {resume_id} not found")))?;
    Ok(Json(resume))
}

/// POST /api/v1/resumes/:id/extract
pub async fn handle_reextract(
    State(state): State<AppState>,
    Path(resume_id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    Ok(Json(extract_resume(&state, resume_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct ExtractTextRequest {
    pub text: String,
}

/// POST /api/v1/extract
/// Runs extraction over already-decoded text. Nothing is stored.
pub async fn handle_extract_text(
    State(state): State<AppState>,
    Json(req): Json<ExtractTextRequest>,
) -> Json<ExtractedDocument> {
    Json(state.extractor.extract(&req.text))
}
