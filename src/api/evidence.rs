//! Evidence file API endpoints.
//!
//! Uploads are size- and type-checked while the multipart body streams in;
//! nothing reaches the upload directory or the database until both pass.

use std::path::Path as FsPath;

use axum::extract::{multipart::MultipartRejection, Multipart, Path, State};

use super::{created, multipart_error, not_found, parse_id, success, ApiResult, AppJson};
use crate::errors::AppError;
use crate::models::{EvidenceFile, EvidenceType, NewEvidenceFile, UpdateEvidenceRequest};
use crate::AppState;

/// Content types accepted as evidence.
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/gif",
    "application/pdf",
    "video/mp4",
    "audio/mpeg",
];

/// The accepted `file` part, fully read.
struct Upload {
    original_name: String,
    mime_type: String,
    bytes: Vec<u8>,
}

/// Resolve the effective content type, falling back to the file extension
/// when the client sent none or a generic one.
fn resolve_mime(declared: Option<&str>, original_name: &str) -> String {
    let declared = declared
        .and_then(|m| m.split(';').next())
        .map(|m| m.trim().to_ascii_lowercase())
        .filter(|m| !m.is_empty() && m != "application/octet-stream");

    declared.unwrap_or_else(|| {
        mime_guess::from_path(original_name)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string()
    })
}

fn is_allowed(mime: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime)
}

/// Evidence category implied by a content type.
fn infer_type(mime: &str) -> EvidenceType {
    match mime.split('/').next() {
        Some("image") => EvidenceType::Photo,
        Some("video") => EvidenceType::Video,
        Some("audio") => EvidenceType::Audio,
        _ if mime == "application/pdf" => EvidenceType::Document,
        _ => EvidenceType::Other,
    }
}

/// Stored file name: a fresh UUID keeping the original extension.
fn stored_name(original_name: &str, mime: &str) -> String {
    let extension = FsPath::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
        .or_else(|| {
            mime_guess::get_mime_extensions_str(mime)
                .and_then(|exts| exts.first())
                .map(|e| e.to_string())
        });

    let id = uuid::Uuid::new_v4();
    match extension {
        Some(ext) => format!("{id}.{ext}"),
        None => id.to_string(),
    }
}

/// Remove a stored evidence file. A file that is already gone is not an error.
pub(crate) async fn remove_stored_file(upload_dir: &FsPath, filename: &str) {
    match tokio::fs::remove_file(upload_dir.join(filename)).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(filename, "Failed to remove evidence file: {}", e),
    }
}

fn optional_text(value: String) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

async fn ensure_incident(state: &AppState, incident_id: i64) -> Result<(), AppError> {
    if state.repo.incident_exists(incident_id).await? {
        Ok(())
    } else {
        Err(not_found("Incident", incident_id))
    }
}

/// GET /api/incidents/{id}/evidence - List evidence for an incident, newest first.
pub async fn list_evidence(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<EvidenceFile>> {
    let incident_id = parse_id(&id, "incident")?;
    ensure_incident(&state, incident_id).await?;
    success(state.repo.list_evidence(incident_id).await?)
}

/// POST /api/incidents/{id}/evidence - Upload an evidence file.
///
/// Expects a `file` part plus optional `type`, `description` and `source` parts.
pub async fn upload_evidence(
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<EvidenceFile> {
    let incident_id = parse_id(&id, "incident")?;
    ensure_incident(&state, incident_id).await?;
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let max_bytes = state.config.max_upload_bytes;
    let mut upload = None;
    let mut evidence_type = None;
    let mut description = None;
    let mut source = None;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let original_name = field
                    .file_name()
                    .map(str::to_string)
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| "upload".to_string());
                let mime_type = resolve_mime(field.content_type(), &original_name);
                if !is_allowed(&mime_type) {
                    return Err(AppError::UnsupportedMediaType(format!(
                        "File type {mime_type} is not allowed"
                    )));
                }

                // Past the limit the rest of the part is drained without buffering.
                let mut bytes = Vec::new();
                let mut oversized = false;
                while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
                    if oversized || bytes.len() + chunk.len() > max_bytes {
                        oversized = true;
                        continue;
                    }
                    bytes.extend_from_slice(&chunk);
                }
                if oversized {
                    return Err(AppError::UploadTooLarge(format!(
                        "File exceeds the {max_bytes} byte limit"
                    )));
                }

                upload = Some(Upload {
                    original_name,
                    mime_type,
                    bytes,
                });
            }
            "type" => {
                let raw = field.text().await.map_err(multipart_error)?;
                let parsed = EvidenceType::parse(&raw).ok_or_else(|| {
                    AppError::invalid_field("type", &format!("Unknown evidence type {raw:?}"))
                })?;
                evidence_type = Some(parsed);
            }
            "description" => {
                description = optional_text(field.text().await.map_err(multipart_error)?);
            }
            "source" => {
                source = optional_text(field.text().await.map_err(multipart_error)?);
            }
            other => tracing::debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    let upload = upload.ok_or_else(|| AppError::BadRequest("Missing `file` part".to_string()))?;

    let upload_dir = &state.config.upload_dir;
    let filename = stored_name(&upload.original_name, &upload.mime_type);
    tokio::fs::create_dir_all(upload_dir)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create upload directory: {e}")))?;
    tokio::fs::write(upload_dir.join(&filename), &upload.bytes)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to store upload: {e}")))?;

    let record = NewEvidenceFile {
        incident_id,
        filename: filename.clone(),
        original_name: upload.original_name,
        evidence_type: evidence_type.unwrap_or_else(|| infer_type(&upload.mime_type)),
        description,
        source,
        file_size: upload.bytes.len() as i64,
        mime_type: upload.mime_type,
    };

    match state.repo.create_evidence(&record).await {
        Ok(evidence) => {
            tracing::info!(
                id = evidence.id,
                incident_id,
                size = evidence.file_size,
                "Evidence uploaded"
            );
            created(evidence)
        }
        Err(e) => {
            remove_stored_file(upload_dir, &filename).await;
            Err(e)
        }
    }
}

/// PUT /api/evidence/{id} - Update type, description, source or verification.
pub async fn update_evidence(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateEvidenceRequest>,
) -> ApiResult<EvidenceFile> {
    let id = parse_id(&id, "evidence")?;
    match state.repo.update_evidence(id, &request).await? {
        Some(evidence) => success(evidence),
        None => Err(not_found("Evidence", id)),
    }
}

/// DELETE /api/evidence/{id} - Delete evidence and its stored file.
pub async fn delete_evidence(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, "evidence")?;
    let Some(evidence) = state.repo.delete_evidence(id).await? else {
        return Err(not_found("Evidence", id));
    };
    remove_stored_file(&state.config.upload_dir, &evidence.filename).await;
    success(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_mime() {
        assert_eq!(resolve_mime(Some("image/PNG"), "a.bin"), "image/png");
        assert_eq!(resolve_mime(Some("application/octet-stream"), "scan.pdf"), "application/pdf");
        assert_eq!(resolve_mime(None, "clip.mp4"), "video/mp4");
        assert_eq!(resolve_mime(None, "noext"), "application/octet-stream");
    }

    #[test]
    fn test_allow_list() {
        for mime in ALLOWED_MIME_TYPES {
            assert!(is_allowed(mime));
        }
        assert!(!is_allowed("text/html"));
        assert!(!is_allowed("image/svg+xml"));
    }

    #[test]
    fn test_infer_type() {
        assert_eq!(infer_type("image/gif"), EvidenceType::Photo);
        assert_eq!(infer_type("application/pdf"), EvidenceType::Document);
        assert_eq!(infer_type("audio/mpeg"), EvidenceType::Audio);
        assert_eq!(infer_type("video/mp4"), EvidenceType::Video);
    }

    #[test]
    fn test_stored_name_keeps_extension() {
        let name = stored_name("Photo.JPG", "image/jpeg");
        assert!(name.ends_with(".jpg"));
        assert_eq!(name.len(), 36 + 4);

        let name = stored_name("upload", "application/pdf");
        assert!(name.ends_with(".pdf"));
    }
}
