//! Incident API endpoints, including CSV export and import.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use super::{created, multipart_error, not_found, parse_id, success, ApiResult, AppJson};
use crate::csv_io;
use crate::errors::AppError;
use crate::models::{CreateIncidentRequest, ImportSummary, Incident, UpdateIncidentRequest};
use crate::AppState;

/// GET /api/incidents - List all incidents, newest first.
pub async fn list_incidents(State(state): State<AppState>) -> ApiResult<Vec<Incident>> {
    success(state.repo.list_incidents().await?)
}

/// GET /api/incidents/{id} - Get a single incident.
pub async fn get_incident(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Incident> {
    let id = parse_id(&id, "incident")?;
    match state.repo.get_incident(id).await? {
        Some(incident) => success(incident),
        None => Err(not_found("Incident", id)),
    }
}

/// POST /api/incidents - Create a new incident.
pub async fn create_incident(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateIncidentRequest>,
) -> ApiResult<Incident> {
    if request.title.trim().is_empty() {
        return Err(AppError::invalid_field("title", "Title is required"));
    }

    let incident = state.repo.create_incident(&request).await?;
    tracing::info!(id = incident.id, severity = %incident.severity, "Incident created");
    created(incident)
}

/// PUT /api/incidents/{id} - Partially update an incident.
pub async fn update_incident(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateIncidentRequest>,
) -> ApiResult<Incident> {
    let id = parse_id(&id, "incident")?;
    if matches!(&request.title, Some(title) if title.trim().is_empty()) {
        return Err(AppError::invalid_field("title", "Title is required"));
    }

    match state.repo.update_incident(id, &request).await? {
        Some(incident) => success(incident),
        None => Err(not_found("Incident", id)),
    }
}

/// DELETE /api/incidents/{id} - Delete an incident with its evidence, timeline and links.
pub async fn delete_incident(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, "incident")?;
    let Some(filenames) = state.repo.delete_incident(id).await? else {
        return Err(not_found("Incident", id));
    };

    for filename in &filenames {
        super::evidence::remove_stored_file(&state.config.upload_dir, filename).await;
    }
    tracing::info!(id, files = filenames.len(), "Incident deleted");
    success(())
}

/// GET /api/incidents/export - Download all incidents as CSV.
pub async fn export_incidents(State(state): State<AppState>) -> Result<Response, AppError> {
    let incidents = state.repo.list_incidents().await?;
    let body = csv_io::export_incidents(&incidents)
        .map_err(|e| AppError::Internal(format!("CSV export failed: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"incidents.csv\"",
            ),
        ],
        body,
    )
        .into_response())
}

/// POST /api/incidents/import - Create incidents from an uploaded CSV `file` part.
///
/// The import is all-or-nothing: one bad row rejects the whole file.
pub async fn import_incidents(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<ImportSummary> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let mut contents = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some("file") {
            contents = Some(field.bytes().await.map_err(multipart_error)?);
        }
    }
    let contents =
        contents.ok_or_else(|| AppError::BadRequest("Missing `file` part".to_string()))?;

    let rows = csv_io::parse_incident_import(&contents)?;
    let imported = state.repo.import_incidents(&rows).await?;
    tracing::info!(imported, "Incidents imported from CSV");
    created(ImportSummary { imported })
}
