//! Cross-reference API endpoints.

use axum::extract::{Path, State};

use super::{created, not_found, parse_id, success, ApiResult, AppJson};
use crate::errors::AppError;
use crate::models::{CreateCrossReferenceRequest, CrossReference};
use crate::AppState;

/// GET /api/incidents/{id}/cross-references - List links from an incident.
pub async fn list_cross_references(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<CrossReference>> {
    let incident_id = parse_id(&id, "incident")?;
    if !state.repo.incident_exists(incident_id).await? {
        return Err(not_found("Incident", incident_id));
    }
    success(state.repo.list_cross_references(incident_id).await?)
}

/// POST /api/incidents/{id}/cross-references - Link to another incident.
pub async fn create_cross_reference(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<CreateCrossReferenceRequest>,
) -> ApiResult<CrossReference> {
    let incident_id = parse_id(&id, "incident")?;
    if request.related_incident_id == incident_id {
        return Err(AppError::invalid_field(
            "relatedIncidentId",
            "An incident cannot reference itself",
        ));
    }
    if !state.repo.incident_exists(incident_id).await? {
        return Err(not_found("Incident", incident_id));
    }
    if !state.repo.incident_exists(request.related_incident_id).await? {
        return Err(AppError::invalid_field(
            "relatedIncidentId",
            "Related incident does not exist",
        ));
    }

    let link = state.repo.create_cross_reference(incident_id, &request).await?;
    tracing::info!(
        id = link.id,
        incident_id,
        related = link.related_incident_id,
        relationship = %link.relationship,
        "Cross-reference created"
    );
    created(link)
}

/// DELETE /api/cross-references/{id} - Remove a link.
pub async fn delete_cross_reference(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, "cross-reference")?;
    if !state.repo.delete_cross_reference(id).await? {
        return Err(not_found("Cross-reference", id));
    }
    success(())
}
