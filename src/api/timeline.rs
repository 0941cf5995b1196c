//! Timeline API endpoints.

use axum::extract::{Path, State};

use super::{created, not_found, parse_id, success, ApiResult, AppJson};
use crate::errors::AppError;
use crate::models::{
    timestamp, CreateTimelineEntryRequest, FieldError, TimelineEntry, UpdateTimelineEntryRequest,
};
use crate::AppState;

/// Check required fields and return the date in its stored ISO form.
///
/// Dates are kept normalised to UTC so text order is event order.
fn check_entry(date: Option<&str>, title: Option<&str>) -> Result<Option<String>, AppError> {
    let mut errors = Vec::new();
    let normalized = match date {
        Some(d) if d.trim().is_empty() => {
            errors.push(FieldError::new("date", "Date is required"));
            None
        }
        Some(d) => match timestamp::parse_iso(d) {
            Some(ts) => Some(timestamp::to_iso(&ts)),
            None => {
                errors.push(FieldError::new(
                    "date",
                    "Date must be an ISO-8601 date or timestamp",
                ));
                None
            }
        },
        None => None,
    };
    if matches!(title, Some(t) if t.trim().is_empty()) {
        errors.push(FieldError::new("title", "Title is required"));
    }
    if errors.is_empty() {
        Ok(normalized)
    } else {
        Err(AppError::validation(errors))
    }
}

/// GET /api/incidents/{id}/timeline - List entries, latest event first.
pub async fn list_timeline(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<TimelineEntry>> {
    let incident_id = parse_id(&id, "incident")?;
    if !state.repo.incident_exists(incident_id).await? {
        return Err(not_found("Incident", incident_id));
    }
    success(state.repo.list_timeline(incident_id).await?)
}

/// POST /api/incidents/{id}/timeline - Add an entry.
pub async fn create_timeline_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(mut request): AppJson<CreateTimelineEntryRequest>,
) -> ApiResult<TimelineEntry> {
    let incident_id = parse_id(&id, "incident")?;
    let date = check_entry(Some(request.date.as_str()), Some(request.title.as_str()))?;
    if let Some(date) = date {
        request.date = date;
    }
    if !state.repo.incident_exists(incident_id).await? {
        return Err(not_found("Incident", incident_id));
    }
    created(state.repo.create_timeline_entry(incident_id, &request).await?)
}

/// PUT /api/timeline/{id} - Update an entry.
pub async fn update_timeline_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(mut request): AppJson<UpdateTimelineEntryRequest>,
) -> ApiResult<TimelineEntry> {
    let id = parse_id(&id, "timeline entry")?;
    let date = check_entry(request.date.as_deref(), request.title.as_deref())?;
    if date.is_some() {
        request.date = date;
    }
    match state.repo.update_timeline_entry(id, &request).await? {
        Some(entry) => success(entry),
        None => Err(not_found("Timeline entry", id)),
    }
}

/// DELETE /api/timeline/{id} - Delete an entry.
pub async fn delete_timeline_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, "timeline entry")?;
    if !state.repo.delete_timeline_entry(id).await? {
        return Err(not_found("Timeline entry", id));
    }
    success(())
}
