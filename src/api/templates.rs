//! Template API endpoints.

use axum::extract::{Path, State};

use super::{created, not_found, parse_id, success, ApiResult, AppJson};
use crate::errors::AppError;
use crate::models::{
    validate_post, CreateTemplateRequest, FieldError, Template, UpdateTemplateRequest,
};
use crate::AppState;

const NAME_REQUIRED: &str = "Template name is required";

/// GET /api/templates - List all templates in creation order.
pub async fn list_templates(State(state): State<AppState>) -> ApiResult<Vec<Template>> {
    success(state.templates.list().await?)
}

/// GET /api/templates/{id} - Get a single template.
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Template> {
    let id = parse_id(&id, "template")?;
    match state.templates.get(id).await? {
        Some(template) => success(template),
        None => Err(not_found("Template", id)),
    }
}

/// POST /api/templates - Save a new template.
pub async fn create_template(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateTemplateRequest>,
) -> ApiResult<Template> {
    let mut errors = Vec::new();
    if request.name.trim().is_empty() {
        errors.push(FieldError::new("name", NAME_REQUIRED));
    }
    errors.extend(validate_post("data", &request.data));
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    let template = state.templates.create(&request).await?;
    tracing::info!(id = template.id, kind = template.data.kind(), "Template created");
    created(template)
}

/// PUT /api/templates/{id} - Update a template's name and/or data.
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(request): AppJson<UpdateTemplateRequest>,
) -> ApiResult<Template> {
    let id = parse_id(&id, "template")?;

    let mut errors = Vec::new();
    if matches!(&request.name, Some(name) if name.trim().is_empty()) {
        errors.push(FieldError::new("name", NAME_REQUIRED));
    }
    if let Some(data) = &request.data {
        errors.extend(validate_post("data", data));
    }
    if !errors.is_empty() {
        return Err(AppError::validation(errors));
    }

    match state.templates.update(id, &request).await? {
        Some(template) => success(template),
        None => Err(not_found("Template", id)),
    }
}

/// DELETE /api/templates/{id} - Delete a template.
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, "template")?;
    if !state.templates.delete(id).await? {
        return Err(not_found("Template", id));
    }
    tracing::info!(id, "Template deleted");
    success(())
}
