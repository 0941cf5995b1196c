//! Formatting, form editing and label endpoints. None of these touch storage.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{success, ApiResult, AppJson};
use crate::form::{self, FormAction};
use crate::format::format_post;
use crate::models::{label_tables, LabelEntry, PostRecord};

#[derive(Debug, Serialize)]
pub struct FormattedText {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct ApplyActionRequest {
    pub post: PostRecord,
    pub action: FormAction,
}

/// The next record version with its rendered preview.
#[derive(Debug, Serialize)]
pub struct ApplyActionResponse {
    pub post: PostRecord,
    pub preview: String,
}

/// POST /api/format - Render a post record as shareable text.
pub async fn format_text(AppJson(post): AppJson<PostRecord>) -> ApiResult<FormattedText> {
    success(FormattedText {
        text: format_post(&post),
    })
}

/// POST /api/form/apply - Apply one edit and return the new record and preview.
pub async fn apply_form_action(
    AppJson(request): AppJson<ApplyActionRequest>,
) -> ApiResult<ApplyActionResponse> {
    let post = form::apply(&request.post, request.action)?;
    let preview = format_post(&post);
    success(ApplyActionResponse { post, preview })
}

/// GET /api/labels - Every enum's label and emoji table.
pub async fn get_labels() -> ApiResult<BTreeMap<&'static str, Vec<LabelEntry>>> {
    success(label_tables())
}
