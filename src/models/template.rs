//! Saved templates: named snapshots of a post record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::post::PostRecord;

/// A named, reusable copy of a post record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: i64,
    pub name: String,
    pub data: PostRecord,
    #[serde(with = "crate::models::timestamp::iso_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::models::timestamp::iso_millis")]
    pub updated_at: DateTime<Utc>,
}

/// Request body for saving a new template.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplateRequest {
    pub name: String,
    pub data: PostRecord,
}

/// Request body for editing a template. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplateRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub data: Option<PostRecord>,
}
