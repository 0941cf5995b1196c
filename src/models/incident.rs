//! Incident tracking models: incidents and their evidence, timeline and cross-references.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::labels::{EvidenceType, IncidentStatus, Relationship, Severity, TimelineEntryType};

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// A tracked case with a free-form JSON payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Incident {
    pub id: i64,
    pub title: String,
    pub severity: Severity,
    pub status: IncidentStatus,
    pub data: serde_json::Value,
    #[serde(with = "crate::models::timestamp::iso_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::models::timestamp::iso_millis")]
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating a new incident.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncidentRequest {
    pub title: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub status: IncidentStatus,
    #[serde(default = "empty_object")]
    pub data: serde_json::Value,
}

/// Partial update of an incident.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIncidentRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default)]
    pub status: Option<IncidentStatus>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// One parsed row of a CSV import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedIncident {
    pub title: String,
    pub severity: Severity,
    pub status: IncidentStatus,
    pub created_at: DateTime<Utc>,
}

/// Result of a CSV import.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: usize,
}

/// A file attached to an incident.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceFile {
    pub id: i64,
    pub incident_id: i64,
    /// Name of the stored file inside the upload directory
    pub filename: String,
    pub original_name: String,
    #[serde(rename = "type")]
    pub evidence_type: EvidenceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub is_verified: bool,
    #[serde(with = "crate::models::timestamp::iso_millis")]
    pub uploaded_at: DateTime<Utc>,
}

/// Evidence metadata assembled from an accepted upload.
#[derive(Debug, Clone)]
pub struct NewEvidenceFile {
    pub incident_id: i64,
    pub filename: String,
    pub original_name: String,
    pub evidence_type: EvidenceType,
    pub description: Option<String>,
    pub source: Option<String>,
    pub file_size: i64,
    pub mime_type: String,
}

/// Request body for updating evidence metadata.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEvidenceRequest {
    #[serde(default, rename = "type")]
    pub evidence_type: Option<EvidenceType>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub is_verified: Option<bool>,
}

/// A dated event in an incident's progression.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub id: i64,
    pub incident_id: i64,
    pub date: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub entry_type: TimelineEntryType,
    #[serde(with = "crate::models::timestamp::iso_millis")]
    pub created_at: DateTime<Utc>,
}

/// Request body for adding a timeline entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimelineEntryRequest {
    pub date: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default, rename = "type")]
    pub entry_type: TimelineEntryType,
}

/// Partial update of a timeline entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTimelineEntryRequest {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub severity: Option<Severity>,
    #[serde(default, rename = "type")]
    pub entry_type: Option<TimelineEntryType>,
}

/// A directed, typed link from one incident to another.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossReference {
    pub id: i64,
    pub incident_id: i64,
    pub related_incident_id: i64,
    pub relationship: Relationship,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "crate::models::timestamp::iso_millis")]
    pub created_at: DateTime<Utc>,
}

/// Request body for linking an incident to another.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCrossReferenceRequest {
    pub related_incident_id: i64,
    #[serde(default)]
    pub relationship: Relationship,
    #[serde(default)]
    pub description: Option<String>,
}
