//! Database repository for incident tracking.
//!
//! Uses prepared statements, and a transaction where several rows must change together.

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use super::lock_row;
use crate::errors::AppError;
use crate::models::{
    timestamp, CreateCrossReferenceRequest, CreateIncidentRequest, CreateTimelineEntryRequest,
    CrossReference, EvidenceFile, EvidenceType, ImportedIncident, Incident, IncidentStatus,
    NewEvidenceFile, Relationship, Severity, TimelineEntry, TimelineEntryType,
    UpdateEvidenceRequest, UpdateIncidentRequest, UpdateTimelineEntryRequest,
};

const INCIDENT_COLUMNS: &str = "id, title, severity, status, data, created_at, updated_at";
const EVIDENCE_COLUMNS: &str = "id, incident_id, filename, original_name, type, description, \
     source, file_size, mime_type, is_verified, uploaded_at";
const TIMELINE_COLUMNS: &str =
    "id, incident_id, date, title, description, severity, type, created_at";
const CROSS_REFERENCE_COLUMNS: &str =
    "id, incident_id, related_incident_id, relationship, description, created_at";

/// Database repository for incidents and their child records.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== INCIDENT OPERATIONS ====================

    /// List all incidents, newest first.
    pub async fn list_incidents(&self) -> Result<Vec<Incident>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {INCIDENT_COLUMNS} FROM incidents ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(incident_from_row).collect()
    }

    /// Get an incident by ID.
    pub async fn get_incident(&self, id: i64) -> Result<Option<Incident>, AppError> {
        let row = sqlx::query(&format!("SELECT {INCIDENT_COLUMNS} FROM incidents WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(incident_from_row).transpose()
    }

    pub async fn incident_exists(&self, id: i64) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT 1 FROM incidents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Create a new incident.
    pub async fn create_incident(
        &self,
        request: &CreateIncidentRequest,
    ) -> Result<Incident, AppError> {
        let now = timestamp::now();
        let data = serde_json::to_string(&request.data)?;

        let result = sqlx::query(
            "INSERT INTO incidents (title, severity, status, data, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&request.title)
        .bind(request.severity.as_str())
        .bind(request.status.as_str())
        .bind(&data)
        .bind(timestamp::to_iso(&now))
        .bind(timestamp::to_iso(&now))
        .execute(&self.pool)
        .await?;

        Ok(Incident {
            id: result.last_insert_rowid(),
            title: request.title.clone(),
            severity: request.severity,
            status: request.status,
            data: request.data.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update. Returns `None` when the incident does not exist.
    pub async fn update_incident(
        &self,
        id: i64,
        request: &UpdateIncidentRequest,
    ) -> Result<Option<Incident>, AppError> {
        let mut tx = self.pool.begin().await?;
        if !lock_row(&mut tx, "incidents", id).await? {
            tx.rollback().await?;
            return Ok(None);
        }

        let row = sqlx::query(&format!("SELECT {INCIDENT_COLUMNS} FROM incidents WHERE id = ?"))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        let existing = incident_from_row(&row)?;

        let updated = Incident {
            id,
            title: request.title.clone().unwrap_or(existing.title),
            severity: request.severity.unwrap_or(existing.severity),
            status: request.status.unwrap_or(existing.status),
            data: request.data.clone().unwrap_or(existing.data),
            created_at: existing.created_at,
            updated_at: timestamp::after(existing.updated_at),
        };
        let data = serde_json::to_string(&updated.data)?;

        sqlx::query(
            "UPDATE incidents SET title = ?, severity = ?, status = ?, data = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&updated.title)
        .bind(updated.severity.as_str())
        .bind(updated.status.as_str())
        .bind(&data)
        .bind(timestamp::to_iso(&updated.updated_at))
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    /// Delete an incident and, by cascade, its child rows.
    ///
    /// Returns the stored evidence file names so the caller can remove them
    /// from disk, or `None` when the incident does not exist.
    pub async fn delete_incident(&self, id: i64) -> Result<Option<Vec<String>>, AppError> {
        let mut tx = self.pool.begin().await?;

        let filenames: Vec<String> =
            sqlx::query_scalar("SELECT filename FROM evidence_files WHERE incident_id = ?")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        let result = sqlx::query("DELETE FROM incidents WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(filenames))
    }

    /// Insert parsed CSV rows in a single transaction. Nothing is kept if any insert fails.
    pub async fn import_incidents(&self, rows: &[ImportedIncident]) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;

        for row in rows {
            let created_at = timestamp::to_iso(&row.created_at);
            sqlx::query(
                "INSERT INTO incidents (title, severity, status, data, created_at, updated_at) VALUES (?, ?, ?, '{}', ?, ?)",
            )
            .bind(&row.title)
            .bind(row.severity.as_str())
            .bind(row.status.as_str())
            .bind(&created_at)
            .bind(&created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(rows.len())
    }

    // ==================== EVIDENCE OPERATIONS ====================

    /// List evidence for an incident, newest upload first.
    pub async fn list_evidence(&self, incident_id: i64) -> Result<Vec<EvidenceFile>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {EVIDENCE_COLUMNS} FROM evidence_files WHERE incident_id = ? ORDER BY uploaded_at DESC, id DESC"
        ))
        .bind(incident_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(evidence_from_row).collect()
    }

    pub async fn get_evidence(&self, id: i64) -> Result<Option<EvidenceFile>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {EVIDENCE_COLUMNS} FROM evidence_files WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(evidence_from_row).transpose()
    }

    /// Record an accepted upload. Evidence always starts unverified.
    pub async fn create_evidence(&self, file: &NewEvidenceFile) -> Result<EvidenceFile, AppError> {
        let now = timestamp::now();

        let result = sqlx::query(
            "INSERT INTO evidence_files (incident_id, filename, original_name, type, description, source, file_size, mime_type, is_verified, uploaded_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 0, ?)",
        )
        .bind(file.incident_id)
        .bind(&file.filename)
        .bind(&file.original_name)
        .bind(file.evidence_type.as_str())
        .bind(&file.description)
        .bind(&file.source)
        .bind(file.file_size)
        .bind(&file.mime_type)
        .bind(timestamp::to_iso(&now))
        .execute(&self.pool)
        .await?;

        Ok(EvidenceFile {
            id: result.last_insert_rowid(),
            incident_id: file.incident_id,
            filename: file.filename.clone(),
            original_name: file.original_name.clone(),
            evidence_type: file.evidence_type,
            description: file.description.clone(),
            source: file.source.clone(),
            file_size: Some(file.file_size),
            mime_type: Some(file.mime_type.clone()),
            is_verified: false,
            uploaded_at: now,
        })
    }

    /// Update evidence metadata. Returns `None` when the evidence does not exist.
    pub async fn update_evidence(
        &self,
        id: i64,
        request: &UpdateEvidenceRequest,
    ) -> Result<Option<EvidenceFile>, AppError> {
        let mut tx = self.pool.begin().await?;
        if !lock_row(&mut tx, "evidence_files", id).await? {
            tx.rollback().await?;
            return Ok(None);
        }

        let row = sqlx::query(&format!(
            "SELECT {EVIDENCE_COLUMNS} FROM evidence_files WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        let mut evidence = evidence_from_row(&row)?;

        if let Some(evidence_type) = request.evidence_type {
            evidence.evidence_type = evidence_type;
        }
        if let Some(description) = &request.description {
            evidence.description = Some(description.clone());
        }
        if let Some(source) = &request.source {
            evidence.source = Some(source.clone());
        }
        if let Some(is_verified) = request.is_verified {
            evidence.is_verified = is_verified;
        }

        sqlx::query(
            "UPDATE evidence_files SET type = ?, description = ?, source = ?, is_verified = ? WHERE id = ?",
        )
        .bind(evidence.evidence_type.as_str())
        .bind(&evidence.description)
        .bind(&evidence.source)
        .bind(evidence.is_verified as i32)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(evidence))
    }

    /// Delete an evidence row, returning it so the stored file can be removed.
    pub async fn delete_evidence(&self, id: i64) -> Result<Option<EvidenceFile>, AppError> {
        let mut tx = self.pool.begin().await?;
        if !lock_row(&mut tx, "evidence_files", id).await? {
            tx.rollback().await?;
            return Ok(None);
        }

        let row = sqlx::query(&format!(
            "SELECT {EVIDENCE_COLUMNS} FROM evidence_files WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        let evidence = evidence_from_row(&row)?;

        sqlx::query("DELETE FROM evidence_files WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(evidence))
    }

    // ==================== TIMELINE OPERATIONS ====================

    /// List timeline entries for an incident, latest event first.
    pub async fn list_timeline(&self, incident_id: i64) -> Result<Vec<TimelineEntry>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {TIMELINE_COLUMNS} FROM incident_timelines WHERE incident_id = ? ORDER BY date DESC, id DESC"
        ))
        .bind(incident_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(timeline_from_row).collect()
    }

    pub async fn get_timeline_entry(&self, id: i64) -> Result<Option<TimelineEntry>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {TIMELINE_COLUMNS} FROM incident_timelines WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(timeline_from_row).transpose()
    }

    pub async fn create_timeline_entry(
        &self,
        incident_id: i64,
        request: &CreateTimelineEntryRequest,
    ) -> Result<TimelineEntry, AppError> {
        let now = timestamp::now();

        let result = sqlx::query(
            "INSERT INTO incident_timelines (incident_id, date, title, description, severity, type, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(incident_id)
        .bind(&request.date)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.severity.as_str())
        .bind(request.entry_type.as_str())
        .bind(timestamp::to_iso(&now))
        .execute(&self.pool)
        .await?;

        Ok(TimelineEntry {
            id: result.last_insert_rowid(),
            incident_id,
            date: request.date.clone(),
            title: request.title.clone(),
            description: request.description.clone(),
            severity: request.severity,
            entry_type: request.entry_type,
            created_at: now,
        })
    }

    pub async fn update_timeline_entry(
        &self,
        id: i64,
        request: &UpdateTimelineEntryRequest,
    ) -> Result<Option<TimelineEntry>, AppError> {
        let mut tx = self.pool.begin().await?;
        if !lock_row(&mut tx, "incident_timelines", id).await? {
            tx.rollback().await?;
            return Ok(None);
        }

        let row = sqlx::query(&format!(
            "SELECT {TIMELINE_COLUMNS} FROM incident_timelines WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        let mut entry = timeline_from_row(&row)?;

        if let Some(date) = &request.date {
            entry.date = date.clone();
        }
        if let Some(title) = &request.title {
            entry.title = title.clone();
        }
        if let Some(description) = &request.description {
            entry.description = Some(description.clone());
        }
        if let Some(severity) = request.severity {
            entry.severity = severity;
        }
        if let Some(entry_type) = request.entry_type {
            entry.entry_type = entry_type;
        }

        sqlx::query(
            "UPDATE incident_timelines SET date = ?, title = ?, description = ?, severity = ?, type = ? WHERE id = ?",
        )
        .bind(&entry.date)
        .bind(&entry.title)
        .bind(&entry.description)
        .bind(entry.severity.as_str())
        .bind(entry.entry_type.as_str())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(entry))
    }

    pub async fn delete_timeline_entry(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM incident_timelines WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ==================== CROSS-REFERENCE OPERATIONS ====================

    /// List links from an incident, newest first.
    pub async fn list_cross_references(
        &self,
        incident_id: i64,
    ) -> Result<Vec<CrossReference>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {CROSS_REFERENCE_COLUMNS} FROM incident_cross_references WHERE incident_id = ? ORDER BY created_at DESC, id DESC"
        ))
        .bind(incident_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(cross_reference_from_row).collect()
    }

    pub async fn create_cross_reference(
        &self,
        incident_id: i64,
        request: &CreateCrossReferenceRequest,
    ) -> Result<CrossReference, AppError> {
        let now = timestamp::now();

        let result = sqlx::query(
            "INSERT INTO incident_cross_references (incident_id, related_incident_id, relationship, description, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(incident_id)
        .bind(request.related_incident_id)
        .bind(request.relationship.as_str())
        .bind(&request.description)
        .bind(timestamp::to_iso(&now))
        .execute(&self.pool)
        .await?;

        Ok(CrossReference {
            id: result.last_insert_rowid(),
            incident_id,
            related_incident_id: request.related_incident_id,
            relationship: request.relationship,
            description: request.description.clone(),
            created_at: now,
        })
    }

    pub async fn delete_cross_reference(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM incident_cross_references WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

// Helper functions for row conversion

/// Decode an enum column stored as its wire value.
fn label<T>(row: &SqliteRow, column: &str, parse: fn(&str) -> Option<T>) -> Result<T, AppError> {
    let value: String = row.try_get(column)?;
    parse(&value).ok_or_else(|| {
        AppError::Database(format!("Unexpected value {value:?} in column {column}"))
    })
}

fn timestamp_column(row: &SqliteRow, column: &str) -> Result<DateTime<Utc>, AppError> {
    Ok(row.try_get(column)?)
}

fn incident_from_row(row: &SqliteRow) -> Result<Incident, AppError> {
    let data: String = row.try_get("data")?;
    Ok(Incident {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        severity: label(row, "severity", Severity::parse)?,
        status: label(row, "status", IncidentStatus::parse)?,
        data: serde_json::from_str(&data)?,
        created_at: timestamp_column(row, "created_at")?,
        updated_at: timestamp_column(row, "updated_at")?,
    })
}

fn evidence_from_row(row: &SqliteRow) -> Result<EvidenceFile, AppError> {
    let is_verified: i32 = row.try_get("is_verified")?;
    Ok(EvidenceFile {
        id: row.try_get("id")?,
        incident_id: row.try_get("incident_id")?,
        filename: row.try_get("filename")?,
        original_name: row.try_get("original_name")?,
        evidence_type: label(row, "type", EvidenceType::parse)?,
        description: row.try_get("description")?,
        source: row.try_get("source")?,
        file_size: row.try_get("file_size")?,
        mime_type: row.try_get("mime_type")?,
        is_verified: is_verified != 0,
        uploaded_at: timestamp_column(row, "uploaded_at")?,
    })
}

fn timeline_from_row(row: &SqliteRow) -> Result<TimelineEntry, AppError> {
    Ok(TimelineEntry {
        id: row.try_get("id")?,
        incident_id: row.try_get("incident_id")?,
        date: row.try_get("date")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        severity: label(row, "severity", Severity::parse)?,
        entry_type: label(row, "type", TimelineEntryType::parse)?,
        created_at: timestamp_column(row, "created_at")?,
    })
}

fn cross_reference_from_row(row: &SqliteRow) -> Result<CrossReference, AppError> {
    Ok(CrossReference {
        id: row.try_get("id")?,
        incident_id: row.try_get("incident_id")?,
        related_incident_id: row.try_get("related_incident_id")?,
        relationship: label(row, "relationship", Relationship::parse)?,
        description: row.try_get("description")?,
        created_at: timestamp_column(row, "created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use serde_json::json;
    use tempfile::TempDir;

    async fn repo() -> (Repository, TempDir) {
        let dir = TempDir::new().unwrap();
        let pool = init_database(&dir.path().join("test.sqlite")).await.unwrap();
        (Repository::new(pool), dir)
    }

    fn incident(title: &str) -> CreateIncidentRequest {
        CreateIncidentRequest {
            title: title.to_string(),
            severity: Severity::High,
            status: IncidentStatus::Investigating,
            data: json!({ "location": "Springfield" }),
        }
    }

    fn imported(title: &str, created_at: &str) -> ImportedIncident {
        ImportedIncident {
            title: title.to_string(),
            severity: Severity::Low,
            status: IncidentStatus::Resolved,
            created_at: timestamp::parse_iso(created_at).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_incident_crud() {
        let (repo, _dir) = repo().await;
        let created = repo.create_incident(&incident("Hoarding case")).await.unwrap();
        assert_eq!(created.created_at, created.updated_at);

        let fetched = repo.get_incident(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.data["location"], "Springfield");
        assert_eq!(fetched.severity, Severity::High);

        let updated = repo
            .update_incident(
                created.id,
                &UpdateIncidentRequest {
                    status: Some(IncidentStatus::Blacklisted),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, IncidentStatus::Blacklisted);
        assert_eq!(updated.title, "Hoarding case");
        assert!(updated.updated_at > created.updated_at);

        assert_eq!(repo.delete_incident(created.id).await.unwrap(), Some(vec![]));
        assert!(repo.get_incident(created.id).await.unwrap().is_none());
        assert_eq!(repo.delete_incident(created.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_incidents_list_newest_first() {
        let (repo, _dir) = repo().await;
        repo.import_incidents(&[
            imported("Older", "2025-01-01T09:00:00.000Z"),
            imported("Newer", "2025-01-05T10:00:00.000Z"),
        ])
        .await
        .unwrap();

        let titles: Vec<String> = repo
            .list_incidents()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.title)
            .collect();
        assert_eq!(titles, vec!["Newer", "Older"]);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_children() {
        let (repo, _dir) = repo().await;
        let a = repo.create_incident(&incident("A")).await.unwrap();
        let b = repo.create_incident(&incident("B")).await.unwrap();

        repo.create_evidence(&NewEvidenceFile {
            incident_id: a.id,
            filename: "stored.png".to_string(),
            original_name: "photo.png".to_string(),
            evidence_type: EvidenceType::Photo,
            description: None,
            source: None,
            file_size: 4,
            mime_type: "image/png".to_string(),
        })
        .await
        .unwrap();
        repo.create_timeline_entry(
            a.id,
            &CreateTimelineEntryRequest {
                date: "2025-01-02".to_string(),
                title: "Reported".to_string(),
                description: None,
                severity: Severity::Medium,
                entry_type: TimelineEntryType::Report,
            },
        )
        .await
        .unwrap();
        repo.create_cross_reference(
            b.id,
            &CreateCrossReferenceRequest {
                related_incident_id: a.id,
                relationship: Relationship::SameIndividual,
                description: None,
            },
        )
        .await
        .unwrap();

        let removed = repo.delete_incident(a.id).await.unwrap();
        assert_eq!(removed, Some(vec!["stored.png".to_string()]));
        assert!(repo.list_evidence(a.id).await.unwrap().is_empty());
        assert!(repo.list_timeline(a.id).await.unwrap().is_empty());
        assert!(repo.list_cross_references(b.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_evidence_verification_update() {
        let (repo, _dir) = repo().await;
        let a = repo.create_incident(&incident("A")).await.unwrap();
        let evidence = repo
            .create_evidence(&NewEvidenceFile {
                incident_id: a.id,
                filename: "stored.pdf".to_string(),
                original_name: "report.pdf".to_string(),
                evidence_type: EvidenceType::Document,
                description: Some("Vet report".to_string()),
                source: None,
                file_size: 1024,
                mime_type: "application/pdf".to_string(),
            })
            .await
            .unwrap();
        assert!(!evidence.is_verified);

        let updated = repo
            .update_evidence(
                evidence.id,
                &UpdateEvidenceRequest {
                    is_verified: Some(true),
                    source: Some("County vet".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(updated.is_verified);
        assert_eq!(updated.description.as_deref(), Some("Vet report"));
        assert_eq!(updated.source.as_deref(), Some("County vet"));

        let deleted = repo.delete_evidence(evidence.id).await.unwrap().unwrap();
        assert_eq!(deleted.filename, "stored.pdf");
        assert!(repo.get_evidence(evidence.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_timeline_ordered_by_event_date() {
        let (repo, _dir) = repo().await;
        let a = repo.create_incident(&incident("A")).await.unwrap();
        for (date, title) in [("2025-01-02", "Reported"), ("2025-01-09", "Resolved"), ("2025-01-04", "Visited")] {
            repo.create_timeline_entry(
                a.id,
                &CreateTimelineEntryRequest {
                    date: date.to_string(),
                    title: title.to_string(),
                    description: None,
                    severity: Severity::Low,
                    entry_type: TimelineEntryType::Update,
                },
            )
            .await
            .unwrap();
        }

        let titles: Vec<String> = repo
            .list_timeline(a.id)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["Resolved", "Visited", "Reported"]);
    }

    #[tokio::test]
    async fn test_timeline_partial_update() {
        let (repo, _dir) = repo().await;
        let a = repo.create_incident(&incident("A")).await.unwrap();
        let entry = repo
            .create_timeline_entry(
                a.id,
                &CreateTimelineEntryRequest {
                    date: "2025-01-02T00:00:00.000Z".to_string(),
                    title: "Reported".to_string(),
                    description: None,
                    severity: Severity::Low,
                    entry_type: TimelineEntryType::Report,
                },
            )
            .await
            .unwrap();

        let request = UpdateTimelineEntryRequest {
            severity: Some(Severity::Critical),
            ..Default::default()
        };
        let updated = repo
            .update_timeline_entry(entry.id, &request)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.severity, Severity::Critical);
        assert_eq!(updated.title, "Reported");
        let stored = repo.get_timeline_entry(entry.id).await.unwrap().unwrap();
        assert_eq!(stored.severity, Severity::Critical);
        assert_eq!(stored.entry_type, TimelineEntryType::Report);

        assert!(repo.delete_timeline_entry(entry.id).await.unwrap());
        assert!(repo.get_timeline_entry(entry.id).await.unwrap().is_none());
        assert!(repo
            .update_timeline_entry(entry.id, &request)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_concurrent_incident_updates_are_not_lost() {
        let (repo, _dir) = repo().await;
        let a = repo.create_incident(&incident("A")).await.unwrap();

        for round in 0..10 {
            let retitle = UpdateIncidentRequest {
                title: Some(format!("Title {round}")),
                ..Default::default()
            };
            let redata = UpdateIncidentRequest {
                data: Some(json!({ "round": round })),
                ..Default::default()
            };
            let (x, y) = tokio::join!(
                repo.update_incident(a.id, &retitle),
                repo.update_incident(a.id, &redata)
            );
            assert!(x.unwrap().is_some());
            assert!(y.unwrap().is_some());

            let stored = repo.get_incident(a.id).await.unwrap().unwrap();
            assert_eq!(stored.title, format!("Title {round}"));
            assert_eq!(stored.data, json!({ "round": round }));
        }
    }

    #[tokio::test]
    async fn test_self_reference_rejected_by_schema() {
        let (repo, _dir) = repo().await;
        let a = repo.create_incident(&incident("A")).await.unwrap();
        let result = repo
            .create_cross_reference(
                a.id,
                &CreateCrossReferenceRequest {
                    related_incident_id: a.id,
                    relationship: Relationship::Duplicate,
                    description: None,
                },
            )
            .await;
        assert!(result.is_err());
    }
}
