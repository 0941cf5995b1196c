//! SQLite-backed template store. The post record is kept as a JSON TEXT blob.

use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use super::lock_row;
use crate::errors::AppError;
use crate::models::{timestamp, CreateTemplateRequest, Template, UpdateTemplateRequest};
use crate::store::{apply_update, TemplateStore};

const TEMPLATE_COLUMNS: &str = "id, name, data, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteTemplateStore {
    pool: SqlitePool,
}

impl SqliteTemplateStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TemplateStore for SqliteTemplateStore {
    async fn create(&self, request: &CreateTemplateRequest) -> Result<Template, AppError> {
        let now = timestamp::now();
        let data = serde_json::to_string(&request.data)?;

        let result = sqlx::query(
            "INSERT INTO templates (name, data, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&request.name)
        .bind(&data)
        .bind(timestamp::to_iso(&now))
        .bind(timestamp::to_iso(&now))
        .execute(&self.pool)
        .await?;

        Ok(Template {
            id: result.last_insert_rowid(),
            name: request.name.clone(),
            data: request.data.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get(&self, id: i64) -> Result<Option<Template>, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM templates WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(template_from_row).transpose()
    }

    async fn list(&self) -> Result<Vec<Template>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM templates ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(template_from_row).collect()
    }

    async fn update(
        &self,
        id: i64,
        request: &UpdateTemplateRequest,
    ) -> Result<Option<Template>, AppError> {
        let mut tx = self.pool.begin().await?;
        if !lock_row(&mut tx, "templates", id).await? {
            tx.rollback().await?;
            return Ok(None);
        }

        let row = sqlx::query(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM templates WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        let updated = apply_update(&template_from_row(&row)?, request);
        let data = serde_json::to_string(&updated.data)?;

        sqlx::query("UPDATE templates SET name = ?, data = ?, updated_at = ? WHERE id = ?")
            .bind(&updated.name)
            .bind(&data)
            .bind(timestamp::to_iso(&updated.updated_at))
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM templates WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn template_from_row(row: &SqliteRow) -> Result<Template, AppError> {
    let data: String = row.try_get("data")?;
    Ok(Template {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        data: serde_json::from_str(&data)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
