//! Template persistence behind a backend-agnostic trait.
//!
//! Handlers only see [`TemplateStore`]; the SQLite implementation lives in
//! `crate::db`, the in-memory one here.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::{timestamp, CreateTemplateRequest, Template, UpdateTemplateRequest};

/// Storage for saved templates. Each call is atomic on its own.
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Save a new template; `created_at` and `updated_at` are equal.
    async fn create(&self, request: &CreateTemplateRequest) -> Result<Template, AppError>;

    async fn get(&self, id: i64) -> Result<Option<Template>, AppError>;

    /// All templates in creation order.
    async fn list(&self) -> Result<Vec<Template>, AppError>;

    /// Apply a partial update. `updated_at` always moves forward.
    async fn update(
        &self,
        id: i64,
        request: &UpdateTemplateRequest,
    ) -> Result<Option<Template>, AppError>;

    /// Returns whether a template was removed.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

/// Merge a partial update into an existing template.
pub(crate) fn apply_update(existing: &Template, request: &UpdateTemplateRequest) -> Template {
    Template {
        id: existing.id,
        name: request.name.clone().unwrap_or_else(|| existing.name.clone()),
        data: request.data.clone().unwrap_or_else(|| existing.data.clone()),
        created_at: existing.created_at,
        updated_at: timestamp::after(existing.updated_at),
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i64,
    templates: BTreeMap<i64, Template>,
}

/// Process-local store, used in tests and when SQLite persistence is disabled.
#[derive(Debug, Default)]
pub struct MemoryTemplateStore {
    state: RwLock<MemoryState>,
}

impl MemoryTemplateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateStore for MemoryTemplateStore {
    async fn create(&self, request: &CreateTemplateRequest) -> Result<Template, AppError> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let now = timestamp::now();
        let template = Template {
            id: state.next_id,
            name: request.name.clone(),
            data: request.data.clone(),
            created_at: now,
            updated_at: now,
        };
        state.templates.insert(template.id, template.clone());
        Ok(template)
    }

    async fn get(&self, id: i64) -> Result<Option<Template>, AppError> {
        Ok(self.state.read().await.templates.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Template>, AppError> {
        Ok(self.state.read().await.templates.values().cloned().collect())
    }

    async fn update(
        &self,
        id: i64,
        request: &UpdateTemplateRequest,
    ) -> Result<Option<Template>, AppError> {
        let mut state = self.state.write().await;
        let Some(slot) = state.templates.get_mut(&id) else {
            return Ok(None);
        };
        *slot = apply_update(slot, request);
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.state.write().await.templates.remove(&id).is_some())
    }
}
