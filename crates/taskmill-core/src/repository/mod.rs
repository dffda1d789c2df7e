use crate::db::DbPool;
use crate::error::CoreError;
use crate::models::{
    CreatedTask, NewTemplateData, RecurringTemplate, TaskCreationRequest, UpdateTemplateData,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

pub mod tasks;
pub mod templates;

/// Persistence boundary for recurring task templates.
#[async_trait]
pub trait TemplateRepository {
    async fn add_template(
        &self,
        data: NewTemplateData,
        agency_id: Uuid,
        user_id: Uuid,
    ) -> Result<RecurringTemplate, CoreError>;
    async fn find_template_by_id(
        &self,
        id: Uuid,
        agency_id: Uuid,
    ) -> Result<Option<RecurringTemplate>, CoreError>;
    async fn find_templates_by_agency(
        &self,
        agency_id: Uuid,
        is_active: Option<bool>,
    ) -> Result<Vec<RecurringTemplate>, CoreError>;
    async fn update_template(
        &self,
        id: Uuid,
        agency_id: Uuid,
        data: UpdateTemplateData,
    ) -> Result<RecurringTemplate, CoreError>;
    async fn delete_template(&self, id: Uuid, agency_id: Uuid) -> Result<(), CoreError>;

    /// Coarse pre-filter for one scheduler pass: active templates whose
    /// validity window covers `check_date`, across all agencies. The
    /// fine-grained firing decision stays with the recurrence predicate.
    async fn fetch_active_due(
        &self,
        check_date: NaiveDate,
    ) -> Result<Vec<RecurringTemplate>, CoreError>;

    /// Unconditionally records the moment a task was spawned from the
    /// template. No optimistic-lock check against concurrent writers.
    async fn mark_fired(&self, id: Uuid, fired_at: DateTime<Utc>) -> Result<(), CoreError>;
}

/// The external task-creation collaborator. The scheduler only needs the
/// created task's identity and title back, for logging.
#[async_trait]
pub trait TaskService {
    async fn create_task(
        &self,
        request: TaskCreationRequest,
        agency_id: Uuid,
        actor_id: Uuid,
    ) -> Result<CreatedTask, CoreError>;
}

/// SQLite implementation of the template persistence boundary.
pub struct SqliteRepository {
    pool: DbPool,
}

impl SqliteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// SQLite-backed task sink inserting pending task rows.
pub struct SqliteTaskService {
    pool: DbPool,
}

impl SqliteTaskService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }
}
