use crate::error::CoreError;
use crate::models::{CreatedTask, TaskCreationRequest};
use crate::repository::SqliteTaskService;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

#[async_trait]
impl super::TaskService for SqliteTaskService {
    async fn create_task(
        &self,
        request: TaskCreationRequest,
        agency_id: Uuid,
        actor_id: Uuid,
    ) -> Result<CreatedTask, CoreError> {
        let id = Uuid::now_v7();
        let now = Utc::now();
        let document_request = request
            .document_request
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| CoreError::TaskCreation(format!("document_request: {e}")))?;

        sqlx::query(
            r#"INSERT INTO tasks
            (id, agency_id, title, description, client_id, service_id, priority,
             assigned_to, tag_id, document_request, status, due_date, target_date,
             created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'pending', $11, $12, $13, $14, $15)"#,
        )
        .bind(id)
        .bind(agency_id)
        .bind(&request.title)
        .bind(&request.description)
        .bind(request.client_id)
        .bind(request.service_id)
        .bind(request.priority)
        .bind(request.assigned_to)
        .bind(request.tag_id)
        .bind(&document_request)
        .bind(request.due_date)
        .bind(request.target_date)
        .bind(actor_id)
        .bind(now)
        .bind(now)
        .execute(self.pool())
        .await?;

        Ok(CreatedTask {
            id,
            title: request.title,
        })
    }
}
