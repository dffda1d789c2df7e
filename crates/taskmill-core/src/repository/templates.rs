use crate::error::CoreError;
use crate::models::{
    DocumentRequest, NewTemplateData, RecurrenceRule, RecurringTemplate, UpdateTemplateData,
};
use crate::repository::SqliteRepository;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Range checks mirroring the constraints enforced upstream of the store.
fn validate_rule(rule: &RecurrenceRule) -> Result<(), CoreError> {
    if rule.interval < 1 {
        return Err(CoreError::InvalidInput(format!(
            "interval must be at least 1, got {}",
            rule.interval
        )));
    }
    if let Some(dow) = rule.day_of_week {
        if !(0..=6).contains(&dow) {
            return Err(CoreError::InvalidInput(format!(
                "day_of_week must be 0-6 (Monday-Sunday), got {dow}"
            )));
        }
    }
    if let Some(dom) = rule.day_of_month {
        if !(1..=31).contains(&dom) {
            return Err(CoreError::InvalidInput(format!(
                "day_of_month must be 1-31, got {dom}"
            )));
        }
    }
    if let Some(week) = rule.week_of_month {
        if !(1..=4).contains(&week) {
            return Err(CoreError::InvalidInput(format!(
                "week_of_month must be 1-4, got {week}"
            )));
        }
    }
    Ok(())
}

fn encode_document_request(doc: &DocumentRequest) -> Result<String, CoreError> {
    serde_json::to_string(doc)
        .map_err(|e| CoreError::InvalidInput(format!("document_request: {e}")))
}

#[async_trait]
impl super::TemplateRepository for SqliteRepository {
    async fn add_template(
        &self,
        data: NewTemplateData,
        agency_id: Uuid,
        user_id: Uuid,
    ) -> Result<RecurringTemplate, CoreError> {
        validate_rule(&data.rule)?;

        let document_request = data
            .document_request
            .as_ref()
            .map(encode_document_request)
            .transpose()?;

        let template = RecurringTemplate {
            id: Uuid::now_v7(),
            agency_id,
            title: data.title,
            description: data.description,
            client_id: data.client_id,
            service_id: data.service_id,
            priority: data.priority,
            assigned_to: data.assigned_to,
            tag_id: data.tag_id,
            document_request,
            rule: data.rule,
            due_date_offset: data.due_date_offset,
            target_date_offset: data.target_date_offset,
            is_active: data.is_active,
            created_by: user_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_fired_at: None,
        };

        sqlx::query(
            r#"INSERT INTO recurring_templates
            (id, agency_id, title, description, client_id, service_id, priority,
             assigned_to, tag_id, document_request, frequency, interval, start_date,
             end_date, day_of_week, day_of_month, week_of_month, due_date_offset,
             target_date_offset, is_active, created_by, created_at, updated_at, last_fired_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    $15, $16, $17, $18, $19, $20, $21, $22, $23, $24)"#,
        )
        .bind(template.id)
        .bind(template.agency_id)
        .bind(&template.title)
        .bind(&template.description)
        .bind(template.client_id)
        .bind(template.service_id)
        .bind(template.priority)
        .bind(template.assigned_to)
        .bind(template.tag_id)
        .bind(&template.document_request)
        .bind(template.rule.frequency)
        .bind(template.rule.interval)
        .bind(template.rule.start_date)
        .bind(template.rule.end_date)
        .bind(template.rule.day_of_week)
        .bind(template.rule.day_of_month)
        .bind(template.rule.week_of_month)
        .bind(template.due_date_offset)
        .bind(template.target_date_offset)
        .bind(template.is_active)
        .bind(template.created_by)
        .bind(template.created_at)
        .bind(template.updated_at)
        .bind(template.last_fired_at)
        .execute(self.pool())
        .await?;

        Ok(template)
    }

    async fn find_template_by_id(
        &self,
        id: Uuid,
        agency_id: Uuid,
    ) -> Result<Option<RecurringTemplate>, CoreError> {
        let template = sqlx::query_as(
            "SELECT * FROM recurring_templates WHERE id = $1 AND agency_id = $2",
        )
        .bind(id)
        .bind(agency_id)
        .fetch_optional(self.pool())
        .await?;
        Ok(template)
    }

    async fn find_templates_by_agency(
        &self,
        agency_id: Uuid,
        is_active: Option<bool>,
    ) -> Result<Vec<RecurringTemplate>, CoreError> {
        let templates = match is_active {
            Some(active) => {
                sqlx::query_as(
                    r#"SELECT * FROM recurring_templates
                    WHERE agency_id = $1 AND is_active = $2
                    ORDER BY created_at DESC"#,
                )
                .bind(agency_id)
                .bind(active)
                .fetch_all(self.pool())
                .await?
            }
            None => {
                sqlx::query_as(
                    r#"SELECT * FROM recurring_templates
                    WHERE agency_id = $1
                    ORDER BY created_at DESC"#,
                )
                .bind(agency_id)
                .fetch_all(self.pool())
                .await?
            }
        };
        Ok(templates)
    }

    async fn update_template(
        &self,
        id: Uuid,
        agency_id: Uuid,
        data: UpdateTemplateData,
    ) -> Result<RecurringTemplate, CoreError> {
        let mut tx = self.pool().begin().await?;

        let mut template: RecurringTemplate = sqlx::query_as(
            "SELECT * FROM recurring_templates WHERE id = $1 AND agency_id = $2",
        )
        .bind(id)
        .bind(agency_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| CoreError::NotFound(id.to_string()))?;

        if let Some(title) = data.title {
            template.title = title;
        }
        if let Some(description) = data.description {
            template.description = description;
        }
        if let Some(client_id) = data.client_id {
            template.client_id = client_id;
        }
        if let Some(service_id) = data.service_id {
            template.service_id = service_id;
        }
        if let Some(priority) = data.priority {
            template.priority = priority;
        }
        if let Some(assigned_to) = data.assigned_to {
            template.assigned_to = assigned_to;
        }
        if let Some(tag_id) = data.tag_id {
            template.tag_id = tag_id;
        }
        if let Some(document_request) = data.document_request {
            template.document_request = document_request
                .as_ref()
                .map(encode_document_request)
                .transpose()?;
        }
        if let Some(frequency) = data.frequency {
            template.rule.frequency = frequency;
        }
        if let Some(interval) = data.interval {
            template.rule.interval = interval;
        }
        if let Some(start_date) = data.start_date {
            template.rule.start_date = start_date;
        }
        if let Some(end_date) = data.end_date {
            template.rule.end_date = end_date;
        }
        if let Some(day_of_week) = data.day_of_week {
            template.rule.day_of_week = day_of_week;
        }
        if let Some(day_of_month) = data.day_of_month {
            template.rule.day_of_month = day_of_month;
        }
        if let Some(week_of_month) = data.week_of_month {
            template.rule.week_of_month = week_of_month;
        }
        if let Some(due_date_offset) = data.due_date_offset {
            template.due_date_offset = due_date_offset;
        }
        if let Some(target_date_offset) = data.target_date_offset {
            template.target_date_offset = target_date_offset;
        }
        if let Some(is_active) = data.is_active {
            template.is_active = is_active;
        }
        template.updated_at = Utc::now();

        validate_rule(&template.rule)?;

        sqlx::query(
            r#"UPDATE recurring_templates SET
            title = $1, description = $2, client_id = $3, service_id = $4,
            priority = $5, assigned_to = $6, tag_id = $7, document_request = $8,
            frequency = $9, interval = $10, start_date = $11, end_date = $12,
            day_of_week = $13, day_of_month = $14, week_of_month = $15,
            due_date_offset = $16, target_date_offset = $17, is_active = $18,
            updated_at = $19
            WHERE id = $20 AND agency_id = $21"#,
        )
        .bind(&template.title)
        .bind(&template.description)
        .bind(template.client_id)
        .bind(template.service_id)
        .bind(template.priority)
        .bind(template.assigned_to)
        .bind(template.tag_id)
        .bind(&template.document_request)
        .bind(template.rule.frequency)
        .bind(template.rule.interval)
        .bind(template.rule.start_date)
        .bind(template.rule.end_date)
        .bind(template.rule.day_of_week)
        .bind(template.rule.day_of_month)
        .bind(template.rule.week_of_month)
        .bind(template.due_date_offset)
        .bind(template.target_date_offset)
        .bind(template.is_active)
        .bind(template.updated_at)
        .bind(template.id)
        .bind(template.agency_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(template)
    }

    async fn delete_template(&self, id: Uuid, agency_id: Uuid) -> Result<(), CoreError> {
        let result = sqlx::query(
            "DELETE FROM recurring_templates WHERE id = $1 AND agency_id = $2",
        )
        .bind(id)
        .bind(agency_id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn fetch_active_due(
        &self,
        check_date: NaiveDate,
    ) -> Result<Vec<RecurringTemplate>, CoreError> {
        let templates = sqlx::query_as(
            r#"SELECT * FROM recurring_templates
            WHERE is_active = 1
            AND start_date <= $1
            AND (end_date IS NULL OR end_date >= $1)
            ORDER BY created_at"#,
        )
        .bind(check_date)
        .fetch_all(self.pool())
        .await?;
        Ok(templates)
    }

    async fn mark_fired(&self, id: Uuid, fired_at: DateTime<Utc>) -> Result<(), CoreError> {
        let result = sqlx::query(
            "UPDATE recurring_templates SET last_fired_at = $1 WHERE id = $2",
        )
        .bind(fired_at)
        .bind(id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
