use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// Ranked priority levels copied verbatim into spawned tasks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT")]
pub enum TaskPriority {
    P1,
    P2,
    P3,
    P4,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task priority: {0}")]
pub struct ParseTaskPriorityError(String);

impl FromStr for TaskPriority {
    type Err = ParseTaskPriorityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "P1" => Ok(TaskPriority::P1),
            "P2" => Ok(TaskPriority::P2),
            "P3" => Ok(TaskPriority::P3),
            "P4" => Ok(TaskPriority::P4),
            _ => Err(ParseTaskPriorityError(s.to_string())),
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskPriority::P1 => write!(f, "P1"),
            TaskPriority::P2 => write!(f, "P2"),
            TaskPriority::P3 => write!(f, "P3"),
            TaskPriority::P4 => write!(f, "P4"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceFrequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid recurrence frequency: {0}")]
pub struct ParseFrequencyError(String);

impl FromStr for RecurrenceFrequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(RecurrenceFrequency::Daily),
            "weekly" => Ok(RecurrenceFrequency::Weekly),
            "monthly" => Ok(RecurrenceFrequency::Monthly),
            "yearly" => Ok(RecurrenceFrequency::Yearly),
            _ => Err(ParseFrequencyError(s.to_string())),
        }
    }
}

impl std::fmt::Display for RecurrenceFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecurrenceFrequency::Daily => write!(f, "daily"),
            RecurrenceFrequency::Weekly => write!(f, "weekly"),
            RecurrenceFrequency::Monthly => write!(f, "monthly"),
            RecurrenceFrequency::Yearly => write!(f, "yearly"),
        }
    }
}

/// The due-date predicate configuration embedded in every template.
///
/// `day_of_week` uses Monday=0 through Sunday=6. For monthly rules,
/// `day_of_month` and `week_of_month` are mutually exclusive anchor
/// strategies; `day_of_month` wins when both are present.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecurrenceRule {
    pub frequency: RecurrenceFrequency,
    /// Fire every Nth unit of the frequency, counted from `start_date`.
    pub interval: i32,
    /// No firing before this date.
    pub start_date: NaiveDate,
    /// No firing after this date (inclusive).
    pub end_date: Option<NaiveDate>,
    /// 0-6 (Monday-Sunday), meaningful for weekly and nth-weekday monthly rules.
    pub day_of_week: Option<i32>,
    /// 1-31 exact-day anchor for monthly rules.
    pub day_of_month: Option<i32>,
    /// 1-4 combined with `day_of_week` for nth-weekday monthly rules.
    pub week_of_month: Option<i32>,
}

/// One item an agency asks a client to upload alongside a spawned task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentRequestItem {
    pub name: String,
    #[serde(default)]
    pub required: bool,
}

/// Structured document-request descriptor, stored as a JSON column and
/// parsed strictly at the materialization boundary.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentRequest {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub items: Vec<DocumentRequestItem>,
}

/// A reusable task blueprint plus its recurrence rule.
///
/// Exclusively owned by its agency. Tasks spawned from a template carry no
/// back-reference to it; they are independent entities after creation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecurringTemplate {
    #[serde(with = "uuid::serde::compact")]
    pub id: Uuid,
    #[serde(with = "uuid::serde::compact")]
    pub agency_id: Uuid,

    // Template payload, copied into each spawned task
    pub title: String,
    pub description: Option<String>,
    pub client_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<Uuid>,
    pub tag_id: Option<Uuid>,
    /// Raw JSON as persisted; decoded by the materializer.
    pub document_request: Option<String>,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub rule: RecurrenceRule,

    /// Days added to the creation date to produce the spawned task's due date.
    pub due_date_offset: Option<i32>,
    /// Days added to the creation date to produce the spawned task's target date.
    pub target_date_offset: Option<i32>,

    pub is_active: bool,
    #[serde(with = "uuid::serde::compact")]
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Last moment a task was successfully spawned from this template.
    /// Once set, monotonically non-decreasing across successive fires.
    pub last_fired_at: Option<DateTime<Utc>>,
}

/// Data for creating a new recurring template.
#[derive(Debug, Clone)]
pub struct NewTemplateData {
    pub title: String,
    pub description: Option<String>,
    pub client_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<Uuid>,
    pub tag_id: Option<Uuid>,
    pub document_request: Option<DocumentRequest>,
    pub rule: RecurrenceRule,
    pub due_date_offset: Option<i32>,
    pub target_date_offset: Option<i32>,
    pub is_active: bool,
}

impl Default for NewTemplateData {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            client_id: None,
            service_id: None,
            priority: None,
            assigned_to: None,
            tag_id: None,
            document_request: None,
            rule: RecurrenceRule {
                frequency: RecurrenceFrequency::Daily,
                interval: 1,
                start_date: Utc::now().date_naive(),
                end_date: None,
                day_of_week: None,
                day_of_month: None,
                week_of_month: None,
            },
            due_date_offset: None,
            target_date_offset: None,
            is_active: true,
        }
    }
}

/// Data for modifying an existing template. Outer `None` leaves the field
/// untouched; inner `None` clears a nullable column.
#[derive(Debug, Clone, Default)]
pub struct UpdateTemplateData {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub client_id: Option<Option<Uuid>>,
    pub service_id: Option<Option<Uuid>>,
    pub priority: Option<Option<TaskPriority>>,
    pub assigned_to: Option<Option<Uuid>>,
    pub tag_id: Option<Option<Uuid>>,
    pub document_request: Option<Option<DocumentRequest>>,
    pub frequency: Option<RecurrenceFrequency>,
    pub interval: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<Option<NaiveDate>>,
    pub day_of_week: Option<Option<i32>>,
    pub day_of_month: Option<Option<i32>>,
    pub week_of_month: Option<Option<i32>>,
    pub due_date_offset: Option<Option<i32>>,
    pub target_date_offset: Option<Option<i32>>,
    pub is_active: Option<bool>,
}

/// Value object handed to the task-creation collaborator when a template
/// fires. Built field by field so schema drift surfaces at compile time.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskCreationRequest {
    pub title: String,
    pub description: Option<String>,
    pub client_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub priority: Option<TaskPriority>,
    pub assigned_to: Option<Uuid>,
    pub tag_id: Option<Uuid>,
    pub document_request: Option<DocumentRequest>,
    pub due_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
}

/// Identity of a task created downstream; title is kept for logging only.
#[derive(Debug, Clone)]
pub struct CreatedTask {
    pub id: Uuid,
    pub title: String,
}
