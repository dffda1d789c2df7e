use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("Template not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid document request on template {template_id}: {reason}")]
    InvalidDocumentRequest { template_id: Uuid, reason: String },

    #[error("Task creation failed: {0}")]
    TaskCreation(String),
}
