//! # Taskmill Core Library
//!
//! Recurring-task engine for a multi-tenant task backend: agencies define
//! reusable task templates with a recurrence rule, and a scheduler pass
//! materializes concrete tasks from the templates that are due on a given
//! date.
//!
//! ## Core Modules
//!
//! - [`db`]: Database connection and schema management
//! - [`models`]: Templates, recurrence rules, and transfer objects
//! - [`repository`]: Data access layer with the Repository pattern
//! - [`recurrence`]: The pure due-date predicate
//! - [`materialize`]: Template-to-task-request conversion
//! - [`scheduler`]: One-pass orchestration with per-template failure isolation
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use taskmill_core::{
//!     db,
//!     repository::{SqliteRepository, SqliteTaskService},
//!     scheduler::Scheduler,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let pool = db::establish_connection("taskmill.db").await?;
//!
//!     let scheduler = Scheduler::new(
//!         SqliteRepository::new(pool.clone()),
//!         SqliteTaskService::new(pool),
//!     );
//!
//!     let summary = scheduler.run_today().await?;
//!     println!("Created {} tasks", summary.tasks_created);
//!
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
pub mod materialize;
pub mod models;
pub mod recurrence;
pub mod repository;
pub mod scheduler;
