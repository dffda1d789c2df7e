use clap::{Parser, Subcommand};
use std::str::FromStr;
use taskmill_core::models::{RecurrenceFrequency, TaskPriority};
use uuid::Uuid;

/// Recurring task templates and the scheduler that materializes them
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run one scheduler pass, creating tasks from due templates
    Run(RunCommand),
    /// Add a new recurring task template
    Add(AddCommand),
    /// List an agency's templates
    List(ListCommand),
    /// Pause a template (no tasks are spawned while paused)
    Pause(ToggleCommand),
    /// Resume a paused template
    Resume(ToggleCommand),
    /// Delete a template
    Delete(DeleteCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct RunCommand {
    /// Date to evaluate templates against (YYYY-MM-DD, defaults to today)
    #[clap(long)]
    pub date: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The title of tasks spawned from this template
    pub title: String,
    /// The agency that owns the template
    #[clap(long)]
    pub agency: Uuid,
    /// The user creating the template (recorded as task creator too)
    #[clap(long)]
    pub user: Uuid,
    /// The description copied into spawned tasks
    #[clap(short, long)]
    pub description: Option<String>,
    /// Recurrence frequency (daily, weekly, monthly, yearly)
    #[clap(long, value_parser = RecurrenceFrequency::from_str)]
    pub frequency: RecurrenceFrequency,
    /// Fire every Nth day/week/month/year
    #[clap(long, default_value_t = 1)]
    pub interval: i32,
    /// First date the template may fire (YYYY-MM-DD)
    #[clap(long)]
    pub start_date: String,
    /// Last date the template may fire, inclusive (YYYY-MM-DD)
    #[clap(long)]
    pub end_date: Option<String>,
    /// Day of week anchor, 0-6 (Monday-Sunday)
    #[clap(long)]
    pub day_of_week: Option<i32>,
    /// Day of month anchor, 1-31
    #[clap(long)]
    pub day_of_month: Option<i32>,
    /// Week of month anchor, 1-4, combined with --day-of-week
    #[clap(long)]
    pub week_of_month: Option<i32>,
    /// Days added to the creation date for the spawned task's due date
    #[clap(long)]
    pub due_offset: Option<i32>,
    /// Days added to the creation date for the spawned task's target date
    #[clap(long)]
    pub target_offset: Option<i32>,
    /// Priority copied into spawned tasks (P1-P4)
    #[clap(long, value_parser = TaskPriority::from_str)]
    pub priority: Option<TaskPriority>,
    /// Client reference copied into spawned tasks
    #[clap(long)]
    pub client: Option<Uuid>,
    /// Service reference copied into spawned tasks
    #[clap(long)]
    pub service: Option<Uuid>,
    /// Assignee copied into spawned tasks
    #[clap(long)]
    pub assignee: Option<Uuid>,
    /// Tag reference copied into spawned tasks
    #[clap(long)]
    pub tag: Option<Uuid>,
    /// Create the template paused
    #[clap(long)]
    pub paused: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// The agency whose templates to list
    #[clap(long)]
    pub agency: Uuid,
    /// Show only active templates
    #[clap(long, conflicts_with = "paused")]
    pub active: bool,
    /// Show only paused templates
    #[clap(long)]
    pub paused: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ToggleCommand {
    /// The template ID
    pub id: Uuid,
    /// The agency that owns the template
    #[clap(long)]
    pub agency: Uuid,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The template ID
    pub id: Uuid,
    /// The agency that owns the template
    #[clap(long)]
    pub agency: Uuid,
    /// Skip the confirmation prompt
    #[clap(short, long)]
    pub force: bool,
}
