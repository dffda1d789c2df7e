use anyhow::Result;
use chrono::Utc;
use owo_colors::OwoColorize;
use taskmill_core::db::DbPool;
use taskmill_core::repository::{SqliteRepository, SqliteTaskService};
use taskmill_core::scheduler::Scheduler;

use crate::cli::RunCommand;
use crate::parser::parse_date;

pub async fn run_scheduler(pool: &DbPool, command: RunCommand) -> Result<()> {
    let check_date = match &command.date {
        Some(raw) => parse_date(raw)?,
        None => Utc::now().date_naive(),
    };

    let scheduler = Scheduler::new(
        SqliteRepository::new(pool.clone()),
        SqliteTaskService::new(pool.clone()),
    );
    let summary = scheduler.run(check_date).await?;

    println!(
        "{} Evaluated templates for {} and created {} task{}.",
        "✓".green().bold(),
        check_date,
        summary.tasks_created.to_string().bold(),
        if summary.tasks_created == 1 { "" } else { "s" }
    );

    if summary.templates_failed > 0 {
        println!(
            "{} {} template{} failed and will be retried on the next pass:",
            "!".yellow().bold(),
            summary.templates_failed,
            if summary.templates_failed == 1 { "" } else { "s" }
        );
        for error in &summary.errors {
            println!("  {}", error.yellow());
        }
    }

    Ok(())
}
