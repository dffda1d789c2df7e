use anyhow::Result;
use owo_colors::OwoColorize;
use taskmill_core::models::{NewTemplateData, RecurrenceRule};
use taskmill_core::repository::TemplateRepository;

use crate::cli::AddCommand;
use crate::parser::parse_date;

pub async fn add_template(repo: &impl TemplateRepository, command: AddCommand) -> Result<()> {
    let start_date = parse_date(&command.start_date)?;
    let end_date = command.end_date.as_deref().map(parse_date).transpose()?;

    let data = NewTemplateData {
        title: command.title,
        description: command.description,
        client_id: command.client,
        service_id: command.service,
        priority: command.priority,
        assigned_to: command.assignee,
        tag_id: command.tag,
        document_request: None,
        rule: RecurrenceRule {
            frequency: command.frequency,
            interval: command.interval,
            start_date,
            end_date,
            day_of_week: command.day_of_week,
            day_of_month: command.day_of_month,
            week_of_month: command.week_of_month,
        },
        due_date_offset: command.due_offset,
        target_date_offset: command.target_offset,
        is_active: !command.paused,
    };

    let template = repo.add_template(data, command.agency, command.user).await?;

    println!(
        "{} Added template '{}' ({}, interval {}, starting {}).",
        "✓".green().bold(),
        template.title.bold(),
        template.rule.frequency,
        template.rule.interval,
        template.rule.start_date
    );
    println!("  ID: {}", template.id);
    if template.is_active {
        println!(
            "  Tasks will be created automatically when the scheduler runs on due dates."
        );
    } else {
        println!("  The template is paused; resume it to start spawning tasks.");
    }

    Ok(())
}
