use anyhow::Result;
use owo_colors::OwoColorize;
use taskmill_core::models::UpdateTemplateData;
use taskmill_core::repository::TemplateRepository;

use crate::cli::ToggleCommand;

pub async fn set_template_active(
    repo: &impl TemplateRepository,
    command: ToggleCommand,
    active: bool,
) -> Result<()> {
    let template = repo
        .update_template(
            command.id,
            command.agency,
            UpdateTemplateData {
                is_active: Some(active),
                ..Default::default()
            },
        )
        .await?;

    if active {
        println!(
            "{} Resumed template '{}'; tasks will spawn on its next due date.",
            "✓".green().bold(),
            template.title.bold()
        );
    } else {
        println!(
            "{} Paused template '{}'; no tasks will spawn until it is resumed.",
            "✓".green().bold(),
            template.title.bold()
        );
    }
    Ok(())
}
