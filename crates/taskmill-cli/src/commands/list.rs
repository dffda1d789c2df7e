use anyhow::Result;
use taskmill_core::repository::TemplateRepository;

use crate::cli::ListCommand;
use crate::views::table::display_templates;

pub async fn list_templates(repo: &impl TemplateRepository, command: ListCommand) -> Result<()> {
    let is_active = if command.active {
        Some(true)
    } else if command.paused {
        Some(false)
    } else {
        None
    };

    let templates = repo
        .find_templates_by_agency(command.agency, is_active)
        .await?;
    display_templates(&templates);
    Ok(())
}
