use clap::Parser;
use dialoguer::Confirm;
use owo_colors::{OwoColorize, Style};
use taskmill_core::db;
use taskmill_core::repository::{SqliteRepository, TemplateRepository};
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;
mod parser;
mod views;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = config::Config::new().unwrap_or_default();

    let db_pool = match db::establish_connection(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    };
    tracing::debug!(database = %config.database_path, "database ready");
    let repository = SqliteRepository::new(db_pool.clone());

    let cli = cli::Cli::parse();

    let result = match cli.command {
        cli::Commands::Run(command) => commands::run::run_scheduler(&db_pool, command).await,
        cli::Commands::Add(command) => commands::add::add_template(&repository, command).await,
        cli::Commands::List(command) => commands::list::list_templates(&repository, command).await,
        cli::Commands::Pause(command) => {
            commands::toggle::set_template_active(&repository, command, false).await
        }
        cli::Commands::Resume(command) => {
            commands::toggle::set_template_active(&repository, command, true).await
        }
        cli::Commands::Delete(command) => {
            let template = match repository
                .find_template_by_id(command.id, command.agency)
                .await
            {
                Ok(Some(t)) => t,
                Ok(None) => {
                    let error_style = Style::new().red().bold();
                    eprintln!(
                        "{} Template with ID '{}' not found.",
                        "Error:".style(error_style),
                        command.id
                    );
                    std::process::exit(1);
                }
                Err(e) => {
                    handle_error(e.into());
                    return;
                }
            };

            if !command.force {
                let confirmation = Confirm::new()
                    .with_prompt(format!(
                        "Are you sure you want to delete template '{}'?",
                        template.title
                    ))
                    .default(false)
                    .interact()
                    .unwrap_or(false);

                if !confirmation {
                    println!("Deletion cancelled.");
                    return;
                }
            }

            match repository.delete_template(command.id, command.agency).await {
                Ok(()) => {
                    println!(
                        "{} Deleted template '{}'. Tasks already spawned from it are unaffected.",
                        "✓".green().bold(),
                        template.title.bold()
                    );
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        }
    };

    if let Err(e) = result {
        handle_error(e);
    }
}

fn handle_error(e: anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), e);
    std::process::exit(1);
}
