use chrono::{NaiveDate, Utc};
use tracing::{error, info};

use crate::error::CoreError;
use crate::materialize;
use crate::models::{CreatedTask, RecurringTemplate};
use crate::recurrence::should_fire;
use crate::repository::{TaskService, TemplateRepository};

/// Outcome of one evaluation pass, modeled after the materialization
/// summaries the rest of the backend reports.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// The date every template was evaluated against.
    pub check_date: NaiveDate,
    /// Tasks actually created; may be lower than the number of due
    /// templates when isolated failures occurred.
    pub tasks_created: usize,
    /// Templates skipped this pass because of an isolated failure.
    pub templates_failed: usize,
    /// Detailed error messages, one per failed template.
    pub errors: Vec<String>,
    pub duration_ms: u64,
}

/// Orchestrates one evaluation pass over all active templates.
///
/// The pass is a single sequential global sweep: no tenant scoping and no
/// internal parallelism. Two concurrent runs for the same date can both pass
/// the already-fired-today guard before either marks its template fired and
/// spawn duplicate tasks; a single concurrent invocation is the supported
/// mode (see DESIGN.md for the hardening options).
pub struct Scheduler<R, T> {
    templates: R,
    tasks: T,
}

impl<R, T> Scheduler<R, T>
where
    R: TemplateRepository,
    T: TaskService,
{
    pub fn new(templates: R, tasks: T) -> Self {
        Self { templates, tasks }
    }

    /// Runs one pass for today's date.
    pub async fn run_today(&self) -> Result<RunSummary, CoreError> {
        self.run(Utc::now().date_naive()).await
    }

    /// Runs one pass for `check_date`.
    ///
    /// Only a failure to fetch the candidate set is fatal. A failure while
    /// materializing, creating, or marking a single template is logged and
    /// that template is skipped for this pass; since its `last_fired_at` was
    /// not advanced it stays eligible on the next run. Tasks created earlier
    /// in the pass are never rolled back.
    pub async fn run(&self, check_date: NaiveDate) -> Result<RunSummary, CoreError> {
        let started = std::time::Instant::now();
        let candidates = self.templates.fetch_active_due(check_date).await?;
        info!(
            count = candidates.len(),
            %check_date,
            "evaluating recurring templates"
        );

        let mut summary = RunSummary {
            check_date,
            ..Default::default()
        };

        for template in &candidates {
            if !should_fire(&template.rule, template.last_fired_at, check_date) {
                continue;
            }

            match self.fire(template, check_date).await {
                Ok(created) => {
                    summary.tasks_created += 1;
                    info!(
                        template_id = %template.id,
                        task_id = %created.id,
                        title = %created.title,
                        "created task from recurring template"
                    );
                }
                Err(e) => {
                    summary.templates_failed += 1;
                    summary.errors.push(format!("template {}: {e}", template.id));
                    error!(
                        template_id = %template.id,
                        error = %e,
                        "failed to create task from recurring template"
                    );
                }
            }
        }

        summary.duration_ms = started.elapsed().as_millis() as u64;
        info!(
            tasks_created = summary.tasks_created,
            templates_failed = summary.templates_failed,
            "scheduler pass completed"
        );
        Ok(summary)
    }

    /// Materialize, hand off to task creation, then record the fire.
    /// `last_fired_at` is only advanced after the task exists.
    async fn fire(
        &self,
        template: &RecurringTemplate,
        check_date: NaiveDate,
    ) -> Result<CreatedTask, CoreError> {
        let request = materialize::instantiate(template, check_date)?;
        let created = self
            .tasks
            .create_task(request, template.agency_id, template.created_by)
            .await?;
        self.templates.mark_fired(template.id, Utc::now()).await?;
        Ok(created)
    }
}
