use comfy_table::{Cell, Color, Row, Table};
use taskmill_core::models::RecurringTemplate;
use taskmill_core::recurrence::should_fire;

pub fn display_templates(templates: &[RecurringTemplate]) {
    if templates.is_empty() {
        println!("No templates found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ID",
        "Title",
        "Recurrence",
        "Window",
        "Status",
        "Last fired",
    ]);

    for template in templates {
        let mut row = Row::new();
        row.add_cell(Cell::new(&template.id.to_string()[..8]));
        row.add_cell(Cell::new(&template.title));
        row.add_cell(Cell::new(describe_rule(template)));

        let window = match template.rule.end_date {
            Some(end) => format!("{} → {}", template.rule.start_date, end),
            None => format!("{} →", template.rule.start_date),
        };
        row.add_cell(Cell::new(window));

        let status_cell = if !template.is_active {
            Cell::new("paused").fg(Color::Yellow)
        } else if due_today(template) {
            Cell::new("due today").fg(Color::Cyan)
        } else {
            Cell::new("active").fg(Color::Green)
        };
        row.add_cell(status_cell);

        let last_fired = template
            .last_fired_at
            .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "never".to_string());
        row.add_cell(Cell::new(last_fired));

        table.add_row(row);
    }

    println!("{table}");
}

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

fn describe_rule(template: &RecurringTemplate) -> String {
    let rule = &template.rule;
    let mut parts = vec![match rule.interval {
        1 => rule.frequency.to_string(),
        n => format!("{} (every {n})", rule.frequency),
    }];

    if let Some(dom) = rule.day_of_month {
        parts.push(format!("day {dom}"));
    } else if let (Some(week), Some(dow)) = (rule.week_of_month, rule.day_of_week) {
        let weekday = WEEKDAYS.get(dow as usize).copied().unwrap_or("?");
        parts.push(format!("week {week} {weekday}"));
    } else if let Some(dow) = rule.day_of_week {
        let weekday = WEEKDAYS.get(dow as usize).copied().unwrap_or("?");
        parts.push(weekday.to_string());
    }

    parts.join(", ")
}

/// Display hint only; the scheduler makes the real firing decision.
fn due_today(template: &RecurringTemplate) -> bool {
    should_fire(
        &template.rule,
        template.last_fired_at,
        chrono::Utc::now().date_naive(),
    )
}
