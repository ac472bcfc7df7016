use std::io::{self, Write};

use chrono::{Local, NaiveDate};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::error::{PilotError, Result};
use crate::models::{GoalStatus, Milestone, Task, TaskStatus};
use crate::planner::Planner;
use crate::storage::TaskStore;
use crate::summary::{summarize, summarize_by_milestone, Summary};
use crate::tracker::{
    create_goal_with_plan, daily_review, instruction_for_goal, instruction_for_task, query_status,
    schedule_task, summarize_goal, update_task_status,
};

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| PilotError::Validation(format!("invalid date '{}': {}. Use YYYY-MM-DD.", s, e)))
}

fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Completed => Color::Green,
        TaskStatus::Pending => Color::Yellow,
        TaskStatus::Missed => Color::Red,
    }
}

fn header(names: &[&str]) -> Vec<Cell> {
    names
        .iter()
        .map(|n| Cell::new(n).add_attribute(Attribute::Bold))
        .collect()
}

fn task_table(tasks: &[Task]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&["ID", "Task", "Milestone", "Day", "Min", "Status"]));

    for t in tasks {
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.title),
            Cell::new(t.milestone.clone().unwrap_or_default()),
            Cell::new(t.recommended_day.map(|d| d.to_string()).unwrap_or_else(|| "-".into())),
            Cell::new(t.duration_minutes.map(|m| m.to_string()).unwrap_or_else(|| "-".into())),
            Cell::new(t.status).fg(status_color(t.status)),
        ]);
    }
    table
}

fn print_summary(summary: &Summary) {
    println!(
        "{}/{} completed ({:.0}%), {} pending, {} missed",
        summary.completed,
        summary.total,
        summary.percent_complete(),
        summary.pending,
        summary.missed
    );
}

fn print_milestones(milestones: &[Milestone]) {
    for (i, m) in milestones.iter().enumerate() {
        match m.due {
            Some(due) => println!("Milestone {}: {} (due {})", i + 1, m.title, due),
            None => println!("Milestone {}: {}", i + 1, m.title),
        }
        if let Some(desc) = &m.description {
            println!("    {}", desc);
        }
        if m.tasks.is_empty() {
            println!("    (No tasks defined)");
        }
        for t in &m.tasks {
            let id = t.id.map(|id| format!("#{} ", id)).unwrap_or_default();
            println!("    - [{:^9}] {}{}", t.status.to_string(), id, t.title);
        }
        println!();
    }
}

/// Generates a plan for `goal`. Unless `preview` is set, the goal and its
/// tasks are stored.
pub fn cmd_plan(
    store: &dyn TaskStore,
    planner: &Planner,
    goal: &str,
    deadline: Option<NaiveDate>,
    preview: bool,
) -> Result<()> {
    if preview {
        let milestones = planner.generate(goal, deadline)?;
        println!("Plan preview for: {} ({} template)\n", goal, planner.template());
        print_milestones(&milestones);
        return Ok(());
    }

    let planned = create_goal_with_plan(store, planner, goal, deadline)?;
    println!("Goal {} created: {}\n", planned.goal.id, planned.goal.statement);
    print_milestones(&planned.milestones);
    Ok(())
}

/// Lists goals, newest first, each with its tasks.
pub fn cmd_status(store: &dyn TaskStore, goal_id: Option<u64>, only: Option<GoalStatus>) -> Result<()> {
    let mut reports = query_status(store, goal_id)?;
    if let Some(status) = only {
        reports.retain(|r| r.goal.status == status);
    }
    if reports.is_empty() {
        match goal_id {
            Some(id) => println!("No goal with id {}.", id),
            None => println!("No goals found yet. Try creating one with `taskpilot plan`."),
        }
        return Ok(());
    }

    for r in reports {
        println!("Goal {}: {}", r.goal.id, r.goal.statement);
        println!("    Status: {}", r.goal.status);
        print!("    Progress: ");
        print_summary(&summarize(&r.tasks));
        if r.tasks.is_empty() {
            println!("    (No tasks)");
        } else {
            println!("{}", task_table(&r.tasks));
        }
        println!();
    }
    Ok(())
}

pub fn cmd_update(store: &dyn TaskStore, task_id: u64, status: TaskStatus) -> Result<()> {
    let task = update_task_status(store, task_id, status)?;
    println!("Task {} marked as {}.", task.id, task.status);
    Ok(())
}

pub fn cmd_schedule(
    store: &dyn TaskStore,
    task_id: u64,
    day: Option<NaiveDate>,
    clear_day: bool,
    minutes: Option<i64>,
) -> Result<()> {
    let day = if clear_day { Some(None) } else { day.map(Some) };
    let task = schedule_task(store, task_id, day, minutes)?;
    println!("Task {} updated.", task.id);
    println!("{}", task_table(&[task]));
    Ok(())
}

/// Shows tasks due today together with overall progress.
pub fn cmd_today(store: &dyn TaskStore) -> Result<()> {
    let review = daily_review(store, Local::now().date_naive())?;
    if review.tasks.is_empty() {
        println!("Nothing planned for {}.", review.date);
    } else {
        println!("Tasks for {}:", review.date);
        println!("{}", task_table(&review.tasks));
    }
    print_summary(&review.summary);
    Ok(())
}

/// Daily review: what is left for today, and what has slipped.
pub fn cmd_review(store: &dyn TaskStore) -> Result<()> {
    let today = Local::now().date_naive();
    let review = daily_review(store, today)?;
    let open: Vec<Task> = review
        .tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Pending)
        .cloned()
        .collect();
    let overdue: Vec<Task> = store
        .tasks(None)?
        .into_iter()
        .filter(|t| t.status == TaskStatus::Pending && t.recommended_day.is_some_and(|d| d < today))
        .collect();

    println!("Daily review for {}", review.date);
    print!("Overall: ");
    print_summary(&review.summary);

    if open.is_empty() {
        println!("\nNo open tasks for today.");
    } else {
        println!("\nOpen today:");
        println!("{}", task_table(&open));
    }
    if !overdue.is_empty() {
        println!("\nPast their day and still pending (consider `update <id> missed`):");
        println!("{}", task_table(&overdue));
    }
    Ok(())
}

/// Prints overall or per-goal counts, broken down by milestone.
pub fn cmd_summary(store: &dyn TaskStore, goal_id: Option<u64>) -> Result<()> {
    let summary = summarize_goal(store, goal_id)?;
    let tasks = store.tasks(goal_id)?;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(header(&["Milestone", "Total", "Completed", "Pending", "Missed", "Done %"]));
    for group in summarize_by_milestone(&tasks) {
        let s = group.summary;
        table.add_row(vec![
            Cell::new(group.milestone.unwrap_or_else(|| "-".into())),
            Cell::new(s.total),
            Cell::new(s.completed).fg(Color::Green),
            Cell::new(s.pending).fg(Color::Yellow),
            Cell::new(s.missed).fg(Color::Red),
            Cell::new(format!("{:.0}", s.percent_complete())),
        ]);
    }
    table.add_row(vec![
        Cell::new("All").add_attribute(Attribute::Bold),
        Cell::new(summary.total).add_attribute(Attribute::Bold),
        Cell::new(summary.completed).add_attribute(Attribute::Bold),
        Cell::new(summary.pending).add_attribute(Attribute::Bold),
        Cell::new(summary.missed).add_attribute(Attribute::Bold),
        Cell::new(format!("{:.0}", summary.percent_complete())).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    Ok(())
}

pub fn cmd_goal_status(store: &dyn TaskStore, goal_id: u64, status: GoalStatus) -> Result<()> {
    let goal = store.set_goal_status(goal_id, status)?;
    println!("Goal {} is now {}.", goal.id, goal.status);
    Ok(())
}

pub fn cmd_goal_remove(store: &dyn TaskStore, goal_id: u64) -> Result<()> {
    let (goal, removed) = store.delete_goal(goal_id)?;
    println!("Goal {} removed along with {} tasks.", goal.id, removed);
    Ok(())
}

/// Prints the instruction an automation agent would receive.
pub fn cmd_brief(store: &dyn TaskStore, task_id: Option<u64>, goal_id: Option<u64>) -> Result<()> {
    let instruction = match (task_id, goal_id) {
        (Some(_), Some(_)) => {
            return Err(PilotError::Validation(
                "provide either a task or a goal, not both".to_string(),
            ))
        }
        (Some(id), None) => instruction_for_task(store, id)?,
        (None, Some(id)) => instruction_for_goal(store, id)?,
        (None, None) => {
            return Err(PilotError::Validation(
                "either a task or a goal must be provided".to_string(),
            ))
        }
    };
    println!("{}", instruction);
    Ok(())
}

/// Deletes every goal and task.
pub fn cmd_reset(store: &dyn TaskStore, force: bool) -> Result<()> {
    if !force {
        print!("Are you sure you want to delete all goals and tasks? This cannot be undone. [y/N] ");
        io::stdout()
            .flush()
            .map_err(PilotError::Terminal)?;
        let mut input = String::new();
        io::stdin()
            .read_line(&mut input)
            .map_err(PilotError::Terminal)?;
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return Ok(());
        }
    }

    store.clear()?;
    println!("Database reset successfully.");
    Ok(())
}
