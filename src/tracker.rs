//! Goal and task operations over an injected [`TaskStore`].
//!
//! Every function takes the store explicitly; there is no global state.

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::{PilotError, Result};
use crate::models::{validate_duration, GoalReport, NewTask, PlannedGoal, Task, TaskStatus};
use crate::planner::Planner;
use crate::storage::TaskStore;
use crate::summary::{select_for_day, summarize, Summary};

pub use crate::planner::generate_plan;

/// Generates a plan for `statement` and stores the goal with all its tasks
/// in one write.
///
/// The returned milestones carry the identifiers the store assigned, taken
/// from the insert itself rather than from a second read.
pub fn create_goal_with_plan(
    store: &dyn TaskStore,
    planner: &Planner,
    statement: &str,
    deadline: Option<NaiveDate>,
) -> Result<PlannedGoal> {
    let mut milestones = planner.generate(statement, deadline)?;
    let new_tasks: Vec<NewTask> = milestones.iter().flat_map(|m| m.new_tasks()).collect();

    let (goal, stored) = store.insert_goal(statement, &new_tasks)?;
    if stored.len() != new_tasks.len() {
        return Err(PilotError::unavailable(
            store.location(),
            format!("stored {} of {} planned tasks", stored.len(), new_tasks.len()),
        ));
    }

    let planned = milestones.iter_mut().flat_map(|m| m.tasks.iter_mut());
    for (p, t) in planned.zip(&stored) {
        p.id = Some(t.id);
        p.status = t.status;
    }

    info!("planned goal {} '{}'", goal.id, goal.statement);
    Ok(PlannedGoal { goal, milestones })
}

/// Goals with their tasks, newest goal first.
///
/// With `goal_id` set, the result holds that goal only, or nothing if it
/// does not exist.
pub fn query_status(store: &dyn TaskStore, goal_id: Option<u64>) -> Result<Vec<GoalReport>> {
    let db = store.load()?;
    let mut goals: Vec<_> = db
        .goals()
        .iter()
        .filter(|g| goal_id.map_or(true, |id| g.id == id))
        .cloned()
        .collect();
    goals.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

    Ok(goals
        .into_iter()
        .map(|goal| {
            let tasks = db.tasks_of(goal.id).cloned().collect();
            GoalReport { goal, tasks }
        })
        .collect())
}

/// Sets a task's status. Any status may replace any other, including itself.
pub fn update_task_status(store: &dyn TaskStore, task_id: u64, status: TaskStatus) -> Result<Task> {
    store.update_status(task_id, status)
}

/// Counts over one goal's tasks, or over every task when `goal_id` is `None`.
pub fn summarize_goal(store: &dyn TaskStore, goal_id: Option<u64>) -> Result<Summary> {
    let db = store.load()?;
    match goal_id {
        Some(id) => {
            db.goal(id)?;
            Ok(summarize(db.tasks_of(id)))
        }
        None => Ok(summarize(db.tasks())),
    }
}

/// Sets the recommended day and/or estimated duration of a task.
///
/// `day` of `Some(None)` clears the recommended day, putting the task back
/// into every day's selection.
pub fn schedule_task(
    store: &dyn TaskStore,
    task_id: u64,
    day: Option<Option<NaiveDate>>,
    duration_minutes: Option<i64>,
) -> Result<Task> {
    if day.is_none() && duration_minutes.is_none() {
        return Err(PilotError::Validation(
            "nothing to schedule: give or clear a day, a duration or both".to_string(),
        ));
    }
    let minutes = duration_minutes.map(validate_duration).transpose()?;
    let task = store.schedule_task(task_id, day, minutes)?;
    debug!(
        "scheduled task {} for {:?} ({:?} min)",
        task.id, task.recommended_day, task.duration_minutes
    );
    Ok(task)
}

/// What a daily review looks at: the tasks for the day and overall progress.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DailyReview {
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
    pub summary: Summary,
}

pub fn daily_review(store: &dyn TaskStore, today: NaiveDate) -> Result<DailyReview> {
    let db = store.load()?;
    Ok(DailyReview {
        date: today,
        tasks: select_for_day(db.tasks(), today),
        summary: summarize(db.tasks()),
    })
}

/// Brief handed to an automation agent for a single task.
pub fn instruction_for_task(store: &dyn TaskStore, task_id: u64) -> Result<String> {
    let task = store.task(task_id)?;
    Ok(format!("Work on task: {}", task.title))
}

/// Brief handed to an automation agent for a whole goal.
pub fn instruction_for_goal(store: &dyn TaskStore, goal_id: u64) -> Result<String> {
    let goal = store.goal(goal_id)?;
    Ok(format!("Work on goal: {}", goal.statement))
}
