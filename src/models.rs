use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PilotError;

/// Lifecycle of a goal as a whole.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    InProgress,
    Completed,
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GoalStatus::InProgress => "in_progress",
            GoalStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

impl FromStr for GoalStatus {
    type Err = PilotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in_progress" | "in-progress" => Ok(GoalStatus::InProgress),
            "completed" => Ok(GoalStatus::Completed),
            other => Err(PilotError::Validation(format!(
                "invalid goal status '{}': expected in_progress or completed",
                other
            ))),
        }
    }
}

/// The three states a task can be in. Any state may move to any other.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
    Missed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Completed => "completed",
            TaskStatus::Missed => "missed",
        };
        f.write_str(s)
    }
}

impl FromStr for TaskStatus {
    type Err = PilotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "completed" => Ok(TaskStatus::Completed),
            "missed" => Ok(TaskStatus::Missed),
            other => Err(PilotError::Validation(format!(
                "invalid task status '{}': expected pending, completed or missed",
                other
            ))),
        }
    }
}

/// A tracked top-level objective.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Goal {
    /// Identifier assigned by the store.
    pub id: u64,
    /// The goal text as the user wrote it.
    pub statement: String,
    #[serde(default)]
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
    /// Refreshed whenever the goal or one of its tasks changes.
    pub updated_at: DateTime<Utc>,
}

/// A persisted unit of work belonging to exactly one goal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    /// Identifier assigned by the store, never reused.
    pub id: u64,
    pub goal_id: u64,
    pub title: String,
    /// Title of the milestone that produced this task.
    #[serde(default)]
    pub milestone: Option<String>,
    /// Estimated duration in minutes.
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    /// Day the task is meant to be worked on.
    #[serde(default)]
    pub recommended_day: Option<NaiveDate>,
    #[serde(default)]
    pub status: TaskStatus,
}

/// A task as handed to the store, before it has an identifier.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewTask {
    pub title: String,
    pub milestone: Option<String>,
    pub duration_minutes: Option<u32>,
    pub recommended_day: Option<NaiveDate>,
}

/// A task inside a generated plan. `id` is filled in once the task is persisted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlannedTask {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub title: String,
    #[serde(default)]
    pub status: TaskStatus,
}

impl PlannedTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: None,
            title: title.into(),
            status: TaskStatus::Pending,
        }
    }
}

/// A named group of planned tasks. Only exists at plan time; tasks carry its
/// title in their `milestone` field once stored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Milestone {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due: Option<NaiveDate>,
    pub tasks: Vec<PlannedTask>,
}

impl Milestone {
    /// Flattens the milestone into store-ready tasks, keeping order.
    pub fn new_tasks(&self) -> impl Iterator<Item = NewTask> + '_ {
        self.tasks.iter().map(move |t| NewTask {
            title: t.title.clone(),
            milestone: Some(self.title.clone()),
            duration_minutes: None,
            recommended_day: None,
        })
    }
}

/// A goal together with its tasks in creation order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GoalReport {
    pub goal: Goal,
    pub tasks: Vec<Task>,
}

/// A freshly created goal and the plan whose tasks now carry real identifiers.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlannedGoal {
    pub goal: Goal,
    pub milestones: Vec<Milestone>,
}

/// Rejects blank goal statements and task titles.
pub fn require_text(field: &str, value: &str) -> Result<(), PilotError> {
    if value.trim().is_empty() {
        return Err(PilotError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Converts a caller-supplied minute count into a stored duration.
pub fn validate_duration(minutes: i64) -> Result<u32, PilotError> {
    if minutes < 0 {
        return Err(PilotError::Validation(format!(
            "duration must be non-negative, got {} minutes",
            minutes
        )));
    }
    u32::try_from(minutes)
        .map_err(|_| PilotError::Validation(format!("duration of {} minutes is too large", minutes)))
}
