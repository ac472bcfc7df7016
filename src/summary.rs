use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::{Task, TaskStatus};

/// Completion counts over a set of tasks.
///
/// Every task lands in exactly one bucket, so
/// `completed + pending + missed == total`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub missed: usize,
}

impl Summary {
    /// Share of tasks completed, in percent. Zero for an empty set.
    pub fn percent_complete(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 * 100.0 / self.total as f64
    }

    fn add(&mut self, status: TaskStatus) {
        self.total += 1;
        match status {
            TaskStatus::Completed => self.completed += 1,
            TaskStatus::Pending => self.pending += 1,
            TaskStatus::Missed => self.missed += 1,
        }
    }
}

/// Counts tasks by status.
pub fn summarize<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Summary {
    let mut summary = Summary::default();
    for t in tasks {
        summary.add(t.status);
    }
    summary
}

/// Counts for the tasks of one milestone.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct MilestoneSummary {
    /// Milestone title, or `None` for tasks that carry no milestone label.
    pub milestone: Option<String>,
    pub summary: Summary,
}

/// Groups tasks by their milestone label, keeping the order in which each
/// label first appears.
pub fn summarize_by_milestone<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<MilestoneSummary> {
    let mut groups: Vec<MilestoneSummary> = Vec::new();
    for t in tasks {
        match groups.iter_mut().find(|g| g.milestone == t.milestone) {
            Some(g) => g.summary.add(t.status),
            None => {
                let mut summary = Summary::default();
                summary.add(t.status);
                groups.push(MilestoneSummary {
                    milestone: t.milestone.clone(),
                    summary,
                });
            }
        }
    }
    groups
}

/// Tasks meant for `today`: those with no recommended day, or recommended
/// for exactly that date.
pub fn select_for_day<'a>(tasks: impl IntoIterator<Item = &'a Task>, today: NaiveDate) -> Vec<Task> {
    tasks
        .into_iter()
        .filter(|t| t.recommended_day.map_or(true, |d| d == today))
        .cloned()
        .collect()
}

/// [`select_for_day`] against the local calendar date.
pub fn select_for_today<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<Task> {
    select_for_day(tasks, Local::now().date_naive())
}
