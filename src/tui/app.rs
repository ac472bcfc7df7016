use ratatui::widgets::TableState;

use crate::error::Result;
use crate::models::{GoalReport, GoalStatus, Task, TaskStatus};
use crate::storage::TaskStore;
use crate::summary::{summarize, Summary};
use crate::tracker::{query_status, update_task_status};

/// Which goals the dashboard lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GoalFilter {
    #[default]
    All,
    InProgress,
    Completed,
}

impl GoalFilter {
    pub fn next(self) -> Self {
        match self {
            GoalFilter::All => GoalFilter::InProgress,
            GoalFilter::InProgress => GoalFilter::Completed,
            GoalFilter::Completed => GoalFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GoalFilter::All => "all",
            GoalFilter::InProgress => "in progress",
            GoalFilter::Completed => "completed",
        }
    }

    fn accepts(self, status: GoalStatus) -> bool {
        match self {
            GoalFilter::All => true,
            GoalFilter::InProgress => status == GoalStatus::InProgress,
            GoalFilter::Completed => status == GoalStatus::Completed,
        }
    }
}

/// Dashboard totals across every goal, regardless of the filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Overview {
    pub goals: usize,
    pub tasks: Summary,
}

pub struct App<'a> {
    store: &'a dyn TaskStore,
    /// Goals passing the filter, newest first.
    pub reports: Vec<GoalReport>,
    pub overview: Overview,
    pub filter: GoalFilter,
    pub goal_state: TableState,
    pub task_state: TableState,
    /// Last error or confirmation, shown in the footer.
    pub message: Option<String>,
}

impl<'a> App<'a> {
    /// Creates the dashboard and loads the current goals.
    pub fn new(store: &'a dyn TaskStore) -> Result<App<'a>> {
        let mut app = App {
            store,
            reports: Vec::new(),
            overview: Overview::default(),
            filter: GoalFilter::default(),
            goal_state: TableState::default(),
            task_state: TableState::default(),
            message: None,
        };
        app.reload()?;
        Ok(app)
    }

    /// Re-reads goals from the store and keeps the selection in range.
    pub fn reload(&mut self) -> Result<()> {
        let all = query_status(self.store, None)?;
        self.overview = Overview {
            goals: all.len(),
            tasks: summarize(all.iter().flat_map(|r| r.tasks.iter())),
        };
        self.reports = all
            .into_iter()
            .filter(|r| self.filter.accepts(r.goal.status))
            .collect();

        clamp(&mut self.goal_state, self.reports.len());
        let task_count = self.selected_goal().map_or(0, |r| r.tasks.len());
        clamp(&mut self.task_state, task_count);
        Ok(())
    }

    pub fn selected_goal(&self) -> Option<&GoalReport> {
        self.goal_state.selected().and_then(|i| self.reports.get(i))
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let goal = self.selected_goal()?;
        self.task_state.selected().and_then(|i| goal.tasks.get(i))
    }

    pub fn next_goal(&mut self) {
        step(&mut self.goal_state, self.reports.len(), true);
        self.task_state.select(None);
        self.refresh_task_selection();
    }

    pub fn previous_goal(&mut self) {
        step(&mut self.goal_state, self.reports.len(), false);
        self.task_state.select(None);
        self.refresh_task_selection();
    }

    pub fn next_task(&mut self) {
        let len = self.selected_goal().map_or(0, |r| r.tasks.len());
        step(&mut self.task_state, len, true);
    }

    pub fn previous_task(&mut self) {
        let len = self.selected_goal().map_or(0, |r| r.tasks.len());
        step(&mut self.task_state, len, false);
    }

    /// Sets the status of the selected task.
    pub fn mark_selected(&mut self, status: TaskStatus) {
        let Some(id) = self.selected_task().map(|t| t.id) else {
            return;
        };
        let result = update_task_status(self.store, id, status).and_then(|t| {
            self.message = Some(format!("Task {} marked as {}", t.id, t.status));
            self.reload()
        });
        self.report(result);
    }

    /// Flips the selected goal between in progress and completed.
    pub fn toggle_goal_status(&mut self) {
        let Some(goal) = self.selected_goal().map(|r| r.goal.clone()) else {
            return;
        };
        let status = match goal.status {
            GoalStatus::InProgress => GoalStatus::Completed,
            GoalStatus::Completed => GoalStatus::InProgress,
        };
        let result = self.store.set_goal_status(goal.id, status).and_then(|g| {
            self.message = Some(format!("Goal {} is now {}", g.id, g.status));
            self.reload()
        });
        self.report(result);
    }

    /// Deletes the selected goal and its tasks.
    pub fn delete_selected_goal(&mut self) {
        let Some(id) = self.selected_goal().map(|r| r.goal.id) else {
            return;
        };
        let result = self.store.delete_goal(id).and_then(|(g, n)| {
            self.message = Some(format!("Goal {} removed with {} tasks", g.id, n));
            self.reload()
        });
        self.report(result);
    }

    pub fn cycle_filter(&mut self) {
        self.filter = self.filter.next();
        self.goal_state.select(None);
        self.task_state.select(None);
        let result = self.reload();
        self.report(result);
    }

    fn refresh_task_selection(&mut self) {
        let len = self.selected_goal().map_or(0, |r| r.tasks.len());
        clamp(&mut self.task_state, len);
    }

    fn report(&mut self, result: Result<()>) {
        if let Err(e) = result {
            self.message = Some(format!("Error: {}", e));
        }
    }
}

/// Keeps a selection valid for a list of `len` rows.
fn clamp(state: &mut TableState, len: usize) {
    if len == 0 {
        state.select(None);
    } else if let Some(i) = state.selected() {
        if i >= len {
            state.select(Some(len - 1));
        }
    } else {
        state.select(Some(0));
    }
}

/// Moves a selection one row, wrapping at either end.
fn step(state: &mut TableState, len: usize, forward: bool) {
    if len == 0 {
        return;
    }
    let i = match state.selected() {
        Some(i) if forward => (i + 1) % len,
        Some(0) => len - 1,
        Some(i) => i - 1,
        None => 0,
    };
    state.select(Some(i));
}
