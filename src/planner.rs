use std::fmt;
use std::str::FromStr;

use chrono::{Duration, Local, NaiveDate};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{PilotError, Result};
use crate::models::{require_text, Milestone, PlannedTask};

/// Shape of the generated plan.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PlanTemplate {
    /// Two milestones: scope, then ship. Due dates split the deadline.
    #[default]
    Sprint,
    /// Three static milestones with descriptions and no due dates.
    Roadmap,
}

impl fmt::Display for PlanTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanTemplate::Sprint => f.write_str("sprint"),
            PlanTemplate::Roadmap => f.write_str("roadmap"),
        }
    }
}

impl FromStr for PlanTemplate {
    type Err = PilotError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sprint" => Ok(PlanTemplate::Sprint),
            "roadmap" => Ok(PlanTemplate::Roadmap),
            other => Err(PilotError::Validation(format!(
                "unknown plan template '{}': expected sprint or roadmap",
                other
            ))),
        }
    }
}

/// Expands a goal statement into milestones and tasks.
///
/// The planner is a pure template expander: the same statement, deadline and
/// `today` always give the same plan.
#[derive(Debug, Clone, Copy)]
pub struct Planner {
    template: PlanTemplate,
    today: NaiveDate,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(PlanTemplate::default())
    }
}

impl Planner {
    /// Planner anchored on the local calendar date.
    pub fn new(template: PlanTemplate) -> Self {
        Self {
            template,
            today: Local::now().date_naive(),
        }
    }

    /// Planner anchored on a fixed date.
    pub fn at(today: NaiveDate) -> Self {
        Self {
            template: PlanTemplate::default(),
            today,
        }
    }

    pub fn with_template(mut self, template: PlanTemplate) -> Self {
        self.template = template;
        self
    }

    pub fn template(&self) -> PlanTemplate {
        self.template
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Builds the ordered milestones for `statement`.
    ///
    /// Fails only when the statement is blank. Past deadlines are accepted and
    /// produce past due dates.
    pub fn generate(&self, statement: &str, deadline: Option<NaiveDate>) -> Result<Vec<Milestone>> {
        require_text("goal statement", statement)?;
        let milestones = match self.template {
            PlanTemplate::Sprint => self.sprint(statement, deadline),
            PlanTemplate::Roadmap => roadmap(),
        };
        debug!(
            "generated {} milestones ({} template) for '{}'",
            milestones.len(),
            self.template,
            statement
        );
        Ok(milestones)
    }

    fn sprint(&self, statement: &str, deadline: Option<NaiveDate>) -> Vec<Milestone> {
        vec![
            Milestone {
                title: "Understand & scope the goal".to_string(),
                description: None,
                due: deadline.map(|d| midpoint(self.today, d)),
                tasks: vec![
                    PlannedTask::new(format!("Clarify requirements for: {}", statement)),
                    PlannedTask::new("Agree on success criteria with the team"),
                    PlannedTask::new("Define constraints, tools and target users"),
                ],
            },
            Milestone {
                title: "Execute and ship MVP".to_string(),
                description: None,
                due: deadline,
                tasks: vec![
                    PlannedTask::new("Design backend routes & data flow"),
                    PlannedTask::new("Build frontend UI + connect to backend"),
                    PlannedTask::new("Test end-to-end and prepare demo pitch"),
                ],
            },
        ]
    }
}

/// `today` plus half the days remaining, rounded towards negative infinity.
fn midpoint(today: NaiveDate, deadline: NaiveDate) -> NaiveDate {
    let remaining = (deadline - today).num_days();
    today + Duration::days(remaining.div_euclid(2))
}

fn roadmap() -> Vec<Milestone> {
    let milestone = |title: &str, description: &str, tasks: [&str; 2]| Milestone {
        title: title.to_string(),
        description: Some(description.to_string()),
        due: None,
        tasks: tasks.iter().map(|t| PlannedTask::new(*t)).collect(),
    };
    vec![
        milestone(
            "Clarify and scope your goal",
            "Define what 'success' means for this goal and set a realistic timeline.",
            [
                "Write a clear one-sentence goal statement",
                "Define 2–3 success metrics",
            ],
        ),
        milestone(
            "Break goal into weekly tasks",
            "Create a breakdown of tasks and group them into weekly batches.",
            [
                "List all sub-tasks needed to reach your goal",
                "Group tasks by week and priority",
            ],
        ),
        milestone(
            "Set up a tracking system",
            "Choose how you will track progress (TaskPilot, Notion, spreadsheet, etc.).",
            [
                "Pick a tracking tool and create a project board",
                "Set aside weekly review time in your calendar",
            ],
        ),
    ]
}

/// Generates a sprint plan anchored on today's date.
pub fn generate_plan(statement: &str, deadline: Option<NaiveDate>) -> Result<Vec<Milestone>> {
    Planner::default().generate(statement, deadline)
}
