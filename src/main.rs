//! # TaskPilot
//!
//! Turn a goal into milestones and tasks, then track every task until it is
//! completed or missed. TaskPilot combines a scriptable CLI with an
//! interactive TUI dashboard.
//!
//! ## Features
//!
//! *   **Plan generation**: A goal statement (and optional deadline) becomes an ordered plan of milestones and tasks.
//! *   **Status tracking**: Every task is `pending`, `completed` or `missed`; any status can be corrected at any time.
//! *   **Progress summaries**: Totals per goal and per milestone.
//! *   **Today view**: Tasks without a recommended day, or recommended for today.
//! *   **Data Persistence**: Goals and tasks are stored in one JSON file in the XDG data directory, or kept in memory.
//!
//! ## Usage
//!
//! ### Interactive Mode (TUI)
//!
//! ```bash
//! taskpilot
//! # or explicitly
//! taskpilot ui
//! ```
//!
//! **Dashboard keys**
//! *   `q`: Quit
//! *   `j`/`k`: Next/previous goal
//! *   `J`/`K`: Next/previous task
//! *   `c`/`m`/`p`: Mark selected task completed/missed/pending
//! *   `g`: Toggle goal completed
//! *   `f`: Cycle goal filter (all, in progress, completed)
//! *   `d`: Delete selected goal and its tasks
//!
//! ### Command Line Interface (CLI)
//!
//! ```bash
//! # Plan and store a goal
//! taskpilot plan "Run a marathon" --deadline 2026-09-01
//!
//! # Preview without storing
//! taskpilot plan "Launch my shoe brand" --template roadmap --preview
//!
//! # Status of all goals, or one
//! taskpilot status
//! taskpilot status --goal-id 3
//!
//! # Track tasks
//! taskpilot update 7 completed
//! taskpilot schedule 8 --day 2026-06-01 --minutes 45
//! taskpilot schedule 8 --clear-day
//! taskpilot today
//! ```
//!
//! ## Data Storage
//!
//! *   Linux: `~/.local/share/taskpilot/taskpilot.json`
//! *   macOS: `~/Library/Application Support/taskpilot/taskpilot.json`
//! *   Windows: `%APPDATA%\taskpilot\taskpilot.json`
//!
//! Override with the `TASKPILOT_DB` environment variable or `store_path` in
//! `~/.config/taskpilot/config.yml`.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use log::{debug, info};

use taskpilot::commands::*;
use taskpilot::config::Config;
use taskpilot::models::{GoalStatus, TaskStatus};
use taskpilot::planner::{PlanTemplate, Planner};
use taskpilot::storage::open_store;
use taskpilot::tui::run_tui;

#[derive(Parser)]
#[command(name = "taskpilot")]
#[command(version, about = "Plan goals and track their tasks", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a plan for a goal and store it
    Plan {
        /// Your main goal, e.g. "Launch my shoe brand in 3 months"
        goal: String,
        /// Deadline in YYYY-MM-DD
        #[arg(short, long, value_parser = parse_date)]
        deadline: Option<NaiveDate>,
        /// Plan shape (sprint, roadmap)
        #[arg(short, long)]
        template: Option<PlanTemplate>,
        /// Only print the plan, do not store it
        #[arg(long)]
        preview: bool,
    },
    /// Show goals and their tasks, newest first
    Status {
        /// Only this goal
        #[arg(short, long)]
        goal_id: Option<u64>,
        /// Only goals with this status (in_progress, completed)
        #[arg(long)]
        only: Option<GoalStatus>,
    },
    /// Set a task's status
    Update {
        task_id: u64,
        /// pending, completed or missed
        status: TaskStatus,
    },
    /// Set the recommended day and/or duration of a task
    Schedule {
        task_id: u64,
        /// Day in YYYY-MM-DD
        #[arg(short, long, value_parser = parse_date)]
        day: Option<NaiveDate>,
        /// Remove the recommended day so the task shows up every day
        #[arg(long, conflicts_with = "day")]
        clear_day: bool,
        /// Estimated duration in minutes
        #[arg(short, long, allow_negative_numbers = true)]
        minutes: Option<i64>,
    },
    /// Tasks for today
    Today,
    /// Daily review of today's tasks and overall progress
    Review,
    /// Completion counts, broken down by milestone
    Summary {
        #[arg(short, long)]
        goal_id: Option<u64>,
    },
    /// Manage goals
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },
    /// Print the agent instruction for a task or goal
    Brief {
        #[arg(short, long)]
        task: Option<u64>,
        #[arg(short, long)]
        goal: Option<u64>,
    },
    /// Reset the database (delete all goals and tasks)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Open interactive TUI
    Ui,
}

#[derive(Subcommand)]
enum GoalCommands {
    /// Mark a goal completed
    Complete { goal_id: u64 },
    /// Move a goal back to in progress
    Reopen { goal_id: u64 },
    /// Delete a goal and all its tasks
    Remove { goal_id: u64 },
}

fn setup_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(cli: Cli) -> taskpilot::Result<()> {
    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "taskpilot", &mut io::stdout());
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;
    let store = open_store(config.backend, &config.store_path)?;
    info!("taskpilot using {} store at {}", store.location(), config.store_path.display());
    let store = store.as_ref();

    match cli.command {
        Some(Commands::Plan { goal, deadline, template, preview }) => {
            let planner = Planner::new(template.unwrap_or(config.plan_template));
            cmd_plan(store, &planner, &goal, deadline, preview)
        }
        Some(Commands::Status { goal_id, only }) => cmd_status(store, goal_id, only),
        Some(Commands::Update { task_id, status }) => cmd_update(store, task_id, status),
        Some(Commands::Schedule { task_id, day, clear_day, minutes }) => {
            cmd_schedule(store, task_id, day, clear_day, minutes)
        }
        Some(Commands::Today) => cmd_today(store),
        Some(Commands::Review) => cmd_review(store),
        Some(Commands::Summary { goal_id }) => cmd_summary(store, goal_id),
        Some(Commands::Goal { command }) => match command {
            GoalCommands::Complete { goal_id } => cmd_goal_status(store, goal_id, GoalStatus::Completed),
            GoalCommands::Reopen { goal_id } => cmd_goal_status(store, goal_id, GoalStatus::InProgress),
            GoalCommands::Remove { goal_id } => cmd_goal_remove(store, goal_id),
        },
        Some(Commands::Brief { task, goal }) => cmd_brief(store, task, goal),
        Some(Commands::Reset { force }) => cmd_reset(store, force),
        Some(Commands::Completions { .. }) => Ok(()),
        Some(Commands::Ui) | None => run_tui(store),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{:?}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
