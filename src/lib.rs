pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod planner;
pub mod storage;
pub mod summary;
pub mod tracker;
pub mod tui;

pub use error::{PilotError, Result};
pub use storage::{JsonStore, MemoryStore, TaskStore};
