use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, RwLock};

use chrono::{DateTime, NaiveDate, Utc};
use fs2::FileExt;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{PilotError, Result};
use crate::models::{require_text, Goal, GoalStatus, NewTask, Task, TaskStatus};

/// Everything a store persists: goals, tasks and the identifier counters.
///
/// Counters only ever grow, so an identifier freed by a delete is never
/// handed out again.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Database {
    #[serde(default)]
    next_goal_id: u64,
    #[serde(default)]
    next_task_id: u64,
    #[serde(default)]
    goals: Vec<Goal>,
    #[serde(default)]
    tasks: Vec<Task>,
}

impl Database {
    /// Goals in insertion order.
    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Tasks in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn goal(&self, id: u64) -> Result<&Goal> {
        self.goals
            .iter()
            .find(|g| g.id == id)
            .ok_or(PilotError::GoalNotFound(id))
    }

    pub fn task(&self, id: u64) -> Result<&Task> {
        self.tasks
            .iter()
            .find(|t| t.id == id)
            .ok_or(PilotError::TaskNotFound(id))
    }

    /// Tasks of one goal, in the order they were created.
    pub fn tasks_of(&self, goal_id: u64) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| t.goal_id == goal_id)
    }

    /// Adds a goal and its tasks. Validation happens before anything is
    /// written, so a rejected call leaves the database untouched.
    pub fn insert_goal(
        &mut self,
        statement: &str,
        new_tasks: &[NewTask],
        now: DateTime<Utc>,
    ) -> Result<(Goal, Vec<Task>)> {
        require_text("goal statement", statement)?;
        for t in new_tasks {
            require_text("task title", &t.title)?;
        }

        self.next_goal_id += 1;
        let goal = Goal {
            id: self.next_goal_id,
            statement: statement.to_string(),
            status: GoalStatus::InProgress,
            created_at: now,
            updated_at: now,
        };
        self.goals.push(goal.clone());

        let mut created = Vec::with_capacity(new_tasks.len());
        for t in new_tasks {
            self.next_task_id += 1;
            let task = Task {
                id: self.next_task_id,
                goal_id: goal.id,
                title: t.title.clone(),
                milestone: t.milestone.clone(),
                duration_minutes: t.duration_minutes,
                recommended_day: t.recommended_day,
                status: TaskStatus::Pending,
            };
            self.tasks.push(task.clone());
            created.push(task);
        }
        Ok((goal, created))
    }

    /// Replaces a task's status and nothing else.
    pub fn set_task_status(&mut self, id: u64, status: TaskStatus, now: DateTime<Utc>) -> Result<Task> {
        let task = self.task_mut(id)?;
        task.status = status;
        let task = task.clone();
        self.touch_goal(task.goal_id, now);
        Ok(task)
    }

    /// Sets the recommended day and/or duration of a task. `None` leaves the
    /// field as it is; `Some(None)` clears the recommended day.
    pub fn schedule_task(
        &mut self,
        id: u64,
        day: Option<Option<NaiveDate>>,
        duration_minutes: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<Task> {
        let task = self.task_mut(id)?;
        if let Some(d) = day {
            task.recommended_day = d;
        }
        if let Some(m) = duration_minutes {
            task.duration_minutes = Some(m);
        }
        let task = task.clone();
        self.touch_goal(task.goal_id, now);
        Ok(task)
    }

    pub fn set_goal_status(&mut self, id: u64, status: GoalStatus, now: DateTime<Utc>) -> Result<Goal> {
        let goal = self
            .goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(PilotError::GoalNotFound(id))?;
        goal.status = status;
        goal.updated_at = now.max(goal.created_at);
        Ok(goal.clone())
    }

    /// Removes a goal along with every task that belongs to it.
    pub fn delete_goal(&mut self, id: u64) -> Result<(Goal, usize)> {
        let pos = self
            .goals
            .iter()
            .position(|g| g.id == id)
            .ok_or(PilotError::GoalNotFound(id))?;
        let goal = self.goals.remove(pos);
        let before = self.tasks.len();
        self.tasks.retain(|t| t.goal_id != id);
        Ok((goal, before - self.tasks.len()))
    }

    /// Drops all goals and tasks but keeps the identifier counters.
    pub fn clear(&mut self) {
        self.goals.clear();
        self.tasks.clear();
    }

    fn task_mut(&mut self, id: u64) -> Result<&mut Task> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(PilotError::TaskNotFound(id))
    }

    fn touch_goal(&mut self, goal_id: u64, now: DateTime<Utc>) {
        if let Some(g) = self.goals.iter_mut().find(|g| g.id == goal_id) {
            g.updated_at = now.max(g.created_at);
        }
    }
}

/// Exclusive write access to a store, released on drop.
///
/// Always holds the in-process lock; file-backed stores also hold an OS
/// advisory lock so separate processes on the same file take turns.
pub struct WriteGuard<'a> {
    _local: MutexGuard<'a, ()>,
    _file: Option<File>,
}

/// Keyed persistence for goals and tasks.
///
/// Implementors provide whole-database `load`/`save` and a writer lock; every
/// mutation below runs as load, modify, save under that lock, so a failure
/// at any step leaves the previous state in place.
pub trait TaskStore: Send + Sync {
    /// Reads a consistent copy of the database.
    fn load(&self) -> Result<Database>;

    /// Replaces the stored database in one step.
    fn save(&self, db: &Database) -> Result<()>;

    /// Held for the duration of a load-modify-save cycle.
    fn writer(&self) -> Result<WriteGuard<'_>>;

    /// Short human-readable location, used in logs.
    fn location(&self) -> String;

    fn goal(&self, id: u64) -> Result<Goal> {
        self.load()?.goal(id).cloned()
    }

    fn task(&self, id: u64) -> Result<Task> {
        self.load()?.task(id).cloned()
    }

    /// All tasks, or only those of `goal_id`, in creation order.
    fn tasks(&self, goal_id: Option<u64>) -> Result<Vec<Task>> {
        let db = self.load()?;
        Ok(match goal_id {
            Some(id) => db.tasks_of(id).cloned().collect(),
            None => db.tasks().to_vec(),
        })
    }

    /// Persists a goal and its tasks as one unit, returning the stored tasks
    /// in the order they were given.
    fn insert_goal(&self, statement: &str, tasks: &[NewTask]) -> Result<(Goal, Vec<Task>)> {
        let created = mutate(self, |db| db.insert_goal(statement, tasks, Utc::now()))?;
        info!(
            "created goal {} with {} tasks in {}",
            created.0.id,
            created.1.len(),
            self.location()
        );
        Ok(created)
    }

    fn update_status(&self, task_id: u64, status: TaskStatus) -> Result<Task> {
        let task = mutate(self, |db| db.set_task_status(task_id, status, Utc::now()))?;
        debug!("task {} is now {}", task.id, task.status);
        Ok(task)
    }

    fn schedule_task(
        &self,
        task_id: u64,
        day: Option<Option<NaiveDate>>,
        duration_minutes: Option<u32>,
    ) -> Result<Task> {
        mutate(self, |db| db.schedule_task(task_id, day, duration_minutes, Utc::now()))
    }

    fn set_goal_status(&self, goal_id: u64, status: GoalStatus) -> Result<Goal> {
        mutate(self, |db| db.set_goal_status(goal_id, status, Utc::now()))
    }

    /// Deletes a goal and its tasks, returning the goal and the task count removed.
    fn delete_goal(&self, goal_id: u64) -> Result<(Goal, usize)> {
        let removed = mutate(self, |db| db.delete_goal(goal_id))?;
        info!("deleted goal {} and {} tasks", goal_id, removed.1);
        Ok(removed)
    }

    fn clear(&self) -> Result<()> {
        mutate(self, |db| {
            db.clear();
            Ok(())
        })
    }
}

/// Runs `f` against a fresh copy of the database and saves the result only
/// if `f` succeeded.
fn mutate<S, T>(store: &S, f: impl FnOnce(&mut Database) -> Result<T>) -> Result<T>
where
    S: TaskStore + ?Sized,
{
    let _guard = store.writer()?;
    let mut db = store.load()?;
    let out = f(&mut db)?;
    store.save(&db)?;
    Ok(out)
}

fn lock_writer(lock: &Mutex<()>) -> MutexGuard<'_, ()> {
    // The guarded value is `()`, so a poisoned lock carries no broken state.
    lock.lock().unwrap_or_else(|e| e.into_inner())
}

/// Process-local store. Contents vanish when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    write_lock: Mutex<()>,
    db: RwLock<Database>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for MemoryStore {
    fn load(&self) -> Result<Database> {
        self.db
            .read()
            .map(|db| db.clone())
            .map_err(|_| PilotError::unavailable("<memory>", "store lock poisoned"))
    }

    fn save(&self, db: &Database) -> Result<()> {
        let mut current = self
            .db
            .write()
            .map_err(|_| PilotError::unavailable("<memory>", "store lock poisoned"))?;
        *current = db.clone();
        Ok(())
    }

    fn writer(&self) -> Result<WriteGuard<'_>> {
        Ok(WriteGuard {
            _local: lock_writer(&self.write_lock),
            _file: None,
        })
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

/// Durable store backed by a single pretty-printed JSON file.
///
/// Writes go to a temporary file in the same directory which then replaces
/// the database file, so readers never see a half-written database.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    lock_path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStore {
    /// Opens the store at `path`, creating its parent directory if needed.
    /// The file itself is created on first write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| PilotError::unavailable(parent, e))?;
        }
        let mut lock_name = path.as_os_str().to_owned();
        lock_name.push(".lock");
        debug!("opened json store at {}", path.display());
        Ok(Self {
            path,
            lock_path: PathBuf::from(lock_name),
            write_lock: Mutex::new(()),
        })
    }
}

impl TaskStore for JsonStore {
    fn load(&self) -> Result<Database> {
        let s = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Database::default()),
            Err(e) => return Err(PilotError::unavailable(&self.path, e)),
        };
        if s.trim().is_empty() {
            return Ok(Database::default());
        }
        serde_json::from_str(&s)
            .map_err(|e| PilotError::unavailable(&self.path, format!("corrupt database: {}", e)))
    }

    fn save(&self, db: &Database) -> Result<()> {
        let s = serde_json::to_string_pretty(db).map_err(|e| PilotError::unavailable(&self.path, e))?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| PilotError::unavailable(dir, e))?;
        tmp.write_all(s.as_bytes())
            .map_err(|e| PilotError::unavailable(&self.path, e))?;
        tmp.persist(&self.path)
            .map_err(|e| PilotError::unavailable(&self.path, e.error))?;
        Ok(())
    }

    /// Takes the in-process lock, then an exclusive advisory lock on the
    /// `<store>.lock` sidecar file.
    fn writer(&self) -> Result<WriteGuard<'_>> {
        let local = lock_writer(&self.write_lock);
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&self.lock_path)
            .map_err(|e| PilotError::unavailable(&self.lock_path, e))?;
        file.lock_exclusive()
            .map_err(|e| PilotError::unavailable(&self.lock_path, e))?;
        Ok(WriteGuard {
            _local: local,
            _file: Some(file),
        })
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Which store implementation to open.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    #[default]
    Json,
    Memory,
}

/// Opens the store selected by `backend`. `path` is ignored for memory stores.
pub fn open_store(backend: Backend, path: &Path) -> Result<Box<dyn TaskStore>> {
    match backend {
        Backend::Json => Ok(Box::new(JsonStore::open(path)?)),
        Backend::Memory => Ok(Box::new(MemoryStore::new())),
    }
}
