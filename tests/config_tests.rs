use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use taskpilot::config::{Config, DB_ENV};
use taskpilot::planner::PlanTemplate;
use taskpilot::storage::Backend;
use taskpilot::PilotError;
use tempfile::TempDir;

// Tests touching TASKPILOT_DB must not overlap.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn with_db_env<F: FnOnce()>(value: Option<&str>, f: F) {
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    match value {
        Some(v) => env::set_var(DB_ENV, v),
        None => env::remove_var(DB_ENV),
    }
    f();
    env::remove_var(DB_ENV);
}

#[test]
fn test_load_from_file() {
    with_db_env(None, || {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(
            &path,
            "backend: memory\nstore_path: /tmp/pilot.json\nplan_template: roadmap\n",
        )
        .unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.store_path, PathBuf::from("/tmp/pilot.json"));
        assert_eq!(config.plan_template, PlanTemplate::Roadmap);
    });
}

#[test]
fn test_missing_fields_use_defaults() {
    with_db_env(None, || {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "plan_template: sprint\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.backend, Backend::Json);
        assert_eq!(config.store_path, Config::default().store_path);
    });
}

#[test]
fn test_env_overrides_store_path() {
    with_db_env(Some("/tmp/from-env.json"), || {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "store_path: /tmp/from-file.json\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.store_path, PathBuf::from("/tmp/from-env.json"));
    });
}

#[test]
fn test_bad_config_is_reported() {
    with_db_env(None, || {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "backend: postgres\n").unwrap();
        assert!(matches!(Config::load(Some(path.as_path())), Err(PilotError::Config(_))));

        let missing = dir.path().join("nope.yml");
        assert!(matches!(Config::load(Some(missing.as_path())), Err(PilotError::Config(_))));
    });
}
