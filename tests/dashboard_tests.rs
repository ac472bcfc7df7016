use chrono::Local;
use taskpilot::models::{GoalStatus, TaskStatus};
use taskpilot::planner::Planner;
use taskpilot::tracker::create_goal_with_plan;
use taskpilot::tui::app::{App, GoalFilter};
use taskpilot::{MemoryStore, TaskStore};

fn seeded() -> MemoryStore {
    let store = MemoryStore::new();
    let planner = Planner::at(Local::now().date_naive());
    create_goal_with_plan(&store, &planner, "Older goal", None).unwrap();
    create_goal_with_plan(&store, &planner, "Newer goal", None).unwrap();
    store
}

#[test]
fn test_dashboard_selects_newest_goal() {
    let store = seeded();
    let app = App::new(&store).unwrap();
    assert_eq!(app.overview.goals, 2);
    assert_eq!(app.overview.tasks.total, 12);
    assert_eq!(app.selected_goal().unwrap().goal.statement, "Newer goal");
    assert!(app.selected_task().is_some());
}

#[test]
fn test_dashboard_marks_tasks() {
    let store = seeded();
    let mut app = App::new(&store).unwrap();
    app.next_task();
    let id = app.selected_task().unwrap().id;

    app.mark_selected(TaskStatus::Missed);
    assert_eq!(store.task(id).unwrap().status, TaskStatus::Missed);
    assert_eq!(app.overview.tasks.missed, 1);
    assert_eq!(app.selected_task().unwrap().id, id);

    app.mark_selected(TaskStatus::Completed);
    assert_eq!(store.task(id).unwrap().status, TaskStatus::Completed);
}

#[test]
fn test_dashboard_filter_and_goal_toggle() {
    let store = seeded();
    let mut app = App::new(&store).unwrap();
    app.toggle_goal_status();
    assert_eq!(app.reports[0].goal.status, GoalStatus::Completed);

    app.cycle_filter();
    assert_eq!(app.filter, GoalFilter::InProgress);
    assert_eq!(app.reports.len(), 1);
    assert_eq!(app.reports[0].goal.statement, "Older goal");

    app.cycle_filter();
    assert_eq!(app.filter, GoalFilter::Completed);
    assert_eq!(app.reports[0].goal.statement, "Newer goal");
}

#[test]
fn test_dashboard_delete_goal() {
    let store = seeded();
    let mut app = App::new(&store).unwrap();
    app.delete_selected_goal();
    assert_eq!(app.overview.goals, 1);
    assert_eq!(store.tasks(None).unwrap().len(), 6);
    assert_eq!(app.selected_goal().unwrap().goal.statement, "Older goal");

    app.delete_selected_goal();
    assert!(app.selected_goal().is_none());
    assert!(app.selected_task().is_none());
    app.mark_selected(TaskStatus::Completed);
    app.next_goal();
}
