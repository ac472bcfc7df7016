use chrono::{Duration, Local, NaiveDate};
use taskpilot::models::{Task, TaskStatus};
use taskpilot::summary::{select_for_day, select_for_today, summarize, summarize_by_milestone, Summary};

fn task(id: u64, milestone: Option<&str>, status: TaskStatus, day: Option<NaiveDate>) -> Task {
    Task {
        id,
        goal_id: 1,
        title: format!("Task {}", id),
        milestone: milestone.map(String::from),
        duration_minutes: None,
        recommended_day: day,
        status,
    }
}

#[test]
fn test_summarize_counts() {
    let tasks = vec![
        task(1, None, TaskStatus::Completed, None),
        task(2, None, TaskStatus::Pending, None),
        task(3, None, TaskStatus::Missed, None),
        task(4, None, TaskStatus::Completed, None),
    ];
    let s = summarize(&tasks);
    assert_eq!(
        s,
        Summary {
            total: 4,
            completed: 2,
            pending: 1,
            missed: 1,
        }
    );
    assert_eq!(s.completed + s.pending + s.missed, s.total);
    assert_eq!(s.percent_complete(), 50.0);
}

#[test]
fn test_summarize_is_repeatable() {
    let tasks = vec![
        task(1, None, TaskStatus::Missed, None),
        task(2, None, TaskStatus::Pending, None),
    ];
    assert_eq!(summarize(&tasks), summarize(&tasks));
}

#[test]
fn test_summarize_empty() {
    let s = summarize(&Vec::<Task>::new());
    assert_eq!(s, Summary::default());
    assert_eq!(s.percent_complete(), 0.0);
}

#[test]
fn test_buckets_always_add_up() {
    let statuses = [TaskStatus::Pending, TaskStatus::Completed, TaskStatus::Missed];
    for n in 0..20u64 {
        let tasks: Vec<Task> = (0..n)
            .map(|i| task(i, None, statuses[(i * 7 % 3) as usize], None))
            .collect();
        let s = summarize(&tasks);
        assert_eq!(s.total, n as usize);
        assert_eq!(s.completed + s.pending + s.missed, s.total);
    }
}

#[test]
fn test_milestone_breakdown_keeps_first_seen_order() {
    let tasks = vec![
        task(1, Some("Scope"), TaskStatus::Completed, None),
        task(2, Some("Ship"), TaskStatus::Pending, None),
        task(3, Some("Scope"), TaskStatus::Missed, None),
        task(4, None, TaskStatus::Pending, None),
    ];
    let groups = summarize_by_milestone(&tasks);
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0].milestone.as_deref(), Some("Scope"));
    assert_eq!(groups[0].summary.total, 2);
    assert_eq!(groups[0].summary.completed, 1);
    assert_eq!(groups[0].summary.missed, 1);
    assert_eq!(groups[1].milestone.as_deref(), Some("Ship"));
    assert_eq!(groups[2].milestone, None);
}

#[test]
fn test_select_for_day() {
    let today = NaiveDate::from_ymd_opt(2026, 4, 2).unwrap();
    let tasks = vec![
        task(1, None, TaskStatus::Pending, None),
        task(2, None, TaskStatus::Pending, Some(today)),
        task(3, None, TaskStatus::Pending, Some(today - Duration::days(1))),
        task(4, None, TaskStatus::Completed, Some(today + Duration::days(1))),
    ];
    let ids: Vec<u64> = select_for_day(&tasks, today).iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn test_select_for_today_uses_local_date() {
    let today = Local::now().date_naive();
    let tasks = vec![
        task(1, None, TaskStatus::Pending, None),
        task(2, None, TaskStatus::Pending, Some(today - Duration::days(1))),
    ];
    let selected = select_for_today(&tasks);
    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].id, 1);
}
