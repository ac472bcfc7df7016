use taskpilot::models::{validate_duration, GoalStatus, Task, TaskStatus};
use taskpilot::PilotError;

#[test]
fn test_task_status_parsing() {
    assert_eq!("pending".parse::<TaskStatus>().unwrap(), TaskStatus::Pending);
    assert_eq!("Completed".parse::<TaskStatus>().unwrap(), TaskStatus::Completed);
    assert_eq!(" missed ".parse::<TaskStatus>().unwrap(), TaskStatus::Missed);
    assert!(matches!("done".parse::<TaskStatus>(), Err(PilotError::Validation(_))));
    assert_eq!(TaskStatus::default(), TaskStatus::Pending);
}

#[test]
fn test_goal_status_parsing() {
    assert_eq!("in_progress".parse::<GoalStatus>().unwrap(), GoalStatus::InProgress);
    assert_eq!("completed".parse::<GoalStatus>().unwrap(), GoalStatus::Completed);
    assert!("archived".parse::<GoalStatus>().is_err());
    assert_eq!(GoalStatus::default().to_string(), "in_progress");
}

#[test]
fn test_task_serializes_snake_case_status() {
    let json = r#"{"id":3,"goal_id":1,"title":"Write tests","status":"missed"}"#;
    let task: Task = serde_json::from_str(json).unwrap();
    assert_eq!(task.status, TaskStatus::Missed);
    assert_eq!(task.milestone, None);
    assert_eq!(task.recommended_day, None);

    let out = serde_json::to_string(&task).unwrap();
    assert!(out.contains(r#""status":"missed""#));

    let bad = r#"{"id":3,"goal_id":1,"title":"x","status":"done"}"#;
    assert!(serde_json::from_str::<Task>(bad).is_err());
}

#[test]
fn test_duration_validation() {
    assert_eq!(validate_duration(0).unwrap(), 0);
    assert_eq!(validate_duration(90).unwrap(), 90);
    assert!(matches!(validate_duration(-1), Err(PilotError::Validation(_))));
}
