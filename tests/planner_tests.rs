use chrono::{Duration, NaiveDate};
use taskpilot::planner::{generate_plan, PlanTemplate, Planner};
use taskpilot::PilotError;

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_two_milestones_for_any_deadline() {
    let today = day(2026, 3, 1);
    let planner = Planner::at(today);
    let deadlines = [
        None,
        Some(today),
        Some(today - Duration::days(30)),
        Some(today + Duration::days(1)),
        Some(today + Duration::days(365)),
    ];

    for deadline in deadlines {
        let plan = planner.generate("Launch product", deadline).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].tasks.len(), 3);
        assert_eq!(plan[1].tasks.len(), 3);
        assert!(plan[0].tasks[0].title.contains("Launch product"));
        assert!(plan.iter().flat_map(|m| &m.tasks).all(|t| t.id.is_none()));
    }
}

#[test]
fn test_marathon_due_dates() {
    let today = day(2026, 1, 10);
    let plan = Planner::at(today)
        .generate("Run a marathon", Some(today + Duration::days(100)))
        .unwrap();

    assert_eq!(plan[0].title, "Understand & scope the goal");
    assert_eq!(plan[0].due, Some(today + Duration::days(50)));
    assert_eq!(plan[1].title, "Execute and ship MVP");
    assert_eq!(plan[1].due, Some(today + Duration::days(100)));
}

#[test]
fn test_midpoint_rounds_down() {
    let today = day(2026, 1, 10);
    let planner = Planner::at(today);

    let odd = planner.generate("g", Some(today + Duration::days(7))).unwrap();
    assert_eq!(odd[0].due, Some(today + Duration::days(3)));

    // Past deadlines are not rejected; half of -5 days floors to -3.
    let past = planner.generate("g", Some(today - Duration::days(5))).unwrap();
    assert_eq!(past[0].due, Some(today - Duration::days(3)));
    assert_eq!(past[1].due, Some(today - Duration::days(5)));

    let same_day = planner.generate("g", Some(today)).unwrap();
    assert_eq!(same_day[0].due, Some(today));
}

#[test]
fn test_no_deadline_leaves_due_unset() {
    let planner = Planner::at(day(2026, 1, 10));
    assert_eq!(planner.today(), day(2026, 1, 10));
    assert_eq!(planner.template(), PlanTemplate::Sprint);
    let plan = planner.generate("Write a book", None).unwrap();
    assert!(plan.iter().all(|m| m.due.is_none()));
}

#[test]
fn test_blank_statement_rejected() {
    let planner = Planner::at(day(2026, 1, 10));
    assert!(matches!(planner.generate("", None), Err(PilotError::Validation(_))));
    assert!(matches!(planner.generate("   ", None), Err(PilotError::Validation(_))));
    assert!(matches!(generate_plan("", None), Err(PilotError::Validation(_))));
}

#[test]
fn test_generation_is_deterministic() {
    let today = day(2026, 5, 5);
    let planner = Planner::at(today);
    let a = planner.generate("Learn Rust", Some(today + Duration::days(20))).unwrap();
    let b = planner.generate("Learn Rust", Some(today + Duration::days(20))).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_roadmap_template() {
    let today = day(2026, 5, 5);
    let plan = Planner::at(today)
        .with_template(PlanTemplate::Roadmap)
        .generate("Learn Rust", Some(today + Duration::days(20)))
        .unwrap();

    assert_eq!(plan.len(), 3);
    assert_eq!(plan[0].title, "Clarify and scope your goal");
    assert_eq!(plan[2].title, "Set up a tracking system");
    assert!(plan.iter().all(|m| m.tasks.len() == 2));
    assert!(plan.iter().all(|m| m.description.is_some() && m.due.is_none()));
    assert_eq!(plan[0].tasks[1].title, "Define 2\u{2013}3 success metrics");
}

#[test]
fn test_template_names() {
    assert_eq!("roadmap".parse::<PlanTemplate>().unwrap(), PlanTemplate::Roadmap);
    assert_eq!("Sprint".parse::<PlanTemplate>().unwrap(), PlanTemplate::Sprint);
    assert!("weekly".parse::<PlanTemplate>().is_err());
    assert_eq!(PlanTemplate::default(), PlanTemplate::Sprint);
}
