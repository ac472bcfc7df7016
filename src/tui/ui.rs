use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::models::{GoalStatus, TaskStatus};
use crate::summary::summarize;
use super::app::App;

fn task_style(status: TaskStatus) -> Style {
    match status {
        TaskStatus::Completed => Style::default().fg(Color::Green),
        TaskStatus::Pending => Style::default().fg(Color::Yellow),
        TaskStatus::Missed => Style::default().fg(Color::Red),
    }
}

fn header(names: Vec<&'static str>) -> Row<'static> {
    Row::new(names)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .bottom_margin(1)
}

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Overview
            Constraint::Min(0),    // Goals + tasks
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let o = app.overview;
    let overview = Paragraph::new(Line::from(format!(
        "Goals: {}   Tasks: {}   Completed: {}/{}   Missed: {}   Filter: {}",
        o.goals,
        o.tasks.total,
        o.tasks.completed,
        o.tasks.total,
        o.tasks.missed,
        app.filter.label()
    )))
    .block(Block::default().borders(Borders::ALL).title("TaskPilot - Dashboard"));
    f.render_widget(overview, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);

    let goal_rows: Vec<Row> = app
        .reports
        .iter()
        .map(|r| {
            let s = summarize(&r.tasks);
            let style = match r.goal.status {
                GoalStatus::Completed => Style::default().fg(Color::Green),
                GoalStatus::InProgress => Style::default(),
            };
            Row::new(vec![
                Cell::from(r.goal.id.to_string()),
                Cell::from(r.goal.statement.clone()),
                Cell::from(format!("{}/{}", s.completed, s.total)),
                Cell::from(r.goal.status.to_string()),
            ])
            .style(style)
        })
        .collect();

    let goals = Table::new(
        goal_rows,
        [
            Constraint::Length(4),
            Constraint::Min(16),
            Constraint::Length(6),
            Constraint::Length(12),
        ],
    )
    .header(header(vec!["ID", "Goal", "Done", "Status"]))
    .block(Block::default().borders(Borders::ALL).title("Goals"))
    .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
    .highlight_symbol(">> ");
    f.render_stateful_widget(goals, body[0], &mut app.goal_state);

    let task_rows: Vec<Row> = app
        .selected_goal()
        .map(|r| {
            r.tasks
                .iter()
                .map(|t| {
                    Row::new(vec![
                        Cell::from(t.id.to_string()),
                        Cell::from(t.title.clone()),
                        Cell::from(t.milestone.clone().unwrap_or_default()),
                        Cell::from(t.recommended_day.map(|d| d.to_string()).unwrap_or_default()),
                        Cell::from(t.status.to_string()),
                    ])
                    .style(task_style(t.status))
                })
                .collect()
        })
        .unwrap_or_default();

    let tasks = Table::new(
        task_rows,
        [
            Constraint::Length(4),
            Constraint::Min(20),
            Constraint::Length(22),
            Constraint::Length(11),
            Constraint::Length(10),
        ],
    )
    .header(header(vec!["ID", "Task", "Milestone", "Day", "Status"]))
    .block(Block::default().borders(Borders::ALL).title("Tasks"))
    .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
    .highlight_symbol("> ");
    f.render_stateful_widget(tasks, body[1], &mut app.task_state);

    let help_text = match &app.message {
        Some(m) => m.clone(),
        None => "q: Quit | j/k: Goal | J/K: Task | c: Complete | m: Missed | p: Pending | g: Toggle Goal | f: Filter | d: Delete Goal".to_string(),
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
