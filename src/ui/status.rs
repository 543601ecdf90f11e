use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use crate::app::App;
use crate::robot::config::LOW_BATTERY_THRESHOLD;

pub fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let decision = app
        .last_decision()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    let state = if app.halted() {
        "halted".to_string()
    } else if app.stalled() {
        format!("stalled ({} reports)", app.stall_reports())
    } else {
        "running".to_string()
    };

    let lines = vec![
        Line::from(format!("Cycle:    {}", app.cycles())),
        Line::from(format!("Position: {}", app.state.position())),
        Line::from(format!("Heading:  {}", app.state.heading())),
        Line::from(format!("Coverage: {:.0}%", app.planner.coverage() * 100.0)),
        Line::from(format!("Goal:     {}", app.planner.goal())),
        Line::from(format!("Decision: {}", decision)),
        Line::from(format!("State:    {}", state)),
    ];
    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Planner"));
    frame.render_widget(paragraph, area);
}

pub fn render_battery(frame: &mut Frame, area: Rect, title: &str, level: f64) {
    let color = if level < LOW_BATTERY_THRESHOLD {
        Color::Red
    } else {
        Color::Green
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .gauge_style(Style::default().fg(color))
        .ratio((level / 100.0).clamp(0.0, 1.0))
        .label(format!("{:.1}%", level));
    frame.render_widget(gauge, area);
}

pub fn render_tree(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines: Vec<Line> = app
        .arbiter
        .root()
        .to_string()
        .lines()
        .map(|l| Line::from(l.to_string()))
        .collect();
    if let Some(status) = app.last_tick() {
        lines.push(Line::from(format!(
            "Tick {}: {:?}",
            app.arbiter.ticks(),
            status
        )));
    }
    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Behavior Tree"));
    frame.render_widget(paragraph, area);
}
