use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::map::grid::Position;
use crate::robot::movement::Heading;

pub fn render_map(frame: &mut Frame, area: Rect, app: &App) {
    let lines = create_styled_lines(app);
    let paragraph = create_map_widget(lines);
    frame.render_widget(paragraph, area);
}

/// Glyph for one cell; the rover is drawn on top of everything else.
pub fn cell_symbol(app: &App, p: Position) -> char {
    if p == app.state.position() {
        return match app.state.heading() {
            Heading::East => '>',
            Heading::North => '^',
            Heading::West => '<',
            Heading::South => 'v',
        };
    }
    if app.env.is_obstacle(p) {
        '#'
    } else if app.env.is_recharge(p) {
        'C'
    } else if p == app.planner.goal() {
        'G'
    } else if app.planner.visited().contains(&p) {
        ':'
    } else {
        '.'
    }
}

fn create_styled_lines(app: &App) -> Vec<Line<'static>> {
    (0..app.env.height())
        .map(|y| {
            let spans: Vec<Span> = (0..app.env.width())
                .map(|x| create_styled_span(cell_symbol(app, Position::new(x, y))))
                .collect();
            Line::from(spans)
        })
        .collect()
}

fn create_styled_span(c: char) -> Span<'static> {
    let style = match c {
        '#' => Style::default().fg(Color::Gray),
        'C' => Style::default().fg(Color::Yellow),
        'G' => Style::default().fg(Color::Magenta),
        ':' => Style::default().fg(Color::DarkGray),
        '>' | '^' | '<' | 'v' => Style::default().fg(Color::Green),
        _ => Style::default().fg(Color::White),
    };
    Span::styled(c.to_string(), style)
}

fn create_map_widget(lines: Vec<Line<'static>>) -> Paragraph<'static> {
    Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Rover Map"))
}
