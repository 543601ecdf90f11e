pub mod map_renderer;
pub mod status;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    Frame,
};

use crate::app::App;
use crate::logging;

/// Map on the left, planner and behavior tree on the right, logs below.
pub fn render_app(frame: &mut Frame, area: Rect, app: &App) {
    let [top, logs] =
        Layout::vertical([Constraint::Percentage(70), Constraint::Percentage(30)]).areas(area);
    let [map, side] = Layout::horizontal([Constraint::Min(20), Constraint::Length(44)]).areas(top);
    let [planner, rover_battery, tree_battery, tree] = Layout::vertical([
        Constraint::Length(9),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(5),
    ])
    .areas(side);

    map_renderer::render_map(frame, map, app);
    status::render_status(frame, planner, app);
    status::render_battery(frame, rover_battery, "Rover battery", app.state.battery());
    status::render_battery(frame, tree_battery, "Arbiter battery", app.arbiter.battery());
    status::render_tree(frame, tree, app);
    frame.render_widget(logging::create_log_widget(), logs);
}
