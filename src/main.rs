use spa_rover::{
    app::App,
    logging,
    map::{grid::Environment, noise},
    terminal::TerminalManager,
    ui::render_app,
    Heading, Pose, Position, RobotState,
};

use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{prelude::Backend, Terminal};
use std::time::{Duration, Instant};

const WORLD_WIDTH: i32 = 48;
const WORLD_HEIGHT: i32 = 18;

fn main() -> Result<()> {
    color_eyre::install()?;
    logging::setup_logging()?;

    let seed: u64 = rand::random();
    let start = Position::new(0, 0);
    let env = match std::env::args().nth(1).as_deref() {
        Some("scenario") => Environment::scenario(),
        _ => {
            let charger = Position::new(WORLD_WIDTH / 2, WORLD_HEIGHT / 2);
            noise::generate(WORLD_WIDTH, WORLD_HEIGHT, seed as u32, charger, &[start])?
        }
    };
    log::info!("World {}x{}, seed {}", env.width(), env.height(), seed);

    let state = RobotState::new(Pose::new(start, Heading::East), 100.0);
    let mut app = App::new(env, state, seed);
    let mut terminal_manager = TerminalManager::new()?;

    run_app(&mut app, terminal_manager.terminal())
}

fn run_app<B: Backend>(app: &mut App, terminal: &mut Terminal<B>) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_update = Instant::now();

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            render_app(frame, area, app);
        })?;

        let timeout = tick_rate.saturating_sub(last_update.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && key.code == KeyCode::Char('q') {
                    log::info!("Quit after {} cycles", app.cycles());
                    return Ok(());
                }
            }
        }

        if last_update.elapsed() >= tick_rate {
            app.update();
            last_update = Instant::now();
        }
    }
}
