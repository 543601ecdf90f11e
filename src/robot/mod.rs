pub mod config;
pub mod executor;
pub mod instruction;
pub mod movement;
pub mod perception;
pub mod planner;
pub mod routing;
pub mod state;

pub use state::RobotState;
