//! Decision core of a grid rover: perceive, decide, execute.
//!
//! Two deciders share the same data model:
//!
//! * [`robot::planner::NavigationPlanner`] turns a [`robot::perception::Perception`]
//!   into the next [`robot::instruction::Instruction`] (recharge, explore, or route to a goal).
//! * [`behavior::BehaviorArbiter`] ticks a reactive behavior tree that puts the
//!   battery first and retries unreliable actions.
//!
//! Neither `decide` nor `tick` is safe to call concurrently from several threads
//! without external synchronisation: visited sets and retry counters are
//! mutated in place.

pub mod app;
pub mod behavior;
pub mod logging;
pub mod map;
pub mod robot;
pub mod terminal;
pub mod ui;

pub use behavior::{BehaviorArbiter, BehaviorNode, BehaviorStatus, Blackboard};
pub use map::grid::{Environment, EnvironmentError, Position};
pub use robot::executor::Executor;
pub use robot::instruction::{Instruction, InstructionError};
pub use robot::movement::Heading;
pub use robot::perception::{perceive, Perception};
pub use robot::planner::NavigationPlanner;
pub use robot::state::{Pose, RobotState};
