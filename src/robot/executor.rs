use log::{debug, info, warn};

use crate::map::grid::{Environment, Position};
use crate::robot::config::ExecutorConfig;
use crate::robot::instruction::Instruction;
use crate::robot::movement::{self, Heading};
use crate::robot::state::{Pose, RobotState};

/// Simulated actuators: applies instructions to a rover state and returns
/// the resulting state. Battery is debited at `move_cost` per cell moved or
/// per second of timed motion, and clamped on every change.
pub struct Executor {
    env: Environment,
    config: ExecutorConfig,
}

impl Executor {
    pub fn new(env: Environment) -> Self {
        Self::with_config(env, ExecutorConfig::default())
    }

    pub fn with_config(env: Environment, config: ExecutorConfig) -> Self {
        Self { env, config }
    }

    pub fn execute(&self, state: RobotState, instructions: &[Instruction]) -> RobotState {
        instructions
            .iter()
            .fold(state, |state, instruction| self.apply(state, instruction))
    }

    /// Applies textual commands; unknown or malformed lines are logged and
    /// skipped without touching the state.
    pub fn execute_commands<S: AsRef<str>>(&self, state: RobotState, commands: &[S]) -> RobotState {
        commands.iter().fold(state, |state, line| {
            match line.as_ref().parse::<Instruction>() {
                Ok(instruction) => self.apply(state, &instruction),
                Err(e) => {
                    warn!("Skipping instruction `{}`: {}", line.as_ref(), e);
                    state
                }
            }
        })
    }

    fn apply(&self, state: RobotState, instruction: &Instruction) -> RobotState {
        match *instruction {
            Instruction::MoveTo(target) => self.move_to(state, target),
            Instruction::Recharge(amount) => self.recharge(state, amount),
            Instruction::MoveForward(duration) => self.move_forward(state, duration),
            Instruction::TurnLeft(duration) => self.turn(state, duration, Heading::left),
            Instruction::TurnRight(duration) => self.turn(state, duration, Heading::right),
        }
    }

    /// One cell towards `target`: the adjacent cell itself, otherwise a step
    /// along x first, then y. The rover turns to face the step.
    fn move_to(&self, state: RobotState, target: Position) -> RobotState {
        let here = state.position();
        if target == here {
            debug!("Holding @ {}", here);
            return state;
        }

        let heading = Heading::between(here, target).unwrap_or_else(|| {
            let dx = target.x.cmp(&here.x) as i32;
            let dy = target.y.cmp(&here.y) as i32;
            let step = if dx != 0 { (dx, 0) } else { (0, dy) };
            Heading::all()
                .into_iter()
                .find(|h| h.delta() == step)
                .unwrap_or(state.heading())
        });

        match movement::next_position(here, heading, &self.env) {
            Some(next) => {
                let moved = state
                    .with_pose(Pose::new(next, heading))
                    .with_battery_delta(-self.config.move_cost);
                debug!("Moved {} -> {}, battery {:.1}", here, next, moved.battery());
                moved
            }
            None => {
                warn!("Move from {} facing {} is blocked", here, heading);
                state.with_pose(Pose::new(here, heading))
            }
        }
    }

    fn recharge(&self, state: RobotState, amount: f64) -> RobotState {
        if !self.env.is_recharge(state.position()) {
            warn!("Recharge requested away from the charger @ {}", state.position());
            return state;
        }
        let gain = amount.max(0.0).min(self.config.charge_rate);
        let charged = state.with_battery_delta(gain);
        info!("Recharging, battery {:.1}", charged.battery());
        charged
    }

    /// One cell per second along the heading; stops at the first blocked cell.
    fn move_forward(&self, state: RobotState, duration: f64) -> RobotState {
        let duration = duration.max(0.0);
        let mut pose = state.pose;
        for _ in 0..duration.round() as u32 {
            match movement::next_position(pose.position, pose.heading, &self.env) {
                Some(next) => pose.position = next,
                None => {
                    warn!("Forward motion blocked @ {}", pose.position);
                    break;
                }
            }
        }
        state
            .with_pose(pose)
            .with_battery_delta(-self.config.move_cost * duration)
    }

    /// One quarter turn per second.
    fn turn(&self, state: RobotState, duration: f64, rotate: fn(Heading) -> Heading) -> RobotState {
        let duration = duration.max(0.0);
        let quarters = duration.round() as u32 % 4;
        let mut heading = state.heading();
        for _ in 0..quarters {
            heading = rotate(heading);
        }
        state
            .with_pose(Pose::new(state.position(), heading))
            .with_battery_delta(-self.config.move_cost * duration)
    }
}
