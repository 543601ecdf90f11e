use log::debug;

use crate::map::grid::{Environment, Position};
use crate::robot::movement::{self, Heading};
use crate::robot::state::{clamp_battery, Pose, RobotState};

/// Beams reading below this distance see an obstacle in the adjacent cell.
pub const NEAR_RANGE: f64 = 0.5;
/// Beams reading below this distance see something further away.
pub const NORMAL_RANGE: f64 = 1.0;

/// What the rover knows about its surroundings for one cycle.
/// Beam flags are relative to the heading; `true` means free.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perception {
    pub battery: f64,
    pub position: Position,
    pub heading: Heading,
    pub lidar_front: bool,
    pub lidar_left: bool,
    pub lidar_right: bool,
    pub obstacle_ahead: bool,
}

impl Perception {
    fn from_beams(pose: Pose, battery: f64, front: bool, left: bool, right: bool) -> Self {
        Self {
            battery: clamp_battery(battery),
            position: pose.position,
            heading: pose.heading,
            lidar_front: front,
            lidar_left: left,
            lidar_right: right,
            obstacle_ahead: !front,
        }
    }
}

/// Ground-truth perception: a beam is free iff its cell is on the map and
/// not an obstacle.
pub fn perceive(state: &RobotState, env: &Environment) -> Perception {
    let pose = state.pose;
    let around = movement::offsets(pose.position, pose.heading);
    let perception = Perception::from_beams(
        pose,
        state.battery(),
        env.is_free(around.front),
        env.is_free(around.left),
        env.is_free(around.right),
    );
    debug!(
        "Perceived @ {} facing {}: front={} left={} right={}",
        pose.position,
        pose.heading,
        perception.lidar_front,
        perception.lidar_left,
        perception.lidar_right
    );
    perception
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Proximity {
    Near,
    Normal,
    Far,
}

pub fn classify_range(distance: f64) -> Proximity {
    if distance < NEAR_RANGE {
        Proximity::Near
    } else if distance < NORMAL_RANGE {
        Proximity::Normal
    } else {
        Proximity::Far
    }
}

/// Perception from raw beam distances ordered left, front, right.
/// A beam is blocked only when it reads [`Proximity::Near`]; NaN readings
/// count as blocked.
pub fn perceive_ranges(pose: Pose, battery: f64, ranges: [f64; 3]) -> Perception {
    let free = |d: f64| !d.is_nan() && classify_range(d) != Proximity::Near;
    let [left, front, right] = ranges;
    Perception::from_beams(pose, battery, free(front), free(left), free(right))
}
