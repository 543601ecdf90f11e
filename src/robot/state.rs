use crate::map::grid::Position;
use crate::robot::movement::Heading;

pub const BATTERY_MIN: f64 = 0.0;
pub const BATTERY_MAX: f64 = 100.0;

/// Clamps a battery level into `[0, 100]`. NaN reads as empty.
pub fn clamp_battery(level: f64) -> f64 {
    if level.is_nan() {
        BATTERY_MIN
    } else {
        level.clamp(BATTERY_MIN, BATTERY_MAX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pose {
    pub position: Position,
    pub heading: Heading,
}

impl Pose {
    pub const fn new(position: Position, heading: Heading) -> Self {
        Self { position, heading }
    }
}

/// Rover state for one cycle. Only the executor produces a new one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RobotState {
    pub pose: Pose,
    battery: f64,
}

impl RobotState {
    pub fn new(pose: Pose, battery: f64) -> Self {
        Self {
            pose,
            battery: clamp_battery(battery),
        }
    }

    pub fn battery(&self) -> f64 {
        self.battery
    }

    pub fn position(&self) -> Position {
        self.pose.position
    }

    pub fn heading(&self) -> Heading {
        self.pose.heading
    }

    pub fn is_depleted(&self) -> bool {
        self.battery <= BATTERY_MIN
    }

    pub fn with_pose(self, pose: Pose) -> Self {
        Self { pose, ..self }
    }

    /// Adds `delta` (negative to drain) and clamps.
    pub fn with_battery_delta(self, delta: f64) -> Self {
        Self {
            battery: clamp_battery(self.battery + delta),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps_battery() {
        let pose = Pose::default();
        assert_eq!(RobotState::new(pose, 140.0).battery(), 100.0);
        assert_eq!(RobotState::new(pose, -3.0).battery(), 0.0);
        assert_eq!(RobotState::new(pose, f64::NAN).battery(), 0.0);
    }

    #[test]
    fn test_battery_delta_stays_in_range() {
        let state = RobotState::new(Pose::default(), 50.0);
        assert_eq!(state.with_battery_delta(-80.0).battery(), 0.0);
        assert_eq!(state.with_battery_delta(75.0).battery(), 100.0);
        assert_eq!(state.with_battery_delta(-0.5).battery(), 49.5);
        assert!(state.with_battery_delta(-50.0).is_depleted());
    }
}
