use crate::robot::state::clamp_battery;

/// State shared by every node of a behavior tree. Passed by reference to
/// each tick; conditions read it and actions write it.
#[derive(Debug, Clone, PartialEq)]
pub struct Blackboard {
    battery_level: f64,
}

impl Blackboard {
    pub fn new(battery_level: f64) -> Self {
        Self {
            battery_level: clamp_battery(battery_level),
        }
    }

    pub fn battery(&self) -> f64 {
        self.battery_level
    }

    pub fn set_battery(&mut self, level: f64) {
        self.battery_level = clamp_battery(level);
    }

    /// Adds `delta` and clamps, returning the new level.
    pub fn adjust_battery(&mut self, delta: f64) -> f64 {
        self.set_battery(self.battery_level + delta);
        self.battery_level
    }
}
