//! Condition and action leaves of the behavior tree.

use log::info;
use rand::Rng;

use super::blackboard::Blackboard;
use super::node::BehaviorStatus;

/// Read-only checks against the blackboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Success while the battery is at or above `threshold`.
    BatteryOk { threshold: f64 },
}

impl Condition {
    pub fn evaluate(&self, blackboard: &Blackboard) -> BehaviorStatus {
        match self {
            Condition::BatteryOk { threshold } => {
                let level = blackboard.battery();
                info!("Checking battery: {:.1}%", level);
                if level >= *threshold {
                    BehaviorStatus::Success
                } else {
                    BehaviorStatus::Failure
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    GoCharge,
    MoveToObject,
    GraspObject,
    MoveHome,
}

impl ActionKind {
    fn describe(self) -> &'static str {
        match self {
            ActionKind::GoCharge => "Going to charging station",
            ActionKind::MoveToObject => "Moving to target object",
            ActionKind::GraspObject => "Grasping object",
            ActionKind::MoveHome => "Returning to home position",
        }
    }
}

/// One unit of simulated work. Changes the battery by `battery_delta`, then
/// succeeds with `success_probability`, drawn afresh on every tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub kind: ActionKind,
    pub battery_delta: f64,
    pub success_probability: f64,
}

impl Action {
    pub fn go_charge(charge_rate: f64) -> Self {
        Self::new(ActionKind::GoCharge, charge_rate, 1.0)
    }

    pub fn move_to_object(cost: f64, success_probability: f64) -> Self {
        Self::new(ActionKind::MoveToObject, -cost, success_probability)
    }

    pub fn grasp_object(cost: f64, success_probability: f64) -> Self {
        Self::new(ActionKind::GraspObject, -cost, success_probability)
    }

    pub fn move_home(cost: f64) -> Self {
        Self::new(ActionKind::MoveHome, -cost, 1.0)
    }

    /// `success_probability` is clamped to `[0, 1]`; NaN means never.
    pub fn new(kind: ActionKind, battery_delta: f64, success_probability: f64) -> Self {
        let success_probability = if success_probability.is_nan() {
            0.0
        } else {
            success_probability.clamp(0.0, 1.0)
        };
        Self {
            kind,
            battery_delta,
            success_probability,
        }
    }

    pub fn execute<R: Rng + ?Sized>(&self, blackboard: &mut Blackboard, rng: &mut R) -> BehaviorStatus {
        info!("{}...", self.kind.describe());
        let level = blackboard.adjust_battery(self.battery_delta);

        let succeeded = match self.success_probability {
            p if p >= 1.0 => true,
            p if p <= 0.0 => false,
            p => rng.random_bool(p),
        };
        info!(
            "{:?} {} (battery: {:.1}%)",
            self.kind,
            if succeeded { "done" } else { "failed" },
            level
        );

        if succeeded {
            BehaviorStatus::Success
        } else {
            BehaviorStatus::Failure
        }
    }
}
