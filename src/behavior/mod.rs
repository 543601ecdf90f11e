//! Reactive behavior tree that arbitrates between charging and the task.

pub mod blackboard;
pub mod leaves;
pub mod node;
pub mod tree;

use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::robot::config::ArbiterConfig;

pub use blackboard::Blackboard;
pub use leaves::{Action, ActionKind, Condition};
pub use node::{BehaviorNode, BehaviorStatus, NodeKind};

/// Owns a tree, its blackboard and the random source of its unreliable
/// actions. The caller drives it with one `tick` per cycle.
pub struct BehaviorArbiter {
    root: BehaviorNode,
    blackboard: Blackboard,
    rng: StdRng,
    ticks: u64,
}

impl BehaviorArbiter {
    pub fn new(config: &ArbiterConfig) -> Self {
        Self::with_tree(
            tree::battery_reactive_tree(config),
            Blackboard::new(config.initial_battery),
            StdRng::from_os_rng(),
        )
    }

    /// Reproducible action outcomes.
    pub fn with_seed(config: &ArbiterConfig, seed: u64) -> Self {
        Self::with_tree(
            tree::battery_reactive_tree(config),
            Blackboard::new(config.initial_battery),
            StdRng::seed_from_u64(seed),
        )
    }

    pub fn with_tree(root: BehaviorNode, blackboard: Blackboard, rng: StdRng) -> Self {
        Self {
            root,
            blackboard,
            rng,
            ticks: 0,
        }
    }

    pub fn tick(&mut self) -> BehaviorStatus {
        self.ticks += 1;
        let status = self.root.tick(&mut self.blackboard, &mut self.rng);
        info!(
            "Tick {}: {:?} (battery: {:.1}%)",
            self.ticks,
            status,
            self.blackboard.battery()
        );
        status
    }

    pub fn battery(&self) -> f64 {
        self.blackboard.battery()
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }

    pub fn root(&self) -> &BehaviorNode {
        &self.root
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::state::{BATTERY_MAX, BATTERY_MIN};

    fn deterministic(grasp_success: f64) -> ArbiterConfig {
        ArbiterConfig {
            initial_battery: 100.0,
            move_to_object_success: 1.0,
            grasp_success,
            ..ArbiterConfig::default()
        }
    }

    #[test]
    fn test_low_battery_charges_first() {
        let config = ArbiterConfig::default();
        let mut arbiter = BehaviorArbiter::with_tree(
            tree::battery_guard(&config),
            Blackboard::new(15.0),
            StdRng::seed_from_u64(0),
        );
        assert_eq!(arbiter.tick(), BehaviorStatus::Success);
        assert_eq!(arbiter.battery(), 45.0);

        let guard = arbiter.root();
        assert_eq!(guard.children()[0].status(), Some(BehaviorStatus::Failure));
        assert_eq!(guard.children()[1].status(), Some(BehaviorStatus::Success));

        // charged enough: the charger is not ticked again
        assert_eq!(arbiter.tick(), BehaviorStatus::Success);
        assert_eq!(arbiter.battery(), 45.0);
    }

    #[test]
    fn test_guard_only_charges_below_threshold() {
        let config = ArbiterConfig::default();
        let mut arbiter = BehaviorArbiter::with_tree(
            tree::battery_guard(&config),
            Blackboard::new(19.0),
            StdRng::seed_from_u64(0),
        );
        arbiter.blackboard_mut().set_battery(80.0);
        arbiter.tick();
        assert_eq!(arbiter.battery(), 80.0);

        arbiter.blackboard_mut().set_battery(19.0);
        arbiter.tick();
        assert_eq!(arbiter.battery(), 49.0);
    }

    #[test]
    fn test_exhausted_grasp_falls_back_to_home() {
        let mut arbiter = BehaviorArbiter::with_seed(&deterministic(0.0), 3);
        let statuses: Vec<BehaviorStatus> = (0..5).map(|_| arbiter.tick()).collect();
        assert_eq!(
            statuses,
            [
                BehaviorStatus::Running,
                BehaviorStatus::Running,
                BehaviorStatus::Running,
                BehaviorStatus::Running,
                BehaviorStatus::Success,
            ]
        );
        // five approaches and grasps, then the fallback trip home
        assert_eq!(arbiter.battery(), 60.0);
        let task = &arbiter.root().children()[1];
        assert_eq!(task.children()[0].status(), Some(BehaviorStatus::Failure));
        assert_eq!(task.children()[1].status(), Some(BehaviorStatus::Success));
    }

    #[test]
    fn test_successful_fetch_returns_home() {
        let mut arbiter = BehaviorArbiter::with_seed(&deterministic(1.0), 3);
        assert_eq!(arbiter.tick(), BehaviorStatus::Success);
        assert_eq!(arbiter.battery(), 88.0);
        assert_eq!(arbiter.ticks(), 1);
    }

    #[test]
    fn test_same_seed_same_outcomes() {
        let config = ArbiterConfig::default();
        let run = |seed| {
            let mut arbiter = BehaviorArbiter::with_seed(&config, seed);
            (0..50)
                .map(|_| (arbiter.tick(), arbiter.battery()))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(17), run(17));
    }

    #[test]
    fn test_battery_stays_in_range() {
        let mut arbiter = BehaviorArbiter::with_seed(&ArbiterConfig::default(), 8);
        for _ in 0..500 {
            arbiter.tick();
            assert!((BATTERY_MIN..=BATTERY_MAX).contains(&arbiter.battery()));
        }
    }
}
