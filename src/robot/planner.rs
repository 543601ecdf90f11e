use std::collections::HashSet;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use crate::map::grid::{Environment, Position};
use crate::robot::config::PlannerConfig;
use crate::robot::instruction::Instruction;
use crate::robot::movement::{self, Heading};
use crate::robot::perception::Perception;
use crate::robot::routing;
use crate::robot::state::BATTERY_MAX;

/// What the previous decision committed the rover to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastAction {
    Move,
    Charge,
}

/// An exploration move and the heading the rover will face after it.
/// `decide` only emits the target; the executor turns the rover to face
/// each `MoveTo` step, which lands on the same `heading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplorationStep {
    pub target: Position,
    pub heading: Heading,
}

/// Turns a perception into the next instruction: battery first, then
/// exploration until coverage reaches the target, then random goals.
pub struct NavigationPlanner {
    env: Environment,
    config: PlannerConfig,
    visited: HashSet<Position>,
    last_action: LastAction,
    goal: Position,
    rng: StdRng,
}

impl NavigationPlanner {
    pub fn new(env: Environment) -> Self {
        Self::with_rng(env, PlannerConfig::default(), StdRng::from_os_rng())
    }

    /// Reproducible goal draws.
    pub fn with_seed(env: Environment, seed: u64) -> Self {
        Self::with_rng(env, PlannerConfig::default(), StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(env: Environment, config: PlannerConfig, rng: StdRng) -> Self {
        let mut planner = Self {
            goal: env.recharge_zone(),
            env,
            config,
            visited: HashSet::new(),
            last_action: LastAction::Move,
            rng,
        };
        planner.goal = planner.draw_goal(None);
        planner
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn goal(&self) -> Position {
        self.goal
    }

    pub fn last_action(&self) -> LastAction {
        self.last_action
    }

    pub fn visited(&self) -> &HashSet<Position> {
        &self.visited
    }

    /// Fraction of free cells visited at least once.
    pub fn coverage(&self) -> f64 {
        match self.env.free_cell_count() {
            0 => 1.0,
            free => self.visited.len() as f64 / free as f64,
        }
    }

    /// Decides this cycle's instructions. Always returns exactly one.
    pub fn decide(&mut self, perception: &Perception) -> Vec<Instruction> {
        let here = perception.position;
        let battery = perception.battery;
        let charger = self.env.recharge_zone();
        let low_battery = battery < self.config.low_battery_threshold;

        self.record_visit(here);
        let coverage = self.coverage();
        debug!(
            "Deciding @ {} battery {:.1} coverage {:.0}%",
            here,
            battery,
            coverage * 100.0
        );

        if low_battery && here != charger {
            debug!("Low battery ({:.1}), heading to charger {}", battery, charger);
            self.last_action = LastAction::Move;
            return vec![routing::route(&self.env, here, charger)];
        }

        if low_battery {
            if self.last_action != LastAction::Charge {
                info!("At charger with {:.1}, charging to full", battery);
            }
            return vec![self.recharge(battery)];
        }

        if self.last_action == LastAction::Charge && battery < BATTERY_MAX {
            return vec![self.recharge(battery)];
        }
        if self.last_action == LastAction::Charge {
            info!("Battery full, resuming");
        }

        self.last_action = LastAction::Move;
        if coverage < self.config.exploration_target {
            let step = self.find_next_cell(perception);
            return vec![Instruction::MoveTo(step.target)];
        }

        vec![self.pursue_goal(here)]
    }

    /// Greedy wall-following exploration step.
    ///
    /// Prefers unvisited cells (front, then left, then right), then any free
    /// cell (front, right, left), then backs up. A direction counts as free
    /// only if its beam says so and the cell is on the map and not an
    /// obstacle, so the target is always a cell the rover may occupy; with
    /// nowhere to go it is the current cell.
    pub fn find_next_cell(&self, perception: &Perception) -> ExplorationStep {
        let here = perception.position;
        let heading = perception.heading;
        let around = movement::offsets(here, heading);

        let front = perception.lidar_front && self.env.is_free(around.front);
        let left = perception.lidar_left && self.env.is_free(around.left);
        let right = perception.lidar_right && self.env.is_free(around.right);
        let fresh = |p: Position| !self.visited.contains(&p);

        let step = |target, heading| ExplorationStep { target, heading };
        if front && fresh(around.front) {
            step(around.front, heading)
        } else if left && fresh(around.left) {
            step(around.left, heading.left())
        } else if right && fresh(around.right) {
            step(around.right, heading.right())
        } else if front {
            step(around.front, heading)
        } else if right {
            step(around.right, heading.right())
        } else if left {
            step(around.left, heading.left())
        } else if self.env.is_free(around.back) {
            debug!("Dead end @ {}, backing up", here);
            step(around.back, heading)
        } else {
            warn!("Boxed in @ {}, holding position", here);
            step(here, heading)
        }
    }

    /// Draws a new goal for the next cycle.
    pub fn redraw_goal(&mut self, here: Position) {
        self.goal = self.draw_goal(Some(here));
    }

    fn pursue_goal(&mut self, here: Position) -> Instruction {
        if here == self.goal || !self.env.is_free(self.goal) {
            if here == self.goal {
                info!("Goal {} reached", self.goal);
            }
            self.redraw_goal(here);
            debug!("New goal {}", self.goal);
        }
        routing::route(&self.env, here, self.goal)
    }

    fn recharge(&mut self, battery: f64) -> Instruction {
        self.last_action = LastAction::Charge;
        Instruction::Recharge(BATTERY_MAX - battery)
    }

    /// Only cells the rover may legally occupy count towards coverage.
    fn record_visit(&mut self, here: Position) {
        if self.env.is_free(here) {
            self.visited.insert(here);
        } else {
            warn!("Occupying invalid cell {}, not counted as visited", here);
        }
    }

    /// Uniform draw over free cells other than `exclude`. Falls back to the
    /// charger when no such cell exists.
    fn draw_goal(&mut self, exclude: Option<Position>) -> Position {
        let candidates: Vec<Position> = (0..self.env.height())
            .flat_map(|y| (0..self.env.width()).map(move |x| Position::new(x, y)))
            .filter(|&p| self.env.is_free(p) && Some(p) != exclude)
            .collect();
        candidates
            .choose(&mut self.rng)
            .copied()
            .unwrap_or_else(|| self.env.recharge_zone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::executor::Executor;
    use crate::robot::perception::perceive;
    use crate::robot::state::{Pose, RobotState};

    fn perception_at(x: i32, y: i32, heading: Heading, flags: [bool; 3]) -> Perception {
        let [front, left, right] = flags;
        Perception {
            battery: 90.0,
            position: Position::new(x, y),
            heading,
            lidar_front: front,
            lidar_left: left,
            lidar_right: right,
            obstacle_ahead: !front,
        }
    }

    fn open_env() -> Environment {
        Environment::new((7, 7), Position::new(6, 6), []).unwrap()
    }

    #[test]
    fn test_explore_prefers_unvisited_front() {
        let planner = NavigationPlanner::with_seed(open_env(), 1);
        let step = planner.find_next_cell(&perception_at(3, 3, Heading::East, [true; 3]));
        assert_eq!(step.target, Position::new(4, 3));
        assert_eq!(step.heading, Heading::East);
    }

    #[test]
    fn test_explore_turns_left_then_right_onto_unvisited() {
        let mut planner = NavigationPlanner::with_seed(open_env(), 1);
        planner.visited.insert(Position::new(4, 3));

        let step = planner.find_next_cell(&perception_at(3, 3, Heading::East, [true; 3]));
        assert_eq!(step.target, Position::new(3, 2));
        assert_eq!(step.heading, Heading::North);

        planner.visited.insert(Position::new(3, 2));
        let step = planner.find_next_cell(&perception_at(3, 3, Heading::East, [true; 3]));
        assert_eq!(step.target, Position::new(3, 4));
        assert_eq!(step.heading, Heading::South);
    }

    #[test]
    fn test_executed_step_faces_the_planned_heading() {
        let env = open_env();
        let executor = Executor::new(env.clone());
        let mut planner = NavigationPlanner::with_seed(env.clone(), 1);
        planner.visited.insert(Position::new(4, 3));
        let state = RobotState::new(Pose::new(Position::new(3, 3), Heading::East), 90.0);

        let perception = perceive(&state, &env);
        let step = planner.find_next_cell(&perception);
        let decision = planner.decide(&perception);
        assert_eq!(decision, vec![Instruction::MoveTo(step.target)]);

        let moved = executor.execute(state, &decision);
        assert_eq!(moved.position(), step.target);
        assert_eq!(moved.heading(), step.heading);
        assert_eq!(moved.heading(), Heading::North);
    }

    #[test]
    fn test_explore_falls_back_to_visited_front_right_left() {
        let mut planner = NavigationPlanner::with_seed(open_env(), 1);
        for cell in [(4, 3), (3, 2), (3, 4)] {
            planner.visited.insert(Position::from(cell));
        }
        let at = |flags| planner.find_next_cell(&perception_at(3, 3, Heading::East, flags));

        assert_eq!(at([true, true, true]).target, Position::new(4, 3));
        assert_eq!(at([false, true, true]).target, Position::new(3, 4));
        assert_eq!(at([false, true, false]).target, Position::new(3, 2));
        let back = at([false, false, false]);
        assert_eq!(back.target, Position::new(2, 3));
        assert_eq!(back.heading, Heading::East);
    }

    #[test]
    fn test_explore_never_picks_an_invalid_cell() {
        let env = Environment::scenario();
        let planner = NavigationPlanner::with_seed(env.clone(), 3);
        let spots = [(0, 0), (9, 9), (0, 9), (1, 3), (3, 3), (2, 2), (4, 8), (5, 9), (6, 5)];
        for (x, y) in spots {
            for heading in Heading::all() {
                for mask in 0..8u8 {
                    let flags = [mask & 1 != 0, mask & 2 != 0, mask & 4 != 0];
                    let p = perception_at(x, y, heading, flags);
                    let target = planner.find_next_cell(&p).target;
                    assert!(
                        env.is_free(target),
                        "picked {target} from ({x}, {y}) facing {heading} with {flags:?}"
                    );
                    assert!(target.manhattan(p.position) <= 1);
                }
            }
        }
    }

    #[test]
    fn test_boxed_in_holds_position() {
        let walls = [(0, 1), (1, 0)].map(Position::from);
        let env = Environment::new((3, 3), Position::new(2, 2), walls).unwrap();
        let planner = NavigationPlanner::with_seed(env, 1);
        let step = planner.find_next_cell(&perception_at(0, 0, Heading::East, [false; 3]));
        assert_eq!(step.target, Position::new(0, 0));
    }

    #[test]
    fn test_low_battery_scenario_routes_then_charges_to_full() {
        let env = Environment::scenario();
        let charger = env.recharge_zone();
        let executor = Executor::new(env.clone());
        let mut planner = NavigationPlanner::with_seed(env.clone(), 7);
        let mut state = RobotState::new(Pose::new(Position::new(0, 0), Heading::East), 15.0);

        let first = planner.decide(&perceive(&state, &env));
        let Instruction::MoveTo(step) = first[0] else {
            panic!("expected a move, got {first:?}");
        };
        assert_eq!(first.len(), 1);
        assert_eq!(step.manhattan(Position::new(0, 0)), 1);
        assert!(step.manhattan(charger) < Position::new(0, 0).manhattan(charger));
        state = executor.execute(state, &first);

        let mut cycles = 0;
        while state.position() != charger {
            let decision = planner.decide(&perceive(&state, &env));
            assert!(matches!(decision[0], Instruction::MoveTo(_)));
            state = executor.execute(state, &decision);
            cycles += 1;
            assert!(cycles < 20, "never reached the charger");
        }
        assert!(state.battery() > 0.0);

        while state.battery() < BATTERY_MAX {
            let perception = perceive(&state, &env);
            let decision = planner.decide(&perception);
            assert_eq!(decision, vec![Instruction::Recharge(BATTERY_MAX - perception.battery)]);
            assert_eq!(planner.last_action(), LastAction::Charge);
            state = executor.execute(state, &decision);
            cycles += 1;
            assert!(cycles < 100, "never finished charging");
        }

        let decision = planner.decide(&perceive(&state, &env));
        assert!(matches!(decision[0], Instruction::MoveTo(_)));
        assert_eq!(planner.last_action(), LastAction::Move);
    }

    #[test]
    fn test_charging_continues_above_threshold() {
        let env = Environment::scenario();
        let mut planner = NavigationPlanner::with_seed(env.clone(), 7);
        let mut p = perception_at(4, 5, Heading::East, [true; 3]);

        p.battery = 10.0;
        assert_eq!(planner.decide(&p), vec![Instruction::Recharge(90.0)]);
        p.battery = 60.0;
        assert_eq!(planner.decide(&p), vec![Instruction::Recharge(40.0)]);
        p.battery = 100.0;
        assert!(matches!(planner.decide(&p)[0], Instruction::MoveTo(_)));
    }

    #[test]
    fn test_no_charging_without_low_battery() {
        let mut planner = NavigationPlanner::with_seed(Environment::scenario(), 7);
        let mut p = perception_at(4, 5, Heading::East, [true; 3]);
        p.battery = 60.0;
        assert!(matches!(planner.decide(&p)[0], Instruction::MoveTo(_)));
    }

    #[test]
    fn test_goal_pursuit_after_coverage_target() {
        let env = Environment::scenario();
        let config = PlannerConfig {
            exploration_target: 0.0,
            ..PlannerConfig::default()
        };
        let mut planner = NavigationPlanner::with_rng(env.clone(), config, StdRng::seed_from_u64(11));
        let executor = Executor::new(env.clone());
        let mut state = RobotState::new(Pose::new(Position::new(0, 0), Heading::East), 100.0);

        let mut reached = 0;
        for _ in 0..60 {
            let goal = planner.goal();
            assert!(env.is_free(goal));
            let perception = perceive(&state, &env);
            let decision = planner.decide(&perception);
            let Instruction::MoveTo(step) = decision[0] else {
                panic!("expected a move, got {decision:?}");
            };
            assert_eq!(step.manhattan(state.position()), 1);
            if state.position() == goal {
                assert_ne!(planner.goal(), goal);
                reached += 1;
            }
            state = executor.execute(state, &decision);
        }
        assert!(reached > 0);
    }

    #[test]
    fn test_obstacle_goal_is_redrawn_before_routing() {
        let env = Environment::scenario();
        let config = PlannerConfig {
            exploration_target: 0.0,
            ..PlannerConfig::default()
        };
        let mut planner = NavigationPlanner::with_rng(env.clone(), config, StdRng::seed_from_u64(5));
        planner.goal = Position::new(5, 5);
        let decision = planner.decide(&perception_at(0, 0, Heading::East, [true; 3]));
        assert!(env.is_free(planner.goal()));
        assert_ne!(decision[0], Instruction::MoveTo(Position::new(0, 0)));
    }

    #[test]
    fn test_coverage_ignores_invalid_cells() {
        let env = Environment::scenario();
        let mut planner = NavigationPlanner::with_seed(env.clone(), 2);
        planner.decide(&perception_at(0, 0, Heading::East, [true; 3]));
        planner.decide(&perception_at(0, 0, Heading::East, [true; 3]));
        planner.decide(&perception_at(2, 3, Heading::East, [true; 3]));
        assert_eq!(planner.visited().len(), 1);
        assert!((planner.coverage() - 1.0 / 96.0).abs() < 1e-9);
    }
}
