use log::{info, warn};

use crate::behavior::{BehaviorArbiter, BehaviorStatus};
use crate::map::grid::Environment;
use crate::robot::config::{ArbiterConfig, STALL_LIMIT};
use crate::robot::executor::Executor;
use crate::robot::instruction::Instruction;
use crate::robot::perception::perceive;
use crate::robot::planner::NavigationPlanner;
use crate::robot::state::RobotState;

/// Simulation driver. Every update runs one perceive, decide, execute cycle
/// of the rover and one tick of the behavior arbiter.
pub struct App {
    pub env: Environment,
    pub state: RobotState,
    pub planner: NavigationPlanner,
    pub executor: Executor,
    pub arbiter: BehaviorArbiter,
    cycles: u64,
    stalls: u32,
    stall_reports: u32,
    last_decision: Vec<Instruction>,
    last_tick: Option<BehaviorStatus>,
    halted: bool,
}

impl App {
    pub fn new(env: Environment, state: RobotState, seed: u64) -> Self {
        Self {
            planner: NavigationPlanner::with_seed(env.clone(), seed),
            executor: Executor::new(env.clone()),
            arbiter: BehaviorArbiter::with_seed(&ArbiterConfig::default(), seed),
            env,
            state,
            cycles: 0,
            stalls: 0,
            stall_reports: 0,
            last_decision: Vec::new(),
            last_tick: None,
            halted: false,
        }
    }

    pub fn update(&mut self) {
        self.step_rover();
        self.last_tick = Some(self.arbiter.tick());
    }

    fn step_rover(&mut self) {
        if self.halted {
            return;
        }
        if self.state.is_depleted() {
            warn!("Battery depleted @ {}, rover stopped", self.state.position());
            self.halted = true;
            return;
        }

        let perception = perceive(&self.state, &self.env);
        let decision = self.planner.decide(&perception);
        self.track_stall(&decision);
        self.state = self.executor.execute(self.state, &decision);
        self.last_decision = decision;
        self.cycles += 1;
    }

    /// Counts consecutive cycles that leave the rover where it is. Every
    /// `STALL_LIMIT` of them the stall is reported and the goal redrawn so
    /// pursuit can pick another target.
    fn track_stall(&mut self, decision: &[Instruction]) {
        let here = self.state.position();
        if decision != [Instruction::MoveTo(here)] {
            self.stalls = 0;
            return;
        }
        self.stalls += 1;
        if self.stalls % STALL_LIMIT == 0 {
            self.stall_reports += 1;
            warn!("No progress from {} for {} cycles", here, self.stalls);
            self.planner.redraw_goal(here);
            info!("Goal redrawn to {}", self.planner.goal());
        }
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn stalled(&self) -> bool {
        self.stalls >= STALL_LIMIT
    }

    pub fn stall_reports(&self) -> u32 {
        self.stall_reports
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    pub fn last_decision(&self) -> &[Instruction] {
        &self.last_decision
    }

    pub fn last_tick(&self) -> Option<BehaviorStatus> {
        self.last_tick
    }
}
