/// Battery percentage below which the rover heads for the charger.
pub const LOW_BATTERY_THRESHOLD: f64 = 20.0;
/// Coverage fraction after which exploration gives way to goal pursuit.
pub const EXPLORATION_TARGET: f64 = 0.8;

/// Battery units spent per cell moved, or per second of timed motion.
/// The planner threshold assumes this rate.
pub const MOVE_COST: f64 = 1.0;
/// Battery units restored per recharge cycle at most.
pub const CHARGE_RATE: f64 = 5.0;

/// Consecutive no-op decisions after which the driver reports a stall.
pub const STALL_LIMIT: u32 = 5;

#[derive(Debug, Clone)]
pub struct PlannerConfig {
    pub low_battery_threshold: f64,
    pub exploration_target: f64,
}

pub const PLANNER_CONFIG: PlannerConfig = PlannerConfig {
    low_battery_threshold: LOW_BATTERY_THRESHOLD,
    exploration_target: EXPLORATION_TARGET,
};

impl Default for PlannerConfig {
    fn default() -> Self {
        PLANNER_CONFIG
    }
}

#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    pub move_cost: f64,
    pub charge_rate: f64,
}

pub const EXECUTOR_CONFIG: ExecutorConfig = ExecutorConfig {
    move_cost: MOVE_COST,
    charge_rate: CHARGE_RATE,
};

impl Default for ExecutorConfig {
    fn default() -> Self {
        EXECUTOR_CONFIG
    }
}

/// Tuning of the battery-reactive behavior tree.
#[derive(Debug, Clone)]
pub struct ArbiterConfig {
    pub initial_battery: f64,
    pub battery_threshold: f64,
    pub charge_rate: f64,
    pub move_to_object_cost: f64,
    pub move_to_object_success: f64,
    pub grasp_cost: f64,
    pub grasp_success: f64,
    pub grasp_attempts: u32,
    pub move_home_cost: f64,
}

pub const ARBITER_CONFIG: ArbiterConfig = ArbiterConfig {
    initial_battery: 15.0,
    battery_threshold: LOW_BATTERY_THRESHOLD,
    charge_rate: 30.0,
    move_to_object_cost: 5.0,
    move_to_object_success: 0.8,
    grasp_cost: 2.0,
    grasp_success: 0.5,
    grasp_attempts: 5,
    move_home_cost: 5.0,
};

impl Default for ArbiterConfig {
    fn default() -> Self {
        ARBITER_CONFIG
    }
}
