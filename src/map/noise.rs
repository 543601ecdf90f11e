use std::collections::HashSet;

use noise::{NoiseFn, Perlin};

use super::grid::{Environment, EnvironmentError, Position};

/// Noise level above which a cell becomes an obstacle.
const OBSTACLE_LEVEL: f64 = 0.35;
const NOISE_SCALE: f64 = 4.0;

/// Builds a world whose obstacles follow a Perlin field. `keep_free` cells
/// (typically the start cell) and the recharge zone are never blocked.
pub fn generate(
    width: i32,
    height: i32,
    seed: u32,
    recharge_zone: Position,
    keep_free: &[Position],
) -> Result<Environment, EnvironmentError> {
    let perlin = Perlin::new(seed);
    let mut obstacles = HashSet::new();

    for y in 0..height {
        for x in 0..width {
            let p = Position::new(x, y);
            if p == recharge_zone || keep_free.contains(&p) {
                continue;
            }
            let value = perlin.get([x as f64 / NOISE_SCALE, y as f64 / NOISE_SCALE]);
            if value > OBSTACLE_LEVEL {
                obstacles.insert(p);
            }
        }
    }

    Environment::new((width, height), recharge_zone, obstacles)
}
