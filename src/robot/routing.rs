//! Online breadth-first router.
//!
//! Only the first step of a shortest path is returned; callers re-route on
//! every cycle, so a moving goal never leaves stale path state behind.

use std::collections::{HashSet, VecDeque};

use log::{debug, warn};

use crate::map::grid::{Environment, Position};
use crate::robot::instruction::Instruction;
use crate::robot::movement;

/// First cell on a shortest obstacle-free path from `start` to `goal`.
///
/// Returns `Some(goal)` when already there, and `None` when `goal` cannot be
/// reached. The search stops as soon as `goal` is discovered as a neighbour,
/// and expands each free cell at most once.
pub fn first_step(env: &Environment, start: Position, goal: Position) -> Option<Position> {
    search(env, start, goal).0
}

/// BFS behind `first_step`, also returning how many cells were expanded.
fn search(env: &Environment, start: Position, goal: Position) -> (Option<Position>, usize) {
    if start == goal {
        return (Some(goal), 0);
    }

    // each entry carries the first step taken out of `start` to reach it
    let mut queue: VecDeque<(Position, Option<Position>)> = VecDeque::from([(start, None)]);
    let mut seen: HashSet<Position> = HashSet::from([start]);

    let mut expanded = 0;

    while let Some((cell, first)) = queue.pop_front() {
        expanded += 1;
        for next in movement::neighbours(cell) {
            if !env.is_free(next) || !seen.insert(next) {
                continue;
            }
            let first = first.unwrap_or(next);
            if next == goal {
                return (Some(first), expanded);
            }
            queue.push_back((next, Some(first)));
        }
    }

    (None, expanded)
}

/// Routing decision for one cycle: a `MoveTo` of the next step, or a no-op
/// `MoveTo(start)` when no path exists.
pub fn route(env: &Environment, start: Position, goal: Position) -> Instruction {
    if start == goal {
        debug!("Already at {}", goal);
        return Instruction::MoveTo(goal);
    }
    match first_step(env, start, goal) {
        Some(step) => {
            debug!("Routing {} -> {} (goal {})", start, step, goal);
            Instruction::MoveTo(step)
        }
        None => {
            warn!("No path from {} to {}, holding position", start, goal);
            Instruction::MoveTo(start)
        }
    }
}
