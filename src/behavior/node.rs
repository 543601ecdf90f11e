use std::fmt;

use log::{debug, trace};
use rand::Rng;

use super::blackboard::Blackboard;
use super::leaves::{Action, Condition};

/// Result of ticking a node once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorStatus {
    Success,
    Failure,
    /// Not finished; tick again next cycle.
    Running,
}

impl fmt::Display for BehaviorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BehaviorStatus::Success => "✔",
            BehaviorStatus::Failure => "✕",
            BehaviorStatus::Running => "*",
        };
        f.write_str(symbol)
    }
}

/// Retries its child until it succeeds or `max_attempts` failures pile up.
#[derive(Debug)]
pub struct RetryLoop {
    pub max_attempts: u32,
    attempts: u32,
    child: Box<BehaviorNode>,
}

impl RetryLoop {
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn child(&self) -> &BehaviorNode {
        &self.child
    }

    fn tick<R: Rng + ?Sized>(&mut self, blackboard: &mut Blackboard, rng: &mut R) -> BehaviorStatus {
        match self.child.tick(blackboard, rng) {
            BehaviorStatus::Success => {
                self.attempts = 0;
                BehaviorStatus::Success
            }
            BehaviorStatus::Running => BehaviorStatus::Running,
            BehaviorStatus::Failure => {
                self.attempts += 1;
                debug!("Attempt {}/{} failed", self.attempts, self.max_attempts);
                if self.attempts >= self.max_attempts {
                    BehaviorStatus::Failure
                } else {
                    BehaviorStatus::Running
                }
            }
        }
    }
}

#[derive(Debug)]
pub enum NodeKind {
    Condition(Condition),
    Action(Action),
    /// Fallback: first child that does not fail wins.
    Selector(Vec<BehaviorNode>),
    /// All children must succeed within the same tick.
    Sequence(Vec<BehaviorNode>),
    RetryLoop(RetryLoop),
}

/// A named node of a reactive behavior tree.
///
/// Composites have no memory: every tick starts again from the first child,
/// and children left running by a previous tick are halted when a sibling
/// before them decides the outcome.
#[derive(Debug)]
pub struct BehaviorNode {
    name: String,
    kind: NodeKind,
    status: Option<BehaviorStatus>,
}

impl BehaviorNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            status: None,
        }
    }

    pub fn condition(name: impl Into<String>, condition: Condition) -> Self {
        Self::new(name, NodeKind::Condition(condition))
    }

    pub fn action(name: impl Into<String>, action: Action) -> Self {
        Self::new(name, NodeKind::Action(action))
    }

    pub fn selector(name: impl Into<String>, children: Vec<BehaviorNode>) -> Self {
        Self::new(name, NodeKind::Selector(children))
    }

    pub fn sequence(name: impl Into<String>, children: Vec<BehaviorNode>) -> Self {
        Self::new(name, NodeKind::Sequence(children))
    }

    pub fn retry(name: impl Into<String>, max_attempts: u32, child: BehaviorNode) -> Self {
        Self::new(
            name,
            NodeKind::RetryLoop(RetryLoop {
                max_attempts,
                attempts: 0,
                child: Box::new(child),
            }),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Outcome of the last tick; `None` before the first tick or after a halt.
    pub fn status(&self) -> Option<BehaviorStatus> {
        self.status
    }

    pub fn children(&self) -> &[BehaviorNode] {
        match &self.kind {
            NodeKind::Selector(children) | NodeKind::Sequence(children) => children,
            NodeKind::RetryLoop(retry) => std::slice::from_ref(retry.child.as_ref()),
            NodeKind::Condition(_) | NodeKind::Action(_) => &[],
        }
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, blackboard: &mut Blackboard, rng: &mut R) -> BehaviorStatus {
        if self.status != Some(BehaviorStatus::Running) {
            self.initialise();
        }

        let status = match &mut self.kind {
            NodeKind::Condition(condition) => condition.evaluate(blackboard),
            NodeKind::Action(action) => action.execute(blackboard, rng),
            NodeKind::Selector(children) => {
                tick_children(children, blackboard, rng, BehaviorStatus::Failure)
            }
            NodeKind::Sequence(children) => {
                tick_children(children, blackboard, rng, BehaviorStatus::Success)
            }
            NodeKind::RetryLoop(retry) => retry.tick(blackboard, rng),
        };

        trace!("{} -> {:?}", self.name, status);
        if status != BehaviorStatus::Running {
            self.terminate(status);
        }
        self.status = Some(status);
        status
    }

    /// Called on the transition from not running to running.
    fn initialise(&mut self) {
        trace!("{} initialise", self.name);
        if let NodeKind::RetryLoop(retry) = &mut self.kind {
            retry.attempts = 0;
        }
    }

    /// Called when the node leaves the running state with `status`.
    fn terminate(&mut self, status: BehaviorStatus) {
        trace!("{} terminate with {:?}", self.name, status);
        if let NodeKind::RetryLoop(retry) = &mut self.kind {
            retry.child.halt();
        }
    }

    /// Stops a node that was left running by an earlier tick.
    pub fn halt(&mut self) {
        if self.status != Some(BehaviorStatus::Running) {
            return;
        }
        debug!("{} halted", self.name);
        match &mut self.kind {
            NodeKind::Selector(children) | NodeKind::Sequence(children) => {
                children.iter_mut().for_each(BehaviorNode::halt);
            }
            NodeKind::RetryLoop(retry) => retry.child.halt(),
            NodeKind::Condition(_) | NodeKind::Action(_) => {}
        }
        self.status = None;
    }

    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let marker = match &self.kind {
            NodeKind::Selector(_) => "{o}",
            NodeKind::Sequence(_) => "{-}",
            NodeKind::RetryLoop(_) => "{R}",
            NodeKind::Condition(_) | NodeKind::Action(_) => "-->",
        };
        write!(f, "{:indent$}{} {}", "", marker, self.name, indent = depth * 4)?;
        if let NodeKind::RetryLoop(retry) = &self.kind {
            write!(f, " ({}/{})", retry.attempts, retry.max_attempts)?;
        }
        match self.status {
            Some(status) => writeln!(f, " [{}]", status)?,
            None => writeln!(f, " [-]")?,
        }
        self.children()
            .iter()
            .try_for_each(|child| child.fmt_tree(f, depth + 1))
    }
}

/// Ticks children in order until one returns something other than
/// `continue_on`, then halts the children after it.
fn tick_children<R: Rng + ?Sized>(
    children: &mut [BehaviorNode],
    blackboard: &mut Blackboard,
    rng: &mut R,
    continue_on: BehaviorStatus,
) -> BehaviorStatus {
    for i in 0..children.len() {
        let status = children[i].tick(blackboard, rng);
        if status != continue_on {
            children[i + 1..].iter_mut().for_each(BehaviorNode::halt);
            return status;
        }
    }
    continue_on
}

/// Indented tree with the last status of every node.
impl fmt::Display for BehaviorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}
