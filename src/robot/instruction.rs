use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::map::grid::Position;

/// One actuator command. A cycle's decision is a list of these; in practice
/// the planner emits exactly one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Instruction {
    MoveTo(Position),
    Recharge(f64),
    MoveForward(f64),
    TurnLeft(f64),
    TurnRight(f64),
}

impl Instruction {
    pub fn tag(&self) -> &'static str {
        match self {
            Instruction::MoveTo(_) => "move_to",
            Instruction::Recharge(_) => "recharge",
            Instruction::MoveForward(_) => "move_forward",
            Instruction::TurnLeft(_) => "turn_left",
            Instruction::TurnRight(_) => "turn_right",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::MoveTo(p) => write!(f, "{} {} {}", self.tag(), p.x, p.y),
            Instruction::Recharge(v)
            | Instruction::MoveForward(v)
            | Instruction::TurnLeft(v)
            | Instruction::TurnRight(v) => write!(f, "{} {}", self.tag(), v),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstructionError {
    #[error("empty instruction")]
    Empty,

    #[error("unknown instruction tag `{0}`")]
    UnknownTag(String),

    #[error("`{tag}` expects {expected} argument(s), got {found}")]
    Arity {
        tag: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("`{tag}` has a malformed argument `{arg}`")]
    Malformed { tag: &'static str, arg: String },
}

fn parse_arg<T: FromStr>(tag: &'static str, arg: &str) -> Result<T, InstructionError> {
    arg.parse().map_err(|_| InstructionError::Malformed {
        tag,
        arg: arg.to_string(),
    })
}

/// Parses the textual form produced by `Display`, e.g. `move_to 3 4` or
/// `recharge 12.5`. Timed commands default to one second.
impl FromStr for Instruction {
    type Err = InstructionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let tag = words.next().ok_or(InstructionError::Empty)?;
        let args: Vec<&str> = words.collect();

        let (tag, expected): (&'static str, usize) = match tag {
            "move_to" => ("move_to", 2),
            "recharge" => ("recharge", 1),
            "move_forward" => ("move_forward", 1),
            "turn_left" => ("turn_left", 1),
            "turn_right" => ("turn_right", 1),
            other => return Err(InstructionError::UnknownTag(other.to_string())),
        };

        if tag == "move_to" {
            if args.len() != expected {
                return Err(InstructionError::Arity {
                    tag,
                    expected,
                    found: args.len(),
                });
            }
            let x = parse_arg(tag, args[0])?;
            let y = parse_arg(tag, args[1])?;
            return Ok(Instruction::MoveTo(Position::new(x, y)));
        }

        let value: f64 = match args.as_slice() {
            [] if tag != "recharge" => 1.0,
            [arg] => parse_arg(tag, arg)?,
            _ => {
                return Err(InstructionError::Arity {
                    tag,
                    expected,
                    found: args.len(),
                })
            }
        };

        Ok(match tag {
            "recharge" => Instruction::Recharge(value),
            "move_forward" => Instruction::MoveForward(value),
            "turn_left" => Instruction::TurnLeft(value),
            _ => Instruction::TurnRight(value),
        })
    }
}
