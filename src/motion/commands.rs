//! Probe command definitions
//!
//! Commands arrive as single-character tokens and are decoded once, at the
//! boundary, into [`ProbeCommand`]. The simulator only ever sees decoded
//! commands.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Probe command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeCommand {
    /// Move one cell along the current heading (`F`)
    Forward,
    /// Move one cell against the current heading (`B`)
    Backward,
    /// Turn 90° counter-clockwise (`L`)
    TurnLeft,
    /// Turn 90° clockwise (`R`)
    TurnRight,
}

impl ProbeCommand {
    /// Wire token for this command
    pub fn token(self) -> char {
        match self {
            Self::Forward => 'F',
            Self::Backward => 'B',
            Self::TurnLeft => 'L',
            Self::TurnRight => 'R',
        }
    }

    /// Signed cell step for movement commands, `None` for turns
    pub fn step(self) -> Option<i32> {
        match self {
            Self::Forward => Some(1),
            Self::Backward => Some(-1),
            Self::TurnLeft | Self::TurnRight => None,
        }
    }

    /// Decode a full token sequence.
    ///
    /// Fails on the first unknown token; nothing is returned for a sequence
    /// containing one.
    pub fn parse_sequence(tokens: &[char]) -> Result<Vec<ProbeCommand>> {
        tokens.iter().map(|&t| ProbeCommand::try_from(t)).collect()
    }

    /// Decode a compact command string such as `"FFRB"`
    pub fn parse_str(s: &str) -> Result<Vec<ProbeCommand>> {
        s.chars().map(ProbeCommand::try_from).collect()
    }
}

impl TryFrom<char> for ProbeCommand {
    type Error = Error;

    fn try_from(token: char) -> Result<Self> {
        match token {
            'F' => Ok(Self::Forward),
            'B' => Ok(Self::Backward),
            'L' => Ok(Self::TurnLeft),
            'R' => Ok(Self::TurnRight),
            other => Err(Error::InvalidCommand(other)),
        }
    }
}

/// Parse a single-token string such as `"F"`
impl FromStr for ProbeCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(token), None) => ProbeCommand::try_from(token),
            _ => Err(Error::Other(format!("Expected a single command token, got {:?}", s))),
        }
    }
}

impl fmt::Display for ProbeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}
