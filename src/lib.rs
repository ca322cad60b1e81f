//! Pathik - grid probe simulator
//!
//! A directional probe on a bounded grid: it moves and turns on single
//! character commands, refuses to leave the grid or enter an obstacle, and
//! records every cell it occupies.
//!
//! - [`simulator::ProbeSimulator`]: the movement state machine
//! - [`session::ProbeSession`]: mutex-guarded simulator shared by clients
//! - [`streaming`]: length-prefixed JSON over TCP (server, receiver, client)

pub mod config;
pub mod core;
pub mod error;
pub mod motion;
pub mod session;
pub mod simulator;
pub mod streaming;

// Re-export commonly used types
pub use config::AppConfig;
pub use crate::core::types::{GridBounds, GridCoord, Heading};
pub use error::{Error, Result};
pub use motion::ProbeCommand;
pub use session::{ProbeSession, ProbeSetup, ProbeStatus};
pub use simulator::ProbeSimulator;
