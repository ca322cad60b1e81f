//! Shared probe session
//!
//! One [`ProbeSession`] is created per daemon and handed to every connection
//! by `Arc`. It holds the simulator behind a single mutex, so each operation
//! sees and leaves a consistent probe:
//!
//! ```text
//! Uninitialized ──initialize──▶ Ready ──initialize──▶ Ready (reset)
//!       │                         │
//!       └─ commands/summary ──▶ NotInitialized
//! ```
//!
//! A command batch runs entirely under the lock; two clients never interleave
//! their tokens.

use crate::core::types::{GridBounds, GridCoord, Heading};
use crate::error::{Error, Result};
use crate::motion::ProbeCommand;
use crate::simulator::ProbeSimulator;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Everything needed to (re)initialize a probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeSetup {
    /// Maximum x coordinate (inclusive)
    pub width: u32,
    /// Maximum y coordinate (inclusive)
    pub height: u32,
    #[serde(default)]
    pub obstacles: Vec<GridCoord>,
    pub start: GridCoord,
    pub direction: Heading,
}

impl ProbeSetup {
    fn build(&self) -> Result<ProbeSimulator> {
        ProbeSimulator::new(
            GridBounds::new(self.width, self.height),
            self.obstacles.iter().copied(),
            self.start,
            self.direction,
        )
    }
}

/// Point-in-time view of the probe pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeStatus {
    pub position: GridCoord,
    pub heading: Heading,
    pub visited_count: usize,
}

/// Mutex-guarded probe, `None` until the first successful initialize
#[derive(Debug, Default)]
pub struct ProbeSession {
    probe: Mutex<Option<ProbeSimulator>>,
}

impl ProbeSession {
    /// Create an uninitialized session
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the probe with a fresh one built from `setup`.
    ///
    /// On `ObstacleConflict` the previous probe (if any) is kept untouched.
    pub fn initialize(&self, setup: &ProbeSetup) -> Result<()> {
        let sim = match setup.build() {
            Ok(sim) => sim,
            Err(e) => {
                log::warn!("Initialize rejected: {}", e);
                return Err(e);
            }
        };

        let mut probe = self.probe.lock();
        if probe.is_some() {
            log::info!("Resetting probe session");
        }
        log::info!(
            "Probe initialized: grid {}x{} (inclusive), {} obstacles, start {} facing {}",
            setup.width,
            setup.height,
            sim.obstacle_count(),
            setup.start,
            setup.direction
        );
        *probe = Some(sim);
        Ok(())
    }

    /// Decode and run a batch of command tokens.
    ///
    /// An unknown token rejects the whole batch before any command runs. A
    /// failed move stops the batch; earlier commands stay applied.
    pub fn execute_commands(&self, tokens: &[char]) -> Result<()> {
        let commands = ProbeCommand::parse_sequence(tokens).inspect_err(|e| {
            log::warn!("Command batch rejected: {}", e);
        })?;

        let mut probe = self.probe.lock();
        let sim = probe.as_mut().ok_or(Error::NotInitialized)?;
        match sim.execute(&commands) {
            Ok(()) => {
                log::debug!(
                    "Executed {} commands, probe at {} facing {}",
                    commands.len(),
                    sim.position(),
                    sim.heading()
                );
                Ok(())
            }
            Err(e) => {
                log::warn!("Command batch stopped: {}", e);
                Err(e)
            }
        }
    }

    /// Snapshot of the visited trail
    pub fn summary(&self) -> Result<Vec<GridCoord>> {
        let probe = self.probe.lock();
        probe
            .as_ref()
            .map(ProbeSimulator::summary)
            .ok_or(Error::NotInitialized)
    }

    /// Current pose and trail length
    pub fn status(&self) -> Result<ProbeStatus> {
        let probe = self.probe.lock();
        let sim = probe.as_ref().ok_or(Error::NotInitialized)?;
        Ok(ProbeStatus {
            position: sim.position(),
            heading: sim.heading(),
            visited_count: sim.visited_len(),
        })
    }
}
