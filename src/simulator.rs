//! Probe movement state machine
//!
//! [`ProbeSimulator`] owns the grid bounds, the obstacle set and the probe
//! pose, and records every cell the probe has occupied.
//!
//! # Move validation
//!
//! ```text
//! candidate = position + step × heading axis
//!   │
//!   ├─ outside bounds? ──▶ OutOfBounds(candidate)        (pose unchanged)
//!   ├─ on an obstacle? ──▶ ObstacleCollision(candidate)  (pose unchanged)
//!   └─ commit: position = candidate, visited.push(candidate)
//! ```
//!
//! Bounds are checked before obstacles, so an obstacle listed outside the
//! grid can never be reported as a collision.

use crate::core::types::{GridBounds, GridCoord, Heading};
use crate::error::{Error, Result};
use crate::motion::ProbeCommand;
use std::collections::HashSet;

/// Grid probe with visited-path recording
#[derive(Debug, Clone)]
pub struct ProbeSimulator {
    bounds: GridBounds,
    obstacles: HashSet<GridCoord>,
    position: GridCoord,
    heading: Heading,
    /// Every occupied cell in order, starting with the initial position
    visited: Vec<GridCoord>,
}

impl ProbeSimulator {
    /// Place a probe on a fresh grid.
    ///
    /// Obstacles are deduplicated. Neither the obstacles nor the start are
    /// checked against `bounds`; only a start on an obstacle is refused.
    pub fn new<I>(
        bounds: GridBounds,
        obstacles: I,
        start: GridCoord,
        heading: Heading,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = GridCoord>,
    {
        let obstacles: HashSet<GridCoord> = obstacles.into_iter().collect();
        if obstacles.contains(&start) {
            return Err(Error::ObstacleConflict(start));
        }

        Ok(Self {
            bounds,
            obstacles,
            position: start,
            heading,
            visited: vec![start],
        })
    }

    /// Current position
    #[inline]
    pub fn position(&self) -> GridCoord {
        self.position
    }

    /// Current heading
    #[inline]
    pub fn heading(&self) -> Heading {
        self.heading
    }

    /// Grid extent
    #[inline]
    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// Check if `coord` is an obstacle
    #[inline]
    pub fn is_obstacle(&self, coord: GridCoord) -> bool {
        self.obstacles.contains(&coord)
    }

    /// Number of distinct obstacles
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.len()
    }

    /// Length of the visited trail (1 + successful moves)
    #[inline]
    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    /// Owned snapshot of the visited trail
    pub fn summary(&self) -> Vec<GridCoord> {
        self.visited.clone()
    }

    /// Apply commands in order, stopping at the first failure.
    ///
    /// Commands applied before the failing one stay applied.
    pub fn execute(&mut self, commands: &[ProbeCommand]) -> Result<()> {
        for (i, &cmd) in commands.iter().enumerate() {
            if let Err(e) = self.apply(cmd) {
                log::debug!(
                    "Command {} ({}) failed, skipping {} remaining: {}",
                    i,
                    cmd,
                    commands.len() - i - 1,
                    e
                );
                return Err(e);
            }
        }
        Ok(())
    }

    /// Apply a single command
    pub fn apply(&mut self, cmd: ProbeCommand) -> Result<()> {
        if let Some(step) = cmd.step() {
            return self.advance(step);
        }

        self.heading = match cmd {
            ProbeCommand::TurnRight => self.heading.turned_right(),
            ProbeCommand::TurnLeft | ProbeCommand::Forward | ProbeCommand::Backward => {
                self.heading.turned_left()
            }
        };
        log::trace!("Turned {}, heading {}", cmd, self.heading);
        Ok(())
    }

    fn advance(&mut self, step: i32) -> Result<()> {
        let candidate = self
            .position
            .stepped(self.heading, step)
            .map_err(Error::OutOfBounds)?;

        if !self.bounds.contains(candidate) {
            return Err(Error::OutOfBounds(candidate));
        }
        if self.obstacles.contains(&candidate) {
            return Err(Error::ObstacleCollision(candidate));
        }

        self.position = candidate;
        self.visited.push(candidate);
        log::trace!("Moved to {}", candidate);
        Ok(())
    }
}
