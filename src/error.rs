//! Error types for Pathik

use crate::core::types::GridCoord;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Pathik error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Start position coincides with an obstacle
    #[error("Starting position on obstacle {0}")]
    ObstacleConflict(GridCoord),

    /// Candidate move leaves the grid
    #[error("Out of bounds: {0}")]
    OutOfBounds(GridCoord),

    /// Candidate move lands on an obstacle
    #[error("Obstacle at {0}")]
    ObstacleCollision(GridCoord),

    /// Unrecognized command token
    #[error("Invalid command: {0}")]
    InvalidCommand(char),

    /// Probe used before the first initialize
    #[error("Probe not initialized")]
    NotInitialized,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Wire (de)serialization failure
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Peer violated the framing protocol
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// True for errors caused by the request itself.
    ///
    /// These map to a client-error response; the connection stays usable and
    /// the probe keeps its last committed state.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::ObstacleConflict(_)
                | Error::OutOfBounds(_)
                | Error::ObstacleCollision(_)
                | Error::InvalidCommand(_)
                | Error::NotInitialized
        )
    }

    /// Stable snake_case identifier used on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            Error::ObstacleConflict(_) => "obstacle_conflict",
            Error::OutOfBounds(_) => "out_of_bounds",
            Error::ObstacleCollision(_) => "obstacle_collision",
            Error::InvalidCommand(_) => "invalid_command",
            Error::NotInitialized => "not_initialized",
            Error::Io(_) => "io",
            Error::Config(_) => "config",
            Error::Serialization(_) => "serialization",
            Error::Protocol(_) => "protocol",
            Error::Other(_) => "other",
        }
    }

    /// Offending coordinate, if the error carries one
    pub fn coordinate(&self) -> Option<GridCoord> {
        match self {
            Error::ObstacleConflict(c) | Error::OutOfBounds(c) | Error::ObstacleCollision(c) => {
                Some(*c)
            }
            _ => None,
        }
    }

    /// Offending command token, if the error carries one
    pub fn token(&self) -> Option<char> {
        match self {
            Error::InvalidCommand(t) => Some(*t),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Error::Config(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_diagnostics() {
        let err = Error::ObstacleCollision(GridCoord::new(1, 0));
        assert_eq!(err.to_string(), "Obstacle at (1,0)");

        let err = Error::OutOfBounds(GridCoord::new(0, -1));
        assert!(err.to_string().contains("Out of bounds"));
        assert_eq!(err.coordinate(), Some(GridCoord::new(0, -1)));

        let err = Error::InvalidCommand('X');
        assert_eq!(err.to_string(), "Invalid command: X");
        assert_eq!(err.token(), Some('X'));
        assert_eq!(err.coordinate(), None);
    }

    #[test]
    fn test_rejection_classification() {
        assert!(Error::NotInitialized.is_rejection());
        assert!(Error::ObstacleConflict(GridCoord::new(0, 0)).is_rejection());
        assert!(!Error::Protocol("bad frame".into()).is_rejection());
        assert!(!Error::Io(std::io::Error::other("boom")).is_rejection());
    }
}
