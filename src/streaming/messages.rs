//! Request/response messages exchanged with clients.
//!
//! Field names of [`InitRequest`] follow the probe-control REST API
//! (`gridWidth`, `startX`, ...) so existing client payloads can be reused
//! verbatim inside a frame.

use crate::core::types::{GridCoord, Heading};
use crate::error::Error;
use crate::session::{ProbeSetup, ProbeStatus};
use serde::{Deserialize, Serialize};

/// Inbound request
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Place a new probe, discarding any previous trail
    Init(InitRequest),
    /// Run command tokens (`"F"`, `"B"`, `"L"`, `"R"`) in order
    Commands { commands: Vec<char> },
    /// Visited trail
    Summary,
    /// Current pose
    Status,
}

/// Probe placement parameters
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InitRequest {
    pub grid_width: u32,
    pub grid_height: u32,
    #[serde(default)]
    pub obstacles: Vec<GridCoord>,
    pub start_x: i32,
    pub start_y: i32,
    pub direction: Heading,
}

impl From<InitRequest> for ProbeSetup {
    fn from(req: InitRequest) -> Self {
        ProbeSetup {
            width: req.grid_width,
            height: req.grid_height,
            obstacles: req.obstacles,
            start: GridCoord::new(req.start_x, req.start_y),
            direction: req.direction,
        }
    }
}

/// Outbound response, one per request
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// Request applied
    Ack { message: String },
    /// Visited trail, oldest first
    Summary { visited: Vec<GridCoord> },
    /// Current pose
    Status(ProbeStatus),
    /// Client error; the probe keeps its last committed state
    Rejected(Rejection),
}

impl Response {
    pub fn ack(message: &str) -> Self {
        Response::Ack {
            message: message.to_string(),
        }
    }
}

/// Diagnostic payload of a rejected request
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Rejection {
    /// Snake_case error identifier (see [`Error::kind`])
    pub kind: String,
    /// Human-readable message
    pub message: String,
    /// Offending cell for bounds/obstacle errors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<GridCoord>,
    /// Offending token for `invalid_command`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<char>,
}

/// Kind reported for frames that do not decode as a [`Request`]
pub const MALFORMED_REQUEST: &str = "malformed_request";

impl Rejection {
    /// Rejection for an undecodable frame
    pub fn malformed(detail: &str) -> Self {
        Self {
            kind: MALFORMED_REQUEST.to_string(),
            message: format!("Malformed request: {}", detail),
            coordinate: None,
            token: None,
        }
    }

    /// Rebuild the typed error on the client side.
    ///
    /// Unknown kinds (or known kinds missing their payload) become
    /// [`Error::Protocol`] carrying the server's message.
    pub fn into_error(self) -> Error {
        match (self.kind.as_str(), self.coordinate, self.token) {
            ("obstacle_conflict", Some(c), _) => Error::ObstacleConflict(c),
            ("out_of_bounds", Some(c), _) => Error::OutOfBounds(c),
            ("obstacle_collision", Some(c), _) => Error::ObstacleCollision(c),
            ("invalid_command", _, Some(t)) => Error::InvalidCommand(t),
            ("not_initialized", _, _) => Error::NotInitialized,
            _ => Error::Protocol(self.message),
        }
    }
}

impl From<&Error> for Rejection {
    fn from(e: &Error) -> Self {
        Self {
            kind: e.kind().to_string(),
            message: e.to_string(),
            coordinate: e.coordinate(),
            token: e.token(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_request_json_shape() {
        let json = r#"{
            "type": "Init",
            "gridWidth": 5,
            "gridHeight": 5,
            "obstacles": [{"x": 1, "y": 1}, {"x": 3, "y": 3}],
            "startX": 0,
            "startY": 0,
            "direction": "NORTH"
        }"#;
        let req: Request = serde_json::from_str(json).unwrap();
        let Request::Init(init) = req else {
            panic!("expected Init request");
        };
        let setup = ProbeSetup::from(init);
        assert_eq!(setup.width, 5);
        assert_eq!(setup.obstacles.len(), 2);
        assert_eq!(setup.start, GridCoord::new(0, 0));
        assert_eq!(setup.direction, Heading::North);
    }

    #[test]
    fn test_commands_request_json_shape() {
        let req: Request =
            serde_json::from_str(r#"{"type": "Commands", "commands": ["F", "R", "F"]}"#).unwrap();
        assert_eq!(
            req,
            Request::Commands {
                commands: vec!['F', 'R', 'F']
            }
        );

        // Multi-character tokens are not commands
        assert!(
            serde_json::from_str::<Request>(r#"{"type": "Commands", "commands": ["FF"]}"#)
                .is_err()
        );
    }

    #[test]
    fn test_rejection_keeps_diagnostics() {
        let rejection = Rejection::from(&Error::ObstacleCollision(GridCoord::new(1, 0)));
        let json = serde_json::to_string(&Response::Rejected(rejection.clone())).unwrap();
        assert!(json.contains("Obstacle at (1,0)"));
        assert!(json.contains("\"coordinate\":{\"x\":1,\"y\":0}"));
        assert!(!json.contains("token"));

        assert!(matches!(
            rejection.into_error(),
            Error::ObstacleCollision(c) if c == GridCoord::new(1, 0)
        ));
    }

    #[test]
    fn test_rejection_into_error() {
        let rejection = Rejection::from(&Error::InvalidCommand('Z'));
        assert_eq!(rejection.kind, "invalid_command");
        assert!(matches!(rejection.into_error(), Error::InvalidCommand('Z')));

        let rejection = Rejection::from(&Error::NotInitialized);
        assert!(matches!(rejection.into_error(), Error::NotInitialized));

        let rejection = Rejection::malformed("expected value");
        assert!(matches!(rejection.into_error(), Error::Protocol(m) if m.contains("expected value")));
    }
}
