//! Per-client request handler
//!
//! Each connected client gets its own `TcpReceiver` thread. Requests are
//! answered in order, one response frame per request frame.
//!
//! # Request Types
//!
//! | Request | Response |
//! |---------|----------|
//! | `Init` | `Ack("Probe initialized")` or `Rejected(obstacle_conflict)` |
//! | `Commands` | `Ack("Commands executed")` or `Rejected(...)` |
//! | `Summary` | `Summary { visited }` or `Rejected(not_initialized)` |
//! | `Status` | `Status { .. }` or `Rejected(not_initialized)` |
//!
//! # Connection Lifecycle
//!
//! - **Read timeout**: lets the loop notice daemon shutdown between frames
//! - **Malformed frame**: answered with `Rejected(malformed_request)`, connection kept
//! - **Oversized request frame / EOF / reset**: connection closed
//! - **Responses**: not subject to the request size limit

use crate::error::{Error, Result};
use crate::session::{ProbeSession, ProbeSetup};
use crate::streaming::messages::{Rejection, Request, Response};
use crate::streaming::wire::FrameCodec;
use std::io::{ErrorKind, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Initial capacity for the request read buffer (typical request size)
const INITIAL_BUFFER_CAPACITY: usize = 256;

/// Handles requests from one connected client
pub struct TcpReceiver {
    codec: FrameCodec,
    session: Arc<ProbeSession>,
    /// Global running flag (daemon shutdown)
    running: Arc<AtomicBool>,
    read_timeout: Duration,
    read_buffer: Vec<u8>,
}

impl TcpReceiver {
    /// Create a new receiver bound to the shared session
    pub fn new(
        codec: FrameCodec,
        session: Arc<ProbeSession>,
        running: Arc<AtomicBool>,
        read_timeout: Duration,
    ) -> Self {
        Self {
            codec,
            session,
            running,
            read_timeout,
            read_buffer: Vec::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Serve `stream` until the client disconnects or the daemon stops
    pub fn run(&mut self, mut stream: TcpStream) -> Result<()> {
        let peer = stream.peer_addr().ok();
        log::debug!("TCP receiver started for client: {:?}", peer);

        if let Err(e) = stream.set_read_timeout(Some(self.read_timeout)) {
            log::warn!("Failed to set read timeout: {}", e);
        }

        let result = self.serve(&mut stream);
        let _ = stream.shutdown(Shutdown::Both);

        match result {
            Err(Error::Io(ref e))
                if e.kind() == ErrorKind::UnexpectedEof
                    || e.kind() == ErrorKind::ConnectionReset =>
            {
                log::info!("Client disconnected: {:?}", peer);
                Ok(())
            }
            other => other,
        }
    }

    fn serve(&mut self, stream: &mut TcpStream) -> Result<()> {
        while self.running.load(Ordering::Relaxed) {
            if !self.codec.read_frame(stream, &mut self.read_buffer)? {
                continue;
            }

            let response = match self.codec.decode::<Request>(&self.read_buffer) {
                Ok(request) => {
                    log::debug!("Received request: {:?}", request);
                    self.handle_request(request)
                }
                Err(e) => {
                    log::warn!("Discarding malformed request: {}", e);
                    Response::Rejected(Rejection::malformed(&e.to_string()))
                }
            };

            let frame = match self.codec.encode(&response) {
                Ok(frame) => frame,
                Err(e) => {
                    log::error!("Failed to encode response: {}", e);
                    self.codec.encode(&Response::Rejected(Rejection::from(&e)))?
                }
            };
            stream.write_all(&frame)?;
            stream.flush()?;
        }

        log::debug!("Running flag cleared, closing connection");
        Ok(())
    }

    /// Dispatch one request against the session
    pub fn handle_request(&self, request: Request) -> Response {
        let result = match request {
            Request::Init(init) => self
                .session
                .initialize(&ProbeSetup::from(init))
                .map(|()| Response::ack("Probe initialized")),
            Request::Commands { commands } => self
                .session
                .execute_commands(&commands)
                .map(|()| Response::ack("Commands executed")),
            Request::Summary => self
                .session
                .summary()
                .map(|visited| Response::Summary { visited }),
            Request::Status => self.session.status().map(Response::Status),
        };

        result.unwrap_or_else(|e| {
            if !e.is_rejection() {
                log::error!("Request failed: {}", e);
            }
            Response::Rejected(Rejection::from(&e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{GridCoord, Heading};
    use crate::streaming::messages::InitRequest;

    fn receiver() -> TcpReceiver {
        TcpReceiver::new(
            FrameCodec::new(1024),
            Arc::new(ProbeSession::new()),
            Arc::new(AtomicBool::new(true)),
            Duration::from_millis(50),
        )
    }

    fn init(width: u32, height: u32, obstacles: Vec<GridCoord>, direction: Heading) -> Request {
        Request::Init(InitRequest {
            grid_width: width,
            grid_height: height,
            obstacles,
            start_x: 0,
            start_y: 0,
            direction,
        })
    }

    #[test]
    fn test_summary_before_init_rejected() {
        let rx = receiver();
        let Response::Rejected(rejection) = rx.handle_request(Request::Summary) else {
            panic!("expected rejection");
        };
        assert_eq!(rejection.kind, "not_initialized");
    }

    #[test]
    fn test_init_commands_summary() {
        let rx = receiver();
        assert_eq!(
            rx.handle_request(init(2, 2, vec![], Heading::East)),
            Response::ack("Probe initialized")
        );
        assert_eq!(
            rx.handle_request(Request::Commands {
                commands: vec!['F', 'L', 'F']
            }),
            Response::ack("Commands executed")
        );
        assert_eq!(
            rx.handle_request(Request::Summary),
            Response::Summary {
                visited: vec![
                    GridCoord::new(0, 0),
                    GridCoord::new(1, 0),
                    GridCoord::new(1, 1)
                ]
            }
        );
    }

    #[test]
    fn test_obstacle_rejection_payload() {
        let rx = receiver();
        rx.handle_request(init(2, 2, vec![GridCoord::new(1, 0)], Heading::East));
        let Response::Rejected(rejection) = rx.handle_request(Request::Commands {
            commands: vec!['F'],
        }) else {
            panic!("expected rejection");
        };
        assert_eq!(rejection.kind, "obstacle_collision");
        assert_eq!(rejection.message, "Obstacle at (1,0)");
        assert_eq!(rejection.coordinate, Some(GridCoord::new(1, 0)));
    }

    #[test]
    fn test_status_after_moves() {
        let rx = receiver();
        rx.handle_request(init(3, 3, vec![], Heading::North));
        rx.handle_request(Request::Commands {
            commands: vec!['F', 'R'],
        });
        let Response::Status(status) = rx.handle_request(Request::Status) else {
            panic!("expected status");
        };
        assert_eq!(status.position, GridCoord::new(0, 1));
        assert_eq!(status.heading, Heading::East);
        assert_eq!(status.visited_count, 2);
    }
}
