//! Blocking client for the probe daemon.

use crate::core::types::GridCoord;
use crate::error::{Error, Result};
use crate::session::ProbeStatus;
use crate::streaming::messages::{InitRequest, Request, Response};
use crate::streaming::wire::FrameCodec;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// One connection to a running daemon
pub struct ProbeClient {
    stream: TcpStream,
    codec: FrameCodec,
    buffer: Vec<u8>,
}

impl ProbeClient {
    /// Connect with a response timeout.
    ///
    /// Responses are read without a size limit; the server decides how large
    /// a request it accepts.
    pub fn connect<A: ToSocketAddrs>(addr: A, timeout: Duration) -> Result<Self> {
        let stream = TcpStream::connect(addr)?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_nodelay(true)?;
        Ok(Self {
            stream,
            codec: FrameCodec::unbounded(),
            buffer: Vec::new(),
        })
    }

    /// Place a new probe
    pub fn init(&mut self, request: InitRequest) -> Result<()> {
        self.request(Request::Init(request)).and_then(expect_ack)
    }

    /// Run command tokens
    pub fn commands(&mut self, commands: &[char]) -> Result<()> {
        self.request(Request::Commands {
            commands: commands.to_vec(),
        })
        .and_then(expect_ack)
    }

    /// Visited trail
    pub fn summary(&mut self) -> Result<Vec<GridCoord>> {
        match self.request(Request::Summary)? {
            Response::Summary { visited } => Ok(visited),
            other => Err(unexpected(other)),
        }
    }

    /// Current pose
    pub fn status(&mut self) -> Result<ProbeStatus> {
        match self.request(Request::Status)? {
            Response::Status(status) => Ok(status),
            other => Err(unexpected(other)),
        }
    }

    /// Send a raw request and wait for its response.
    ///
    /// A `Rejected` response is turned back into the matching [`Error`].
    pub fn request(&mut self, request: Request) -> Result<Response> {
        self.codec.write_frame(&mut self.stream, &request)?;
        if !self.codec.read_frame(&mut self.stream, &mut self.buffer)? {
            return Err(Error::Protocol("Timed out waiting for response".into()));
        }
        match self.codec.decode::<Response>(&self.buffer)? {
            Response::Rejected(rejection) => Err(rejection.into_error()),
            response => Ok(response),
        }
    }
}

fn expect_ack(response: Response) -> Result<()> {
    match response {
        Response::Ack { .. } => Ok(()),
        other => Err(unexpected(other)),
    }
}

fn unexpected(response: Response) -> Error {
    Error::Protocol(format!("Unexpected response: {:?}", response))
}
