//! TCP transport for the probe session

pub mod client;
pub mod messages;
pub mod tcp_receiver;
pub mod tcp_server;
pub mod wire;

pub use client::ProbeClient;
pub use messages::{InitRequest, Rejection, Request, Response};
pub use tcp_receiver::TcpReceiver;
pub use tcp_server::TcpServer;
pub use wire::FrameCodec;
