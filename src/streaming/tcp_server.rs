//! TCP accept loop
//!
//! Accepts clients on a non-blocking listener and spawns one `tcp-receiver`
//! thread per connection. All receivers share the same [`ProbeSession`];
//! its mutex serializes their requests.

use crate::config::NetworkConfig;
use crate::error::{Error, Result};
use crate::session::ProbeSession;
use crate::streaming::tcp_receiver::TcpReceiver;
use crate::streaming::wire::FrameCodec;
use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Poll interval while no connection is pending
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Probe request server
pub struct TcpServer {
    listener: TcpListener,
    session: Arc<ProbeSession>,
    running: Arc<AtomicBool>,
    codec: FrameCodec,
    read_timeout: Duration,
    active_clients: Arc<AtomicUsize>,
}

impl TcpServer {
    /// Bind to `config.bind_address`
    pub fn bind(
        config: &NetworkConfig,
        session: Arc<ProbeSession>,
        running: Arc<AtomicBool>,
    ) -> Result<Self> {
        let listener = TcpListener::bind(&config.bind_address).map_err(|e| {
            Error::Other(format!("Failed to bind to {}: {}", config.bind_address, e))
        })?;
        listener.set_nonblocking(true)?;

        Ok(Self {
            listener,
            session,
            running,
            codec: FrameCodec::new(config.max_frame_bytes),
            read_timeout: Duration::from_millis(config.read_timeout_ms),
            active_clients: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Address actually bound (resolves port 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept clients until the running flag is cleared
    pub fn run(&self) -> Result<()> {
        log::info!("TCP server listening on {}", self.local_addr()?);

        let mut receivers: Vec<JoinHandle<()>> = Vec::new();
        while self.running.load(Ordering::Relaxed) {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    // Receivers block on reads with a timeout
                    if let Err(e) = stream.set_nonblocking(false) {
                        log::error!("Failed to set socket to blocking mode: {}", e);
                        continue;
                    }

                    let active = self.active_clients.fetch_add(1, Ordering::Relaxed) + 1;
                    log::info!("TCP client connected: {} ({} active)", addr, active);

                    let mut receiver = TcpReceiver::new(
                        self.codec,
                        Arc::clone(&self.session),
                        Arc::clone(&self.running),
                        self.read_timeout,
                    );
                    let active_clients = Arc::clone(&self.active_clients);
                    let spawned = thread::Builder::new()
                        .name("tcp-receiver".to_string())
                        .spawn(move || {
                            if let Err(e) = receiver.run(stream) {
                                log::error!("TCP receiver error ({}): {}", addr, e);
                            }
                            active_clients.fetch_sub(1, Ordering::Relaxed);
                        });
                    match spawned {
                        Ok(handle) => receivers.push(handle),
                        Err(e) => {
                            self.active_clients.fetch_sub(1, Ordering::Relaxed);
                            log::error!("Failed to spawn receiver for {}: {}", addr, e);
                        }
                    }
                    receivers.retain(|h| !h.is_finished());
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(e) => {
                    log::error!("Accept error: {}", e);
                }
            }
        }

        log::info!("Waiting for {} receivers to finish...", receivers.len());
        for handle in receivers {
            if handle.join().is_err() {
                log::error!("TCP receiver thread panicked");
            }
        }
        Ok(())
    }
}
