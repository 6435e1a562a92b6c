//! Non-blocking TCP server
//!
//! Single thread, no executor: the listener and every client socket are
//! non-blocking, and [`RigServer::run`] polls them in a loop with a
//! short sleep between rounds. One shared [`RadioState`] serves all
//! clients; last writer wins, like one physical rig shared by several
//! control programs.

use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::dispatch::TxReleaseHook;
use crate::error::ServerError;
use crate::radio::RadioState;
use crate::session::{ClientSession, SessionStatus};

/// Sleep between poll rounds. Short enough that command latency stays
/// well under what CAT clients tolerate, long enough to keep an idle
/// server near zero CPU.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// The rigctl NET protocol server
pub struct RigServer {
    listener: TcpListener,
    sessions: Vec<ClientSession<TcpStream>>,
    radio: RadioState,
    hook: Box<dyn TxReleaseHook>,
}

impl RigServer {
    /// Bind the listener and switch it to non-blocking mode.
    ///
    /// `hook` runs whenever a client drops PTT from transmit to
    /// receive.
    pub fn bind(
        addr: &str,
        radio: RadioState,
        hook: Box<dyn TxReleaseHook>,
    ) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr).map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;
        listener
            .set_nonblocking(true)
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;
        info!(%addr, "listening");
        Ok(Self {
            listener,
            sessions: Vec::new(),
            radio,
            hook,
        })
    }

    /// Address the listener actually bound (useful with port 0)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Number of currently connected clients
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// One round: accept at most one new client, then give every
    /// session one process step, dropping the ones that closed.
    pub fn poll(&mut self) {
        match self.listener.accept() {
            Ok((stream, peer)) => match stream.set_nonblocking(true) {
                Ok(()) => {
                    info!(%peer, "client connected");
                    self.sessions
                        .push(ClientSession::new(stream, peer.to_string()));
                }
                Err(err) => {
                    warn!(%peer, %err, "dropping connection, set_nonblocking failed");
                }
            },
            Err(err) if err.kind() == io::ErrorKind::WouldBlock => {}
            Err(err) => warn!(%err, "accept failed"),
        }

        let radio = &mut self.radio;
        let hook = self.hook.as_ref();
        self.sessions.retain_mut(|session| {
            match session.process(radio, hook) {
                SessionStatus::Open => true,
                SessionStatus::Closed => {
                    info!(peer = %session.peer(), "client disconnected");
                    false
                }
            }
        });
    }

    /// Poll until the process is killed
    pub fn run(&mut self) {
        loop {
            self.poll();
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Read access to the shared radio, for tests and status logging
    pub fn radio(&self) -> &RadioState {
        &self.radio
    }
}
