//! Per-connection protocol session
//!
//! A `ClientSession` owns one transport and turns its byte stream into
//! command/reply exchanges. It is written against `Read + Write` rather
//! than `TcpStream` so tests can drive it with an in-memory link.
//!
//! Each [`process`](ClientSession::process) call is one cooperative
//! step: at most one non-blocking read and at most one complete command
//! handled. Pipelined commands left in the buffer are picked up on
//! subsequent steps, so no single client can starve the others.

use std::io::{ErrorKind, Read, Write};
use std::thread;

use rigmock_protocol::{parse_line, render_reply, ParsedLine, ReplyBody, StatusCode};
use tracing::{debug, info};

use crate::dispatch::{dispatch, Outcome, SideEffect, TxReleaseHook, TX_RELEASE_DELAY};
use crate::radio::RadioState;

/// Bytes pulled off the transport per process step
const READ_CHUNK: usize = 1024;

/// Whether the session survived a process step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Open,
    Closed,
}

/// One connected client
pub struct ClientSession<T: Read + Write> {
    transport: Option<T>,
    peer: String,
    rx_buf: Vec<u8>,
}

impl<T: Read + Write> ClientSession<T> {
    /// Wrap a non-blocking transport. `peer` labels log lines.
    pub fn new(transport: T, peer: String) -> Self {
        Self {
            transport: Some(transport),
            peer,
            rx_buf: Vec::new(),
        }
    }

    /// Peer label for logging
    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Run one step: read whatever is available without blocking, then
    /// handle at most one complete line.
    pub fn process(&mut self, radio: &mut RadioState, hook: &dyn TxReleaseHook) -> SessionStatus {
        let Some(transport) = self.transport.as_mut() else {
            return SessionStatus::Closed;
        };

        let mut chunk = [0u8; READ_CHUNK];
        match transport.read(&mut chunk) {
            Ok(0) => {
                debug!(peer = %self.peer, "connection closed by peer");
                self.transport = None;
                return SessionStatus::Closed;
            }
            Ok(n) => self.rx_buf.extend_from_slice(&chunk[..n]),
            // No data ready is the normal idle case
            Err(err) if matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {}
            Err(err) => {
                debug!(peer = %self.peer, %err, "read error, closing session");
                self.transport = None;
                return SessionStatus::Closed;
            }
        }

        let Some(newline) = self.rx_buf.iter().position(|&b| b == b'\n') else {
            return SessionStatus::Open;
        };
        let line_bytes: Vec<u8> = self.rx_buf.drain(..=newline).collect();
        let text = String::from_utf8_lossy(&line_bytes);
        let line = text.trim();

        // A bare empty line is the client's way of hanging up
        if line.is_empty() {
            debug!(peer = %self.peer, "empty command, closing session");
            self.transport = None;
            return SessionStatus::Closed;
        }

        let (name, args, marker, outcome) = match parse_line(line) {
            ParsedLine::Request(req) => {
                let outcome = dispatch(req.command, &req.args, radio);
                (req.command.name().to_string(), req.args, req.marker, outcome)
            }
            ParsedLine::Unimplemented { name, args, marker } => (
                name,
                args,
                marker,
                Outcome {
                    body: ReplyBody::Status(StatusCode::Unimplemented),
                    effect: None,
                },
            ),
            // No command to echo, so the reply is a bare RPRT line even
            // when the request carried a marker
            ParsedLine::ProtocolError { .. } => (
                String::new(),
                Vec::new(),
                None,
                Outcome {
                    body: ReplyBody::Status(StatusCode::ProtocolError),
                    effect: None,
                },
            ),
        };

        debug!(peer = %self.peer, command = %name, state = %radio.summary(), "handled");

        let reply = render_reply(&name, &args, marker, &outcome.body);
        let status = self.write_reply(&reply);

        // The reply must be on the wire before the release hook runs,
        // so clients never observe the signal ahead of their RPRT
        if let Some(SideEffect::TxRelease) = outcome.effect {
            thread::sleep(TX_RELEASE_DELAY);
            info!(peer = %self.peer, "transmit released");
            hook.on_tx_release();
        }

        status
    }

    fn write_reply(&mut self, reply: &str) -> SessionStatus {
        let Some(transport) = self.transport.as_mut() else {
            return SessionStatus::Closed;
        };
        if let Err(err) = transport.write_all(reply.as_bytes()) {
            debug!(peer = %self.peer, %err, "write error, closing session");
            self.transport = None;
            return SessionStatus::Closed;
        }
        SessionStatus::Open
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::NoopRelease;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::io;
    use std::rc::Rc;

    /// In-memory transport scripted from the test side
    #[derive(Default)]
    struct LinkState {
        rx: VecDeque<u8>,
        tx: Vec<u8>,
        eof: bool,
        fail_writes: bool,
    }

    #[derive(Clone, Default)]
    struct MockLink(Rc<RefCell<LinkState>>);

    impl MockLink {
        fn feed(&self, bytes: &str) {
            self.0.borrow_mut().rx.extend(bytes.as_bytes());
        }

        fn sent(&self) -> String {
            String::from_utf8(self.0.borrow().tx.clone()).unwrap()
        }

        fn drain_sent(&self) -> String {
            let out = self.sent();
            self.0.borrow_mut().tx.clear();
            out
        }

        fn set_eof(&self) {
            self.0.borrow_mut().eof = true;
        }
    }

    impl Read for MockLink {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let mut state = self.0.borrow_mut();
            if state.rx.is_empty() {
                if state.eof {
                    return Ok(0);
                }
                return Err(io::Error::from(ErrorKind::WouldBlock));
            }
            let n = buf.len().min(state.rx.len());
            for slot in buf.iter_mut().take(n) {
                *slot = state.rx.pop_front().unwrap();
            }
            Ok(n)
        }
    }

    impl Write for MockLink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let mut state = self.0.borrow_mut();
            if state.fail_writes {
                return Err(io::Error::from(ErrorKind::BrokenPipe));
            }
            state.tx.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    struct CountingHook(Cell<u32>);

    impl TxReleaseHook for CountingHook {
        fn on_tx_release(&self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn session(link: &MockLink) -> ClientSession<MockLink> {
        ClientSession::new(link.clone(), "test".to_string())
    }

    #[test]
    fn test_get_freq_plain_reply() {
        let link = MockLink::default();
        let mut sess = session(&link);
        let mut radio = RadioState::new();

        link.feed("f\n");
        assert_eq!(sess.process(&mut radio, &NoopRelease), SessionStatus::Open);
        assert_eq!(link.sent(), "21200500\n");
    }

    #[test]
    fn test_set_then_get() {
        let link = MockLink::default();
        let mut sess = session(&link);
        let mut radio = RadioState::new();

        link.feed("F 14074000\n");
        sess.process(&mut radio, &NoopRelease);
        assert_eq!(link.drain_sent(), "RPRT 0\n");

        link.feed("\\get_freq\n");
        sess.process(&mut radio, &NoopRelease);
        assert_eq!(link.sent(), "14074000\n");
    }

    #[test]
    fn test_one_command_per_step() {
        let link = MockLink::default();
        let mut sess = session(&link);
        let mut radio = RadioState::new();

        link.feed("f\nm\n");
        sess.process(&mut radio, &NoopRelease);
        assert_eq!(link.sent(), "21200500\n");
        sess.process(&mut radio, &NoopRelease);
        assert_eq!(link.sent(), "21200500\nUSB\n2400\n");
    }

    #[test]
    fn test_extended_reply() {
        let link = MockLink::default();
        let mut sess = session(&link);
        let mut radio = RadioState::new();

        link.feed("+f\n");
        sess.process(&mut radio, &NoopRelease);
        assert_eq!(link.sent(), "get_freq:\nFrequency: 21200500\nRPRT 0\n");
    }

    #[test]
    fn test_unimplemented_command() {
        let link = MockLink::default();
        let mut sess = session(&link);
        let mut radio = RadioState::new();

        link.feed("\\set_rptr_shift plus\n");
        sess.process(&mut radio, &NoopRelease);
        assert_eq!(link.sent(), "RPRT -4\n");
    }

    #[test]
    fn test_marker_alone_is_protocol_error() {
        let link = MockLink::default();
        let mut sess = session(&link);
        let mut radio = RadioState::new();

        link.feed("+\n");
        assert_eq!(sess.process(&mut radio, &NoopRelease), SessionStatus::Open);
        assert_eq!(link.sent(), "RPRT -8\n");
    }

    #[test]
    fn test_empty_line_closes_session() {
        let link = MockLink::default();
        let mut sess = session(&link);
        let mut radio = RadioState::new();

        link.feed("\r\n");
        assert_eq!(sess.process(&mut radio, &NoopRelease), SessionStatus::Closed);
        assert_eq!(link.sent(), "");
    }

    #[test]
    fn test_eof_closes_session() {
        let link = MockLink::default();
        let mut sess = session(&link);
        let mut radio = RadioState::new();

        link.set_eof();
        assert_eq!(sess.process(&mut radio, &NoopRelease), SessionStatus::Closed);
        // And it stays closed
        assert_eq!(sess.process(&mut radio, &NoopRelease), SessionStatus::Closed);
    }

    #[test]
    fn test_would_block_keeps_session_open() {
        let link = MockLink::default();
        let mut sess = session(&link);
        let mut radio = RadioState::new();

        assert_eq!(sess.process(&mut radio, &NoopRelease), SessionStatus::Open);
        assert_eq!(sess.process(&mut radio, &NoopRelease), SessionStatus::Open);
    }

    #[test]
    fn test_partial_line_buffers_across_steps() {
        let link = MockLink::default();
        let mut sess = session(&link);
        let mut radio = RadioState::new();

        link.feed("\\get_fr");
        sess.process(&mut radio, &NoopRelease);
        assert_eq!(link.sent(), "");

        link.feed("eq\n");
        sess.process(&mut radio, &NoopRelease);
        assert_eq!(link.sent(), "21200500\n");
    }

    #[test]
    fn test_crlf_line_endings() {
        let link = MockLink::default();
        let mut sess = session(&link);
        let mut radio = RadioState::new();

        link.feed("F 7074000\r\n");
        sess.process(&mut radio, &NoopRelease);
        assert_eq!(link.sent(), "RPRT 0\n");
        assert_eq!(radio.frequency_hz, 7_074_000);
    }

    #[test]
    fn test_tx_release_hook_fires_after_reply() {
        let link = MockLink::default();
        let mut sess = session(&link);
        let mut radio = RadioState::new();
        let hook = CountingHook(Cell::new(0));

        link.feed("T 1\n");
        sess.process(&mut radio, &hook);
        assert_eq!(hook.0.get(), 0);

        link.feed("T 0\n");
        sess.process(&mut radio, &hook);
        assert_eq!(hook.0.get(), 1);
        assert_eq!(link.sent(), "RPRT 0\nRPRT 0\n");

        // Setting 0 again is not an edge
        link.feed("T 0\n");
        sess.process(&mut radio, &hook);
        assert_eq!(hook.0.get(), 1);
    }

    #[test]
    fn test_write_failure_closes_session() {
        let link = MockLink::default();
        link.0.borrow_mut().fail_writes = true;
        let mut sess = session(&link);
        let mut radio = RadioState::new();

        link.feed("f\n");
        assert_eq!(sess.process(&mut radio, &NoopRelease), SessionStatus::Closed);
    }

    #[test]
    fn test_dump_state_sent_verbatim() {
        let link = MockLink::default();
        let mut sess = session(&link);
        let mut radio = RadioState::new();

        link.feed("\\dump_state\n");
        sess.process(&mut radio, &NoopRelease);
        assert_eq!(link.sent(), rigmock_protocol::DUMP_STATE);
    }
}
