//! PTT release signalling
//!
//! Digimode programs key the rig, play audio, then drop PTT; the
//! process named on the command line gets SIGTERM on that drop so audio
//! playback can be cut off the moment transmit ends.

use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use rigmock_sim::TxReleaseHook;
use tracing::{debug, warn};

/// Sends SIGTERM to a fixed process on every transmit release
pub struct SignalTxRelease {
    target: Pid,
}

impl SignalTxRelease {
    pub fn new(pid: i32) -> Self {
        Self {
            target: Pid::from_raw(pid),
        }
    }
}

impl TxReleaseHook for SignalTxRelease {
    fn on_tx_release(&self) {
        match kill(self.target, Signal::SIGTERM) {
            Ok(()) => debug!(pid = %self.target, "sent SIGTERM"),
            // A stale PID is the target's problem, not a protocol error
            Err(err) => warn!(pid = %self.target, %err, "failed to signal process"),
        }
    }
}
