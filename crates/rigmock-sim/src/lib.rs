//! Rigctl Emulator Library
//!
//! This crate provides the emulated transceiver and the TCP server that
//! exposes it over the rigctl NET protocol, so client software can be
//! exercised without real hardware. It includes:
//!
//! - **RadioState**: the one shared mutable record of the fake rig
//! - **dispatch**: command handlers mutating/reading that record
//! - **ClientSession**: the per-connection protocol state machine
//! - **RigServer**: non-blocking accept + cooperative poll loop
//!
//! # Example
//!
//! ```rust,no_run
//! use rigmock_sim::{NoopRelease, RadioState, RigServer};
//!
//! let radio = RadioState::new();
//! let mut server = RigServer::bind("127.0.0.1:4575", radio, Box::new(NoopRelease))
//!     .expect("bind");
//! server.run();
//! ```

pub mod dispatch;
pub mod error;
pub mod radio;
pub mod server;
pub mod session;

pub use dispatch::{dispatch, NoopRelease, SideEffect, TxReleaseHook};
pub use error::ServerError;
pub use radio::{RadioConfig, RadioState};
pub use server::RigServer;
pub use session::{ClientSession, SessionStatus};
