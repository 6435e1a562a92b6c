//! Rigctl NET Protocol Library
//!
//! This crate provides parsing and reply rendering for the subset of the
//! hamlib `rigctl` NET protocol emulated by rigmock. It is purely
//! textual; all socket handling lives in `rigmock-sim`.
//!
//! # Wire format
//!
//! Requests are newline-terminated ASCII lines in one of three syntaxes:
//!
//! - Single-letter: `f` (get) or `F14074000` (set)
//! - Long form: `\get_freq` / `\set_freq 14074000`
//! - Extended response: any of the above prefixed by `+` (reply fields
//!   separated by newlines) or by a literal `;` `|` `,` separator
//!
//! Replies either echo the request with labelled fields and a trailing
//! `RPRT <code>` line (extended), send bare values one per line
//! (plain multi-value), or send only `RPRT <code>` (status-only).
//!
//! # Example
//!
//! ```rust
//! use rigmock_protocol::{parse_line, Command, ParsedLine};
//!
//! match parse_line("\\set_freq 14074000") {
//!     ParsedLine::Request(req) => {
//!         assert_eq!(req.command, Command::SetFreq);
//!         assert_eq!(req.args, vec!["14074000".to_string()]);
//!     }
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

pub mod args;
pub mod command;
pub mod dump;
pub mod parse;
pub mod reply;

pub use args::ArgError;
pub use command::{Command, ParsedLine, Request, ResponseMarker, StatusCode};
pub use dump::DUMP_STATE;
pub use parse::parse_line;
pub use reply::{render_reply, Field, ReplyBody};
