//! Reply rendering
//!
//! One rendering path for every handler, selecting between the three
//! reply shapes the protocol defines:
//!
//! - extended (request had a marker prefix): echo the command and its
//!   parameters, then each labelled field, then an `RPRT` status line
//! - plain with fields: bare values, one per line, no names and no
//!   status line (this mirrors the long-observed rigctld emulator
//!   behavior; the status is computed but never sent on this path)
//! - plain status-only: just the `RPRT` line

use crate::command::{ResponseMarker, StatusCode};

/// A named result value, e.g. `("Frequency", "14074000")`
pub type Field = (&'static str, String);

/// What a handler produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyBody {
    /// A bare status code
    Status(StatusCode),
    /// Named values followed by a status code
    Fields {
        fields: Vec<Field>,
        status: StatusCode,
    },
    /// Preformatted text sent exactly as-is (the `dump_state` block)
    Verbatim(&'static str),
}

/// Render a reply for the wire.
///
/// `name` and `args` echo the request and are only used on the extended
/// path; `name` is empty for protocol errors, which have no command to
/// echo.
pub fn render_reply(
    name: &str,
    args: &[String],
    marker: Option<ResponseMarker>,
    body: &ReplyBody,
) -> String {
    if let ReplyBody::Verbatim(text) = body {
        return (*text).to_string();
    }

    match marker {
        Some(marker) => render_extended(name, args, marker, body),
        None => render_plain(body),
    }
}

fn render_extended(
    name: &str,
    args: &[String],
    marker: ResponseMarker,
    body: &ReplyBody,
) -> String {
    let sep = marker.separator();

    let mut out = format!("{}:", name);
    for arg in args {
        out.push(' ');
        out.push_str(arg);
    }
    out.push(sep);

    let status = match body {
        ReplyBody::Status(status) => *status,
        ReplyBody::Fields { fields, status } => {
            for (field_name, value) in fields {
                out.push_str(field_name);
                out.push_str(": ");
                out.push_str(value);
                out.push(sep);
            }
            *status
        }
        ReplyBody::Verbatim(_) => unreachable!("verbatim handled by caller"),
    };

    out.push_str(&format!("RPRT {}\n", status.value()));
    out
}

fn render_plain(body: &ReplyBody) -> String {
    match body {
        ReplyBody::Status(status) => format!("RPRT {}\n", status.value()),
        ReplyBody::Fields { fields, .. } => {
            let mut out = String::new();
            for (_, value) in fields {
                out.push_str(value);
                out.push('\n');
            }
            out
        }
        ReplyBody::Verbatim(_) => unreachable!("verbatim handled by caller"),
    }
}
