//! Request line parsing
//!
//! Turns one line of input (already stripped of its trailing newline)
//! into a [`ParsedLine`]. Handles the three wire syntaxes: single-letter,
//! backslash long form, and the extended-response prefixes.

use tracing::debug;

use crate::command::{Command, ParsedLine, Request, ResponseMarker};

/// Single-letter aliases accepted on the wire, mapping to long-form
/// command stems. Uppercase selects `set_`, lowercase `get_`.
const SINGLE_LETTERS: &[(char, &str)] = &[
    ('f', "freq"),
    ('m', "mode"),
    ('t', "ptt"),
    ('v', "vfo"),
    ('s', "split_vfo"),
    ('i', "split_freq"),
    ('x', "split_mode"),
];

/// Parse one request line.
///
/// Never panics, whatever the input; unknown commands come back as
/// [`ParsedLine::Unimplemented`] and lines that are empty once the
/// marker and surrounding whitespace are stripped as
/// [`ParsedLine::ProtocolError`].
pub fn parse_line(line: &str) -> ParsedLine {
    let line = line.trim();

    // Extended response protocol: a marker prefix selects the reply
    // separator and is consumed before the command itself.
    let (marker, rest) = match line.chars().next().and_then(ResponseMarker::from_prefix) {
        Some(marker) => (Some(marker), line[1..].trim()),
        None => (None, line),
    };

    if rest.is_empty() {
        return ParsedLine::ProtocolError { marker };
    }

    if let Some(stripped) = rest.strip_prefix('\\') {
        return parse_long_form(stripped, marker);
    }
    parse_single_letter(rest, marker)
}

/// Long form: `\name arg arg ...`
fn parse_long_form(rest: &str, marker: Option<ResponseMarker>) -> ParsedLine {
    let mut tokens = rest.split_whitespace();
    let name = match tokens.next() {
        Some(name) => name,
        None => return ParsedLine::ProtocolError { marker },
    };
    let args: Vec<String> = tokens.map(str::to_string).collect();

    match Command::from_name(name) {
        Some(command) => ParsedLine::Request(Request {
            command,
            args,
            marker,
        }),
        None => {
            debug!("unimplemented command: {}", name);
            ParsedLine::Unimplemented {
                name: name.to_string(),
                args,
                marker,
            }
        }
    }
}

/// Single-letter form: the first character names the command, the rest
/// of the line carries the parameters.
fn parse_single_letter(rest: &str, marker: Option<ResponseMarker>) -> ParsedLine {
    let mut chars = rest.chars();
    let letter = match chars.next() {
        Some(c) => c,
        None => return ParsedLine::ProtocolError { marker },
    };
    let args: Vec<String> = chars
        .as_str()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let stem = SINGLE_LETTERS
        .iter()
        .find(|(c, _)| *c == letter.to_ascii_lowercase())
        .map(|(_, stem)| *stem);

    let stem = match stem {
        Some(stem) => stem,
        None => {
            debug!("unimplemented single-letter command: {}", letter);
            return ParsedLine::Unimplemented {
                name: letter.to_string(),
                args,
                marker,
            };
        }
    };

    let prefix = if letter.is_ascii_uppercase() {
        "set_"
    } else {
        "get_"
    };
    let name = format!("{}{}", prefix, stem);

    match Command::from_name(&name) {
        Some(command) => ParsedLine::Request(Request {
            command,
            args,
            marker,
        }),
        // The letter table only names commands in the subset, so this
        // arm is unreachable, but the fallthrough keeps it panic-free.
        None => ParsedLine::Unimplemented { name, args, marker },
    }
}
