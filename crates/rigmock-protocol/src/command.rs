//! Normalized request representation
//!
//! The original rigctld protocol dispatches on command-name strings; here
//! the emulated subset is a closed enum so dispatch is an exhaustive
//! `match` and unknown names are rejected at parse time.

/// Status codes carried on `RPRT` reply lines.
///
/// Values match the hamlib error codes clients expect on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// Success (`RPRT 0`)
    Ok,
    /// Invalid parameter (`RPRT -1`, hamlib RIG_EINVAL)
    InvalidParam,
    /// Command not implemented (`RPRT -4`, hamlib RIG_ENIMPL)
    Unimplemented,
    /// Protocol error, malformed or empty input (`RPRT -8`, hamlib RIG_EPROTO)
    ProtocolError,
}

impl StatusCode {
    /// The numeric wire value
    pub fn value(self) -> i32 {
        match self {
            StatusCode::Ok => 0,
            StatusCode::InvalidParam => -1,
            StatusCode::Unimplemented => -4,
            StatusCode::ProtocolError => -8,
        }
    }
}

/// Separator character used by the extended response protocol
///
/// A `+` request prefix selects newline separation; a `;` `|` or `,`
/// prefix selects that literal character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMarker {
    Newline,
    Semicolon,
    Pipe,
    Comma,
}

impl ResponseMarker {
    /// Map a request prefix character to its marker, if it is one
    pub fn from_prefix(c: char) -> Option<Self> {
        match c {
            '+' => Some(ResponseMarker::Newline),
            ';' => Some(ResponseMarker::Semicolon),
            '|' => Some(ResponseMarker::Pipe),
            ',' => Some(ResponseMarker::Comma),
            _ => None,
        }
    }

    /// The character placed between reply segments
    pub fn separator(self) -> char {
        match self {
            ResponseMarker::Newline => '\n',
            ResponseMarker::Semicolon => ';',
            ResponseMarker::Pipe => '|',
            ResponseMarker::Comma => ',',
        }
    }
}

/// The emulated command subset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    DumpState,
    GetFreq,
    SetFreq,
    GetMode,
    SetMode,
    GetVfo,
    SetVfo,
    GetPtt,
    SetPtt,
    GetSplitVfo,
    SetSplitVfo,
    GetSplitFreq,
    SetSplitFreq,
    GetSplitMode,
    SetSplitMode,
}

impl Command {
    /// Look up a long-form command name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dump_state" => Some(Command::DumpState),
            "get_freq" => Some(Command::GetFreq),
            "set_freq" => Some(Command::SetFreq),
            "get_mode" => Some(Command::GetMode),
            "set_mode" => Some(Command::SetMode),
            "get_vfo" => Some(Command::GetVfo),
            "set_vfo" => Some(Command::SetVfo),
            "get_ptt" => Some(Command::GetPtt),
            "set_ptt" => Some(Command::SetPtt),
            "get_split_vfo" => Some(Command::GetSplitVfo),
            "set_split_vfo" => Some(Command::SetSplitVfo),
            "get_split_freq" => Some(Command::GetSplitFreq),
            "set_split_freq" => Some(Command::SetSplitFreq),
            "get_split_mode" => Some(Command::GetSplitMode),
            "set_split_mode" => Some(Command::SetSplitMode),
            _ => None,
        }
    }

    /// The long-form name, used when echoing requests in extended replies
    pub fn name(self) -> &'static str {
        match self {
            Command::DumpState => "dump_state",
            Command::GetFreq => "get_freq",
            Command::SetFreq => "set_freq",
            Command::GetMode => "get_mode",
            Command::SetMode => "set_mode",
            Command::GetVfo => "get_vfo",
            Command::SetVfo => "set_vfo",
            Command::GetPtt => "get_ptt",
            Command::SetPtt => "set_ptt",
            Command::GetSplitVfo => "get_split_vfo",
            Command::SetSplitVfo => "set_split_vfo",
            Command::GetSplitFreq => "get_split_freq",
            Command::SetSplitFreq => "set_split_freq",
            Command::GetSplitMode => "get_split_mode",
            Command::SetSplitMode => "set_split_mode",
        }
    }
}

/// A recognized request: command, parameter tokens, response marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub command: Command,
    pub args: Vec<String>,
    pub marker: Option<ResponseMarker>,
}

/// Result of parsing one line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// A command in the emulated subset
    Request(Request),
    /// Valid wire form but a command this emulator does not implement
    Unimplemented {
        /// The attempted name (long-form name or the single letter)
        name: String,
        args: Vec<String>,
        marker: Option<ResponseMarker>,
    },
    /// Nothing left after marker and whitespace stripping
    ProtocolError { marker: Option<ResponseMarker> },
}
