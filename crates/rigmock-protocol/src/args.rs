//! Typed parameter extraction
//!
//! Handlers share these helpers so every command reports parameter
//! problems the same way (wire status -1) and never half-applies a
//! command whose later parameters fail to parse.

use thiserror::Error;

/// Errors raised while interpreting request parameters
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArgError {
    /// Wrong number of parameter tokens
    #[error("expected {expected} argument(s), got {got}")]
    Arity { expected: usize, got: usize },

    /// Token is not a usable number
    #[error("invalid numeric value: {0}")]
    InvalidNumber(String),
}

/// Exactly one token
pub fn one(args: &[String]) -> Result<&str, ArgError> {
    match args {
        [a] => Ok(a),
        _ => Err(ArgError::Arity {
            expected: 1,
            got: args.len(),
        }),
    }
}

/// Exactly two tokens
pub fn two(args: &[String]) -> Result<(&str, &str), ArgError> {
    match args {
        [a, b] => Ok((a, b)),
        _ => Err(ArgError::Arity {
            expected: 2,
            got: args.len(),
        }),
    }
}

/// A frequency in Hz: parsed as a float, rounded to the nearest integer.
///
/// Clients habitually send values like `14074000.0`; rigctld stores
/// integer Hz. Negative and non-finite values are rejected.
pub fn freq_hz(token: &str) -> Result<u64, ArgError> {
    rounded(token)
}

/// A passband width in Hz, same float-then-round convention
pub fn passband_hz(token: &str) -> Result<u32, ArgError> {
    let hz = rounded(token)?;
    u32::try_from(hz).map_err(|_| ArgError::InvalidNumber(token.to_string()))
}

/// A PTT flag: any integer, nonzero means transmit
pub fn ptt_flag(token: &str) -> Result<bool, ArgError> {
    token
        .parse::<i64>()
        .map(|v| v != 0)
        .map_err(|_| ArgError::InvalidNumber(token.to_string()))
}

fn rounded(token: &str) -> Result<u64, ArgError> {
    let value: f64 = token
        .parse()
        .map_err(|_| ArgError::InvalidNumber(token.to_string()))?;
    if !value.is_finite() || value < 0.0 {
        return Err(ArgError::InvalidNumber(token.to_string()));
    }
    Ok(value.round() as u64)
}
