//! Command dispatch
//!
//! Maps each parsed [`Command`] to its handler. Handlers parse their
//! parameter tokens first and only then touch [`RadioState`], so a
//! parameter error (wire status -1) never leaves the radio half
//! mutated. Every handler produces exactly one reply body.

use std::time::Duration;

use rigmock_protocol::{args, Command, ReplyBody, StatusCode, DUMP_STATE};

use crate::radio::RadioState;

/// How long the fake radio stays keyed after a PTT release before the
/// TX-release hook runs, approximating a real rig's switchover time
/// back to receive.
pub const TX_RELEASE_DELAY: Duration = Duration::from_millis(25);

/// Side effect a handler asks the session to perform after the reply
/// has been written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideEffect {
    /// PTT dropped from transmit to receive: wait [`TX_RELEASE_DELAY`],
    /// then fire the [`TxReleaseHook`] once
    TxRelease,
}

/// Hook invoked when the radio drops from transmit back to receive.
///
/// The server binary signals the controlling process here; tests count
/// invocations.
pub trait TxReleaseHook {
    fn on_tx_release(&self);
}

/// Hook that does nothing
pub struct NoopRelease;

impl TxReleaseHook for NoopRelease {
    fn on_tx_release(&self) {}
}

/// Reply body plus an optional deferred side effect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub body: ReplyBody,
    pub effect: Option<SideEffect>,
}

impl Outcome {
    fn reply(body: ReplyBody) -> Self {
        Self { body, effect: None }
    }

    fn ok() -> Self {
        Self::reply(ReplyBody::Status(StatusCode::Ok))
    }

    fn invalid_param() -> Self {
        Self::reply(ReplyBody::Status(StatusCode::InvalidParam))
    }
}

/// Execute `command` against the shared radio
pub fn dispatch(command: Command, args: &[String], radio: &mut RadioState) -> Outcome {
    match command {
        Command::DumpState => Outcome::reply(ReplyBody::Verbatim(DUMP_STATE)),
        Command::GetFreq => get_fields(vec![("Frequency", radio.frequency_hz.to_string())]),
        Command::SetFreq => set_freq(args, radio),
        Command::GetMode => get_fields(vec![
            ("Mode", radio.mode.clone()),
            ("Passband", radio.passband_hz.to_string()),
        ]),
        Command::SetMode => set_mode(args, radio),
        Command::GetVfo => get_fields(vec![("VFO", radio.vfo.clone())]),
        Command::SetVfo => set_vfo(args, radio),
        Command::GetPtt => get_fields(vec![("PTT", ptt_token(radio.ptt))]),
        Command::SetPtt => set_ptt(args, radio),
        Command::GetSplitVfo => get_fields(vec![
            ("SPLIT", radio.split_enabled.clone()),
            ("TXVFO", radio.tx_vfo.clone()),
        ]),
        Command::SetSplitVfo => set_split_vfo(args, radio),
        Command::GetSplitFreq => {
            get_fields(vec![("TX Frequency", radio.tx_frequency_hz.to_string())])
        }
        Command::SetSplitFreq => set_split_freq(args, radio),
        Command::GetSplitMode => get_fields(vec![
            ("TX Mode", radio.tx_mode.clone()),
            ("TX Passband", radio.tx_passband_hz.to_string()),
        ]),
        Command::SetSplitMode => set_split_mode(args, radio),
    }
}

fn get_fields(fields: Vec<(&'static str, String)>) -> Outcome {
    Outcome::reply(ReplyBody::Fields {
        fields,
        status: StatusCode::Ok,
    })
}

fn ptt_token(ptt: bool) -> String {
    if ptt { "1" } else { "0" }.to_string()
}

fn set_freq(args: &[String], radio: &mut RadioState) -> Outcome {
    match args::one(args).and_then(args::freq_hz) {
        Ok(hz) => {
            radio.frequency_hz = hz;
            Outcome::ok()
        }
        Err(_) => Outcome::invalid_param(),
    }
}

fn set_mode(args: &[String], radio: &mut RadioState) -> Outcome {
    let parsed = args::two(args).and_then(|(mode, pb)| Ok((mode, args::passband_hz(pb)?)));
    match parsed {
        Ok((mode, passband_hz)) => {
            radio.mode = mode.to_string();
            radio.passband_hz = passband_hz;
            Outcome::ok()
        }
        Err(_) => Outcome::invalid_param(),
    }
}

fn set_vfo(args: &[String], radio: &mut RadioState) -> Outcome {
    match args::one(args) {
        Ok(vfo) => {
            radio.vfo = vfo.to_ascii_uppercase();
            Outcome::ok()
        }
        Err(_) => Outcome::invalid_param(),
    }
}

fn set_ptt(args: &[String], radio: &mut RadioState) -> Outcome {
    let tx = match args::one(args).and_then(args::ptt_flag) {
        Ok(tx) => tx,
        Err(_) => return Outcome::invalid_param(),
    };
    // The hook fires on the transmit->receive edge only
    let effect = (radio.ptt && !tx).then_some(SideEffect::TxRelease);
    radio.ptt = tx;
    Outcome {
        body: ReplyBody::Status(StatusCode::Ok),
        effect,
    }
}

fn set_split_vfo(args: &[String], radio: &mut RadioState) -> Outcome {
    match args::two(args) {
        Ok((split_enabled, tx_vfo)) => {
            radio.split_enabled = split_enabled.to_string();
            radio.tx_vfo = tx_vfo.to_string();
            Outcome::ok()
        }
        Err(_) => Outcome::invalid_param(),
    }
}

fn set_split_freq(args: &[String], radio: &mut RadioState) -> Outcome {
    match args::one(args).and_then(args::freq_hz) {
        Ok(hz) => {
            radio.tx_frequency_hz = hz;
            Outcome::ok()
        }
        Err(_) => Outcome::invalid_param(),
    }
}

fn set_split_mode(args: &[String], radio: &mut RadioState) -> Outcome {
    let parsed = args::two(args).and_then(|(mode, pb)| Ok((mode, args::passband_hz(pb)?)));
    match parsed {
        Ok((mode, passband_hz)) => {
            radio.tx_mode = mode.to_string();
            radio.tx_passband_hz = passband_hz;
            Outcome::ok()
        }
        Err(_) => Outcome::invalid_param(),
    }
}
