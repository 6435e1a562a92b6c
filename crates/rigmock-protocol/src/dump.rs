//! Static `dump_state` capability block
//!
//! rigctl clients issue `\dump_state` once after connecting and parse
//! this block to learn the rig's capabilities. The emulator serves a
//! fixed block describing a generic 150 kHz - 30 MHz transceiver; the
//! text is sent verbatim, with no `RPRT` trailer and no extended-format
//! echo, exactly as real clients expect.

/// Reply payload for `dump_state`
pub const DUMP_STATE: &str = " 0
2
2
150000.000000 30000000.000000  0x900af -1 -1 0x10 000003 0x3
0 0 0 0 0 0 0
150000.000000 30000000.000000  0x900af -1 -1 0x10 000003 0x3
0 0 0 0 0 0 0
0 0
0 0
0
0
0
0


0x0
0x0
0x0
0x0
0x0
0
";
