//! String-Concatenation Strategies
//!
//! The three concatenation kernels the harness times against each other.
//! Every kernel produces `LEFT` followed by `RIGHT` in a caller-provided
//! scratch buffer sized to the combined length, so repeated runs measure
//! the concatenation itself and not allocator traffic.

use std::fmt::Write as _;

/// Left-hand input of every concatenation.
pub const LEFT: &str = "Hello World!";

/// Right-hand input of every concatenation.
pub const RIGHT: &str = "The winter will come.";

/// The exact result every strategy must produce.
pub const EXPECTED: &str = "Hello World!The winter will come.";

/// Combined length of the two inputs.
pub const SCRATCH_LEN: usize = LEFT.len() + RIGHT.len();

/// Formatted-write concatenation.
pub fn concat_formatted(buf: &mut String) {
    buf.clear();
    // fmt::Write on String cannot fail
    let _ = write!(buf, "{}{}", LEFT, RIGHT);
}

/// Copy-then-append concatenation.
pub fn concat_copy_append(buf: &mut String) {
    buf.clear();
    buf.push_str(LEFT);
    buf.push_str(RIGHT);
}

/// Manual byte loop into a fixed-size buffer.
pub fn concat_manual(buf: &mut [u8; SCRATCH_LEN]) {
    let mut cursor = 0;
    for &byte in LEFT.as_bytes() {
        buf[cursor] = byte;
        cursor += 1;
    }
    for &byte in RIGHT.as_bytes() {
        buf[cursor] = byte;
        cursor += 1;
    }
}
