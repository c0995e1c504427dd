//! DNA base utilities.
//!
//! This module provides the 2-bit base encoding and complement arithmetic
//! used by minimizer extraction.

/// Encode a DNA base as 2 bits: A=0, C=1, G=2, T=3.
///
/// Returns `None` for non-ACGT characters (including N).
#[inline]
#[must_use]
pub fn encode_base(base: u8) -> Option<u64> {
    match base.to_ascii_uppercase() {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        _ => None,
    }
}

/// Complement of a 2-bit base code: A<->T, C<->G.
#[inline]
#[must_use]
pub const fn complement_code(code: u64) -> u64 {
    3 - code
}

/// Uppercase a base without touching non-ASCII-letter bytes.
#[inline]
#[must_use]
pub const fn normalize_base(base: u8) -> u8 {
    base.to_ascii_uppercase()
}
