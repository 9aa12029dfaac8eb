//! 20-bit two's-complement sample codec
//!
//! The ADS1230 shifts out each conversion MSB first as a 20-bit
//! two's-complement value. There is no 20-bit primitive, so samples are
//! accumulated in a `u32` and sign-extended into an `i32`.

/// Mask covering the 20 data bits
pub const SAMPLE_MASK: u32 = 0xF_FFFF;

/// Sign bit of a 20-bit sample (bit 19)
pub const SIGN_BIT: u32 = 0x8_0000;

/// Smallest value a conversion can produce (full-scale negative)
pub const SAMPLE_MIN: i32 = -0x8_0000;

/// Largest value a conversion can produce (full-scale positive)
pub const SAMPLE_MAX: i32 = 0x7_FFFF;

/// Decode a raw 20-bit pattern into a signed value
///
/// Bits above bit 19 are ignored. With bit 19 set the pattern is negative:
/// `-((raw ^ 0xFFFFF) + 1)`.
#[must_use]
pub const fn decode(raw: u32) -> i32 {
    let raw = raw & SAMPLE_MASK;
    if raw & SIGN_BIT != 0 {
        // At most 0x80000, fits in i32
        -(((raw ^ SAMPLE_MASK) + 1) as i32)
    } else {
        raw as i32
    }
}

/// Encode a signed value as the 20-bit pattern the chip would shift out
///
/// Values outside [`SAMPLE_MIN`]..=[`SAMPLE_MAX`] wrap.
#[must_use]
pub const fn encode(value: i32) -> u32 {
    (value as u32) & SAMPLE_MASK
}
