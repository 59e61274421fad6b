//! Bitfield codec for the packed integer columns.
//!
//! Two packings live here: 64-bit archetype codes made of 16-bit id chunks
//! (chunk `i` occupies bits `[16*i, 16*i+16)`), and the pendulum `level`
//! overload where the low 16 bits are the level/rank and the two high bytes
//! carry the scale.

use crate::error::{Result, YugidbError};

/// Split a packed code into its first `width` 16-bit chunks, in slot order,
/// dropping zero chunks. Slot geometry bounds the output length, so decoding
/// can never yield an over-length list.
pub fn split_chunks(value: u64, width: usize) -> Vec<u16> {
    (0..width)
        .map(|i| ((value >> (16 * i)) & 0xFFFF) as u16)
        .filter(|&chunk| chunk != 0)
        .collect()
}

/// Pack up to `width` 16-bit ids into a single code, zero-padding the tail.
///
/// More entries than the slot allows is a caller error and is rejected at
/// encode time.
pub fn pack_chunks(values: &[u16], width: usize) -> Result<u64> {
    if values.len() > width {
        return Err(YugidbError::InvalidArgument(format!(
            "cannot pack {} ids into a {}-chunk slot",
            values.len(),
            width
        )));
    }
    Ok(values
        .iter()
        .enumerate()
        .fold(0u64, |acc, (i, &v)| acc | (u64::from(v) << (16 * i))))
}

/// Unpack a pendulum `level` field into `(lscale, rscale, level)`.
pub fn parse_pendulum(raw: i64) -> (u8, u8, u16) {
    let lscale = ((raw >> 24) & 0xFF) as u8;
    let rscale = ((raw >> 16) & 0xFF) as u8;
    let level = (raw & 0xFFFF) as u16;
    (lscale, rscale, level)
}

/// Pack a pendulum `level` field. The scale is written to both high-byte
/// positions; the asymmetric left/right convention exists in older data but
/// the symmetric one is what current databases carry.
pub fn compose_pendulum(scale: u8, level: u16) -> i64 {
    (i64::from(scale) << 24) | (i64::from(scale) << 16) | i64::from(level)
}
