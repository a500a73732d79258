//! Adapter common utility functions
//!
//! Field readers take a byte slice and an offset and return `None` when the
//! field does not fit, so callers can fall back to their sentinel values.

use bytes::Buf;
use contracts::FrameError;

#[inline]
fn field(buf: &[u8], offset: usize, len: usize) -> Option<&[u8]> {
    buf.get(offset..offset.checked_add(len)?)
}

#[inline]
pub(crate) fn read_u8(buf: &[u8], offset: usize) -> Option<u8> {
    buf.get(offset).copied()
}

#[inline]
pub(crate) fn read_u16_le(buf: &[u8], offset: usize) -> Option<u16> {
    field(buf, offset, 2).map(|mut b| b.get_u16_le())
}

#[inline]
pub(crate) fn read_u32_le(buf: &[u8], offset: usize) -> Option<u32> {
    field(buf, offset, 4).map(|mut b| b.get_u32_le())
}

#[inline]
pub(crate) fn read_u64_le(buf: &[u8], offset: usize) -> Option<u64> {
    field(buf, offset, 8).map(|mut b| b.get_u64_le())
}

/// Copy `src` into the front of a fixed buffer and zero the rest.
///
/// Nothing is written when `src` does not fit.
#[inline]
pub(crate) fn copy_into_fixed(dst: &mut [u8], src: &[u8]) -> Result<(), FrameError> {
    if src.len() > dst.len() {
        return Err(FrameError::invalid_data_size(src.len(), dst.len()));
    }
    let (head, tail) = dst.split_at_mut(src.len());
    head.copy_from_slice(src);
    tail.fill(0);
    Ok(())
}
