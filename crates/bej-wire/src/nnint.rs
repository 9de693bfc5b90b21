use crate::error::WireError;
use crate::integer::unsigned_from_le;

/// Maximum number of value bytes an nnint may carry.
/// Anything wider cannot be represented in a `u64`.
const MAX_NNINT_VALUE_BYTES: usize = 8;

/// Decode an nnint from the start of the provided byte slice.
///
/// An nnint is one length byte `L` followed by `L` little-endian value
/// bytes. `L = 0` decodes to 0.
///
/// # Returns
///
/// `(decoded_value, bytes_consumed)` on success, where
/// `bytes_consumed = 1 + L`.
///
/// # Wire format examples
///
/// | Value | Encoded bytes        | Length |
/// |-------|----------------------|--------|
/// | 0     | `[0x00]`             | 1      |
/// | 0     | `[0x01, 0x00]`       | 2      |
/// | 5     | `[0x01, 0x05]`       | 2      |
/// | 256   | `[0x02, 0x00, 0x01]` | 3      |
///
/// # Errors
///
/// - [`WireError::UnexpectedEof`] if the slice is empty or ends before
///   `L` value bytes.
/// - [`WireError::NnintTooWide`] if `L` exceeds 8.
pub fn decode_nnint(buf: &[u8]) -> Result<(u64, usize), WireError> {
    let width = usize::from(*buf.first().ok_or(WireError::UnexpectedEof { offset: 0 })?);
    if width > MAX_NNINT_VALUE_BYTES {
        return Err(WireError::NnintTooWide { width });
    }
    let bytes = buf
        .get(1..1 + width)
        .ok_or(WireError::UnexpectedEof { offset: buf.len() })?;
    Ok((unsigned_from_le(bytes)?, 1 + width))
}

/// Total encoded size of the nnint at the start of `buf`, without
/// decoding its value.
///
/// # Errors
///
/// [`WireError::UnexpectedEof`] if the slice is empty.
pub fn nnint_len(buf: &[u8]) -> Result<usize, WireError> {
    let width = usize::from(*buf.first().ok_or(WireError::UnexpectedEof { offset: 0 })?);
    Ok(1 + width)
}
