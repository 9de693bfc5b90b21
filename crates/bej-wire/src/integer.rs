use crate::error::WireError;

/// Reconstruct an unsigned integer from up to 8 little-endian bytes.
///
/// An empty slice yields 0.
///
/// # Errors
///
/// [`WireError::IntegerTooWide`] if the slice is longer than 8 bytes.
pub fn unsigned_from_le(bytes: &[u8]) -> Result<u64, WireError> {
    if bytes.len() > 8 {
        return Err(WireError::IntegerTooWide { width: bytes.len() });
    }
    let mut value: u64 = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        value |= u64::from(byte) << (i * 8);
    }
    Ok(value)
}

/// Reconstruct a two's-complement signed integer from up to 8
/// little-endian bytes.
///
/// Sign extension is done by XOR/subtract against the sign-bit mask
/// `1 << (8n - 1)`, which reproduces two's-complement semantics exactly
/// for widths 1–8. An empty slice yields 0.
///
/// # Errors
///
/// [`WireError::IntegerTooWide`] if the slice is longer than 8 bytes.
pub fn signed_from_le(bytes: &[u8]) -> Result<i64, WireError> {
    if bytes.is_empty() {
        return Ok(0);
    }
    let value = unsigned_from_le(bytes)?;
    let mask = 1u64 << (bytes.len() * 8 - 1);
    // Wrapping subtraction keeps the 8-byte case exact: the mask equals
    // the sign bit of the u64 itself.
    Ok((value ^ mask).wrapping_sub(mask) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsigned_empty_is_zero() {
        assert_eq!(unsigned_from_le(&[]).unwrap(), 0);
    }

    #[test]
    fn unsigned_little_endian_order() {
        assert_eq!(unsigned_from_le(&[0x34, 0x12]).unwrap(), 0x1234);
    }

    #[test]
    fn unsigned_full_width() {
        assert_eq!(
            unsigned_from_le(&[0xFF; 8]).unwrap(),
            u64::MAX
        );
    }

    #[test]
    fn unsigned_too_wide() {
        let result = unsigned_from_le(&[0x00; 9]);
        assert!(matches!(result, Err(WireError::IntegerTooWide { width: 9 })));
    }

    #[test]
    fn signed_empty_is_zero() {
        assert_eq!(signed_from_le(&[]).unwrap(), 0);
    }

    #[test]
    fn signed_one_byte_negative_one() {
        assert_eq!(signed_from_le(&[0xFF]).unwrap(), -1);
    }

    #[test]
    fn signed_one_byte_boundaries() {
        assert_eq!(signed_from_le(&[0x80]).unwrap(), -128);
        assert_eq!(signed_from_le(&[0x7F]).unwrap(), 127);
    }

    #[test]
    fn signed_two_byte_negative() {
        // -2 as 16-bit two's complement, little-endian.
        assert_eq!(signed_from_le(&[0xFE, 0xFF]).unwrap(), -2);
    }

    #[test]
    fn signed_positive_value_with_clear_sign_bit() {
        assert_eq!(signed_from_le(&[0x39, 0x30]).unwrap(), 12345);
    }

    #[test]
    fn signed_full_width_roundtrip() {
        for value in [i64::MIN, -1, 0, 1, i64::MAX] {
            let bytes = value.to_le_bytes();
            assert_eq!(signed_from_le(&bytes).unwrap(), value);
        }
    }

    #[test]
    fn signed_too_wide() {
        let result = signed_from_le(&[0x00; 9]);
        assert!(matches!(result, Err(WireError::IntegerTooWide { width: 9 })));
    }
}
