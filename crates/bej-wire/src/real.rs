use crate::error::WireError;
use crate::integer::signed_from_le;
use crate::nnint::decode_nnint;

/// A decoded BEJ real number in its decomposed wire form.
///
/// The wire encoding keeps the textual parts of the number separate so
/// no floating-point precision is lost in transit:
///
/// ```text
/// ┌────────────┬────────────────────────────────────────────┐
/// │ nnint      │ length of whole                            │
/// │ bejInteger │ whole (carries the sign of the number)     │
/// │ nnint      │ leading-zero count for fract               │
/// │ nnint      │ fract                                      │
/// │ nnint      │ length of exp (0 = no exponent)            │
/// │ bejInteger │ exp (present only when its length is != 0) │
/// └────────────┴────────────────────────────────────────────┘
/// ```
///
/// The textual rendering is `whole.<leading_zeros zeros>fract[e<exp>]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RealValue {
    /// Integer part, including the sign of the overall number.
    pub whole: i64,
    /// Zeros between the decimal point and the first digit of `fract`.
    pub leading_zeros: u64,
    /// Fractional digits as an integer.
    pub fract: u64,
    /// Exponent, if one was encoded.
    pub exp: Option<i64>,
}

impl RealValue {
    /// Parse a real value from a tuple's value bytes.
    ///
    /// Each sub-field is variable-length, so offsets are computed
    /// sequentially as the fields are consumed.
    ///
    /// # Errors
    ///
    /// - [`WireError::UnexpectedEof`] if the value ends mid-field.
    /// - [`WireError::NnintTooWide`] / [`WireError::IntegerTooWide`]
    ///   if a sub-field claims an unrepresentable width.
    pub fn read_from(value: &[u8]) -> Result<Self, WireError> {
        let (whole_len, consumed) = decode_nnint(value)?;
        let whole_len = width(whole_len)?;
        let mut pos = consumed;

        let whole_bytes = value
            .get(pos..pos + whole_len)
            .ok_or(WireError::UnexpectedEof { offset: value.len() })?;
        let whole = signed_from_le(whole_bytes)?;
        pos += whole_len;

        let (leading_zeros, consumed) = rest(value, pos).and_then(decode_nnint)?;
        pos += consumed;

        let (fract, consumed) = rest(value, pos).and_then(decode_nnint)?;
        pos += consumed;

        let (exp_len, consumed) = rest(value, pos).and_then(decode_nnint)?;
        let exp_len = width(exp_len)?;
        pos += consumed;

        let exp = if exp_len == 0 {
            None
        } else {
            let exp_bytes = value
                .get(pos..pos + exp_len)
                .ok_or(WireError::UnexpectedEof { offset: value.len() })?;
            Some(signed_from_le(exp_bytes)?)
        };

        Ok(Self {
            whole,
            leading_zeros,
            fract,
            exp,
        })
    }
}

/// Clamp an nnint-decoded length field to a valid integer width.
fn width(len: u64) -> Result<usize, WireError> {
    if len > 8 {
        return Err(WireError::IntegerTooWide {
            width: len as usize,
        });
    }
    Ok(len as usize)
}

/// Slice the remainder of `value` starting at `pos`.
fn rest(value: &[u8], pos: usize) -> Result<&[u8], WireError> {
    value
        .get(pos..)
        .ok_or(WireError::UnexpectedEof { offset: value.len() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_real_without_exponent() {
        // 1.05 → whole=1, one leading zero, fract=5, no exponent.
        let value = [
            0x01, 0x01, // whole_len nnint = 1
            0x01, // whole = 1
            0x01, 0x01, // leading_zeros nnint = 1
            0x01, 0x05, // fract nnint = 5
            0x00, // exp_len nnint = 0
        ];
        let real = RealValue::read_from(&value).unwrap();
        assert_eq!(
            real,
            RealValue {
                whole: 1,
                leading_zeros: 1,
                fract: 5,
                exp: None,
            }
        );
    }

    #[test]
    fn negative_whole_with_exponent() {
        // -2.71e-3 → whole=-2, fract=71, exp=-3.
        let value = [
            0x01, 0x01, // whole_len nnint = 1
            0xFE, // whole = -2
            0x01, 0x00, // leading_zeros nnint = 0
            0x01, 0x47, // fract nnint = 71
            0x01, 0x01, // exp_len nnint = 1
            0xFD, // exp = -3 (1-byte signed)
        ];
        let real = RealValue::read_from(&value).unwrap();
        assert_eq!(real.whole, -2);
        assert_eq!(real.leading_zeros, 0);
        assert_eq!(real.fract, 71);
        assert_eq!(real.exp, Some(-3));
    }

    #[test]
    fn zero_width_whole() {
        let value = [
            0x00, // whole_len nnint = 0 → whole = 0, no whole bytes
            0x00, // leading_zeros nnint = 0
            0x01, 0x09, // fract nnint = 9
            0x00, // exp_len nnint = 0
        ];
        let real = RealValue::read_from(&value).unwrap();
        assert_eq!(real.whole, 0);
        assert_eq!(real.fract, 9);
        assert_eq!(real.exp, None);
    }

    #[test]
    fn truncated_mid_field() {
        // Ends after the whole part; leading_zeros nnint is missing.
        let value = [0x01, 0x01, 0x01];
        let result = RealValue::read_from(&value);
        assert!(matches!(result, Err(WireError::UnexpectedEof { .. })));
    }

    #[test]
    fn truncated_exponent_bytes() {
        let value = [
            0x01, 0x01, // whole_len nnint = 1
            0x01, // whole = 1
            0x00, // leading_zeros nnint = 0
            0x01, 0x05, // fract nnint = 5
            0x01, 0x01, // exp_len nnint = 1, but no exp byte follows
        ];
        let result = RealValue::read_from(&value);
        assert!(matches!(result, Err(WireError::UnexpectedEof { .. })));
    }
}
