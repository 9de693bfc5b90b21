use crate::error::WireError;
use crate::nnint::{decode_nnint, nnint_len};

/// Which dictionary a tuple's sequence number resolves against.
///
/// Encoded as the low bit of the tuple's S field: 0 selects the main
/// schema dictionary, 1 the annotation dictionary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DictionarySelector {
    Schema,
    Annotation,
}

/// BEJ principal data types, the low nibble of the format byte's
/// high half.
///
/// Values 11–13 are reserved by the format; the decoder treats them
/// like the other unsupported types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrincipalType {
    Set = 0,
    Array = 1,
    Null = 2,
    Integer = 3,
    Enum = 4,
    String = 5,
    Real = 6,
    Boolean = 7,
    Bytestring = 8,
    Choice = 9,
    PropertyAnnotation = 10,
    Reserved11 = 11,
    Reserved12 = 12,
    Reserved13 = 13,
    ResourceLink = 14,
    ResourceLinkExpansion = 15,
}

impl PrincipalType {
    /// Map a 4-bit nibble to a [`PrincipalType`]. Total over 0..=15.
    pub fn from_nibble(nibble: u8) -> Self {
        match nibble & 0x0F {
            0 => Self::Set,
            1 => Self::Array,
            2 => Self::Null,
            3 => Self::Integer,
            4 => Self::Enum,
            5 => Self::String,
            6 => Self::Real,
            7 => Self::Boolean,
            8 => Self::Bytestring,
            9 => Self::Choice,
            10 => Self::PropertyAnnotation,
            11 => Self::Reserved11,
            12 => Self::Reserved12,
            13 => Self::Reserved13,
            14 => Self::ResourceLink,
            _ => Self::ResourceLinkExpansion,
        }
    }
}

/// The tuple format byte.
///
/// Bit layout:
///   bit 0    = deferred binding
///   bit 1    = read-only property
///   bit 2    = nullable property
///   bit 3    = reserved
///   bits 4-7 = principal data type
///
/// The decoder acts only on the principal type; the flag bits are
/// exposed because they are part of the wire byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Format(u8);

impl Format {
    const DEFERRED_BINDING: u8 = 0b0000_0001;
    const READ_ONLY: u8 = 0b0000_0010;
    const NULLABLE: u8 = 0b0000_0100;

    pub fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u8 {
        self.0
    }

    pub fn deferred_binding(self) -> bool {
        self.0 & Self::DEFERRED_BINDING != 0
    }

    pub fn read_only(self) -> bool {
        self.0 & Self::READ_ONLY != 0
    }

    pub fn nullable(self) -> bool {
        self.0 & Self::NULLABLE != 0
    }

    pub fn principal_type(self) -> PrincipalType {
        PrincipalType::from_nibble(self.0 >> 4)
    }
}

/// One decoded SFLV tuple envelope.
///
/// ```text
/// ┌──────────────────────────────────────────────────────────┐
/// │ S: nnint   schema selector (bit 0) + sequence number     │
/// │ F: uint8   format byte (principal type + flags)          │
/// │ L: nnint   value length in bytes                         │
/// │ V: bytes   [value_length bytes]                          │
/// └──────────────────────────────────────────────────────────┘
/// ```
///
/// Offsets are absolute within the encoded stream the tuple was read
/// from. `value_end_offset` is where the next sibling tuple starts,
/// and is the closing boundary recorded when a Set/Array/Annotation
/// section is entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SflvTuple {
    /// Dictionary selected by the S field's low bit.
    pub selector: DictionarySelector,
    /// Sequence number (S field shifted right past the selector bit).
    pub sequence_number: u32,
    /// The format byte.
    pub format: Format,
    /// Length of the value portion in bytes.
    pub value_length: usize,
    /// Absolute offset of the first value byte.
    pub value_offset: usize,
    /// Absolute offset one past the last value byte.
    pub value_end_offset: usize,
}

impl SflvTuple {
    /// Read the tuple starting at `offset` within `stream`.
    ///
    /// The field offsets derive from two self-describing lengths: the
    /// first byte is the sequence-number width `S`, so the format byte
    /// sits at `1 + S` and the value-length nnint at `2 + S`; the
    /// value begins immediately after that nnint. This arithmetic must
    /// be exact; an off-by-one desynchronizes every following tuple.
    ///
    /// # Errors
    ///
    /// - [`WireError::UnexpectedEof`] if any field, or the value range
    ///   itself, extends past the end of the stream.
    /// - [`WireError::NnintTooWide`] if the S or L nnint claims more
    ///   than 8 value bytes.
    pub fn read_at(stream: &[u8], offset: usize) -> Result<Self, WireError> {
        let segment = stream
            .get(offset..)
            .ok_or(WireError::UnexpectedEof { offset })?;

        let (tuple_s, s_len) = decode_nnint(segment)?;
        let selector = if tuple_s & 0x01 == 0 {
            DictionarySelector::Schema
        } else {
            DictionarySelector::Annotation
        };
        let sequence_number = (tuple_s >> 1) as u32;

        let format = Format::from_raw(
            *segment
                .get(s_len)
                .ok_or(WireError::UnexpectedEof { offset: stream.len() })?,
        );

        let length_field = segment
            .get(s_len + 1..)
            .ok_or(WireError::UnexpectedEof { offset: stream.len() })?;
        let (value_length, l_len) = decode_nnint(length_field)?;
        let value_length = value_length as usize;

        let value_offset = offset + s_len + 1 + l_len;
        let value_end_offset = value_offset
            .checked_add(value_length)
            .ok_or(WireError::UnexpectedEof { offset: stream.len() })?;
        if value_end_offset > stream.len() {
            return Err(WireError::UnexpectedEof { offset: stream.len() });
        }

        Ok(Self {
            selector,
            sequence_number,
            format,
            value_length,
            value_offset,
            value_end_offset,
        })
    }

    /// Offset of the first nested tuple inside a Set/Array/Annotation
    /// value, skipping the leading cardinality nnint.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if the value is empty.
    pub fn first_nested_tuple_offset(&self, stream: &[u8]) -> Result<usize, WireError> {
        let value = self.value(stream);
        Ok(self.value_offset + nnint_len(value)?)
    }

    /// The tuple's value bytes.
    ///
    /// The range was bounds-checked by [`read_at`](Self::read_at), so
    /// plain indexing cannot go out of bounds for the same stream.
    pub fn value<'a>(&self, stream: &'a [u8]) -> &'a [u8] {
        &stream[self.value_offset..self.value_end_offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // S = nnint(seq << 1 | selector), F = format byte, L = nnint(len).
    fn tuple_bytes(selector: u8, seq: u8, format: u8, value: &[u8]) -> Vec<u8> {
        let mut out = vec![0x01, (seq << 1) | selector, format];
        out.push(0x01);
        out.push(u8::try_from(value.len()).unwrap());
        out.extend_from_slice(value);
        out
    }

    #[test]
    fn read_simple_integer_tuple() {
        // seq=3, schema dictionary, Integer (type 3 in the high nibble).
        let stream = tuple_bytes(0, 3, 0x30, &[0x05]);
        let tuple = SflvTuple::read_at(&stream, 0).unwrap();
        assert_eq!(tuple.selector, DictionarySelector::Schema);
        assert_eq!(tuple.sequence_number, 3);
        assert_eq!(tuple.format.principal_type(), PrincipalType::Integer);
        assert_eq!(tuple.value_length, 1);
        assert_eq!(tuple.value_offset, 5);
        assert_eq!(tuple.value_end_offset, 6);
        assert_eq!(tuple.value(&stream), &[0x05]);
    }

    #[test]
    fn annotation_selector_bit() {
        let stream = tuple_bytes(1, 2, 0x50, b"x\0");
        let tuple = SflvTuple::read_at(&stream, 0).unwrap();
        assert_eq!(tuple.selector, DictionarySelector::Annotation);
        assert_eq!(tuple.sequence_number, 2);
        assert_eq!(tuple.format.principal_type(), PrincipalType::String);
    }

    #[test]
    fn read_at_nonzero_offset() {
        let mut stream = vec![0xAA, 0xBB, 0xCC];
        stream.extend(tuple_bytes(0, 0, 0x20, &[]));
        let tuple = SflvTuple::read_at(&stream, 3).unwrap();
        assert_eq!(tuple.format.principal_type(), PrincipalType::Null);
        assert_eq!(tuple.value_offset, 8);
        assert_eq!(tuple.value_end_offset, 8);
    }

    #[test]
    fn format_flag_bits() {
        let format = Format::from_raw(0x37);
        assert!(format.deferred_binding());
        assert!(format.read_only());
        assert!(format.nullable());
        assert_eq!(format.principal_type(), PrincipalType::Integer);

        let bare = Format::from_raw(0x30);
        assert!(!bare.deferred_binding());
        assert!(!bare.read_only());
        assert!(!bare.nullable());
    }

    #[test]
    fn principal_type_nibble_is_total() {
        for nibble in 0u8..=15 {
            let parsed = PrincipalType::from_nibble(nibble);
            assert_eq!(parsed as u8, nibble);
        }
    }

    #[test]
    fn first_nested_tuple_skips_cardinality() {
        // Set with count nnint [0x01, 0x02] followed by two bytes of
        // (unread) member data.
        let stream = tuple_bytes(0, 0, 0x00, &[0x01, 0x02, 0xEE, 0xEE]);
        let tuple = SflvTuple::read_at(&stream, 0).unwrap();
        assert_eq!(
            tuple.first_nested_tuple_offset(&stream).unwrap(),
            tuple.value_offset + 2
        );
    }

    #[test]
    fn value_length_past_stream_end() {
        // L claims 4 value bytes but only 1 is present.
        let stream = [0x01, 0x00, 0x30, 0x01, 0x04, 0x05];
        let result = SflvTuple::read_at(&stream, 0);
        assert!(matches!(result, Err(WireError::UnexpectedEof { .. })));
    }

    #[test]
    fn truncated_before_format_byte() {
        let stream = [0x01, 0x00];
        let result = SflvTuple::read_at(&stream, 0);
        assert!(matches!(result, Err(WireError::UnexpectedEof { .. })));
    }

    #[test]
    fn offset_past_stream_end() {
        let result = SflvTuple::read_at(&[0x00], 5);
        assert!(matches!(result, Err(WireError::UnexpectedEof { offset: 5 })));
    }

    #[test]
    fn multibyte_sequence_number() {
        // S nnint = 2 bytes: (300 << 1) | 1 = 601 = 0x0259.
        let mut stream = vec![0x02, 0x59, 0x02, 0x20, 0x00];
        stream.push(0x00);
        let tuple = SflvTuple::read_at(&stream, 0).unwrap();
        assert_eq!(tuple.selector, DictionarySelector::Annotation);
        assert_eq!(tuple.sequence_number, 300);
    }
}
