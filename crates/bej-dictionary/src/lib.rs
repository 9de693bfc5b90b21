#![warn(clippy::pedantic)]

//! Read-only access to compiled BEJ schema dictionaries.
//!
//! A dictionary is an immutable binary blob: a 12-byte header, a flat
//! table of fixed-size property records, and a string pool. Sequence
//! numbers are unique within a sibling scope only, so lookups always
//! start from the offset of the scope's first child record.

pub mod error;

pub use error::DictionaryError;

use bej_wire::Format;
use bej_wire::integer::unsigned_from_le;

/// Dictionary header size in bytes (packed).
pub const HEADER_SIZE: usize = 12;

/// Property record size in bytes (packed).
pub const PROPERTY_SIZE: usize = 10;

/// Offset of the first property record in any dictionary.
#[must_use]
pub const fn property_head_offset() -> usize {
    HEADER_SIZE
}

/// Offset of the first real property in an annotation dictionary.
///
/// Annotation dictionaries open with one reserved record (the implicit
/// root "Annotations" set); its children start immediately after it.
#[must_use]
pub const fn first_annotated_property_offset() -> usize {
    HEADER_SIZE + PROPERTY_SIZE
}

/// Parsed dictionary header.
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────────────┐
/// │ Offset │ Size    │ Description                      │
/// ├────────┼─────────┼──────────────────────────────────┤
/// │ 0x00   │ 1 byte  │ version tag                      │
/// │ 0x01   │ 1 byte  │ flags (bit 0 = truncated)        │
/// │ 0x02   │ 2 bytes │ entry count (u16, LE)            │
/// │ 0x04   │ 4 bytes │ schema version (u32, LE)         │
/// │ 0x08   │ 4 bytes │ dictionary size (u32, LE)        │
/// └────────┴─────────┴──────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DictionaryHeader {
    pub version_tag: u8,
    pub truncated: bool,
    pub entry_count: u16,
    pub schema_version: u32,
    pub dictionary_size: u32,
}

/// One fixed-size property record.
///
/// `child_pointer_offset` is the byte offset of this property's first
/// child record, meaningful for Set/Array/Enum/PropertyAnnotation
/// types. The name is an (offset, length) pair into the string pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyRecord {
    pub format: Format,
    pub sequence_number: u16,
    pub child_pointer_offset: u16,
    pub child_count: u16,
    pub name_length: u8,
    pub name_offset: u16,
}

/// A borrowed, read-only dictionary blob.
///
/// Construction parses and validates the header once; lookups are
/// bounds-checked slices after that. The blob may be shared read-only
/// across concurrent decodes.
#[derive(Clone, Copy, Debug)]
pub struct Dictionary<'a> {
    data: &'a [u8],
    header: DictionaryHeader,
}

impl<'a> Dictionary<'a> {
    /// Wrap a dictionary blob, parsing its header.
    ///
    /// # Errors
    ///
    /// [`DictionaryError::Truncated`] if the blob is shorter than the
    /// header.
    pub fn new(data: &'a [u8]) -> Result<Self, DictionaryError> {
        if data.len() < HEADER_SIZE {
            return Err(DictionaryError::Truncated { offset: data.len() });
        }
        let header = DictionaryHeader {
            version_tag: data[0],
            truncated: data[1] & 0x01 != 0,
            entry_count: u16::from_le_bytes([data[2], data[3]]),
            schema_version: u32::from_le_bytes([data[4], data[5], data[6], data[7]]),
            dictionary_size: u32::from_le_bytes([data[8], data[9], data[10], data[11]]),
        };
        Ok(Self { data, header })
    }

    #[must_use]
    pub fn header(&self) -> &DictionaryHeader {
        &self.header
    }

    /// Find the property with `sequence_number`, scanning forward from
    /// `start_offset`.
    ///
    /// The scan is linear over fixed-size records and stops at the end
    /// of the property table (`entry_count` records from the head).
    ///
    /// # Errors
    ///
    /// - [`DictionaryError::MisalignedOffset`] if `start_offset` is not
    ///   on the record grid.
    /// - [`DictionaryError::PropertyNotFound`] if the scan exhausts the
    ///   table.
    /// - [`DictionaryError::Truncated`] if a record in range extends
    ///   past the blob.
    pub fn find_property(
        &self,
        start_offset: usize,
        sequence_number: u32,
    ) -> Result<PropertyRecord, DictionaryError> {
        let head = property_head_offset();
        if start_offset < head || (start_offset - head) % PROPERTY_SIZE != 0 {
            return Err(DictionaryError::MisalignedOffset {
                offset: start_offset,
            });
        }
        let start_index = (start_offset - head) / PROPERTY_SIZE;

        let mut offset = start_offset;
        for _ in start_index..usize::from(self.header.entry_count) {
            let record = self.property_at(offset)?;
            if u32::from(record.sequence_number) == sequence_number {
                return Ok(record);
            }
            offset += PROPERTY_SIZE;
        }
        Err(DictionaryError::PropertyNotFound {
            sequence_number,
            start_offset,
        })
    }

    /// Resolve a record's name from the string pool.
    ///
    /// A zero-length name yields the empty string. The pool stores
    /// NUL-terminated strings and some dictionary compilers count the
    /// terminator in `name_length`, so one trailing NUL is stripped if
    /// present. The slice is length-delimited either way; the pool is
    /// never over-read.
    ///
    /// # Errors
    ///
    /// - [`DictionaryError::Truncated`] if the name range is out of
    ///   bounds.
    /// - [`DictionaryError::InvalidName`] if the bytes are not UTF-8.
    pub fn property_name(&self, record: &PropertyRecord) -> Result<&'a str, DictionaryError> {
        if record.name_length == 0 {
            return Ok("");
        }
        let offset = usize::from(record.name_offset);
        let bytes = self
            .data
            .get(offset..offset + usize::from(record.name_length))
            .ok_or(DictionaryError::Truncated {
                offset: self.data.len(),
            })?;
        let bytes = bytes.strip_suffix(&[0x00]).unwrap_or(bytes);
        std::str::from_utf8(bytes).map_err(|_| DictionaryError::InvalidName { offset })
    }

    /// Parse the property record at `offset`.
    fn property_at(&self, offset: usize) -> Result<PropertyRecord, DictionaryError> {
        let record = self
            .data
            .get(offset..offset + PROPERTY_SIZE)
            .ok_or(DictionaryError::Truncated {
                offset: self.data.len(),
            })?;
        // unsigned_from_le cannot fail on slices of width <= 8.
        let seq = unsigned_from_le(&record[1..3]).unwrap_or(0);
        let child = unsigned_from_le(&record[3..5]).unwrap_or(0);
        let count = unsigned_from_le(&record[5..7]).unwrap_or(0);
        let name_off = unsigned_from_le(&record[8..10]).unwrap_or(0);
        Ok(PropertyRecord {
            format: Format::from_raw(record[0]),
            sequence_number: seq as u16,
            child_pointer_offset: child as u16,
            child_count: count as u16,
            name_length: record[7],
            name_offset: name_off as u16,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bej_wire::PrincipalType;

    // Hand-assembled dictionary: header, three records, string pool.
    //
    //   record 0: "Root"  Set,     seq 0, children at record 1
    //   record 1: "Id"    Integer, seq 0
    //   record 2: "Name"  String,  seq 1
    fn sample_dictionary() -> Vec<u8> {
        let pool_base = HEADER_SIZE + 3 * PROPERTY_SIZE;
        let mut data = Vec::new();
        // Header.
        data.push(0x00); // version tag
        data.push(0x00); // flags
        data.extend_from_slice(&3u16.to_le_bytes()); // entry count
        data.extend_from_slice(&0xDEAD_BEEFu32.to_le_bytes()); // schema version
        data.extend_from_slice(&0u32.to_le_bytes()); // size (patched below)

        let names: [(&str, u8); 3] = [("Root", 0x00), ("Id", 0x30), ("Name", 0x50)];
        let mut name_offset = pool_base;
        let child_offsets = [HEADER_SIZE + PROPERTY_SIZE, 0, 0];
        for (i, (name, format)) in names.iter().enumerate() {
            data.push(*format);
            let seq = if i == 0 { 0u16 } else { (i - 1) as u16 };
            data.extend_from_slice(&seq.to_le_bytes());
            data.extend_from_slice(&(child_offsets[i] as u16).to_le_bytes());
            data.extend_from_slice(&0u16.to_le_bytes()); // child count
            data.push(name.len() as u8);
            data.extend_from_slice(&(name_offset as u16).to_le_bytes());
            name_offset += name.len() + 1;
        }
        for (name, _) in &names {
            data.extend_from_slice(name.as_bytes());
            data.push(0x00);
        }
        let size = data.len() as u32;
        data[8..12].copy_from_slice(&size.to_le_bytes());
        data
    }

    #[test]
    fn header_fields() {
        let blob = sample_dictionary();
        let dict = Dictionary::new(&blob).unwrap();
        assert_eq!(dict.header().entry_count, 3);
        assert_eq!(dict.header().schema_version, 0xDEAD_BEEF);
        assert!(!dict.header().truncated);
    }

    #[test]
    fn find_root_property() {
        let blob = sample_dictionary();
        let dict = Dictionary::new(&blob).unwrap();
        let root = dict.find_property(property_head_offset(), 0).unwrap();
        assert_eq!(root.format.principal_type(), PrincipalType::Set);
        assert_eq!(dict.property_name(&root).unwrap(), "Root");
        assert_eq!(
            usize::from(root.child_pointer_offset),
            HEADER_SIZE + PROPERTY_SIZE
        );
    }

    #[test]
    fn find_child_by_sequence() {
        let blob = sample_dictionary();
        let dict = Dictionary::new(&blob).unwrap();
        let children = HEADER_SIZE + PROPERTY_SIZE;
        let id = dict.find_property(children, 0).unwrap();
        assert_eq!(dict.property_name(&id).unwrap(), "Id");
        assert_eq!(id.format.principal_type(), PrincipalType::Integer);
        let name = dict.find_property(children, 1).unwrap();
        assert_eq!(dict.property_name(&name).unwrap(), "Name");
        assert_eq!(name.format.principal_type(), PrincipalType::String);
    }

    #[test]
    fn scan_starts_at_offset_not_table_head() {
        // Searching for seq 0 from record 2 must not find record 1.
        let blob = sample_dictionary();
        let dict = Dictionary::new(&blob).unwrap();
        let result = dict.find_property(HEADER_SIZE + 2 * PROPERTY_SIZE, 0);
        assert!(matches!(
            result,
            Err(DictionaryError::PropertyNotFound {
                sequence_number: 0,
                ..
            })
        ));
    }

    #[test]
    fn missing_sequence_number() {
        let blob = sample_dictionary();
        let dict = Dictionary::new(&blob).unwrap();
        let result = dict.find_property(property_head_offset(), 99);
        assert!(matches!(
            result,
            Err(DictionaryError::PropertyNotFound {
                sequence_number: 99,
                ..
            })
        ));
    }

    #[test]
    fn misaligned_offset_rejected() {
        let blob = sample_dictionary();
        let dict = Dictionary::new(&blob).unwrap();
        let result = dict.find_property(property_head_offset() + 1, 0);
        assert!(matches!(
            result,
            Err(DictionaryError::MisalignedOffset { .. })
        ));
        let result = dict.find_property(3, 0);
        assert!(matches!(
            result,
            Err(DictionaryError::MisalignedOffset { .. })
        ));
    }

    #[test]
    fn name_strips_counted_terminator() {
        // Same record but with name_length counting the NUL, as real
        // RDE dictionary compilers emit.
        let mut blob = sample_dictionary();
        let root_name_len_at = HEADER_SIZE + 7;
        blob[root_name_len_at] += 1;
        let dict = Dictionary::new(&blob).unwrap();
        let root = dict.find_property(property_head_offset(), 0).unwrap();
        assert_eq!(dict.property_name(&root).unwrap(), "Root");
    }

    #[test]
    fn zero_length_name_is_empty() {
        let mut blob = sample_dictionary();
        blob[HEADER_SIZE + 7] = 0;
        let dict = Dictionary::new(&blob).unwrap();
        let root = dict.find_property(property_head_offset(), 0).unwrap();
        assert_eq!(dict.property_name(&root).unwrap(), "");
    }

    #[test]
    fn truncated_blob_rejected() {
        let result = Dictionary::new(&[0x00; 5]);
        assert!(matches!(result, Err(DictionaryError::Truncated { .. })));
    }

    #[test]
    fn record_past_entry_count_not_scanned() {
        // entry_count limits the scan even if the blob has more bytes.
        let mut blob = sample_dictionary();
        blob[2..4].copy_from_slice(&1u16.to_le_bytes());
        let dict = Dictionary::new(&blob).unwrap();
        let result = dict.find_property(HEADER_SIZE + PROPERTY_SIZE, 0);
        assert!(matches!(
            result,
            Err(DictionaryError::PropertyNotFound { .. })
        ));
    }
}
