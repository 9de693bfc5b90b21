use crate::error::WireError;

/// BEJ versions this decoder accepts, as they appear in the PLDM block
/// header. Currently only 1.0.0 (0xF1F0F000).
pub const SUPPORTED_BEJ_VERSIONS: [u32; 1] = [0xF1F0_F000];

/// Total PLDM block header size in bytes (packed).
pub const PLDM_HEADER_SIZE: usize = 7;

/// Schema class of a PLDM block payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaClass {
    Major = 0,
    Event = 1,
    Annotation = 2,
    CollectionMemberType = 3,
    Error = 4,
}

impl SchemaClass {
    /// Map the raw header byte to a [`SchemaClass`].
    ///
    /// # Errors
    ///
    /// [`WireError::UnknownSchemaClass`] for values outside 0..=4.
    pub fn from_raw(value: u8) -> Result<Self, WireError> {
        match value {
            0 => Ok(Self::Major),
            1 => Ok(Self::Event),
            2 => Ok(Self::Annotation),
            3 => Ok(Self::CollectionMemberType),
            4 => Ok(Self::Error),
            _ => Err(WireError::UnknownSchemaClass { value }),
        }
    }
}

/// PLDM block header, the first 7 bytes of every encoded block.
///
/// ```text
/// ┌────────┬─────────┬──────────────────────────────────┐
/// │ Offset │ Size    │ Description                      │
/// ├────────┼─────────┼──────────────────────────────────┤
/// │ 0x00   │ 4 bytes │ bejVersion (u32, little-endian)  │
/// │ 0x04   │ 2 bytes │ reserved                         │
/// │ 0x06   │ 1 byte  │ schemaClass                      │
/// └────────┴─────────┴──────────────────────────────────┘
/// ```
///
/// The encoded SFLV stream follows immediately after.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PldmBlockHeader {
    pub bej_version: u32,
    pub schema_class: SchemaClass,
}

impl PldmBlockHeader {
    /// Parse a header from the first 7 bytes of the provided buffer.
    ///
    /// Validation order: length, version allowlist, schema class. The
    /// reserved u16 is not checked; encoders in the field do not zero
    /// it reliably.
    ///
    /// # Errors
    ///
    /// - [`WireError::UnexpectedEof`] if the buffer is shorter than
    ///   [`PLDM_HEADER_SIZE`].
    /// - [`WireError::UnsupportedBejVersion`] if the version is not in
    ///   [`SUPPORTED_BEJ_VERSIONS`].
    /// - [`WireError::UnknownSchemaClass`] if the class byte is
    ///   unmapped.
    pub fn read_from(buf: &[u8]) -> Result<Self, WireError> {
        if buf.len() < PLDM_HEADER_SIZE {
            return Err(WireError::UnexpectedEof { offset: buf.len() });
        }

        let bej_version = u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
        if !SUPPORTED_BEJ_VERSIONS.contains(&bej_version) {
            return Err(WireError::UnsupportedBejVersion {
                version: bej_version,
            });
        }

        let schema_class = SchemaClass::from_raw(buf[6])?;

        Ok(Self {
            bej_version,
            schema_class,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(version: u32, class: u8) -> [u8; PLDM_HEADER_SIZE] {
        let v = version.to_le_bytes();
        [v[0], v[1], v[2], v[3], 0x00, 0x00, class]
    }

    #[test]
    fn parse_major_class_header() {
        let buf = header_bytes(0xF1F0_F000, 0);
        let header = PldmBlockHeader::read_from(&buf).unwrap();
        assert_eq!(header.bej_version, 0xF1F0_F000);
        assert_eq!(header.schema_class, SchemaClass::Major);
    }

    #[test]
    fn parse_event_class_header() {
        let buf = header_bytes(0xF1F0_F000, 1);
        let header = PldmBlockHeader::read_from(&buf).unwrap();
        assert_eq!(header.schema_class, SchemaClass::Event);
    }

    #[test]
    fn reject_unsupported_version() {
        let buf = header_bytes(0xF1F0_F100, 0);
        let result = PldmBlockHeader::read_from(&buf);
        assert!(matches!(
            result,
            Err(WireError::UnsupportedBejVersion {
                version: 0xF1F0_F100
            })
        ));
    }

    #[test]
    fn reject_unknown_schema_class() {
        let buf = header_bytes(0xF1F0_F000, 9);
        let result = PldmBlockHeader::read_from(&buf);
        assert!(matches!(
            result,
            Err(WireError::UnknownSchemaClass { value: 9 })
        ));
    }

    #[test]
    fn reject_buffer_too_short() {
        let buf = [0x00; 4];
        let result = PldmBlockHeader::read_from(&buf);
        assert!(matches!(result, Err(WireError::UnexpectedEof { offset: 4 })));
    }

    #[test]
    fn reserved_bytes_are_ignored() {
        let mut buf = header_bytes(0xF1F0_F000, 0);
        buf[4] = 0xAB;
        buf[5] = 0xCD;
        assert!(PldmBlockHeader::read_from(&buf).is_ok());
    }
}
