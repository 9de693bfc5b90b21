#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Input ended before a complete nnint, tuple field, or header
    /// could be read.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    /// An nnint length byte claimed more than 8 value bytes; the
    /// decoded value would not fit a u64.
    #[error("nnint too wide: length byte claims {width} bytes, limit is 8")]
    NnintTooWide { width: usize },

    /// An integer field is wider than 8 bytes.
    #[error("integer too wide: {width} bytes, limit is 8")]
    IntegerTooWide { width: usize },

    /// The PLDM block's BEJ version is not in the supported allowlist.
    #[error("unsupported BEJ version {version:#010X}")]
    UnsupportedBejVersion { version: u32 },

    /// The schema class byte maps to no known class.
    #[error("unknown schema class {value:#04X}")]
    UnknownSchemaClass { value: u8 },
}
