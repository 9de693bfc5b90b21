use bej_dictionary::DictionaryError;
use bej_wire::{PrincipalType, SchemaClass, WireError};

/// Errors that can abort a BEJ decode.
///
/// All of these are hard local failures: none are retried, and each
/// propagates immediately to the caller. Output accumulated in the
/// sink before the failure remains accessible but is potentially
/// partial, non-parseable text.
///
/// Error hierarchy:
///
/// ```text
///   DecodeError
///   ├── TruncatedBlock           ← block shorter than the PLDM header
///   ├── UnsupportedSchemaClass   ← Annotation/CollectionMemberType/Error class
///   ├── UnexpectedSectionEnd     ← value closed outside any open section
///   ├── UnterminatedSection      ← sections still open at stream end
///   ├── UnsupportedType          ← Bytestring/Choice/… under the Fail policy
///   ├── InvalidStringValue       ← string value is not UTF-8
///   ├── Dictionary(…)            ← from bej-dictionary lookups
///   └── Wire(…)                  ← from bej-wire field parsing
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The block is shorter than the fixed 7-byte PLDM header.
    #[error("PLDM block too short: {length} bytes")]
    TruncatedBlock { length: usize },

    /// The block's schema class cannot be decoded.
    ///
    /// Annotation, CollectionMemberType, and Error class payloads are
    /// rejected before any stream byte is read.
    #[error("unsupported schema class {class:?}")]
    UnsupportedSchemaClass { class: SchemaClass },

    /// A value ended at stream offset `offset` while no section was
    /// open and the value was not the designated top-level terminator.
    #[error("value at offset {offset} ends outside any open section")]
    UnexpectedSectionEnd { offset: usize },

    /// The stream was fully consumed with sections still open.
    #[error("stream ended with {open_sections} unterminated section(s)")]
    UnterminatedSection { open_sections: usize },

    /// An unsupported principal type was encountered under
    /// [`UnsupportedTypePolicy::Fail`](crate::UnsupportedTypePolicy).
    #[error("unsupported principal type {principal_type:?} at offset {offset}")]
    UnsupportedType {
        principal_type: PrincipalType,
        offset: usize,
    },

    /// A string value's bytes are not valid UTF-8.
    #[error("string value at offset {offset} is not valid UTF-8")]
    InvalidStringValue { offset: usize },

    /// A dictionary lookup failure (not found, misaligned offset,
    /// truncated blob, bad name).
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    /// A wire-level parsing failure (truncated tuple, oversized nnint,
    /// bad header field).
    #[error(transparent)]
    Wire(#[from] WireError),
}
