#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    /// The blob is too short for its header, a property record, or a
    /// name slice.
    #[error("dictionary truncated: read past offset {offset}")]
    Truncated { offset: usize },

    /// A property-table offset is not `head + k * record_size`.
    ///
    /// Property records are contiguous and fixed-size; any offset off
    /// that grid points into the middle of a record and means the
    /// dictionary or the child pointer that produced it is corrupt.
    #[error("misaligned property offset {offset}")]
    MisalignedOffset { offset: usize },

    /// No record with the requested sequence number between the start
    /// offset and the end of the property table.
    #[error("property with sequence number {sequence_number} not found from offset {start_offset}")]
    PropertyNotFound {
        sequence_number: u32,
        start_offset: usize,
    },

    /// A property name in the string pool is not valid UTF-8.
    #[error("property name at offset {offset} is not valid UTF-8")]
    InvalidName { offset: usize },
}
