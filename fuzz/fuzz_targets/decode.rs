#![no_main]

use bej_decoder::{Dictionaries, JsonDecoder};
use libfuzzer_sys::fuzz_target;

// Fuzz target: whole-block decoding against small fixed dictionaries.
//
// The decoder must return Ok or Err for any input block; it must never
// panic, loop, or index out of bounds.

// Header, three records (Root Set + Integer/String children), pool.
fn schema_dictionary() -> Vec<u8> {
    let mut data = Vec::new();
    data.push(0x00);
    data.push(0x00);
    data.extend_from_slice(&3u16.to_le_bytes());
    data.extend_from_slice(&1u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());

    // (format, seq, child_ptr, name, name_offset)
    let records: [(u8, u16, u16, &str, u16); 3] =
        [(0x00, 0, 22, "Root", 42), (0x30, 0, 0, "A", 47), (0x50, 1, 0, "B", 49)];
    for (format, seq, child_ptr, name, name_offset) in records {
        data.push(format);
        data.extend_from_slice(&seq.to_le_bytes());
        data.extend_from_slice(&child_ptr.to_le_bytes());
        data.extend_from_slice(&2u16.to_le_bytes());
        data.push(name.len() as u8);
        data.extend_from_slice(&name_offset.to_le_bytes());
    }
    for name in ["Root", "A", "B"] {
        data.extend_from_slice(name.as_bytes());
        data.push(0x00);
    }
    let size = data.len() as u32;
    data[8..12].copy_from_slice(&size.to_le_bytes());
    data
}

// Reserved root record plus one "@odata.id" string annotation.
fn annotation_dictionary() -> Vec<u8> {
    let mut data = Vec::new();
    data.push(0x00);
    data.push(0x00);
    data.extend_from_slice(&2u16.to_le_bytes());
    data.extend_from_slice(&1u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());

    let records: [(u8, u16, u16, &str, u16); 2] =
        [(0x00, 0, 22, "Annotations", 32), (0x50, 0, 0, "@odata.id", 44)];
    for (format, seq, child_ptr, name, name_offset) in records {
        data.push(format);
        data.extend_from_slice(&seq.to_le_bytes());
        data.extend_from_slice(&child_ptr.to_le_bytes());
        data.extend_from_slice(&1u16.to_le_bytes());
        data.push(name.len() as u8);
        data.extend_from_slice(&name_offset.to_le_bytes());
    }
    for name in ["Annotations", "@odata.id"] {
        data.extend_from_slice(name.as_bytes());
        data.push(0x00);
    }
    let size = data.len() as u32;
    data[8..12].copy_from_slice(&size.to_le_bytes());
    data
}

fuzz_target!(|data: &[u8]| {
    let schema = schema_dictionary();
    let annotation = annotation_dictionary();
    let dictionaries = Dictionaries {
        schema: &schema,
        annotation: &annotation,
        error: None,
    };
    let mut decoder = JsonDecoder::new();
    let _ = decoder.decode(&dictionaries, data);
});
