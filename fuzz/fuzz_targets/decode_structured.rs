#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use bej_decoder::{Dictionaries, JsonDecoder};
use libfuzzer_sys::fuzz_target;

// Fuzz target: structured input -> well-formed block -> decode.
//
// Generates a document from arbitrary structured data, encodes it as
// a valid PLDM block against a fixed dictionary, and decodes it. The
// decoder must accept everything this encoding produces.

#[derive(Debug, Arbitrary)]
enum FuzzValue {
    Integer(i64),
    Text(String),
    Boolean(bool),
    Null,
}

#[derive(Debug, Arbitrary)]
struct FuzzDocument {
    members: Vec<FuzzValue>,
}

fn nnint(value: u64) -> Vec<u8> {
    let width = (((64 - value.leading_zeros() as usize) + 7) / 8).max(1);
    let mut out = vec![width as u8];
    out.extend_from_slice(&value.to_le_bytes()[..width]);
    out
}

fn int_value(value: i64) -> Vec<u8> {
    let bytes = value.to_le_bytes();
    let mut len = 8;
    while len > 1 {
        let sign = if bytes[len - 2] & 0x80 != 0 { 0xFF } else { 0x00 };
        if bytes[len - 1] == sign {
            len -= 1;
        } else {
            break;
        }
    }
    bytes[..len].to_vec()
}

fn tuple(sequence: u64, type_nibble: u8, value: &[u8]) -> Vec<u8> {
    let mut out = nnint(sequence << 1);
    out.push(type_nibble << 4);
    out.extend_from_slice(&nnint(value.len() as u64));
    out.extend_from_slice(value);
    out
}

// Root Set with one child per scalar type: I/S/B/N at sequences 0-3.
fn schema_dictionary() -> Vec<u8> {
    let mut data = Vec::new();
    data.push(0x00);
    data.push(0x00);
    data.extend_from_slice(&5u16.to_le_bytes());
    data.extend_from_slice(&1u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());

    // (format, seq, child_ptr, child_count, name, name_offset)
    let records: [(u8, u16, u16, u16, &str, u16); 5] = [
        (0x00, 0, 22, 4, "Root", 62),
        (0x30, 0, 0, 0, "I", 67),
        (0x50, 1, 0, 0, "S", 69),
        (0x70, 2, 0, 0, "B", 71),
        (0x20, 3, 0, 0, "N", 73),
    ];
    for (format, seq, child_ptr, child_count, name, name_offset) in records {
        data.push(format);
        data.extend_from_slice(&seq.to_le_bytes());
        data.extend_from_slice(&child_ptr.to_le_bytes());
        data.extend_from_slice(&child_count.to_le_bytes());
        data.push(name.len() as u8);
        data.extend_from_slice(&name_offset.to_le_bytes());
    }
    for name in ["Root", "I", "S", "B", "N"] {
        data.extend_from_slice(name.as_bytes());
        data.push(0x00);
    }
    let size = data.len() as u32;
    data[8..12].copy_from_slice(&size.to_le_bytes());
    data
}

fn annotation_dictionary() -> Vec<u8> {
    let mut data = Vec::new();
    data.push(0x00);
    data.push(0x00);
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&1u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());

    data.push(0x00);
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(&22u16.to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());
    data.push(11);
    data.extend_from_slice(&22u16.to_le_bytes());
    data.extend_from_slice(b"Annotations");
    data.push(0x00);

    let size = data.len() as u32;
    data[8..12].copy_from_slice(&size.to_le_bytes());
    data
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(document) = FuzzDocument::arbitrary(&mut u) else {
        return;
    };

    let member_count = document.members.len().min(64);
    let members = &document.members[..member_count];

    let mut stream_value = nnint(member_count as u64);
    for member in members {
        let encoded = match member {
            FuzzValue::Integer(value) => tuple(0, 0x03, &int_value(*value)),
            FuzzValue::Text(text) => {
                let mut value = text.as_bytes().to_vec();
                value.push(0x00);
                tuple(1, 0x05, &value)
            }
            FuzzValue::Boolean(value) => tuple(2, 0x07, &[u8::from(*value)]),
            FuzzValue::Null => tuple(3, 0x02, &[]),
        };
        stream_value.extend_from_slice(&encoded);
    }
    let root = tuple(0, 0x00, &stream_value);

    let mut block = Vec::with_capacity(7 + root.len());
    block.extend_from_slice(&0xF1F0_F000u32.to_le_bytes());
    block.extend_from_slice(&[0x00, 0x00]);
    block.push(0x00);
    block.extend_from_slice(&root);

    let schema = schema_dictionary();
    let annotation = annotation_dictionary();
    let dictionaries = Dictionaries {
        schema: &schema,
        annotation: &annotation,
        error: None,
    };
    let mut decoder = JsonDecoder::new();
    let result = decoder.decode(&dictionaries, &block);
    assert!(
        result.is_ok(),
        "decoder failed on well-formed block: {:?}; output: {}",
        result.err(),
        decoder.output()
    );
    assert!(decoder.output().starts_with('{'));
    assert!(decoder.output().ends_with('}'));
});
