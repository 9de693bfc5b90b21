//! Encoded-stream fixture builder: nnints, SFLV tuples, section
//! values, and whole PLDM blocks.

use bej_wire::PrincipalType;

/// Selector bit for the main schema dictionary.
pub const SCHEMA: u8 = 0;

/// Selector bit for the annotation dictionary.
pub const ANNOTATION: u8 = 1;

/// Encode a value as a minimal-width nnint.
#[must_use]
pub fn nnint(value: u64) -> Vec<u8> {
    let width = ((64 - value.leading_zeros() as usize) + 7) / 8;
    let width = width.max(1);
    let mut out = vec![width as u8];
    out.extend_from_slice(&value.to_le_bytes()[..width]);
    out
}

/// Encode a signed integer as its minimal two's-complement
/// little-endian byte run.
#[must_use]
pub fn int_value(value: i64) -> Vec<u8> {
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

/// Encode one SFLV tuple.
#[must_use]
pub fn tuple(selector: u8, sequence: u64, principal_type: PrincipalType, value: &[u8]) -> Vec<u8> {
    let mut out = nnint((sequence << 1) | u64::from(selector));
    out.push((principal_type as u8) << 4);
    out.extend_from_slice(&nnint(value.len() as u64));
    out.extend_from_slice(value);
    out
}

/// Build a Set/Array value: the member-count nnint followed by the
/// member tuples.
#[must_use]
pub fn section(members: &[Vec<u8>]) -> Vec<u8> {
    let mut out = nnint(members.len() as u64);
    for member in members {
        out.extend_from_slice(member);
    }
    out
}

/// A string value: the text plus its wire NUL terminator.
#[must_use]
pub fn string_value(text: &str) -> Vec<u8> {
    let mut out = text.as_bytes().to_vec();
    out.push(0x00);
    out
}

/// A boolean value byte.
#[must_use]
pub fn bool_value(value: bool) -> Vec<u8> {
    vec![u8::from(value)]
}

/// An enum value: the literal's sequence number as an nnint.
#[must_use]
pub fn enum_value(literal_sequence: u64) -> Vec<u8> {
    nnint(literal_sequence)
}

/// A decomposed real value.
#[must_use]
pub fn real_value(whole: i64, leading_zeros: u64, fract: u64, exp: Option<i64>) -> Vec<u8> {
    let whole_bytes = int_value(whole);
    let mut out = nnint(whole_bytes.len() as u64);
    out.extend_from_slice(&whole_bytes);
    out.extend_from_slice(&nnint(leading_zeros));
    out.extend_from_slice(&nnint(fract));
    match exp {
        Some(exp) => {
            let exp_bytes = int_value(exp);
            out.extend_from_slice(&nnint(exp_bytes.len() as u64));
            out.extend_from_slice(&exp_bytes);
        }
        None => out.extend_from_slice(&nnint(0)),
    }
    out
}

/// Wrap an encoded stream in a PLDM block header.
#[must_use]
pub fn pldm_block(schema_class: u8, stream: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(7 + stream.len());
    out.extend_from_slice(&0xF1F0_F000u32.to_le_bytes());
    out.extend_from_slice(&[0x00, 0x00]); // reserved
    out.push(schema_class);
    out.extend_from_slice(stream);
    out
}

/// A Major-class block whose stream is a root Set with the given
/// members, the common case in the test suites.
#[must_use]
pub fn root_set_block(members: &[Vec<u8>]) -> Vec<u8> {
    let stream = tuple(SCHEMA, 0, PrincipalType::Set, &section(members));
    pldm_block(0, &stream)
}
