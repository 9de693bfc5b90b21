//! In-memory dictionary fixture builder.
//!
//! Assembles dictionary blobs with the 12-byte header, the flat table
//! of 10-byte property records, and a NUL-terminated string pool.
//! Records are laid out breadth-first so every sibling group is
//! contiguous, which is what the decoder's child-pointer arithmetic
//! requires.

use bej_dictionary::{HEADER_SIZE, PROPERTY_SIZE};
use bej_wire::PrincipalType;

/// One property in a dictionary fixture.
#[derive(Clone, Debug)]
pub struct PropertySpec {
    pub name: &'static str,
    pub principal_type: PrincipalType,
    pub sequence: u16,
    pub children: Vec<PropertySpec>,
}

impl PropertySpec {
    #[must_use]
    pub fn new(name: &'static str, principal_type: PrincipalType, sequence: u16) -> Self {
        Self {
            name,
            principal_type,
            sequence,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<PropertySpec>) -> Self {
        self.children = children;
        self
    }
}

/// Shorthand for a leaf property.
#[must_use]
pub fn prop(name: &'static str, principal_type: PrincipalType, sequence: u16) -> PropertySpec {
    PropertySpec::new(name, principal_type, sequence)
}

/// Build a schema dictionary blob from its root property group.
///
/// A main schema dictionary has exactly one root record (the implicit
/// root Set) as its first entry; pass it as `roots[0]`.
#[must_use]
pub fn build_dictionary(roots: &[PropertySpec]) -> Vec<u8> {
    // Pass 1: breadth-first group discovery. Group 0 is the roots;
    // every property with children contributes one more group, in
    // visit order.
    let mut groups: Vec<&[PropertySpec]> = vec![roots];
    let mut next = 0;
    while next < groups.len() {
        let group = groups[next];
        for property in group {
            if !property.children.is_empty() {
                groups.push(&property.children);
            }
        }
        next += 1;
    }

    let mut group_starts = Vec::with_capacity(groups.len());
    let mut record_count = 0usize;
    for group in &groups {
        group_starts.push(record_count);
        record_count += group.len();
    }

    let pool_base = HEADER_SIZE + record_count * PROPERTY_SIZE;

    // Pass 2: emit records in the same visit order, consuming child
    // groups in the order pass 1 enqueued them.
    let mut records = Vec::with_capacity(record_count * PROPERTY_SIZE);
    let mut pool = Vec::new();
    let mut next_child_group = 1;
    for group in &groups {
        for property in *group {
            let child_offset = if property.children.is_empty() {
                0
            } else {
                let offset = HEADER_SIZE + group_starts[next_child_group] * PROPERTY_SIZE;
                next_child_group += 1;
                offset
            };
            let name_offset = pool_base + pool.len();
            pool.extend_from_slice(property.name.as_bytes());
            pool.push(0x00);

            records.push((property.principal_type as u8) << 4);
            records.extend_from_slice(&property.sequence.to_le_bytes());
            records.extend_from_slice(&(child_offset as u16).to_le_bytes());
            records.extend_from_slice(&(property.children.len() as u16).to_le_bytes());
            records.push(property.name.len() as u8);
            records.extend_from_slice(&(name_offset as u16).to_le_bytes());
        }
    }

    let total_size = HEADER_SIZE + records.len() + pool.len();
    let mut blob = Vec::with_capacity(total_size);
    blob.push(0x00); // version tag
    blob.push(0x00); // flags
    blob.extend_from_slice(&(record_count as u16).to_le_bytes());
    blob.extend_from_slice(&0x0001_0000u32.to_le_bytes()); // schema version
    blob.extend_from_slice(&(total_size as u32).to_le_bytes());
    blob.extend_from_slice(&records);
    blob.extend_from_slice(&pool);
    blob
}

/// Build an annotation dictionary: one reserved "Annotations" root
/// record followed by the annotation properties as its children.
#[must_use]
pub fn build_annotation_dictionary(annotations: &[PropertySpec]) -> Vec<u8> {
    let root = PropertySpec::new("Annotations", PrincipalType::Set, 0)
        .with_children(annotations.to_vec());
    build_dictionary(&[root])
}
