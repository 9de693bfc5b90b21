use bej_dictionary::{Dictionary, first_annotated_property_offset, property_head_offset};
use bej_wire::nnint::decode_nnint;
use bej_wire::{
    DictionarySelector, PLDM_HEADER_SIZE, PldmBlockHeader, PrincipalType, RealValue, SchemaClass,
    SflvTuple, WireError,
};

use crate::error::DecodeError;
use crate::sink::DecodeSink;

/// The three dictionary blobs a decode call resolves against.
///
/// The caller owns the buffers; they must outlive the decode call and
/// are never written. The error dictionary is reserved for the Error
/// schema class, which the decoder rejects, so it is currently unused.
#[derive(Clone, Copy, Debug)]
pub struct Dictionaries<'a> {
    pub schema: &'a [u8],
    pub annotation: &'a [u8],
    pub error: Option<&'a [u8]>,
}

/// What to do when the stream contains a principal type the decoder
/// cannot interpret (Bytestring, Choice, ResourceLink,
/// ResourceLinkExpansion, or a reserved type code).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnsupportedTypePolicy {
    /// Advance past the value and continue, emitting nothing for it.
    #[default]
    Skip,
    /// Abort the decode with [`DecodeError::UnsupportedType`].
    Fail,
}

/// Non-recursive depth-first BEJ decoder.
///
/// One `decode` call walks the encoded stream tuple by tuple,
/// resolving every property name through the dictionaries and
/// forwarding structural and scalar events to a [`DecodeSink`].
/// Nesting is tracked with an explicit frame stack rather than
/// call-stack recursion, so input nesting depth is bounded only by
/// memory.
///
/// The decoder itself holds no per-call state; a single instance may
/// be reused across sequential decodes, and dictionaries may be shared
/// read-only across concurrent decodes that each bring their own sink.
#[derive(Clone, Copy, Debug, Default)]
pub struct BejDecoder {
    policy: UnsupportedTypePolicy,
}

impl BejDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_policy(policy: UnsupportedTypePolicy) -> Self {
        Self { policy }
    }

    /// Decode a complete PLDM block into `sink`.
    ///
    /// Validates the 7-byte PLDM header (version allowlist, schema
    /// class), then runs the traversal over the remaining encoded
    /// stream. On failure the sink retains whatever events were
    /// emitted before the error.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::TruncatedBlock`] if the block is shorter than
    ///   the header.
    /// - [`DecodeError::UnsupportedSchemaClass`] for Annotation,
    ///   CollectionMemberType, and Error class payloads.
    /// - [`DecodeError::Wire`] / [`DecodeError::Dictionary`] for
    ///   malformed stream fields or failed lookups.
    /// - [`DecodeError::UnexpectedSectionEnd`] /
    ///   [`DecodeError::UnterminatedSection`] for structurally
    ///   malformed nesting.
    /// - [`DecodeError::UnsupportedType`] under
    ///   [`UnsupportedTypePolicy::Fail`].
    pub fn decode(
        &self,
        dictionaries: &Dictionaries<'_>,
        block: &[u8],
        sink: &mut dyn DecodeSink,
    ) -> Result<(), DecodeError> {
        if block.len() < PLDM_HEADER_SIZE {
            return Err(DecodeError::TruncatedBlock {
                length: block.len(),
            });
        }
        let header = PldmBlockHeader::read_from(block)?;
        match header.schema_class {
            SchemaClass::Major | SchemaClass::Event => {}
            class @ (SchemaClass::Annotation
            | SchemaClass::CollectionMemberType
            | SchemaClass::Error) => {
                return Err(DecodeError::UnsupportedSchemaClass { class });
            }
        }

        let mut traversal = Traversal {
            stream: &block[PLDM_HEADER_SIZE..],
            schema_dict: Dictionary::new(dictionaries.schema)?,
            annotation_dict: Dictionary::new(dictionaries.annotation)?,
            policy: self.policy,
            state: DecodeState::initial(),
            stack: Vec::new(),
            sink,
        };
        traversal.run()
    }
}

/// Section kinds an open stack frame can represent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SectionKind {
    Set,
    Array,
    /// A property-annotation boundary: restores state on close but
    /// emits no end event.
    Annotation,
}

/// Mutable cursor bundle for one traversal.
///
/// Saved into a [`StackFrame`] on entering a nested section and
/// restored when that section's end offset is reached, the mechanism
/// that replaces native call-stack recursion.
#[derive(Clone, Copy, Debug)]
struct DecodeState {
    /// Current offset into the encoded stream.
    offset: usize,
    /// Property-table offset the next schema-dictionary lookup scans
    /// from (the current scope's first child record).
    schema_cursor: usize,
    /// Same, for the annotation dictionary.
    annotation_cursor: usize,
    /// Whether values at the current nesting level carry names. True
    /// inside Sets and annotations, false inside Arrays and at the
    /// unnamed root.
    add_property_name: bool,
}

impl DecodeState {
    fn initial() -> Self {
        Self {
            offset: 0,
            schema_cursor: property_head_offset(),
            annotation_cursor: first_annotated_property_offset(),
            add_property_name: false,
        }
    }
}

/// One open Set/Array/Annotation section.
#[derive(Clone, Copy, Debug)]
struct StackFrame {
    kind: SectionKind,
    /// Stream offset at which this section closes.
    end_offset: usize,
    schema_cursor: usize,
    annotation_cursor: usize,
    add_property_name: bool,
}

/// All state owned by one in-flight decode.
struct Traversal<'a, 'sink> {
    stream: &'a [u8],
    schema_dict: Dictionary<'a>,
    annotation_dict: Dictionary<'a>,
    policy: UnsupportedTypePolicy,
    state: DecodeState,
    stack: Vec<StackFrame>,
    sink: &'sink mut dyn DecodeSink,
}

impl<'a> Traversal<'a, '_> {
    fn run(&mut self) -> Result<(), DecodeError> {
        while self.state.offset < self.stream.len() {
            let tuple = SflvTuple::read_at(self.stream, self.state.offset)?;
            match tuple.format.principal_type() {
                PrincipalType::Set => self.handle_section(&tuple, SectionKind::Set)?,
                PrincipalType::Array => self.handle_section(&tuple, SectionKind::Array)?,
                PrincipalType::Null => self.handle_null(&tuple)?,
                PrincipalType::Integer => self.handle_integer(&tuple)?,
                PrincipalType::Enum => self.handle_enum(&tuple)?,
                PrincipalType::String => self.handle_string(&tuple)?,
                PrincipalType::Real => self.handle_real(&tuple)?,
                PrincipalType::Boolean => self.handle_boolean(&tuple)?,
                PrincipalType::PropertyAnnotation => self.handle_property_annotation(&tuple)?,
                unsupported @ (PrincipalType::Bytestring
                | PrincipalType::Choice
                | PrincipalType::ResourceLink
                | PrincipalType::ResourceLinkExpansion
                | PrincipalType::Reserved11
                | PrincipalType::Reserved12
                | PrincipalType::Reserved13) => {
                    self.handle_unsupported(&tuple, unsupported)?;
                }
            }
        }
        // Close any sections whose end coincides with the stream end.
        self.process_ending(true)?;
        if self.stack.is_empty() {
            Ok(())
        } else {
            Err(DecodeError::UnterminatedSection {
                open_sections: self.stack.len(),
            })
        }
    }

    /// Select dictionary and scan cursor for the tuple's schema bit.
    fn dictionary_and_cursor(&self, selector: DictionarySelector) -> (Dictionary<'a>, usize) {
        match selector {
            DictionarySelector::Schema => (self.schema_dict, self.state.schema_cursor),
            DictionarySelector::Annotation => (self.annotation_dict, self.state.annotation_cursor),
        }
    }

    /// Look up a property by sequence number in the tuple's dictionary.
    fn resolve(
        &self,
        selector: DictionarySelector,
        sequence_number: u32,
    ) -> Result<(Dictionary<'a>, bej_dictionary::PropertyRecord), DecodeError> {
        let (dict, cursor) = self.dictionary_and_cursor(selector);
        let record = dict.find_property(cursor, sequence_number)?;
        Ok((dict, record))
    }

    /// True when the value currently being decoded is an array element.
    fn is_array_element(&self) -> bool {
        self.stack
            .last()
            .is_some_and(|frame| frame.kind == SectionKind::Array)
    }

    /// The sequence number to use for this tuple's dictionary lookup.
    ///
    /// Array-element dictionary entries always live at index 0 of the
    /// child table, regardless of the element's position.
    fn effective_sequence_number(&self, tuple: &SflvTuple) -> u32 {
        if self.is_array_element() {
            0
        } else {
            tuple.sequence_number
        }
    }

    /// Resolve the scalar's property name, or `""` when names are
    /// suppressed at this level.
    fn scalar_name(&self, tuple: &SflvTuple) -> Result<&'a str, DecodeError> {
        if !self.state.add_property_name {
            return Ok("");
        }
        let (dict, record) = self.resolve(tuple.selector, tuple.sequence_number)?;
        Ok(dict.property_name(&record)?)
    }

    /// Shared Set/Array entry: emit the start event, then either close
    /// an empty section immediately (no frame) or push a frame and
    /// descend into the property's child table.
    fn handle_section(&mut self, tuple: &SflvTuple, kind: SectionKind) -> Result<(), DecodeError> {
        let sequence_number = self.effective_sequence_number(tuple);
        let (dict, record) = self.resolve(tuple.selector, sequence_number)?;
        let name = if self.state.add_property_name {
            dict.property_name(&record)?
        } else {
            ""
        };
        if kind == SectionKind::Set {
            self.sink.set_start(name);
        } else {
            self.sink.array_start(name);
        }

        let (member_count, _) = decode_nnint(tuple.value(self.stream))?;
        if member_count == 0 {
            if kind == SectionKind::Set {
                self.sink.set_end();
            } else {
                self.sink.array_end();
            }
        } else {
            self.stack.push(StackFrame {
                kind,
                end_offset: tuple.value_end_offset,
                schema_cursor: self.state.schema_cursor,
                annotation_cursor: self.state.annotation_cursor,
                add_property_name: self.state.add_property_name,
            });
            // Set members are named, array elements are not.
            self.state.add_property_name = kind == SectionKind::Set;
            match tuple.selector {
                DictionarySelector::Schema => {
                    self.state.schema_cursor = usize::from(record.child_pointer_offset);
                }
                DictionarySelector::Annotation => {
                    self.state.annotation_cursor = usize::from(record.child_pointer_offset);
                }
            }
        }
        self.state.offset = tuple.first_nested_tuple_offset(self.stream)?;
        Ok(())
    }

    fn handle_null(&mut self, tuple: &SflvTuple) -> Result<(), DecodeError> {
        let name = self.scalar_name(tuple)?;
        self.sink.null(name);
        self.finish_scalar(tuple)
    }

    fn handle_integer(&mut self, tuple: &SflvTuple) -> Result<(), DecodeError> {
        let name = self.scalar_name(tuple)?;
        let value = bej_wire::integer::signed_from_le(tuple.value(self.stream))?;
        self.sink.integer(name, value);
        self.finish_scalar(tuple)
    }

    /// The value holds an nnint that is itself a sequence number,
    /// resolved in the same property's child table to obtain the enum
    /// literal.
    fn handle_enum(&mut self, tuple: &SflvTuple) -> Result<(), DecodeError> {
        let sequence_number = self.effective_sequence_number(tuple);
        let (dict, record) = self.resolve(tuple.selector, sequence_number)?;
        let name = if self.state.add_property_name {
            dict.property_name(&record)?
        } else {
            ""
        };

        let (literal_sequence, _) = decode_nnint(tuple.value(self.stream))?;
        let literal_record = dict.find_property(
            usize::from(record.child_pointer_offset),
            u32::try_from(literal_sequence).unwrap_or(u32::MAX),
        )?;
        let literal = dict.property_name(&literal_record)?;

        self.sink.enum_value(name, literal);
        self.finish_scalar(tuple)
    }

    fn handle_string(&mut self, tuple: &SflvTuple) -> Result<(), DecodeError> {
        let name = self.scalar_name(tuple)?;
        let value = tuple.value(self.stream);
        // String values are NUL-terminated on the wire; take the bytes
        // up to the first NUL within the value.
        let text_end = value.iter().position(|&b| b == 0).unwrap_or(value.len());
        let text = std::str::from_utf8(&value[..text_end]).map_err(|_| {
            DecodeError::InvalidStringValue {
                offset: tuple.value_offset,
            }
        })?;
        self.sink.string(name, text);
        self.finish_scalar(tuple)
    }

    fn handle_real(&mut self, tuple: &SflvTuple) -> Result<(), DecodeError> {
        let name = self.scalar_name(tuple)?;
        let value = RealValue::read_from(tuple.value(self.stream))?;
        self.sink.real(name, &value);
        self.finish_scalar(tuple)
    }

    fn handle_boolean(&mut self, tuple: &SflvTuple) -> Result<(), DecodeError> {
        let name = self.scalar_name(tuple)?;
        let first = *tuple
            .value(self.stream)
            .first()
            .ok_or(WireError::UnexpectedEof {
                offset: tuple.value_offset,
            })?;
        self.sink.boolean(name, first != 0);
        self.finish_scalar(tuple)
    }

    /// `Outer@Annotation`: emit the outer property's name, open a
    /// bookkeeping frame, and rewind to the start of the annotation's
    /// value so its nested tuple is decoded next under the annotation
    /// namespace.
    fn handle_property_annotation(&mut self, tuple: &SflvTuple) -> Result<(), DecodeError> {
        // The outer property always comes from the main schema
        // dictionary; annotations of annotations are not supported.
        let record = self
            .schema_dict
            .find_property(self.state.schema_cursor, tuple.sequence_number)?;
        let name = self.schema_dict.property_name(&record)?;
        self.sink.annotation(name);

        self.stack.push(StackFrame {
            kind: SectionKind::Annotation,
            end_offset: tuple.value_end_offset,
            schema_cursor: self.state.schema_cursor,
            annotation_cursor: self.state.annotation_cursor,
            add_property_name: self.state.add_property_name,
        });
        self.state.add_property_name = true;
        self.state.schema_cursor = usize::from(record.child_pointer_offset);
        // Re-enter the loop at the annotation's own nested tuple
        // rather than past it.
        self.state.offset = tuple.value_offset;
        Ok(())
    }

    fn handle_unsupported(
        &mut self,
        tuple: &SflvTuple,
        principal_type: PrincipalType,
    ) -> Result<(), DecodeError> {
        match self.policy {
            UnsupportedTypePolicy::Skip => {
                self.state.offset = tuple.value_end_offset;
                Ok(())
            }
            UnsupportedTypePolicy::Fail => Err(DecodeError::UnsupportedType {
                principal_type,
                offset: self.state.offset,
            }),
        }
    }

    /// Advance past the scalar's value and run the ending pass; a
    /// scalar always closes at least the implicit end-of-sibling
    /// bookkeeping of its enclosing section.
    fn finish_scalar(&mut self, tuple: &SflvTuple) -> Result<(), DecodeError> {
        self.state.offset = tuple.value_end_offset;
        self.process_ending(false)
    }

    /// Close every open section whose end offset equals the current
    /// stream offset, restoring the enclosing scope's cursors as each
    /// frame pops. A single value can close multiple nested sections
    /// at once. If the top frame's boundary does not match, the value
    /// has siblings left, so a property separator is emitted instead.
    fn process_ending(&mut self, can_be_empty: bool) -> Result<(), DecodeError> {
        if self.stack.is_empty() && !can_be_empty {
            return Err(DecodeError::UnexpectedSectionEnd {
                offset: self.state.offset,
            });
        }
        while let Some(&frame) = self.stack.last() {
            if self.state.offset == frame.end_offset {
                self.state.schema_cursor = frame.schema_cursor;
                self.state.annotation_cursor = frame.annotation_cursor;
                self.state.add_property_name = frame.add_property_name;
                match frame.kind {
                    SectionKind::Set => self.sink.set_end(),
                    SectionKind::Array => self.sink.array_end(),
                    SectionKind::Annotation => {}
                }
                self.stack.pop();
            } else {
                self.sink.property_separator();
                return Ok(());
            }
        }
        Ok(())
    }
}
