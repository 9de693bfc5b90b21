use bej_wire::RealValue;

/// Output contract between the traversal engine and a serialization
/// target.
///
/// The engine emits exactly one event per structural edge or scalar it
/// decodes; the sink owns all formatting concerns. `name` is the
/// resolved property name, or `""` for unnamed values (the top-level
/// root and array elements); sinks must not emit a key for an empty
/// name.
///
/// Sinks are plain in-memory accumulators, so the methods are
/// infallible. A sink instance belongs to exactly one in-flight
/// decode; it is not safe to share one across concurrent calls.
pub trait DecodeSink {
    /// A Set (JSON object) opens.
    fn set_start(&mut self, name: &str);

    /// The innermost open Set closes.
    fn set_end(&mut self);

    /// An Array opens.
    fn array_start(&mut self, name: &str);

    /// The innermost open Array closes.
    fn array_end(&mut self);

    /// A value ended but its enclosing section continues: a sibling
    /// follows.
    fn property_separator(&mut self);

    /// A property annotation (`Outer@Annotation`) opens. `name` is the
    /// outer property; the annotated value's own name event follows as
    /// a continuation.
    fn annotation(&mut self, name: &str);

    fn null(&mut self, name: &str);

    fn integer(&mut self, name: &str, value: i64);

    /// An enumeration value, already resolved to its literal text.
    fn enum_value(&mut self, name: &str, literal: &str);

    fn string(&mut self, name: &str, value: &str);

    fn real(&mut self, name: &str, value: &RealValue);

    fn boolean(&mut self, name: &str, value: bool);
}
