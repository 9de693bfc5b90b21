#![warn(clippy::pedantic)]

//! BEJ (Binary Encoded JSON) decoder.
//!
//! The traversal engine walks a PLDM block's encoded SFLV stream with
//! an explicit stack of open sections, resolves every property name
//! through the schema/annotation dictionaries, and forwards events to
//! a [`DecodeSink`]. [`JsonSink`] is the shipped sink; other
//! serialization targets plug in through the same trait without
//! touching the traversal.

pub mod decoder;
pub mod error;
pub mod json;
pub mod sink;

pub use decoder::{BejDecoder, Dictionaries, UnsupportedTypePolicy};
pub use error::DecodeError;
pub use json::{JsonDecoder, JsonSink};
pub use sink::DecodeSink;
