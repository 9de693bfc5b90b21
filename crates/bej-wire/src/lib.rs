#![warn(clippy::pedantic)]

//! Wire-level primitives for BEJ (Binary Encoded JSON): the nnint and
//! integer codecs, the decomposed real-number format, the SFLV tuple
//! reader, and the PLDM block header.

pub mod error;
pub mod header;
pub mod integer;
pub mod nnint;
pub mod real;
pub mod sflv;

pub use error::WireError;
pub use header::{PLDM_HEADER_SIZE, PldmBlockHeader, SchemaClass, SUPPORTED_BEJ_VERSIONS};
pub use real::RealValue;
pub use sflv::{DictionarySelector, Format, PrincipalType, SflvTuple};
