#![warn(clippy::pedantic)]

//! Test-support fixture builders for the BEJ workspace.
//!
//! Dictionaries and encoded streams are assembled in memory rather
//! than loaded from committed binary files, so every test states its
//! fixture in full. These builders are test support only; BEJ
//! encoding is not a product feature.

pub mod dictionary;
pub mod stream;
