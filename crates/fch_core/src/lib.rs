//! Codec for Valheim character (`.fch`) save containers.
//!
//! A container is decoded into a [`character::Character`] tree, which can be
//! edited in memory, projected to a directory of JSON and PBM files and read
//! back, and re-encoded at the newest layout with a fresh checksum.

pub mod bitmatrix;
pub mod character;
pub mod codex;
pub mod core_api;
pub mod envelope;
pub mod json;
pub mod pbm;
pub mod projection;
pub mod reader;
pub mod record;
pub mod writer;

pub use character::Character;
pub use envelope::ChecksumMode;
