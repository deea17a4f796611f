#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

//! # marc21
//!
//! A streaming decoder for MARC21 binary records (ISO 2709 framing), the
//! MARC-8/ANSEL character-set transcoder that feeds it, and the in-memory
//! record model the two produce.
//!
//! ## Quick start
//!
//! ```no_run
//! use marc21::MarcReader;
//! use std::fs::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = File::open("records.mrc")?;
//! let mut reader = MarcReader::new(file);
//!
//! while let Some(record) = reader.read_record()? {
//!     if let Some(control_number) = record.get_control_number_field() {
//!         println!("001: {control_number}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`reader`] — streaming reader: frames leader, directory, and data area
//!   and assembles a [`record::Record`].
//! - [`record`] — the record model: [`record::Record`], [`record::Field`],
//!   [`record::ControlField`], [`record::DataField`], [`record::Subfield`].
//! - [`encoding`] — charset decoding, including the MARC-8/ANSEL state
//!   machine.
//! - [`marc8_tables`] — the MARC-8 character-set designation tables used by
//!   [`encoding`].
//! - [`leader`] — the 24-byte record leader.
//! - [`error`] — the error type shared across the crate.
//!
//! This crate reads MARC21 binary records; it does not write them, does not
//! know what any tag or subfield code means bibliographically, and does not
//! provide MARC-XML, JSON, or any other surface format.

pub mod encoding;
pub mod error;
pub mod leader;
pub mod marc8_tables;
pub mod reader;
pub mod record;

pub use encoding::CharsetScheme;
pub use error::{MarcError, Result};
pub use leader::Leader;
pub use reader::MarcReader;
pub use record::{ControlField, DataField, Field, Pattern, Record, Subfield};
