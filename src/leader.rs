//! MARC record leader parsing and serialization.
//!
//! The MARC leader is a 24-byte fixed-length field at the start of every MARC
//! record. It contains metadata describing the record's structure and the
//! character-coding scheme used for the rest of the record; it does NOT
//! describe what any particular value *means* bibliographically — that is
//! cataloging-profile knowledge this crate does not carry.
//!
//! # Structure
//!
//! - Positions 0-4: Record length (5 digits)
//! - Position 5: Record status
//! - Position 6: Record type (a = language material, c = music, etc.)
//! - Position 7: Bibliographic level (m = monograph, s = serial, etc.)
//! - Position 8: Control record type
//! - Position 9: Character coding (space = MARC-8, a = UTF-8)
//! - Position 10: Indicator count (usually 2)
//! - Position 11: Subfield code count (usually 2)
//! - Positions 12-16: Base address of data (5 digits)
//! - Positions 17-19: Encoding level, cataloging form, multipart level
//! - Positions 20-23: Entry map (usually "4500")

use crate::error::{MarcError, Result};

/// MARC Leader - 24 bytes at the start of every MARC record.
///
/// Contains metadata about the record structure and content. All MARC
/// records must begin with exactly 24 bytes of leader information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leader {
    /// Record length (5 digits) - positions 0-4
    pub record_length: u32,
    /// Record status (1 char) - position 5
    pub record_status: char,
    /// Type of record (1 char) - position 6
    pub record_type: char,
    /// Bibliographic level (1 char) - position 7
    pub bibliographic_level: char,
    /// Type of control record (1 char) - position 8
    pub control_record_type: char,
    /// Character coding scheme (1 char) - position 9: `' '` = MARC-8, `'a'` = UCS/Unicode
    pub character_coding: char,
    /// Indicator count (1 digit) - position 10 (usually 2)
    pub indicator_count: u8,
    /// Subfield code count (1 digit) - position 11 (usually 2)
    pub subfield_code_count: u8,
    /// Base address of data (5 digits) - positions 12-16
    pub data_base_address: u32,
    /// Encoding level (1 char) - position 17
    pub encoding_level: char,
    /// Cataloging form (1 char) - position 18
    pub cataloging_form: char,
    /// Multipart resource record level (1 char) - position 19
    pub multipart_level: char,
    /// Entry map (4 chars) - positions 20-23
    pub entry_map: String,
}

impl Leader {
    /// Parse a leader from the first 24 bytes of a record.
    ///
    /// Leading spaces in a numeric position are treated as zero, matching the
    /// reader's tolerance for whitespace-padded digit fields.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::TruncatedLeader`] if fewer than 24 bytes are
    /// given, or [`MarcError::MalformedLeader`] if a numeric position
    /// contains a non-digit, non-space octet.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 24 {
            return Err(MarcError::TruncatedLeader {
                available: bytes.len(),
            });
        }

        let record_length = parse_digits(&bytes[0..5], "record length")?;
        let record_status = bytes[5] as char;
        let record_type = bytes[6] as char;
        let bibliographic_level = bytes[7] as char;
        let control_record_type = bytes[8] as char;
        let character_coding = bytes[9] as char;

        let indicator_count = parse_single_digit(bytes[10], "indicator count")?;
        let subfield_code_count = parse_single_digit(bytes[11], "subfield code count")?;

        let data_base_address = parse_digits(&bytes[12..17], "base address of data")?;
        let encoding_level = bytes[17] as char;
        let cataloging_form = bytes[18] as char;
        let multipart_level = bytes[19] as char;
        let entry_map = parse_entry_map(&bytes[20..24])?;

        Ok(Leader {
            record_length,
            record_status,
            record_type,
            bibliographic_level,
            control_record_type,
            character_coding,
            indicator_count,
            subfield_code_count,
            data_base_address,
            encoding_level,
            cataloging_form,
            multipart_level,
            entry_map,
        })
    }

    /// Validate that the leader is suitable for binary record reading.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::MalformedLeader`] if `record_length` or
    /// `data_base_address` is less than 24.
    pub fn validate_for_reading(&self) -> Result<()> {
        if self.record_length < 24 {
            return Err(MarcError::MalformedLeader(format!(
                "record length must be at least 24, got {}",
                self.record_length
            )));
        }
        if self.data_base_address < 24 {
            return Err(MarcError::MalformedLeader(format!(
                "base address of data must be at least 24, got {}",
                self.data_base_address
            )));
        }
        Ok(())
    }

    /// True if `charCodingScheme` (position 9) declares UCS/Unicode (UTF-8).
    ///
    /// Any other value, including the conventional `' '`, means MARC-8.
    #[must_use]
    pub fn is_unicode(&self) -> bool {
        self.character_coding == 'a'
    }

    /// Serialize the leader back to its 24-byte wire form.
    ///
    /// Used to build test fixtures and to support round-tripping a leader
    /// that was parsed and then mutated; this crate does not expose a full
    /// record writer (see crate documentation).
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::InvalidTag`] if the entry map is not exactly 4
    /// bytes.
    pub fn as_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(24);

        bytes.extend_from_slice(format!("{:05}", self.record_length).as_bytes());
        bytes.push(self.record_status as u8);
        bytes.push(self.record_type as u8);
        bytes.push(self.bibliographic_level as u8);
        bytes.push(self.control_record_type as u8);
        bytes.push(self.character_coding as u8);
        bytes.push(b'0' + self.indicator_count);
        bytes.push(b'0' + self.subfield_code_count);

        bytes.extend_from_slice(format!("{:05}", self.data_base_address).as_bytes());
        bytes.push(self.encoding_level as u8);
        bytes.push(self.cataloging_form as u8);
        bytes.push(self.multipart_level as u8);

        let entry_map_bytes = self.entry_map.as_bytes();
        if entry_map_bytes.len() != 4 {
            return Err(MarcError::InvalidTag(format!(
                "entry map must be 4 characters, got {}",
                entry_map_bytes.len()
            )));
        }
        bytes.extend_from_slice(entry_map_bytes);

        Ok(bytes)
    }
}

/// Parse an N-digit ASCII number from bytes, treating leading spaces as zero.
fn parse_digits(bytes: &[u8], field: &str) -> Result<u32> {
    let mut s = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b' ' if s.is_empty() => s.push('0'),
            b'0'..=b'9' => s.push(b as char),
            _ => {
                return Err(MarcError::MalformedLeader(format!(
                    "{field}: non-digit octet 0x{b:02x}"
                )))
            }
        }
    }
    s.parse::<u32>()
        .map_err(|_| MarcError::MalformedLeader(format!("{field}: invalid numeric value '{s}'")))
}

/// Parse the 4-byte entry map, treating leading spaces as zero, matching the
/// tolerance given to every other numeric leader position. Rejects any octet
/// that is neither an ASCII digit nor a space.
fn parse_entry_map(bytes: &[u8]) -> Result<String> {
    let mut s = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b' ' => s.push('0'),
            b'0'..=b'9' => s.push(b as char),
            _ => {
                return Err(MarcError::MalformedLeader(format!(
                    "entry map: non-digit octet 0x{b:02x}"
                )))
            }
        }
    }
    Ok(s)
}

fn parse_single_digit(byte: u8, field: &str) -> Result<u8> {
    match byte {
        b' ' => Ok(0),
        b'0'..=b'9' => Ok(byte - b'0'),
        _ => Err(MarcError::MalformedLeader(format!(
            "{field}: non-digit octet 0x{byte:02x}"
        ))),
    }
}
