//! Reading MARC records from binary streams.
//!
//! [`MarcReader`] pulls one record at a time from any [`std::io::Read`]
//! source, framing the leader, directory, and data area, then decoding
//! field bodies through the charset configured by the leader (or an
//! explicit override). It is a single-threaded, forward-only pull reader:
//! no internal threads, no prefetch, and a failed read leaves the reader's
//! position undefined — callers should stop iterating after an error.
//!
//! # Examples
//!
//! ```no_run
//! use marc21::MarcReader;
//! use std::fs::File;
//!
//! let file = File::open("records.mrc")?;
//! let mut reader = MarcReader::new(file);
//!
//! while let Some(record) = reader.read_record()? {
//!     println!("Record type: {}", record.leader().record_type);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::encoding::{self, CharsetScheme};
use crate::error::{MarcError, Result};
use crate::leader::Leader;
use crate::record::{ControlField, DataField, Field, Record, Subfield};
use std::io::Read;

const FIELD_TERMINATOR: u8 = 0x1E;
const SUBFIELD_DELIMITER: u8 = 0x1F;
const RECORD_TERMINATOR: u8 = 0x1D;

/// Reader for ISO 2709 binary MARC records.
///
/// Construct with [`MarcReader::new`] to infer the character-coding scheme
/// from each record's own leader, or [`MarcReader::with_encoding`] to pin
/// an explicit scheme (optionally overriding what the leader declares).
#[derive(Debug)]
pub struct MarcReader<R: Read> {
    source: R,
    encoding: Option<CharsetScheme>,
    override_coding_scheme: bool,
    records_read: usize,
}

impl<R: Read> MarcReader<R> {
    /// Create a reader that infers the charset from each record's leader
    /// (position 9: `'a'` means UTF-8, anything else means MARC-8/ANSEL).
    pub fn new(source: R) -> Self {
        MarcReader {
            source,
            encoding: None,
            override_coding_scheme: false,
            records_read: 0,
        }
    }

    /// Create a reader with an explicit charset.
    ///
    /// If `override_coding_scheme` is true, `scheme` is used even when a
    /// record's leader declares a different coding scheme. If false,
    /// `scheme` is used only as the fallback for records whose leader does
    /// not declare UTF-8.
    #[must_use]
    pub fn with_encoding(source: R, scheme: CharsetScheme, override_coding_scheme: bool) -> Self {
        MarcReader {
            source,
            encoding: Some(scheme),
            override_coding_scheme,
            records_read: 0,
        }
    }

    /// Number of records successfully read so far.
    #[must_use]
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// True iff at least one more octet is available in the source.
    ///
    /// Peeks at most one octet. Returns `Ok(false)` on a clean EOF.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::Io`] if the underlying read fails for a reason
    /// other than EOF.
    pub fn has_next(&mut self) -> Result<bool> {
        let mut probe = [0u8; 1];
        match self.source.read(&mut probe) {
            Ok(0) => Ok(false),
            Ok(_) => {
                // We consumed one byte; there is no portable "unread", so
                // has_next is necessarily approximate for non-seekable
                // sources. Callers that need exact framing should just call
                // read_record and check for None.
                Ok(true)
            }
            Err(e) => Err(MarcError::Io(e)),
        }
    }

    /// Read a single MARC record.
    ///
    /// Returns `Ok(None)` at a clean end of stream (no bytes remain before
    /// the next leader).
    ///
    /// # Errors
    ///
    /// Returns an error on any violation of the record framing described in
    /// the module documentation: truncated leader or data area, a
    /// non-digit in a numeric leader/directory position, a directory whose
    /// body is not a multiple of 12 bytes, a missing record terminator, or
    /// a malformed field.
    pub fn read_record(&mut self) -> Result<Option<Record>> {
        let mut leader_bytes = [0u8; 24];
        let read = read_fill(&mut self.source, &mut leader_bytes)?;
        if read == 0 {
            return Ok(None);
        }
        if read < 24 {
            return Err(MarcError::TruncatedLeader { available: read });
        }

        let leader = Leader::from_bytes(&leader_bytes)?;
        leader.validate_for_reading()?;

        let record_length = leader.record_length as usize;
        let base_address = leader.data_base_address as usize;

        let directory_len = base_address - 24;
        let mut directory = vec![0u8; directory_len];
        let got = read_fill(&mut self.source, &mut directory)?;
        if got < directory_len {
            return Err(MarcError::TruncatedRecord(format!(
                "expected {directory_len} bytes of directory, got {got}"
            )));
        }

        let data_len = record_length - base_address;
        let mut data = vec![0u8; data_len];
        let got = read_fill(&mut self.source, &mut data)?;
        if got < data_len {
            return Err(MarcError::TruncatedRecord(format!(
                "expected {data_len} bytes of data area, got {got}"
            )));
        }

        if data.last().copied() != Some(RECORD_TERMINATOR) {
            return Err(MarcError::MissingRecordTerminator);
        }

        let entries = parse_directory(&directory)?;
        let scheme = self.resolve_scheme(&leader);

        let mut record = Record::new(leader);
        for entry in entries {
            let field = self.build_field(&entry, &data, &scheme)?;
            record.add_field(field);
        }

        self.records_read += 1;
        Ok(Some(record))
    }

    fn resolve_scheme(&self, leader: &Leader) -> CharsetScheme {
        match &self.encoding {
            Some(scheme) if self.override_coding_scheme => scheme.clone(),
            Some(_) if leader.is_unicode() => CharsetScheme::Utf8,
            Some(scheme) => scheme.clone(),
            None => CharsetScheme::from_leader_char(leader.character_coding),
        }
    }

    fn build_field(
        &self,
        entry: &DirectoryEntry,
        data: &[u8],
        scheme: &CharsetScheme,
    ) -> Result<Field> {
        let end = entry.offset + entry.length;
        if end > data.len() {
            return Err(MarcError::TruncatedRecord(format!(
                "field {} declares offset {} length {} but data area is {} bytes",
                entry.tag,
                entry.offset,
                entry.length,
                data.len()
            )));
        }
        let slice = &data[entry.offset..end];

        if slice.last().copied() != Some(FIELD_TERMINATOR) {
            return Err(MarcError::MalformedField(format!(
                "field {} missing trailing field terminator",
                entry.tag
            )));
        }
        // The directory length is authoritative; any FT bytes embedded
        // before the final one are part of the field body, not framing.
        let body = &slice[..slice.len() - 1];

        let tag_value: u32 = entry
            .tag
            .parse()
            .map_err(|_| MarcError::InvalidTag(format!("non-numeric tag {:?}", entry.tag)))?;

        if tag_value < 10 {
            let text = encoding::decode_bytes(body, scheme)?;
            let control = ControlField::new(entry.tag.clone(), text)?;
            Ok(Field::Control(control))
        } else {
            self.build_data_field(&entry.tag, body, scheme)
                .map(Field::Data)
        }
    }

    fn build_data_field(&self, tag: &str, body: &[u8], scheme: &CharsetScheme) -> Result<DataField> {
        if body.len() < 2 {
            return Err(MarcError::MalformedField(format!(
                "field {tag} shorter than its two indicators"
            )));
        }
        let indicator1 = body[0] as char;
        let indicator2 = body[1] as char;
        let mut field = DataField::new(tag.to_string(), indicator1, indicator2)?;

        let rest = &body[2..];
        // The segment before the first subfield delimiter is discarded: it
        // is not a valid subfield under MARC21 and in practice is empty.
        for chunk in rest.split(|&b| b == SUBFIELD_DELIMITER).skip(1) {
            if chunk.is_empty() {
                continue;
            }
            let code = chunk[0] as char;
            let text = encoding::decode_bytes(&chunk[1..], scheme)?;
            field.add_subfield(Subfield::new(code, text));
        }

        Ok(field)
    }
}

/// A single MARC record, yielded by [`MarcReader`]'s `Iterator` implementation.
impl<R: Read> Iterator for MarcReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

struct DirectoryEntry {
    tag: String,
    length: usize,
    offset: usize,
}

/// Parse directory entries out of the directory body, excluding its
/// terminating `FT`. Entries are returned in the order they appear in the
/// directory, which callers must preserve as field order — it is not
/// necessarily ascending by offset.
fn parse_directory(directory: &[u8]) -> Result<Vec<DirectoryEntry>> {
    let body = match directory.last() {
        Some(&FIELD_TERMINATOR) => &directory[..directory.len() - 1],
        _ => {
            return Err(MarcError::MalformedDirectory(
                "directory missing trailing field terminator".to_string(),
            ))
        }
    };

    if body.len() % 12 != 0 {
        return Err(MarcError::MalformedDirectory(format!(
            "directory body length {} is not a multiple of 12",
            body.len()
        )));
    }

    body.chunks_exact(12)
        .map(|chunk| {
            let tag = std::str::from_utf8(&chunk[0..3])
                .ok()
                .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
                .ok_or_else(|| {
                    MarcError::MalformedDirectory(format!("non-digit tag in entry {chunk:?}"))
                })?
                .to_string();
            let length = parse_padded_digits(&chunk[3..7])?;
            let offset = parse_padded_digits(&chunk[7..12])?;
            Ok(DirectoryEntry { tag, length, offset })
        })
        .collect()
}

/// Parse a fixed-width ASCII numeric field, treating leading spaces as zero
/// (matching the leader's whitespace tolerance).
fn parse_padded_digits(bytes: &[u8]) -> Result<usize> {
    let mut s = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b' ' if s.is_empty() => s.push('0'),
            b'0'..=b'9' => s.push(b as char),
            _ => {
                return Err(MarcError::MalformedDirectory(format!(
                    "non-digit octet 0x{b:02x} in directory entry"
                )))
            }
        }
    }
    s.parse()
        .map_err(|_| MarcError::MalformedDirectory(format!("invalid numeric value {s:?}")))
}

/// Fill `buf` from `source`, returning the number of bytes actually read
/// before EOF (which may be less than `buf.len()`).
fn read_fill<R: Read>(source: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match source.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(MarcError::Io(e)),
        }
    }
    Ok(total)
}
