//! Character-set decoding for MARC record field data.
//!
//! MARC records declare their character coding scheme in leader position 9:
//! a space means MARC-8 (the legacy ISO 2022 code-switching scheme built on
//! ANSEL), `'a'` means UCS/Unicode (UTF-8). A reader may also be constructed
//! with an explicit charset that overrides this inference (see
//! [`CharsetScheme::Named`] and the `cyrillic_capital_e` scenario below).
//!
//! Re-encoding back to MARC-8 is out of scope: this module only decodes.

use crate::error::{MarcError, Result};
use crate::marc8_tables::{get_charset_table, CharacterSetId};

/// The character-set scheme a byte slice is decoded under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharsetScheme {
    /// UTF-8, as declared by leader position 9 == `'a'`.
    Utf8,
    /// MARC-8/ANSEL, the legacy default (leader position 9 == `' '`).
    MarcAnsel,
    /// ISO-8859-1 (Latin-1).
    Iso8859_1,
    /// A named charset, resolved via the platform charset registry
    /// (`encoding_rs`'s label table). Unknown names fail [`MarcError::UnknownCharset`].
    Named(String),
}

impl CharsetScheme {
    /// Infer the scheme from leader position 9.
    ///
    /// # Errors
    ///
    /// This never fails in practice — callers that want strict leader
    /// validation should check [`MarcError::MalformedLeader`] at the leader
    /// parsing stage. Any value other than `'a'` is treated as MARC-8, which
    /// matches what real-world records (with e.g. stray position-9 bytes)
    /// expect.
    #[must_use]
    pub fn from_leader_char(c: char) -> Self {
        if c == 'a' {
            CharsetScheme::Utf8
        } else {
            CharsetScheme::MarcAnsel
        }
    }
}

/// Decode a byte slice to a Unicode string under the given scheme.
///
/// # Errors
///
/// Returns [`MarcError::DecodeError`] on invalid UTF-8, or
/// [`MarcError::UnknownCharset`] if `scheme` is [`CharsetScheme::Named`] with
/// an unresolvable name.
pub fn decode_bytes(bytes: &[u8], scheme: &CharsetScheme) -> Result<String> {
    match scheme {
        CharsetScheme::Utf8 => String::from_utf8(bytes.to_vec())
            .map_err(|e| MarcError::DecodeError(format!("invalid UTF-8: {e}"))),
        CharsetScheme::Iso8859_1 => Ok(encoding_rs::mem::decode_latin1(bytes).into_owned()),
        CharsetScheme::Named(name) => decode_named(bytes, name),
        CharsetScheme::MarcAnsel => decode_marc8(bytes),
    }
}

fn decode_named(bytes: &[u8], name: &str) -> Result<String> {
    let encoding = encoding_rs::Encoding::for_label(name.as_bytes())
        .ok_or_else(|| MarcError::UnknownCharset(name.to_string()))?;
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(MarcError::DecodeError(format!(
            "invalid {name} sequence in field data"
        )));
    }
    Ok(text.into_owned())
}

/// MARC-8 decoder state: the character sets currently designated into G0 and
/// G1. Reset at the start of every `decode_marc8` call — state does not
/// persist across fields.
#[derive(Debug, Clone)]
struct Marc8Decoder {
    g0: CharacterSetId,
    g1: CharacterSetId,
}

impl Marc8Decoder {
    fn new() -> Self {
        Marc8Decoder {
            g0: CharacterSetId::BasicLatin,
            g1: CharacterSetId::AnselExtendedLatin,
        }
    }

    fn is_multibyte(charset: CharacterSetId) -> bool {
        charset == CharacterSetId::Eacc
    }
}

/// Decode MARC-8 bytes to a Unicode string.
///
/// Handles G0/G1 character-set switching via escape sequences, buffers
/// combining diacritics (stored before the base letter on the wire) and
/// emits them after the base character they modify, then normalizes the
/// result to NFC. Unknown octets decode to U+FFFD.
#[allow(clippy::too_many_lines, clippy::cognitive_complexity)]
fn decode_marc8(bytes: &[u8]) -> Result<String> {
    let mut decoder = Marc8Decoder::new();
    let mut result = String::new();
    let mut combining_chars: Vec<char> = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == 0x1B {
            if i + 1 >= bytes.len() {
                result.push('\u{FFFD}');
                break;
            }

            let next_byte = bytes[i + 1];
            match next_byte {
                0x28 => {
                    // ESC ( x - designate G0 (single-byte)
                    if i + 2 >= bytes.len() {
                        result.push('\u{FFFD}');
                        break;
                    }
                    if let Some(charset) = CharacterSetId::from_byte(bytes[i + 2]) {
                        decoder.g0 = charset;
                    }
                    i += 3;
                    continue;
                }
                0x29 => {
                    // ESC ) x - designate G1 (single-byte)
                    if i + 2 >= bytes.len() {
                        result.push('\u{FFFD}');
                        break;
                    }
                    if let Some(charset) = CharacterSetId::from_byte(bytes[i + 2]) {
                        decoder.g1 = charset;
                    }
                    i += 3;
                    continue;
                }
                0x24 => {
                    // ESC $ x - designate a multi-byte set on G0
                    if i + 2 >= bytes.len() {
                        result.push('\u{FFFD}');
                        break;
                    }
                    let modifier = bytes[i + 2];
                    if modifier == 0x31 {
                        decoder.g0 = CharacterSetId::Eacc;
                        i += 3;
                        continue;
                    } else if i + 3 < bytes.len() {
                        if let Some(charset) = CharacterSetId::from_byte(bytes[i + 3]) {
                            decoder.g0 = charset;
                        }
                        i += 4;
                        continue;
                    }
                    i += 3;
                    continue;
                }
                0x73 => {
                    // ESC s - reset G0 to ASCII
                    decoder.g0 = CharacterSetId::BasicLatin;
                    i += 2;
                    continue;
                }
                0x67 => {
                    // ESC g - Greek symbols (custom, deprecated)
                    decoder.g0 = CharacterSetId::GreekSymbols;
                    i += 2;
                    continue;
                }
                0x62 => {
                    // ESC b - subscripts (custom)
                    decoder.g0 = CharacterSetId::Subscript;
                    i += 2;
                    continue;
                }
                0x70 => {
                    // ESC p - superscripts (custom)
                    decoder.g0 = CharacterSetId::Superscript;
                    i += 2;
                    continue;
                }
                _ => {
                    i += 2;
                    continue;
                }
            }
        }

        let byte = bytes[i];

        if byte < 0x20 || byte == 0x7F {
            if byte == 0x0A || byte == 0x0D {
                result.push(byte as char);
            }
            i += 1;
            continue;
        }

        let charset = if byte >= 0xA0 { decoder.g1 } else { decoder.g0 };

        if Marc8Decoder::is_multibyte(charset) {
            if i + 2 < bytes.len() {
                let key = (u32::from(bytes[i]) << 16)
                    | (u32::from(bytes[i + 1]) << 8)
                    | u32::from(bytes[i + 2]);
                push_decoded(
                    &mut result,
                    &mut combining_chars,
                    crate::marc8_tables::get_eacc_character(key),
                );
                i += 3;
                continue;
            }
            i += 1;
            continue;
        }

        let table = get_charset_table(charset);
        push_decoded(&mut result, &mut combining_chars, table.get(&byte).copied());
        i += 1;
    }

    // Any combining marks left over with no following base character (or at
    // the very end of input) are emitted as-is; there is no base for them to
    // attach to.
    result.extend(combining_chars);

    use unicode_normalization::UnicodeNormalization;
    Ok(result.nfc().collect())
}

/// Emit a decoded (codepoint, is_combining) pair, buffering combining marks
/// until the next base character and then emitting base-then-marks (NFD-like
/// canonical order) so the final NFC pass composes correctly.
fn push_decoded(result: &mut String, combining: &mut Vec<char>, entry: Option<(u32, bool)>) {
    let Some((codepoint, is_combining)) = entry else {
        result.push('\u{FFFD}');
        return;
    };
    let ch = char::from_u32(codepoint).unwrap_or('\u{FFFD}');
    if is_combining {
        combining.push(ch);
    } else {
        result.push(ch);
        result.extend(combining.drain(..));
    }
}
