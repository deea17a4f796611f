//! Generative tests for the two properties named in `SPEC_FULL.md` §8 that
//! are "well-suited to generative testing": directory reshuffling and
//! MARC-8 ASCII passthrough.

use marc21::{encoding, CharsetScheme, Field, MarcReader};
use proptest::prelude::*;
use std::io::Cursor;

const FT: u8 = 0x1E;
const RT: u8 = 0x1D;

/// Build a record byte stream with `tags` as the field tags, laid out in
/// the data area in the given order, but with directory entries emitted in
/// `directory_order` (a permutation of the same indices). Each field is a
/// one-octet control field so only framing, not subfield parsing, is under
/// test.
fn build_reshuffled_record(tags: &[&str], directory_order: &[usize]) -> Vec<u8> {
    let mut data = Vec::new();
    let mut offsets = Vec::with_capacity(tags.len());
    let mut lengths = Vec::with_capacity(tags.len());

    for (i, _tag) in tags.iter().enumerate() {
        let body = format!("v{i}").into_bytes();
        offsets.push(data.len());
        let mut field_bytes = body;
        field_bytes.push(FT);
        lengths.push(field_bytes.len());
        data.extend_from_slice(&field_bytes);
    }
    data.push(RT);

    let mut directory = Vec::new();
    for &idx in directory_order {
        directory.extend_from_slice(tags[idx].as_bytes());
        directory.extend_from_slice(format!("{:04}", lengths[idx]).as_bytes());
        directory.extend_from_slice(format!("{:05}", offsets[idx]).as_bytes());
    }
    directory.push(FT);

    let base_address = 24 + directory.len();
    let record_length = base_address + data.len();

    let mut leader = Vec::with_capacity(24);
    leader.extend_from_slice(format!("{record_length:05}").as_bytes());
    leader.extend_from_slice(b"nam a");
    leader.extend_from_slice(b"22");
    leader.extend_from_slice(format!("{base_address:05}").as_bytes());
    leader.extend_from_slice(b"   4500");

    let mut bytes = leader;
    bytes.extend_from_slice(&directory);
    bytes.extend_from_slice(&data);
    bytes
}

fn permutation_strategy(len: usize) -> impl Strategy<Value = Vec<usize>> {
    Just((0..len).collect::<Vec<usize>>()).prop_shuffle()
}

proptest! {
    /// A record whose directory entries are reshuffled (offsets and
    /// lengths left intact) decodes to the same multiset of fields, with
    /// field order equal to the directory order rather than the physical
    /// data-area layout.
    #[test]
    fn reshuffled_directory_preserves_multiset_and_directory_order(
        order in permutation_strategy(5)
    ) {
        let tags = ["011", "012", "013", "014", "015"];
        let bytes = build_reshuffled_record(&tags, &order);

        let mut reader = MarcReader::new(Cursor::new(bytes));
        let record = reader.read_record().unwrap().unwrap();

        let got_tags: Vec<&str> = record.get_fields().iter().map(Field::tag).collect();
        let expected_tags: Vec<&str> = order.iter().map(|&i| tags[i]).collect();
        prop_assert_eq!(got_tags, expected_tags);

        let mut sorted_got: Vec<&str> = record.get_fields().iter().map(Field::tag).collect();
        sorted_got.sort_unstable();
        let mut sorted_expected: Vec<&str> = tags.to_vec();
        sorted_expected.sort_unstable();
        prop_assert_eq!(sorted_got, sorted_expected);
    }

    /// MARC-8 input consisting only of printable ASCII octets (0x20-0x7E —
    /// which already excludes the FT/RT/SF delimiters, all below 0x20)
    /// decodes byte-for-byte to the same string.
    #[test]
    fn marc8_ascii_only_input_passes_through_byte_for_byte(
        s in "[ -~]{0,64}"
    ) {
        let decoded = encoding::decode_bytes(s.as_bytes(), &CharsetScheme::MarcAnsel).unwrap();
        prop_assert_eq!(decoded, s);
    }
}
