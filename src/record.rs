//! In-memory MARC record model.
//!
//! This module implements the record model described for a reimplementation:
//! a record is an ordered sequence of fields, each either a [`ControlField`]
//! (tags below `010`) or a [`DataField`] (tags `010` and above). Fields are
//! stored in the order the directory declared them, not grouped or sorted by
//! tag — `getFields(tag)` filters, it does not index into a grouped map. This
//! preserves directory order even when the same tag appears more than once
//! or the directory itself is not in ascending-offset order.
//!
//! This module intentionally does not know anything about what a tag or
//! subfield code *means* bibliographically (e.g. that `245 $a` is a title).
//! That is cataloging-profile knowledge, out of scope for this crate.

use crate::error::{MarcError, Result};
use crate::leader::Leader;
use regex::Regex;
use smallvec::SmallVec;

/// A single subfield within a [`DataField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subfield {
    code: char,
    data: String,
}

impl Subfield {
    /// Create a new subfield.
    #[must_use]
    pub fn new(code: char, data: impl Into<String>) -> Self {
        Subfield {
            code,
            data: data.into(),
        }
    }

    /// The subfield code.
    #[must_use]
    pub fn code(&self) -> char {
        self.code
    }

    /// The subfield data.
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Set the subfield code.
    pub fn set_code(&mut self, code: char) {
        self.code = code;
    }

    /// Set the subfield data.
    pub fn set_data(&mut self, data: impl Into<String>) {
        self.data = data.into();
    }

    /// True if this subfield's code matches `pattern`.
    #[must_use]
    pub fn matches(&self, pattern: &Pattern) -> bool {
        pattern.matches_code(self.code)
    }

    /// True if this subfield's data matches `pattern`.
    #[must_use]
    pub fn find(&self, pattern: &Regex) -> bool {
        pattern.is_match(&self.data)
    }
}

/// A selector for a set of subfield codes, used by `DataField::get_subfields`
/// and `DataField::get_subfields_as_string`.
///
/// The variant is picked once at the call site rather than carried as a
/// trait object, matching how small a record's subfield-selection surface
/// actually is.
#[derive(Debug, Clone)]
pub enum Pattern {
    /// Matches every subfield regardless of code.
    All,
    /// Matches subfield codes found in a compiled regular expression against
    /// the single-character code (as a one-character string).
    Regex(Regex),
    /// Matches subfield codes present in the given set.
    CharSet(Vec<char>),
}

impl Pattern {
    /// Build a pattern that matches exactly the given codes.
    #[must_use]
    pub fn codes(codes: &[char]) -> Self {
        Pattern::CharSet(codes.to_vec())
    }

    /// Build a pattern from a regular expression applied to each code,
    /// one character at a time.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::MalformedField`] if `pattern` does not compile.
    pub fn regex(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Pattern::Regex)
            .map_err(|e| MarcError::MalformedField(format!("invalid subfield pattern: {e}")))
    }

    fn matches_code(&self, code: char) -> bool {
        match self {
            Pattern::All => true,
            Pattern::CharSet(codes) => codes.contains(&code),
            Pattern::Regex(re) => {
                let mut buf = [0u8; 4];
                re.is_match(code.encode_utf8(&mut buf))
            }
        }
    }
}

/// A control field (tag numerically below `010`): raw character data with no
/// indicators or subfield structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlField {
    tag: String,
    data: String,
}

impl ControlField {
    /// Create a control field.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::InvalidTag`] if `tag` is not exactly three ASCII
    /// digits numerically below 010.
    pub fn new(tag: impl Into<String>, data: impl Into<String>) -> Result<Self> {
        let tag = tag.into();
        validate_control_tag(&tag)?;
        Ok(ControlField {
            tag,
            data: data.into(),
        })
    }

    /// The field tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The raw field data.
    #[must_use]
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Set the field data.
    pub fn set_data(&mut self, data: impl Into<String>) {
        self.data = data.into();
    }

    /// Set the field tag.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::InvalidTag`] if `tag` is not valid for a control
    /// field.
    pub fn set_tag(&mut self, tag: impl Into<String>) -> Result<()> {
        let tag = tag.into();
        validate_control_tag(&tag)?;
        self.tag = tag;
        Ok(())
    }
}

/// A data field (tag numerically `010` and above): two indicators plus an
/// ordered list of subfields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataField {
    tag: String,
    indicator1: char,
    indicator2: char,
    subfields: SmallVec<[Subfield; 4]>,
}

impl DataField {
    /// Create a data field with no subfields.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::InvalidTag`] if `tag` is not exactly three ASCII
    /// digits numerically at or above 010.
    pub fn new(tag: impl Into<String>, indicator1: char, indicator2: char) -> Result<Self> {
        let tag = tag.into();
        validate_data_tag(&tag)?;
        Ok(DataField {
            tag,
            indicator1,
            indicator2,
            subfields: SmallVec::new(),
        })
    }

    /// The field tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Set the field tag.
    ///
    /// # Errors
    ///
    /// Returns [`MarcError::InvalidTag`] if `tag` is not valid for a data
    /// field.
    pub fn set_tag(&mut self, tag: impl Into<String>) -> Result<()> {
        let tag = tag.into();
        validate_data_tag(&tag)?;
        self.tag = tag;
        Ok(())
    }

    /// First indicator.
    #[must_use]
    pub fn indicator1(&self) -> char {
        self.indicator1
    }

    /// Second indicator.
    #[must_use]
    pub fn indicator2(&self) -> char {
        self.indicator2
    }

    /// Set the first indicator.
    pub fn set_indicator1(&mut self, value: char) {
        self.indicator1 = value;
    }

    /// Set the second indicator.
    pub fn set_indicator2(&mut self, value: char) {
        self.indicator2 = value;
    }

    /// Append a subfield to the end of the field.
    pub fn add_subfield(&mut self, subfield: Subfield) {
        self.subfields.push(subfield);
    }

    /// Insert a subfield at a specific position.
    ///
    /// `index` is clamped to the current length, so inserting past the end
    /// appends.
    pub fn insert_subfield(&mut self, index: usize, subfield: Subfield) {
        let index = index.min(self.subfields.len());
        self.subfields.insert(index, subfield);
    }

    /// Remove the first subfield equal to `subfield` by identity, returning
    /// it if one was found.
    pub fn remove_subfield(&mut self, subfield: &Subfield) -> Option<Subfield> {
        let pos = self.subfields.iter().position(|sf| sf == subfield)?;
        Some(self.subfields.remove(pos))
    }

    /// All subfields, in source order.
    #[must_use]
    pub fn subfields(&self) -> &[Subfield] {
        &self.subfields
    }

    /// Subfields matching `pattern`, in source order.
    #[must_use]
    pub fn get_subfields(&self, pattern: &Pattern) -> Vec<&Subfield> {
        self.subfields.iter().filter(|sf| sf.matches(pattern)).collect()
    }

    /// The first subfield with the given code.
    #[must_use]
    pub fn get_subfield(&self, code: char) -> Option<&Subfield> {
        self.subfields.iter().find(|sf| sf.code == code)
    }

    /// True if any subfield's data matches `pattern`.
    #[must_use]
    pub fn find(&self, pattern: &Regex) -> bool {
        self.subfields.iter().any(|sf| sf.find(pattern))
    }

    /// Concatenate the data of every subfield matching `pattern`, in source
    /// order, inserting `padding_char` between consecutive matches.
    ///
    /// The source this model is adapted from appended the padding character
    /// by mistake — the data of every matched subfield after the first was
    /// effectively duplicated instead of separated. Here the padding
    /// character is inserted strictly *between* matches and never after the
    /// last one.
    #[must_use]
    pub fn get_subfields_as_string(&self, pattern: &Pattern, padding_char: char) -> String {
        let mut result = String::new();
        let mut first = true;
        for sf in self.subfields.iter().filter(|sf| sf.matches(pattern)) {
            if !first {
                result.push(padding_char);
            }
            result.push_str(&sf.data);
            first = false;
        }
        result
    }
}

impl std::fmt::Display for DataField {
    /// `"TAG II subfields…"`, each subfield rendered as `"$" + code + data`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}{}", self.tag, self.indicator1, self.indicator2)?;
        for sf in &self.subfields {
            write!(f, "${}{}", sf.code, sf.data)?;
        }
        Ok(())
    }
}

fn validate_control_tag(tag: &str) -> Result<()> {
    let n = parse_tag_digits(tag)?;
    if n >= 10 {
        return Err(MarcError::InvalidTag(format!(
            "control field tag must be numerically less than 010, got {tag}"
        )));
    }
    Ok(())
}

fn validate_data_tag(tag: &str) -> Result<()> {
    let n = parse_tag_digits(tag)?;
    if n < 10 {
        return Err(MarcError::InvalidTag(format!(
            "data field tag must be numerically at least 010, got {tag}"
        )));
    }
    Ok(())
}

fn parse_tag_digits(tag: &str) -> Result<u32> {
    if tag.len() != 3 || !tag.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MarcError::InvalidTag(format!(
            "tag must be exactly 3 ASCII digits, got {tag:?}"
        )));
    }
    Ok(tag.parse().expect("validated ASCII digits"))
}

/// A field in a record: either a [`ControlField`] or a [`DataField`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    /// A control field (tag below 010).
    Control(ControlField),
    /// A data field (tag 010 and above).
    Data(DataField),
}

impl Field {
    /// The field's tag, regardless of variant.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Field::Control(f) => f.tag(),
            Field::Data(f) => f.tag(),
        }
    }

    /// This field as a [`ControlField`], if it is one.
    #[must_use]
    pub fn as_control(&self) -> Option<&ControlField> {
        match self {
            Field::Control(f) => Some(f),
            Field::Data(_) => None,
        }
    }

    /// This field as a [`DataField`], if it is one.
    #[must_use]
    pub fn as_data(&self) -> Option<&DataField> {
        match self {
            Field::Data(f) => Some(f),
            Field::Control(_) => None,
        }
    }

    /// This field as a mutable [`DataField`], if it is one.
    pub fn as_data_mut(&mut self) -> Option<&mut DataField> {
        match self {
            Field::Data(f) => Some(f),
            Field::Control(_) => None,
        }
    }
}

/// A MARC bibliographic record: a leader plus an ordered sequence of fields.
///
/// Fields are kept in the order they were added (which, when built by the
/// reader, is directory order) rather than grouped by tag. This makes
/// `get_fields` and `get_field` linear scans, which is the appropriate
/// trade-off for MARC records, which rarely exceed a few dozen fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    leader: Leader,
    fields: Vec<Field>,
}

impl Record {
    /// Create a new, empty record with the given leader.
    #[must_use]
    pub fn new(leader: Leader) -> Self {
        Record {
            leader,
            fields: Vec::new(),
        }
    }

    /// The record's leader.
    #[must_use]
    pub fn leader(&self) -> &Leader {
        &self.leader
    }

    /// Replace the record's leader.
    pub fn set_leader(&mut self, leader: Leader) {
        self.leader = leader;
    }

    /// Append a field to the end of the record.
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Remove the first field equal to `field` by identity, returning it if
    /// one was found.
    pub fn remove_field(&mut self, field: &Field) -> Option<Field> {
        let pos = self.fields.iter().position(|f| f == field)?;
        Some(self.fields.remove(pos))
    }

    /// All fields, in directory order.
    #[must_use]
    pub fn get_fields(&self) -> &[Field] {
        &self.fields
    }

    /// Fields with the given tag, in directory order.
    pub fn fields_by_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Field> + 'a {
        self.fields.iter().filter(move |f| f.tag() == tag)
    }

    /// The first field with the given tag.
    #[must_use]
    pub fn get_field(&self, tag: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.tag() == tag)
    }

    /// The record control number: the data of the first control field
    /// tagged `001`, if present.
    #[must_use]
    pub fn get_control_number_field(&self) -> Option<&str> {
        self.fields.iter().find_map(|f| match f {
            Field::Control(cf) if cf.tag() == "001" => Some(cf.data()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leader() -> Leader {
        Leader {
            record_length: 0,
            record_status: 'n',
            record_type: 'a',
            bibliographic_level: 'm',
            control_record_type: ' ',
            character_coding: ' ',
            indicator_count: 2,
            subfield_code_count: 2,
            data_base_address: 0,
            encoding_level: ' ',
            cataloging_form: 'a',
            multipart_level: ' ',
            entry_map: "4500".to_string(),
        }
    }

    #[test]
    fn control_field_rejects_data_range_tag() {
        assert!(ControlField::new("245", "x").is_err());
        assert!(ControlField::new("001", "x").is_ok());
    }

    #[test]
    fn data_field_rejects_control_range_tag() {
        assert!(DataField::new("008", '0', '0').is_err());
        assert!(DataField::new("245", '1', '0').is_ok());
    }

    #[test]
    fn tag_must_be_three_ascii_digits() {
        assert!(matches!(
            ControlField::new("1", "x"),
            Err(MarcError::InvalidTag(_))
        ));
        assert!(matches!(
            DataField::new("24X", '1', '0'),
            Err(MarcError::InvalidTag(_))
        ));
    }

    #[test]
    fn record_preserves_directory_order_across_mixed_tags() {
        let mut record = Record::new(leader());
        record.add_field(Field::Control(ControlField::new("001", "id1").unwrap()));

        let mut f650a = DataField::new("650", ' ', '0').unwrap();
        f650a.add_subfield(Subfield::new('a', "Zebras"));
        record.add_field(Field::Data(f650a));

        record.add_field(Field::Control(ControlField::new("003", "src").unwrap()));

        let mut f650b = DataField::new("650", ' ', '0').unwrap();
        f650b.add_subfield(Subfield::new('a', "Aardvarks"));
        record.add_field(Field::Data(f650b));

        let tags: Vec<&str> = record.get_fields().iter().map(Field::tag).collect();
        assert_eq!(tags, vec!["001", "650", "003", "650"]);

        let subjects: Vec<&str> = record
            .fields_by_tag("650")
            .filter_map(Field::as_data)
            .filter_map(|f| f.get_subfield('a'))
            .map(Subfield::data)
            .collect();
        assert_eq!(subjects, vec!["Zebras", "Aardvarks"]);
    }

    #[test]
    fn get_control_number_field_finds_001() {
        let mut record = Record::new(leader());
        record.add_field(Field::Control(ControlField::new("003", "src").unwrap()));
        record.add_field(Field::Control(ControlField::new("001", "12345").unwrap()));
        assert_eq!(record.get_control_number_field(), Some("12345"));
    }

    #[test]
    fn get_control_number_field_is_none_when_absent() {
        let record = Record::new(leader());
        assert_eq!(record.get_control_number_field(), None);
    }

    #[test]
    fn get_subfields_with_charset_pattern() {
        let mut field = DataField::new("650", ' ', '0').unwrap();
        field.add_subfield(Subfield::new('a', "Topic"));
        field.add_subfield(Subfield::new('x', "Subdivision"));
        field.add_subfield(Subfield::new('2', "lcsh"));

        let pattern = Pattern::codes(&['a', 'x']);
        let matched: Vec<&str> = field
            .get_subfields(&pattern)
            .into_iter()
            .map(Subfield::data)
            .collect();
        assert_eq!(matched, vec!["Topic", "Subdivision"]);
    }

    #[test]
    fn get_subfields_with_all_pattern_returns_every_subfield_in_order() {
        let mut field = DataField::new("650", ' ', '0').unwrap();
        field.add_subfield(Subfield::new('a', "Topic"));
        field.add_subfield(Subfield::new('x', "Subdivision"));

        let matched = field.get_subfields(&Pattern::All);
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].code(), 'a');
        assert_eq!(matched[1].code(), 'x');
    }

    #[test]
    fn get_subfields_with_regex_pattern() {
        let mut field = DataField::new("650", ' ', '0').unwrap();
        field.add_subfield(Subfield::new('a', "Topic"));
        field.add_subfield(Subfield::new('x', "Subdivision"));
        field.add_subfield(Subfield::new('z', "Geographic"));

        let pattern = Pattern::regex("[xz]").unwrap();
        let matched: Vec<char> = field
            .get_subfields(&pattern)
            .into_iter()
            .map(Subfield::code)
            .collect();
        assert_eq!(matched, vec!['x', 'z']);
    }

    #[test]
    fn get_subfields_as_string_joins_with_padding_between_not_after() {
        let mut field = DataField::new("650", ' ', '0').unwrap();
        field.add_subfield(Subfield::new('a', "Topic"));
        field.add_subfield(Subfield::new('x', "Sub1"));
        field.add_subfield(Subfield::new('x', "Sub2"));

        let joined = field.get_subfields_as_string(&Pattern::codes(&['a', 'x']), '-');
        assert_eq!(joined, "Topic-Sub1-Sub2");
    }

    #[test]
    fn get_subfields_as_string_single_match_has_no_padding() {
        let mut field = DataField::new("245", '1', '0').unwrap();
        field.add_subfield(Subfield::new('a', "Title"));

        let joined = field.get_subfields_as_string(&Pattern::codes(&['a']), ' ');
        assert_eq!(joined, "Title");
    }

    #[test]
    fn get_subfields_as_string_no_match_is_empty() {
        let field = DataField::new("245", '1', '0').unwrap();
        let joined = field.get_subfields_as_string(&Pattern::codes(&['a']), ' ');
        assert_eq!(joined, "");
    }

    #[test]
    fn insert_and_remove_subfield() {
        let mut field = DataField::new("245", '1', '0').unwrap();
        field.add_subfield(Subfield::new('a', "Title"));
        field.add_subfield(Subfield::new('c', "Author"));
        let subtitle = Subfield::new('b', "Subtitle");
        field.insert_subfield(1, subtitle.clone());

        let codes: Vec<char> = field.subfields().iter().map(Subfield::code).collect();
        assert_eq!(codes, vec!['a', 'b', 'c']);

        let removed = field.remove_subfield(&subtitle).unwrap();
        assert_eq!(removed.code(), 'b');
        let codes: Vec<char> = field.subfields().iter().map(Subfield::code).collect();
        assert_eq!(codes, vec!['a', 'c']);

        assert!(field.remove_subfield(&subtitle).is_none());
    }

    #[test]
    fn remove_field_deletes_by_identity_not_position() {
        let mut record = Record::new(leader());
        let f001 = Field::Control(ControlField::new("001", "id1").unwrap());
        let f003 = Field::Control(ControlField::new("003", "src").unwrap());
        record.add_field(f001.clone());
        record.add_field(f003.clone());

        let removed = record.remove_field(&f001).unwrap();
        assert_eq!(removed.tag(), "001");
        let tags: Vec<&str> = record.get_fields().iter().map(Field::tag).collect();
        assert_eq!(tags, vec!["003"]);

        assert!(record.remove_field(&f001).is_none());
    }

    #[test]
    fn find_matches_subfield_data_not_code() {
        let mut field = DataField::new("650", ' ', '0').unwrap();
        field.add_subfield(Subfield::new('a', "Dragons"));
        field.add_subfield(Subfield::new('x', "Fiction"));

        let pattern = Regex::new("Fic").unwrap();
        assert!(field.find(&pattern));

        let no_match = Regex::new("Nonfiction").unwrap();
        assert!(!field.find(&no_match));

        assert!(!field.get_subfield('a').unwrap().find(&pattern));
        assert!(field.get_subfield('x').unwrap().find(&pattern));
    }

    #[test]
    fn data_field_display_renders_tag_indicators_and_subfields() {
        let mut field = DataField::new("245", '1', '0').unwrap();
        field.add_subfield(Subfield::new('a', "Summerland /"));
        field.add_subfield(Subfield::new('c', "Michael Chabon."));

        assert_eq!(
            field.to_string(),
            "245 10$aSummerland /$cMichael Chabon."
        );
    }

    #[test]
    fn set_tag_validates_new_tag() {
        let mut field = DataField::new("245", '1', '0').unwrap();
        assert!(field.set_tag("008").is_err());
        assert!(field.set_tag("246").is_ok());
        assert_eq!(field.tag(), "246");
    }
}
