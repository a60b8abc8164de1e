//! Normalizer — splits logical entries into structured [`Record`] values.
//!
//! Each entry is cleaned before splitting: doubled tabs collapse to one and
//! `[SpurN]` track markers are removed outright. The cleaned entry is split
//! on tabs; fewer than four segments means the entry is not a structured log
//! line and it is dropped without complaint.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::Record;

/// Minimum number of tab-separated segments a structured entry carries.
pub const MIN_SEGMENTS: usize = 4;

static TRACK_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[Spur[0-9]\]").expect("track-marker pattern is valid"));

/// Collapse doubled tabs and strip track markers.
///
/// The tab collapse is a single non-overlapping pass, so a run of three tabs
/// becomes two.
pub fn clean(entry: &str) -> String {
    let collapsed = entry.replace("\t\t", "\t");
    TRACK_MARKER.replace_all(&collapsed, "").into_owned()
}

/// Parse one logical entry. Returns `None` for entries with fewer than
/// [`MIN_SEGMENTS`] segments.
pub fn parse_entry(entry: &str) -> Option<Record> {
    let cleaned = clean(entry);
    let segments: Vec<&str> = cleaned.split('\t').collect();
    if segments.len() < MIN_SEGMENTS {
        return None;
    }

    Some(Record {
        date: segments[0].to_string(),
        source: segments[1].to_string(),
        kind: segments[2].to_string(),
        code: segments[3].to_string(),
        message: segments[segments.len() - 1].to_string(),
    })
}

/// First-seen message per code. Later records never overwrite an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirstMessages {
    by_code: HashMap<String, String>,
}

impl FirstMessages {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember `record.message` unless its code already has a message.
    pub fn observe(&mut self, record: &Record) {
        self.by_code
            .entry(record.code.clone())
            .or_insert_with(|| record.message.clone());
    }

    pub fn get(&self, code: &str) -> Option<&str> {
        self.by_code.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

/// Output of [`extract_all`].
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub records: Vec<Record>,
    pub first_messages: FirstMessages,
    /// Entries dropped for having too few segments.
    pub discarded: usize,
}

/// Parse every entry of the merged stream in order, building the
/// first-message table alongside.
pub fn extract_all<I, S>(entries: I) -> Extraction
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = Extraction::default();
    for entry in entries {
        match parse_entry(entry.as_ref()) {
            Some(record) => {
                out.first_messages.observe(&record);
                out.records.push(record);
            }
            None => out.discarded += 1,
        }
    }
    tracing::debug!(
        records = out.records.len(),
        discarded = out.discarded,
        codes = out.first_messages.len(),
        "extracted records"
    );
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    fn record(code: &str, message: &str) -> Record {
        Record {
            date: "01/02/2023 10:00:00.000".into(),
            source: "X".into(),
            kind: "INFO".into(),
            code: code.into(),
            message: message.into(),
        }
    }

    #[test]
    fn parses_five_field_entry() {
        let rec = parse_entry("01/02/2023 10:00:00.000\tX\tINFO\t20042\tfirst msg").unwrap();
        assert_eq!(
            rec,
            Record {
                date: "01/02/2023 10:00:00.000".into(),
                source: "X".into(),
                kind: "INFO".into(),
                code: "20042".into(),
                message: "first msg".into(),
            }
        );
    }

    #[test]
    fn message_is_last_segment_not_fifth() {
        let rec = parse_entry("d\ts\tk\t2506\tmiddle\tanother\ttail text").unwrap();
        assert_eq!(rec.code, "2506");
        assert_eq!(rec.message, "tail text");
    }

    #[test]
    fn four_segments_use_code_as_message() {
        let rec = parse_entry("d\ts\tk\t9007").unwrap();
        assert_eq!(rec.code, "9007");
        assert_eq!(rec.message, "9007");
    }

    #[rstest]
    #[case::empty("")]
    #[case::one("01/02/2023 10:00:00.000 no tabs at all")]
    #[case::three("d\ts\tk")]
    #[case::collapsed_to_three("d\t\ts\t\tk")]
    fn short_entries_are_discarded(#[case] entry: &str) {
        assert_eq!(parse_entry(entry), None);
    }

    #[test]
    fn doubled_tabs_collapse_before_split() {
        let rec = parse_entry("d\t\ts\tk\t\t20042\tmsg").unwrap();
        assert_eq!(rec.source, "s");
        assert_eq!(rec.code, "20042");
    }

    #[test]
    fn tab_collapse_is_single_pass() {
        assert_eq!(clean("a\t\t\tb"), "a\t\tb");
        assert_eq!(clean("a\t\t\t\tb"), "a\t\tb");
    }

    #[rstest]
    #[case("Weiche [Spur3] gestoert", "Weiche  gestoert")]
    #[case("[Spur0][Spur9]x", "x")]
    #[case("[Spur12] keeps two digits", "[Spur12] keeps two digits")]
    #[case("[spur3] is case sensitive", "[spur3] is case sensitive")]
    fn track_markers_are_removed_entirely(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(clean(input), expected);
    }

    #[test]
    fn marker_in_message_leaves_no_brackets() {
        let rec = parse_entry("d\ts\tk\t20039\tSignal [Spur3] blocked").unwrap();
        assert_eq!(rec.message, "Signal  blocked");
        assert!(!rec.message.contains('['));
    }

    #[test]
    fn first_message_wins() {
        let mut table = FirstMessages::new();
        table.observe(&record("20042", "first"));
        table.observe(&record("20042", "second"));
        table.observe(&record("2002", "other"));
        assert_eq!(table.get("20042"), Some("first"));
        assert_eq!(table.get("2002"), Some("other"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn extract_all_counts_discarded_entries() {
        let out = extract_all([
            "d\ts\tk\t20042\tone",
            "not structured",
            "d\ts\tk\t20042\ttwo",
        ]);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.discarded, 1);
        assert_eq!(out.first_messages.get("20042"), Some("one"));
    }

    proptest! {
        #[test]
        fn record_iff_four_segments(parts in proptest::collection::vec("[a-z0-9 ]{1,6}", 1..8)) {
            let entry = parts.join("\t");
            prop_assert_eq!(parse_entry(&entry).is_some(), parts.len() >= MIN_SEGMENTS);
        }
    }
}
