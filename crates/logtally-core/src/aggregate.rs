//! Aggregator — restricts records to the codes of interest and counts them.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use crate::normalizer::FirstMessages;
use crate::types::{CodeTally, Record, ReportRow};

/// Codes reported on. The list is fixed; `20045` appears twice and that is
/// harmless because membership is a set test.
pub const INTERESTING_CODES: &[&str] = &[
    "20042", "20039", "20009", "20008", "20045", "20031", "2506", "20034", "20005", "20045",
    "20012", "20043", "20040", "2002", "20054", "2006", "9007", "20055", "20041", "20038",
    "20025", "20013",
];

/// Set of codes a record must carry to be counted.
#[derive(Debug, Clone)]
pub struct AllowList {
    codes: HashSet<String>,
}

impl AllowList {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: codes.into_iter().map(Into::into).collect(),
        }
    }

    /// The built-in list, [`INTERESTING_CODES`].
    pub fn builtin() -> Self {
        Self::new(INTERESTING_CODES.iter().copied())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    /// Number of distinct codes.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for AllowList {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Keep only records whose code is allowed. Order is preserved.
pub fn filter_codes<'a>(records: &'a [Record], allow: &AllowList) -> Vec<&'a Record> {
    records.iter().filter(|r| allow.contains(&r.code)).collect()
}

/// Count allowed records per code, pairing each count with the first message
/// seen for that code across the whole run.
///
/// `first_messages` must have been built from the unfiltered stream so that
/// "first" refers to processing order, not to the filtered subset.
pub fn tally(
    records: &[Record],
    first_messages: &FirstMessages,
    allow: &AllowList,
) -> BTreeMap<String, CodeTally> {
    let mut tallies: BTreeMap<String, CodeTally> = BTreeMap::new();
    for record in filter_codes(records, allow) {
        tallies
            .entry(record.code.clone())
            .or_insert_with(|| CodeTally {
                count: 0,
                first_message: first_messages
                    .get(&record.code)
                    .unwrap_or(record.message.as_str())
                    .to_string(),
            })
            .count += 1;
    }
    tallies
}

/// Ascending code order: numeric codes by value first, then every other
/// code lexicographically.
pub fn compare_codes(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Turn tallies into report rows in ascending code order.
pub fn report_rows(tallies: BTreeMap<String, CodeTally>) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = tallies
        .into_iter()
        .filter(|(_, t)| t.count > 0)
        .map(|(code, t)| ReportRow {
            code,
            message: t.first_message,
            count: t.count,
        })
        .collect();
    rows.sort_by(|a, b| compare_codes(&a.code, &b.code));
    rows
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
