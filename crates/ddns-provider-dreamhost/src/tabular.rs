//! Tab-separated response decoder
//!
//! DreamHost answers list commands with a header line followed by data
//! lines, fields separated by `\t` and lines by `\n`. There is no quoting
//! or escaping, so this is deliberately not a CSV reader.
//!
//! Decoding never fails:
//! - lines with fewer than two fields (blank or trailing lines) are skipped
//! - a line shorter than the header maps only the fields it has
//! - fields beyond the last header are dropped

use std::collections::HashMap;

/// One decoded data line, keyed by header name
pub type Row = HashMap<String, String>;

/// Decode a header-first, tab-separated body into rows, in input order
pub fn decode(text: &str) -> Vec<Row> {
    let mut lines = text.split('\n');

    let headers: Vec<&str> = match lines.next() {
        Some(line) => line.split('\t').collect(),
        None => return Vec::new(),
    };

    lines
        .filter_map(|line| {
            let values: Vec<&str> = line.split('\t').collect();
            if values.len() < 2 {
                return None;
            }

            Some(
                headers
                    .iter()
                    .zip(values)
                    .map(|(header, value)| (header.to_string(), value.to_string()))
                    .collect(),
            )
        })
        .collect()
}
