// Copyright 2026 Vitrine Contributors
// SPDX-License-Identifier: Apache-2.0

//! Pull links out of an uploaded spreadsheet export.
//!
//! The first row is a header. For each row a non-empty `url` cell wins,
//! then a non-empty `link` cell, then the first non-empty field.

use std::io::Read;

/// Links from a CSV document, in row order, blanks skipped.
pub fn links_from_csv<R: Read>(reader: R) -> Result<Vec<String>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let column = |wanted: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').eq_ignore_ascii_case(wanted))
    };
    let named = [column("url"), column("link")];

    let mut links = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let value = named
            .iter()
            .flatten()
            .find_map(|&idx| record.get(idx).filter(|v| !v.is_empty()))
            .or_else(|| record.iter().find(|v| !v.is_empty()));
        if let Some(v) = value {
            links.push(v.to_string());
        }
    }
    Ok(links)
}
