// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rendering of command results.

use std::fmt::Write as _;
use std::io::Write;

use clap::ValueEnum;
use fieldsched_api::{AttentionReasonInfo, WorklistItemInfo, WorklistResponse};
use serde::Serialize;

/// Output format for the worklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum WorklistFormat {
    /// Aligned columns for a terminal
    #[default]
    Table,
    /// Comma-separated values with a header row
    Csv,
    /// Pretty-printed JSON
    Json,
}

/// One CSV row of the worklist.
#[derive(Debug, Serialize)]
struct WorklistRow<'a> {
    client_id: i64,
    location_id: i64,
    subscription_id: Option<i64>,
    reason_codes: String,
    reasons: String,
    as_of: &'a str,
}

impl<'a> WorklistRow<'a> {
    fn new(item: &WorklistItemInfo, as_of: &'a str) -> Self {
        Self {
            client_id: item.client_id,
            location_id: item.location_id,
            subscription_id: item.subscription_id,
            reason_codes: join_reasons(item, |reason| reason.code.as_str()),
            reasons: join_reasons(item, |reason| reason.description.as_str()),
            as_of,
        }
    }
}

fn join_reasons<F>(item: &WorklistItemInfo, field: F) -> String
where
    F: Fn(&AttentionReasonInfo) -> &str,
{
    item.reasons.iter().map(field).collect::<Vec<&str>>().join("; ")
}

/// Writes any response as pretty-printed JSON followed by a newline.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_json<W: Write, T: Serialize>(mut writer: W, value: &T) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)
}

/// Writes the worklist as CSV.
///
/// # Errors
///
/// Returns an error if a row cannot be written.
pub fn write_worklist_csv<W: Write>(writer: W, worklist: &WorklistResponse) -> Result<(), csv::Error> {
    let mut csv_writer: csv::Writer<W> = csv::Writer::from_writer(writer);
    for item in &worklist.items {
        csv_writer.serialize(WorklistRow::new(item, &worklist.as_of))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Renders the worklist as a fixed-width table.
#[must_use]
pub fn render_worklist_table(worklist: &WorklistResponse) -> String {
    let mut out: String = format!("Worklist for {}\n", worklist.as_of);
    if worklist.items.is_empty() {
        out.push_str("Nothing needs attention.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<8} {:<10} {:<14} REASONS",
        "CLIENT", "LOCATION", "SUBSCRIPTION"
    );
    for item in &worklist.items {
        let subscription: String = item
            .subscription_id
            .map_or_else(|| String::from("-"), |id| id.to_string());
        let _ = writeln!(
            out,
            "{:<8} {:<10} {:<14} {}",
            item.client_id,
            item.location_id,
            subscription,
            join_reasons(item, |reason| reason.description.as_str())
        );
    }
    out
}
