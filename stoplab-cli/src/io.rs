//! CSV input and output for the CLI.
//!
//! Input is any header CSV with a `close` column. An `entry` column
//! (`true`/`false`/`1`/`0`) is used when present; a `date` column
//! (YYYY-MM-DD) is checked for strictly increasing order. All input columns
//! are echoed to the output next to the computed ones.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::io::{Read, Write};
use std::path::Path;
use stoplab_core::ExitSignal;

/// A price CSV held in memory.
#[derive(Debug, Clone)]
pub struct PriceTable {
    pub headers: csv::StringRecord,
    pub rows: Vec<csv::StringRecord>,
    pub closes: Vec<f64>,
    /// Parsed `entry` column, if the input has one.
    pub entries: Option<Vec<bool>>,
}

impl PriceTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

fn column(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
}

fn parse_flag(raw: &str, row: usize) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" => Ok(true),
        "0" | "false" | "f" | "no" | "" => Ok(false),
        other => bail!("row {row}: invalid entry flag '{other}'"),
    }
}

pub fn read_price_csv(path: &Path) -> Result<PriceTable> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open price CSV {}", path.display()))?;
    read_price_table(file).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn read_price_table<R: Read>(reader: R) -> Result<PriceTable> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers = rdr.headers()?.clone();

    let Some(close_col) = column(&headers, "close") else {
        bail!("missing 'close' column (headers: {:?})", headers);
    };
    let entry_col = column(&headers, "entry");
    let date_col = column(&headers, "date");

    let mut rows = Vec::new();
    let mut closes = Vec::new();
    let mut entries = entry_col.map(|_| Vec::new());
    let mut prev_date: Option<NaiveDate> = None;

    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let raw_close = record.get(close_col).unwrap_or("").trim();
        let close: f64 = raw_close
            .parse()
            .with_context(|| format!("row {i}: invalid close '{raw_close}'"))?;
        closes.push(close);

        if let (Some(col), Some(flags)) = (entry_col, entries.as_mut()) {
            flags.push(parse_flag(record.get(col).unwrap_or(""), i)?);
        }

        if let Some(col) = date_col {
            let raw_date = record.get(col).unwrap_or("").trim();
            let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
                .with_context(|| format!("row {i}: invalid date '{raw_date}'"))?;
            if prev_date.is_some_and(|prev| date <= prev) {
                bail!("row {i}: dates must be strictly increasing ({raw_date})");
            }
            prev_date = Some(date);
        }

        rows.push(record);
    }

    Ok(PriceTable {
        headers,
        rows,
        closes,
        entries,
    })
}

/// Indices of input columns to echo, skipping any named in `replaced`.
fn kept_columns(headers: &csv::StringRecord, replaced: &[&str]) -> Vec<usize> {
    headers
        .iter()
        .enumerate()
        .filter(|(_, h)| !replaced.iter().any(|r| h.trim().eq_ignore_ascii_case(r)))
        .map(|(j, _)| j)
        .collect()
}

fn kept_fields(record: &csv::StringRecord, kept: &[usize]) -> Vec<String> {
    kept.iter()
        .map(|&j| record.get(j).unwrap_or("").to_string())
        .collect()
}

/// Write the input columns plus an `entry` column (when generated) and the
/// `exit` / `exit_reason` columns. Input columns with those names are replaced.
pub fn write_exit_table<W: Write>(
    writer: W,
    table: &PriceTable,
    generated_entries: Option<&[bool]>,
    exits: &ExitSignal,
) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let replaced: &[&str] = if generated_entries.is_some() {
        &["entry", "exit", "exit_reason"]
    } else {
        &["exit", "exit_reason"]
    };
    let kept = kept_columns(&table.headers, replaced);

    let mut header = kept_fields(&table.headers, &kept);
    if generated_entries.is_some() {
        header.push("entry".to_string());
    }
    header.push("exit".to_string());
    header.push("exit_reason".to_string());
    wtr.write_record(&header)?;

    for (i, row) in table.rows.iter().enumerate() {
        let mut out = kept_fields(row, &kept);
        if let Some(entries) = generated_entries {
            out.push(u8::from(entries[i]).to_string());
        }
        out.push(u8::from(exits.exits[i]).to_string());
        out.push(
            exits.reasons[i]
                .map(|r| r.as_str().to_string())
                .unwrap_or_default(),
        );
        wtr.write_record(&out)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the input columns plus a generated `entry` column.
pub fn write_entry_table<W: Write>(writer: W, table: &PriceTable, entries: &[bool]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let kept = kept_columns(&table.headers, &["entry"]);
    let mut header = kept_fields(&table.headers, &kept);
    header.push("entry".to_string());
    wtr.write_record(&header)?;

    for (i, row) in table.rows.iter().enumerate() {
        let mut out = kept_fields(row, &kept);
        out.push(u8::from(entries[i]).to_string());
        wtr.write_record(&out)?;
    }

    wtr.flush()?;
    Ok(())
}
