//! Command-line interface.

use std::path::PathBuf;

use clap::Parser;

use crate::error::{AppError, Result};
use crate::types::{Filter, FilterMap, FilterValue};

/// Filter a JSON dataset by category in the terminal.
#[derive(Debug, Parser)]
#[command(name = "catfilter", version, about)]
pub struct Cli {
    /// JSON file holding an array of records.
    pub data: PathBuf,

    /// Column whose values are offered in the category filter.
    #[arg(short, long)]
    pub column: Option<String>,

    /// Keep records whose COLUMN contains TEXT, ignoring case.
    #[arg(long = "text", value_name = "COLUMN=TEXT")]
    pub text_filters: Vec<String>,

    /// Keep records whose COLUMN lies within MIN..MAX, inclusive.
    #[arg(long = "range", value_name = "COLUMN=MIN..MAX")]
    pub range_filters: Vec<String>,

    /// Read settings from this file instead of the default location.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write log files to this directory.
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    /// Collect the `--text` and `--range` options into a filter map.
    ///
    /// A later filter on the same column replaces an earlier one.
    pub fn filters(&self) -> Result<FilterMap<FilterValue>> {
        let text = self.text_filters.iter().map(|raw| parse_text_filter(raw));
        let range = self.range_filters.iter().map(|raw| parse_range_filter(raw));

        text.chain(range)
            .map(|filter| filter.map(Filter::into_entry))
            .collect()
    }
}

fn split_column(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once('=') {
        Some((column, value)) if !column.trim().is_empty() => Ok((column.trim(), value)),
        _ => Err(AppError::InvalidFilter(raw.to_string())),
    }
}

/// Parse `COLUMN=TEXT` into a text filter.
pub fn parse_text_filter(raw: &str) -> Result<Filter<FilterValue>> {
    let (column, text) = split_column(raw)?;
    Ok(Filter::new(column, FilterValue::Text(text.to_string())))
}

/// Parse `COLUMN=MIN..MAX` into a range filter.
pub fn parse_range_filter(raw: &str) -> Result<Filter<FilterValue>> {
    let invalid = || AppError::InvalidFilter(raw.to_string());

    let (column, range) = split_column(raw)?;
    let (low, high) = range.split_once("..").ok_or_else(invalid)?;
    let low: f64 = low.trim().parse().map_err(|_| invalid())?;
    let high: f64 = high.trim().parse().map_err(|_| invalid())?;
    if low > high {
        return Err(invalid());
    }

    Ok(Filter::new(column, FilterValue::Range((low, high))))
}
