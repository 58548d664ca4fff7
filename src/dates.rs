// Expansion of configured date ranges into per-day search dates

use chrono::NaiveDate;
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug)]
pub enum DateRangeError {
    #[error("invalid date '{input}': {source}")]
    Parse {
        input: String,
        source: chrono::ParseError,
    },
}

fn parse_day(input: &str) -> Result<NaiveDate, DateRangeError> {
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|source| DateRangeError::Parse {
        input: input.to_string(),
        source,
    })
}

// Expand an inclusive start/end pair into one `YYYY-MM-DD` string per day.
// A start after the end yields an empty range rather than an error.
pub fn expand_range(start: &str, end: &str) -> Result<Vec<String>, DateRangeError> {
    let start = parse_day(start)?;
    let end = parse_day(end)?;

    Ok(start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|day| day.format(DATE_FORMAT).to_string())
        .collect())
}
