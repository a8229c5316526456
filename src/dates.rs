use chrono::NaiveDate;
use itertools::Itertools;

use crate::errors::{DownloadError, Result};

/// Parses a `YYYY-MM-DD` date.
pub fn parse_iso_date(date: &str) -> Result<NaiveDate> {
    let (year, month, day) = date
        .split('-')
        .collect_tuple()
        .ok_or_else(|| DownloadError::DateFormat(date.into()))?;
    NaiveDate::from_ymd_opt(year.parse()?, month.parse()?, day.parse()?)
        .ok_or_else(|| DownloadError::InvalidDate(date.into()))
}

/// Every date from `start_date` to `end_date`, both included, ascending.
///
/// Empty when `end_date` is before `start_date`.
pub fn expand_date_range(start_date: &str, end_date: &str) -> Result<Vec<NaiveDate>> {
    let start = parse_iso_date(start_date)?;
    let end = parse_iso_date(end_date)?;
    Ok(start.iter_days().take_while(|date| *date <= end).collect())
}
