//! Report date parsing.
//!
//! The date must be typed as `DD.MM.YYYY` with zero-padded day and month and
//! must name a real calendar day. The text as typed is what gets stored.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

/// Display and storage format for report dates.
pub const DATE_FORMAT: &str = "%d.%m.%Y";

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").expect("date pattern is a valid regex")
});

/// Why a typed date was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("{0:?} is not in DD.MM.YYYY form")]
    Format(String),

    #[error("{0:?} is not a calendar date")]
    Calendar(String),
}

/// Parse a manually typed report date.
pub fn parse_report_date(text: &str) -> Result<NaiveDate, DateError> {
    if !DATE_PATTERN.is_match(text) {
        return Err(DateError::Format(text.to_string()));
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|_| DateError::Calendar(text.to_string()))
}

/// Format a date the way reports store it.
pub fn format_report_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
