use anyhow::{anyhow, Result};
use chrono::NaiveDate;

/// Parses an ISO calendar date (YYYY-MM-DD). Rejected before any run starts.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid date '{}'. Expected YYYY-MM-DD.", input))
}
