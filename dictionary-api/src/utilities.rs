use chrono::NaiveDate;

use crate::error::ApiError;

/// Parses an optional 1-based page coordinate, falling back to `default`.
pub fn parse_positive(name: &'static str, raw: Option<&str>, default: u32) -> Result<u32, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(default);
    };
    match raw.parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ApiError::invalid_param(name, "expected a positive integer")),
    }
}

/// A result cap; anything but a positive integer means no cap.
pub fn parse_limit(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|raw| raw.trim().parse::<i64>().ok())
        .filter(|limit| *limit > 0)
        .and_then(|limit| usize::try_from(limit).ok())
}

pub fn parse_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, ApiError> {
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        None => Ok(today),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| ApiError::invalid_param("date", "expected a calendar date as YYYY-MM-DD")),
    }
}
