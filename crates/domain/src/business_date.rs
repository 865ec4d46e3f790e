// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Business-date resolution and ISO date text handling.
//!
//! The engine never reads a clock. Callers resolve "today" once, in the
//! organization's declared timezone, and pass it down explicitly.

use crate::error::DomainError;
use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;
use time::{Date, Month};

/// Resolves the calendar date of `instant` in the named IANA timezone.
///
/// # Errors
///
/// Returns an error if the timezone is unknown or the local date cannot be
/// represented.
pub fn business_date(timezone: &str, instant: DateTime<Utc>) -> Result<Date, DomainError> {
    let tz: Tz = timezone
        .parse()
        .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))?;

    let local = instant.with_timezone(&tz).date_naive();

    let month_number: u8 =
        u8::try_from(local.month()).map_err(|_| DomainError::DateArithmeticOverflow {
            operation: String::from("converting local month"),
        })?;
    let month: Month =
        Month::try_from(month_number).map_err(|e| DomainError::DateArithmeticOverflow {
            operation: format!("converting local month: {e}"),
        })?;
    let day: u8 = u8::try_from(local.day()).map_err(|_| DomainError::DateArithmeticOverflow {
        operation: String::from("converting local day"),
    })?;

    Date::from_calendar_date(local.year(), month, day).map_err(|e| {
        DomainError::DateArithmeticOverflow {
            operation: format!("building business date: {e}"),
        }
    })
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the text is not a valid date.
pub fn parse_iso_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(
        value.trim(),
        time::macros::format_description!("[year]-[month]-[day]"),
    )
    .map_err(|e| DomainError::DateParseError {
        date_string: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_iso_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}
