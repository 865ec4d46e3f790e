// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar rules for recurring service.
//!
//! These functions decide whether a candidate date is a service day for a
//! subscription. They are pure: the anchor date and every candidate are
//! supplied by the caller, and nothing here reads a clock.
//!
//! ## Rules
//!
//! - `OneTime` never recurs.
//! - With a preferred weekday, a date qualifies iff it falls on that weekday.
//!   Frequency plays no part in day selection in that case.
//! - Without a preferred weekday, Sundays never qualify.
//! - `Weekly`: every other day qualifies.
//! - `Biweekly`: days in weeks whose offset from the anchor is even, where
//!   the week offset is `floor(days_between(candidate, anchor) / 7)`.
//! - `Monthly`: exactly one date per calendar month, see
//!   [`monthly_service_date`].

use crate::types::Frequency;
use time::{Date, Duration, Month, Weekday};

/// Largest distance, in days, between a monthly visit and the anchor day-of-month.
pub const MONTHLY_TOLERANCE_DAYS: u8 = 3;

/// Returns whether `candidate` is a service day.
///
/// # Arguments
///
/// * `candidate` - The date being considered
/// * `frequency` - The subscription's frequency
/// * `anchor` - The subscription's anchor (creation) date
/// * `preferred_day` - The subscription's preferred weekday, if any
#[must_use]
pub fn is_service_day(
    candidate: Date,
    frequency: Frequency,
    anchor: Date,
    preferred_day: Option<Weekday>,
) -> bool {
    if !frequency.is_recurring() {
        return false;
    }

    if let Some(day) = preferred_day {
        return candidate.weekday() == day;
    }

    if candidate.weekday() == Weekday::Sunday {
        return false;
    }

    match frequency {
        Frequency::Weekly => true,
        Frequency::Biweekly => matches_anchor_week_parity(candidate, anchor),
        Frequency::Monthly => {
            monthly_service_date(candidate.year(), candidate.month(), anchor.day())
                == Some(candidate)
        }
        Frequency::OneTime => false,
    }
}

/// Returns whether `candidate` lies in a week of the same parity as `anchor`.
///
/// Dates before the anchor use floored division, so the week immediately
/// before the anchor week has odd parity.
#[must_use]
pub fn matches_anchor_week_parity(candidate: Date, anchor: Date) -> bool {
    let days_between: i64 = (candidate - anchor).whole_days();
    days_between.div_euclid(7).rem_euclid(2) == 0
}

/// Returns the number of days in the given month.
#[must_use]
pub fn days_in_month(year: i32, month: Month) -> u8 {
    let (next_year, next_month) = if month == Month::December {
        (year + 1, Month::January)
    } else {
        (year, month.next())
    };

    Date::from_calendar_date(next_year, next_month, 1)
        .ok()
        .and_then(Date::previous_day)
        .map_or(28, Date::day)
}

/// Returns the single monthly service date for `year`/`month`.
///
/// The target day is the anchor day-of-month clamped to the length of the
/// month (an anchor on the 31st lands on the 30th of April and the 28th or
/// 29th of February). If the target falls on a Sunday the nearest non-Sunday
/// within [`MONTHLY_TOLERANCE_DAYS`] of the target is used; ties favor the
/// earlier date, so a Sunday target moves to the Saturday before it unless
/// that would leave the month.
///
/// Returns `None` only when no valid date can be constructed.
#[must_use]
pub fn monthly_service_date(year: i32, month: Month, anchor_day: u8) -> Option<Date> {
    let length: u8 = days_in_month(year, month);
    let target_day: u8 = anchor_day.clamp(1, length);
    let target: Date = Date::from_calendar_date(year, month, target_day).ok()?;

    if target.weekday() != Weekday::Sunday {
        return Some(target);
    }

    (1..=MONTHLY_TOLERANCE_DAYS).find_map(|distance| {
        let earlier = target_day
            .checked_sub(distance)
            .filter(|day| *day >= 1)
            .and_then(|day| Date::from_calendar_date(year, month, day).ok());
        let later = target_day
            .checked_add(distance)
            .filter(|day| *day <= length)
            .and_then(|day| Date::from_calendar_date(year, month, day).ok());

        earlier
            .into_iter()
            .chain(later)
            .find(|date| date.weekday() != Weekday::Sunday)
    })
}

/// Lists every service day in the inclusive range `from..=through`.
///
/// Returns an empty list when `through` precedes `from`.
#[must_use]
pub fn service_days_between(
    from: Date,
    through: Date,
    frequency: Frequency,
    anchor: Date,
    preferred_day: Option<Weekday>,
) -> Vec<Date> {
    let mut days: Vec<Date> = Vec::new();
    let mut current: Date = from;

    while current <= through {
        if is_service_day(current, frequency, anchor, preferred_day) {
            days.push(current);
        }
        match current.checked_add(Duration::days(1)) {
            Some(next) => current = next,
            None => break,
        }
    }

    days
}
