// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::entities::{NewSuggestion, ScheduleState};
use crate::error::DomainError;
use crate::types::SuggestionType;

/// Smallest supported look-ahead window.
pub const MIN_LOOK_AHEAD_DAYS: u32 = 1;

/// Largest supported look-ahead window.
pub const MAX_LOOK_AHEAD_DAYS: u32 = 366;

/// Validates a subscription or job price.
///
/// # Errors
///
/// Returns an error if the price is negative.
pub const fn validate_price(price_cents: i64) -> Result<(), DomainError> {
    if price_cents < 0 {
        return Err(DomainError::InvalidPrice { cents: price_cents });
    }
    Ok(())
}

/// Validates a look-ahead window length.
///
/// # Errors
///
/// Returns an error if the window is outside `1..=366` days.
pub const fn validate_look_ahead(days: u32) -> Result<(), DomainError> {
    if days < MIN_LOOK_AHEAD_DAYS || days > MAX_LOOK_AHEAD_DAYS {
        return Err(DomainError::InvalidLookAhead { days });
    }
    Ok(())
}

/// Validates a suggestion before it is recorded.
///
/// A suggestion that targets a subscription must propose something to
/// apply unless it is purely informational.
///
/// # Errors
///
/// Returns `DomainError::EmptySuggestion` if an actionable suggestion has an
/// empty suggested state.
pub const fn validate_new_suggestion(suggestion: &NewSuggestion) -> Result<(), DomainError> {
    let suggested: &ScheduleState = &suggestion.suggested_state;
    let actionable: bool = !matches!(suggestion.suggestion_type, SuggestionType::Informational);

    if actionable && suggestion.subscription_id.is_some() && suggested.is_empty() {
        return Err(DomainError::EmptySuggestion);
    }
    Ok(())
}
