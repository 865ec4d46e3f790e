// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Weekday;

/// Normalizes an enumeration token for lenient parsing.
///
/// `"PAST_DUE"`, `"past-due"` and `"PastDue"` all normalize to `"PASTDUE"`.
fn normalize_token(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| *c != '_' && *c != '-' && *c != ' ')
        .collect::<String>()
        .to_ascii_uppercase()
}

/// How often a subscription is serviced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Frequency {
    /// Serviced every week.
    Weekly,
    /// Serviced every other week, on the anchor date's week parity.
    Biweekly,
    /// Serviced once per calendar month near the anchor day-of-month.
    Monthly,
    /// A single visit; never recurs.
    OneTime,
}

impl Frequency {
    /// Converts this frequency to its stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "Weekly",
            Self::Biweekly => "Biweekly",
            Self::Monthly => "Monthly",
            Self::OneTime => "OneTime",
        }
    }

    /// Returns whether this frequency produces recurring visits.
    #[must_use]
    pub const fn is_recurring(&self) -> bool {
        !matches!(self, Self::OneTime)
    }
}

impl FromStr for Frequency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "WEEKLY" => Ok(Self::Weekly),
            "BIWEEKLY" => Ok(Self::Biweekly),
            "MONTHLY" => Ok(Self::Monthly),
            "ONETIME" => Ok(Self::OneTime),
            _ => Err(DomainError::InvalidFrequency(s.to_string())),
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a subscription.
///
/// Transitions are driven by billing events or staff action. `Canceled`
/// is terminal for job generation; it is only left through an explicit
/// reactivation to `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SubscriptionStatus {
    /// In good standing; jobs are generated.
    #[default]
    Active,
    /// Temporarily suspended; future jobs are voided.
    Paused,
    /// Payment failed; existing jobs are kept.
    PastDue,
    /// Cancellation scheduled at period end; existing jobs are kept.
    PendingCancel,
    /// Ended; future jobs are voided and none are generated.
    Canceled,
}

impl SubscriptionStatus {
    /// Converts this status to its stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Paused => "Paused",
            Self::PastDue => "PastDue",
            Self::PendingCancel => "PendingCancel",
            Self::Canceled => "Canceled",
        }
    }

    /// Returns whether jobs may be materialized in this state.
    #[must_use]
    pub const fn generates_jobs(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl FromStr for SubscriptionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "ACTIVE" => Ok(Self::Active),
            "PAUSED" => Ok(Self::Paused),
            "PASTDUE" => Ok(Self::PastDue),
            "PENDINGCANCEL" => Ok(Self::PendingCancel),
            "CANCELED" | "CANCELLED" => Ok(Self::Canceled),
            _ => Err(DomainError::InvalidSubscriptionStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a single dated job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum JobStatus {
    /// Planned and not yet started.
    #[default]
    Scheduled,
    /// Technician is travelling to the location.
    EnRoute,
    /// Work has started.
    InProgress,
    /// Work is done.
    Completed,
    /// The visit was skipped.
    Skipped,
    /// Force-terminated by the voider.
    Canceled,
}

impl JobStatus {
    /// Converts this status to its stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::EnRoute => "EnRoute",
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
            Self::Skipped => "Skipped",
            Self::Canceled => "Canceled",
        }
    }

    /// A live job occupies its `(subscription, date)` slot.
    #[must_use]
    pub const fn is_live(&self) -> bool {
        !matches!(self, Self::Canceled)
    }

    /// Only work that has not started may be voided.
    #[must_use]
    pub const fn is_voidable(&self) -> bool {
        matches!(self, Self::Scheduled | Self::EnRoute)
    }

    /// Only work that has not started may be bound to a route.
    #[must_use]
    pub const fn is_assignable(&self) -> bool {
        matches!(self, Self::Scheduled | Self::EnRoute)
    }

    /// Returns whether the status is final.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Skipped | Self::Canceled)
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - `Scheduled` → `EnRoute`, `Skipped`, `Canceled`
    /// - `EnRoute` → `InProgress`, `Canceled`
    /// - `InProgress` → `Completed`
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Scheduled, Self::EnRoute | Self::Skipped | Self::Canceled)
                | (Self::EnRoute, Self::InProgress | Self::Canceled)
                | (Self::InProgress, Self::Completed)
        )
    }
}

impl FromStr for JobStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "SCHEDULED" => Ok(Self::Scheduled),
            "ENROUTE" => Ok(Self::EnRoute),
            "INPROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            "SKIPPED" => Ok(Self::Skipped),
            "CANCELED" | "CANCELLED" => Ok(Self::Canceled),
            _ => Err(DomainError::InvalidJobStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a technician's route for one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RouteStatus {
    /// Created and awaiting the day of service.
    #[default]
    Planned,
    /// The technician has started the route.
    InProgress,
    /// All stops are finished.
    Completed,
}

impl RouteStatus {
    /// Converts this status to its stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "Planned",
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
        }
    }
}

impl FromStr for RouteStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "PLANNED" => Ok(Self::Planned),
            "INPROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidRouteStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolution state of an optimization suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SuggestionStatus {
    /// Awaiting a human decision.
    #[default]
    Pending,
    /// Accepted and applied.
    Accepted,
    /// Dismissed without effect.
    Dismissed,
}

impl SuggestionStatus {
    /// Converts this status to its stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Accepted => "Accepted",
            Self::Dismissed => "Dismissed",
        }
    }
}

impl FromStr for SuggestionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "PENDING" => Ok(Self::Pending),
            "ACCEPTED" => Ok(Self::Accepted),
            "DISMISSED" => Ok(Self::Dismissed),
            _ => Err(DomainError::InvalidSuggestionStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of change an optimization suggestion proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SuggestionType {
    /// Move the subscription to another weekday.
    ServiceDayChange,
    /// Move the subscription to another technician.
    TechnicianReassignment,
    /// Move both weekday and technician.
    DayAndTechnicianChange,
    /// Advice only; nothing to apply.
    Informational,
}

impl SuggestionType {
    /// Converts this type to its stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ServiceDayChange => "ServiceDayChange",
            Self::TechnicianReassignment => "TechnicianReassignment",
            Self::DayAndTechnicianChange => "DayAndTechnicianChange",
            Self::Informational => "Informational",
        }
    }
}

impl FromStr for SuggestionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "SERVICEDAYCHANGE" | "DAYCHANGE" => Ok(Self::ServiceDayChange),
            "TECHNICIANREASSIGNMENT" | "TECHREASSIGNMENT" => Ok(Self::TechnicianReassignment),
            "DAYANDTECHNICIANCHANGE" | "DAYANDTECHCHANGE" => Ok(Self::DayAndTechnicianChange),
            "INFORMATIONAL" => Ok(Self::Informational),
            _ => Err(DomainError::InvalidSuggestionType(s.to_string())),
        }
    }
}

impl std::fmt::Display for SuggestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parses a weekday from its full English name or three-letter abbreviation.
///
/// Matching is case-insensitive.
///
/// # Errors
///
/// Returns `DomainError::InvalidWeekday` for any other value.
pub fn parse_weekday(value: &str) -> Result<Weekday, DomainError> {
    match normalize_token(value).as_str() {
        "MONDAY" | "MON" => Ok(Weekday::Monday),
        "TUESDAY" | "TUE" => Ok(Weekday::Tuesday),
        "WEDNESDAY" | "WED" => Ok(Weekday::Wednesday),
        "THURSDAY" | "THU" => Ok(Weekday::Thursday),
        "FRIDAY" | "FRI" => Ok(Weekday::Friday),
        "SATURDAY" | "SAT" => Ok(Weekday::Saturday),
        "SUNDAY" | "SUN" => Ok(Weekday::Sunday),
        _ => Err(DomainError::InvalidWeekday(value.to_string())),
    }
}

/// Returns the stored name of a weekday (e.g. `"Wednesday"`).
#[must_use]
pub const fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "Monday",
        Weekday::Tuesday => "Tuesday",
        Weekday::Wednesday => "Wednesday",
        Weekday::Thursday => "Thursday",
        Weekday::Friday => "Friday",
        Weekday::Saturday => "Saturday",
        Weekday::Sunday => "Sunday",
    }
}
