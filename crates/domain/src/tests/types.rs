// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DomainError, Frequency, JobStatus, RouteStatus, SubscriptionStatus, SuggestionStatus,
    SuggestionType, parse_weekday, weekday_name,
};
use std::str::FromStr;
use time::Weekday;

#[test]
fn test_frequency_parses_spec_and_stored_spellings() {
    assert_eq!(Frequency::from_str("WEEKLY").unwrap(), Frequency::Weekly);
    assert_eq!(Frequency::from_str("biweekly").unwrap(), Frequency::Biweekly);
    assert_eq!(Frequency::from_str("Monthly").unwrap(), Frequency::Monthly);
    assert_eq!(Frequency::from_str("ONE_TIME").unwrap(), Frequency::OneTime);
    assert_eq!(Frequency::from_str("OneTime").unwrap(), Frequency::OneTime);
}

#[test]
fn test_frequency_rejects_typos() {
    let result = Frequency::from_str("WEEKLYY");

    assert_eq!(
        result,
        Err(DomainError::InvalidFrequency(String::from("WEEKLYY")))
    );
}

#[test]
fn test_subscription_status_round_trips_through_stored_name() {
    for status in [
        SubscriptionStatus::Active,
        SubscriptionStatus::Paused,
        SubscriptionStatus::PastDue,
        SubscriptionStatus::PendingCancel,
        SubscriptionStatus::Canceled,
    ] {
        assert_eq!(SubscriptionStatus::from_str(status.as_str()).unwrap(), status);
    }
    assert_eq!(
        SubscriptionStatus::from_str("PAST_DUE").unwrap(),
        SubscriptionStatus::PastDue
    );
    assert!(SubscriptionStatus::from_str("expired").is_err());
}

#[test]
fn test_only_active_subscriptions_generate_jobs() {
    assert!(SubscriptionStatus::Active.generates_jobs());
    assert!(!SubscriptionStatus::Paused.generates_jobs());
    assert!(!SubscriptionStatus::PastDue.generates_jobs());
    assert!(!SubscriptionStatus::PendingCancel.generates_jobs());
    assert!(!SubscriptionStatus::Canceled.generates_jobs());
}

#[test]
fn test_job_status_voidable_only_before_work_starts() {
    assert!(JobStatus::Scheduled.is_voidable());
    assert!(JobStatus::EnRoute.is_voidable());
    assert!(!JobStatus::InProgress.is_voidable());
    assert!(!JobStatus::Completed.is_voidable());
    assert!(!JobStatus::Skipped.is_voidable());
    assert!(!JobStatus::Canceled.is_voidable());
}

#[test]
fn test_job_status_transitions_move_forward_only() {
    assert!(JobStatus::Scheduled.can_transition_to(JobStatus::EnRoute));
    assert!(JobStatus::Scheduled.can_transition_to(JobStatus::Skipped));
    assert!(JobStatus::EnRoute.can_transition_to(JobStatus::InProgress));
    assert!(JobStatus::InProgress.can_transition_to(JobStatus::Completed));
    assert!(JobStatus::EnRoute.can_transition_to(JobStatus::Canceled));

    assert!(!JobStatus::InProgress.can_transition_to(JobStatus::Canceled));
    assert!(!JobStatus::Completed.can_transition_to(JobStatus::Scheduled));
    assert!(!JobStatus::Canceled.can_transition_to(JobStatus::Scheduled));
    assert!(!JobStatus::Scheduled.can_transition_to(JobStatus::Completed));
}

#[test]
fn test_voidable_statuses_are_exactly_those_that_may_cancel() {
    for status in [
        JobStatus::Scheduled,
        JobStatus::EnRoute,
        JobStatus::InProgress,
        JobStatus::Completed,
        JobStatus::Skipped,
        JobStatus::Canceled,
    ] {
        assert_eq!(
            status.is_voidable(),
            status.can_transition_to(JobStatus::Canceled),
            "{status}"
        );
    }
}

#[test]
fn test_terminal_job_statuses() {
    assert!(JobStatus::Completed.is_terminal());
    assert!(JobStatus::Skipped.is_terminal());
    assert!(JobStatus::Canceled.is_terminal());
    assert!(!JobStatus::Scheduled.is_terminal());
    assert!(!JobStatus::Canceled.is_live());
    assert!(JobStatus::Completed.is_live());
}

#[test]
fn test_route_and_suggestion_statuses_parse() {
    assert_eq!(RouteStatus::from_str("PLANNED").unwrap(), RouteStatus::Planned);
    assert_eq!(
        SuggestionStatus::from_str("dismissed").unwrap(),
        SuggestionStatus::Dismissed
    );
    assert!(SuggestionStatus::from_str("maybe").is_err());
}

#[test]
fn test_suggestion_type_accepts_short_forms() {
    assert_eq!(
        SuggestionType::from_str("day_change").unwrap(),
        SuggestionType::ServiceDayChange
    );
    assert_eq!(
        SuggestionType::from_str("tech-reassignment").unwrap(),
        SuggestionType::TechnicianReassignment
    );
    assert!(SuggestionType::from_str("reroute").is_err());
}

#[test]
fn test_parse_weekday_accepts_names_and_abbreviations() {
    assert_eq!(parse_weekday("WEDNESDAY").unwrap(), Weekday::Wednesday);
    assert_eq!(parse_weekday("wed").unwrap(), Weekday::Wednesday);
    assert_eq!(parse_weekday(" Sunday ").unwrap(), Weekday::Sunday);
    assert_eq!(
        parse_weekday("Funday"),
        Err(DomainError::InvalidWeekday(String::from("Funday")))
    );
}

#[test]
fn test_weekday_name_parses_back() {
    for day in [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ] {
        assert_eq!(parse_weekday(weekday_name(day)).unwrap(), day);
    }
}
