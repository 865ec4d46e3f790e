// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mapping of payment-processor lifecycle events onto subscription statuses.
//!
//! The payment processor is an external event source. Its events are
//! translated here into the engine's status vocabulary and then applied
//! through the same path as a staff edit.

use crate::error::DomainError;
use crate::types::SubscriptionStatus;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle event kinds delivered by the payment processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BillingEventKind {
    Created,
    Updated,
    Paused,
    Resumed,
    Canceled,
}

impl BillingEventKind {
    /// Converts this kind to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Paused => "paused",
            Self::Resumed => "resumed",
            Self::Canceled => "canceled",
        }
    }
}

impl FromStr for BillingEventKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Processors prefix events with the object type, e.g. "subscription.paused".
        let kind: &str = s.trim().rsplit('.').next().unwrap_or_default();
        match kind.to_ascii_lowercase().as_str() {
            "created" => Ok(Self::Created),
            "updated" => Ok(Self::Updated),
            "paused" => Ok(Self::Paused),
            "resumed" => Ok(Self::Resumed),
            "canceled" | "cancelled" | "deleted" => Ok(Self::Canceled),
            _ => Err(DomainError::InvalidBillingEventKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for BillingEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Maps a payment-processor event onto a subscription status.
///
/// `Paused`, `Resumed` and `Canceled` events map directly. `Created` and
/// `Updated` events carry the processor's own status string:
///
/// | Processor status | Mapped status |
/// |---|---|
/// | `active`, `trialing` | `Active`, or `PendingCancel` when `cancel_at_period_end` |
/// | `past_due`, `unpaid` | `PastDue` |
/// | `paused` | `Paused` |
/// | `canceled`, `incomplete_expired` | `Canceled` |
///
/// # Errors
///
/// Returns `DomainError::InvalidBillingStatus` when a `Created`/`Updated`
/// event has no status or an unknown one.
pub fn status_for_billing_event(
    kind: BillingEventKind,
    processor_status: Option<&str>,
    cancel_at_period_end: bool,
) -> Result<SubscriptionStatus, DomainError> {
    match kind {
        BillingEventKind::Paused => Ok(SubscriptionStatus::Paused),
        BillingEventKind::Resumed => Ok(SubscriptionStatus::Active),
        BillingEventKind::Canceled => Ok(SubscriptionStatus::Canceled),
        BillingEventKind::Created | BillingEventKind::Updated => {
            let raw: &str = processor_status
                .ok_or_else(|| DomainError::InvalidBillingStatus(String::from("<missing>")))?;
            match raw.trim().to_ascii_lowercase().as_str() {
                "active" | "trialing" if cancel_at_period_end => {
                    Ok(SubscriptionStatus::PendingCancel)
                }
                "active" | "trialing" => Ok(SubscriptionStatus::Active),
                "past_due" | "unpaid" => Ok(SubscriptionStatus::PastDue),
                "paused" => Ok(SubscriptionStatus::Paused),
                "canceled" | "cancelled" | "incomplete_expired" => {
                    Ok(SubscriptionStatus::Canceled)
                }
                _ => Err(DomainError::InvalidBillingStatus(raw.to_string())),
            }
        }
    }
}
