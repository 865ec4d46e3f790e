// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use fieldsched_audit::{Actor, Cause};
use fieldsched_domain::validate_look_ahead;
use time::Date;

/// Default look-ahead window in days.
pub const DEFAULT_LOOK_AHEAD_DAYS: u32 = 14;

/// Default provenance label written on generated jobs.
pub const DEFAULT_TRIGGER: &str = "materializer";

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// How many days past today the materializer fills.
    pub look_ahead_days: u32,
    /// Prefix of the `generated_by` provenance recorded on jobs.
    pub default_trigger: String,
}

impl EngineConfig {
    /// Creates a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the look-ahead window is outside `1..=366` days.
    pub fn new(look_ahead_days: u32) -> Result<Self, CoreError> {
        validate_look_ahead(look_ahead_days)?;
        Ok(Self {
            look_ahead_days,
            default_trigger: String::from(DEFAULT_TRIGGER),
        })
    }

    /// Builds the provenance label for a job generated by `trigger`.
    #[must_use]
    pub fn provenance(&self, trigger: &str) -> String {
        format!("{}:{trigger}", self.default_trigger)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            look_ahead_days: DEFAULT_LOOK_AHEAD_DAYS,
            default_trigger: String::from(DEFAULT_TRIGGER),
        }
    }
}

/// Who is calling, on behalf of which organization, and on what business date.
///
/// Every mutating engine operation takes one of these. `today` is resolved by
/// the caller in the organization's timezone; the engine never reads a clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub organization_id: i64,
    pub today: Date,
    pub actor: Actor,
    pub cause: Cause,
}

impl RequestContext {
    #[must_use]
    pub const fn new(organization_id: i64, today: Date, actor: Actor, cause: Cause) -> Self {
        Self {
            organization_id,
            today,
            actor,
            cause,
        }
    }
}
