// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Resolution of command-line settings into engine configuration.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use clap::Args;
use fieldsched::{CoreError, DEFAULT_LOOK_AHEAD_DAYS, EngineConfig, RequestContext};
use fieldsched_audit::{Actor, Cause};
use fieldsched_domain::{DomainError, business_date, parse_iso_date};
use fieldsched_persistence::{Persistence, PersistenceError};
use thiserror::Error;
use time::Date;
use tracing::info;

/// Options shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Path to the `SQLite` database file. If not provided, uses an in-memory database.
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// How many days ahead jobs are generated
    #[arg(long, global = true, default_value_t = DEFAULT_LOOK_AHEAD_DAYS)]
    pub look_ahead_days: u32,

    /// IANA timezone the business date is resolved in
    #[arg(long, global = true, default_value = "UTC")]
    pub timezone: String,

    /// Business date override (YYYY-MM-DD) for replays and support
    #[arg(long, global = true)]
    pub today: Option<String>,

    /// Organization the command acts on behalf of
    #[arg(long, global = true, default_value_t = 1)]
    pub organization: i64,

    /// Staff identifier recorded in the audit trail
    #[arg(long, global = true, default_value = "staff")]
    pub actor: String,
}

/// Errors raised while turning arguments into settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid --today value: {0}")]
    Today(#[source] DomainError),

    #[error("Cannot resolve the business date: {0}")]
    BusinessDate(#[source] DomainError),

    #[error("Invalid --look-ahead-days value: {0}")]
    LookAhead(#[source] CoreError),

    #[error("Failed to open the database: {0}")]
    Database(#[from] PersistenceError),
}

/// Validated settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub engine: EngineConfig,
    pub today: Date,
    pub organization_id: i64,
    pub actor_id: String,
}

impl Settings {
    /// Resolves settings, reading the business date from `now` unless
    /// `--today` overrides it.
    ///
    /// # Errors
    ///
    /// Returns an error if the look-ahead window, date or timezone is invalid.
    pub fn resolve(args: &GlobalArgs, now: DateTime<Utc>) -> Result<Self, ConfigError> {
        let engine: EngineConfig =
            EngineConfig::new(args.look_ahead_days).map_err(ConfigError::LookAhead)?;

        let today: Date = match &args.today {
            Some(value) => parse_iso_date(value).map_err(ConfigError::Today)?,
            None => business_date(&args.timezone, now).map_err(ConfigError::BusinessDate)?,
        };

        Ok(Self {
            engine,
            today,
            organization_id: args.organization,
            actor_id: args.actor.clone(),
        })
    }

    /// Builds the context for a staff command.
    #[must_use]
    pub fn staff_context(&self, command: &str) -> RequestContext {
        RequestContext::new(
            self.organization_id,
            self.today,
            Actor::staff(&self.actor_id),
            Cause::new(format!("cli:{command}"), format!("Staff command '{command}'")),
        )
    }

    /// Builds the context for a payment-processor event.
    #[must_use]
    pub fn billing_context(&self, processor: &str, event_id: &str) -> RequestContext {
        RequestContext::new(
            self.organization_id,
            self.today,
            Actor::billing(processor),
            Cause::new(
                event_id.to_string(),
                format!("Billing event from {processor}"),
            ),
        )
    }
}

/// Opens the file database, or a fresh in-memory one when no path is given.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or migrated.
pub fn open_store(database: Option<&Path>) -> Result<Persistence, ConfigError> {
    let persistence: Persistence = if let Some(path) = database {
        info!(path = %path.display(), "Using file-based database");
        Persistence::new_with_file(path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    Ok(persistence)
}
