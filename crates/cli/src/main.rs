// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

//! `fieldsched` - staff tooling for the field-service scheduling engine.
//!
//! Every subcommand resolves the business date once, opens the store,
//! calls one API handler and prints its response as JSON on stdout.
//! Logs go to stderr; `RUST_LOG` overrides the `-v`/`-q` level.

mod config;
mod output;

#[cfg(test)]
mod tests;

use std::fs;
use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::Context};
use fieldsched::RequestContext;
use fieldsched_api::{
    AssignJobRequest, AssignSubscriptionJobsRequest, AuditHistoryRequest, BillingEventRequest,
    CreateClientRequest, CreateLocationRequest, CreateSubscriptionRequest, ListJobsRequest,
    RecordSuggestionRequest, RegenerateJobsRequest, ResolveSuggestionRequest,
    SubscriptionChangeResponse, UpdateSubscriptionRequest, WorklistResponse,
};
use fieldsched_persistence::Persistence;
use tracing::level_filters::LevelFilter;
use tracing::{error, info, warn};
use tracing_log::AsTrace;
use tracing_subscriber::EnvFilter;

use crate::config::{GlobalArgs, Settings, open_store};
use crate::output::{WorklistFormat, render_worklist_table, write_json, write_worklist_csv};

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli: Cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(cli.log_level().into())
                .from_env_lossy(),
        )
        .with_writer(io::stderr)
        .init();

    match cli.run() {
        Ok(()) => (),
        Err(err) => {
            error!("{err:#}");
            std::process::exit(1);
        }
    }
    Ok(())
}

/// Field-service scheduling engine
#[derive(Debug, Parser)]
#[command(name = "fieldsched", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    global: GlobalArgs,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Cli {
    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }

    fn run(self) -> Result<()> {
        let settings: Settings = Settings::resolve(&self.global, chrono::Utc::now())?;
        info!(
            organization_id = settings.organization_id,
            today = %settings.today,
            look_ahead_days = settings.engine.look_ahead_days,
            "Resolved settings"
        );
        let mut persistence: Persistence = open_store(self.global.database.as_deref())?;
        self.command.run(&mut persistence, &settings)
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Create a client
    Client {
        name: String,
    },

    /// Add a service location to a client
    Location {
        client_id: i64,
        label: String,
    },

    /// Create a subscription anchored on today and generate its jobs
    #[command(visible_alias = "sub")]
    Subscribe {
        client_id: i64,
        location_id: i64,
        /// weekly, biweekly, monthly or one_time
        #[arg(long, short)]
        frequency: String,
        /// Preferred weekday (e.g. Wednesday or wed)
        #[arg(long)]
        day: Option<String>,
        #[arg(long)]
        price_cents: i64,
        /// Initial status; Active when omitted
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        initial_cleanup: bool,
        /// Default technician for generated jobs
        #[arg(long)]
        technician: Option<i64>,
    },

    /// Edit a subscription
    Update {
        subscription_id: i64,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        frequency: Option<String>,
        #[arg(long, conflicts_with = "clear_day")]
        day: Option<String>,
        #[arg(long)]
        clear_day: bool,
        #[arg(long)]
        price_cents: Option<i64>,
        #[arg(long)]
        cleanup_completed: Option<bool>,
        #[arg(long, conflicts_with = "clear_technician")]
        technician: Option<i64>,
        #[arg(long)]
        clear_technician: bool,
    },

    /// Apply one payment-processor event
    Billing {
        subscription_id: i64,
        /// created, updated, paused, resumed or canceled (prefixes allowed)
        event_type: String,
        #[arg(long)]
        processor_status: Option<String>,
        #[arg(long)]
        cancel_at_period_end: bool,
        #[arg(long, default_value = "processor")]
        processor: String,
        /// Processor event identifier recorded as the audit cause
        #[arg(long, default_value = "manual")]
        event_id: String,
    },

    /// Replay a JSON array of payment-processor events in order
    ReplayBilling {
        path: PathBuf,
        #[arg(long, default_value = "processor")]
        processor: String,
    },

    /// Re-run job generation for a subscription
    #[command(visible_alias = "regen")]
    Regenerate {
        subscription_id: i64,
    },

    /// Show a subscription
    Show {
        subscription_id: i64,
    },

    /// Put one job on a technician's route
    Assign {
        job_id: i64,
        technician_id: i64,
        /// Route date (YYYY-MM-DD); must equal the job's date
        route_date: String,
    },

    /// Route every unassigned future job of a subscription
    AssignAll {
        subscription_id: i64,
        technician_id: i64,
    },

    /// List a subscription's jobs
    Jobs {
        subscription_id: i64,
        /// Only jobs on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,
    },

    /// Show locations and subscriptions that need staff attention
    #[command(visible_alias = "wl")]
    Worklist {
        #[arg(long, value_enum, default_value_t = WorklistFormat::Table)]
        format: WorklistFormat,
    },

    /// Record an optimization suggestion
    Suggest {
        /// service_day_change, technician_reassignment,
        /// day_and_technician_change or informational
        suggestion_type: String,
        #[arg(long)]
        subscription: Option<i64>,
        #[arg(long)]
        current_day: Option<String>,
        #[arg(long)]
        current_technician: Option<i64>,
        #[arg(long)]
        suggested_day: Option<String>,
        #[arg(long)]
        suggested_technician: Option<i64>,
        #[arg(long)]
        reasoning: String,
        #[arg(long)]
        minutes_saved: Option<i32>,
    },

    /// Accept a pending suggestion and apply it
    Accept {
        suggestion_id: i64,
    },

    /// Dismiss a pending suggestion
    Dismiss {
        suggestion_id: i64,
    },

    /// Show the audit history of a client, subscription, job, route or suggestion
    Audit {
        subject_kind: String,
        subject_id: i64,
    },
}

impl Command {
    const fn name(&self) -> &'static str {
        match self {
            Self::Client { .. } => "client",
            Self::Location { .. } => "location",
            Self::Subscribe { .. } => "subscribe",
            Self::Update { .. } => "update",
            Self::Billing { .. } => "billing",
            Self::ReplayBilling { .. } => "replay-billing",
            Self::Regenerate { .. } => "regenerate",
            Self::Show { .. } => "show",
            Self::Assign { .. } => "assign",
            Self::AssignAll { .. } => "assign-all",
            Self::Jobs { .. } => "jobs",
            Self::Worklist { .. } => "worklist",
            Self::Suggest { .. } => "suggest",
            Self::Accept { .. } => "accept",
            Self::Dismiss { .. } => "dismiss",
            Self::Audit { .. } => "audit",
        }
    }

    #[allow(clippy::too_many_lines)]
    fn run(self, persistence: &mut Persistence, settings: &Settings) -> Result<()> {
        let ctx: RequestContext = settings.staff_context(self.name());
        let config = &settings.engine;
        let stdout = io::stdout().lock();

        match self {
            Self::Client { name } => {
                let response = fieldsched_api::create_client(
                    persistence,
                    &ctx,
                    &CreateClientRequest { name },
                )?;
                write_json(stdout, &response)?;
            }
            Self::Location { client_id, label } => {
                let response = fieldsched_api::create_location(
                    persistence,
                    &ctx,
                    &CreateLocationRequest { client_id, label },
                )?;
                write_json(stdout, &response)?;
            }
            Self::Subscribe {
                client_id,
                location_id,
                frequency,
                day,
                price_cents,
                status,
                initial_cleanup,
                technician,
            } => {
                let response = fieldsched_api::create_subscription(
                    persistence,
                    config,
                    &ctx,
                    &CreateSubscriptionRequest {
                        client_id,
                        location_id,
                        frequency,
                        preferred_day: day,
                        price_cents,
                        status,
                        initial_cleanup_required: initial_cleanup,
                        assigned_technician_id: technician,
                    },
                )?;
                report_change(stdout, &response)?;
            }
            Self::Update {
                subscription_id,
                status,
                frequency,
                day,
                clear_day,
                price_cents,
                cleanup_completed,
                technician,
                clear_technician,
            } => {
                let response = fieldsched_api::update_subscription(
                    persistence,
                    config,
                    &ctx,
                    &UpdateSubscriptionRequest {
                        subscription_id,
                        status,
                        frequency,
                        preferred_day: day,
                        clear_preferred_day: clear_day,
                        price_cents,
                        initial_cleanup_completed: cleanup_completed,
                        assigned_technician_id: technician,
                        clear_technician,
                    },
                )?;
                report_change(stdout, &response)?;
            }
            Self::Billing {
                subscription_id,
                event_type,
                processor_status,
                cancel_at_period_end,
                processor,
                event_id,
            } => {
                let billing_ctx: RequestContext = settings.billing_context(&processor, &event_id);
                let response = fieldsched_api::apply_billing_event(
                    persistence,
                    config,
                    &billing_ctx,
                    &BillingEventRequest {
                        subscription_id,
                        event_type,
                        processor_status,
                        cancel_at_period_end,
                    },
                )?;
                report_change(stdout, &response)?;
            }
            Self::ReplayBilling { path, processor } => {
                let responses: Vec<SubscriptionChangeResponse> =
                    replay_billing(persistence, settings, &path, &processor)?;
                write_json(stdout, &responses)?;
            }
            Self::Regenerate { subscription_id } => {
                let response = fieldsched_api::regenerate_jobs(
                    persistence,
                    config,
                    &ctx,
                    &RegenerateJobsRequest { subscription_id },
                )?;
                report_change(stdout, &response)?;
            }
            Self::Show { subscription_id } => {
                let response =
                    fieldsched_api::get_subscription(persistence, &ctx, subscription_id)?;
                write_json(stdout, &response)?;
            }
            Self::Assign {
                job_id,
                technician_id,
                route_date,
            } => {
                let response = fieldsched_api::assign_job(
                    persistence,
                    &ctx,
                    &AssignJobRequest {
                        job_id,
                        technician_id,
                        route_date,
                    },
                )?;
                info!("{}", response.message);
                write_json(stdout, &response)?;
            }
            Self::AssignAll {
                subscription_id,
                technician_id,
            } => {
                let response = fieldsched_api::assign_subscription_jobs(
                    persistence,
                    &ctx,
                    &AssignSubscriptionJobsRequest {
                        subscription_id,
                        technician_id,
                    },
                )?;
                info!("{}", response.message);
                write_json(stdout, &response)?;
            }
            Self::Jobs {
                subscription_id,
                from,
            } => {
                let response = fieldsched_api::list_jobs(
                    persistence,
                    &ctx,
                    &ListJobsRequest {
                        subscription_id,
                        from,
                    },
                )?;
                write_json(stdout, &response)?;
            }
            Self::Worklist { format } => {
                let worklist: WorklistResponse = fieldsched_api::get_worklist(persistence, &ctx)?;
                write_worklist(stdout, &worklist, format)?;
            }
            Self::Suggest {
                suggestion_type,
                subscription,
                current_day,
                current_technician,
                suggested_day,
                suggested_technician,
                reasoning,
                minutes_saved,
            } => {
                let response = fieldsched_api::record_suggestion(
                    persistence,
                    &ctx,
                    &RecordSuggestionRequest {
                        subscription_id: subscription,
                        suggestion_type,
                        current_day,
                        current_technician_id: current_technician,
                        suggested_day,
                        suggested_technician_id: suggested_technician,
                        reasoning,
                        estimated_minutes_saved: minutes_saved,
                    },
                )?;
                write_json(stdout, &response)?;
            }
            Self::Accept { suggestion_id } => {
                let response = fieldsched_api::accept_suggestion(
                    persistence,
                    config,
                    &ctx,
                    &ResolveSuggestionRequest { suggestion_id },
                )?;
                info!("{}", response.message);
                write_json(stdout, &response)?;
            }
            Self::Dismiss { suggestion_id } => {
                let response = fieldsched_api::dismiss_suggestion(
                    persistence,
                    &ctx,
                    &ResolveSuggestionRequest { suggestion_id },
                )?;
                write_json(stdout, &response)?;
            }
            Self::Audit {
                subject_kind,
                subject_id,
            } => {
                let response = fieldsched_api::get_audit_history(
                    persistence,
                    &ctx,
                    &AuditHistoryRequest {
                        subject_kind,
                        subject_id,
                    },
                )?;
                write_json(stdout, &response)?;
            }
        }
        Ok(())
    }
}

fn report_change<W: io::Write>(writer: W, response: &SubscriptionChangeResponse) -> Result<()> {
    info!(
        subscription_id = response.subscription.subscription_id,
        "{}", response.message
    );
    for warning in &response.warnings {
        warn!(subscription_id = response.subscription.subscription_id, "{warning}");
    }
    write_json(writer, response)?;
    Ok(())
}

fn write_worklist<W: io::Write>(
    mut writer: W,
    worklist: &WorklistResponse,
    format: WorklistFormat,
) -> Result<()> {
    match format {
        WorklistFormat::Table => write!(writer, "{}", render_worklist_table(worklist))?,
        WorklistFormat::Csv => write_worklist_csv(writer, worklist)?,
        WorklistFormat::Json => write_json(writer, worklist)?,
    }
    Ok(())
}

/// Applies every event in a JSON file, stopping at the first rejection.
///
/// Each event's cause identifier is `<file name>#<index>` so a replay can be
/// traced in the audit trail.
fn replay_billing(
    persistence: &mut Persistence,
    settings: &Settings,
    path: &std::path::Path,
    processor: &str,
) -> Result<Vec<SubscriptionChangeResponse>> {
    let raw: String =
        fs::read_to_string(path).wrap_err_with(|| format!("reading {}", path.display()))?;
    let events: Vec<BillingEventRequest> = serde_json::from_str(&raw)
        .wrap_err_with(|| format!("parsing billing events in {}", path.display()))?;

    let source: String = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());

    let mut responses: Vec<SubscriptionChangeResponse> = Vec::with_capacity(events.len());
    for (index, event) in events.iter().enumerate() {
        let ctx: RequestContext = settings.billing_context(processor, &format!("{source}#{index}"));
        let response: SubscriptionChangeResponse =
            fieldsched_api::apply_billing_event(persistence, &settings.engine, &ctx, event)
                .wrap_err_with(|| {
                    format!(
                        "event {index} ({}) for subscription {}",
                        event.event_type, event.subscription_id
                    )
                })?;
        info!(
            index,
            subscription_id = event.subscription_id,
            "{}", response.message
        );
        responses.push(response);
    }
    Ok(responses)
}
