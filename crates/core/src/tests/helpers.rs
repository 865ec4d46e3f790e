// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{JobStore, RequestContext, StoreError};
use fieldsched_audit::{Actor, AuditEvent, AuditSubject, Cause};
use fieldsched_domain::{
    Client, Frequency, Job, JobStatus, Location, NewJob, NewRoute, NewSubscription,
    NewSuggestion, Route, RouteStatus, Subscription, SubscriptionStatus, Suggestion,
    SuggestionStatus,
};
use std::collections::HashSet;
use time::{Date, Weekday};

pub const ORG: i64 = 1;
pub const OTHER_ORG: i64 = 2;

/// In-memory `JobStore` with the same uniqueness rules as the database,
/// plus switches for injecting failures.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub clients: Vec<Client>,
    pub locations: Vec<Location>,
    pub subscriptions: Vec<Subscription>,
    pub jobs: Vec<Job>,
    pub routes: Vec<Route>,
    pub suggestions: Vec<Suggestion>,
    pub audit_events: Vec<(i64, AuditEvent)>,
    next_id: i64,
    /// Job inserts for these dates fail with a backend error.
    pub failing_insert_dates: HashSet<Date>,
    /// Number of cancels allowed before every further cancel fails.
    pub cancel_budget: Option<usize>,
    /// Route attachments fail.
    pub fail_attach: bool,
    /// Audit writes fail.
    pub fail_audit: bool,
    /// Subscription updates fail.
    pub fail_subscription_update: bool,
    /// The next route insert loses a race: a competing route is written
    /// first and the insert reports a conflict.
    pub race_next_route_insert: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn add_client(&mut self, organization_id: i64, name: &str, is_active: bool) -> Client {
        let client: Client = Client {
            client_id: self.next_id(),
            organization_id,
            name: name.to_string(),
            is_active,
        };
        self.clients.push(client.clone());
        client
    }

    pub fn add_location(&mut self, client: &Client, label: &str) -> Location {
        let location: Location = Location {
            location_id: self.next_id(),
            organization_id: client.organization_id,
            client_id: client.client_id,
            label: label.to_string(),
        };
        self.locations.push(location.clone());
        location
    }

    pub fn live_jobs(&self, subscription_id: i64) -> Vec<&Job> {
        self.jobs
            .iter()
            .filter(|job| job.subscription_id == Some(subscription_id) && job.status.is_live())
            .collect()
    }

    pub fn client(&self, client_id: i64) -> Client {
        self.clients
            .iter()
            .find(|client| client.client_id == client_id)
            .cloned()
            .unwrap()
    }

    pub fn job(&self, job_id: i64) -> &Job {
        self.jobs.iter().find(|job| job.job_id == job_id).unwrap()
    }

    pub fn set_job_status(&mut self, job_id: i64, status: JobStatus) {
        let job: &mut Job = self.jobs.iter_mut().find(|job| job.job_id == job_id).unwrap();
        job.status = status;
    }

    pub fn events_for(&self, subject: &AuditSubject) -> Vec<&AuditEvent> {
        self.audit_events
            .iter()
            .map(|(_, event)| event)
            .filter(|event| &event.subject == subject)
            .collect()
    }
}

fn not_found(entity: &str, id: i64) -> StoreError {
    StoreError::NotFound(format!("{entity} {id}"))
}

impl JobStore for MemoryStore {
    fn get_client(&mut self, client_id: i64) -> Result<Client, StoreError> {
        self.clients
            .iter()
            .find(|c| c.client_id == client_id)
            .cloned()
            .ok_or_else(|| not_found("client", client_id))
    }

    fn list_clients(&mut self, organization_id: i64) -> Result<Vec<Client>, StoreError> {
        Ok(self
            .clients
            .iter()
            .filter(|c| c.organization_id == organization_id)
            .cloned()
            .collect())
    }

    fn set_client_active(&mut self, client_id: i64, is_active: bool) -> Result<(), StoreError> {
        let client: &mut Client = self
            .clients
            .iter_mut()
            .find(|c| c.client_id == client_id)
            .ok_or_else(|| not_found("client", client_id))?;
        client.is_active = is_active;
        Ok(())
    }

    fn get_location(&mut self, location_id: i64) -> Result<Location, StoreError> {
        self.locations
            .iter()
            .find(|l| l.location_id == location_id)
            .cloned()
            .ok_or_else(|| not_found("location", location_id))
    }

    fn list_locations(&mut self, organization_id: i64) -> Result<Vec<Location>, StoreError> {
        Ok(self
            .locations
            .iter()
            .filter(|l| l.organization_id == organization_id)
            .cloned()
            .collect())
    }

    fn get_subscription(&mut self, subscription_id: i64) -> Result<Subscription, StoreError> {
        self.subscriptions
            .iter()
            .find(|s| s.subscription_id == subscription_id)
            .cloned()
            .ok_or_else(|| not_found("subscription", subscription_id))
    }

    fn list_subscriptions(
        &mut self,
        organization_id: i64,
    ) -> Result<Vec<Subscription>, StoreError> {
        Ok(self
            .subscriptions
            .iter()
            .filter(|s| s.organization_id == organization_id)
            .cloned()
            .collect())
    }

    fn list_subscriptions_for_client(
        &mut self,
        client_id: i64,
    ) -> Result<Vec<Subscription>, StoreError> {
        Ok(self
            .subscriptions
            .iter()
            .filter(|s| s.client_id == client_id)
            .cloned()
            .collect())
    }

    fn insert_subscription(
        &mut self,
        subscription: &NewSubscription,
    ) -> Result<Subscription, StoreError> {
        let created: Subscription = Subscription {
            subscription_id: self.next_id(),
            organization_id: subscription.organization_id,
            client_id: subscription.client_id,
            location_id: subscription.location_id,
            frequency: subscription.frequency,
            preferred_day: subscription.preferred_day,
            status: subscription.status,
            price_cents: subscription.price_cents,
            anchor_date: subscription.anchor_date,
            initial_cleanup_required: subscription.initial_cleanup_required,
            initial_cleanup_completed: false,
            assigned_technician_id: subscription.assigned_technician_id,
        };
        self.subscriptions.push(created.clone());
        Ok(created)
    }

    fn update_subscription(&mut self, subscription: &Subscription) -> Result<(), StoreError> {
        if self.fail_subscription_update {
            return Err(StoreError::Backend(String::from("subscription update failed")));
        }
        let existing: &mut Subscription = self
            .subscriptions
            .iter_mut()
            .find(|s| s.subscription_id == subscription.subscription_id)
            .ok_or_else(|| not_found("subscription", subscription.subscription_id))?;
        *existing = subscription.clone();
        Ok(())
    }

    fn find_live_job(
        &mut self,
        subscription_id: i64,
        date: Date,
    ) -> Result<Option<Job>, StoreError> {
        Ok(self
            .jobs
            .iter()
            .find(|j| {
                j.subscription_id == Some(subscription_id)
                    && j.scheduled_date == date
                    && j.status.is_live()
            })
            .cloned())
    }

    fn insert_job(&mut self, job: &NewJob) -> Result<Job, StoreError> {
        if self.failing_insert_dates.contains(&job.scheduled_date) {
            return Err(StoreError::Backend(format!(
                "insert failed for {}",
                job.scheduled_date
            )));
        }
        let occupied: bool = self.jobs.iter().any(|j| {
            j.subscription_id.is_some()
                && j.subscription_id == job.subscription_id
                && j.scheduled_date == job.scheduled_date
                && j.status.is_live()
        });
        if occupied {
            return Err(StoreError::Conflict(String::from("live job exists")));
        }
        let created: Job = Job {
            job_id: self.next_id(),
            organization_id: job.organization_id,
            subscription_id: job.subscription_id,
            client_id: job.client_id,
            location_id: job.location_id,
            scheduled_date: job.scheduled_date,
            status: JobStatus::Scheduled,
            assigned_to: None,
            route_id: None,
            route_order: None,
            price_cents: job.price_cents,
            skip_reason: None,
            generated_by: job.generated_by.clone(),
            generated_on: job.generated_on,
        };
        self.jobs.push(created.clone());
        Ok(created)
    }

    fn get_job(&mut self, job_id: i64) -> Result<Job, StoreError> {
        self.jobs
            .iter()
            .find(|j| j.job_id == job_id)
            .cloned()
            .ok_or_else(|| not_found("job", job_id))
    }

    fn list_jobs_for_subscription(
        &mut self,
        subscription_id: i64,
        from: Option<Date>,
    ) -> Result<Vec<Job>, StoreError> {
        let mut jobs: Vec<Job> = self
            .jobs
            .iter()
            .filter(|j| j.subscription_id == Some(subscription_id))
            .filter(|j| from.is_none_or(|from| j.scheduled_date >= from))
            .cloned()
            .collect();
        jobs.sort_by_key(|j| (j.scheduled_date, j.job_id));
        Ok(jobs)
    }

    fn cancel_job(&mut self, job_id: i64, reason: &str) -> Result<bool, StoreError> {
        if let Some(budget) = self.cancel_budget.as_mut() {
            if *budget == 0 {
                return Err(StoreError::Backend(String::from("cancel failed")));
            }
            *budget -= 1;
        }
        let job: &mut Job = self
            .jobs
            .iter_mut()
            .find(|j| j.job_id == job_id)
            .ok_or_else(|| not_found("job", job_id))?;
        if !job.status.is_voidable() {
            return Ok(false);
        }
        job.status = JobStatus::Canceled;
        job.skip_reason = Some(reason.to_string());
        job.route_id = None;
        job.route_order = None;
        Ok(true)
    }

    fn attach_job_to_route(
        &mut self,
        job_id: i64,
        technician_id: i64,
        route_id: i64,
        route_order: i32,
    ) -> Result<(), StoreError> {
        if self.fail_attach {
            return Err(StoreError::Backend(String::from("attach failed")));
        }
        let job: &mut Job = self
            .jobs
            .iter_mut()
            .find(|j| j.job_id == job_id)
            .ok_or_else(|| not_found("job", job_id))?;
        job.assigned_to = Some(technician_id);
        job.route_id = Some(route_id);
        job.route_order = Some(route_order);
        Ok(())
    }

    fn find_route(
        &mut self,
        organization_id: i64,
        technician_id: i64,
        date: Date,
    ) -> Result<Option<Route>, StoreError> {
        Ok(self
            .routes
            .iter()
            .find(|r| {
                r.organization_id == organization_id
                    && r.assigned_to == technician_id
                    && r.route_date == date
            })
            .cloned())
    }

    fn insert_route(&mut self, route: &NewRoute) -> Result<Route, StoreError> {
        if self.race_next_route_insert {
            self.race_next_route_insert = false;
            let winner: Route = Route {
                route_id: self.next_id(),
                organization_id: route.organization_id,
                assigned_to: route.assigned_to,
                route_date: route.route_date,
                status: RouteStatus::Planned,
                name: String::from("created by a concurrent request"),
            };
            self.routes.push(winner);
        }
        if self
            .routes
            .iter()
            .any(|r| {
                r.organization_id == route.organization_id
                    && r.assigned_to == route.assigned_to
                    && r.route_date == route.route_date
            })
        {
            return Err(StoreError::Conflict(String::from("route exists")));
        }
        let created: Route = Route {
            route_id: self.next_id(),
            organization_id: route.organization_id,
            assigned_to: route.assigned_to,
            route_date: route.route_date,
            status: RouteStatus::Planned,
            name: route.name.clone(),
        };
        self.routes.push(created.clone());
        Ok(created)
    }

    fn get_route(&mut self, route_id: i64) -> Result<Route, StoreError> {
        self.routes
            .iter()
            .find(|r| r.route_id == route_id)
            .cloned()
            .ok_or_else(|| not_found("route", route_id))
    }

    fn count_route_stops(&mut self, route_id: i64) -> Result<i64, StoreError> {
        let count: usize = self
            .jobs
            .iter()
            .filter(|j| j.route_id == Some(route_id))
            .count();
        Ok(i64::try_from(count).unwrap())
    }

    fn insert_suggestion(
        &mut self,
        suggestion: &NewSuggestion,
    ) -> Result<Suggestion, StoreError> {
        let created: Suggestion = Suggestion {
            suggestion_id: self.next_id(),
            organization_id: suggestion.organization_id,
            subscription_id: suggestion.subscription_id,
            suggestion_type: suggestion.suggestion_type,
            current_state: suggestion.current_state,
            suggested_state: suggestion.suggested_state,
            reasoning: suggestion.reasoning.clone(),
            estimated_minutes_saved: suggestion.estimated_minutes_saved,
            status: SuggestionStatus::Pending,
        };
        self.suggestions.push(created.clone());
        Ok(created)
    }

    fn get_suggestion(&mut self, suggestion_id: i64) -> Result<Suggestion, StoreError> {
        self.suggestions
            .iter()
            .find(|s| s.suggestion_id == suggestion_id)
            .cloned()
            .ok_or_else(|| not_found("suggestion", suggestion_id))
    }

    fn transition_suggestion(
        &mut self,
        suggestion_id: i64,
        from: SuggestionStatus,
        to: SuggestionStatus,
    ) -> Result<bool, StoreError> {
        match self
            .suggestions
            .iter_mut()
            .find(|s| s.suggestion_id == suggestion_id && s.status == from)
        {
            Some(suggestion) => {
                suggestion.status = to;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn record_audit_event(&mut self, event: &AuditEvent) -> Result<i64, StoreError> {
        if self.fail_audit {
            return Err(StoreError::Backend(String::from("audit write failed")));
        }
        let id: i64 = self.next_id();
        self.audit_events.push((id, event.clone()));
        Ok(id)
    }

    fn list_audit_events(
        &mut self,
        subject: &AuditSubject,
    ) -> Result<Vec<AuditEvent>, StoreError> {
        Ok(self
            .audit_events
            .iter()
            .filter(|(_, event)| &event.subject == subject)
            .map(|(_, event)| event.clone())
            .collect())
    }
}

pub fn create_test_actor() -> Actor {
    Actor::staff("dispatcher-1")
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-100"), String::from("Staff request"))
}

pub fn create_test_context(today: Date) -> RequestContext {
    RequestContext::new(ORG, today, create_test_actor(), create_test_cause())
}

pub fn create_test_subscription(
    client: &Client,
    location: &Location,
    frequency: Frequency,
    preferred_day: Option<Weekday>,
    anchor_date: Date,
) -> NewSubscription {
    NewSubscription {
        organization_id: client.organization_id,
        client_id: client.client_id,
        location_id: location.location_id,
        frequency,
        preferred_day,
        status: SubscriptionStatus::Active,
        price_cents: 4500,
        anchor_date,
        initial_cleanup_required: false,
        assigned_technician_id: None,
    }
}

/// Seeds an active client with one location and inserts a subscription
/// directly, without materializing.
pub fn seed_subscription(
    store: &mut MemoryStore,
    frequency: Frequency,
    preferred_day: Option<Weekday>,
    anchor_date: Date,
) -> Subscription {
    let client: Client = store.add_client(ORG, "Pat's Lawn", true);
    let location: Location = store.add_location(&client, "Front yard");
    let new_subscription: NewSubscription =
        create_test_subscription(&client, &location, frequency, preferred_day, anchor_date);
    store.insert_subscription(&new_subscription).unwrap()
}
