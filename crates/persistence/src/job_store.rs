// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `JobStore` implementation for the `SQLite` adapter.

use fieldsched::{JobStore, StoreError};
use fieldsched_audit::{AuditEvent, AuditSubject};
use fieldsched_domain::{
    Client, Job, Location, NewJob, NewRoute, NewSubscription, NewSuggestion, Route,
    Subscription, Suggestion, SuggestionStatus,
};
use time::Date;

use crate::{Persistence, mutations, queries};

impl JobStore for Persistence {
    fn get_client(&mut self, client_id: i64) -> Result<Client, StoreError> {
        Ok(queries::clients::get_client(&mut self.conn, client_id)?)
    }

    fn list_clients(&mut self, organization_id: i64) -> Result<Vec<Client>, StoreError> {
        Ok(queries::clients::list_clients(
            &mut self.conn,
            organization_id,
        )?)
    }

    fn set_client_active(&mut self, client_id: i64, is_active: bool) -> Result<(), StoreError> {
        Ok(mutations::clients::set_client_active(
            &mut self.conn,
            client_id,
            is_active,
        )?)
    }

    fn get_location(&mut self, location_id: i64) -> Result<Location, StoreError> {
        Ok(queries::clients::get_location(&mut self.conn, location_id)?)
    }

    fn list_locations(&mut self, organization_id: i64) -> Result<Vec<Location>, StoreError> {
        Ok(queries::clients::list_locations(
            &mut self.conn,
            organization_id,
        )?)
    }

    fn get_subscription(&mut self, subscription_id: i64) -> Result<Subscription, StoreError> {
        Ok(queries::subscriptions::get_subscription(
            &mut self.conn,
            subscription_id,
        )?)
    }

    fn list_subscriptions(
        &mut self,
        organization_id: i64,
    ) -> Result<Vec<Subscription>, StoreError> {
        Ok(queries::subscriptions::list_subscriptions(
            &mut self.conn,
            organization_id,
        )?)
    }

    fn list_subscriptions_for_client(
        &mut self,
        client_id: i64,
    ) -> Result<Vec<Subscription>, StoreError> {
        Ok(queries::subscriptions::list_subscriptions_for_client(
            &mut self.conn,
            client_id,
        )?)
    }

    fn insert_subscription(
        &mut self,
        subscription: &NewSubscription,
    ) -> Result<Subscription, StoreError> {
        Ok(mutations::subscriptions::insert_subscription(
            &mut self.conn,
            subscription,
        )?)
    }

    fn update_subscription(&mut self, subscription: &Subscription) -> Result<(), StoreError> {
        Ok(mutations::subscriptions::update_subscription(
            &mut self.conn,
            subscription,
        )?)
    }

    fn find_live_job(
        &mut self,
        subscription_id: i64,
        date: Date,
    ) -> Result<Option<Job>, StoreError> {
        Ok(queries::jobs::find_live_job(
            &mut self.conn,
            subscription_id,
            date,
        )?)
    }

    fn insert_job(&mut self, job: &NewJob) -> Result<Job, StoreError> {
        Ok(mutations::jobs::insert_job(&mut self.conn, job)?)
    }

    fn get_job(&mut self, job_id: i64) -> Result<Job, StoreError> {
        Ok(queries::jobs::get_job(&mut self.conn, job_id)?)
    }

    fn list_jobs_for_subscription(
        &mut self,
        subscription_id: i64,
        from: Option<Date>,
    ) -> Result<Vec<Job>, StoreError> {
        Ok(queries::jobs::list_jobs_for_subscription(
            &mut self.conn,
            subscription_id,
            from,
        )?)
    }

    fn cancel_job(&mut self, job_id: i64, reason: &str) -> Result<bool, StoreError> {
        Ok(mutations::jobs::cancel_job(&mut self.conn, job_id, reason)?)
    }

    fn attach_job_to_route(
        &mut self,
        job_id: i64,
        technician_id: i64,
        route_id: i64,
        route_order: i32,
    ) -> Result<(), StoreError> {
        Ok(mutations::jobs::attach_job_to_route(
            &mut self.conn,
            job_id,
            technician_id,
            route_id,
            route_order,
        )?)
    }

    fn find_route(
        &mut self,
        organization_id: i64,
        technician_id: i64,
        date: Date,
    ) -> Result<Option<Route>, StoreError> {
        Ok(queries::routes::find_route(
            &mut self.conn,
            organization_id,
            technician_id,
            date,
        )?)
    }

    fn insert_route(&mut self, route: &NewRoute) -> Result<Route, StoreError> {
        Ok(mutations::routes::insert_route(&mut self.conn, route)?)
    }

    fn get_route(&mut self, route_id: i64) -> Result<Route, StoreError> {
        Ok(queries::routes::get_route(&mut self.conn, route_id)?)
    }

    fn count_route_stops(&mut self, route_id: i64) -> Result<i64, StoreError> {
        Ok(queries::jobs::count_route_stops(&mut self.conn, route_id)?)
    }

    fn insert_suggestion(&mut self, suggestion: &NewSuggestion) -> Result<Suggestion, StoreError> {
        Ok(mutations::suggestions::insert_suggestion(
            &mut self.conn,
            suggestion,
        )?)
    }

    fn get_suggestion(&mut self, suggestion_id: i64) -> Result<Suggestion, StoreError> {
        Ok(queries::suggestions::get_suggestion(
            &mut self.conn,
            suggestion_id,
        )?)
    }

    fn transition_suggestion(
        &mut self,
        suggestion_id: i64,
        from: SuggestionStatus,
        to: SuggestionStatus,
    ) -> Result<bool, StoreError> {
        Ok(mutations::suggestions::transition_suggestion(
            &mut self.conn,
            suggestion_id,
            from,
            to,
        )?)
    }

    fn record_audit_event(&mut self, event: &AuditEvent) -> Result<i64, StoreError> {
        Ok(mutations::audit::persist_audit_event(&mut self.conn, event)?)
    }

    fn list_audit_events(&mut self, subject: &AuditSubject) -> Result<Vec<AuditEvent>, StoreError> {
        Ok(queries::audit::list_audit_events(&mut self.conn, subject)?)
    }
}
