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
    clippy::all
)]

#[cfg(test)]
mod tests;

/// Represents the entity performing an action.
///
/// An actor is a staff member, the payment processor, or an automated
/// process such as the materializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "staff", "billing", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// Creates a staff actor.
    #[must_use]
    pub fn staff(id: &str) -> Self {
        Self::new(id.to_string(), String::from("staff"))
    }

    /// Creates the actor used for payment-processor events.
    #[must_use]
    pub fn billing(processor: &str) -> Self {
        Self::new(processor.to_string(), String::from("billing"))
    }

    /// Creates an actor for an automated process.
    #[must_use]
    pub fn system(process: &str) -> Self {
        Self::new(process.to_string(), String::from("system"))
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID, processor event ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`PauseSubscription`", "`AssignJob`").
    pub name: String,
    /// Optional additional details, such as "3 jobs voided / 0 jobs generated".
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A snapshot of entity state at a point in time.
///
/// The data is an opaque, human-readable rendering produced by the layer
/// that performed the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// A string representation of the state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// The snapshot used when no prior state exists.
    #[must_use]
    pub fn absent() -> Self {
        Self::new(String::from("(none)"))
    }
}

/// The kind of entity an audit event concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubjectKind {
    Client,
    Subscription,
    Job,
    Route,
    Suggestion,
}

impl SubjectKind {
    /// Converts this kind to its stored representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Subscription => "subscription",
            Self::Job => "job",
            Self::Route => "route",
            Self::Suggestion => "suggestion",
        }
    }

    /// Parses a stored subject kind.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "client" => Some(Self::Client),
            "subscription" => Some(Self::Subscription),
            "job" => Some(Self::Job),
            "route" => Some(Self::Route),
            "suggestion" => Some(Self::Suggestion),
            _ => None,
        }
    }
}

impl std::fmt::Display for SubjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The entity an audit event concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuditSubject {
    pub kind: SubjectKind,
    /// `None` when the entity was never persisted.
    pub id: Option<i64>,
}

impl AuditSubject {
    /// Creates a subject for a persisted entity.
    #[must_use]
    pub const fn new(kind: SubjectKind, id: i64) -> Self {
        Self { kind, id: Some(id) }
    }

    #[must_use]
    pub const fn subscription(subscription_id: i64) -> Self {
        Self::new(SubjectKind::Subscription, subscription_id)
    }

    #[must_use]
    pub const fn job(job_id: i64) -> Self {
        Self::new(SubjectKind::Job, job_id)
    }

    #[must_use]
    pub const fn suggestion(suggestion_id: i64) -> Self {
        Self::new(SubjectKind::Suggestion, suggestion_id)
    }
}

impl std::fmt::Display for AuditSubject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.id {
            Some(id) => write!(f, "{}:{id}", self.kind),
            None => write!(f, "{}:new", self.kind),
        }
    }
}

/// An immutable audit event representing a state transition.
///
/// Every successful lifecycle change, assignment, and suggestion
/// resolution produces exactly one audit event. Audit events capture:
/// - Which organization and entity the change concerns
/// - Who performed the action (actor)
/// - Why it was performed (cause)
/// - What action was performed (action)
/// - The state before and after the transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The owning organization.
    pub organization_id: i64,
    /// The entity this event concerns.
    pub subject: AuditSubject,
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// Once created, an audit event is immutable.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        organization_id: i64,
        subject: AuditSubject,
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            organization_id,
            subject,
            actor,
            cause,
            action,
            before,
            after,
        }
    }
}
