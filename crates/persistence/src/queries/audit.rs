// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit event queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fieldsched_audit::{
    Action, Actor, AuditEvent, AuditSubject, Cause, StateSnapshot, SubjectKind,
};

use crate::data_models::{ActionData, ActorData, CauseData, StateSnapshotData};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Diesel Queryable struct for full audit event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventRow {
    #[allow(dead_code)]
    event_id: i64,
    organization_id: i64,
    subject_kind: String,
    subject_id: Option<i64>,
    actor_json: String,
    cause_json: String,
    action_json: String,
    before_snapshot_json: String,
    after_snapshot_json: String,
    #[allow(dead_code)]
    created_at: Option<String>,
}

impl AuditEventRow {
    fn into_event(self) -> Result<AuditEvent, PersistenceError> {
        let kind: SubjectKind = SubjectKind::parse(&self.subject_kind).ok_or_else(|| {
            PersistenceError::ReconstructionError(format!(
                "unknown audit subject kind '{}'",
                self.subject_kind
            ))
        })?;

        let actor_data: ActorData = serde_json::from_str(&self.actor_json)?;
        let cause_data: CauseData = serde_json::from_str(&self.cause_json)?;
        let action_data: ActionData = serde_json::from_str(&self.action_json)?;
        let before_data: StateSnapshotData = serde_json::from_str(&self.before_snapshot_json)?;
        let after_data: StateSnapshotData = serde_json::from_str(&self.after_snapshot_json)?;

        Ok(AuditEvent::new(
            self.organization_id,
            AuditSubject {
                kind,
                id: self.subject_id,
            },
            Actor::new(actor_data.id, actor_data.actor_type),
            Cause::new(cause_data.id, cause_data.description),
            Action::new(action_data.name, action_data.details),
            StateSnapshot::new(before_data.data),
            StateSnapshot::new(after_data.data),
        ))
    }
}

/// Lists the audit events recorded for a subject, oldest first.
///
/// A subject without an ID (e.g. a rejected creation) matches events that
/// were recorded without one.
///
/// # Errors
///
/// Returns an error if the query fails or a stored event cannot be
/// deserialized.
pub fn list_audit_events(
    conn: &mut SqliteConnection,
    subject: &AuditSubject,
) -> Result<Vec<AuditEvent>, PersistenceError> {
    let mut query = audit_events::table
        .filter(audit_events::subject_kind.eq(subject.kind.as_str()))
        .select(AuditEventRow::as_select())
        .into_boxed();

    query = match subject.id {
        Some(id) => query.filter(audit_events::subject_id.eq(id)),
        None => query.filter(audit_events::subject_id.is_null()),
    };

    query
        .order(audit_events::event_id.asc())
        .load::<AuditEventRow>(conn)?
        .into_iter()
        .map(AuditEventRow::into_event)
        .collect()
}
