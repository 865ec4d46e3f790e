// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fieldsched_domain::{NewSuggestion, Suggestion, SuggestionStatus};
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::ScheduleStateData;
use crate::diesel_schema::optimization_suggestions;
use crate::error::PersistenceError;
use crate::queries;

/// Inserts a `Pending` suggestion.
///
/// # Errors
///
/// Returns an error if serialization or the insert fails.
pub fn insert_suggestion(
    conn: &mut SqliteConnection,
    new: &NewSuggestion,
) -> Result<Suggestion, PersistenceError> {
    let current_json: String =
        serde_json::to_string(&ScheduleStateData::from_domain(&new.current_state))?;
    let suggested_json: String =
        serde_json::to_string(&ScheduleStateData::from_domain(&new.suggested_state))?;

    diesel::insert_into(optimization_suggestions::table)
        .values((
            optimization_suggestions::organization_id.eq(new.organization_id),
            optimization_suggestions::subscription_id.eq(new.subscription_id),
            optimization_suggestions::suggestion_type.eq(new.suggestion_type.as_str()),
            optimization_suggestions::current_state_json.eq(current_json),
            optimization_suggestions::suggested_state_json.eq(suggested_json),
            optimization_suggestions::reasoning.eq(&new.reasoning),
            optimization_suggestions::estimated_minutes_saved.eq(new.estimated_minutes_saved),
            optimization_suggestions::status.eq(SuggestionStatus::Pending.as_str()),
        ))
        .execute(conn)?;

    let suggestion_id: i64 = get_last_insert_rowid(conn)?;
    info!(suggestion_id, "Recorded suggestion");
    queries::suggestions::get_suggestion(conn, suggestion_id)
}

/// Moves a suggestion from `from` to `to` if it is still in `from`.
///
/// Returns whether a row changed.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn transition_suggestion(
    conn: &mut SqliteConnection,
    suggestion_id: i64,
    from: SuggestionStatus,
    to: SuggestionStatus,
) -> Result<bool, PersistenceError> {
    let updated: usize = diesel::update(
        optimization_suggestions::table
            .filter(optimization_suggestions::suggestion_id.eq(suggestion_id))
            .filter(optimization_suggestions::status.eq(from.as_str())),
    )
    .set(optimization_suggestions::status.eq(to.as_str()))
    .execute(conn)?;

    Ok(updated > 0)
}
