// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use fieldsched_domain::Suggestion;

use crate::data_models::SuggestionRow;
use crate::diesel_schema::optimization_suggestions;
use crate::error::PersistenceError;

/// Retrieves a suggestion by ID.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the suggestion does not exist,
/// or an error if its stored state cannot be decoded.
pub fn get_suggestion(
    conn: &mut SqliteConnection,
    suggestion_id: i64,
) -> Result<Suggestion, PersistenceError> {
    optimization_suggestions::table
        .filter(optimization_suggestions::suggestion_id.eq(suggestion_id))
        .select(SuggestionRow::as_select())
        .first::<SuggestionRow>(conn)
        .optional()?
        .ok_or_else(|| PersistenceError::NotFound(format!("suggestion {suggestion_id}")))?
        .into_domain()
}
