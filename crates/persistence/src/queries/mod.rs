// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `clients`: Client and location lookups
//! - `subscriptions`: Subscription lookups
//! - `jobs`: Job slot and listing queries
//! - `routes`: Route lookups and stop counts
//! - `suggestions`: Suggestion lookups
//! - `audit`: Audit events by subject

pub mod audit;
pub mod clients;
pub mod jobs;
pub mod routes;
pub mod subscriptions;
pub mod suggestions;
