// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! ## Module Organization
//!
//! - `clients`: Client and location creation, client activation
//! - `subscriptions`: Subscription insert and update
//! - `jobs`: Job insert, cancellation and route binding
//! - `routes`: Route insert
//! - `suggestions`: Suggestion insert and conditional status transition
//! - `audit`: Audit event persistence
//!
//! Inserts read the new row ID back with `last_insert_rowid()` from the
//! `backend` module.

pub mod audit;
pub mod clients;
pub mod jobs;
pub mod routes;
pub mod subscriptions;
pub mod suggestions;
