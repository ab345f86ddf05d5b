// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Bidirectional incremental sync between a `CalDAV` collection and a Google
//! calendar.
//!
//! A pass fetches the changes of one store since its checkpoint, deletes and
//! upserts them into the other store item by item, and advances the
//! checkpoint only when no item failed. A partially failed pass is repeated
//! next time; writes are idempotent, so repeating them is harmless.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::option_option,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::match_bool
)]

pub mod checkpoint;
mod config;
mod credentials;
mod error;
pub mod reconcile;
mod report;
mod sync;
mod targets;

pub use crate::checkpoint::{CheckpointStore, FileStore, MemoryStore, keys};
pub use crate::config::{APP_NAME, Config};
pub use crate::credentials::{GoogleToken, access_token, calendar_id, connect};
pub use crate::error::SyncError;
pub use crate::reconcile::SyncTarget;
pub use crate::report::{CreateResult, DeleteResult, PassReport, UpsertResult};
pub use crate::sync::{Direction, MAX_FETCH_ATTEMPTS, PairReport, SyncEngine, fetch_with_recovery};
pub use crate::targets::{CalDavTarget, GoogleTarget};
