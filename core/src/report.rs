// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

/// Outcome of a create-only batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateResult {
    /// Number of events created.
    pub created: usize,
    /// One message per failed event, in input order.
    pub errors: Vec<String>,
}

/// Outcome of an upsert batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpsertResult {
    /// Number of existing events replaced.
    pub updated: usize,
    /// Number of events created.
    pub created: usize,
    /// One message per failed event, in input order.
    pub errors: Vec<String>,
}

/// Outcome of a delete batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteResult {
    /// Number of events now absent, including those that already were.
    pub deleted: usize,
    /// One message per failed event, in input order.
    pub errors: Vec<String>,
}

/// Outcome of one sync pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassReport {
    /// Checkpoint returned by the source store.
    pub sync_token: String,
    /// Delete phase.
    pub deleted: DeleteResult,
    /// Upsert phase.
    pub upserted: UpsertResult,
    /// Whether the checkpoint was advanced to `sync_token`.
    pub checkpoint_saved: bool,
}

impl PassReport {
    /// Errors of both phases, delete phase first.
    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.deleted
            .errors
            .iter()
            .chain(&self.upserted.errors)
            .map(String::as_str)
    }

    /// Whether every item of the pass reached its terminal state.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.deleted.errors.is_empty() && self.upserted.errors.is_empty()
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "deleted={}, updated={}, created={}, errors={}",
            self.deleted.deleted,
            self.upserted.updated,
            self.upserted.created,
            self.deleted.errors.len() + self.upserted.errors.len()
        )
    }
}
