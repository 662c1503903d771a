// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `PoolWatcher` contract (spec.md §6) — periodic remote listing that
//! yields the current target set. The body (actual remote listing,
//! signalling the supervisor's condition variable when results change) is
//! an external collaborator.

use crate::error::CollabError;
use peer_core::PoolImageIds;

/// Produces the target set the reconciler diffs against.
///
/// `get_images` **must** be called with the supervisor lock held (spec.md
/// §6) — the trait cannot enforce this, but every call site in
/// `peer-reconcile` holds `ReconcilerState`'s lock for the duration.
pub trait PoolWatcher: Send + Sync {
    /// Synchronously force a fresh listing. Called once during `init`
    /// (spec.md §4.1 step g) before the control loop starts.
    fn refresh_images(&self) -> Result<(), CollabError>;

    /// The most recently observed target set.
    fn get_images(&self) -> PoolImageIds;
}
