// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Errors surfaced by collaborator trait implementations.
//!
//! These map onto the recoverable error kinds from spec.md §7.
//! `InvalidArgument` / `ConfigParse` are daemon-level (argument/config
//! parsing happens before any collaborator is touched), so they live in
//! `peer-daemon::error` instead of here.

use thiserror::Error;

/// Error returned by a collaborator operation.
#[derive(Debug, Error, Clone)]
pub enum CollabError {
    /// The remote cluster could not be reached (spec.md §7 `ConnectFailure`).
    #[error("connect failed: {0}")]
    Connect(String),

    /// A requested pool/object does not exist. Distinguished from
    /// `TransientStorage` because callers treat it specially (e.g.
    /// `InitBootstrap` step 4 falls back to the local pool id on
    /// `NotFound` but skips the pool on any other error).
    #[error("not found")]
    NotFound,

    /// Pool open, list, or metadata read failed (spec.md §7
    /// `TransientStorageError`). Recovery: log and skip the pool this
    /// tick, retry next tick.
    #[error("transient storage error: {0}")]
    TransientStorage(String),

    /// Status watch register/unregister failed (spec.md §7 `WatchError`).
    #[error("watch error: {0}")]
    Watch(String),

    /// A worker reported a lifecycle failure through its completion hook
    /// (spec.md §7 `WorkerLifecycleError`). Surfaced via status, never
    /// propagated out of the reconciler.
    #[error("worker lifecycle error: {0}")]
    WorkerLifecycle(String),
}
