// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon-level errors (spec.md §7). Collaborator errors (`CollabError`)
//! only ever surface here through `init`, where they are fatal; every
//! per-pool `CollabError` inside the reconciler is logged and swallowed
//! instead, per spec.md §7's recovery policy.

use peer_collab::CollabError;
use thiserror::Error;

/// Fatal errors returned from [`crate::lifecycle::init`] (spec.md §4.1,
/// §7). Everything past `init` either retries internally or surfaces
/// through the `status` admin command, never through a `Result`.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// Peer client identity or `extra_args` could not be parsed (spec.md §7
    /// `InvalidArgument`).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration file, environment, or `extra_args` parse failure
    /// (spec.md §7 `ConfigParse`).
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// The remote cluster handle could not connect (spec.md §7
    /// `ConnectFailure`), or the mandatory first `refresh_images()` failed.
    #[error("connect failed: {0}")]
    ConnectFailure(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CollabError> for LifecycleError {
    fn from(err: CollabError) -> Self {
        LifecycleError::ConnectFailure(err.to_string())
    }
}

impl From<toml::de::Error> for LifecycleError {
    fn from(err: toml::de::Error) -> Self {
        LifecycleError::ConfigParse(err.to_string())
    }
}

impl From<clap::Error> for LifecycleError {
    fn from(err: clap::Error) -> Self {
        LifecycleError::InvalidArgument(err.to_string())
    }
}
