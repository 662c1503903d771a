// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! peer-collab: trait contracts for the mirror peer replayer's external
//! collaborators (spec.md §6), plus `testkit` fakes for exercising
//! `peer-reconcile` and `peer-daemon` without a real cluster.
//!
//! Nothing in this crate performs real network or disk I/O — that is the
//! whole point of these being collaborator *contracts*. A production build
//! links a crate that implements them against a real cluster client; none
//! is vendored here (see DESIGN.md).

pub mod cluster;
pub mod deleter;
pub mod error;
pub mod ioctx;
pub mod pool_watcher;
pub mod replayer;
pub mod watch;

#[cfg(any(test, feature = "test-support"))]
pub mod testkit;

pub use cluster::{ClusterHandle, InstanceId, PoolListing};
pub use deleter::{DeletionCompletion, ImageDeleter};
pub use error::CollabError;
pub use ioctx::{IoCtx, MirrorImagePage, MirrorMode};
pub use pool_watcher::PoolWatcher;
pub use replayer::{CompletionHook, ImageReplayer, ImageReplayerFactory, ReplayerState, ReplayerStatus};
pub use watch::WatchHandle;
