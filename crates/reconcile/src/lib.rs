// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! peer-reconcile: the reconciliation engine (spec.md §4.2-§4.5) — bootstrap
//! scan, the in-memory worker/watch model, the three-phase diff-and-apply
//! algorithm, and the background control loop that drives it.
//!
//! Nothing here talks to a real cluster; every I/O-shaped operation goes
//! through a `peer-collab` trait object supplied by the caller.

pub mod bootstrap;
pub mod control_loop;
pub mod reconciler;
pub mod state;
pub mod status_watch;
pub mod supervisor;

pub use control_loop::ControlLoop;
pub use reconciler::{Reconciler, StopOutcome};
pub use state::{Images, ReconcilerState, Worker};
pub use supervisor::Supervisor;
