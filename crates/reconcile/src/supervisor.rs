// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single supervisor lock (spec.md §5): a `parking_lot::Mutex` guarding
//! [`ReconcilerState`] paired with a `parking_lot::Condvar` the control loop
//! waits on between ticks. Every path that mutates reconciler state —
//! reconciliation, admin commands, the deletion-gated start continuation —
//! goes through this one lock.

use parking_lot::{Condvar, Mutex, MutexGuard};
use std::time::Duration;

use crate::state::ReconcilerState;

pub struct Supervisor {
    state: Mutex<ReconcilerState>,
    cond: Condvar,
}

impl Supervisor {
    pub fn new(state: ReconcilerState) -> Self {
        Self { state: Mutex::new(state), cond: Condvar::new() }
    }

    pub fn lock(&self) -> MutexGuard<'_, ReconcilerState> {
        self.state.lock()
    }

    /// Wait for a wakeup or `timeout`, whichever comes first. Returns once
    /// the lock is reacquired, regardless of which unblocked the wait.
    pub fn wait_timeout<'a>(&self, guard: &mut MutexGuard<'a, ReconcilerState>, timeout: Duration) {
        self.cond.wait_for(guard, timeout);
    }

    /// Wake anyone parked in `wait_timeout` (admin commands, fresh
    /// PoolWatcher data, or shutdown).
    pub fn notify_all(&self) {
        self.cond.notify_all();
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
