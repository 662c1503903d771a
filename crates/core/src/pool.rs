// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pool identifier.

use std::fmt;

/// Numeric identifier of a storage pool, scoped to a cluster handle.
///
/// The local and remote cluster may assign the same pool a different id;
/// the reconciler keys on whichever id is appropriate for the call site
/// (see `spec.md` §3 — reconciliation uses the *remote* pool id, falling
/// back to the local id when the remote pool cannot be resolved).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(i64);

impl PoolId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PoolId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
#[path = "pool_tests.rs"]
mod tests;
