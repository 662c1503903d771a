// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Identity of a remote cluster paired with the local one for mirroring.

use std::collections::BTreeMap;
use std::fmt;

/// Identity of a remote ("peer") cluster: cluster name, client identity, and
/// any extra cluster parameters needed to connect to it.
///
/// Immutable after construction — a new peer supervisor is spawned rather
/// than mutating an existing `PeerId` in place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PeerId {
    cluster_name: String,
    client_id: String,
    cluster_params: BTreeMap<String, String>,
}

impl PeerId {
    pub fn new(cluster_name: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            client_id: client_id.into(),
            cluster_params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.cluster_params.insert(key.into(), value.into());
        self
    }

    pub fn cluster_name(&self) -> &str {
        &self.cluster_name
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn cluster_params(&self) -> &BTreeMap<String, String> {
        &self.cluster_params
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cluster_name)
    }
}

#[cfg(test)]
#[path = "peer_tests.rs"]
mod tests;
