// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Image identity types.
//!
//! An image is addressed two ways: a pool-local `ImageId` (stable only
//! within one cluster) and a `GlobalImageId` (stable across clusters, used
//! to match a local image to its remote counterpart). `ImageIds` carries
//! both plus optional display metadata; `InitImageInfo` is the same shape
//! discovered locally at startup, before a remote target set exists to
//! compare it against.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::pool::PoolId;

/// Pool-local image identifier (e.g. the hex id `rbd` assigns an image).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(String);

impl ImageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Borrow<str> for ImageId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Cluster-independent stable identity shared by an image's instances
/// across clusters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlobalImageId(String);

impl GlobalImageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GlobalImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An image as advertised by a pool watcher: `id` is the reconciliation key,
/// `global_id` and `name` are advisory payloads carried forward for
/// deletion scheduling.
///
/// Equality and hashing are on `id` alone (spec.md §3, §4.4 "Tie-breaks"),
/// so a `HashSet<ImageIds>` behaves as a set keyed purely by pool-local id
/// even though two `ImageIds` with the same id but different `global_id`
/// are never expected to coexist in one pool's target set.
#[derive(Debug, Clone)]
pub struct ImageIds {
    pub id: ImageId,
    pub global_id: GlobalImageId,
    pub name: Option<String>,
}

impl ImageIds {
    pub fn new(id: ImageId, global_id: GlobalImageId) -> Self {
        Self { id, global_id, name: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl PartialEq for ImageIds {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ImageIds {}

impl Hash for ImageIds {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Borrow<ImageId> for ImageIds {
    fn borrow(&self) -> &ImageId {
        &self.id
    }
}

/// An image discovered locally at startup by `InitBootstrap`, before any
/// remote target set has been read. Matched against remote advertisements
/// by `global_id` alone, since that is the only identity guaranteed to be
/// shared between the local and remote instance of an image.
#[derive(Debug, Clone)]
pub struct InitImageInfo {
    pub global_id: GlobalImageId,
    pub pool_id: PoolId,
    pub id: ImageId,
    pub name: String,
}

impl PartialEq for InitImageInfo {
    fn eq(&self, other: &Self) -> bool {
        self.global_id == other.global_id
    }
}

impl Eq for InitImageInfo {}

impl PartialOrd for InitImageInfo {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for InitImageInfo {
    fn cmp(&self, other: &Self) -> Ordering {
        self.global_id.cmp(&other.global_id)
    }
}

impl Hash for InitImageInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.global_id.hash(state);
    }
}

/// Target set produced by a `PoolWatcher`: the images each pool currently
/// advertises for mirroring.
pub type PoolImageIds = HashMap<PoolId, HashSet<ImageIds>>;

/// Residue from `InitBootstrap`: images known locally at startup, keyed by
/// the pool's reconciliation key (remote pool id, or local id as a
/// fallback — see spec.md §4.2 step 4). Non-empty only before the first
/// reconciliation (spec.md invariant 3).
pub type InitResidue = HashMap<PoolId, HashSet<InitImageInfo>>;

#[cfg(test)]
#[path = "image_tests.rs"]
mod tests;
