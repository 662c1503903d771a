// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-pool I/O context contract and the mirroring-directory primitives
//! exposed through it (spec.md §6).

use crate::error::CollabError;
use crate::watch::WatchHandle;
use peer_core::{GlobalImageId, ImageId, PoolId};

/// Whether mirroring is enabled for a pool, and in what mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MirrorMode {
    #[default]
    Disabled,
    Image,
    Pool,
}

impl MirrorMode {
    pub fn is_enabled(self) -> bool {
        !matches!(self, MirrorMode::Disabled)
    }
}

/// One page of the mirror-image directory (spec.md §4.2 step 5).
#[derive(Debug, Clone, Default)]
pub struct MirrorImagePage {
    pub entries: Vec<(ImageId, GlobalImageId)>,
}

impl MirrorImagePage {
    /// Whether this page is a *full* page — i.e. paging should continue.
    /// `spec.md` uses a 1024-entry page size and stops when a page returns
    /// fewer entries than that.
    pub fn is_full(&self, page_size: usize) -> bool {
        self.entries.len() == page_size
    }
}

/// An open I/O context for one pool on one cluster handle.
pub trait IoCtx: Send + Sync {
    fn pool_id(&self) -> PoolId;

    /// Read the pool's mirror mode (spec.md §4.2 step 3, §4.4 phase 3 step 2).
    fn mirror_mode_get(&self) -> Result<MirrorMode, CollabError>;

    /// Read the pool's mirror uuid (spec.md §4.4 phase 3 step 2).
    fn mirror_uuid_get(&self) -> Result<String, CollabError>;

    /// Page through the mirror-image directory. `after` is the last
    /// image id from the previous page, or `None` for the first page.
    /// `limit` is the page size (1024 per spec.md §4.2 step 5).
    fn mirror_image_list(
        &self,
        after: Option<&ImageId>,
        limit: usize,
    ) -> Result<MirrorImagePage, CollabError>;

    /// Resolve the human-readable name for an image id via the directory.
    fn dir_get_name(&self, image_id: &ImageId) -> Result<String, CollabError>;

    /// Idempotent cleanup of stale per-instance status left by a crashed
    /// instance identified by `instance_id` (spec.md §4.5 `open`).
    fn mirror_image_status_remove_down(
        &self,
        instance_id: &crate::cluster::InstanceId,
    ) -> Result<(), CollabError>;

    /// Register a watch on this pool's mirroring metadata object. The
    /// callback is invoked on notification; the supervisor always
    /// acknowledges immediately with an empty payload (spec.md §4.5) —
    /// implementations do not need the callback's return value for
    /// anything beyond that acknowledgement.
    fn watch(&self, on_notify: Box<dyn Fn() + Send + Sync>) -> Result<Box<dyn WatchHandle>, CollabError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[yare::parameterized(
        disabled = { MirrorMode::Disabled, false },
        image    = { MirrorMode::Image,    true },
        pool     = { MirrorMode::Pool,     true },
    )]
    fn is_enabled_matches_mode(mode: MirrorMode, expected: bool) {
        assert_eq!(mode.is_enabled(), expected);
    }

    #[test]
    fn full_page_signals_continue() {
        let page = MirrorImagePage { entries: vec![(ImageId::new("a"), GlobalImageId::new("ga"))] };
        assert!(page.is_full(1));
        assert!(!page.is_full(2));
    }
}
