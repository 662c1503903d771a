// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ImageReplayer` contract (spec.md §6) — the per-image worker that tails
//! a remote image's journal and applies it locally. The body is an
//! external collaborator; only the control surface the reconciler needs
//! lives here.

use peer_core::{GlobalImageId, ImageId, PoolId};
use serde::Serialize;

use crate::error::CollabError;

/// Observable lifecycle state of a worker (spec.md §3 `Worker`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplayerState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

/// Completion hook passed to `start`/`stop`. Workers are required to be
/// non-blocking (spec.md §5): `start`/`stop` return immediately and invoke
/// this hook later, from whatever thread the worker's own runtime uses.
pub type CompletionHook = Box<dyn FnOnce(Result<(), CollabError>) + Send>;

/// Snapshot of one worker's status for the `status` admin command
/// (spec.md §4.6, §8 scenario 6).
#[derive(Debug, Clone, Serialize)]
pub struct ReplayerStatus {
    pub pool_id: PoolId,
    pub image_id: ImageId,
    pub global_image_id: GlobalImageId,
    pub image_name: Option<String>,
    pub state: ReplayerState,
    /// Free-form detail the worker wants surfaced (replay position,
    /// last error, etc). The core never parses this.
    pub description: String,
}

/// The per-image worker. The reconciler is its sole owner (spec.md
/// invariant 1); it never shares a `Worker` handle with anything else.
pub trait ImageReplayer: Send + Sync {
    fn is_stopped(&self) -> bool;
    fn is_running(&self) -> bool;

    /// Start the worker. No-op if not currently `Stopped` (spec.md §4.4
    /// `start_worker`: idempotent).
    fn start(&self, on_complete: CompletionHook, manual: bool);

    /// Stop the worker. No-op if already `Stopped`. `manual` distinguishes
    /// an admin-initiated stop from a reconciliation-driven one (spec.md
    /// §4.6).
    fn stop(&self, on_complete: CompletionHook, manual: bool);

    /// Restart: used by the `restart` admin command.
    fn restart(&self);

    /// Flush any buffered replay progress. No-op if already flushed.
    fn flush(&self);

    fn print_status(&self) -> ReplayerStatus;

    fn local_pool_id(&self) -> PoolId;
    fn local_image_id(&self) -> ImageId;
    fn local_image_name(&self) -> Option<String>;
    fn global_image_id(&self) -> GlobalImageId;
}

/// Constructs a new `ImageReplayer` for one image (spec.md §4.4 phase 3
/// step 4). Kept as a separate factory trait, rather than a constructor on
/// `ImageReplayer` itself, so the reconciler can depend on a single
/// `Arc<dyn ImageReplayerFactory>` without needing to know the concrete
/// worker type.
pub trait ImageReplayerFactory: Send + Sync {
    #[allow(clippy::too_many_arguments)]
    fn create(
        &self,
        threads: u32,
        local_pool_id: PoolId,
        remote_pool_id: PoolId,
        local_mirror_uuid: &str,
        remote_mirror_uuid: &str,
        image_id: ImageId,
        global_image_id: GlobalImageId,
    ) -> Box<dyn ImageReplayer>;
}
