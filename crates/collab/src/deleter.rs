// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ImageDeleter` contract (spec.md §6) — a durable queue of pending image
//! deletions with its own retry logic. The body is an external
//! collaborator; the reconciler only needs to enqueue work and gate
//! worker starts on a name clearing the queue.

use peer_core::{GlobalImageId, ImageId, PoolId};

/// Fire-and-forget deletion completion. `result >= 0` means "safe to
/// proceed" (the image is gone or was never scheduled); negative values
/// are retryable errors from the deleter's own backend (spec.md §6).
pub type DeletionCompletion = Box<dyn FnOnce(i32) + Send>;

pub trait ImageDeleter: Send + Sync {
    /// Enqueue an image for deletion. Fire-and-forget: the deleter owns
    /// retrying this independently of the reconciler's tick cadence.
    fn schedule_image_delete(
        &self,
        pool_id: PoolId,
        image_id: ImageId,
        image_name: Option<String>,
        global_id: GlobalImageId,
    );

    /// Wait (non-blockingly — `completion` fires later) for any deletion
    /// scheduled under `name` to clear, so a worker can safely be started
    /// over the same local image. When `retry_on_error` is set the
    /// deleter retries its own wait internally on transient failures
    /// before ever invoking `completion`.
    fn wait_for_scheduled_deletion(&self, name: &str, retry_on_error: bool, completion: DeletionCompletion);
}
