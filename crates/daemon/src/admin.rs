// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The administrative command surface (spec.md §4.6): five verbs, each
//! serialized through the supervisor lock, represented as a tagged enum per
//! SPEC_FULL.md §4.6 (one dispatch function rather than a handler class per
//! verb).

use peer_collab::ReplayerStatus;
use peer_core::PeerId;
use peer_reconcile::Supervisor;
use serde::Serialize;

/// One of the five verbs `rbd mirror {status,start,stop,restart,flush} N`
/// maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    Status,
    Start,
    Stop,
    Restart,
    Flush,
}

/// Table pairing each verb's external name with its tag (spec.md §6's
/// command names, SPEC_FULL.md §4.6's "registration is a table").
pub const COMMAND_TABLE: &[(&str, AdminCommand)] = &[
    ("status", AdminCommand::Status),
    ("start", AdminCommand::Start),
    ("stop", AdminCommand::Stop),
    ("restart", AdminCommand::Restart),
    ("flush", AdminCommand::Flush),
];

pub fn lookup(verb: &str) -> Option<AdminCommand> {
    COMMAND_TABLE.iter().find(|(name, _)| *name == verb).map(|(_, cmd)| *cmd)
}

/// `status`'s structured document (spec.md §4.6, §8 scenario 6): every
/// worker's status in one consistent snapshot, since the whole thing is
/// built while the caller holds the supervisor lock.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub peer: String,
    pub image_replayers: Vec<ReplayerStatus>,
}

/// Run one admin command to completion. Returns `Some` only for `status`;
/// every other verb mutates in place and acknowledges with nothing.
/// All five are no-ops once `stopping` (spec.md §4.6).
pub fn dispatch(supervisor: &Supervisor, peer: &PeerId, command: AdminCommand) -> Option<StatusReport> {
    let mut guard = supervisor.lock();
    if guard.stopping {
        return None;
    }

    match command {
        AdminCommand::Status => return Some(build_status_report(&guard, peer)),
        AdminCommand::Start => {
            guard.manual_stopped = false;
            for_each_worker(&guard, |w| w.replayer().start(Box::new(|_| {}), true));
        }
        AdminCommand::Stop => {
            guard.manual_stopped = true;
            for_each_worker(&guard, |w| w.replayer().stop(Box::new(|_| {}), true));
        }
        AdminCommand::Restart => {
            guard.manual_stopped = false;
            for_each_worker(&guard, |w| w.replayer().restart());
        }
        AdminCommand::Flush => {
            if !guard.manual_stopped {
                for_each_worker(&guard, |w| w.replayer().flush());
            }
        }
    }
    drop(guard);
    supervisor.notify_all();
    None
}

fn for_each_worker(state: &peer_reconcile::ReconcilerState, mut f: impl FnMut(&peer_reconcile::Worker)) {
    for workers in state.images.values() {
        for worker in workers.values() {
            f(worker);
        }
    }
}

fn build_status_report(state: &peer_reconcile::ReconcilerState, peer: &PeerId) -> StatusReport {
    let mut image_replayers = Vec::with_capacity(state.images.values().map(|w| w.len()).sum());
    for workers in state.images.values() {
        for worker in workers.values() {
            image_replayers.push(worker.replayer().print_status());
        }
    }
    StatusReport { peer: peer.to_string(), image_replayers }
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
