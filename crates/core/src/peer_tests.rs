// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn display_uses_cluster_name() {
    let peer = PeerId::new("backup-site", "client.rbd-mirror-peer");
    assert_eq!(peer.to_string(), "backup-site");
}

#[test]
fn with_param_is_queryable() {
    let peer = PeerId::new("backup-site", "client.rbd-mirror-peer")
        .with_param("mon_host", "10.0.0.1,10.0.0.2");
    assert_eq!(peer.cluster_params().get("mon_host").map(String::as_str), Some("10.0.0.1,10.0.0.2"));
}

#[test]
fn equality_considers_all_fields() {
    let a = PeerId::new("site-a", "client.x");
    let b = PeerId::new("site-a", "client.x");
    let c = PeerId::new("site-a", "client.y");
    assert_eq!(a, b);
    assert_ne!(a, c);
}
