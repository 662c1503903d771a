// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rbd-mirror-peer`: one process per configured peer (spec.md §1). Wires
//! a `PeerReplayer` against its collaborators and either runs once
//! (`--once`) or stays resident until `SIGINT`/`SIGTERM`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use peer_core::PeerId;
use peer_daemon::lifecycle::InitArgs;
use peer_daemon::PeerReplayer;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "rbd-mirror-peer", about = "Per-peer mirror replayer daemon")]
struct Cli {
    /// Name of the remote cluster this process mirrors from.
    #[arg(long)]
    cluster: String,

    /// Cephx client identity to connect with.
    #[arg(long, default_value = "client.rbd-mirror-peer")]
    client_id: String,

    /// Path to an optional TOML configuration file (spec.md §6).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a single reconciliation tick and exit (SPEC_FULL.md §10).
    #[arg(long)]
    once: bool,

    /// Extra `key=value`-shaped arguments, parsed last and given highest
    /// precedence (spec.md §4.1 step b, §6).
    #[arg(trailing_var_arg = true)]
    extra_args: Vec<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[cfg(feature = "demo")]
fn wire_demo_collaborators(cli: &Cli) -> (Arc<dyn peer_collab::ClusterHandle>, Arc<dyn peer_collab::ClusterHandle>, Arc<dyn peer_collab::ImageDeleter>, Arc<dyn peer_collab::ImageReplayerFactory>, Arc<dyn peer_collab::PoolWatcher>) {
    use peer_collab::testkit::{FakeClusterHandle, FakeImageDeleter, FakeImageReplayerFactory, FakePoolWatcher};

    tracing::warn!("running against in-memory demo collaborators, not a real cluster (see DESIGN.md)");

    let local = Arc::new(FakeClusterHandle::new(cli.client_id.clone()));
    let remote = Arc::new(FakeClusterHandle::new(cli.client_id.clone()));
    let deleter = Arc::new(FakeImageDeleter::new());
    let factory = Arc::new(FakeImageReplayerFactory::new());
    let pool_watcher = Arc::new(FakePoolWatcher::new());

    (local, remote, deleter, factory, pool_watcher)
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let peer = PeerId::new(cli.cluster.clone(), cli.client_id.clone());

    #[cfg(feature = "demo")]
    let (local, remote, deleter, factory, pool_watcher) = wire_demo_collaborators(&cli);
    #[cfg(not(feature = "demo"))]
    compile_error!("peer-daemon currently requires the `demo` feature; no real cluster collaborator crate is wired in yet (see DESIGN.md)");

    let rt = tokio::runtime::Builder::new_multi_thread().enable_all().build().context("failed to build tokio runtime")?;

    let args = InitArgs {
        peer,
        local,
        remote,
        deleter,
        factory,
        pool_watcher,
        config_path: cli.config.clone(),
        extra_args: cli.extra_args.clone(),
        rt: rt.handle().clone(),
    };

    if cli.once {
        PeerReplayer::init_once(args).context("single reconciliation tick failed")?;
        return Ok(());
    }

    let replayer = PeerReplayer::init(args).context("peer replayer init failed")?;
    tracing::info!(peer = %replayer.peer(), "peer replayer running, waiting for shutdown signal");

    rt.block_on(async {
        let _ = tokio::signal::ctrl_c().await;
    });

    tracing::info!("shutdown signal received");
    replayer.destroy();
    Ok(())
}
