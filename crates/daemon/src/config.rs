// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-peer configuration (spec.md §4.1 step b, §6 "Configuration"): a base
//! file, environment overrides, then `extra_args` parsed last so they win.

use std::path::Path;

use clap::Parser;
use serde::Deserialize;

use crate::error::LifecycleError;

const DEFAULT_THREADS: u32 = 4;
const CLUSTER_ENV_VAR: &str = "RBD_MIRROR_PEER_CLUSTER";
const THREADS_ENV_VAR: &str = "RBD_MIRROR_PEER_THREADS";

/// On-disk configuration file contents. Every field is optional since
/// environment variables and `extra_args` may supply it instead.
#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    cluster: Option<String>,
    threads: Option<u32>,
}

/// `extra_args` (spec.md §4.1 step b, §6), parsed with `clap` so a malformed
/// argument produces `InvalidArgument` instead of a panic.
#[derive(Debug, Clone, Parser)]
#[command(no_binary_name = true)]
struct PeerArgs {
    #[arg(long)]
    cluster: Option<String>,
    #[arg(long)]
    threads: Option<u32>,
}

/// Resolved per-peer configuration. `rbd_cache` is always `false` — the
/// local read cache is force-disabled for journal-tail workers (spec.md
/// §4.1 step c), so there is nothing to parse for it.
#[derive(Debug, Clone)]
pub struct Config {
    pub cluster: String,
    pub threads: u32,
    pub rbd_cache: bool,
}

impl Config {
    /// Load configuration: file (if given) < environment < `extra_args`,
    /// each layer overriding the last (spec.md §6 "`extra_args` is an
    /// ordered sequence parsed after environment variables").
    pub fn load(config_path: Option<&Path>, extra_args: &[String]) -> Result<Self, LifecycleError> {
        let file = match config_path {
            Some(path) => {
                let text = std::fs::read_to_string(path)?;
                toml::from_str(&text)?
            }
            None => FileConfig::default(),
        };

        let env_cluster = std::env::var(CLUSTER_ENV_VAR).ok();
        let env_threads = std::env::var(THREADS_ENV_VAR).ok().and_then(|s| s.parse().ok());

        let args = PeerArgs::try_parse_from(extra_args)?;

        let cluster = args
            .cluster
            .or(env_cluster)
            .or(file.cluster)
            .ok_or_else(|| LifecycleError::InvalidArgument("missing required 'cluster' setting".into()))?;
        let threads = args.threads.or(env_threads).or(file.threads).unwrap_or(DEFAULT_THREADS);

        Ok(Self { cluster, threads, rbd_cache: false })
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
