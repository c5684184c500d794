//! Saving and loading game state snapshots
//!
//! Snapshots are JSON documents holding the full [`GameState`] in its wire
//! shape (`"x,y"` map keys, `previousBody` links) plus the crate version that
//! wrote them.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::game::GameState;

/// A saved game state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Version of the crate that wrote the file
    pub version: String,

    pub state: GameState,
}

impl Snapshot {
    pub fn new(state: GameState) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            state,
        }
    }
}

/// Write a snapshot of `state` to `path`, creating parent directories as needed
pub fn save_snapshot(state: &GameState, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let json = serde_json::to_string_pretty(&Snapshot::new(state.clone()))
        .context("Failed to serialize snapshot")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write snapshot to {:?}", path))?;

    Ok(())
}

/// Read a snapshot from `path` and check that its snake is well formed
pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot from {:?}", path))?;
    let snapshot: Snapshot =
        serde_json::from_str(&json).with_context(|| format!("Failed to parse {:?}", path))?;
    snapshot
        .state
        .validate()
        .with_context(|| format!("Snapshot {:?} holds an invalid state", path))?;

    Ok(snapshot)
}
