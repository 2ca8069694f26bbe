// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph configuration

use crate::storage::free_index_list::DEFAULT_MIN_RUN_SLOTS;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Whether arbitrary physical reordering of incidences is allowed
///
/// A transaction layer that replays recorded operations sets `AppendOnly`
/// while it is active, which makes [`crate::Graph::sort_incidences`] fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReorderMode {
    #[default]
    Unrestricted,
    AppendOnly,
}

/// Capacities and policies of a graph instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Vertex slots available before the first growth
    pub initial_vertex_capacity: u32,

    /// Edge slots available before the first growth
    pub initial_edge_capacity: u32,

    /// Smallest number of slots added when a store grows
    pub min_growth: u32,

    /// Minimum length of the allocator run arrays
    pub min_run_slots: usize,

    pub reorder_mode: ReorderMode,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            initial_vertex_capacity: 1000,
            initial_edge_capacity: 1000,
            min_growth: 16,
            min_run_slots: DEFAULT_MIN_RUN_SLOTS,
            reorder_mode: ReorderMode::Unrestricted,
        }
    }
}

impl GraphConfig {
    pub fn with_capacities(vertices: u32, edges: u32) -> Self {
        Self {
            initial_vertex_capacity: vertices,
            initial_edge_capacity: edges,
            ..Self::default()
        }
    }

    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: GraphConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_growth == 0 {
            return Err(ConfigError::Invalid(
                "min_growth must be at least 1".to_string(),
            ));
        }
        if self.min_run_slots == 0 {
            return Err(ConfigError::Invalid(
                "min_run_slots must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
