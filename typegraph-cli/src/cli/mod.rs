// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for TypeGraph
//!
//! Builds demo graphs or restores snapshots and prints their structure.

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands};
pub use handlers::{handle_demo, handle_inspect};
