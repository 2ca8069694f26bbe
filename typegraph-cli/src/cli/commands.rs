// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command-line arguments

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "typegraph", version, about = "Inspect TypeGraph graphs")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<log::Level>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print version information
    Version,

    /// Build a ring of stations and print its structure
    Demo {
        /// Number of stations in the ring
        #[arg(long, default_value_t = 10)]
        vertices: u32,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Restore a snapshot and print its structure
    Inspect {
        /// Snapshot JSON file
        snapshot: PathBuf,

        /// Schema definition JSON file
        #[arg(long)]
        schema: PathBuf,

        /// Graph configuration JSON file
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}
