// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! TypeGraph CLI entry point

use clap::Parser;
use colored::Colorize;

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // -v wins over --log-level; RUST_LOG still applies when neither is given
    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else if let Some(level) = cli.log_level {
        level.to_level_filter()
    } else {
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    match cli.command {
        Commands::Version => {
            println!("{} {}", "TypeGraph".bold().green(), typegraph::VERSION);
            println!("Array-backed storage core for typed graphs");
            Ok(())
        }

        Commands::Demo { vertices, format } => cli::handle_demo(vertices, format),

        Commands::Inspect {
            snapshot,
            schema,
            config,
            format,
        } => cli::handle_inspect(snapshot, schema, config, format),
    }
}
