// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Command handlers

use crate::cli::commands::OutputFormat;
use crate::cli::output::ReportFormatter;
use colored::*;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;
use typegraph::{
    EdgeTypeDefinition, Graph, GraphConfig, GraphSnapshot, Schema, SchemaDefinition, Value,
    VertexTypeDefinition,
};

/// Schema used by `demo`
fn ring_schema() -> Result<Schema, Box<dyn std::error::Error>> {
    let schema = SchemaDefinition::new("Ring")
        .vertex_type(VertexTypeDefinition::new("Station").attribute("name", Value::from("")))
        .edge_type(
            EdgeTypeDefinition::new("Track", "Station", "Station")
                .attribute("length", Value::Number(1.0)),
        )
        .build()?;
    Ok(schema)
}

/// Build a ring of `count` stations where track i runs from station i to
/// station i+1, wrapping at the end
pub fn build_ring(count: u32) -> Result<Graph, Box<dyn std::error::Error>> {
    let schema = Arc::new(ring_schema()?);
    let station = schema
        .vertex_type_id("Station")
        .ok_or("ring schema has no Station type")?;
    let track = schema
        .edge_type_id("Track")
        .ok_or("ring schema has no Track type")?;

    let config = GraphConfig::with_capacities(count.max(1), count.max(1));
    let mut graph = Graph::with_config(schema, config);

    let mut stations = Vec::with_capacity(count as usize);
    for i in 0..count {
        let v = graph.create_vertex(station)?;
        graph.set_vertex_attribute(v, "name", format!("S{}", i + 1))?;
        stations.push(v);
    }
    for (i, &from) in stations.iter().enumerate() {
        let to = stations[(i + 1) % stations.len()];
        graph.create_edge(track, from, to)?;
    }
    Ok(graph)
}

pub fn handle_demo(vertices: u32, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    info!("Building demo ring with {} stations", vertices);
    let graph = build_ring(vertices)?;
    print!("{}", ReportFormatter::format(&graph, format)?);
    Ok(())
}

pub fn handle_inspect(
    snapshot: PathBuf,
    schema: PathBuf,
    config: Option<PathBuf>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let definition: SchemaDefinition = serde_json::from_str(&std::fs::read_to_string(&schema)?)?;
    let schema = Arc::new(definition.build()?);

    let config = match config {
        Some(path) => GraphConfig::from_file(path)?,
        None => GraphConfig::default(),
    };

    info!("Restoring snapshot {}", snapshot.display());
    let snapshot = GraphSnapshot::from_json(&std::fs::read_to_string(&snapshot)?)?;
    let graph = match Graph::from_snapshot(schema, config, &snapshot) {
        Ok(graph) => graph,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return Err(e.into());
        }
    };

    print!("{}", ReportFormatter::format(&graph, format)?);
    Ok(())
}
