// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Report formatting for CLI output

use crate::cli::commands::OutputFormat;
use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use typegraph::{EdgeDirection, Graph, GraphError};

/// Formats the structure of a graph
pub struct ReportFormatter;

impl ReportFormatter {
    pub fn format(graph: &Graph, format: OutputFormat) -> Result<String, GraphError> {
        match format {
            OutputFormat::Table => Self::format_table(graph),
            OutputFormat::Json => Ok(Self::format_json(graph)),
        }
    }

    fn format_table(graph: &Graph) -> Result<String, GraphError> {
        let mut output = String::new();

        output.push_str(&format!("{}\n", "Graph Summary".bold().green()));
        output.push_str(&format!("Schema: {}\n", graph.schema().name()));
        output.push_str(&format!(
            "Vertices: {} of {}\n",
            graph.v_count(),
            graph.max_v_count()
        ));
        output.push_str(&format!(
            "Edges: {} of {}\n",
            graph.e_count(),
            graph.max_e_count()
        ));
        output.push_str(&format!("Graph version: {}\n\n", graph.graph_version()));

        if graph.v_count() == 0 {
            output.push_str(&format!("{}\n", "Graph is empty".yellow()));
            return Ok(output);
        }

        output.push_str(&format!("{}\n", "Vertex Sequence".bold().green()));
        output.push_str(&Self::vertex_table(graph)?.to_string());
        output.push('\n');

        if graph.e_count() > 0 {
            output.push_str(&format!("\n{}\n", "Edge Sequence".bold().green()));
            output.push_str(&Self::edge_table(graph)?.to_string());
            output.push('\n');
        }

        Ok(output)
    }

    fn vertex_table(graph: &Graph) -> Result<Table, GraphError> {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(
            ["Vertex", "Type", "Degree", "Out", "In", "Incidences"]
                .iter()
                .map(|h| Cell::new(h).fg(Color::Green))
                .collect::<Vec<_>>(),
        );

        for v in graph.vertices() {
            let type_name = graph
                .schema()
                .vertex_type(graph.vertex_type(v)?)
                .map(|t| t.name().to_string())
                .unwrap_or_default();
            let incidences = graph
                .incidences(v)?
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            table.add_row(vec![
                v.to_string(),
                type_name,
                graph.degree(v)?.to_string(),
                graph.degree_in_direction(v, EdgeDirection::Out)?.to_string(),
                graph.degree_in_direction(v, EdgeDirection::In)?.to_string(),
                incidences,
            ]);
        }
        Ok(table)
    }

    fn edge_table(graph: &Graph) -> Result<Table, GraphError> {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(
            ["Edge", "Type", "Alpha", "Omega"]
                .iter()
                .map(|h| Cell::new(h).fg(Color::Green))
                .collect::<Vec<_>>(),
        );

        for e in graph.edges() {
            let type_name = graph
                .schema()
                .edge_type(graph.edge_type(e)?)
                .map(|t| t.name().to_string())
                .unwrap_or_default();
            table.add_row(vec![
                e.to_string(),
                type_name,
                graph.alpha(e)?.to_string(),
                graph.omega(e)?.to_string(),
            ]);
        }
        Ok(table)
    }

    /// The snapshot form doubles as the JSON report
    fn format_json(graph: &Graph) -> String {
        graph.snapshot().to_json().unwrap_or_else(|_| {
            "{\"status\": \"error\", \"error\": \"Could not serialize graph to JSON\"}".to_string()
        })
    }
}
