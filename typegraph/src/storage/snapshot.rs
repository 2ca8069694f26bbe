// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Serializable image of a graph's structure
//!
//! A snapshot records ids, sequence order and incidence order exactly, so a
//! restored graph traverses identically to the original. Versions and
//! listeners are not part of it.

use crate::config::GraphConfig;
use crate::schema::Schema;
use crate::storage::graph::Graph;
use crate::storage::types::GraphError;
use crate::storage::value::Value;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// Name of the schema the graph was built against
    pub schema: String,
    /// Capacity when the snapshot was taken; a hint when restoring
    #[serde(default)]
    pub max_vertex_count: u32,
    #[serde(default)]
    pub max_edge_count: u32,
    /// Vertices in sequence order
    pub vertices: Vec<VertexEntry>,
    /// Edges in sequence order
    pub edges: Vec<EdgeEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexEntry {
    pub id: u32,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
    /// Signed edge ids in list order; empty keeps creation order
    #[serde(default)]
    pub incidences: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeEntry {
    pub id: u32,
    #[serde(rename = "type")]
    pub type_name: String,
    pub alpha: u32,
    pub omega: u32,
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}

impl GraphSnapshot {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Graph {
    pub fn snapshot(&self) -> GraphSnapshot {
        let vertices = self
            .vertices()
            .filter_map(|v| {
                let record = self.vertices.get(v.id())?;
                let vertex_type = self.schema.vertex_type(record.type_id)?;
                let attributes = vertex_type
                    .attributes()
                    .iter()
                    .zip(&record.attributes)
                    .map(|(def, value)| (def.name.clone(), value.clone()))
                    .collect();
                let mut incidences = Vec::new();
                let mut inc = record.first_incidence;
                while inc != 0 {
                    incidences.push(inc);
                    inc = self.incidence_next(inc);
                }
                Some(VertexEntry {
                    id: v.id(),
                    type_name: vertex_type.name().to_string(),
                    attributes,
                    incidences,
                })
            })
            .collect();

        let edges = self
            .edges()
            .filter_map(|e| {
                let record = self.edges.get(e.normal_id())?;
                let edge_type = self.schema.edge_type(record.type_id)?;
                let attributes = edge_type
                    .attributes()
                    .iter()
                    .zip(&record.attributes)
                    .map(|(def, value)| (def.name.clone(), value.clone()))
                    .collect();
                Some(EdgeEntry {
                    id: e.normal_id(),
                    type_name: edge_type.name().to_string(),
                    alpha: record.alpha,
                    omega: record.omega,
                    attributes,
                })
            })
            .collect();

        GraphSnapshot {
            schema: self.schema.name().to_string(),
            max_vertex_count: self.max_v_count(),
            max_edge_count: self.max_e_count(),
            vertices,
            edges,
        }
    }

    /// Rebuild a graph with the ids, sequence order and incidence order of
    /// `snapshot`
    pub fn from_snapshot(
        schema: Arc<Schema>,
        config: GraphConfig,
        snapshot: &GraphSnapshot,
    ) -> Result<Graph, GraphError> {
        if snapshot.schema != schema.name() {
            return Err(GraphError::InvalidSnapshot(format!(
                "snapshot was taken with schema '{}', not '{}'",
                snapshot.schema,
                schema.name()
            )));
        }

        // Capacity hints only count up to the largest id actually present
        let largest_vertex = snapshot.vertices.iter().map(|e| e.id).max().unwrap_or(0);
        let largest_edge = snapshot.edges.iter().map(|e| e.id).max().unwrap_or(0);
        let mut config = config;
        config.initial_vertex_capacity = config
            .initial_vertex_capacity
            .max(snapshot.max_vertex_count.min(largest_vertex));
        config.initial_edge_capacity = config
            .initial_edge_capacity
            .max(snapshot.max_edge_count.min(largest_edge));
        let mut graph = Graph::with_config(Arc::clone(&schema), config);

        for entry in &snapshot.vertices {
            let type_id = schema.vertex_type_id(&entry.type_name).ok_or_else(|| {
                GraphError::InvalidSnapshot(format!("unknown vertex type '{}'", entry.type_name))
            })?;
            let v = graph.create_vertex_with_id(type_id, entry.id)?;
            for (name, value) in &entry.attributes {
                graph.set_vertex_attribute(v, name, value.clone())?;
            }
        }

        for entry in &snapshot.edges {
            let type_id = schema.edge_type_id(&entry.type_name).ok_or_else(|| {
                GraphError::InvalidSnapshot(format!("unknown edge type '{}'", entry.type_name))
            })?;
            let endpoint = |id: u32| {
                graph.vertex(id).ok_or_else(|| {
                    GraphError::InvalidSnapshot(format!("edge e{} references missing vertex v{}", entry.id, id))
                })
            };
            let alpha = endpoint(entry.alpha)?;
            let omega = endpoint(entry.omega)?;
            let e = graph.create_edge_with_id(type_id, entry.id, alpha, omega)?;
            for (name, value) in &entry.attributes {
                graph.set_edge_attribute(e, name, value.clone())?;
            }
        }

        for entry in snapshot.vertices.iter().filter(|e| !e.incidences.is_empty()) {
            let Some(v) = graph.vertex(entry.id) else {
                continue;
            };
            let current: Vec<i32> = graph.incidences(v)?.map(|e| e.id()).collect();
            if current == entry.incidences {
                continue;
            }
            let mut expected = current;
            let mut given = entry.incidences.clone();
            expected.sort_unstable();
            given.sort_unstable();
            if expected != given {
                return Err(GraphError::InvalidSnapshot(format!(
                    "incidence order of v{} does not match its edges",
                    entry.id
                )));
            }
            graph.relink_incidences(entry.id, &entry.incidences);
            graph.incidence_list_modified(entry.id);
            graph.versions.graph_modified();
        }

        debug!(
            "Restored {} with {} vertices and {} edges",
            graph.uid(),
            graph.v_count(),
            graph.e_count()
        );
        Ok(graph)
    }
}
