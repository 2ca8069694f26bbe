// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Validated schema with precomputed subtype tables
//!
//! Type filters during traversal and the alpha/omega constraint checks only
//! ever need "is type A a subtype of type B". Those answers are computed once
//! when the schema is built and stored as a dense boolean matrix per type
//! family.

use crate::schema::types::{
    AttributeDefinition, EdgeTypeDefinition, EdgeTypeId, SchemaDefinition, SchemaError,
    VertexTypeDefinition, VertexTypeId,
};
use std::collections::HashMap;

/// Dense reflexive-transitive "is-a" relation over one type family
#[derive(Debug, Clone)]
struct SubtypeTable {
    size: usize,
    bits: Vec<bool>,
}

impl SubtypeTable {
    fn is_a(&self, sub: usize, sup: usize) -> bool {
        sub < self.size && sup < self.size && self.bits[sub * self.size + sup]
    }
}

/// Resolved inheritance of one type family
struct Hierarchy {
    ids: HashMap<String, u16>,
    table: SubtypeTable,
    /// Supertypes always precede their subtypes
    order: Vec<usize>,
}

fn resolve_hierarchy(names: &[&str], supertypes: &[&[String]]) -> Result<Hierarchy, SchemaError> {
    if names.len() > u16::MAX as usize {
        return Err(SchemaError::TooManyTypes(names.len()));
    }

    let mut ids = HashMap::with_capacity(names.len());
    for (index, name) in names.iter().enumerate() {
        if name.is_empty() {
            return Err(SchemaError::EmptyName);
        }
        if ids.insert(name.to_string(), index as u16).is_some() {
            return Err(SchemaError::DuplicateType(name.to_string()));
        }
    }

    let mut direct: Vec<Vec<usize>> = Vec::with_capacity(names.len());
    for (index, supers) in supertypes.iter().enumerate() {
        let mut resolved = Vec::with_capacity(supers.len());
        for supertype in supers.iter() {
            let id = ids
                .get(supertype.as_str())
                .ok_or_else(|| SchemaError::UnknownSupertype {
                    type_name: names[index].to_string(),
                    supertype: supertype.clone(),
                })?;
            resolved.push(*id as usize);
        }
        direct.push(resolved);
    }

    // Depth-first post-order over the supertype edges.
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        Visiting,
        Done,
    }

    fn visit(
        node: usize,
        direct: &[Vec<usize>],
        marks: &mut [Mark],
        order: &mut Vec<usize>,
        names: &[&str],
    ) -> Result<(), SchemaError> {
        match marks[node] {
            Mark::Done => return Ok(()),
            Mark::Visiting => return Err(SchemaError::InheritanceCycle(names[node].to_string())),
            Mark::Unvisited => {}
        }
        marks[node] = Mark::Visiting;
        for &sup in &direct[node] {
            visit(sup, direct, marks, order, names)?;
        }
        marks[node] = Mark::Done;
        order.push(node);
        Ok(())
    }

    let size = names.len();
    let mut marks = vec![Mark::Unvisited; size];
    let mut order = Vec::with_capacity(size);
    for node in 0..size {
        visit(node, &direct, &mut marks, &mut order, names)?;
    }

    let mut bits = vec![false; size * size];
    for &node in &order {
        bits[node * size + node] = true;
        for &sup in &direct[node] {
            for ancestor in 0..size {
                if bits[sup * size + ancestor] {
                    bits[node * size + ancestor] = true;
                }
            }
        }
    }

    Ok(Hierarchy {
        ids,
        table: SubtypeTable { size, bits },
        order,
    })
}

/// Collect own and inherited attributes, supertypes first
fn effective_attributes(
    hierarchy: &Hierarchy,
    node: usize,
    type_name: &str,
    own: &dyn Fn(usize) -> Vec<AttributeDefinition>,
) -> Result<Vec<AttributeDefinition>, SchemaError> {
    let mut attributes: Vec<AttributeDefinition> = Vec::new();
    for &ancestor in &hierarchy.order {
        if !hierarchy.table.is_a(node, ancestor) {
            continue;
        }
        for attribute in own(ancestor) {
            if attributes.iter().any(|a| a.name == attribute.name) {
                return Err(SchemaError::DuplicateAttribute {
                    type_name: type_name.to_string(),
                    attribute: attribute.name,
                });
            }
            attributes.push(attribute);
        }
    }
    Ok(attributes)
}

/// A vertex type of a built schema
#[derive(Debug, Clone)]
pub struct VertexType {
    id: VertexTypeId,
    name: String,
    is_abstract: bool,
    attributes: Vec<AttributeDefinition>,
}

impl VertexType {
    pub fn id(&self) -> VertexTypeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Own and inherited attributes
    pub fn attributes(&self) -> &[AttributeDefinition] {
        &self.attributes
    }

    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }
}

/// An edge type of a built schema
#[derive(Debug, Clone)]
pub struct EdgeType {
    id: EdgeTypeId,
    name: String,
    is_abstract: bool,
    from: VertexTypeId,
    to: VertexTypeId,
    attributes: Vec<AttributeDefinition>,
}

impl EdgeType {
    pub fn id(&self) -> EdgeTypeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// Vertex type accepted at alpha (with subtypes)
    pub fn from(&self) -> VertexTypeId {
        self.from
    }

    /// Vertex type accepted at omega (with subtypes)
    pub fn to(&self) -> VertexTypeId {
        self.to
    }

    pub fn attributes(&self) -> &[AttributeDefinition] {
        &self.attributes
    }

    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name == name)
    }
}

/// Validated schema shared by graphs
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    vertex_types: Vec<VertexType>,
    edge_types: Vec<EdgeType>,
    vertex_ids: HashMap<String, u16>,
    edge_ids: HashMap<String, u16>,
    vertex_is_a: SubtypeTable,
    edge_is_a: SubtypeTable,
    definition: SchemaDefinition,
}

impl Schema {
    /// Validate a definition and precompute the subtype tables
    pub fn build(definition: SchemaDefinition) -> Result<Self, SchemaError> {
        let vertex_hierarchy = {
            let names: Vec<&str> = definition
                .vertex_types
                .iter()
                .map(|t| t.name.as_str())
                .collect();
            let supers: Vec<&[String]> = definition
                .vertex_types
                .iter()
                .map(|t| t.supertypes.as_slice())
                .collect();
            resolve_hierarchy(&names, &supers)?
        };
        let edge_hierarchy = {
            let names: Vec<&str> = definition
                .edge_types
                .iter()
                .map(|t| t.name.as_str())
                .collect();
            let supers: Vec<&[String]> = definition
                .edge_types
                .iter()
                .map(|t| t.supertypes.as_slice())
                .collect();
            resolve_hierarchy(&names, &supers)?
        };

        let vertex_defs: &[VertexTypeDefinition] = &definition.vertex_types;
        let mut vertex_types = Vec::with_capacity(vertex_defs.len());
        for (index, def) in vertex_defs.iter().enumerate() {
            let attributes = effective_attributes(&vertex_hierarchy, index, &def.name, &|i| {
                vertex_defs[i].attributes.clone()
            })?;
            vertex_types.push(VertexType {
                id: VertexTypeId(index as u16),
                name: def.name.clone(),
                is_abstract: def.is_abstract,
                attributes,
            });
        }

        let edge_defs: &[EdgeTypeDefinition] = &definition.edge_types;
        let mut edge_types = Vec::with_capacity(edge_defs.len());
        for (index, def) in edge_defs.iter().enumerate() {
            let resolve_end = |vertex_type: &str| {
                vertex_hierarchy
                    .ids
                    .get(vertex_type)
                    .map(|id| VertexTypeId(*id))
                    .ok_or_else(|| SchemaError::UnknownVertexType {
                        edge_type: def.name.clone(),
                        vertex_type: vertex_type.to_string(),
                    })
            };
            let from = resolve_end(&def.from)?;
            let to = resolve_end(&def.to)?;
            let attributes = effective_attributes(&edge_hierarchy, index, &def.name, &|i| {
                edge_defs[i].attributes.clone()
            })?;
            edge_types.push(EdgeType {
                id: EdgeTypeId(index as u16),
                name: def.name.clone(),
                is_abstract: def.is_abstract,
                from,
                to,
                attributes,
            });
        }

        Ok(Self {
            name: definition.name.clone(),
            vertex_types,
            edge_types,
            vertex_ids: vertex_hierarchy.ids,
            edge_ids: edge_hierarchy.ids,
            vertex_is_a: vertex_hierarchy.table,
            edge_is_a: edge_hierarchy.table,
            definition,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The definition this schema was built from
    pub fn definition(&self) -> &SchemaDefinition {
        &self.definition
    }

    pub fn vertex_types(&self) -> &[VertexType] {
        &self.vertex_types
    }

    pub fn edge_types(&self) -> &[EdgeType] {
        &self.edge_types
    }

    pub fn vertex_type(&self, id: VertexTypeId) -> Option<&VertexType> {
        self.vertex_types.get(id.index())
    }

    pub fn edge_type(&self, id: EdgeTypeId) -> Option<&EdgeType> {
        self.edge_types.get(id.index())
    }

    pub fn vertex_type_id(&self, name: &str) -> Option<VertexTypeId> {
        self.vertex_ids.get(name).map(|id| VertexTypeId(*id))
    }

    pub fn edge_type_id(&self, name: &str) -> Option<EdgeTypeId> {
        self.edge_ids.get(name).map(|id| EdgeTypeId(*id))
    }

    /// Reflexive: every type is a subtype of itself
    pub fn is_vertex_subtype(&self, sub: VertexTypeId, sup: VertexTypeId) -> bool {
        self.vertex_is_a.is_a(sub.index(), sup.index())
    }

    pub fn is_edge_subtype(&self, sub: EdgeTypeId, sup: EdgeTypeId) -> bool {
        self.edge_is_a.is_a(sub.index(), sup.index())
    }

    /// Whether a vertex of `vertex_type` may be the alpha of an `edge_type` edge
    pub fn accepts_alpha(&self, edge_type: EdgeTypeId, vertex_type: VertexTypeId) -> bool {
        self.edge_type(edge_type)
            .is_some_and(|et| self.is_vertex_subtype(vertex_type, et.from))
    }

    /// Whether a vertex of `vertex_type` may be the omega of an `edge_type` edge
    pub fn accepts_omega(&self, edge_type: EdgeTypeId, vertex_type: VertexTypeId) -> bool {
        self.edge_type(edge_type)
            .is_some_and(|et| self.is_vertex_subtype(vertex_type, et.to))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::value::Value;

    fn transport() -> SchemaDefinition {
        SchemaDefinition::new("Transport")
            .vertex_type(
                VertexTypeDefinition::new("Place")
                    .abstract_type()
                    .attribute("name", Value::Null),
            )
            .vertex_type(VertexTypeDefinition::new("City").extends("Place"))
            .vertex_type(
                VertexTypeDefinition::new("Capital")
                    .extends("City")
                    .attribute("country", Value::from("?")),
            )
            .vertex_type(VertexTypeDefinition::new("Airport"))
            .edge_type(EdgeTypeDefinition::new("Link", "Place", "Place"))
            .edge_type(EdgeTypeDefinition::new("Street", "City", "City").extends("Link"))
            .edge_type(EdgeTypeDefinition::new("Flight", "Airport", "Airport"))
    }

    #[test]
    fn test_subtype_closure() {
        let schema = transport().build().unwrap();
        let place = schema.vertex_type_id("Place").unwrap();
        let city = schema.vertex_type_id("City").unwrap();
        let capital = schema.vertex_type_id("Capital").unwrap();
        let airport = schema.vertex_type_id("Airport").unwrap();

        assert!(schema.is_vertex_subtype(capital, place));
        assert!(schema.is_vertex_subtype(capital, city));
        assert!(schema.is_vertex_subtype(city, city));
        assert!(!schema.is_vertex_subtype(city, capital));
        assert!(!schema.is_vertex_subtype(airport, place));

        let link = schema.edge_type_id("Link").unwrap();
        let street = schema.edge_type_id("Street").unwrap();
        assert!(schema.is_edge_subtype(street, link));
        assert!(!schema.is_edge_subtype(link, street));
    }

    #[test]
    fn test_end_constraints() {
        let schema = transport().build().unwrap();
        let street = schema.edge_type_id("Street").unwrap();
        let capital = schema.vertex_type_id("Capital").unwrap();
        let airport = schema.vertex_type_id("Airport").unwrap();
        assert!(schema.accepts_alpha(street, capital));
        assert!(schema.accepts_omega(street, capital));
        assert!(!schema.accepts_alpha(street, airport));
    }

    #[test]
    fn test_inherited_attributes_come_first() {
        let schema = transport().build().unwrap();
        let capital = schema.vertex_type_id("Capital").unwrap();
        let names: Vec<&str> = schema
            .vertex_type(capital)
            .unwrap()
            .attributes()
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["name", "country"]);
    }

    #[test]
    fn test_rejects_cycles_and_unknown_names() {
        let cyclic = SchemaDefinition::new("S")
            .vertex_type(VertexTypeDefinition::new("A").extends("B"))
            .vertex_type(VertexTypeDefinition::new("B").extends("A"));
        assert!(matches!(
            cyclic.build(),
            Err(SchemaError::InheritanceCycle(_))
        ));

        let unknown = SchemaDefinition::new("S")
            .vertex_type(VertexTypeDefinition::new("A"))
            .edge_type(EdgeTypeDefinition::new("E", "A", "Missing"));
        assert_eq!(
            unknown.build().unwrap_err(),
            SchemaError::UnknownVertexType {
                edge_type: "E".to_string(),
                vertex_type: "Missing".to_string(),
            }
        );

        let duplicate = SchemaDefinition::new("S")
            .vertex_type(VertexTypeDefinition::new("A"))
            .vertex_type(VertexTypeDefinition::new("A"));
        assert_eq!(
            duplicate.build().unwrap_err(),
            SchemaError::DuplicateType("A".to_string())
        );
    }

    #[test]
    fn test_rejects_shadowed_attribute() {
        let shadowed = SchemaDefinition::new("S")
            .vertex_type(VertexTypeDefinition::new("A").attribute("x", Value::Null))
            .vertex_type(
                VertexTypeDefinition::new("B")
                    .extends("A")
                    .attribute("x", Value::Null),
            );
        assert!(matches!(
            shadowed.build(),
            Err(SchemaError::DuplicateAttribute { .. })
        ));
    }

    #[test]
    fn test_diamond_inherits_once() {
        let diamond = SchemaDefinition::new("S")
            .vertex_type(VertexTypeDefinition::new("Top").attribute("id", Value::Null))
            .vertex_type(VertexTypeDefinition::new("Left").extends("Top"))
            .vertex_type(VertexTypeDefinition::new("Right").extends("Top"))
            .vertex_type(
                VertexTypeDefinition::new("Bottom")
                    .extends("Left")
                    .extends("Right"),
            )
            .build()
            .unwrap();
        let bottom = diamond.vertex_type_id("Bottom").unwrap();
        assert_eq!(diamond.vertex_type(bottom).unwrap().attributes().len(), 1);
    }

    #[test]
    fn test_definition_deserializes_with_defaults() {
        let json = r#"{
            "name": "S",
            "vertex_types": [{"name": "A"}],
            "edge_types": [{"name": "E", "from": "A", "to": "A"}]
        }"#;
        let definition: SchemaDefinition = serde_json::from_str(json).unwrap();
        let schema = definition.build().unwrap();
        assert_eq!(schema.edge_types().len(), 1);
        assert!(!schema.vertex_types()[0].is_abstract());
    }
}
