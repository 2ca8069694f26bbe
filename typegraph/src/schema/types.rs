// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
// Schema definitions consumed by the storage core

use crate::storage::value::Value;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a [`crate::schema::Schema`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    #[error("Type name must not be empty")]
    EmptyName,

    #[error("Type '{0}' is defined more than once")]
    DuplicateType(String),

    #[error("Type '{type_name}' extends unknown type '{supertype}'")]
    UnknownSupertype {
        type_name: String,
        supertype: String,
    },

    #[error("Edge type '{edge_type}' refers to unknown vertex type '{vertex_type}'")]
    UnknownVertexType {
        edge_type: String,
        vertex_type: String,
    },

    #[error("Inheritance cycle through type '{0}'")]
    InheritanceCycle(String),

    #[error("Type '{type_name}' declares attribute '{attribute}' more than once")]
    DuplicateAttribute {
        type_name: String,
        attribute: String,
    },

    #[error("Too many types: {0} (maximum is 65535)")]
    TooManyTypes(usize),
}

/// Tag of a vertex type, stored in every vertex record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexTypeId(pub(crate) u16);

impl VertexTypeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Tag of an edge type, stored in every edge record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeTypeId(pub(crate) u16);

impl EdgeTypeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Attribute declared on a vertex or edge type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub name: String,
    #[serde(default)]
    pub default_value: Value,
}

impl AttributeDefinition {
    pub fn new(name: impl Into<String>, default_value: Value) -> Self {
        Self {
            name: name.into(),
            default_value,
        }
    }
}

/// Definition of a vertex type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexTypeDefinition {
    pub name: String,
    #[serde(default)]
    pub supertypes: Vec<String>,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
    #[serde(default)]
    pub description: Option<String>,
}

impl VertexTypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supertypes: Vec::new(),
            is_abstract: false,
            attributes: Vec::new(),
            description: None,
        }
    }

    pub fn extends(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, default_value: Value) -> Self {
        self.attributes
            .push(AttributeDefinition::new(name, default_value));
        self
    }
}

/// Definition of an edge type
///
/// `from` and `to` name the vertex types accepted at alpha and omega; subtypes
/// of those are accepted as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeTypeDefinition {
    pub name: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub supertypes: Vec<String>,
    #[serde(default)]
    pub is_abstract: bool,
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
    #[serde(default)]
    pub description: Option<String>,
}

impl EdgeTypeDefinition {
    pub fn new(name: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            from: from.into(),
            to: to.into(),
            supertypes: Vec::new(),
            is_abstract: false,
            attributes: Vec::new(),
            description: None,
        }
    }

    pub fn extends(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn attribute(mut self, name: impl Into<String>, default_value: Value) -> Self {
        self.attributes
            .push(AttributeDefinition::new(name, default_value));
        self
    }
}

/// Complete, unvalidated schema description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub name: String,
    #[serde(default)]
    pub vertex_types: Vec<VertexTypeDefinition>,
    #[serde(default)]
    pub edge_types: Vec<EdgeTypeDefinition>,
}

impl SchemaDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vertex_types: Vec::new(),
            edge_types: Vec::new(),
        }
    }

    pub fn vertex_type(mut self, definition: VertexTypeDefinition) -> Self {
        self.vertex_types.push(definition);
        self
    }

    pub fn edge_type(mut self, definition: EdgeTypeDefinition) -> Self {
        self.edge_types.push(definition);
        self
    }

    /// Validate the definition and precompute the subtype tables
    pub fn build(self) -> Result<crate::schema::Schema, SchemaError> {
        crate::schema::Schema::build(self)
    }
}
