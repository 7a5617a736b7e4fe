//! Typed dependency graph of infrastructure resources.
//!
//! The [`Graph`] owns its nodes by ID. Edges refer to their endpoints by ID
//! only, and any adjacency structure is derived on demand by consumers.

use std::{
    borrow::Cow,
    collections::{BTreeMap, HashSet},
};

use indexmap::IndexMap;
use serde::Serialize;

use cartography_core::{
    category::Category,
    resource::{Attributes, Resource, display_type_name},
};

use crate::structure::Relationship;

/// Connection details attached to an edge, such as `port` or `protocol`.
pub type Metadata = BTreeMap<String, String>;

/// Shared metadata value for edges without connection details.
static EMPTY_METADATA: Metadata = BTreeMap::new();

/// Returns the shared, immutable empty metadata map.
pub fn empty_metadata() -> Cow<'static, Metadata> {
    Cow::Borrowed(&EMPTY_METADATA)
}

/// A resource retained in the diagram.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    id: String,
    name: String,
    #[serde(rename = "type")]
    resource_type: String,
    provider: String,
    category: Category,
    attributes: Attributes,
}

impl Node {
    /// Creates a node from a resource, resolving its category.
    pub fn from_resource(resource: &Resource) -> Self {
        Self {
            id: resource.id.clone(),
            name: resource.name.clone(),
            resource_type: resource.resource_type.clone(),
            provider: resource.provider.clone(),
            category: Category::resolve(&resource.provider, &resource.resource_type),
            attributes: resource.attributes.clone(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the provider-specific resource type, e.g. `aws_instance`.
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Returns the human-readable type name, e.g. `Security Group`.
    pub fn display_type_name(&self) -> String {
        display_type_name(&self.resource_type)
    }
}

/// A directed relationship between two nodes of the same [`Graph`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    from: String,
    to: String,
    relationship: Relationship,
    metadata: Cow<'static, Metadata>,
}

impl Edge {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        relationship: Relationship,
        metadata: Cow<'static, Metadata>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relationship,
            metadata,
        }
    }

    /// Returns the source node ID.
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Returns the target node ID.
    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn relationship(&self) -> Relationship {
        self.relationship
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Returns the label a renderer shows next to the edge.
    ///
    /// The label combines the relationship, the port (prefixed with `:`) and
    /// the protocol. Edges without connection details have an empty label.
    pub fn label(&self) -> String {
        let mut parts = vec![self.relationship.to_string()];
        if let Some(port) = self.metadata.get("port") {
            parts.push(format!(":{port}"));
        }
        if let Some(protocol) = self.metadata.get("protocol") {
            parts.push(protocol.clone());
        }
        if parts.len() == 1 {
            return String::new();
        }
        parts.join(" ")
    }
}

/// Dependency graph of diagrammable resources.
///
/// Nodes iterate in insertion order. No two edges share the same ordered
/// `(from, to)` pair, and both endpoints of every edge are nodes of the graph.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Graph {
    nodes: IndexMap<String, Node>,
    edges: Vec<Edge>,
    #[serde(skip)]
    edge_pairs: HashSet<(String, String)>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node. A node with the same ID is replaced in place.
    pub fn add_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    /// Adds an edge, returning false if it was ignored.
    ///
    /// Edges whose `(from, to)` pair already exists, or whose endpoints are not
    /// nodes of this graph, are ignored.
    pub fn add_edge(&mut self, edge: Edge) -> bool {
        if !self.nodes.contains_key(&edge.from) || !self.nodes.contains_key(&edge.to) {
            return false;
        }
        if !self
            .edge_pairs
            .insert((edge.from.clone(), edge.to.clone()))
        {
            return false;
        }
        self.edges.push(edge);
        true
    }

    /// Removes the edge from `from` to `to`, returning it if it existed.
    ///
    /// The remaining edges keep their order.
    pub fn remove_edge(&mut self, from: &str, to: &str) -> Option<Edge> {
        if !self.edge_pairs.remove(&(from.to_string(), to.to_string())) {
            return None;
        }
        let position = self
            .edges
            .iter()
            .position(|edge| edge.from == from && edge.to == to)?;
        Some(self.edges.remove(position))
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Returns true if a node with the given ID exists in the graph.
    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Returns true if an edge from `from` to `to` exists.
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edge_pairs
            .contains(&(from.to_string(), to.to_string()))
    }

    /// Returns an iterator over all nodes, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Returns an iterator over all node IDs, in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    /// Returns the position of a node in insertion order.
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
