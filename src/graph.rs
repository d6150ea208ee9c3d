//! The logical graph edited by the user.
//!
//! A [`LogicalGraph`] is a plain value: cloning it yields a deep, independent
//! copy, and two graphs compare equal when their contents match. Both
//! properties are what the history manager relies on.

use super::node_types::{Category, DataType};
use crate::history::Document;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use uuid::Uuid;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct LogicalGraph {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Node {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub category: Category,
    pub position: (f32, f32),
    #[serde(default)]
    pub parent: Option<Uuid>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Field {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub data_type: DataType,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Edge {
    pub id: Uuid,
    pub src_node: Uuid,
    pub src_port: String,
    pub dest_node: Uuid,
    pub dest_port: String,
}

/// Problems found by [`LogicalGraph::check`].
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum GraphIssue {
    #[error("edge {edge} references missing node {node}")]
    DanglingEdge { edge: Uuid, node: Uuid },
    #[error("edge {edge} connects node {node} to itself")]
    SelfLoop { edge: Uuid, node: Uuid },
    #[error("node {node} has missing parent {parent}")]
    MissingParent { node: Uuid, parent: Uuid },
    #[error("id {0} is used more than once")]
    DuplicateId(Uuid),
}

impl Node {
    pub fn new(name: impl Into<String>, category: Category, position: (f32, f32)) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            category,
            position,
            parent: None,
            fields: Vec::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Sets `name` to `value`, adding the field if it does not exist yet.
    /// Returns `true` when the node changed.
    pub fn set_field(&mut self, name: &str, value: &str, data_type: DataType) -> bool {
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) if field.value == value && field.data_type == data_type => false,
            Some(field) => {
                field.value = value.to_string();
                field.data_type = data_type;
                true
            }
            None => {
                self.fields.push(Field {
                    name: name.to_string(),
                    value: value.to_string(),
                    data_type,
                });
                true
            }
        }
    }
}

impl Edge {
    pub fn new(
        src_node: Uuid,
        src_port: impl Into<String>,
        dest_node: Uuid,
        dest_port: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            src_node,
            src_port: src_port.into(),
            dest_node,
            dest_port: dest_port.into(),
        }
    }

    pub fn touches(&self, node: Uuid) -> bool {
        self.src_node == node || self.dest_node == node
    }
}

impl LogicalGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read graph {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("failed to parse graph {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write graph {}", path.display()))
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn add_node(&mut self, node: Node) -> Uuid {
        let id = node.id;
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: Uuid) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: Uuid) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn edge(&self, id: Uuid) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Removes a node together with every edge attached to it. Children of the
    /// removed node are moved up to the removed node's own parent.
    pub fn remove_node(&mut self, id: Uuid) -> Option<Node> {
        let index = self.nodes.iter().position(|n| n.id == id)?;
        let removed = self.nodes.remove(index);

        self.edges.retain(|e| !e.touches(id));
        for child in self.nodes.iter_mut().filter(|n| n.parent == Some(id)) {
            child.parent = removed.parent;
        }
        Some(removed)
    }

    /// Adds an edge between two existing nodes. Returns `None` if either end
    /// is missing.
    pub fn add_edge(&mut self, edge: Edge) -> Option<Uuid> {
        if self.node(edge.src_node).is_none() || self.node(edge.dest_node).is_none() {
            return None;
        }
        let id = edge.id;
        self.edges.push(edge);
        Some(id)
    }

    pub fn remove_edge_by_id(&mut self, id: Uuid) -> Option<Edge> {
        let index = self.edges.iter().position(|e| e.id == id)?;
        Some(self.edges.remove(index))
    }

    pub fn children_of(&self, parent: Option<Uuid>) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.parent == parent)
    }

    /// Nodes whose parent is absent or does not exist in this graph.
    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.nodes
            .iter()
            .filter(|n| n.parent.is_none_or(|p| self.node(p).is_none()))
    }

    /// Copies every node and edge of `other` into this graph under fresh ids.
    pub fn insert_graph(&mut self, other: &LogicalGraph) {
        let id_map: std::collections::HashMap<Uuid, Uuid> =
            other.nodes.iter().map(|n| (n.id, Uuid::new_v4())).collect();

        for node in &other.nodes {
            let mut copy = node.clone();
            copy.id = id_map[&node.id];
            copy.parent = node.parent.and_then(|p| id_map.get(&p).copied());
            self.nodes.push(copy);
        }
        for edge in &other.edges {
            if let (Some(src), Some(dest)) =
                (id_map.get(&edge.src_node), id_map.get(&edge.dest_node))
            {
                self.edges
                    .push(Edge::new(*src, edge.src_port.clone(), *dest, edge.dest_port.clone()));
            }
        }
    }

    pub fn check(&self) -> Vec<GraphIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for id in self.nodes.iter().map(|n| n.id).chain(self.edges.iter().map(|e| e.id)) {
            if !seen.insert(id) {
                issues.push(GraphIssue::DuplicateId(id));
            }
        }

        for node in &self.nodes {
            if let Some(parent) = node.parent {
                if self.node(parent).is_none() {
                    issues.push(GraphIssue::MissingParent {
                        node: node.id,
                        parent,
                    });
                }
            }
        }

        for edge in &self.edges {
            for end in [edge.src_node, edge.dest_node] {
                if self.node(end).is_none() {
                    issues.push(GraphIssue::DanglingEdge {
                        edge: edge.id,
                        node: end,
                    });
                }
            }
            if edge.src_node == edge.dest_node {
                issues.push(GraphIssue::SelfLoop {
                    edge: edge.id,
                    node: edge.src_node,
                });
            }
        }

        issues
    }
}

impl Document for LogicalGraph {
    type Id = Uuid;
    type Node = Node;
    type Edge = Edge;
    type Issue = GraphIssue;

    fn find_node_by_id(&self, id: &Uuid) -> Option<&Node> {
        self.node(*id)
    }

    fn find_edge_by_id(&self, id: &Uuid) -> Option<&Edge> {
        self.edge(*id)
    }

    fn node_count(&self) -> usize {
        self.num_nodes()
    }

    fn edge_count(&self) -> usize {
        self.num_edges()
    }

    fn check(&self) -> Vec<GraphIssue> {
        LogicalGraph::check(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_nodes() -> (LogicalGraph, Uuid, Uuid) {
        let mut graph = LogicalGraph::new("test");
        let a = graph.add_node(Node::new("A", Category::PythonApp, (0.0, 0.0)));
        let b = graph.add_node(Node::new("B", Category::File, (100.0, 0.0)));
        (graph, a, b)
    }

    #[test]
    fn clone_is_independent() {
        let (graph, a, _) = two_nodes();
        let mut copy = graph.clone();
        copy.node_mut(a).unwrap().name = "renamed".into();

        assert_eq!(graph.node(a).unwrap().name, "A");
        assert_ne!(graph, copy);
    }

    #[test]
    fn remove_node_drops_attached_edges() {
        let (mut graph, a, b) = two_nodes();
        graph.add_edge(Edge::new(a, "out", b, "in")).unwrap();
        assert_eq!(graph.num_edges(), 1);

        graph.remove_node(a).unwrap();
        assert_eq!(graph.num_nodes(), 1);
        assert_eq!(graph.num_edges(), 0);
    }

    #[test]
    fn remove_node_reparents_children() {
        let (mut graph, a, b) = two_nodes();
        let mut scatter = Node::new("Scatter", Category::Scatter, (0.0, 0.0));
        scatter.parent = Some(a);
        let scatter = graph.add_node(scatter);
        graph.node_mut(b).unwrap().parent = Some(scatter);

        graph.remove_node(scatter);
        assert_eq!(graph.node(b).unwrap().parent, Some(a));
    }

    #[test]
    fn add_edge_requires_both_ends() {
        let (mut graph, a, _) = two_nodes();
        assert!(graph.add_edge(Edge::new(a, "out", Uuid::new_v4(), "in")).is_none());
        assert_eq!(graph.num_edges(), 0);
    }

    #[test]
    fn check_reports_problems() {
        let (mut graph, a, _) = two_nodes();
        graph.edges.push(Edge::new(a, "out", a, "in"));
        graph.edges.push(Edge::new(a, "out", Uuid::new_v4(), "in"));
        graph.node_mut(a).unwrap().parent = Some(Uuid::new_v4());

        let issues = graph.check();
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().any(|i| matches!(i, GraphIssue::SelfLoop { .. })));
        assert!(issues.iter().any(|i| matches!(i, GraphIssue::DanglingEdge { .. })));
        assert!(issues.iter().any(|i| matches!(i, GraphIssue::MissingParent { .. })));
    }

    #[test]
    fn insert_graph_uses_fresh_ids() {
        let (mut graph, a, b) = two_nodes();
        graph.add_edge(Edge::new(a, "out", b, "in"));
        let other = graph.clone();

        graph.insert_graph(&other);
        assert_eq!(graph.num_nodes(), 4);
        assert_eq!(graph.num_edges(), 2);
        assert!(graph.check().is_empty());
    }

    #[test]
    fn set_field_reports_change() {
        let mut node = Node::new("A", Category::PythonApp, (0.0, 0.0));
        assert!(node.set_field("func", "main", DataType::String));
        assert!(!node.set_field("func", "main", DataType::String));
        assert!(node.set_field("func", "run", DataType::String));
        assert_eq!(node.field("func").unwrap().value, "run");
    }

    #[test]
    fn json_round_trip_keeps_content() {
        let (graph, _, _) = two_nodes();
        let json = serde_json::to_string(&graph).unwrap();
        let parsed: LogicalGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(graph, parsed);
    }
}
