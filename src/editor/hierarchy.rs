//! # Hierarchy View
//!
//! A flattened parent/child tree of the graph's nodes, rebuilt whenever the
//! history manager reports a change. Rows carry two highlight flags:
//! - `selected`: the node itself is selected
//! - `relative`: the node shares an edge with a selected node or edge
//!
//! Selections made in the palette do not highlight anything here.

use super::selection::SelectionState;
use crate::graph::LogicalGraph;
use crate::history::{HistoryEvent, Selection, SelectionLocation};
use crossbeam_channel::Receiver;
use std::collections::HashSet;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyRow {
    pub id: Uuid,
    pub name: String,
    pub depth: usize,
    pub selected: bool,
    pub relative: bool,
}

pub struct HierarchyView {
    events: Receiver<HistoryEvent>,
    rows: Vec<HierarchyRow>,
    stale: bool,
}

impl HierarchyView {
    pub fn new(events: Receiver<HistoryEvent>) -> Self {
        Self {
            events,
            rows: Vec::new(),
            stale: true,
        }
    }

    /// Forces a rebuild on the next refresh, for changes history does not see.
    pub fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Drains pending history events and rebuilds the rows if anything
    /// changed. Returns `true` when the rows were rebuilt.
    pub fn refresh(&mut self, graph: &LogicalGraph, selection: &SelectionState) -> bool {
        let pending = self.events.try_iter().count();
        if pending == 0 && !self.stale {
            return false;
        }

        self.rows = build_rows(graph, selection);
        self.stale = false;
        log::debug!(
            "Hierarchy rebuilt after {} history event(s): {} rows",
            pending,
            self.rows.len()
        );
        true
    }

    pub fn rows(&self) -> &[HierarchyRow] {
        &self.rows
    }
}

fn build_rows(graph: &LogicalGraph, selection: &SelectionState) -> Vec<HierarchyRow> {
    let in_graph = selection.location() == SelectionLocation::Graph;
    let relatives = if in_graph {
        relatives_of(graph, selection)
    } else {
        HashSet::new()
    };

    let mut rows = Vec::with_capacity(graph.num_nodes());
    let mut visited = HashSet::new();
    let mut stack: Vec<(Uuid, usize)> = graph.roots().map(|n| (n.id, 0)).collect();
    stack.reverse();

    while let Some((id, depth)) = stack.pop() {
        if !visited.insert(id) {
            continue;
        }
        let Some(node) = graph.node(id) else {
            continue;
        };

        rows.push(HierarchyRow {
            id,
            name: node.name.clone(),
            depth,
            selected: in_graph && selection.is_selected(id),
            relative: relatives.contains(&id),
        });

        let children: Vec<_> = graph.children_of(Some(id)).map(|c| (c.id, depth + 1)).collect();
        stack.extend(children.into_iter().rev());
    }

    rows
}

/// Nodes on either end of an edge that touches the selection.
fn relatives_of(graph: &LogicalGraph, selection: &SelectionState) -> HashSet<Uuid> {
    let selected_nodes: HashSet<Uuid> = selection.selected_nodes().collect();
    let selected_edges: HashSet<Uuid> = selection.selected_edges().collect();

    graph
        .edges
        .iter()
        .filter(|e| {
            selected_edges.contains(&e.id)
                || selected_nodes.contains(&e.src_node)
                || selected_nodes.contains(&e.dest_node)
        })
        .flat_map(|e| [e.src_node, e.dest_node])
        .collect()
}
