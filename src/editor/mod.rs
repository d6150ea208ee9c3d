//! # Graph Editor Session
//!
//! [`EditorSession`] owns the live graph, the selection and the undo history.
//! Every mutating action edits the graph in place and then records a snapshot
//! labelled after the action. Undo and redo swap the whole graph.
//!
//! ## Submodules
//! - [`selection`]: the selection, held as ids
//! - [`hierarchy`]: parent/child tree view refreshed from history events

pub mod hierarchy;
pub mod selection;

pub use hierarchy::{HierarchyRow, HierarchyView};
pub use selection::SelectionState;

use super::graph::{Edge, GraphIssue, LogicalGraph, Node};
use super::node_types::DataType;
use crate::history::{
    HistoryError, HistoryManager, LogNotifier, Notifier, SelectedObject, Selection,
    SelectionLocation,
};
use crate::settings::EditorSettings;
use uuid::Uuid;

pub struct EditorSession {
    graph: LogicalGraph,
    selection: SelectionState,
    history: HistoryManager<LogicalGraph>,
    hierarchy: HierarchyView,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(&EditorSettings::default())
    }
}

impl EditorSession {
    pub fn new(settings: &EditorSettings) -> Self {
        Self::with_notifier(settings, Box::new(LogNotifier))
    }

    pub fn with_notifier(settings: &EditorSettings, notifier: Box<dyn Notifier>) -> Self {
        let mut history = HistoryManager::with_notifier(settings.history_capacity, notifier);
        history.set_print_state(settings.print_undo_state);
        let hierarchy = HierarchyView::new(history.subscribe());

        let mut session = Self {
            graph: LogicalGraph::default(),
            selection: SelectionState::default(),
            history,
            hierarchy,
        };
        session.new_graph("");
        session
    }

    pub fn graph(&self) -> &LogicalGraph {
        &self.graph
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn history(&self) -> &HistoryManager<LogicalGraph> {
        &self.history
    }

    /// Current hierarchy rows, rebuilt first if anything changed.
    pub fn hierarchy_rows(&mut self) -> &[HierarchyRow] {
        self.hierarchy.refresh(&self.graph, &self.selection);
        self.hierarchy.rows()
    }

    pub fn find_node_by_name(&self, name: &str) -> Option<Uuid> {
        self.graph.nodes.iter().find(|n| n.name == name).map(|n| n.id)
    }

    /// Starts over with an empty graph. Earlier history is discarded.
    pub fn new_graph(&mut self, name: &str) {
        self.replace_graph(LogicalGraph::new(name), "New Logical Graph");
    }

    /// Installs a graph read from elsewhere. Earlier history is discarded.
    /// Returns the problems `check` found in the loaded graph.
    pub fn load_graph(&mut self, graph: LogicalGraph, source: &str) -> Vec<GraphIssue> {
        log::info!(
            "Loaded {} ({} nodes, {} edges)",
            source,
            graph.num_nodes(),
            graph.num_edges()
        );
        let issues = graph.check();
        for issue in &issues {
            log::warn!("Loaded graph {}: {}", source, issue);
        }
        self.replace_graph(graph, &format!("Loaded {}", source));
        issues
    }

    fn replace_graph(&mut self, graph: LogicalGraph, description: &str) {
        self.graph = graph;
        self.selection.clear_selection();
        self.history.clear();
        self.history.push(description, &self.graph);
    }

    /// Merges a copy of `other` into the current graph.
    pub fn insert_graph(&mut self, other: &LogicalGraph, source: &str) {
        self.graph.insert_graph(other);
        self.record(&format!("Inserted {}", source));
    }

    pub fn add_node(&mut self, node: Node) -> Uuid {
        let description = format!("Add node {}", node.name);
        let id = self.graph.add_node(node);
        self.record(&description);
        id
    }

    /// Connects two nodes. Returns `None` if either node is missing.
    pub fn add_edge(
        &mut self,
        src_node: Uuid,
        src_port: &str,
        dest_node: Uuid,
        dest_port: &str,
    ) -> Option<Uuid> {
        let id = self
            .graph
            .add_edge(Edge::new(src_node, src_port, dest_node, dest_port))?;
        self.record("Add edge");
        Some(id)
    }

    pub fn move_node(&mut self, id: Uuid, position: (f32, f32)) -> bool {
        let Some(node) = self.graph.node_mut(id) else {
            return false;
        };
        node.position = position;
        let description = format!("Move node {}", node.name);
        self.record(&description)
    }

    /// Moves a node under `parent`, or to the top level with `None`.
    /// Only construct nodes can be parents; a missing parent or one that
    /// would create a cycle is rejected.
    pub fn set_parent(&mut self, id: Uuid, parent: Option<Uuid>) -> bool {
        if let Some(parent) = parent {
            let Some(parent_node) = self.graph.node(parent) else {
                log::warn!("Cannot move node {} under missing node {}", id, parent);
                return false;
            };
            if !parent_node.category.is_construct() {
                log::warn!(
                    "Cannot move node {} under {}: {:?} is not a construct",
                    id,
                    parent_node.name,
                    parent_node.category
                );
                return false;
            }
            if self.is_descendant(parent, id) {
                log::warn!("Cannot move node {} under {}: parent cycle", id, parent);
                return false;
            }
        }
        let Some(node) = self.graph.node_mut(id) else {
            return false;
        };
        node.parent = parent;
        self.record("Change Node Parent")
    }

    pub fn edit_field(&mut self, id: Uuid, name: &str, value: &str, data_type: DataType) -> bool {
        let Some(node) = self.graph.node_mut(id) else {
            return false;
        };
        if !node.set_field(name, value, data_type) {
            return false;
        }
        self.record("Edit Field")
    }

    pub fn rename_graph(&mut self, name: &str) -> bool {
        self.graph.name = name.to_string();
        self.record("Named Logical Graph")
    }

    /// Selects an object in the graph. With `add` the object is toggled
    /// into the existing selection instead of replacing it.
    pub fn select(&mut self, object: SelectedObject<Uuid>, add: bool) {
        if add {
            self.selection.toggle(object);
        } else {
            self.selection.select(object, SelectionLocation::Graph);
        }
        self.hierarchy.mark_stale();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear_selection();
        self.hierarchy.mark_stale();
    }

    /// Deletes every selected node and edge. Returns how many objects were
    /// removed.
    pub fn delete_selection(&mut self) -> usize {
        let mut removed = 0;
        for id in self.selection.selected_edges().collect::<Vec<_>>() {
            removed += usize::from(self.graph.remove_edge_by_id(id).is_some());
        }
        for id in self.selection.selected_nodes().collect::<Vec<_>>() {
            removed += usize::from(self.graph.remove_node(id).is_some());
        }

        self.selection.clear_selection();
        self.hierarchy.mark_stale();
        if removed > 0 {
            self.record("Delete Selection");
        }
        removed
    }

    pub fn undo(&mut self) -> Result<(), HistoryError> {
        self.history.undo(&mut self.graph, &mut self.selection)?;
        log::info!(
            "Undo: graph now has {} nodes, {} edges",
            self.graph.num_nodes(),
            self.graph.num_edges()
        );
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), HistoryError> {
        self.history.redo(&mut self.graph, &mut self.selection)?;
        log::info!(
            "Redo: graph now has {} nodes, {} edges",
            self.graph.num_nodes(),
            self.graph.num_edges()
        );
        Ok(())
    }

    fn record(&mut self, description: &str) -> bool {
        self.history.push(description, &self.graph)
    }

    /// Whether `candidate` sits somewhere below `ancestor`, or is `ancestor`.
    fn is_descendant(&self, candidate: Uuid, ancestor: Uuid) -> bool {
        let mut cursor = Some(candidate);
        // bounded walk, in case the graph already holds a parent cycle
        for _ in 0..=self.graph.num_nodes() {
            match cursor {
                Some(id) if id == ancestor => return true,
                Some(id) => cursor = self.graph.node(id).and_then(|n| n.parent),
                None => return false,
            }
        }
        false
    }
}
