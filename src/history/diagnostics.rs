//! Debug views of the history ring.

use super::{Document, HistoryManager};
use chrono::{DateTime, Local};
use std::fmt;

/// One live snapshot, as listed by [`HistoryManager::rows`].
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    /// Ring index of the slot.
    pub index: usize,
    pub description: String,
    pub nodes: usize,
    pub edges: usize,
    pub recorded_at: DateTime<Local>,
    pub is_rear: bool,
    /// The live document was derived from this snapshot.
    pub is_current: bool,
}

impl<D: Document> HistoryManager<D> {
    /// Live snapshots in logical order, oldest (rear) first.
    pub fn rows(&self) -> Vec<HistoryRow> {
        let capacity = self.capacity();
        let current = self.current_snapshot().map(|_| self.step_back(self.current, 1));

        (0..self.len())
            .map(|offset| (self.rear + offset) % capacity)
            .filter_map(|index| {
                let snapshot = self.slots[index].as_ref()?;
                Some(HistoryRow {
                    index,
                    description: snapshot.description().to_string(),
                    nodes: snapshot.document().node_count(),
                    edges: snapshot.document().edge_count(),
                    recorded_at: snapshot.recorded_at(),
                    is_rear: index == self.rear,
                    is_current: Some(index) == current,
                })
            })
            .collect()
    }

    /// Every slot index tagged with `r`, `c` and `f` where the rear, current
    /// and front cursors sit, e.g. `0r,1,2cf,3`.
    pub fn cursor_map(&self) -> String {
        (0..self.capacity())
            .map(|i| {
                let mut tag = i.to_string();
                if i == self.rear {
                    tag.push('r');
                }
                if i == self.current {
                    tag.push('c');
                }
                if i == self.front {
                    tag.push('f');
                }
                tag
            })
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl<D: Document> fmt::Display for HistoryManager<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "history: capacity {}, rear {}, current {}, front {}",
            self.capacity(),
            self.rear,
            self.current,
            self.front
        )?;
        writeln!(
            f,
            "   {:>4}  {:<32} {:>5} {:>5}  {}",
            "slot", "description", "nodes", "edges", "recorded"
        )?;
        for row in self.rows() {
            writeln!(
                f,
                "{:<2} {:>4}  {:<32} {:>5} {:>5}  {}",
                if row.is_current { "->" } else { "" },
                row.index,
                row.description,
                row.nodes,
                row.edges,
                row.recorded_at.format("%H:%M:%S%.3f")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::{LogicalGraph, Node};
    use crate::history::HistoryManager;
    use crate::node_types::Category;

    fn history_with_three() -> (HistoryManager<LogicalGraph>, LogicalGraph) {
        let mut history = HistoryManager::new(4);
        let mut graph = LogicalGraph::new("diag");
        history.push("New Logical Graph", &graph);
        for name in ["A", "B"] {
            graph.add_node(Node::new(name, Category::PythonApp, (0.0, 0.0)));
            history.push(&format!("Add node {}", name), &graph);
        }
        (history, graph)
    }

    #[test]
    fn rows_follow_logical_order() {
        let (mut history, mut graph) = history_with_three();
        graph.add_node(Node::new("C", Category::PythonApp, (0.0, 0.0)));
        history.push("Add node C", &graph);

        // ring of 4 is full: slot 0 was evicted, order starts at rear
        let rows = history.rows();
        let order: Vec<_> = rows.iter().map(|r| r.index).collect();
        assert_eq!(order, vec![1, 2, 3]);
        assert!(rows[0].is_rear);
        assert_eq!(rows[2].description, "Add node C");
        assert_eq!(rows[2].nodes, 3);
        assert!(rows[2].is_current);
    }

    #[test]
    fn current_marker_follows_undo() {
        let (mut history, mut graph) = history_with_three();
        let mut selection = crate::editor::SelectionState::default();
        history.undo(&mut graph, &mut selection).unwrap();

        let current: Vec<_> = history
            .rows()
            .into_iter()
            .filter(|r| r.is_current)
            .map(|r| r.description)
            .collect();
        assert_eq!(current, vec!["Add node A"]);
    }

    #[test]
    fn cursor_map_tags_slots() {
        let (history, _) = history_with_three();
        assert_eq!(history.cursor_map(), "0r,1,2,3cf");
    }

    #[test]
    fn table_lists_every_row() {
        let (history, _) = history_with_three();
        let table = history.to_string();
        assert!(table.starts_with("history: capacity 4, rear 0, current 3, front 3"));
        assert!(table.contains("Add node B"));
        assert_eq!(table.lines().count(), 2 + 3);
    }
}
