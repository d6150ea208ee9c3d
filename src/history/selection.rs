//! The selection contract used to carry a selection across undo and redo.
//!
//! Undo and redo replace the whole document, so object handles from before
//! the swap point into a graph that no longer exists. Selections are kept as
//! identifiers and resolved again against the restored document.

use super::Document;
use serde::{Deserialize, Serialize};

/// Which panel the selection was made in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionLocation {
    #[default]
    Graph,
    Palette,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectedObject<Id> {
    Node(Id),
    Edge(Id),
}

impl<Id> SelectedObject<Id> {
    pub fn id(&self) -> &Id {
        match self {
            SelectedObject::Node(id) | SelectedObject::Edge(id) => id,
        }
    }
}

pub trait Selection<Id> {
    fn selected_ids(&self) -> Vec<Id>;
    fn location(&self) -> SelectionLocation;
    fn clear_selection(&mut self);
    fn add_to_selection(&mut self, object: SelectedObject<Id>, location: SelectionLocation);
}

/// Re-selects every id in `ids` that still exists in `document`, nodes first
/// and then edges. Ids with no match are dropped.
pub fn reconcile_selection<D, S>(
    document: &D,
    selection: &mut S,
    ids: Vec<D::Id>,
    location: SelectionLocation,
) where
    D: Document,
    S: Selection<D::Id> + ?Sized,
{
    selection.clear_selection();

    for id in ids {
        if document.find_node_by_id(&id).is_some() {
            selection.add_to_selection(SelectedObject::Node(id), location);
        } else if document.find_edge_by_id(&id).is_some() {
            selection.add_to_selection(SelectedObject::Edge(id), location);
        } else {
            log::debug!("Selected object {:?} is not in the restored snapshot", id);
        }
    }
}
