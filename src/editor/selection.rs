//! The user's current selection, held as ids.

use crate::history::{SelectedObject, Selection, SelectionLocation};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    objects: Vec<SelectedObject<Uuid>>,
    location: SelectionLocation,
}

impl SelectionState {
    /// Replaces the selection with a single object.
    pub fn select(&mut self, object: SelectedObject<Uuid>, location: SelectionLocation) {
        self.objects.clear();
        self.objects.push(object);
        self.location = location;
    }

    /// Shift-click behaviour: adds the object, or removes it if already selected.
    pub fn toggle(&mut self, object: SelectedObject<Uuid>) {
        if let Some(index) = self.objects.iter().position(|o| *o == object) {
            self.objects.remove(index);
        } else {
            self.objects.push(object);
        }
    }

    pub fn objects(&self) -> &[SelectedObject<Uuid>] {
        &self.objects
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn is_selected(&self, id: Uuid) -> bool {
        self.objects.iter().any(|o| *o.id() == id)
    }

    pub fn selected_nodes(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.objects.iter().filter_map(|o| match o {
            SelectedObject::Node(id) => Some(*id),
            SelectedObject::Edge(_) => None,
        })
    }

    pub fn selected_edges(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.objects.iter().filter_map(|o| match o {
            SelectedObject::Edge(id) => Some(*id),
            SelectedObject::Node(_) => None,
        })
    }
}

impl Selection<Uuid> for SelectionState {
    fn selected_ids(&self) -> Vec<Uuid> {
        self.objects.iter().map(|o| *o.id()).collect()
    }

    fn location(&self) -> SelectionLocation {
        self.location
    }

    fn clear_selection(&mut self) {
        self.objects.clear();
    }

    fn add_to_selection(&mut self, object: SelectedObject<Uuid>, location: SelectionLocation) {
        self.location = location;
        if !self.objects.contains(&object) {
            self.objects.push(object);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_and_removes() {
        let a = SelectedObject::Node(Uuid::new_v4());
        let b = SelectedObject::Edge(Uuid::new_v4());
        let mut selection = SelectionState::default();

        selection.select(a, SelectionLocation::Graph);
        selection.toggle(b);
        assert_eq!(selection.objects(), &[a, b]);

        selection.toggle(a);
        assert_eq!(selection.objects(), &[b]);
        assert_eq!(selection.selected_nodes().count(), 0);
        assert_eq!(selection.selected_edges().count(), 1);
    }

    #[test]
    fn add_to_selection_ignores_duplicates() {
        let id = Uuid::new_v4();
        let mut selection = SelectionState::default();
        selection.add_to_selection(SelectedObject::Node(id), SelectionLocation::Palette);
        selection.add_to_selection(SelectedObject::Node(id), SelectionLocation::Palette);

        assert_eq!(selection.selected_ids(), vec![id]);
        assert_eq!(selection.location(), SelectionLocation::Palette);
        assert!(selection.is_selected(id));
    }
}
