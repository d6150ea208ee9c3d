//! # Undo/Redo History
//!
//! [`HistoryManager`] keeps whole-document snapshots in a fixed-size ring.
//! Three cursors walk the ring:
//!
//! - `front`: the slot the next snapshot is written to
//! - `rear`: the oldest slot still holding history
//! - `current`: one past the slot the live document came from; equal to
//!   `front` unless the user has stepped back
//!
//! Live snapshots occupy the circular range `[rear, front)`. Slots outside
//! that range are logically empty even when they still hold stale data.
//! `front` always names a free slot, so a full ring holds `capacity - 1`
//! snapshots and the next push evicts the oldest.
//!
//! Undo and redo never hand out a stored document: the live document receives
//! a clone, and the selection is re-resolved by id against it.

mod diagnostics;
pub mod events;
pub mod notify;
pub mod selection;
mod snapshot;

pub use diagnostics::HistoryRow;
pub use events::HistoryEvent;
pub use notify::{LogNotifier, Notifier};
pub use selection::{SelectedObject, Selection, SelectionLocation, reconcile_selection};
pub use snapshot::Snapshot;

use crossbeam_channel::{Receiver, Sender, unbounded};
use std::fmt;

/// Default number of slots in the ring.
pub const DEFAULT_CAPACITY: usize = 10;

/// A ring of one slot cannot hold a reachable state.
const MIN_CAPACITY: usize = 2;

/// Slots are allocated up front, so the ring size is bounded.
pub const MAX_CAPACITY: usize = 1000;

/// What the history manager needs from the document it records.
///
/// `clone` must produce a deep, independent copy. Equality is used to skip
/// snapshots that record no change.
pub trait Document: Clone + PartialEq {
    type Id: Clone + fmt::Debug;
    type Node;
    type Edge;
    type Issue: fmt::Display;

    fn find_node_by_id(&self, id: &Self::Id) -> Option<&Self::Node>;
    fn find_edge_by_id(&self, id: &Self::Id) -> Option<&Self::Edge>;
    fn node_count(&self) -> usize;
    fn edge_count(&self) -> usize;

    /// Re-validates the document after it was restored from history.
    fn check(&self) -> Vec<Self::Issue> {
        Vec::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    #[error("no further history available to undo")]
    NoUndoAvailable,
    #[error("no further history available to redo")]
    NoRedoAvailable,
}

/// Snapshot of the three ring cursors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursors {
    pub front: usize,
    pub rear: usize,
    pub current: usize,
}

pub struct HistoryManager<D: Document> {
    slots: Vec<Option<Snapshot<D>>>,
    front: usize,
    rear: usize,
    current: usize,
    notifier: Box<dyn Notifier>,
    subscribers: Vec<Sender<HistoryEvent>>,
    print_state: bool,
}

impl<D: Document> Default for HistoryManager<D> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<D: Document> HistoryManager<D> {
    pub fn new(capacity: usize) -> Self {
        Self::with_notifier(capacity, Box::new(LogNotifier))
    }

    pub fn with_notifier(capacity: usize, notifier: Box<dyn Notifier>) -> Self {
        if capacity < MIN_CAPACITY {
            log::warn!(
                "History capacity {} is too small, using {}",
                capacity,
                MIN_CAPACITY
            );
        }
        if capacity > MAX_CAPACITY {
            log::warn!(
                "History capacity {} is too large, using {}",
                capacity,
                MAX_CAPACITY
            );
        }
        let capacity = capacity.clamp(MIN_CAPACITY, MAX_CAPACITY);

        Self {
            slots: (0..capacity).map(|_| None).collect(),
            front: 0,
            rear: 0,
            current: 0,
            notifier,
            subscribers: Vec::new(),
            print_state: false,
        }
    }

    /// Log the history table at debug level after every change.
    pub fn set_print_state(&mut self, enabled: bool) {
        self.print_state = enabled;
    }

    /// Returns a receiver that gets a [`HistoryEvent`] after every change.
    pub fn subscribe(&mut self) -> Receiver<HistoryEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn cursors(&self) -> Cursors {
        Cursors {
            front: self.front,
            rear: self.rear,
            current: self.current,
        }
    }

    /// Number of live snapshots.
    pub fn len(&self) -> usize {
        self.distance(self.rear, self.front)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times `undo` can succeed from here.
    pub fn undo_depth(&self) -> usize {
        self.distance(self.rear, self.current).saturating_sub(1)
    }

    /// How many times `redo` can succeed from here.
    pub fn redo_depth(&self) -> usize {
        self.distance(self.current, self.front)
    }

    pub fn can_undo(&self) -> bool {
        self.undo_depth() > 0
    }

    pub fn can_redo(&self) -> bool {
        self.redo_depth() > 0
    }

    /// The snapshot the live document was derived from.
    pub fn current_snapshot(&self) -> Option<&Snapshot<D>> {
        if self.current == self.rear {
            return None;
        }
        self.snapshot_at(self.step_back(self.current, 1))
    }

    /// The snapshot stored at a ring index, if that slot is live.
    pub fn snapshot_at(&self, index: usize) -> Option<&Snapshot<D>> {
        if index >= self.capacity() || !self.is_live(index) {
            return None;
        }
        self.slots[index].as_ref()
    }

    /// Label of the action an `undo` would revert.
    pub fn undo_description(&self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.current_snapshot().map(Snapshot::description)
    }

    /// Label of the action a `redo` would reapply.
    pub fn redo_description(&self) -> Option<&str> {
        if !self.can_redo() {
            return None;
        }
        self.snapshot_at(self.current).map(Snapshot::description)
    }

    /// Records `document` as the newest state.
    ///
    /// Returns `false` without touching the history when `document` equals the
    /// state it was derived from. Otherwise any redo tail is discarded, and
    /// the oldest snapshot is evicted if the ring is full.
    pub fn push(&mut self, description: &str, document: &D) -> bool {
        let previous = self.step_back(self.current, 1);
        if let Some(snapshot) = self.snapshot_at(previous) {
            if snapshot.document() == document {
                log::debug!("History push '{}' skipped: content unchanged", description);
                return false;
            }
        }

        let capacity = self.capacity();
        self.slots[self.current] = Some(Snapshot::new(description, document.clone()));
        self.front = (self.current + 1) % capacity;
        self.current = self.front;

        if self.rear == self.front {
            self.rear = (self.rear + 1) % capacity;
        }

        // prune the redo tail, leaving the slot just before rear alone
        for i in 0..capacity {
            let index = (self.current + i) % capacity;
            if (index + 1) % capacity == self.rear {
                break;
            }
            self.slots[index] = None;
        }

        self.after_change(HistoryEvent::Recorded {
            description: description.to_string(),
        });
        true
    }

    /// Replaces `document` with the state before the last recorded action.
    ///
    /// When nothing is left to undo the user is warned through the notifier
    /// and nothing changes.
    pub fn undo<S>(&mut self, document: &mut D, selection: &mut S) -> Result<(), HistoryError>
    where
        S: Selection<D::Id> + ?Sized,
    {
        if self.rear == self.current || !self.can_undo() {
            self.notifier
                .warn("Unable to Undo", "No further history available");
            return Err(HistoryError::NoUndoAvailable);
        }

        let description = self
            .current_snapshot()
            .map(|s| s.description().to_string())
            .unwrap_or_default();
        let target = self.step_back(self.current, 2);
        let Some(restored) = self.snapshot_at(target).map(|s| s.document().clone()) else {
            debug_assert!(false, "undo target slot {} is not live", target);
            log::error!("History slot {} is empty, undo aborted", target);
            return Err(HistoryError::NoUndoAvailable);
        };

        self.current = self.step_back(self.current, 1);
        restore(document, selection, restored);
        self.after_change(HistoryEvent::Undone { description });
        Ok(())
    }

    /// Replaces `document` with the state after the next undone action.
    pub fn redo<S>(&mut self, document: &mut D, selection: &mut S) -> Result<(), HistoryError>
    where
        S: Selection<D::Id> + ?Sized,
    {
        if self.front == self.current {
            self.notifier
                .warn("Unable to Redo", "No further history available");
            return Err(HistoryError::NoRedoAvailable);
        }

        let Some(snapshot) = self.snapshot_at(self.current) else {
            debug_assert!(false, "redo slot {} is not live", self.current);
            log::error!("History slot {} is empty, redo aborted", self.current);
            return Err(HistoryError::NoRedoAvailable);
        };
        let description = snapshot.description().to_string();
        let restored = snapshot.document().clone();

        self.current = (self.current + 1) % self.capacity();
        restore(document, selection, restored);
        self.after_change(HistoryEvent::Redone { description });
        Ok(())
    }

    /// Forgets all history.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.front = 0;
        self.rear = 0;
        self.current = 0;
        self.after_change(HistoryEvent::Cleared);
    }

    fn after_change(&mut self, event: HistoryEvent) {
        debug_assert!(self.invariants_hold(), "history invariants broken: {:?}", self.cursors());

        if self.print_state {
            log::debug!("\n{}", self);
        }
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn invariants_hold(&self) -> bool {
        let capacity = self.capacity();
        self.front < capacity
            && self.rear < capacity
            && self.current < capacity
            && self.distance(self.rear, self.current) <= self.len()
            && (0..capacity).all(|i| !self.is_live(i) || self.slots[i].is_some())
    }

    fn step_back(&self, index: usize, steps: usize) -> usize {
        let capacity = self.capacity();
        (index + capacity - steps % capacity) % capacity
    }

    /// Forward distance from `from` to `to` around the ring.
    fn distance(&self, from: usize, to: usize) -> usize {
        let capacity = self.capacity();
        (to + capacity - from) % capacity
    }

    fn is_live(&self, index: usize) -> bool {
        self.distance(self.rear, index) < self.len()
    }
}

/// Installs `restored` as the live document and carries the selection over.
fn restore<D, S>(document: &mut D, selection: &mut S, restored: D)
where
    D: Document,
    S: Selection<D::Id> + ?Sized,
{
    let ids = selection.selected_ids();
    let location = selection.location();

    *document = restored;

    for issue in document.check() {
        log::warn!("Restored graph: {}", issue);
    }

    reconcile_selection(document, selection, ids, location);
}
