//! Snapshot-based undo/redo for a logical graph editor.
//!
//! The core is [`history::HistoryManager`], a fixed-size ring of whole-graph
//! snapshots. [`editor::EditorSession`] wires it to a live [`graph::LogicalGraph`],
//! a selection and a hierarchy view.

pub mod editor;
pub mod graph;
pub mod history;
pub mod node_types;
pub mod script;
pub mod settings;

pub use editor::EditorSession;
pub use graph::LogicalGraph;
pub use history::{Document, HistoryError, HistoryManager};
pub use settings::EditorSettings;
