//! Interaction core of a node-graph editor: nodes with one input and one
//! output port, directed connections between them, single-element
//! selection, and undoable structural edits.

pub mod config;
pub mod editor;
pub mod error;
pub mod graph;
pub mod history;
pub mod node_types;

pub use config::EditorConfig;
pub use editor::{Editor, EventOutcome};
pub use error::EditorError;
pub use graph::{Connection, Graph, Node, Port};
pub use history::{UndoJournal, UndoStack};
