use crate::node_types::ElementId;
use thiserror::Error;

/// Broken invariants surfaced by the editor core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    #[error("selected element {0:?} has no owning node")]
    SelectionWithoutNode(ElementId),
}
