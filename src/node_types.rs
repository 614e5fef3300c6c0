use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type NodeId = Uuid;
pub type ConnectionId = Uuid;

/// Which side of a node a port sits on.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PortRole {
    Input,
    Output,
}

/// Non-owning reference to a port: the owning node plus the port's role.
///
/// A node has exactly one port per role, so this pair identifies a port
/// for as long as the node stays in the graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PortRef {
    pub node: NodeId,
    pub role: PortRole,
}

impl PortRef {
    pub fn new(node: NodeId, role: PortRole) -> Self {
        Self { node, role }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Node,
    Port,
    Connection,
    TextRegion,
}

/// Kind of the current selection, `Nothing` when idle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectionKind {
    Nothing,
    Node,
    Port,
    Connection,
    TextRegion,
}

impl From<Option<ElementKind>> for SelectionKind {
    fn from(kind: Option<ElementKind>) -> Self {
        match kind {
            None => SelectionKind::Nothing,
            Some(ElementKind::Node) => SelectionKind::Node,
            Some(ElementKind::Port) => SelectionKind::Port,
            Some(ElementKind::Connection) => SelectionKind::Connection,
            Some(ElementKind::TextRegion) => SelectionKind::TextRegion,
        }
    }
}

/// Any interactive element that can hold selection focus.
///
/// Sub-elements (ports, text regions) carry the id of the node that owns
/// them, which is their parent link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementId {
    Node(NodeId),
    Port(PortRef),
    Connection(ConnectionId),
    TextRegion(NodeId),
}

impl ElementId {
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementId::Node(_) => ElementKind::Node,
            ElementId::Port(_) => ElementKind::Port,
            ElementId::Connection(_) => ElementKind::Connection,
            ElementId::TextRegion(_) => ElementKind::TextRegion,
        }
    }

    pub fn parent(&self) -> Option<ElementId> {
        match self {
            ElementId::Port(port) => Some(ElementId::Node(port.node)),
            ElementId::TextRegion(node) => Some(ElementId::Node(*node)),
            ElementId::Node(_) | ElementId::Connection(_) => None,
        }
    }

    /// Iterates over this element and then each of its ancestors.
    pub fn ancestors(self) -> impl Iterator<Item = ElementId> {
        std::iter::successors(Some(self), |element| element.parent())
    }

    /// Walks up the parent chain to the owning node, if there is one.
    pub fn owning_node(&self) -> Option<NodeId> {
        self.ancestors().find_map(|element| match element {
            ElementId::Node(id) => Some(id),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_elements_resolve_to_their_node() {
        let node = Uuid::new_v4();
        let port = ElementId::Port(PortRef::new(node, PortRole::Output));
        assert_eq!(port.parent(), Some(ElementId::Node(node)));
        assert_eq!(port.owning_node(), Some(node));
        assert_eq!(ElementId::TextRegion(node).owning_node(), Some(node));
        assert_eq!(ElementId::Node(node).owning_node(), Some(node));
    }

    #[test]
    fn connections_have_no_owning_node() {
        let connection = ElementId::Connection(Uuid::new_v4());
        assert_eq!(connection.parent(), None);
        assert_eq!(connection.owning_node(), None);
        assert_eq!(connection.ancestors().count(), 1);
    }

    #[test]
    fn selection_kind_from_element_kind() {
        assert_eq!(SelectionKind::from(None), SelectionKind::Nothing);
        assert_eq!(
            SelectionKind::from(Some(ElementKind::TextRegion)),
            SelectionKind::TextRegion
        );
    }
}
