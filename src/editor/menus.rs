//! Context menus opened by the editor and its elements.

use crate::node_types::{ConnectionId, NodeId};
use egui::Pos2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuTarget {
    Canvas,
    Node(NodeId),
    Connection(ConnectionId),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MenuAction {
    AddNode(Pos2),
    RemoveNode(NodeId),
    RemoveConnection(ConnectionId),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContextMenu {
    pub position: Pos2,
    pub target: MenuTarget,
}

impl ContextMenu {
    pub fn new(position: Pos2, target: MenuTarget) -> Self {
        Self { position, target }
    }

    /// Entries to show, as (label, action) pairs.
    pub fn items(&self) -> Vec<(&'static str, MenuAction)> {
        match self.target {
            MenuTarget::Canvas => vec![("Add Node", MenuAction::AddNode(self.position))],
            MenuTarget::Node(id) => vec![("Remove Node", MenuAction::RemoveNode(id))],
            MenuTarget::Connection(id) => {
                vec![("Remove Connection", MenuAction::RemoveConnection(id))]
            }
        }
    }
}
