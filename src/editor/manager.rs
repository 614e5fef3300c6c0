//! Structural graph mutations.
//!
//! [`GraphManager`] is the only writer of the node and connection lists.
//! It borrows the editor's graph, selection and undo journal for the
//! duration of one operation, and wraps every mutation in a
//! `record`/`flush` pair so each operation is a single undo step.

use crate::editor::grid::Grid;
use crate::editor::selection::Selection;
use crate::graph::{Connection, Graph, Node, NodeLayout};
use crate::history::UndoJournal;
use crate::node_types::{ConnectionId, ElementId, NodeId, PortRef, PortRole};
use egui::Pos2;

pub struct GraphManager<'a> {
    pub graph: &'a mut Graph,
    pub selection: &'a mut Selection,
    pub journal: &'a mut dyn UndoJournal,
    pub layout: NodeLayout,
    pub grid: Grid,
}

impl GraphManager<'_> {
    /// Adds a grid-aligned node near `point` on top of all others.
    pub fn add_node_at(&mut self, point: Pos2) -> NodeId {
        self.journal.record(self.graph, "adding node at...");
        let node = Node::create(point, &self.layout, &self.grid);
        let id = node.id;
        log::debug!("adding node {} at {:?}", id, node.rect.min);
        self.graph.nodes.push(node);
        self.journal.flush();
        id
    }

    /// Removes a node together with every connection attached to it.
    pub fn remove_node(&mut self, id: NodeId) -> bool {
        let Some(index) = self.graph.nodes.iter().position(|node| node.id == id) else {
            log::debug!("ignoring removal of unknown node {}", id);
            return false;
        };
        self.journal
            .record(self.graph, "removing node and associated connections...");

        let (removed, kept): (Vec<Connection>, Vec<Connection>) = self
            .graph
            .connections
            .drain(..)
            .partition(|connection| connection.involves(id));
        self.graph.connections = kept;
        for connection in &removed {
            self.selection.deselect(ElementId::Connection(connection.id));
        }

        self.graph.nodes.remove(index);
        self.selection.deselect(ElementId::Node(id));
        log::debug!("removed node {} and {} connections", id, removed.len());

        self.journal.flush();
        true
    }

    /// Connects two ports of different nodes, output to input.
    ///
    /// The ports may be given in either order. Returns `None` when the
    /// ports share a node, have the same role, or are already connected.
    pub fn connect(&mut self, a: PortRef, b: PortRef) -> Option<ConnectionId> {
        if a.node == b.node {
            log::debug!("rejecting connection from node {} to itself", a.node);
            return None;
        }
        if a.role == b.role {
            log::debug!("rejecting connection between two {:?} ports", a.role);
            return None;
        }
        let (from, to) = match a.role {
            PortRole::Output => (a, b),
            PortRole::Input => (b, a),
        };
        if !self.graph.contains_node(from.node) || !self.graph.contains_node(to.node) {
            log::debug!("rejecting connection to a node outside the graph");
            return None;
        }
        if self.graph.has_connection(from, to) {
            log::debug!("rejecting duplicate connection {} -> {}", from.node, to.node);
            return None;
        }

        self.journal.record(self.graph, "adding connection...");
        let connection = Connection::new(from, to);
        let id = connection.id;
        self.graph.connections.push(connection);
        self.journal.flush();
        Some(id)
    }

    pub fn disconnect(&mut self, id: ConnectionId) -> bool {
        let Some(index) = self.graph.connections.iter().position(|c| c.id == id) else {
            log::debug!("ignoring removal of unknown connection {}", id);
            return false;
        };
        self.journal.record(self.graph, "removing connection...");
        self.graph.connections.remove(index);
        self.selection.deselect(ElementId::Connection(id));
        self.journal.flush();
        true
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Undo journal that only logs the calls it receives.
    #[derive(Default)]
    pub(crate) struct RecordingJournal {
        pub calls: Vec<String>,
    }

    impl UndoJournal for RecordingJournal {
        fn record(&mut self, _graph: &Graph, label: &str) {
            self.calls.push(format!("record:{label}"));
        }

        fn flush(&mut self) {
            self.calls.push("flush".to_string());
        }
    }

    struct Fixture {
        graph: Graph,
        selection: Selection,
        journal: RecordingJournal,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                graph: Graph::default(),
                selection: Selection::new(),
                journal: RecordingJournal::default(),
            }
        }

        fn manager(&mut self) -> GraphManager<'_> {
            GraphManager {
                graph: &mut self.graph,
                selection: &mut self.selection,
                journal: &mut self.journal,
                layout: NodeLayout::default(),
                grid: Grid::new(10.0),
            }
        }

        fn add_nodes(&mut self, count: usize) -> Vec<NodeId> {
            (0..count)
                .map(|i| self.manager().add_node_at(Pos2::new(i as f32 * 300.0, 100.0)))
                .collect()
        }
    }

    fn out(node: NodeId) -> PortRef {
        PortRef::new(node, PortRole::Output)
    }

    fn inp(node: NodeId) -> PortRef {
        PortRef::new(node, PortRole::Input)
    }

    #[test]
    fn add_node_appends_on_top_and_records_undo() {
        let mut fixture = Fixture::new();
        let ids = fixture.add_nodes(2);
        assert_eq!(fixture.graph.nodes.last().map(|n| n.id), Some(ids[1]));
        assert_eq!(
            fixture.journal.calls,
            ["record:adding node at...", "flush", "record:adding node at...", "flush"]
        );
    }

    #[test]
    fn added_nodes_are_grid_aligned() {
        let mut fixture = Fixture::new();
        let id = fixture.manager().add_node_at(Pos2::new(123.4, 56.7));
        let node = fixture.graph.node(id).unwrap();
        assert!(Grid::new(10.0).is_aligned(node.rect.min));
    }

    #[test]
    fn remove_node_cascades_to_its_connections_only() {
        let mut fixture = Fixture::new();
        let ids = fixture.add_nodes(3);
        let mut manager = fixture.manager();
        manager.connect(out(ids[0]), inp(ids[1])).unwrap();
        manager.connect(out(ids[1]), inp(ids[2])).unwrap();
        let survivor = manager.connect(out(ids[0]), inp(ids[2])).unwrap();

        assert!(manager.remove_node(ids[1]));
        assert_eq!(fixture.graph.nodes.len(), 2);
        assert_eq!(fixture.graph.connections.len(), 1);
        assert_eq!(fixture.graph.connections[0].id, survivor);
    }

    #[test]
    fn remove_node_deselects_it_and_its_sub_elements() {
        let mut fixture = Fixture::new();
        let ids = fixture.add_nodes(1);
        fixture
            .selection
            .select(ElementId::TextRegion(ids[0]));
        fixture.manager().remove_node(ids[0]);
        assert_eq!(fixture.selection.selected(), None);
    }

    #[test]
    fn remove_node_deselects_cascaded_connection() {
        let mut fixture = Fixture::new();
        let ids = fixture.add_nodes(2);
        let connection = fixture.manager().connect(out(ids[0]), inp(ids[1])).unwrap();
        fixture.selection.select(ElementId::Connection(connection));
        fixture.manager().remove_node(ids[0]);
        assert_eq!(fixture.selection.selected(), None);
    }

    #[test]
    fn removing_unknown_node_is_a_no_op() {
        let mut fixture = Fixture::new();
        fixture.add_nodes(2);
        fixture.journal.calls.clear();
        assert!(!fixture.manager().remove_node(uuid::Uuid::new_v4()));
        assert_eq!(fixture.graph.nodes.len(), 2);
        assert!(fixture.journal.calls.is_empty());
    }

    #[test]
    fn self_connection_is_rejected() {
        let mut fixture = Fixture::new();
        let ids = fixture.add_nodes(1);
        assert_eq!(fixture.manager().connect(out(ids[0]), inp(ids[0])), None);
        assert!(fixture.graph.connections.is_empty());
    }

    #[test]
    fn connect_orders_ports_and_rejects_bad_pairs() {
        let mut fixture = Fixture::new();
        let ids = fixture.add_nodes(2);
        let mut manager = fixture.manager();
        assert_eq!(manager.connect(out(ids[0]), out(ids[1])), None);
        let id = manager.connect(inp(ids[1]), out(ids[0])).unwrap();
        assert_eq!(manager.connect(out(ids[0]), inp(ids[1])), None);

        let connection = fixture.graph.connection(id).unwrap();
        assert_eq!(connection.from, out(ids[0]));
        assert_eq!(connection.to, inp(ids[1]));
        assert_eq!(fixture.graph.connections.len(), 1);
    }

    #[test]
    fn disconnect_removes_and_deselects() {
        let mut fixture = Fixture::new();
        let ids = fixture.add_nodes(2);
        let id = fixture.manager().connect(out(ids[0]), inp(ids[1])).unwrap();
        fixture.selection.select(ElementId::Connection(id));
        assert!(fixture.manager().disconnect(id));
        assert!(fixture.graph.connections.is_empty());
        assert_eq!(fixture.selection.selected(), None);
        assert!(!fixture.manager().disconnect(id));
    }

    proptest! {
        #[test]
        fn cascade_removes_exactly_the_attached_connections(
            node_count in 2usize..8,
            edges in prop::collection::vec((0usize..8, 0usize..8), 0..24),
            victim in 0usize..8,
        ) {
            let mut fixture = Fixture::new();
            let ids = fixture.add_nodes(node_count);
            for (a, b) in edges {
                let (a, b) = (ids[a % node_count], ids[b % node_count]);
                fixture.manager().connect(out(a), inp(b));
            }
            let victim = ids[victim % node_count];
            let before = fixture.graph.connections.clone();
            let cascade = before.iter().filter(|c| c.involves(victim)).count();

            fixture.manager().remove_node(victim);

            prop_assert_eq!(fixture.graph.connections.len(), before.len() - cascade);
            prop_assert!(fixture.graph.connections.iter().all(|c| !c.involves(victim)));
            let expected: Vec<_> = before.into_iter().filter(|c| !c.involves(victim)).collect();
            prop_assert_eq!(&fixture.graph.connections, &expected);
        }
    }
}
