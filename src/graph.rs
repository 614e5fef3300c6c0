use crate::editor::grid::Grid;
use crate::node_types::{ConnectionId, ElementId, NodeId, PortRef, PortRole};
use egui::{Pos2, Rect, Vec2};
use uuid::Uuid;

/// The authoritative node and connection lists.
///
/// `nodes` is kept in z-order: the last node is drawn last and is the
/// first to be offered input.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub connections: Vec<Connection>,
}

/// Dimensions every node is created with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeLayout {
    pub size: Vec2,
    pub port_size: Vec2,
    pub text_margin: f32,
}

impl Default for NodeLayout {
    fn default() -> Self {
        Self {
            size: Vec2::new(200.0, 37.0),
            port_size: Vec2::new(10.0, 20.0),
            text_margin: 4.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub rect: Rect,
    pub input: Port,
    pub output: Port,
    /// Contents of the node's editable text region.
    pub text: String,
    text_margin: f32,
    dragging: bool,
}

/// A connection endpoint. Its rectangle is derived from the owning
/// node's rectangle every time it is needed.
#[derive(Clone, Debug, PartialEq)]
pub struct Port {
    pub node: NodeId,
    pub role: PortRole,
    pub size: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
    pub id: ConnectionId,
    /// Output port of the source node.
    pub from: PortRef,
    /// Input port of the destination node.
    pub to: PortRef,
}

impl Port {
    pub fn reference(&self) -> PortRef {
        PortRef::new(self.node, self.role)
    }

    /// Input ports straddle the left edge of the node, output ports the right edge.
    pub fn rect(&self, node_rect: Rect) -> Rect {
        let edge_x = match self.role {
            PortRole::Input => node_rect.left(),
            PortRole::Output => node_rect.right(),
        };
        Rect::from_center_size(Pos2::new(edge_x, node_rect.center().y), self.size)
    }
}

impl Node {
    /// Creates a node near `position`, aligned to `grid`.
    ///
    /// The position is shifted back by the largest grid multiple not
    /// exceeding half the node size, then snapped down onto the grid, so the
    /// node ends up roughly centered on the requested point while its origin
    /// stays on a grid line.
    pub fn create(position: Pos2, layout: &NodeLayout, grid: &Grid) -> Self {
        let origin = grid.snap(position - grid.centering_offset(layout.size));
        Self::from_rect(Rect::from_min_size(origin, layout.size), layout)
    }

    pub fn from_rect(rect: Rect, layout: &NodeLayout) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            rect,
            input: Port {
                node: id,
                role: PortRole::Input,
                size: layout.port_size,
            },
            output: Port {
                node: id,
                role: PortRole::Output,
                size: layout.port_size,
            },
            text: String::new(),
            text_margin: layout.text_margin,
            dragging: false,
        }
    }

    pub fn port(&self, role: PortRole) -> &Port {
        match role {
            PortRole::Input => &self.input,
            PortRole::Output => &self.output,
        }
    }

    pub fn port_rect(&self, role: PortRole) -> Rect {
        self.port(role).rect(self.rect)
    }

    pub fn port_center(&self, role: PortRole) -> Pos2 {
        self.port_rect(role).center()
    }

    /// The port under `pos`, output port first.
    pub fn port_at(&self, pos: Pos2) -> Option<PortRole> {
        [PortRole::Output, PortRole::Input]
            .into_iter()
            .find(|role| self.port_rect(*role).contains(pos))
    }

    /// Area between the two ports holding the node's text.
    pub fn text_rect(&self) -> Rect {
        let inset_x = self.input.size.x / 2.0 + self.text_margin;
        self.rect.shrink2(Vec2::new(inset_x, self.text_margin))
    }

    /// Translates the node unconditionally.
    pub fn drag(&mut self, delta: Vec2) {
        self.rect = self.rect.translate(delta);
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub(crate) fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }
}

impl Connection {
    pub fn new(from: PortRef, to: PortRef) -> Self {
        Self {
            id: Uuid::new_v4(),
            from,
            to,
        }
    }

    pub fn involves(&self, node: NodeId) -> bool {
        self.from.node == node || self.to.node == node
    }

    /// Live endpoint positions, `None` if either node has left the graph.
    pub fn endpoints(&self, graph: &Graph) -> Option<(Pos2, Pos2)> {
        Some((graph.port_center(self.from)?, graph.port_center(self.to)?))
    }
}

impl Graph {
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|node| node.id == id)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.iter().find(|connection| connection.id == id)
    }

    pub fn has_connection(&self, from: PortRef, to: PortRef) -> bool {
        self.connections
            .iter()
            .any(|connection| connection.from == from && connection.to == to)
    }

    /// Whether `element` (and its owning node) is still part of the graph.
    pub fn contains_element(&self, element: ElementId) -> bool {
        match element {
            ElementId::Connection(id) => self.connection(id).is_some(),
            other => other.owning_node().is_some_and(|id| self.contains_node(id)),
        }
    }

    pub fn port_center(&self, port: PortRef) -> Option<Pos2> {
        self.node(port.node).map(|node| node.port_center(port.role))
    }

    /// The topmost port under `pos`.
    pub fn port_at(&self, pos: Pos2) -> Option<PortRef> {
        self.nodes
            .iter()
            .rev()
            .find_map(|node| node.port_at(pos).map(|role| PortRef::new(node.id, role)))
    }

    /// Average of all node rectangle centers.
    pub fn centroid(&self) -> Option<Pos2> {
        if self.nodes.is_empty() {
            return None;
        }
        let sum = self
            .nodes
            .iter()
            .fold(Vec2::ZERO, |sum, node| sum + node.rect.center().to_vec2());
        Some((sum / self.nodes.len() as f32).to_pos2())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn node_at(x: f32, y: f32) -> Node {
        Node::from_rect(
            Rect::from_min_size(Pos2::new(x, y), Vec2::new(200.0, 37.0)),
            &NodeLayout::default(),
        )
    }

    #[test]
    fn create_uses_reference_offsets() {
        let grid = Grid::new(10.0);
        let node = Node::create(Pos2::new(300.0, 200.0), &NodeLayout::default(), &grid);
        assert_eq!(node.rect.min, Pos2::new(200.0, 190.0));
        assert_eq!(node.rect.size(), Vec2::new(200.0, 37.0));
    }

    #[test]
    fn ports_belong_to_their_node() {
        let node = node_at(0.0, 0.0);
        assert_eq!(node.input.node, node.id);
        assert_eq!(node.output.node, node.id);
        assert_eq!(node.port_center(PortRole::Input), Pos2::new(0.0, 18.5));
        assert_eq!(node.port_center(PortRole::Output), Pos2::new(200.0, 18.5));
    }

    #[test]
    fn port_hit_testing() {
        let node = node_at(0.0, 0.0);
        assert_eq!(node.port_at(Pos2::new(-3.0, 18.0)), Some(PortRole::Input));
        assert_eq!(node.port_at(Pos2::new(203.0, 20.0)), Some(PortRole::Output));
        assert_eq!(node.port_at(Pos2::new(100.0, 18.0)), None);
    }

    #[test]
    fn text_region_sits_inside_the_node_between_ports() {
        let node = node_at(0.0, 0.0);
        let text = node.text_rect();
        assert!(node.rect.contains_rect(text));
        assert!(!text.intersects(node.port_rect(PortRole::Input)));
        assert!(!text.intersects(node.port_rect(PortRole::Output)));
    }

    #[test]
    fn connection_endpoints_follow_nodes() {
        let mut graph = Graph::default();
        graph.nodes.push(node_at(0.0, 0.0));
        graph.nodes.push(node_at(400.0, 0.0));
        let (a, b) = (graph.nodes[0].id, graph.nodes[1].id);
        let connection = Connection::new(
            PortRef::new(a, PortRole::Output),
            PortRef::new(b, PortRole::Input),
        );
        assert_eq!(
            connection.endpoints(&graph),
            Some((Pos2::new(200.0, 18.5), Pos2::new(400.0, 18.5)))
        );

        graph.nodes[1].drag(Vec2::new(0.0, 50.0));
        assert_eq!(
            connection.endpoints(&graph),
            Some((Pos2::new(200.0, 18.5), Pos2::new(400.0, 68.5)))
        );

        graph.nodes.remove(1);
        assert_eq!(connection.endpoints(&graph), None);
    }

    #[test]
    fn centroid_of_empty_graph_is_none() {
        assert_eq!(Graph::default().centroid(), None);
    }

    #[test]
    fn topmost_port_wins() {
        let mut graph = Graph::default();
        graph.nodes.push(node_at(0.0, 0.0));
        graph.nodes.push(node_at(0.0, 0.0));
        let top = graph.nodes[1].id;
        assert_eq!(
            graph.port_at(Pos2::new(0.0, 18.0)),
            Some(PortRef::new(top, PortRole::Input))
        );
    }

    proptest! {
        #[test]
        fn created_nodes_stay_on_a_panned_grid(
            x in -5000.0f32..5000.0,
            y in -5000.0f32..5000.0,
            ox in -50.0f32..50.0,
            oy in -50.0f32..50.0,
        ) {
            let grid = Grid::new(10.0).with_offset(Vec2::new(ox, oy));
            let node = Node::create(Pos2::new(x, y), &NodeLayout::default(), &grid);
            prop_assert_eq!(grid.snap(node.rect.min), node.rect.min);
            prop_assert!(grid.is_aligned(node.rect.min));
        }
    }
}
