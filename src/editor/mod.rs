//! # Graph Editor
//!
//! The editor surface: owns the graph, the selection and the undo journal,
//! and routes every input event through them in a fixed order.
//!
//! ## Submodules
//! - [`connection_renderer`]: Connection curves, drawing and hit-testing
//! - [`grid`]: Grid snapping
//! - [`input`]: Input events, double-click detection and shortcuts
//! - [`manager`]: Structural graph mutations with undo recording
//! - [`menus`]: Context menus
//! - [`node_ports`]: Node and port interaction and drawing
//! - [`selection`]: Single-element selection state machine
//! - [`style`]: Editor styling
//!
//! ## Event routing
//! Each call to [`Editor::process_event`] runs, in order: the selection
//! pre-pass, every node topmost first, every connection, the editor's own
//! handlers (canvas double-click, context menu, panning, shortcuts), and the
//! selection post-pass. The first element to consume an event hides it from
//! everything behind it.

pub mod connection_renderer;
pub mod grid;
pub mod input;
pub mod manager;
pub mod menus;
pub mod node_ports;
pub mod selection;
pub mod style;

use crate::config::EditorConfig;
use crate::error::EditorError;
use crate::graph::Graph;
use crate::history::{UndoJournal, UndoStack};
use crate::node_types::{ConnectionId, ElementId, NodeId, PortRef, PortRole, SelectionKind};
use connection_renderer::draw_bezier;
use egui::{Key, Pos2, Rect, Stroke, Vec2};
use grid::Grid;
use input::{ClickTracker, ElementRequest, EventResponse, InputEvent, PointerButton, Shortcut};
use manager::GraphManager;
use menus::{ContextMenu, MenuAction, MenuTarget};
use selection::Selection;

/// Result of processing one input event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// Some element or editor handler acted on the event.
    pub handled: bool,
    /// The editor needs to be redrawn.
    pub changed: bool,
}

impl EventOutcome {
    fn absorb(&mut self, response: &EventResponse) {
        self.handled |= response.consumed;
        self.changed |= response.changed;
    }
}

pub struct Editor<J: UndoJournal = UndoStack> {
    graph: Graph,
    selection: Selection,
    journal: J,
    config: EditorConfig,
    /// Accumulated pan, used to keep the grid (and snapping) moving with the nodes.
    grid_offset: Vec2,
    viewport: Rect,
    clicks: ClickTracker,
    pending_connection: Option<PortRef>,
    pointer: Option<Pos2>,
    panning: bool,
    context_menu: Option<ContextMenu>,
    show_help: bool,
}

impl Default for Editor<UndoStack> {
    fn default() -> Self {
        Self::with_config(EditorConfig::default())
    }
}

impl Editor<UndoStack> {
    pub fn with_config(config: EditorConfig) -> Self {
        let journal = UndoStack::with_max_records(config.history_max_records);
        Self::new(config, journal)
    }
}

impl<J: UndoJournal> Editor<J> {
    pub fn new(config: EditorConfig, journal: J) -> Self {
        Self {
            graph: Graph::default(),
            selection: Selection::new(),
            journal,
            clicks: ClickTracker::new(config.double_click_seconds),
            config,
            grid_offset: Vec2::ZERO,
            viewport: Rect::from_min_size(Pos2::ZERO, Vec2::new(800.0, 600.0)),
            pending_connection: None,
            pointer: None,
            panning: false,
            context_menu: None,
            show_help: false,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn journal(&self) -> &J {
        &self.journal
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn node_count(&self) -> usize {
        self.graph.nodes.len()
    }

    pub fn connection_count(&self) -> usize {
        self.graph.connections.len()
    }

    pub fn selected_element(&self) -> Option<ElementId> {
        self.selection.selected()
    }

    pub fn selected_element_kind(&self) -> SelectionKind {
        self.selection.selected_kind()
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn grid(&self) -> Grid {
        self.config.grid(self.grid_offset)
    }

    pub fn context_menu(&self) -> Option<&ContextMenu> {
        self.context_menu.as_ref()
    }

    pub fn close_context_menu(&mut self) {
        self.context_menu = None;
    }

    pub fn pending_connection(&self) -> Option<PortRef> {
        self.pending_connection
    }

    /// The visible canvas area, used as the target for centering.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    fn manager(&mut self) -> GraphManager<'_> {
        GraphManager {
            graph: &mut self.graph,
            selection: &mut self.selection,
            journal: &mut self.journal,
            layout: self.config.node_layout(),
            grid: self.config.grid(self.grid_offset),
        }
    }

    pub fn add_node_at(&mut self, point: Pos2) -> NodeId {
        self.manager().add_node_at(point)
    }

    pub fn remove_node(&mut self, id: NodeId) -> bool {
        self.manager().remove_node(id)
    }

    pub fn connect(&mut self, a: PortRef, b: PortRef) -> Option<ConnectionId> {
        self.manager().connect(a, b)
    }

    pub fn disconnect(&mut self, id: ConnectionId) -> bool {
        self.manager().disconnect(id)
    }

    /// Translates every node, and the grid with them.
    pub fn pan(&mut self, delta: Vec2) {
        for node in &mut self.graph.nodes {
            node.drag(delta);
        }
        self.grid_offset += delta;
    }

    /// Pans so the average of all node centers lands on the viewport center.
    pub fn center_on_nodes(&mut self) -> bool {
        let Some(centroid) = self.graph.centroid() else {
            log::info!("no nodes to center on");
            return false;
        };
        log::info!("centering on nodes...");
        self.pan(self.viewport.center() - centroid);
        true
    }

    /// Removes the node owning the current selection.
    ///
    /// Does nothing without a selection. A selection that does not resolve
    /// to a node is a broken invariant and is reported as an error.
    pub fn delete_selected(&mut self) -> Result<bool, EditorError> {
        let Some(selected) = self.selection.selected() else {
            log::info!("ignoring delete, no node selected");
            return Ok(false);
        };
        let node = selected
            .owning_node()
            .ok_or(EditorError::SelectionWithoutNode(selected))?;
        log::info!("deleting selected node...");
        Ok(self.remove_node(node))
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
        if self.show_help {
            log::info!("displaying help menu");
        } else {
            log::info!("hiding help menu");
        }
    }

    pub fn debug_dump(&self) {
        log::info!(
            "nodes.len() = {}, connections.len() = {}",
            self.node_count(),
            self.connection_count()
        );
    }

    pub fn undo(&mut self) -> bool {
        match self.journal.undo(&self.graph) {
            Some(graph) => {
                log::info!("undo");
                self.restore(graph);
                true
            }
            None => {
                log::debug!("nothing to undo");
                false
            }
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.journal.redo(&self.graph) {
            Some(graph) => {
                log::info!("redo");
                self.restore(graph);
                true
            }
            None => {
                log::debug!("nothing to redo");
                false
            }
        }
    }

    fn restore(&mut self, graph: Graph) {
        self.graph = graph;
        for node in &mut self.graph.nodes {
            node.set_dragging(false);
        }
        self.pending_connection = None;
        self.context_menu = None;
        let graph = &self.graph;
        self.selection.retain(|element| graph.contains_element(element));
    }

    pub fn apply_menu_action(&mut self, action: MenuAction) -> bool {
        self.context_menu = None;
        match action {
            MenuAction::AddNode(pos) => {
                self.add_node_at(pos);
                true
            }
            MenuAction::RemoveNode(id) => self.remove_node(id),
            MenuAction::RemoveConnection(id) => self.disconnect(id),
        }
    }

    /// The single entry point for input.
    pub fn process_event(&mut self, event: &InputEvent) -> Result<EventOutcome, EditorError> {
        let mut outcome = EventOutcome::default();
        if let Some(pos) = event.pointer_pos() {
            self.pointer = Some(pos);
        }
        if event.is_press() && self.context_menu.take().is_some() {
            outcome.changed = true;
        }

        self.selection.start_event_processing(event);

        let mut request = None;
        for node in self.graph.nodes.iter_mut().rev() {
            let response = node.process_event(event, &mut self.selection);
            outcome.absorb(&response);
            if response.consumed {
                request = response.request;
                break;
            }
        }
        if !outcome.handled {
            let tolerance = self.config.connection_tolerance;
            for connection in self.graph.connections.iter().rev() {
                let response =
                    connection.process_event(event, &self.graph, &mut self.selection, tolerance);
                outcome.absorb(&response);
                if response.consumed {
                    request = response.request;
                    break;
                }
            }
        }
        if let Some(request) = request {
            self.handle_request(request, event);
        }

        let result = self.process_editor_event(event, &mut outcome);

        outcome.changed |= self.selection.end_event_processing(event);
        result?;
        Ok(outcome)
    }

    fn handle_request(&mut self, request: ElementRequest, event: &InputEvent) {
        match request {
            ElementRequest::BeginConnection(port) => {
                log::debug!("starting connection from {:?}", port);
                self.pending_connection = Some(port);
            }
            ElementRequest::OpenMenu(target) => {
                let position = event.pointer_pos().unwrap_or_default();
                self.context_menu = Some(ContextMenu::new(position, target));
            }
        }
    }

    /// Handlers for the canvas itself, run after every element has been
    /// offered the event.
    fn process_editor_event(
        &mut self,
        event: &InputEvent,
        outcome: &mut EventOutcome,
    ) -> Result<(), EditorError> {
        match event {
            InputEvent::PointerPressed {
                button: PointerButton::Primary,
                pos,
                time,
            } => {
                let target = if outcome.handled {
                    self.selection_target_kind()
                } else {
                    SelectionKind::Nothing
                };
                let double_click = self.clicks.is_double_click(*time, target);
                if !outcome.handled {
                    self.panning = true;
                    if double_click {
                        let point = *pos;
                        self.add_node_at(point);
                        outcome.handled = true;
                        outcome.changed = true;
                    }
                }
            }
            InputEvent::PointerPressed {
                button: PointerButton::Secondary,
                pos,
                ..
            } if !outcome.handled && self.selection.selected().is_none() => {
                self.context_menu = Some(ContextMenu::new(*pos, MenuTarget::Canvas));
                outcome.handled = true;
                outcome.changed = true;
            }
            InputEvent::PointerDragged {
                button: PointerButton::Primary,
                delta,
                ..
            } if !outcome.handled && self.panning => {
                self.pan(*delta);
                outcome.handled = true;
                outcome.changed = true;
            }
            InputEvent::PointerDragged { .. } if self.pending_connection.is_some() => {
                outcome.changed = true;
            }
            InputEvent::PointerReleased {
                button: PointerButton::Primary,
                pos,
            } => {
                self.panning = false;
                if let Some(from) = self.pending_connection.take() {
                    outcome.changed = true;
                    if let Some(to) = self.graph.port_at(*pos) {
                        outcome.handled |= self.connect(from, to).is_some();
                    }
                }
            }
            InputEvent::KeyDown { key, modifiers } => {
                if self.selection.selected_kind() == SelectionKind::TextRegion {
                    if *key == Key::Backspace {
                        outcome.changed |= self.edit_selected_text(|text| {
                            text.pop();
                        });
                    }
                } else if let Some(shortcut) = Shortcut::from_key(*key, *modifiers) {
                    outcome.handled = true;
                    outcome.changed |= self.run_shortcut(shortcut)?;
                }
            }
            InputEvent::Text(typed) => {
                outcome.changed |= self.edit_selected_text(|text| text.push_str(typed));
            }
            _ => {}
        }
        Ok(())
    }

    /// Click-tracker target for a press an element consumed this tick.
    fn selection_target_kind(&self) -> SelectionKind {
        // Claims are only committed at the end of the tick, so read the
        // kind of whatever the pointer is over instead.
        match self.pointer.and_then(|pos| self.element_at(pos)) {
            Some(element) => Some(element.kind()).into(),
            None => SelectionKind::Nothing,
        }
    }

    /// The topmost element under `pos`, nodes before connections.
    pub fn element_at(&self, pos: Pos2) -> Option<ElementId> {
        for node in self.graph.nodes.iter().rev() {
            if let Some(role) = node.port_at(pos) {
                return Some(ElementId::Port(PortRef::new(node.id, role)));
            }
            if node.text_rect().contains(pos) {
                return Some(ElementId::TextRegion(node.id));
            }
            if node.rect.contains(pos) {
                return Some(ElementId::Node(node.id));
            }
        }
        let tolerance = self.config.connection_tolerance;
        self.graph
            .connections
            .iter()
            .rev()
            .find(|connection| connection.hit_test(&self.graph, pos, tolerance))
            .map(|connection| ElementId::Connection(connection.id))
    }

    fn edit_selected_text(&mut self, edit: impl FnOnce(&mut String)) -> bool {
        let Some(ElementId::TextRegion(id)) = self.selection.selected() else {
            return false;
        };
        match self.graph.node_mut(id) {
            Some(node) => {
                edit(&mut node.text);
                true
            }
            None => false,
        }
    }

    fn run_shortcut(&mut self, shortcut: Shortcut) -> Result<bool, EditorError> {
        let changed = match shortcut {
            Shortcut::Center => self.center_on_nodes(),
            Shortcut::Delete => self.delete_selected()?,
            Shortcut::ToggleHelp => {
                self.toggle_help();
                true
            }
            Shortcut::DebugDump => {
                self.debug_dump();
                false
            }
            Shortcut::Undo => self.undo(),
            Shortcut::Redo => self.redo(),
        };
        Ok(changed)
    }

    /// Draws every node, then every connection, then the connection being
    /// dragged out of a port.
    pub fn draw_all(&self, painter: &egui::Painter) {
        let style = &self.config.style;
        for node in &self.graph.nodes {
            node.draw(painter, style, &self.selection);
        }
        for connection in &self.graph.connections {
            connection.draw(painter, &self.graph, style, &self.selection);
        }
        self.draw_connection_handle(painter);
    }

    fn draw_connection_handle(&self, painter: &egui::Painter) {
        let (Some(port), Some(pointer)) = (self.pending_connection, self.pointer) else {
            return;
        };
        let Some(start) = self.graph.port_center(port) else {
            return;
        };
        let stroke = Stroke::new(2.0, self.config.style.handle_color);
        match port.role {
            PortRole::Output => draw_bezier(painter, start, pointer, stroke),
            PortRole::Input => draw_bezier(painter, pointer, start, stroke),
        }
    }
}
