//! Node and port interaction.
//!
//! A node hit-tests its own sub-elements before its body: a press on a port
//! starts a connection drag, a press in the text region selects the text,
//! and only a press elsewhere on the body selects and starts dragging the
//! node itself.

use crate::editor::input::{ElementRequest, EventResponse, InputEvent, PointerButton};
use crate::editor::menus::MenuTarget;
use crate::editor::selection::Selection;
use crate::editor::style::{EditorStyle, ElementStyle};
use crate::graph::{Node, Port};
use crate::node_types::{ElementId, PortRef};
use egui::{Align2, FontId, Pos2, Rect, StrokeKind, Vec2};

impl Node {
    /// Whether `pos` lands on the node body or on one of its ports.
    pub fn contains(&self, pos: Pos2) -> bool {
        self.rect.contains(pos) || self.port_at(pos).is_some()
    }

    pub fn process_event(
        &mut self,
        event: &InputEvent,
        selection: &mut Selection,
    ) -> EventResponse {
        match *event {
            InputEvent::PointerPressed {
                button: PointerButton::Primary,
                pos,
                ..
            } => self.press(pos, selection),
            InputEvent::PointerPressed {
                button: PointerButton::Secondary,
                pos,
                ..
            } if self.contains(pos) => {
                selection.claim(ElementId::Node(self.id));
                EventResponse::consumed()
                    .with_request(ElementRequest::OpenMenu(MenuTarget::Node(self.id)))
            }
            InputEvent::PointerDragged {
                button: PointerButton::Primary,
                delta,
                ..
            } if self.is_dragging() => {
                self.drag(delta);
                EventResponse::consumed()
            }
            InputEvent::PointerReleased {
                button: PointerButton::Primary,
                ..
            } if self.is_dragging() => {
                // Every node sees the release, so it is never consumed here.
                self.set_dragging(false);
                EventResponse::ignored()
            }
            _ => EventResponse::ignored(),
        }
    }

    fn press(&mut self, pos: Pos2, selection: &mut Selection) -> EventResponse {
        if let Some(role) = self.port_at(pos) {
            let port = PortRef::new(self.id, role);
            selection.claim(ElementId::Port(port));
            return EventResponse::consumed().with_request(ElementRequest::BeginConnection(port));
        }
        if self.text_rect().contains(pos) {
            selection.claim(ElementId::TextRegion(self.id));
            return EventResponse::consumed();
        }
        if self.rect.contains(pos) {
            selection.claim(ElementId::Node(self.id));
            self.set_dragging(true);
            return EventResponse::consumed();
        }
        EventResponse::ignored()
    }

    pub fn draw(&self, painter: &egui::Painter, style: &EditorStyle, selection: &Selection) {
        let body = style.node.pick(selection.is_selected(ElementId::Node(self.id)));
        paint_box(painter, self.rect, body);

        let text_rect = self.text_rect();
        let text_box = style
            .text_box
            .pick(selection.is_selected(ElementId::TextRegion(self.id)));
        paint_box(painter, text_rect, text_box);
        painter.text(
            text_rect.left_center() + Vec2::new(4.0, 0.0),
            Align2::LEFT_CENTER,
            &self.text,
            FontId::proportional(style.font_size),
            style.text_color,
        );

        self.input.draw(painter, self.rect, style, selection);
        self.output.draw(painter, self.rect, style, selection);
    }
}

impl Port {
    pub fn draw(
        &self,
        painter: &egui::Painter,
        node_rect: Rect,
        style: &EditorStyle,
        selection: &Selection,
    ) {
        let selected = selection.is_selected(ElementId::Port(self.reference()));
        paint_box(painter, self.rect(node_rect), style.port.pick(selected));
    }
}

fn paint_box(painter: &egui::Painter, rect: Rect, style: &ElementStyle) {
    painter.rect_filled(rect, style.corner_radius, style.fill);
    painter.rect_stroke(rect, style.corner_radius, style.stroke, StrokeKind::Inside);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeLayout;
    use crate::node_types::PortRole;

    fn node() -> Node {
        let layout = NodeLayout::default();
        Node::from_rect(Rect::from_min_size(Pos2::ZERO, layout.size), &layout)
    }

    fn press(pos: Pos2) -> InputEvent {
        InputEvent::PointerPressed {
            button: PointerButton::Primary,
            pos,
            time: 0.0,
        }
    }

    fn offer(node: &mut Node, selection: &mut Selection, event: InputEvent) -> EventResponse {
        selection.start_event_processing(&event);
        let response = node.process_event(&event, selection);
        selection.end_event_processing(&event);
        response
    }

    #[test]
    fn body_press_selects_and_drags() {
        let mut node = node();
        let mut selection = Selection::new();
        // Between the text region and the bottom edge.
        let response = offer(&mut node, &mut selection, press(Pos2::new(100.0, 35.0)));
        assert!(response.consumed);
        assert!(node.is_dragging());
        assert_eq!(selection.selected(), Some(ElementId::Node(node.id)));

        let response = offer(
            &mut node,
            &mut selection,
            InputEvent::PointerDragged {
                button: PointerButton::Primary,
                pos: Pos2::new(110.0, 45.0),
                delta: Vec2::new(10.0, 10.0),
            },
        );
        assert!(response.changed);
        assert_eq!(node.rect.min, Pos2::new(10.0, 10.0));

        let response = offer(
            &mut node,
            &mut selection,
            InputEvent::PointerReleased {
                button: PointerButton::Primary,
                pos: Pos2::new(110.0, 45.0),
            },
        );
        assert!(!response.consumed);
        assert!(!node.is_dragging());
    }

    #[test]
    fn port_press_outranks_the_body() {
        let mut node = node();
        let mut selection = Selection::new();
        let response = offer(&mut node, &mut selection, press(Pos2::new(198.0, 18.0)));
        let port = PortRef::new(node.id, PortRole::Output);
        assert_eq!(response.request, Some(ElementRequest::BeginConnection(port)));
        assert!(!node.is_dragging());
        assert_eq!(selection.selected(), Some(ElementId::Port(port)));
    }

    #[test]
    fn text_press_selects_text_region() {
        let mut node = node();
        let mut selection = Selection::new();
        offer(&mut node, &mut selection, press(Pos2::new(100.0, 18.0)));
        assert_eq!(selection.selected(), Some(ElementId::TextRegion(node.id)));
        assert!(!node.is_dragging());
    }

    #[test]
    fn drag_without_press_is_ignored() {
        let mut node = node();
        let mut selection = Selection::new();
        let response = offer(
            &mut node,
            &mut selection,
            InputEvent::PointerDragged {
                button: PointerButton::Primary,
                pos: Pos2::new(100.0, 35.0),
                delta: Vec2::new(10.0, 10.0),
            },
        );
        assert_eq!(response, EventResponse::ignored());
        assert_eq!(node.rect.min, Pos2::ZERO);
    }

    #[test]
    fn secondary_press_opens_node_menu() {
        let mut node = node();
        let mut selection = Selection::new();
        let response = offer(
            &mut node,
            &mut selection,
            InputEvent::PointerPressed {
                button: PointerButton::Secondary,
                pos: Pos2::new(100.0, 18.0),
                time: 0.0,
            },
        );
        assert_eq!(
            response.request,
            Some(ElementRequest::OpenMenu(MenuTarget::Node(node.id)))
        );
    }

    #[test]
    fn press_outside_is_ignored() {
        let mut node = node();
        let mut selection = Selection::new();
        let response = offer(&mut node, &mut selection, press(Pos2::new(300.0, 300.0)));
        assert!(!response.consumed);
        assert_eq!(selection.selected(), None);
    }
}
