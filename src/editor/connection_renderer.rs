//! Connection rendering and hit-testing.
//!
//! Connections are drawn as cubic bezier curves leaving the output port to
//! the right and entering the input port from the left. Endpoints are read
//! from the live node rectangles on every call.

use crate::editor::input::{ElementRequest, EventResponse, InputEvent, PointerButton};
use crate::editor::menus::MenuTarget;
use crate::editor::selection::Selection;
use crate::editor::style::EditorStyle;
use crate::graph::{Connection, Graph};
use crate::node_types::ElementId;
use egui::{Pos2, Stroke};

const DRAW_STEPS: usize = 30;
const HIT_TEST_STEPS: usize = 20;

/// Calculate bezier control points for a connection curve.
pub fn bezier_control_points(p1: Pos2, p2: Pos2) -> (Pos2, Pos2) {
    let control_offset = ((p2.x - p1.x).abs() * 0.5).max(50.0);
    let c1 = Pos2::new(p1.x + control_offset, p1.y);
    let c2 = Pos2::new(p2.x - control_offset, p2.y);
    (c1, c2)
}

/// Samples `steps + 1` points along the curve from `p1` to `p2`.
pub fn bezier_points(p1: Pos2, p2: Pos2, steps: usize) -> Vec<Pos2> {
    let (c1, c2) = bezier_control_points(p1, p2);
    (0..=steps)
        .map(|i| {
            let t = i as f32 / steps as f32;
            let it = 1.0 - t;
            (it.powi(3) * p1.to_vec2()
                + 3.0 * it.powi(2) * t * c1.to_vec2()
                + 3.0 * it * t.powi(2) * c2.to_vec2()
                + t.powi(3) * p2.to_vec2())
            .to_pos2()
        })
        .collect()
}

pub fn draw_bezier(painter: &egui::Painter, p1: Pos2, p2: Pos2, stroke: Stroke) {
    painter.add(egui::Shape::line(bezier_points(p1, p2, DRAW_STEPS), stroke));
}

/// Test if a point is within `threshold` of the curve from `p1` to `p2`.
pub fn hit_test_bezier(pos: Pos2, p1: Pos2, p2: Pos2, threshold: f32) -> bool {
    bezier_points(p1, p2, HIT_TEST_STEPS)
        .windows(2)
        .any(|segment| distance_to_segment(pos, segment[0], segment[1]) < threshold)
}

/// Calculate the distance from a point to a line segment.
pub fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    if ab.length_sq() < 1e-6 {
        return p.distance(a);
    }
    let ap = p - a;
    let t = (ap.dot(ab) / ab.length_sq()).clamp(0.0, 1.0);
    let closest = a + ab * t;
    p.distance(closest)
}

impl Connection {
    pub fn hit_test(&self, graph: &Graph, pos: Pos2, tolerance: f32) -> bool {
        self.endpoints(graph)
            .is_some_and(|(from, to)| hit_test_bezier(pos, from, to, tolerance))
    }

    /// Presses within `tolerance` of the curve select the connection; a
    /// secondary press also opens its context menu.
    pub fn process_event(
        &self,
        event: &InputEvent,
        graph: &Graph,
        selection: &mut Selection,
        tolerance: f32,
    ) -> EventResponse {
        let InputEvent::PointerPressed { button, pos, .. } = event else {
            return EventResponse::ignored();
        };
        if !self.hit_test(graph, *pos, tolerance) {
            return EventResponse::ignored();
        }
        match button {
            PointerButton::Primary => {
                selection.claim(ElementId::Connection(self.id));
                EventResponse::consumed()
            }
            PointerButton::Secondary => {
                selection.claim(ElementId::Connection(self.id));
                EventResponse::consumed()
                    .with_request(ElementRequest::OpenMenu(MenuTarget::Connection(self.id)))
            }
            PointerButton::Middle => EventResponse::ignored(),
        }
    }

    pub fn draw(
        &self,
        painter: &egui::Painter,
        graph: &Graph,
        style: &EditorStyle,
        selection: &Selection,
    ) {
        let Some((from, to)) = self.endpoints(graph) else {
            return;
        };
        let selected = selection.is_selected(ElementId::Connection(self.id));
        draw_bezier(painter, from, to, style.connection.pick(selected).stroke);
    }
}
