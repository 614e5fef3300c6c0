use egui::{Color32, FontId, Pos2, Rect, Stroke, Vec2};
use story_graph::editor::input::{HELP_TEXT, InputEvent, PointerButton};
use story_graph::{Editor, EditorConfig};

const HELP_SIZE: Vec2 = Vec2::new(220.0, 80.0);

fn main() -> eframe::Result<()> {
    env_logger::init();
    let config = EditorConfig::load();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Story & Dialog Editor",
        native_options,
        Box::new(|_cc| Ok(Box::new(StoryGraphApp::new(config)))),
    )
}

struct StoryGraphApp {
    editor: Editor,
    held_button: Option<PointerButton>,
    last_pointer: Option<Pos2>,
    /// Where the context menu was drawn last frame; pointer events inside it
    /// belong to the menu, not the canvas.
    menu_rect: Option<Rect>,
}

impl StoryGraphApp {
    fn new(config: EditorConfig) -> Self {
        Self {
            editor: Editor::with_config(config),
            held_button: None,
            last_pointer: None,
            menu_rect: None,
        }
    }

    /// Converts this frame's raw egui events into editor input events.
    fn collect_events(&mut self, ctx: &egui::Context) -> Vec<InputEvent> {
        let (events, time) = ctx.input(|i| (i.events.clone(), i.time));
        let mut input = Vec::new();
        for event in events {
            match event {
                egui::Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    ..
                } => {
                    let Some(button) = PointerButton::from_egui(button) else {
                        continue;
                    };
                    self.last_pointer = Some(pos);
                    if pressed {
                        if self.menu_rect.is_some_and(|rect| rect.contains(pos)) {
                            continue;
                        }
                        self.held_button = Some(button);
                        input.push(InputEvent::PointerPressed { button, pos, time });
                    } else {
                        if self.held_button == Some(button) {
                            self.held_button = None;
                        }
                        input.push(InputEvent::PointerReleased { button, pos });
                    }
                }
                egui::Event::PointerMoved(pos) => {
                    let last = self.last_pointer.replace(pos);
                    if let (Some(button), Some(last)) = (self.held_button, last) {
                        input.push(InputEvent::PointerDragged {
                            button,
                            pos,
                            delta: pos - last,
                        });
                    }
                }
                egui::Event::Key {
                    key,
                    pressed: true,
                    repeat: false,
                    modifiers,
                    ..
                } => input.push(InputEvent::KeyDown { key, modifiers }),
                egui::Event::Text(text) => input.push(InputEvent::Text(text)),
                _ => {}
            }
        }
        input
    }

    fn draw_grid(&self, painter: &egui::Painter, rect: Rect, spacing: f32, color: Color32) {
        let offset = self.editor.grid().offset;
        let stroke = Stroke::new(1.0, color);
        let mut x = rect.left() + offset.x.rem_euclid(spacing);
        while x <= rect.right() {
            painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
            x += spacing;
        }
        let mut y = rect.top() + offset.y.rem_euclid(spacing);
        while y <= rect.bottom() {
            painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
            y += spacing;
        }
    }

    fn draw_help(&self, painter: &egui::Painter, rect: Rect) {
        let help_rect = Rect::from_min_size(rect.max - HELP_SIZE - Vec2::splat(5.0), HELP_SIZE);
        painter.rect_filled(help_rect, 4.0, Color32::from_black_alpha(200));
        painter.text(
            help_rect.min + Vec2::splat(6.0),
            egui::Align2::LEFT_TOP,
            HELP_TEXT,
            FontId::proportional(12.0),
            Color32::from_gray(220),
        );
    }

    fn show_context_menu(&mut self, ctx: &egui::Context) -> bool {
        let Some(menu) = self.editor.context_menu().copied() else {
            self.menu_rect = None;
            return false;
        };
        let mut chosen = None;
        let response = egui::Area::new(egui::Id::new("story_graph_context_menu"))
            .fixed_pos(menu.position)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    for (label, action) in menu.items() {
                        if ui.button(label).clicked() {
                            chosen = Some(action);
                        }
                    }
                });
            });
        self.menu_rect = Some(response.response.rect);
        match chosen {
            Some(action) => {
                self.menu_rect = None;
                self.editor.apply_menu_action(action)
            }
            None => false,
        }
    }
}

impl eframe::App for StoryGraphApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut changed = false;
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                self.editor.set_viewport(rect);

                for event in self.collect_events(ctx) {
                    match self.editor.process_event(&event) {
                        Ok(outcome) => changed |= outcome.changed,
                        Err(e) => {
                            log::error!("editor invariant violated: {}", e);
                            changed = true;
                        }
                    }
                }

                let painter = ui.painter_at(rect);
                painter.rect_filled(rect, 0.0, Color32::from_gray(77));
                let spacing = self.editor.config().grid_spacing;
                self.draw_grid(&painter, rect, spacing, Color32::from_gray(90));
                self.draw_grid(&painter, rect, spacing * 20.0, Color32::from_gray(110));
                self.editor.draw_all(&painter);
                if self.editor.show_help() {
                    self.draw_help(&painter, rect);
                }
            });
        changed |= self.show_context_menu(ctx);
        if changed {
            ctx.request_repaint();
        }
    }
}
