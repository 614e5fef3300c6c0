//! Input events consumed by the editor, and the small pieces of state
//! used to interpret them.

use crate::editor::menus::MenuTarget;
use crate::node_types::{PortRef, SelectionKind};
use egui::{Key, Modifiers, Pos2, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

impl PointerButton {
    pub fn from_egui(button: egui::PointerButton) -> Option<Self> {
        match button {
            egui::PointerButton::Primary => Some(PointerButton::Primary),
            egui::PointerButton::Secondary => Some(PointerButton::Secondary),
            egui::PointerButton::Middle => Some(PointerButton::Middle),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    /// `time` is a monotonic timestamp in seconds, used for double-clicks.
    PointerPressed {
        button: PointerButton,
        pos: Pos2,
        time: f64,
    },
    PointerDragged {
        button: PointerButton,
        pos: Pos2,
        delta: Vec2,
    },
    PointerReleased {
        button: PointerButton,
        pos: Pos2,
    },
    KeyDown {
        key: Key,
        modifiers: Modifiers,
    },
    Text(String),
}

impl InputEvent {
    pub fn is_press(&self) -> bool {
        matches!(self, InputEvent::PointerPressed { .. })
    }

    pub fn pointer_pos(&self) -> Option<Pos2> {
        match self {
            InputEvent::PointerPressed { pos, .. }
            | InputEvent::PointerDragged { pos, .. }
            | InputEvent::PointerReleased { pos, .. } => Some(*pos),
            InputEvent::KeyDown { .. } | InputEvent::Text(_) => None,
        }
    }
}

/// Something an element asks the editor to do on its behalf.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ElementRequest {
    BeginConnection(PortRef),
    OpenMenu(MenuTarget),
}

/// What an element did with an event it was offered.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EventResponse {
    /// The element claimed the event; nothing behind it sees it.
    pub consumed: bool,
    /// Something visible changed and a redraw is needed.
    pub changed: bool,
    pub request: Option<ElementRequest>,
}

impl EventResponse {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn consumed() -> Self {
        Self {
            consumed: true,
            changed: true,
            request: None,
        }
    }

    pub fn with_request(mut self, request: ElementRequest) -> Self {
        self.request = Some(request);
        self
    }
}

/// Detects two presses on the same kind of target within a time threshold.
///
/// After reporting a double-click the tracker forgets the pair, so a third
/// press starts a new sequence instead of forming a second double-click.
#[derive(Clone, Debug)]
pub struct ClickTracker {
    threshold: f64,
    last: Option<(f64, SelectionKind)>,
}

impl ClickTracker {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            last: None,
        }
    }

    pub fn is_double_click(&mut self, time: f64, target: SelectionKind) -> bool {
        match self.last {
            Some((last_time, last_target))
                if last_target == target && time - last_time <= self.threshold =>
            {
                self.last = None;
                true
            }
            _ => {
                self.last = Some((time, target));
                false
            }
        }
    }
}

/// Keyboard commands handled by the editor surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shortcut {
    Center,
    Delete,
    ToggleHelp,
    DebugDump,
    Undo,
    Redo,
}

impl Shortcut {
    pub fn from_key(key: Key, modifiers: Modifiers) -> Option<Self> {
        if modifiers.command {
            return match key {
                Key::Z if modifiers.shift => Some(Shortcut::Redo),
                Key::Z => Some(Shortcut::Undo),
                Key::Y => Some(Shortcut::Redo),
                _ => None,
            };
        }
        match key {
            Key::C => Some(Shortcut::Center),
            Key::D => Some(Shortcut::Delete),
            Key::H => Some(Shortcut::ToggleHelp),
            Key::Q => Some(Shortcut::DebugDump),
            _ => None,
        }
    }
}

pub const HELP_TEXT: &str = "H: Hide/Show Help Menu\n\
C: Center on all Nodes\n\
D: Delete the selected Node\n\
Ctrl+Z / Ctrl+Y: Undo / Redo\n";
