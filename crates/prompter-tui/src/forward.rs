//! Keyboard and pointer forwarding with explicit register/unregister.
//!
//! Both forwarders only deliver while mounted. The pointer forwarder turns
//! raw mouse events over an area into a press/drag/release gesture and
//! keeps receiving moves outside the area once a gesture has started.

use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use tracing::debug;

use crate::input::{handle_key_event, Action};
use crate::keymap::Keymap;

/// Forwards key-down events to the keymap while mounted
#[derive(Debug, Clone)]
pub struct KeyForwarder {
    keymap: Keymap,
    pending_g: bool,
    mounted: bool,
}

impl KeyForwarder {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            pending_g: false,
            mounted: false,
        }
    }

    pub fn mount(&mut self) {
        self.mounted = true;
    }

    pub fn unmount(&mut self) {
        self.mounted = false;
        self.pending_g = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn forward(&mut self, key: KeyEvent) -> Option<Action> {
        if !self.mounted {
            return None;
        }
        let action = handle_key_event(key, &self.keymap, self.pending_g);
        self.pending_g = action == Action::PendingG;
        Some(action)
    }
}

/// One step of a pointer gesture, with the pointer position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Down(Position),
    Move(Position),
    Up(Position),
    Cancel,
}

/// Turns mouse events over an area into gestures
#[derive(Debug, Clone, Default)]
pub struct PointerForwarder {
    area: Rect,
    moving: bool,
    mounted: bool,
}

impl PointerForwarder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount(&mut self, area: Rect) {
        debug!("Adding pointer handlers");
        self.area = area;
        self.mounted = true;
    }

    /// Remove the handlers. An active gesture is dropped without an `Up`.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.moving = false;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Feed a mouse event. `Some` means the event belongs to the gesture and
    /// must not reach anything else.
    pub fn handle(&mut self, event: &MouseEvent) -> Option<Gesture> {
        if !self.mounted {
            return None;
        }
        let pos = Position::new(event.column, event.row);

        match event.kind {
            MouseEventKind::Down(MouseButton::Left) if self.area.contains(pos) => {
                debug!("pointer down");
                self.moving = true;
                Some(Gesture::Down(pos))
            }
            MouseEventKind::Drag(MouseButton::Left) if self.moving => Some(Gesture::Move(pos)),
            // a move with the primary button released ends the gesture
            MouseEventKind::Moved if self.moving => Some(self.release(pos)),
            MouseEventKind::Up(MouseButton::Left) if self.moving => Some(self.release(pos)),
            MouseEventKind::Down(_) | MouseEventKind::Drag(_) | MouseEventKind::Up(_)
                if self.moving =>
            {
                Some(self.cancel())
            }
            _ => None,
        }
    }

    fn release(&mut self, pos: Position) -> Gesture {
        debug!("pointer up");
        self.moving = false;
        Gesture::Up(pos)
    }

    /// Abort the current gesture, e.g. when the layout changes under it
    pub fn cancel(&mut self) -> Gesture {
        debug!("pointer canceled");
        self.moving = false;
        Gesture::Cancel
    }

    /// Focus left the terminal
    pub fn blur(&mut self) {
        self.moving = false;
    }

    /// Horizontal fraction of the area under `pos`, clamped to [0, 1]
    pub fn fraction_at(&self, pos: Position) -> f64 {
        if self.area.width <= 1 {
            return 0.0;
        }
        let offset = pos.x.saturating_sub(self.area.x) as f64;
        (offset / (self.area.width - 1) as f64).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn forwarder() -> PointerForwarder {
        let mut pointer = PointerForwarder::new();
        pointer.mount(Rect::new(10, 20, 11, 1));
        pointer
    }

    #[test]
    fn test_key_forwarder_only_while_mounted() {
        let mut keys = KeyForwarder::new(Keymap::default());
        let space = KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE);
        assert_eq!(keys.forward(space), None);

        keys.mount();
        assert_eq!(keys.forward(space), Some(Action::TogglePlayback));

        keys.unmount();
        assert_eq!(keys.forward(space), None);
    }

    #[test]
    fn test_key_forwarder_tracks_gg() {
        let mut keys = KeyForwarder::new(Keymap::default());
        keys.mount();
        let g = KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE);
        let j = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);

        assert_eq!(keys.forward(g), Some(Action::PendingG));
        assert_eq!(keys.forward(g), Some(Action::JumpToStart));
        // an interrupted sequence starts over
        assert_eq!(keys.forward(g), Some(Action::PendingG));
        assert_eq!(keys.forward(j), Some(Action::ScrollDown));
        assert_eq!(keys.forward(g), Some(Action::PendingG));
    }

    #[test]
    fn test_press_outside_area_ignored() {
        let mut pointer = forwarder();
        assert_eq!(
            pointer.handle(&mouse(MouseEventKind::Down(MouseButton::Left), 5, 20)),
            None
        );
        assert!(!pointer.is_moving());
    }

    #[test]
    fn test_drag_captured_outside_area() {
        let mut pointer = forwarder();
        let down = pointer.handle(&mouse(MouseEventKind::Down(MouseButton::Left), 12, 20));
        assert_eq!(down, Some(Gesture::Down(Position::new(12, 20))));
        assert!(pointer.is_moving());

        let drag = pointer.handle(&mouse(MouseEventKind::Drag(MouseButton::Left), 40, 3));
        assert_eq!(drag, Some(Gesture::Move(Position::new(40, 3))));

        let up = pointer.handle(&mouse(MouseEventKind::Up(MouseButton::Left), 40, 3));
        assert_eq!(up, Some(Gesture::Up(Position::new(40, 3))));
        assert!(!pointer.is_moving());
    }

    #[test]
    fn test_move_without_button_ends_gesture() {
        let mut pointer = forwarder();
        pointer.handle(&mouse(MouseEventKind::Down(MouseButton::Left), 12, 20));
        let moved = pointer.handle(&mouse(MouseEventKind::Moved, 15, 20));
        assert_eq!(moved, Some(Gesture::Up(Position::new(15, 20))));
        assert!(!pointer.is_moving());

        // later moves are not ours
        assert_eq!(pointer.handle(&mouse(MouseEventKind::Moved, 16, 20)), None);
    }

    #[test]
    fn test_other_button_cancels() {
        let mut pointer = forwarder();
        pointer.handle(&mouse(MouseEventKind::Down(MouseButton::Left), 12, 20));
        let cancel = pointer.handle(&mouse(MouseEventKind::Down(MouseButton::Right), 12, 20));
        assert_eq!(cancel, Some(Gesture::Cancel));
        assert!(!pointer.is_moving());
    }

    #[test]
    fn test_blur_clears_moving() {
        let mut pointer = forwarder();
        pointer.handle(&mouse(MouseEventKind::Down(MouseButton::Left), 12, 20));
        pointer.blur();
        assert!(!pointer.is_moving());
        assert_eq!(
            pointer.handle(&mouse(MouseEventKind::Drag(MouseButton::Left), 13, 20)),
            None
        );
    }

    #[test]
    fn test_unmounted_forwards_nothing() {
        let mut pointer = forwarder();
        pointer.unmount();
        assert_eq!(
            pointer.handle(&mouse(MouseEventKind::Down(MouseButton::Left), 12, 20)),
            None
        );
    }

    #[test]
    fn test_fraction_at() {
        let pointer = forwarder();
        assert_eq!(pointer.fraction_at(Position::new(10, 20)), 0.0);
        assert_eq!(pointer.fraction_at(Position::new(15, 20)), 0.5);
        assert_eq!(pointer.fraction_at(Position::new(20, 20)), 1.0);
        assert_eq!(pointer.fraction_at(Position::new(0, 20)), 0.0);
        assert_eq!(pointer.fraction_at(Position::new(99, 20)), 1.0);
    }
}
