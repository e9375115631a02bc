use crossterm::event::KeyEvent;

use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    TogglePlayback,
    ScrollDown,
    ScrollUp,
    ScrollHalfPageDown,
    ScrollHalfPageUp,
    SeekBackward,
    SeekForward,
    SpeedUp,
    SpeedDown,
    JumpToStart,
    JumpToEnd,
    PendingG, // First 'g' press, waiting for second 'g'
    CycleLocale,
    ToggleEditor,
    None,
}

/// Map a key event to an action.
///
/// `pending_g` is true when the previous key was the first half of "gg".
pub fn handle_key_event(key: KeyEvent, keymap: &Keymap, pending_g: bool) -> Action {
    let binding = KeyBinding::from_event(&key);

    if keymap.is_g_prefix(&binding) {
        return if pending_g {
            keymap
                .get_pending_g_action()
                .copied()
                .unwrap_or(Action::None)
        } else {
            Action::PendingG
        };
    }

    keymap.get(&binding).copied().unwrap_or(Action::None)
}
