use std::collections::HashMap;

use prompter_core::media::{ActionHandler, MediaAction, MediaMetadata, MediaSession, PlaybackState};

/// Media session backed by the terminal: metadata becomes the window
/// title, the playback state is shown in the status bar.
#[derive(Default)]
pub struct TerminalMediaSession {
    title: Option<String>,
    pending_title: Option<String>,
    state: PlaybackState,
    handlers: HashMap<MediaAction, ActionHandler>,
}

impl TerminalMediaSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Title not yet written to the terminal
    pub fn take_pending_title(&mut self) -> Option<String> {
        self.pending_title.take()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Run the registered handler for `action`, if any
    pub fn trigger(&mut self, action: MediaAction) -> bool {
        match self.handlers.get_mut(&action) {
            Some(handler) => {
                handler(action);
                true
            }
            None => false,
        }
    }
}

impl std::fmt::Debug for TerminalMediaSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalMediaSession")
            .field("title", &self.title)
            .field("state", &self.state)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

impl MediaSession for TerminalMediaSession {
    fn set_metadata(&mut self, metadata: MediaMetadata) {
        let title = if metadata.artist.is_empty() {
            metadata.title
        } else {
            format!("{} - {}", metadata.title, metadata.artist)
        };
        self.pending_title = Some(title.clone());
        self.title = Some(title);
    }

    fn set_action_handler(&mut self, action: MediaAction, handler: Option<ActionHandler>) {
        match handler {
            Some(handler) => {
                self.handlers.insert(action, handler);
            }
            None => {
                self.handlers.remove(&action);
            }
        }
    }

    fn set_playback_state(&mut self, state: PlaybackState) {
        self.state = state;
    }
}
