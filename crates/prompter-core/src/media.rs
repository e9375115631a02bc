//! Platform media-session registration: metadata, transport handlers and
//! the two-state playback indicator.
//!
//! Mounting runs two effects in order. The first publishes metadata and a
//! handler for each transport action; the second clears every handler
//! again. The second effect undoes the first, and that order is kept as is.

use tracing::{debug, info};

/// Transport controls a media session can expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaAction {
    Play,
    Pause,
    SeekBackward,
    SeekForward,
    PreviousTrack,
    NextTrack,
}

impl MediaAction {
    pub const ALL: [MediaAction; 6] = [
        MediaAction::Play,
        MediaAction::Pause,
        MediaAction::SeekBackward,
        MediaAction::SeekForward,
        MediaAction::PreviousTrack,
        MediaAction::NextTrack,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MediaAction::Play => "play",
            MediaAction::Pause => "pause",
            MediaAction::SeekBackward => "seekbackward",
            MediaAction::SeekForward => "seekforward",
            MediaAction::PreviousTrack => "previoustrack",
            MediaAction::NextTrack => "nexttrack",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    None,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn from_playing(playing: bool) -> Self {
        if playing {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
}

impl MediaMetadata {
    /// Metadata for a passage: its first non-empty line as the title
    pub fn for_passage(text: &str) -> Self {
        let title = text
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .unwrap_or("Untitled")
            .to_string();
        Self {
            title,
            artist: "Prompter".to_string(),
            album: String::new(),
        }
    }
}

pub type ActionHandler = Box<dyn FnMut(MediaAction)>;

/// Platform service holding the session state
pub trait MediaSession {
    fn is_supported(&self) -> bool {
        true
    }
    fn set_metadata(&mut self, metadata: MediaMetadata);
    fn set_action_handler(&mut self, action: MediaAction, handler: Option<ActionHandler>);
    fn set_playback_state(&mut self, state: PlaybackState);
}

/// Explicit acquire/release wrapper around a platform session
#[derive(Debug)]
pub struct MediaSessionHandle<S: MediaSession> {
    session: S,
    mounted: bool,
    reflected: Option<PlaybackState>,
}

impl<S: MediaSession> MediaSessionHandle<S> {
    pub fn new(session: S) -> Self {
        Self {
            session,
            mounted: false,
            reflected: None,
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Acquire the session. Runs the register effect, then the clear effect.
    pub fn mount(&mut self, metadata: MediaMetadata) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.register(metadata);
        self.clear_handlers();
    }

    fn register(&mut self, metadata: MediaMetadata) {
        self.session.set_metadata(metadata);
        if !self.session.is_supported() {
            return;
        }
        debug!("Media session supported, adding handlers");
        for action in MediaAction::ALL {
            let handler: ActionHandler = Box::new(|action: MediaAction| {
                info!("media action: {} triggered", action.name());
            });
            self.session.set_action_handler(action, Some(handler));
        }
    }

    fn clear_handlers(&mut self) {
        for action in MediaAction::ALL {
            self.session.set_action_handler(action, None);
        }
    }

    /// Mirror the playback flag onto the session's indicator when it changes
    pub fn reflect_playback(&mut self, playing: bool) {
        let state = PlaybackState::from_playing(playing);
        if self.reflected == Some(state) {
            return;
        }
        self.reflected = Some(state);
        self.session.set_playback_state(state);
    }

    /// Release the session. Idempotent.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.clear_handlers();
        self.session.set_playback_state(PlaybackState::None);
        self.reflected = None;
    }
}

impl<S: MediaSession> Drop for MediaSessionHandle<S> {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Metadata(String),
        Handler(MediaAction, bool),
        State(PlaybackState),
    }

    #[derive(Default)]
    struct Recorder {
        calls: Rc<RefCell<Vec<Call>>>,
        handlers: HashMap<MediaAction, ActionHandler>,
        supported: bool,
    }

    impl MediaSession for Recorder {
        fn is_supported(&self) -> bool {
            self.supported
        }
        fn set_metadata(&mut self, metadata: MediaMetadata) {
            self.calls.borrow_mut().push(Call::Metadata(metadata.title));
        }
        fn set_action_handler(&mut self, action: MediaAction, handler: Option<ActionHandler>) {
            self.calls
                .borrow_mut()
                .push(Call::Handler(action, handler.is_some()));
            match handler {
                Some(h) => {
                    self.handlers.insert(action, h);
                }
                None => {
                    self.handlers.remove(&action);
                }
            }
        }
        fn set_playback_state(&mut self, state: PlaybackState) {
            self.calls.borrow_mut().push(Call::State(state));
        }
    }

    fn recorder() -> (Rc<RefCell<Vec<Call>>>, Recorder) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let recorder = Recorder {
            calls: Rc::clone(&calls),
            handlers: HashMap::new(),
            supported: true,
        };
        (calls, recorder)
    }

    #[test]
    fn test_mount_registers_then_clears() {
        let (calls, session) = recorder();
        let mut handle = MediaSessionHandle::new(session);
        handle.mount(MediaMetadata::for_passage("\n  Title line\nbody"));

        let calls = calls.borrow();
        assert_eq!(calls[0], Call::Metadata("Title line".to_string()));
        for (i, action) in MediaAction::ALL.iter().enumerate() {
            assert_eq!(calls[1 + i], Call::Handler(*action, true));
            assert_eq!(calls[7 + i], Call::Handler(*action, false));
        }
        assert_eq!(calls.len(), 13);
        assert!(handle.session().handlers.is_empty());
    }

    #[test]
    fn test_unsupported_session_only_gets_metadata_then_clear() {
        let (calls, mut session) = recorder();
        session.supported = false;
        let mut handle = MediaSessionHandle::new(session);
        handle.mount(MediaMetadata::default());

        let calls = calls.borrow();
        assert!(matches!(calls[0], Call::Metadata(_)));
        assert!(calls[1..].iter().all(|c| matches!(c, Call::Handler(_, false))));
    }

    #[test]
    fn test_reflect_playback_only_on_change() {
        let (calls, session) = recorder();
        let mut handle = MediaSessionHandle::new(session);
        handle.reflect_playback(true);
        handle.reflect_playback(true);
        handle.reflect_playback(false);

        let states: Vec<_> = calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::State(s) => Some(*s),
                _ => None,
            })
            .collect();
        assert_eq!(states, vec![PlaybackState::Playing, PlaybackState::Paused]);
    }

    #[test]
    fn test_unmount_releases_once() {
        let (calls, session) = recorder();
        let mut handle = MediaSessionHandle::new(session);
        handle.mount(MediaMetadata::default());
        let before = calls.borrow().len();

        handle.unmount();
        handle.unmount();
        assert!(!handle.is_mounted());
        assert_eq!(calls.borrow().len(), before + 7);
        assert_eq!(
            calls.borrow().last(),
            Some(&Call::State(PlaybackState::None))
        );
    }
}
