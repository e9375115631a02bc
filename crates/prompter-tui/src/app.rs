use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crossterm::event::{KeyEvent, MouseEvent, MouseEventKind};
use prompter_core::config::TimingMode;
use prompter_core::engine::{
    BoxMetrics, EngineOptions, FinishCallback, ProgressCallback, ProgressEngine, ProgressSample,
    ScrollView,
};
use prompter_core::media::{MediaMetadata, MediaSessionHandle};
use prompter_core::{AppConfig, Clock, LocaleProvider};
use ratatui::layout::{Constraint, Direction, Layout, Margin, Position, Rect};
use tracing::{debug, info};

use crate::forward::{Gesture, KeyForwarder, PointerForwarder};
use crate::input::Action;
use crate::keymap::Keymap;
use crate::media::TerminalMediaSession;
use crate::theme::Theme;
use crate::themes::load_theme;
use crate::wrap::wrap_text;

/// Rows scrolled per mouse wheel notch
const WHEEL_STEP: f64 = 3.0;
const MIN_LINES_PER_SECOND: f64 = 0.25;
const MIN_DURATION_MS: u64 = 1_000;

/// The script editor pane: wrapped text and a row offset
#[derive(Debug, Clone, Default)]
pub struct EditorView {
    text: String,
    lines: Vec<String>,
    width: u16,
    height: u16,
    top: u16,
}

impl EditorView {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.rewrap();
    }

    /// Resize the viewport, rewrapping when the width changes
    pub fn set_viewport(&mut self, width: u16, height: u16) {
        let rewrap = width != self.width || self.lines.is_empty();
        self.width = width;
        self.height = height;
        if rewrap {
            self.rewrap();
        }
        self.top = self.top.min(self.max_top());
    }

    fn rewrap(&mut self) {
        self.lines = wrap_text(&self.text, self.width);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn top(&self) -> u16 {
        self.top
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn max_top(&self) -> u16 {
        let max = self.lines.len().saturating_sub(self.height as usize);
        u16::try_from(max).unwrap_or(u16::MAX)
    }
}

impl ScrollView for EditorView {
    fn scroll_top(&self) -> f64 {
        self.top as f64
    }

    fn client_height(&self) -> f64 {
        self.height as f64
    }

    fn scroll_height(&self) -> f64 {
        self.lines.len() as f64
    }

    fn scroll_to(&mut self, top: f64) {
        let max = self.max_top() as f64;
        self.top = top.round().clamp(0.0, max) as u16;
    }
}

/// Screen areas for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub prompter: Rect,
    pub editor: Option<Rect>,
    pub progress: Rect,
    pub status: Rect,
}

impl AppLayout {
    pub fn compute(area: Rect, show_editor: bool) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),
                Constraint::Length(1), // progress bar
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let (prompter, editor) = if show_editor {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
                .split(rows[0]);
            (columns[0], Some(columns[1]))
        } else {
            (rows[0], None)
        };

        Self {
            prompter,
            editor,
            progress: rows[1],
            status: rows[2],
        }
    }

    /// Text area of the prompter pane (inside the border)
    pub fn prompter_text(&self) -> Rect {
        self.prompter.inner(Margin::new(1, 1))
    }

    /// Text area of the editor pane: inside the border, left of the scrollbar
    pub fn editor_text(&self) -> Option<Rect> {
        self.editor.map(|area| {
            let inner = area.inner(Margin::new(1, 1));
            Rect {
                width: inner.width.saturating_sub(1),
                ..inner
            }
        })
    }
}

/// Application state
pub struct App {
    pub config: AppConfig,
    pub theme: Theme,
    pub locale: LocaleProvider,
    pub engine: ProgressEngine<EditorView>,
    pub keys: KeyForwarder,
    pub pointer: PointerForwarder,
    pub media: MediaSessionHandle<TerminalMediaSession>,
    /// The passage being read
    pub text: String,
    /// Passage wrapped to the prompter width
    pub prompter_lines: Vec<String>,
    pub layout: Option<AppLayout>,
    pub show_editor: bool,
    /// Editor view while its pane is hidden
    parked_editor: Option<EditorView>,
    finished: Rc<Cell<bool>>,
    last_sample: Rc<Cell<Option<ProgressSample>>>,
    pub status_message: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig, text: String, clock: Rc<dyn Clock>) -> Self {
        let theme = load_theme(&config.ui.theme);
        let locale = LocaleProvider::new(config.general.locale);

        let mut engine = ProgressEngine::new(EngineOptions::from_config(&config.playback), clock);

        let finished = Rc::new(Cell::new(false));
        let signal = Rc::clone(&finished);
        let on_finish: FinishCallback = Rc::new(move || signal.set(true));
        engine.set_on_finish(Some(on_finish));

        let last_sample = Rc::new(Cell::new(None));
        let sink = Rc::clone(&last_sample);
        let on_progress: ProgressCallback = Box::new(move |sample: ProgressSample| {
            sink.set(Some(sample));
        });
        engine.set_on_progress(Some(on_progress));

        let show_editor = config.ui.show_editor;
        let editor = EditorView::new(&text);
        let parked_editor = if show_editor {
            engine.attach_view(editor);
            None
        } else {
            Some(editor)
        };
        engine.watch(text.as_str());

        let mut keys = KeyForwarder::new(Keymap::from_config(&config.keymap));
        keys.mount();

        let mut media = MediaSessionHandle::new(TerminalMediaSession::new());
        media.mount(MediaMetadata::for_passage(&text));
        media.reflect_playback(false);

        Self {
            config,
            theme,
            locale,
            engine,
            keys,
            pointer: PointerForwarder::new(),
            media,
            text,
            prompter_lines: Vec::new(),
            layout: None,
            show_editor,
            parked_editor,
            finished,
            last_sample,
            status_message: None,
            should_quit: false,
        }
    }

    // ---- layout ----------------------------------------------------------

    /// Lay out the screen. Size changes reach the engine as resize
    /// notifications; the first layout mounts the prompter.
    pub fn layout(&mut self, area: Rect) -> AppLayout {
        let layout = AppLayout::compute(area, self.show_editor);
        if self.layout != Some(layout) {
            if self.pointer.is_moving() {
                self.pointer.cancel();
            }
            self.apply_layout(&layout);
            self.layout = Some(layout);
        }
        layout
    }

    fn apply_layout(&mut self, layout: &AppLayout) {
        let prompter = layout.prompter_text();
        self.prompter_lines = wrap_text(&self.text, prompter.width);
        let metrics = BoxMetrics::new(prompter.height as f64, self.prompter_lines.len() as f64);

        if self.engine.is_mounted() {
            self.engine.resize(metrics);
        } else {
            self.engine.mount(metrics);
            if self.config.playback.autoplay {
                self.set_playing(true);
            }
        }

        if let Some(editor) = layout.editor_text() {
            if let Some(view) = self.engine.view_mut() {
                view.set_viewport(editor.width, editor.height);
            }
            self.engine.refresh_view();
        }

        if self.pointer.is_mounted() {
            self.pointer.set_area(layout.progress);
        } else {
            self.pointer.mount(layout.progress);
        }
    }

    /// Replace the passage
    pub fn set_text(&mut self, text: String) {
        self.text = text;
        if let Some(view) = self.engine.view_mut() {
            view.set_text(&self.text);
        }
        if let Some(view) = self.parked_editor.as_mut() {
            view.set_text(&self.text);
        }
        if let Some(layout) = self.layout {
            let width = layout.prompter_text().width;
            self.prompter_lines = wrap_text(&self.text, width);
        }
        self.engine.watch(self.text.as_str());
        if let Some(layout) = self.layout {
            let height = layout.prompter_text().height;
            self.engine.resize(BoxMetrics::new(height as f64, self.prompter_lines.len() as f64));
        }
        self.engine.refresh_view();
    }

    // ---- input -----------------------------------------------------------

    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(action) = self.keys.forward(key) {
            self.handle_action(action);
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::TogglePlayback => self.toggle_playback(),
            Action::ScrollDown => self.engine.user_scroll_by(1.0),
            Action::ScrollUp => self.engine.user_scroll_by(-1.0),
            Action::ScrollHalfPageDown => self.engine.user_scroll_by(self.half_page()),
            Action::ScrollHalfPageUp => self.engine.user_scroll_by(-self.half_page()),
            Action::SeekBackward => self.engine.seek_by(-self.seek_step()),
            Action::SeekForward => self.engine.seek_by(self.seek_step()),
            Action::SpeedUp => self.adjust_speed(1),
            Action::SpeedDown => self.adjust_speed(-1),
            Action::JumpToStart => self.engine.seek_progress(0.0),
            Action::JumpToEnd => self.engine.seek_progress(1.0),
            Action::CycleLocale => {
                let locale = self.locale.cycle();
                debug!(?locale, "Locale changed");
                self.set_status(locale.label());
            }
            Action::ToggleEditor => self.toggle_editor(),
            Action::PendingG | Action::None => {}
        }
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if let Some(gesture) = self.pointer.handle(&event) {
            match gesture {
                Gesture::Down(pos) | Gesture::Move(pos) | Gesture::Up(pos) => {
                    let progress = self.pointer.fraction_at(pos);
                    self.engine.seek_progress(progress);
                }
                Gesture::Cancel => {}
            }
            return;
        }

        let pos = Position::new(event.column, event.row);
        let over_editor = self
            .layout
            .and_then(|l| l.editor)
            .map(|area| area.contains(pos))
            .unwrap_or(false);
        if !over_editor {
            return;
        }
        match event.kind {
            MouseEventKind::ScrollDown => self.engine.user_scroll_by(WHEEL_STEP),
            MouseEventKind::ScrollUp => self.engine.user_scroll_by(-WHEEL_STEP),
            _ => {}
        }
    }

    pub fn focus_lost(&mut self) {
        self.pointer.blur();
    }

    fn half_page(&self) -> f64 {
        let height = self.engine.view().map(EditorView::height).unwrap_or(0);
        (height / 2).max(1) as f64
    }

    fn seek_step(&self) -> i64 {
        i64::try_from(self.config.playback.seek_step_ms).unwrap_or(i64::MAX)
    }

    // ---- playback --------------------------------------------------------

    pub fn is_playing(&self) -> bool {
        self.engine.is_playing()
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.engine.set_playing(playing);
        self.media.reflect_playback(playing);
    }

    pub fn toggle_playback(&mut self) {
        let playing = !self.is_playing();
        self.set_playing(playing);
        self.clear_status();
    }

    /// Speed up (`steps > 0`) or slow down the prompter
    pub fn adjust_speed(&mut self, steps: i32) {
        if steps == 0 {
            return;
        }
        let timing = match self.engine.timing() {
            TimingMode::Speed { lines_per_second } => {
                let lps = lines_per_second + self.config.playback.speed_step * steps as f64;
                TimingMode::Speed {
                    lines_per_second: lps.max(MIN_LINES_PER_SECOND),
                }
            }
            TimingMode::Fixed { duration_ms } => {
                let factor: f64 = if steps > 0 { 0.9 } else { 1.1 };
                let scaled = (duration_ms as f64 * factor.powi(steps.abs())).round() as u64;
                TimingMode::Fixed {
                    duration_ms: scaled.max(MIN_DURATION_MS),
                }
            }
        };
        self.engine.set_timing(timing);
    }

    /// Deliver due engine timers; pauses when the passage finished
    pub fn tick(&mut self) {
        let outcome = self.engine.poll();
        if outcome.ticks > 0 {
            debug!(ticks = outcome.ticks, progress = self.engine.progress(), "Sampled progress");
        }
        // a zero-length run reports its finish once, possibly while paused
        let finished = self.finished.replace(false) || self.engine.is_finished();
        if finished && self.is_playing() {
            info!("Passage finished, pausing");
            self.set_playing(false);
            self.set_status(self.locale.strings().finished);
        }
    }

    /// Time until the engine next needs `tick`
    pub fn next_deadline(&self) -> Option<Duration> {
        self.engine.next_deadline()
    }

    pub fn toggle_editor(&mut self) {
        self.show_editor = !self.show_editor;
        if self.show_editor {
            if let Some(view) = self.parked_editor.take() {
                self.engine.attach_view(view);
            }
        } else {
            self.parked_editor = self.engine.detach_view();
        }
        // force a relayout on the next frame
        self.layout = None;
    }

    // ---- readouts --------------------------------------------------------

    /// Last progress sample delivered by the engine
    pub fn last_sample(&self) -> Option<ProgressSample> {
        self.last_sample.get()
    }

    /// Elapsed and total run time
    pub fn times(&self) -> (Duration, Duration) {
        let total = self.engine.duration().unwrap_or_default();
        let elapsed = self.engine.current_time().unwrap_or_default();
        (elapsed, total)
    }

    /// Row offset of the passage in the prompter pane
    pub fn prompter_offset(&self) -> i64 {
        let fallback = self
            .layout
            .map(|l| (l.prompter_text().height / 2) as f64)
            .unwrap_or(0.0);
        self.engine.translate_y().unwrap_or(fallback).round() as i64
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Release everything acquired while running
    pub fn shutdown(&mut self) {
        self.engine.unmount();
        self.pointer.unmount();
        self.keys.unmount();
        self.media.unmount();
    }
}
