pub mod app;
pub mod event;
pub mod forward;
pub mod input;
pub mod keymap;
pub mod media;
pub mod theme;
pub mod themes;
pub mod widgets;
pub mod wrap;

pub use app::App;
pub use theme::Theme;
pub use themes::load_theme;
