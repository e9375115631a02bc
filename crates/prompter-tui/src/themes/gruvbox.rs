//! Gruvbox Material themes

use ratatui::style::Color;
use crate::theme::Theme;

pub fn dark() -> Theme {
    Theme::default()
}

pub fn light() -> Theme {
    Theme {
        bg0: Color::Rgb(0xfb, 0xf1, 0xc7),
        bg1: Color::Rgb(0xf4, 0xe8, 0xbe),
        bg2: Color::Rgb(0xeb, 0xdb, 0xb2),
        fg0: Color::Rgb(0x65, 0x47, 0x35),
        fg1: Color::Rgb(0x4f, 0x38, 0x29),
        grey0: Color::Rgb(0xa8, 0x99, 0x84),
        grey1: Color::Rgb(0x92, 0x83, 0x74),
        grey2: Color::Rgb(0x7c, 0x6f, 0x64),
        accent: Color::Rgb(0x4c, 0x7a, 0x5d),
        reading_line: Color::Rgb(0xe6, 0xd5, 0xae),
        playing: Color::Rgb(0x6c, 0x78, 0x2e),
        paused: Color::Rgb(0xb4, 0x71, 0x09),
        finished: Color::Rgb(0x45, 0x70, 0x7a),
    }
}
