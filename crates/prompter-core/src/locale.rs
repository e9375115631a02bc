//! Interface language selection and the per-locale string table.

use serde::{Deserialize, Serialize};

/// Supported interface languages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "EN")]
    En,
    #[serde(rename = "简中")]
    ZhHans,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::En, Locale::ZhHans];

    /// Label shown in the locale switcher
    pub fn label(&self) -> &'static str {
        match self {
            Locale::En => "EN",
            Locale::ZhHans => "简中",
        }
    }

    pub fn strings(&self) -> &'static Strings {
        match self {
            Locale::En => &EN,
            Locale::ZhHans => &ZH_HANS,
        }
    }
}

/// UI labels for one locale
#[derive(Debug)]
pub struct Strings {
    pub prompter_title: &'static str,
    pub editor_title: &'static str,
    pub playing: &'static str,
    pub paused: &'static str,
    pub finished: &'static str,
    pub speed: &'static str,
    pub duration: &'static str,
    pub help_hint: &'static str,
}

static EN: Strings = Strings {
    prompter_title: " Prompter ",
    editor_title: " Script ",
    playing: "PLAYING",
    paused: "PAUSED",
    finished: "FINISHED",
    speed: "Speed",
    duration: "Duration",
    help_hint: " q:quit space:play h/l:seek +/-:speed L:lang ",
};

static ZH_HANS: Strings = Strings {
    prompter_title: " 提词器 ",
    editor_title: " 文稿 ",
    playing: "播放中",
    paused: "已暂停",
    finished: "已结束",
    speed: "速度",
    duration: "时长",
    help_hint: " q:退出 空格:播放 h/l:跳转 +/-:速度 L:语言 ",
};

/// Holds the current locale; views read it, the locale switcher sets it
#[derive(Debug, Clone, Default)]
pub struct LocaleProvider {
    current: Locale,
}

impl LocaleProvider {
    pub fn new(locale: Locale) -> Self {
        Self { current: locale }
    }

    pub fn current(&self) -> Locale {
        self.current
    }

    pub fn set(&mut self, locale: Locale) {
        self.current = locale;
    }

    /// Switch to the next supported locale
    pub fn cycle(&mut self) -> Locale {
        let idx = Locale::ALL
            .iter()
            .position(|l| *l == self.current)
            .unwrap_or(0);
        self.current = Locale::ALL[(idx + 1) % Locale::ALL.len()];
        self.current
    }

    pub fn strings(&self) -> &'static Strings {
        self.current.strings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_wraps() {
        let mut provider = LocaleProvider::default();
        assert_eq!(provider.current(), Locale::En);
        assert_eq!(provider.cycle(), Locale::ZhHans);
        assert_eq!(provider.cycle(), Locale::En);
    }

    #[test]
    fn test_strings_follow_locale() {
        let mut provider = LocaleProvider::default();
        assert_eq!(provider.strings().paused, "PAUSED");
        provider.set(Locale::ZhHans);
        assert_eq!(provider.strings().paused, "已暂停");
        assert_eq!(provider.current().label(), "简中");
    }
}
