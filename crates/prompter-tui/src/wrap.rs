//! Word wrapping by terminal display width.
//!
//! Wrapped line counts are the scroll heights fed to the engine, so the
//! wrapping here must match what the widgets draw.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wrap `text` to `width` columns. Paragraph breaks and blank lines are kept;
/// words wider than a line are split by character.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    let width = width.max(1) as usize;
    let mut out = Vec::new();

    for paragraph in text.lines() {
        if paragraph.trim().is_empty() {
            out.push(String::new());
            continue;
        }
        wrap_paragraph(paragraph, width, &mut out);
    }

    out
}

fn wrap_paragraph(paragraph: &str, width: usize, out: &mut Vec<String>) {
    let mut line = String::new();
    let mut line_width = 0usize;

    for word in paragraph.split_whitespace() {
        let word_width = word.width();

        if word_width > width {
            // flush, then hard-break the long word
            if !line.is_empty() {
                out.push(std::mem::take(&mut line));
                line_width = 0;
            }
            for c in word.chars() {
                let cw = c.width().unwrap_or(0);
                if line_width + cw > width && !line.is_empty() {
                    out.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(c);
                line_width += cw;
            }
            continue;
        }

        let sep = usize::from(!line.is_empty());
        if line_width + sep + word_width > width {
            out.push(std::mem::take(&mut line));
            line_width = 0;
        } else if sep == 1 {
            line.push(' ');
            line_width += 1;
        }
        line.push_str(word);
        line_width += word_width;
    }

    if !line.is_empty() {
        out.push(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_on_word_boundaries() {
        let lines = wrap_text("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_keeps_blank_lines() {
        let lines = wrap_text("one\n\ntwo", 10);
        assert_eq!(lines, vec!["one", "", "two"]);
    }

    #[test]
    fn test_breaks_long_words() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wide_characters_count_double() {
        // each CJK character is two columns wide
        let lines = wrap_text("提词器提词器", 6);
        assert_eq!(lines, vec!["提词器", "提词器"]);
    }

    #[test]
    fn test_zero_width_does_not_loop() {
        let lines = wrap_text("ab", 0);
        assert_eq!(lines, vec!["a", "b"]);
    }
}
