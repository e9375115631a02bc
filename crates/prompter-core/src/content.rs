//! Passage sources: the built-in sample and files on disk.

use std::path::Path;

use tracing::debug;

use crate::{Error, Result};

/// Passage shown when no file is given
pub const SAMPLE_TEXT: &str = "\
Reading From a Prompter

A prompter moves the script past the eye at a steady pace, so the reader can keep looking at the camera instead of down at a page. The line in the middle of the screen is the one being read. Everything above it has already been spoken; everything below it is coming up next.

Pace is the first thing to get right. Too fast and the reader starts to chase the text, clipping words and running out of breath. Too slow and the delivery drags, with long pauses while the next sentence crawls into view. Most readers settle somewhere between two and three words per second, but the right number depends on the material and on the person.

The second thing is control. A good operator pauses the scroll when the speaker stops for a question, rewinds when a line has to be taken again, and skips ahead when a section is cut at the last minute. Scrolling the script on the side panel while paused moves the prompter to the same place, so the operator can find the next cue without losing the reader.

Finally, layout matters. Short paragraphs, generous line spacing, and a clear marker for the reading line all make it easier to keep one's place. When the window is resized the text reflows, and the prompter picks up from the same fraction of the script rather than jumping back to the top.

Take a breath, look up, and begin.
";

/// Read a passage from a file
pub async fn load_content(path: &Path) -> Result<String> {
    debug!("Loading passage from {}", path.display());
    let text = tokio::fs::read_to_string(path).await?;
    if text.trim().is_empty() {
        return Err(Error::Content(format!("{} is empty", path.display())));
    }
    Ok(text)
}

/// Extract the first run of ASCII digits from a string such as "90s" or "speed: 2"
pub fn extract_number(input: &str) -> Option<u64> {
    let start = input.find(|c: char| c.is_ascii_digit())?;
    let digits: String = input[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_number() {
        assert_eq!(extract_number("90"), Some(90));
        assert_eq!(extract_number("90s"), Some(90));
        assert_eq!(extract_number("speed 2 lps"), Some(2));
        assert_eq!(extract_number("1.5"), Some(1));
        assert_eq!(extract_number("fast"), None);
        assert_eq!(extract_number(""), None);
    }

    #[test]
    fn test_sample_text_has_several_paragraphs() {
        assert!(SAMPLE_TEXT.split("\n\n").count() >= 4);
    }

    #[tokio::test]
    async fn test_load_content_reads_file() {
        let path = std::env::temp_dir().join(format!("prompter-load-{}.txt", std::process::id()));
        tokio::fs::write(&path, "line one\nline two\n").await.unwrap();

        let text = load_content(&path).await.unwrap();
        assert_eq!(text.lines().count(), 2);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_load_content_rejects_empty_file() {
        let path = std::env::temp_dir().join(format!("prompter-empty-{}.txt", std::process::id()));
        tokio::fs::write(&path, "  \n").await.unwrap();

        let err = load_content(&path).await.unwrap_err();
        assert!(matches!(err, Error::Content(_)));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_load_content_missing_file_is_io_error() {
        let path = Path::new("/definitely/not/here/prompter.txt");
        let err = load_content(path).await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
