use std::path::Path;

use crate::error::{ThumbnailError, ThumbnailResult};

/// Sentences read from a text file, one per line, in file order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SentenceBank {
    sentences: Vec<String>,
}

impl SentenceBank {
    /// Read `path` line by line. `\n`, `\r\n` and a lone `\r` all end a line. Trailing
    /// whitespace is stripped and every literal `\n` escape becomes a real line break.
    pub fn load(path: impl AsRef<Path>) -> ThumbnailResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ThumbnailError::input(format!("read sentence file '{}': {e}", path.display()))
        })?;

        let sentences: Vec<String> = split_lines(&contents).map(unescape_line).collect();

        tracing::debug!(path = %path.display(), sentences = sentences.len(), "loaded sentences");
        Ok(Self { sentences })
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.sentences.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.sentences.iter()
    }
}

impl<'a> IntoIterator for &'a SentenceBank {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.sentences.iter()
    }
}

impl FromIterator<String> for SentenceBank {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            sentences: iter.into_iter().collect(),
        }
    }
}

/// Lines of `text` with universal line endings; a final terminator does not start a new line.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match rest.find(['\r', '\n']) {
            Some(end) => {
                let line = &rest[..end];
                let skip = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[end + skip..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = "";
                Some(line)
            }
        }
    })
}

/// Strip trailing whitespace and expand the two-character `\n` escape.
pub fn unescape_line(line: &str) -> String {
    line.trim_end().replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!(
            "thumbnail_{name}_{}_{}.txt",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn escaped_newline_becomes_line_break() {
        let path = temp_file("sentences_escape", "Hello\nWorld\\nFoo\nBye\n");
        let bank = SentenceBank::load(&path).unwrap();

        assert_eq!(bank.len(), 3);
        let middle = bank.get(1).unwrap();
        assert_eq!(middle, "World\nFoo");
        assert!(!middle.contains("\\n"));

        let all: Vec<&str> = bank.iter().map(String::as_str).collect();
        assert_eq!(all, ["Hello", "World\nFoo", "Bye"]);

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn trailing_whitespace_and_crlf_are_stripped() {
        let path = temp_file("sentences_ws", "  keep leading   \r\nsecond\t\r\n");
        let bank = SentenceBank::load(&path).unwrap();
        let all: Vec<&str> = (&bank).into_iter().map(String::as_str).collect();
        assert_eq!(all, ["  keep leading", "second"]);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn lone_carriage_returns_end_lines() {
        let path = temp_file("sentences_cr", "one\rtwo\r\nthree\nfour\r");
        let bank = SentenceBank::load(&path).unwrap();
        let all: Vec<&str> = bank.iter().map(String::as_str).collect();
        assert_eq!(all, ["one", "two", "three", "four"]);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn blank_lines_are_kept_in_order() {
        let lines: Vec<&str> = split_lines("a\n\nb\n").collect();
        assert_eq!(lines, ["a", "", "b"]);
        assert_eq!(split_lines("").count(), 0);
    }

    #[test]
    fn non_utf8_file_is_input_error() {
        let path = std::env::temp_dir().join(format!(
            "thumbnail_sentences_latin1_{}.txt",
            std::process::id()
        ));
        std::fs::write(&path, b"caf\xe9\n").unwrap();
        let err = SentenceBank::load(&path).err().unwrap();
        assert!(matches!(err, ThumbnailError::Input(_)));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn every_escape_in_a_line_is_expanded() {
        assert_eq!(unescape_line("a\\nb\\nc"), "a\nb\nc");
        assert_eq!(unescape_line("no escape"), "no escape");
    }

    #[test]
    fn missing_file_is_input_error() {
        let err = SentenceBank::load("/definitely/not/here.txt").err().unwrap();
        assert!(matches!(err, ThumbnailError::Input(_)));
    }
}
