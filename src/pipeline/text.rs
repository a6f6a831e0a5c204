//! Text cleanup applied before annotation.

use regex::Regex;

use crate::Result;

/// Strips bracketed noise (`[+1234 chars]`, `[Reuters]`) that news APIs
/// append to snippets.
#[derive(Debug, Clone)]
pub struct TextCleaner {
    bracketed: Regex,
}

impl TextCleaner {
    pub fn new() -> Result<Self> {
        Ok(Self { bracketed: Regex::new(r"\[.*?\]")? })
    }

    /// Remove every `[...]` span (shortest match) and trim.
    pub fn clean_text(&self, text: &str) -> String {
        self.bracketed.replace_all(text, "").trim().to_string()
    }

    /// Clean every text and drop those left empty.
    pub fn clean_all<S: AsRef<str>>(&self, texts: &[S]) -> Vec<String> {
        texts
            .iter()
            .map(|t| self.clean_text(t.as_ref()))
            .filter(|t| !t.is_empty())
            .collect()
    }
}
