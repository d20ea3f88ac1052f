//! Text statistics shown under the recognized text

/// Character and word counts for a recognized text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStats {
    /// Unicode scalar values in the text, whitespace included
    pub characters: usize,
    /// Whitespace-separated non-empty tokens
    pub words: usize,
}

impl TextStats {
    pub fn from_text(text: &str) -> Self {
        Self {
            characters: text.chars().count(),
            words: text.split_whitespace().count(),
        }
    }

    pub fn characters_label(&self) -> String {
        format!("Characters: {}", self.characters)
    }

    pub fn words_label(&self) -> String {
        format!("Words: {}", self.words)
    }
}
