//! Options controlling text generated by the apply engine

/// Quote character for generated string literals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    #[default]
    Double,
    Single,
}

impl QuoteStyle {
    pub fn char(self) -> char {
        match self {
            Self::Double => '"',
            Self::Single => '\'',
        }
    }
}

/// Options for statements and blocks created by an apply
///
/// Existing text is never reformatted; these only shape new text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Number of spaces per indentation level (ignored when using tabs)
    pub tab_size: usize,
    /// Use spaces for indentation (false = use tabs)
    pub insert_spaces: bool,
    /// Quote character for new string literals
    pub quote_style: QuoteStyle,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            tab_size: 2,
            insert_spaces: true,
            quote_style: QuoteStyle::Double,
        }
    }
}

impl DocumentOptions {
    /// Generate indentation string for the given level
    pub fn indent(&self, level: usize) -> String {
        if self.insert_spaces {
            " ".repeat(self.tab_size * level)
        } else {
            "\t".repeat(level)
        }
    }

    pub fn quote(&self) -> char {
        self.quote_style.char()
    }
}
