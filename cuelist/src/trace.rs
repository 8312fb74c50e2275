use std::fmt::{Display, Write};

/// Human readable record of the symbols the tokenizer recognised, in the order
/// it recognised them.  Some symbols are written inline, others on their own
/// line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    text: String,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append text without a line break
    pub(crate) fn write(&mut self, value: impl Display) {
        write!(self.text, "{value}").ok();
    }

    /// Append text followed by a line break
    pub(crate) fn line(&mut self, value: impl Display) {
        writeln!(self.text, "{value}").ok();
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Display for Trace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}
