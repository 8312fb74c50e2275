//! Collection of multi-character parameter literals.
//!
//! A parameter sequence starts when an element that takes parameters is
//! recognised.  It announces how many parameters follow and who receives
//! them.  Each parameter is accumulated one character at a time until its
//! terminating `;` and then delivered by the tokenizer.
//!
//! Numeric literals are written `0<radix><digits>;`.  A literal whose first
//! character is not `0` cancels everything that is still pending for the
//! sequence, not just the current parameter.

use crate::error::{ParseError, Result};

/// Receiver of the parameters of the current sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    /// No sequence in progress
    None,

    /// A top-level KeyFrame, by index into the cue list
    KeyFrame(usize),

    /// A child of a top-level KeyFrame
    Child { frame: usize, child: usize },

    /// The head of the current document
    Head,
}

/// Result of feeding one character to a numeric literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Accumulate {
    /// More characters are needed
    Continue,

    /// The literal was terminated
    Complete,

    /// The literal does not start with `0`
    Malformed,
}

/// State of the parameter sequence being assembled
#[derive(Debug, Clone)]
pub(crate) struct ParamAssembler {
    /// Raw characters of the current literal
    literal: String,

    /// Byte offset of the first character of the current literal
    start: usize,

    /// Parameters still expected in this sequence
    pending: usize,

    target: Target,

    /// Is the string literal currently inside a quoted span
    in_quote: bool,
}

impl ParamAssembler {
    pub(crate) fn new() -> Self {
        Self {
            literal: String::new(),
            start: 0,
            pending: 0,
            target: Target::None,
            in_quote: false,
        }
    }

    /// Start a sequence of `count` parameters going to `target`
    pub(crate) fn begin(&mut self, count: usize, target: Target) {
        self.literal.clear();
        self.in_quote = false;
        self.pending = count;
        self.target = target;
    }

    pub(crate) fn target(&self) -> Target {
        self.target
    }

    pub(crate) fn pending(&self) -> usize {
        self.pending
    }

    pub(crate) fn literal(&self) -> &str {
        &self.literal
    }

    /// Feed one raw character of a numeric literal
    pub(crate) fn push_num(&mut self, offset: usize, letter: char) -> Accumulate {
        if self.literal.is_empty() {
            self.start = offset;
        }

        let state = if letter == ';' {
            Accumulate::Complete
        } else {
            self.literal.push(letter);
            Accumulate::Continue
        };

        if self.literal.starts_with('0') {
            state
        } else {
            Accumulate::Malformed
        }
    }

    /// Feed one raw character of a string literal.  Returns true once the
    /// literal is terminated by a `;` outside of quotes.
    pub(crate) fn push_str(&mut self, offset: usize, letter: char) -> bool {
        if self.literal.is_empty() && !self.in_quote {
            self.start = offset;
        }

        match letter {
            ';' if !self.in_quote => return true,
            '"' => self.in_quote = !self.in_quote,
            _ => {}
        }
        self.literal.push(letter);

        false
    }

    /// Parse and clear the completed numeric literal
    pub(crate) fn take_number(&mut self, radix_literals: bool) -> Result<i32> {
        let literal = std::mem::take(&mut self.literal);

        parse_literal(&literal, radix_literals).ok_or(ParseError::InvalidNumber {
            literal,
            offset: self.start,
        })
    }

    /// Clear the completed string literal and return it without its quotes
    pub(crate) fn take_string(&mut self) -> String {
        self.in_quote = false;
        let literal = std::mem::take(&mut self.literal);

        match literal
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
        {
            Some(inner) => inner.to_string(),
            None => literal,
        }
    }

    /// Count one parameter as delivered.  Returns true if more are expected.
    pub(crate) fn finish_one(&mut self) -> bool {
        self.pending = self.pending.saturating_sub(1);
        if self.pending == 0 {
            self.target = Target::None;
        }

        self.pending > 0
    }

    /// Drop the current literal and everything still pending
    pub(crate) fn cancel(&mut self) {
        self.literal.clear();
        self.in_quote = false;
        self.pending = 0;
        self.target = Target::None;
    }
}

/// Radix selected by the second character of a literal
fn radix(marker: char) -> u32 {
    match marker.to_ascii_uppercase() {
        'D' => 10,
        'B' => 2,
        _ => 16,
    }
}

/// Parse `0<radix><digits>`.  Digits are read up to the first character that
/// is not a digit of the radix.  Unless `radix_literals` is set, the digits
/// are always hexadecimal.
pub(crate) fn parse_literal(literal: &str, radix_literals: bool) -> Option<i32> {
    let mut chars = literal.chars();
    if chars.next()? != '0' {
        return None;
    }
    let marker = chars.next()?;
    let digits = chars.as_str();

    let radix = if radix_literals { radix(marker) } else { 16 };
    let end = digits
        .char_indices()
        .find(|&(_, c)| !c.is_digit(radix))
        .map(|(i, _)| i)
        .unwrap_or(digits.len());

    if end == 0 {
        return None;
    }
    if end < digits.len() {
        log::warn!(
            "ignoring trailing {:?} in numeric literal {literal:?}",
            &digits[end..]
        );
    }

    u32::from_str_radix(&digits[..end], radix)
        .ok()
        .map(|v| v as i32)
}
