/// Scan position over a decoded source text.
///
/// Unlike an iterator, the position can be moved backwards so that characters
/// already consumed are presented again to a different tokenizer state.
/// Backward seeks are bounded by the last [`Cursor::mark`].
#[derive(Debug, Clone)]
pub struct Cursor {
    /// All characters of the source with their byte offsets
    chars: Vec<(usize, char)>,

    /// Index into `chars` of the next character to return
    position: usize,

    /// Lowest index a backward seek may reach
    mark: usize,
}

impl Cursor {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.char_indices().collect(),
            position: 0,
            mark: 0,
        }
    }

    /// Consume and return the next character along with its byte offset
    pub fn next(&mut self) -> Option<(usize, char)> {
        let next = self.chars.get(self.position).copied()?;
        self.position += 1;
        Some(next)
    }

    /// Move back by `n` characters.  The position never moves before the
    /// current mark; returns the number of characters actually rewound.
    pub fn seek_back(&mut self, n: usize) -> usize {
        let target = self.position.saturating_sub(n).max(self.mark);
        let moved = self.position - target;
        self.position = target;
        moved
    }

    /// Record the current position as the start of a token, the lower bound
    /// for any later [`Cursor::seek_back`].
    pub fn mark(&mut self) {
        self.mark = self.position;
    }

    /// Byte offset of the most recently consumed character
    pub fn last_offset(&self) -> usize {
        self.position
            .checked_sub(1)
            .and_then(|i| self.chars.get(i))
            .map(|&(offset, _)| offset)
            .unwrap_or(0)
    }
}
