use std::{fmt::Display, ops::Index};

use crate::element::KeyFrame;

/// Ordered list of top-level KeyFrames, in the order they were read
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CueList {
    frames: Vec<KeyFrame>,
}

impl CueList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a KeyFrame, returning its index
    pub fn push(&mut self, frame: KeyFrame) -> usize {
        self.frames.push(frame);
        self.frames.len() - 1
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, KeyFrame> {
        self.frames.iter()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut KeyFrame> {
        self.frames.get_mut(index)
    }

    /// Index of the most recently added KeyFrame that is still open
    pub fn last_open(&self) -> Option<usize> {
        self.frames.iter().rposition(|frame| !frame.is_closed())
    }

    pub fn last_open_mut(&mut self) -> Option<&mut KeyFrame> {
        let index = self.last_open()?;
        self.frames.get_mut(index)
    }

    /// Finish the last open KeyFrame and return it
    pub fn close_last(&mut self) -> Option<&KeyFrame> {
        let frame = self.last_open_mut()?;
        frame.finish();
        Some(&*frame)
    }
}

impl Index<usize> for CueList {
    type Output = KeyFrame;

    fn index(&self, index: usize) -> &Self::Output {
        &self.frames[index]
    }
}

impl<'a> IntoIterator for &'a CueList {
    type Item = &'a KeyFrame;
    type IntoIter = std::slice::Iter<'a, KeyFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Closing report: the number of KeyFrames, then each KeyFrame with its
/// channel writes.
impl Display for CueList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Count of KeyFrames:{}", self.len())?;
        for frame in self {
            writeln!(f, "{frame} childs: {}", frame.children().len())?;
            for data in frame.channel_data() {
                writeln!(f, "{data}")?;
            }
        }

        Ok(())
    }
}
