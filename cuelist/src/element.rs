//! The elements a cue list is built from.
//!
//! Every element accepts numeric and string parameters; what a parameter
//! means depends on the variant and on how many parameters it has already
//! received.  Complex elements additionally own an ordered list of children
//! and can be finished, after which they are considered closed.

use std::fmt::Display;

use crate::mixer::Mixer;

/// Any element that can appear inside a cue list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    ChannelData(ChannelData),
    KeyFrame(KeyFrame),
    Delay(Delay),
    Iteration(Iteration),
    Body(Body),
}

/// A single write of `value` to `channel`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelData {
    /// Target channel, 0 while unset
    pub channel: u16,

    pub value: u8,

    /// Number of numeric parameters received so far
    received: u8,
}

/// A timed step holding channel writes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyFrame {
    /// How long the step lasts, in milliseconds
    pub delay_ms: i32,

    children: Vec<Element>,
    closed: bool,
}

/// What a delay waits for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DelayMode {
    #[default]
    BeatSignal,
    MilliSeconds,
}

/// A pause, either until the next beat or for a fixed time.  Always closed
/// and never has children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delay {
    pub mode: DelayMode,
    pub ms: i32,
}

/// Direction a counted iteration moves in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    #[default]
    Increment,
    Decrement,
}

/// Loop counters of a counted iteration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForIteration {
    pub iter: i32,
    pub target: i32,
    pub direction: Direction,
}

/// The two kinds of iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationKind {
    /// Repeats until a counter reaches its target
    For(ForIteration),

    /// Repeats forever
    Infinite,
}

/// A repeated fragment of a cue list.  Children are complex elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iteration {
    pub kind: IterationKind,
    children: Vec<Element>,
    closed: bool,
}

/// Generic closable container, the body of a document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Body {
    children: Vec<Element>,
    closed: bool,
}

impl ChannelData {
    pub fn new(channel: u16, value: u8) -> Self {
        Self {
            channel,
            value,
            received: 2,
        }
    }

    /// The first parameter is the channel, every later one the value.
    pub fn add_num_param(&mut self, v: i32) {
        if self.received == 0 {
            self.channel = v as u16;
        } else {
            self.value = v as u8;
        }
        self.received = self.received.saturating_add(1);
    }
}

impl KeyFrame {
    /// An open KeyFrame lasting `delay_ms`
    pub fn new(delay_ms: i32) -> Self {
        Self {
            delay_ms,
            children: vec![],
            closed: false,
        }
    }

    /// A KeyFrame that is closed from the start and takes no channel data
    pub fn empty(delay_ms: i32) -> Self {
        Self {
            closed: true,
            ..Self::new(delay_ms)
        }
    }

    /// Every numeric parameter sets the delay
    pub fn add_num_param(&mut self, v: i32) {
        self.delay_ms = v;
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn finish(&mut self) {
        self.closed = true;
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<Element> {
        &mut self.children
    }

    /// Only channel data belongs in a KeyFrame, anything else is handed back.
    pub fn append_child(&mut self, child: Element) -> Result<(), Element> {
        match child {
            Element::ChannelData(_) => {
                self.children.push(child);
                Ok(())
            }
            _ => Err(child),
        }
    }

    /// All channel writes of this KeyFrame, in order
    pub fn channel_data(&self) -> impl Iterator<Item = &ChannelData> + '_ {
        self.children.iter().filter_map(|child| match child {
            Element::ChannelData(data) => Some(data),
            _ => None,
        })
    }

    /// Send every channel write to an output sink
    pub fn apply(&self, mixer: &mut impl Mixer) {
        for data in self.channel_data() {
            mixer.set_channel(data.channel, data.value);
        }
    }
}

impl Delay {
    /// Wait for the next beat signal
    pub fn beat() -> Self {
        Self::default()
    }

    /// Wait for a fixed number of milliseconds
    pub fn millis(ms: i32) -> Self {
        Self {
            mode: DelayMode::MilliSeconds,
            ms,
        }
    }
}

impl Iteration {
    pub fn counted() -> Self {
        Self::with_kind(IterationKind::For(ForIteration::default()))
    }

    pub fn infinite() -> Self {
        Self::with_kind(IterationKind::Infinite)
    }

    fn with_kind(kind: IterationKind) -> Self {
        Self {
            kind,
            children: vec![],
            closed: false,
        }
    }
}

impl Body {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn finish(&mut self) {
        self.closed = true;
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }
}

impl Element {
    /// Deliver a numeric parameter.  Never fails, variants that take no
    /// numbers ignore it.
    pub fn add_num_param(&mut self, v: i32) {
        match self {
            Element::ChannelData(data) => data.add_num_param(v),
            Element::KeyFrame(frame) => frame.add_num_param(v),
            Element::Delay(delay) => *delay = Delay::millis(v),
            Element::Iteration(Iteration {
                kind: IterationKind::For(counter),
                ..
            }) => counter.target = counter.target.wrapping_add(v),
            Element::Iteration(Iteration {
                kind: IterationKind::Infinite,
                ..
            })
            | Element::Body(_) => {}
        }
    }

    /// Deliver a string parameter.  No element variant uses strings; only
    /// document heads do.
    pub fn add_str_param(&mut self, _value: &str) {}

    /// Does this element own children
    pub fn is_complex(&self) -> bool {
        !matches!(self, Element::ChannelData(_))
    }

    /// Leaves and delays are always closed.
    pub fn is_closed(&self) -> bool {
        match self {
            Element::ChannelData(_) | Element::Delay(_) => true,
            Element::KeyFrame(frame) => frame.closed,
            Element::Iteration(iteration) => iteration.closed,
            Element::Body(body) => body.closed,
        }
    }

    /// Latch the closed flag.  Calling it again has no further effect.
    pub fn finish(&mut self) {
        match self {
            Element::ChannelData(_) | Element::Delay(_) => {}
            Element::KeyFrame(frame) => frame.closed = true,
            Element::Iteration(iteration) => iteration.closed = true,
            Element::Body(body) => body.closed = true,
        }
    }

    pub fn children(&self) -> &[Element] {
        match self {
            Element::ChannelData(_) | Element::Delay(_) => &[],
            Element::KeyFrame(frame) => &frame.children,
            Element::Iteration(iteration) => &iteration.children,
            Element::Body(body) => &body.children,
        }
    }

    /// Append a child, handing it back if this element cannot own it.
    pub fn append_child(&mut self, child: Element) -> Result<(), Element> {
        match self {
            Element::ChannelData(_) | Element::Delay(_) => Err(child),
            Element::KeyFrame(frame) => frame.append_child(child),
            Element::Iteration(iteration) => {
                if child.is_complex() {
                    iteration.children.push(child);
                    Ok(())
                } else {
                    Err(child)
                }
            }
            Element::Body(body) => {
                body.children.push(child);
                Ok(())
            }
        }
    }
}

impl Display for ChannelData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ch {}: {}", self.channel, self.value)
    }
}

impl Display for KeyFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyFrame lasts for {} ms.", self.delay_ms)
    }
}

impl Display for Delay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.mode {
            DelayMode::BeatSignal => write!(f, "Wait for BeatSignal."),
            DelayMode::MilliSeconds => write!(f, "Delay {} ms", self.ms),
        }
    }
}

impl Display for Iteration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            IterationKind::For(ForIteration {
                iter,
                target,
                direction,
            }) => write!(f, "ForIteration {iter}..{target} ({direction:?})"),
            IterationKind::Infinite => write!(f, "InfiniteIteration"),
        }
    }
}

impl Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Element::ChannelData(data) => data.fmt(f),
            Element::KeyFrame(frame) => frame.fmt(f),
            Element::Delay(delay) => delay.fmt(f),
            Element::Iteration(iteration) => iteration.fmt(f),
            Element::Body(_) => write!(f, "Body"),
        }
    }
}
