/// Output sink for channel writes, e.g. a lighting console or DMX interface.
///
/// Nothing in the tokenizer calls this; a caller walks the parsed cue list
/// and drives whatever mixer it has, see [`crate::KeyFrame::apply`].
pub trait Mixer {
    fn set_channel(&mut self, channel: u16, value: u8);
}
