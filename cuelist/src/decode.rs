//! Turning the text of a cue list file into the form the tokenizer reads.
//!
//! Whitespace is insignificant outside of quoted spans, so it is removed
//! there, while quoted spans are kept byte for byte.  Lines are joined without
//! any separator.  A quoted span never continues past the end of its line; an
//! unterminated quote is closed at the end of the line.

use unicode_normalization::UnicodeNormalization;

/// Decode raw source text for tokenizing
pub fn decode(raw: &str) -> String {
    let raw: String = raw.nfc().collect();
    let mut decoded = String::with_capacity(raw.len());

    for line in raw.lines() {
        for (i, part) in line.split('"').enumerate() {
            if i % 2 == 1 {
                decoded.push('"');
                decoded.push_str(part);
                decoded.push('"');
            } else {
                decoded.extend(part.chars().filter(|c| !c.is_whitespace()));
            }
        }
    }

    decoded
}
