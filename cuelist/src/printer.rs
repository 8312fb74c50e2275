//! Writing cue lists and documents back in their source notation.
//!
//! Numbers are written as uppercase hexadecimal `0H` literals.  Reading the
//! output again gives the same KeyFrames, channel data and head.

use std::fmt::Write;

use crate::{
    cue_list::CueList,
    document::{Document, Head, SchemaVersion},
    element::KeyFrame,
};

/// Source notation for a whole cue list
pub fn print_cue_list(list: &CueList) -> String {
    let mut out = String::new();
    for frame in list {
        print_key_frame(&mut out, frame);
    }
    out
}

/// Source notation for a document and its head
pub fn print_document(document: &Document) -> String {
    let mut out = String::from("X!");

    match &document.head {
        Some(Head::Predefined(head)) => {
            if head.schema_version != SchemaVersion::Empty {
                number(&mut out, "X@", i32::from(head.schema_version));
                if head.schema_id != 0 {
                    number(&mut out, "X@", head.schema_id);
                }
            }
            if !head.title.is_empty() {
                write!(out, "X+\"{}\";", head.title).ok();
            }
        }
        Some(Head::Linked(head)) => {
            write!(out, "X+\"{}\";\"{}\";", head.title, head.schema_path).ok();
            if head.schema_version != SchemaVersion::Empty {
                number(&mut out, "X@", i32::from(head.schema_version));
            }
        }
        None => {}
    }

    out
}

fn print_key_frame(out: &mut String, frame: &KeyFrame) {
    // a closed KeyFrame without channel data reads back as an empty one
    if frame.is_closed() && frame.children().is_empty() {
        number(out, "Kf", frame.delay_ms);
        return;
    }

    number(out, "KF", frame.delay_ms);
    for data in frame.channel_data() {
        number(out, "BP", data.channel.into());
        number(out, "", data.value.into());
    }
    if frame.is_closed() {
        out.push_str("kf");
    }
}

fn number(out: &mut String, symbol: &str, value: i32) {
    write!(out, "{symbol}0H{value:X};").ok();
}
