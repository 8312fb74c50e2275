#![forbid(unsafe_code)]

mod cue_list;
mod cursor;
mod decode;
mod diagnostic;
mod document;
mod element;
mod error;
mod mixer;
mod param;
mod printer;
mod reader;
mod state;
mod tokenizer;
mod trace;
mod tree;

pub use cue_list::CueList;
pub use decode::decode;
pub use diagnostic::{Diagnostic, Label, Level};
pub use document::{Document, Head, LinkedSchemaHead, PredefinedSchemaHead, SchemaVersion};
pub use element::{
    Body, ChannelData, Delay, DelayMode, Direction, Element, ForIteration, Iteration,
    IterationKind, KeyFrame,
};
pub use error::{ParseError, Result};
pub use mixer::Mixer;
pub use printer::{print_cue_list, print_document};
pub use reader::{CueReader, Features, SourceId};
pub use tokenizer::{parse, Parsed, Tokenizer};
pub use trace::Trace;
pub use tree::Tree;

const _: () = assert!(
    unicode_normalization::UNICODE_VERSION.0 == 15
        && unicode_normalization::UNICODE_VERSION.1 == 1
        && unicode_normalization::UNICODE_VERSION.2 == 0,
    "Mismatched unicode normalisation version"
);
