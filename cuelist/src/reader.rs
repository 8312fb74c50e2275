//! The primary interface for reading cue list files.

use std::ops::{Deref, DerefMut};

use crate::{
    decode::decode,
    diagnostic::Diagnostic,
    tokenizer::{Parsed, Tokenizer},
};

/// Store of every cue list source read so far, together with what was read
/// from each of them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CueReader {
    /// List of all included source files.
    sources: Vec<Source>,

    /// The enabled features.
    features: Features,
}

/// Optional reading behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Features {
    /// Honour the radix marker of parameter literals (`H`/`X` hexadecimal,
    /// `D` decimal, `B` binary).  Otherwise every literal is hexadecimal.
    pub radix_literals: bool,

    /// Consume string parameters without storing them anywhere.
    pub inert_strings: bool,
}

/// Information relating to a single source file
#[derive(Debug, Clone, PartialEq, Eq)]
struct Source {
    /// File name and path.
    file_name: String,

    /// Text of the file as given
    raw: String,

    /// Text of the file after decoding, which all offsets refer to
    decoded: String,

    /// The cue list, document and trace read from the file, if reading
    /// succeeded
    parsed: Option<Parsed>,
}

/// Reference to a single source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(usize);

impl SourceId {
    pub(crate) fn new(index: usize) -> Self {
        SourceId(index)
    }
}

impl CueReader {
    /// Create a new reader
    pub fn new() -> Self {
        Default::default()
    }

    /// Decode and read a new file.  The file is stored even if reading fails,
    /// so the returned diagnostic can be shown against its text.
    pub fn add_file(&mut self, file_name: String, raw: String) -> Result<SourceId, Diagnostic> {
        let id = SourceId::new(self.sources.len());
        let decoded = decode(&raw);

        log::debug!("read {file_name:?}, {} decoded bytes", decoded.len());

        let result = Tokenizer::new(&decoded, self.features).run();
        let diagnostic = result.as_ref().err().map(|err| {
            log::debug!("reading {file_name:?} failed: {err}");
            Diagnostic::from_parse_error(err, id)
        });

        self.sources.push(Source {
            file_name,
            raw,
            decoded,
            parsed: result.ok(),
        });

        match diagnostic {
            Some(diagnostic) => Err(diagnostic),
            None => Ok(id),
        }
    }

    /// Get an iterator over all source IDs
    pub fn all_sources(&self) -> impl Iterator<Item = SourceId> + '_ {
        (0..self.sources.len()).map(SourceId)
    }

    /// Get the source associated with a source id
    #[inline]
    fn source(&self, file: SourceId) -> &Source {
        &self.sources[file.0]
    }

    /// The name the file was added with
    pub fn source_name(&self, file: SourceId) -> &str {
        &self.source(file).file_name
    }

    /// The decoded text of the file, which all diagnostic offsets refer to
    pub fn source_text(&self, file: SourceId) -> &str {
        &self.source(file).decoded
    }

    /// The text of the file before decoding
    pub fn raw_text(&self, file: SourceId) -> &str {
        &self.source(file).raw
    }

    /// Everything read from the file, `None` if reading it failed
    pub fn parsed(&self, file: SourceId) -> Option<&Parsed> {
        self.source(file).parsed.as_ref()
    }
}

impl Deref for CueReader {
    type Target = Features;

    fn deref(&self) -> &Self::Target {
        &self.features
    }
}

impl DerefMut for CueReader {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.features
    }
}
