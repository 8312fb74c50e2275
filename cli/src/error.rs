use std::{collections::HashMap, error::Error, ops::Range};

use ariadne::{Config, IndexType, ReportKind};
use cuelist::{CueReader, Diagnostic, Level, SourceId};

type Report = ariadne::Report<'static, (SourceId, Range<usize>)>;

/// Turn the diagnostic of a failed cue list file into an ariadne report.
///
/// The report is anchored at the first labelled position, the offending
/// symbol in the decoded text.  Labels without a position are collected into
/// the report note.
pub fn to_error(diag: &Diagnostic) -> Result<Report, Box<dyn Error>> {
    let kind = match diag.level {
        Level::Error => ReportKind::Error,
    };

    let Some((source, offset)) = diag
        .labels
        .iter()
        .find_map(|l| Some((l.source?, l.location.as_ref()?.start)))
    else {
        return Err("Unable to get source location from diagnostic".into());
    };

    let mut report = Report::build(kind, source, offset)
        .with_code(&diag.error_code)
        .with_message(&diag.name)
        .with_config(Config::default().with_index_type(IndexType::Byte));

    let mut note: Option<String> = None;
    for label in &diag.labels {
        let (Some(source), Some(location)) = (label.source, &label.location) else {
            note = Some(note.unwrap_or_default() + "\n" + &label.message);
            continue;
        };
        report.add_label(
            ariadne::Label::new((source, location.clone())).with_message(&label.message),
        )
    }

    if let Some(note) = note {
        report.set_note(note);
    }

    Ok(report.finish())
}

/// Serves the decoded text of each cue list file to ariadne.  Diagnostic
/// offsets refer to the decoded text, so the raw file contents are never
/// shown; files are named as they were given on the command line.
pub struct CueReaderCache<'a> {
    cache: HashMap<SourceId, ariadne::Source<&'a str>>,
    reader: &'a CueReader,
}

impl<'a> ariadne::Cache<SourceId> for CueReaderCache<'a> {
    type Storage = &'a str;

    fn fetch(
        &mut self,
        id: &SourceId,
    ) -> Result<&ariadne::Source<Self::Storage>, Box<dyn std::fmt::Debug + '_>> {
        Ok(self
            .cache
            .entry(*id)
            .or_insert_with(|| ariadne::Source::from(self.reader.source_text(*id))))
    }

    fn display<'b>(&self, id: &'b SourceId) -> Option<Box<dyn std::fmt::Display + 'b>> {
        Some(Box::new(self.reader.source_name(*id).to_string()))
    }
}

impl<'a> CueReaderCache<'a> {
    pub fn new(reader: &'a CueReader) -> Self {
        CueReaderCache {
            cache: HashMap::new(),
            reader,
        }
    }
}
