//! The character driven state machine that reads a decoded cue list.
//!
//! Symbols are one or two letters, compared case-insensitively, optionally
//! followed by parameter literals.  The case of the letters in `KF` is
//! significant: it decides between opening a KeyFrame, opening an empty one
//! and closing the open one.
//!
//! Some states consume a character only to find that it belongs to the next
//! symbol; they move the cursor back so the character is processed again.

use log::{debug, trace};

use crate::{
    cue_list::CueList,
    cursor::Cursor,
    document::{Document, Head},
    element::{ChannelData, Element, Iteration, KeyFrame},
    error::{ParseError, Result},
    param::{Accumulate, ParamAssembler, Target},
    reader::Features,
    state::State,
    trace::Trace,
};

/// Everything produced by reading one source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parsed {
    pub cue_list: CueList,
    pub document: Option<Document>,
    pub trace: Trace,
}

/// State for reading one decoded source text
#[derive(Debug, Clone)]
pub struct Tokenizer {
    cursor: Cursor,

    features: Features,

    state: State,

    /// The raw character processed before the current one
    previous: Option<char>,

    params: ParamAssembler,

    cue_list: CueList,
    document: Option<Document>,
    trace: Trace,
}

/// Read a decoded source text in one pass
pub fn parse(source: &str, features: Features) -> Result<Parsed> {
    Tokenizer::new(source, features).run()
}

impl Tokenizer {
    pub fn new(source: &str, features: Features) -> Self {
        Self {
            cursor: Cursor::new(source),
            features,
            state: State::Default,
            previous: None,
            params: ParamAssembler::new(),
            cue_list: CueList::new(),
            document: None,
            trace: Trace::new(),
        }
    }

    /// Process the whole input, then settle a parameter that was terminated
    /// by the last character.
    pub fn run(mut self) -> Result<Parsed> {
        loop {
            while let Some((offset, letter)) = self.cursor.next() {
                self.step(offset, letter)?;
            }

            match self.state {
                State::ReceivedParamNum => self.state = self.deliver_num()?,
                State::ReceivedParamStr => self.state = self.deliver_str(),
                State::NoNumParam => {
                    // the rejected character is still unprocessed
                    self.cancel();
                    self.cursor.seek_back(1);
                    self.state = State::Default;
                    continue;
                }
                state if state.is_waiting() && !self.params.literal().is_empty() => {
                    log::warn!(
                        "input ends inside parameter literal {:?}",
                        self.params.literal()
                    );
                }
                _ => {}
            }

            break;
        }

        Ok(Parsed {
            cue_list: self.cue_list,
            document: self.document,
            trace: self.trace,
        })
    }

    /// Process a single character
    fn step(&mut self, offset: usize, letter: char) -> Result {
        let c = fold(letter);

        let next = match self.state {
            State::Default => self.default(letter, c),
            State::LetterC => {
                if c == 'L' {
                    self.trace.line("CueList");
                }
                State::Default
            }
            State::LetterK => self.letter_k(offset, letter, c)?,
            State::LetterB => self.letter_b(offset, c)?,
            State::LetterW => {
                match c {
                    'B' => self.trace.write("<waitBeatSignal />"),
                    'M' => self.trace.write("<waitMilliSeconds />"),
                    _ => {}
                }
                State::Default
            }
            State::LetterF => {
                match c {
                    'I' => {
                        self.trace.write("ForIteration");
                        let iteration = Iteration::counted();
                        debug!("{iteration} at {offset} is not attached to any element");
                    }
                    'T' => self.trace.write("FadeTime"),
                    _ => {}
                }
                State::Default
            }
            State::LetterI => {
                if c == 'I' {
                    let iteration = Iteration::infinite();
                    self.trace.write("InfiniteIteration");
                    debug!("{iteration} at {offset} is not attached to any element");
                }
                State::Default
            }
            State::QuotationMark => {
                self.trace.write(letter);
                if c == '"' {
                    State::Default
                } else {
                    State::QuotationMark
                }
            }
            State::Number => self.number(c),
            State::NumberHex | State::NumberDec | State::NumberBin => {
                if c == ';' {
                    State::Default
                } else {
                    self.trace.write(c);
                    self.state
                }
            }
            State::Command => self.command(c),
            State::WaitParamNum => match self.params.push_num(offset, letter) {
                Accumulate::Continue => State::WaitParamNum,
                Accumulate::Complete => State::ReceivedParamNum,
                Accumulate::Malformed => State::NoNumParam,
            },
            State::ReceivedParamNum => {
                let next = self.deliver_num()?;
                self.cursor.seek_back(1);
                next
            }
            State::NoNumParam => {
                self.cancel();
                self.cursor.seek_back(2);
                State::Default
            }
            State::WaitParamStr => {
                if self.params.push_str(offset, letter) {
                    State::ReceivedParamStr
                } else {
                    State::WaitParamStr
                }
            }
            State::ReceivedParamStr => {
                let next = self.deliver_str();
                self.cursor.seek_back(1);
                next
            }
        };

        trace!("{:?} --{letter:?}@{offset}--> {next:?}", self.state);

        // literals may only be rewound to their first character
        if next.is_waiting() && next != self.state {
            self.cursor.mark();
        }

        self.state = next;
        self.previous = Some(letter);

        Ok(())
    }

    /// Dispatch on the leading letter of a symbol
    fn default(&mut self, letter: char, c: char) -> State {
        match c {
            'C' => State::LetterC,
            'K' => State::LetterK,
            'B' => State::LetterB,
            'W' => State::LetterW,
            'F' => State::LetterF,
            'I' => State::LetterI,
            '"' => {
                self.trace.write(letter);
                State::QuotationMark
            }
            '0' => State::Number,
            'X' => State::Command,
            _ => {
                self.trace.write(c);
                State::Default
            }
        }
    }

    /// `KF` opens a KeyFrame, `Kf` opens an empty one and a lowercase `k`
    /// closes the last open one.  `previous` holds the `K` here.  Only one
    /// KeyFrame may be open at a time.
    fn letter_k(&mut self, offset: usize, letter: char, c: char) -> Result<State> {
        if c != 'F' {
            return Ok(State::Default);
        }

        if !self.previous.is_some_and(char::is_uppercase) {
            self.trace.line("\nEnd of the KeyFrame.");
            let frame = self
                .cue_list
                .close_last()
                .ok_or(ParseError::NoOpenKeyFrame { offset })?;

            self.trace.line(frame);
            for data in frame.channel_data() {
                self.trace.line(data);
            }
            debug!("closed {frame} at {offset}");

            return Ok(State::Default);
        }

        let frame = if letter.is_uppercase() {
            if let Some(index) = self.cue_list.last_open() {
                return Err(ParseError::KeyFrameStillOpen { index, offset });
            }
            self.trace.line("\nNEW KeyFrame!");
            KeyFrame::new(0)
        } else {
            self.trace.line("\nEmpty KeyFrame.");
            KeyFrame::empty(0)
        };

        let index = self.cue_list.push(frame);
        debug!("opened KeyFrame {index} at {offset}");
        self.params.begin(1, Target::KeyFrame(index));

        Ok(State::WaitParamNum)
    }

    /// `BP` adds channel data to the open KeyFrame, followed by the channel and
    /// the value.
    fn letter_b(&mut self, offset: usize, c: char) -> Result<State> {
        if c != 'P' {
            return Ok(State::Default);
        }

        self.trace.write("\nLoading channel data...");

        let frame = self
            .cue_list
            .last_open()
            .ok_or(ParseError::NoOpenKeyFrame { offset })?;
        let children = self
            .cue_list
            .get_mut(frame)
            .map(KeyFrame::children_mut)
            .ok_or(ParseError::NoOpenKeyFrame { offset })?;
        let child = children.len();
        children.push(Element::ChannelData(ChannelData::default()));

        self.params.begin(2, Target::Child { frame, child });

        Ok(State::WaitParamNum)
    }

    /// Top-level literals are only echoed
    fn number(&mut self, c: char) -> State {
        let next = match c {
            'H' | 'X' => State::NumberHex,
            'D' => State::NumberDec,
            'B' => State::NumberBin,
            _ => {
                self.trace.write(c);
                return State::Default;
            }
        };

        self.trace.write(' ');
        self.trace.write(if next == State::NumberHex { 'H' } else { c });
        next
    }

    /// Document commands after `X`
    fn command(&mut self, c: char) -> State {
        match c {
            '!' => {
                self.trace.line("Document");
                self.document = Some(Document::new());
                State::Default
            }
            '@' => {
                self.trace.line("Head");
                self.head_or_insert(Head::predefined);
                self.params.begin(1, Target::Head);
                State::WaitParamNum
            }
            '+' => {
                self.trace.line("Title");
                let count = self.head_or_insert(Head::linked).string_params();
                self.params.begin(count, Target::Head);
                State::WaitParamStr
            }
            _ => State::Default,
        }
    }

    /// The head of the current document, created on first use
    fn head_or_insert(&mut self, head: fn() -> Head) -> &mut Head {
        let document = self.document.get_or_insert_with(|| {
            debug!("document command without `X!`, creating a document");
            Document::new()
        });

        document.head.get_or_insert_with(head)
    }

    /// Hand the completed numeric literal to its receiver and pick the state
    /// for the rest of the sequence.
    fn deliver_num(&mut self) -> Result<State> {
        let offset = self.cursor.last_offset();
        let value = self.params.take_number(self.features.radix_literals)?;
        let target = self.params.target();

        match target {
            Target::None => return Err(ParseError::NoOpenKeyFrame { offset }),
            Target::KeyFrame(index) => self
                .cue_list
                .get_mut(index)
                .ok_or(ParseError::NoOpenKeyFrame { offset })?
                .add_num_param(value),
            Target::Child { frame, child } => self
                .cue_list
                .get_mut(frame)
                .and_then(|f| f.children_mut().get_mut(child))
                .ok_or(ParseError::NoOpenKeyFrame { offset })?
                .add_num_param(value),
            Target::Head => self.head_or_insert(Head::predefined).add_num_param(value),
        }
        debug!("delivered {value} to {target:?}");

        Ok(self.after_delivery(State::WaitParamNum))
    }

    /// Hand the completed string literal to the document head
    fn deliver_str(&mut self) -> State {
        let value = self.params.take_string();

        if self.features.inert_strings {
            debug!("dropping string parameter {value:?}");
        } else {
            self.head_or_insert(Head::linked).add_str_param(&value);
            debug!("delivered {value:?} to the document head");
        }

        self.after_delivery(State::WaitParamStr)
    }

    fn after_delivery(&mut self, wait: State) -> State {
        if self.params.finish_one() {
            wait
        } else {
            State::Default
        }
    }

    /// Abandon the rest of the current parameter sequence
    fn cancel(&mut self) {
        self.trace.line("There is no parameter.");
        debug!(
            "cancelled {} pending parameter(s) for {:?}",
            self.params.pending(),
            self.params.target()
        );
        self.params.cancel();
    }
}

/// Uppercase a character when that maps it to exactly one character
fn fold(letter: char) -> char {
    let mut upper = letter.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(c), None) => c,
        _ => letter,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn run(source: &str) -> Result<Parsed> {
        parse(source, Features::default())
    }

    fn channels(frame: &KeyFrame) -> Vec<(u16, u8)> {
        frame.channel_data().map(|d| (d.channel, d.value)).collect()
    }

    #[rstest]
    #[case("KF0H0A;BP0H01;0H2A;kf", 10, &[(1, 42)])]
    #[case("KF0H0A;BP0H01;0H2A;", 10, &[(1, 42)])]
    #[case("KFBP0H02;0HFF;BP0H03;0H00;kf", 0, &[(2, 255), (3, 0)])]
    #[case("KF0H3E8;BP0H00;0H05;kf", 1000, &[(0, 5)])]
    fn keyframe_contents(#[case] source: &str, #[case] delay: i32, #[case] data: &[(u16, u8)]) {
        let parsed = run(source).unwrap();

        assert_eq!(parsed.cue_list.len(), 1);
        assert_eq!(parsed.cue_list[0].delay_ms, delay);
        assert_eq!(channels(&parsed.cue_list[0]), data);
    }

    #[rstest]
    #[case("KFkf", true, false)]
    #[case("KFkF", true, false)]
    #[case("Kf", false, true)]
    fn keyframe_case_rule(#[case] source: &str, #[case] opened: bool, #[case] empty: bool) {
        let parsed = run(source).unwrap();

        assert_eq!(parsed.cue_list.len(), 1);
        assert!(parsed.cue_list[0].is_closed());
        assert_eq!(parsed.trace.as_str().contains("NEW KeyFrame!"), opened);
        assert_eq!(parsed.trace.as_str().contains("Empty KeyFrame."), empty);
    }

    #[rstest]
    #[case("KF0H01;KF0H02;kf", 0, 8)]
    #[case("KF0H01;KF0H02;", 0, 8)]
    #[case("KfKF0H01;kfKF0H02;KF", 2, 19)]
    fn opening_while_open_fails(#[case] source: &str, #[case] index: usize, #[case] offset: usize) {
        assert_eq!(
            run(source),
            Err(ParseError::KeyFrameStillOpen { index, offset })
        );
    }

    #[test]
    fn empty_keyframe_may_follow_an_open_one() {
        let parsed = run("KF0H01;Kf0H02;BP0H03;0H04;kf").unwrap();

        assert_eq!(parsed.cue_list.len(), 2);
        assert!(parsed.cue_list.iter().all(KeyFrame::is_closed));
        assert_eq!(channels(&parsed.cue_list[0]), [(3, 4)]);
        assert!(parsed.cue_list[1].children().is_empty());
    }

    #[test]
    fn delivery_without_a_sequence_fails() {
        let mut tokenizer = Tokenizer::new("0H05;", Features::default());
        while let Some((offset, letter)) = tokenizer.cursor.next() {
            tokenizer.params.push_num(offset, letter);
        }

        assert_eq!(
            tokenizer.deliver_num(),
            Err(ParseError::NoOpenKeyFrame { offset: 4 })
        );
    }

    #[test]
    fn empty_keyframe_receives_its_delay() {
        let parsed = run("Kf0H05;").unwrap();

        assert_eq!(parsed.cue_list[0].delay_ms, 5);
        assert!(parsed.cue_list[0].is_closed());
    }

    #[test]
    fn closing_without_open_keyframe_fails() {
        assert_eq!(run("A;kf"), Err(ParseError::NoOpenKeyFrame { offset: 3 }));
    }

    #[test]
    fn channel_data_without_open_keyframe_fails() {
        assert_eq!(run("BP0H01;"), Err(ParseError::NoOpenKeyFrame { offset: 1 }));
    }

    #[test]
    fn malformed_literal_cancels_the_sequence() {
        let parsed = run("KF0H01;BP1H01;kf").unwrap();

        let frame = &parsed.cue_list[0];
        assert!(frame.is_closed());
        assert_eq!(
            frame.children(),
            &[Element::ChannelData(ChannelData::default())]
        );
        assert!(parsed.trace.as_str().contains("There is no parameter.\n1H"));
    }

    #[test]
    fn malformed_second_literal_keeps_the_first() {
        let parsed = run("KF0H01;BP0H07;X;kf").unwrap();

        let Element::ChannelData(data) = &parsed.cue_list[0].children()[0] else {
            panic!("expected channel data");
        };
        assert_eq!((data.channel, data.value), (7, 0));
        assert!(parsed.cue_list[0].is_closed());
    }

    #[test]
    fn malformed_literal_at_end_of_input_is_echoed() {
        let parsed = run("KF0H01;BPZ").unwrap();

        assert!(parsed.trace.as_str().ends_with("There is no parameter.\nZ"));
    }

    #[test]
    fn invalid_number_is_an_error() {
        assert_eq!(
            run("KF0H;kf"),
            Err(ParseError::InvalidNumber {
                literal: "0H".into(),
                offset: 2,
            })
        );
    }

    #[test]
    fn radix_markers_are_hex_unless_enabled() {
        let source = "KF0D10;kf";

        let parsed = run(source).unwrap();
        assert_eq!(parsed.cue_list[0].delay_ms, 16);

        let features = Features {
            radix_literals: true,
            ..Features::default()
        };
        let parsed = parse(source, features).unwrap();
        assert_eq!(parsed.cue_list[0].delay_ms, 10);
    }

    #[test]
    fn trace_only_symbols_build_nothing() {
        let parsed = run("CLWBWMFIFTII0H1F;\"a b\"").unwrap();

        assert!(parsed.cue_list.is_empty());
        assert!(parsed.document.is_none());
        assert_eq!(
            parsed.trace.as_str(),
            "CueList\n<waitBeatSignal /><waitMilliSeconds />ForIterationFadeTimeInfiniteIteration H1F\"a b\""
        );
    }

    #[test]
    fn unknown_characters_are_echoed_uppercase() {
        let parsed = run("a;bq").unwrap();

        assert_eq!(parsed.trace.as_str(), "A;");
    }

    #[test]
    fn document_head_from_commands() {
        let parsed = run("X!X@0H04;X@0H11;X+\"Opening Night\";").unwrap();

        let document = parsed.document.unwrap();
        let head = document.head.unwrap();
        assert_eq!(head.schema_version(), crate::SchemaVersion::P400);
        assert_eq!(head.title(), "Opening Night");
        let Head::Predefined(head) = head else {
            panic!("expected a predefined head");
        };
        assert_eq!(head.schema_id, 17);
        assert!(document.body.is_some());
    }

    #[test]
    fn linked_head_takes_title_and_path() {
        let parsed = run("X!X+\"Show\";schemas/show.xsd;X@0H06;").unwrap();

        let Some(Head::Linked(head)) = parsed.document.and_then(|d| d.head) else {
            panic!("expected a linked head");
        };
        assert_eq!(head.title, "Show");
        assert_eq!(head.schema_path, "schemas/show.xsd");
        assert_eq!(head.schema_version, crate::SchemaVersion::P676);
    }

    #[test]
    fn inert_strings_are_dropped() {
        let features = Features {
            inert_strings: true,
            ..Features::default()
        };
        let parsed = parse("X!X+\"Show\";path;KF0H01;kf", features).unwrap();

        let Some(Head::Linked(head)) = parsed.document.and_then(|d| d.head) else {
            panic!("expected a linked head");
        };
        assert_eq!(head.title, "");
        assert_eq!(head.schema_path, "");
        assert_eq!(parsed.cue_list.len(), 1);
    }

    #[test]
    fn rewinding_does_not_lose_characters() {
        // the character after each `;` is processed twice, the second time as
        // the start of the next symbol
        let parsed = run("KF0H01;kfKF0H02;kf").unwrap();

        assert_eq!(parsed.cue_list.len(), 2);
        assert_eq!(parsed.cue_list[1].delay_ms, 2);
        assert!(parsed.cue_list.iter().all(KeyFrame::is_closed));
    }

    #[test]
    fn folds_single_characters_only() {
        assert_eq!(fold('k'), 'K');
        assert_eq!(fold('ß'), 'ß');
        assert_eq!(fold(';'), ';');
    }

    #[test]
    fn delay_markers_attach_nothing() {
        let parsed = run("KF0H01;WB0H02;kf").unwrap();

        assert!(parsed.cue_list[0].children().is_empty());
        assert!(parsed.trace.as_str().contains("<waitBeatSignal /> H02"));
    }
}
