/// States of the tokenizer.  Every character of the input is processed in
/// exactly one state, which decides the state for the next character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum State {
    /// Between symbols, dispatching on the leading letter
    #[default]
    Default,

    // Second letter of a two letter symbol
    LetterC,
    LetterK,
    LetterB,
    LetterW,
    LetterF,
    LetterI,

    /// Inside a quoted span, echoed verbatim
    QuotationMark,

    /// A top-level literal, waiting for its radix marker
    Number,
    NumberHex,
    NumberDec,
    NumberBin,

    /// After `X`, waiting for the document command
    Command,

    // Parameter protocol
    WaitParamNum,
    ReceivedParamNum,
    NoNumParam,
    WaitParamStr,
    ReceivedParamStr,
}

impl State {
    /// Is this state collecting a parameter literal
    pub fn is_waiting(self) -> bool {
        matches!(self, State::WaitParamNum | State::WaitParamStr)
    }
}
