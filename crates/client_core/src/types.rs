use shared::protocol::SubmissionReceipt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
}

/// Formatting operations the rich-text surface understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattingCommand {
    Bold,
    Italic,
    Underline,
    Strike,
    SetLink { href: String },
    UnsetLink,
}

/// Which of the four submit conditions currently hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Validity {
    pub has_content: bool,
    pub has_markets: bool,
    pub has_client: bool,
    pub has_date: bool,
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        self.has_content && self.has_markets && self.has_client && self.has_date
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Submitted(SubmissionReceipt),
    /// The form was incomplete; nothing was sent.
    Blocked(Validity),
    /// Another submission is still in flight; nothing was sent.
    InFlight,
}

#[derive(Debug, Clone)]
pub enum FormEvent {
    OptionsUpdated { query: String, count: usize },
    LookupFailed { query: String, message: String },
    Submitted { receipt: SubmissionReceipt },
    SubmissionFailed { message: String },
}
