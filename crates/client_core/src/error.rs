use thiserror::Error;

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("client lookup failed: {0}")]
    LookupFailure(String),
    #[error("submission failed: {0}")]
    SubmissionFailure(String),
    #[error("'{0}' is not a YYYY-MM-DD date")]
    InvalidDate(String),
    #[error("link '{href}' rejected: {reason}")]
    InvalidLink { href: String, reason: String },
    #[error("invalid server url '{url}': {source}")]
    InvalidServerUrl {
        url: String,
        source: url::ParseError,
    },
}
