use std::{collections::BTreeSet, sync::OnceLock};

use chrono::NaiveDate;
use regex::Regex;
use shared::{
    domain::{ClientOption, Market},
    protocol::SubmissionPayload,
};
use url::Url;

use crate::{
    error::IntakeError,
    types::{FormattingCommand, Validity},
};

const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";
const LINK_PROTOCOLS: &[&str] = &["http", "https", "mailto"];

fn empty_paragraph() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)<p>\s*(?:<br\s*/?>)?\s*</p>").expect("empty paragraph pattern compiles")
    })
}

/// True when the markup carries something other than empty paragraphs and whitespace.
pub fn has_meaningful_content(markup: &str) -> bool {
    !empty_paragraph().replace_all(markup, "").trim().is_empty()
}

/// Everything the user has picked so far. Any combination of filled and empty
/// fields is representable; only [`SelectionState::build_payload`] enforces completeness.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected_markets: BTreeSet<Market>,
    selected_client: Option<ClientOption>,
    date: Option<NaiveDate>,
    editor_content: String,
    client_query: String,
    link_url: String,
}

impl SelectionState {
    /// Returns whether the market is selected after the toggle.
    pub fn toggle_market(&mut self, market: Market) -> bool {
        if self.selected_markets.remove(&market) {
            false
        } else {
            self.selected_markets.insert(market);
            true
        }
    }

    pub fn is_market_selected(&self, market: Market) -> bool {
        self.selected_markets.contains(&market)
    }

    /// Selected markets in catalog order.
    pub fn selected_markets(&self) -> Vec<Market> {
        self.selected_markets.iter().copied().collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selected_markets.len()
    }

    /// Picks a client and mirrors its name into the search box.
    pub fn set_client(&mut self, option: ClientOption) {
        self.client_query = option.name.clone();
        self.selected_client = Some(option);
    }

    pub fn clear_client(&mut self) {
        self.selected_client = None;
    }

    pub fn selected_client(&self) -> Option<&ClientOption> {
        self.selected_client.as_ref()
    }

    /// Accepts what a date input yields: `YYYY-MM-DD`, or an empty string to clear.
    pub fn set_date(&mut self, raw: &str) -> Result<(), IntakeError> {
        let raw = raw.trim();
        if raw.is_empty() {
            self.date = None;
            return Ok(());
        }
        let date = NaiveDate::parse_from_str(raw, DATE_INPUT_FORMAT)
            .map_err(|_| IntakeError::InvalidDate(raw.to_string()))?;
        self.date = Some(date);
        Ok(())
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn set_content(&mut self, markup: impl Into<String>) {
        self.editor_content = markup.into();
    }

    pub fn content(&self) -> &str {
        &self.editor_content
    }

    pub fn set_client_query(&mut self, text: impl Into<String>) {
        self.client_query = text.into();
    }

    pub fn client_query(&self) -> &str {
        &self.client_query
    }

    pub fn set_link_url(&mut self, text: impl Into<String>) {
        self.link_url = text.into();
    }

    pub fn link_url(&self) -> &str {
        &self.link_url
    }

    /// Command for the "apply link" button: an empty url removes the link.
    pub fn link_command(&self) -> Result<FormattingCommand, IntakeError> {
        let href = self.link_url.trim();
        if href.is_empty() {
            return Ok(FormattingCommand::UnsetLink);
        }

        let parsed = Url::parse(href).map_err(|err| IntakeError::InvalidLink {
            href: href.to_string(),
            reason: err.to_string(),
        })?;
        if !LINK_PROTOCOLS.contains(&parsed.scheme()) {
            return Err(IntakeError::InvalidLink {
                href: href.to_string(),
                reason: format!("unsupported protocol '{}'", parsed.scheme()),
            });
        }

        Ok(FormattingCommand::SetLink {
            href: href.to_string(),
        })
    }

    pub fn validity(&self) -> Validity {
        Validity {
            has_content: has_meaningful_content(&self.editor_content),
            has_markets: !self.selected_markets.is_empty(),
            has_client: self.selected_client.is_some(),
            has_date: self.date.is_some(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validity().is_valid()
    }

    /// A fresh payload, or `None` while any submit condition is unmet.
    pub fn build_payload(&self) -> Option<SubmissionPayload> {
        if !self.is_valid() {
            return None;
        }
        Some(SubmissionPayload {
            html: self.editor_content.clone(),
            markets: self.selected_markets(),
            client: self.selected_client.clone()?,
            date: self.date?,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod tests;
