use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{ClientOption, Market};

pub const CLIENTS_ROUTE: &str = "/api/clients";
pub const SUBMISSIONS_ROUTE: &str = "/api/submissions";
pub const RECEIPT_STATUS_OK: &str = "ok";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientSearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Body posted to the submission route.
///
/// `date` travels as `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPayload {
    pub html: String,
    pub markets: Vec<Market>,
    pub client: ClientOption,
    pub date: NaiveDate,
}

/// Placeholder acknowledgement: the posted body echoed back with a status marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub received: serde_json::Value,
    pub status: String,
}

impl SubmissionReceipt {
    pub fn echo(received: serde_json::Value) -> Self {
        Self {
            received,
            status: RECEIPT_STATUS_OK.to_string(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == RECEIPT_STATUS_OK
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
