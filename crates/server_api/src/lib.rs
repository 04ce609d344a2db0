use std::sync::Arc;

use serde::Deserialize;
use shared::{
    domain::ClientOption,
    error::{ApiError, ApiException, ErrorCode},
    protocol::{SubmissionPayload, SubmissionReceipt},
};
use tracing::{debug, info, warn};

pub const DEFAULT_EMPTY_QUERY_LIMIT: usize = 8;

#[derive(Clone)]
pub struct ApiContext {
    pub directory: ClientDirectory,
}

/// In-memory client catalog answering autocomplete lookups.
#[derive(Debug, Clone)]
pub struct ClientDirectory {
    clients: Arc<Vec<ClientOption>>,
    empty_query_limit: usize,
}

impl ClientDirectory {
    pub fn new(clients: Vec<ClientOption>, empty_query_limit: usize) -> Self {
        Self {
            clients: Arc::new(clients),
            empty_query_limit,
        }
    }

    /// Stand-in catalog until the client warehouse is wired up.
    pub fn demo() -> Self {
        Self::new(demo_clients(), DEFAULT_EMPTY_QUERY_LIMIT)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }

    /// Case-insensitive substring match on the name, in catalog order.
    /// An empty query returns a bounded prefix of the catalog instead.
    pub fn search(&self, query: &str) -> Vec<ClientOption> {
        if query.is_empty() {
            return self
                .clients
                .iter()
                .take(self.empty_query_limit)
                .cloned()
                .collect();
        }

        let needle = query.to_lowercase();
        self.clients
            .iter()
            .filter(|client| client.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

pub fn demo_clients() -> Vec<ClientOption> {
    vec![
        ClientOption::new("1", "Pisgah Legal Services"),
        ClientOption::new("2", "French Lick Resort"),
        ClientOption::new("3", "WakeUP Wake County"),
        ClientOption::new("4", "Raleigh Forward"),
    ]
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    clients: Vec<ClientOption>,
}

/// Parses a TOML client catalog made of `[[clients]]` tables with `id` and `name`.
pub fn parse_client_catalog(raw: &str) -> Result<Vec<ClientOption>, ApiException> {
    let file: CatalogFile = toml::from_str(raw).map_err(|err| {
        ApiException::new(
            ErrorCode::Validation,
            format!("invalid client catalog: {err}"),
        )
    })?;

    if let Some(blank) = file
        .clients
        .iter()
        .find(|client| client.id.as_str().trim().is_empty() || client.name.trim().is_empty())
    {
        return Err(ApiException::new(
            ErrorCode::Validation,
            format!("client catalog entry has a blank id or name: {blank:?}"),
        ));
    }

    Ok(file.clients)
}

pub fn search_clients(ctx: &ApiContext, query: &str) -> Vec<ClientOption> {
    let matches = ctx.directory.search(query);
    debug!(query, matches = matches.len(), "client search");
    matches
}

/// Echoes a submission body back. A missing body counts as `{}`.
pub fn receive_submission(body: &[u8]) -> Result<SubmissionReceipt, ApiError> {
    let received: serde_json::Value = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::json!({})
    } else {
        serde_json::from_slice(body).map_err(|err| {
            ApiError::new(
                ErrorCode::Validation,
                format!("submission body is not valid JSON: {err}"),
            )
        })?
    };

    match serde_json::from_value::<SubmissionPayload>(received.clone()) {
        Ok(payload) => info!(
            client_id = %payload.client.id,
            markets = payload.markets.len(),
            date = %payload.date,
            html_bytes = payload.html.len(),
            "submission received"
        ),
        Err(err) => warn!(%err, "submission body does not match the intake payload shape"),
    }

    Ok(SubmissionReceipt::echo(received))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
