use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::ClientOption,
    protocol::{SubmissionPayload, SubmissionReceipt, CLIENTS_ROUTE, SUBMISSIONS_ROUTE},
};
use url::Url;

use crate::{error::IntakeError, ClientLookup, SubmissionSink};

/// Talks to the intake server's client search and submission routes.
#[derive(Debug, Clone)]
pub struct HttpIntakeBackend {
    http: Client,
    base_url: Url,
}

impl HttpIntakeBackend {
    pub fn new(server_url: &str) -> std::result::Result<Self, IntakeError> {
        let mut base_url =
            Url::parse(server_url.trim()).map_err(|source| IntakeError::InvalidServerUrl {
                url: server_url.to_string(),
                source,
            })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, route: &str) -> Result<Url> {
        self.base_url
            .join(route.trim_start_matches('/'))
            .with_context(|| format!("failed to build url for {route}"))
    }
}

#[async_trait]
impl ClientLookup for HttpIntakeBackend {
    async fn search_clients(&self, query: &str) -> Result<Vec<ClientOption>> {
        let options = self
            .http
            .get(self.endpoint(CLIENTS_ROUTE)?)
            .query(&[("q", query)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(options)
    }
}

#[async_trait]
impl SubmissionSink for HttpIntakeBackend {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt> {
        let receipt: SubmissionReceipt = self
            .http
            .post(self.endpoint(SUBMISSIONS_ROUTE)?)
            .json(payload)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if !receipt.is_ok() {
            return Err(anyhow!(
                "submission endpoint answered with status '{}'",
                receipt.status
            ));
        }
        Ok(receipt)
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
