use anyhow::{Context, Result};
use reqwest::blocking::Client;
use std::time::Duration;

use crate::error::HistoryError;
use crate::graphql::query::{GraphQlRequest, HISTORY_QUERY, HistoryVariables};
use crate::graphql::response::HistoryResponse;
use crate::history::config::EndpointConfig;
use crate::history::model::RawActivityEdge;

/// Anything that can serve one page of the history query.
pub trait ActivitySource {
    fn fetch_page(
        &self,
        variables: &HistoryVariables,
    ) -> Result<Vec<RawActivityEdge>, HistoryError>;
}

pub struct GraphQlClient {
    client: Client,
    url: String,
    username: String,
    password: String,
}

impl GraphQlClient {
    pub fn new(endpoint: &EndpointConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = endpoint.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().context("failed to build http client")?;

        Ok(Self {
            client,
            url: endpoint.url.trim().to_string(),
            username: endpoint.username.clone(),
            password: endpoint.password.clone(),
        })
    }
}

impl ActivitySource for GraphQlClient {
    fn fetch_page(
        &self,
        variables: &HistoryVariables,
    ) -> Result<Vec<RawActivityEdge>, HistoryError> {
        let payload = GraphQlRequest {
            query: HISTORY_QUERY,
            variables,
        };

        let response = self
            .client
            .post(&self.url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&payload)
            .send()
            .map_err(|err| HistoryError::Transport {
                message: err.to_string(),
            })?;

        let status = response.status();
        let body = response.text().map_err(|err| HistoryError::Transport {
            message: format!("failed to read response body: {err}"),
        })?;

        if !status.is_success() {
            return Err(HistoryError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed =
            HistoryResponse::parse(&body).map_err(|err| HistoryError::MalformedResponse {
                status: status.as_u16(),
                message: err.to_string(),
                body: body.clone(),
            })?;
        if parsed.has_errors() {
            return Err(HistoryError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(parsed.into_edges())
    }
}
