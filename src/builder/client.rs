//! HTTP submitter for field definitions

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info};

use crate::builder::errors::SubmissionFailure;
use crate::config::Config;
use crate::models::FieldPayload;

/// Sends a payload to wherever field definitions are stored
#[async_trait]
pub trait FieldSubmitter: Send + Sync {
    async fn submit(&self, payload: &FieldPayload) -> Result<Value, SubmissionFailure>;
}

/// Posts payloads as JSON to a configured endpoint
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    client: Client,
    endpoint: String,
}

impl HttpSubmitter {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Build a submitter with the client settings from `config`
    pub fn from_config(config: &Config) -> Result<Self, SubmissionFailure> {
        let mut builder = Client::builder().user_agent(&config.http.user_agent);
        if let Some(timeout) = config.http_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self::new(builder.build()?, config.endpoint.clone()))
    }
}

#[async_trait]
impl FieldSubmitter for HttpSubmitter {
    async fn submit(&self, payload: &FieldPayload) -> Result<Value, SubmissionFailure> {
        info!("POST {} ({} choices)", self.endpoint, payload.choices.len());

        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmissionFailure::Status {
                status_code: status.as_u16(),
            });
        }

        let value: Value = response.json().await.map_err(SubmissionFailure::Body)?;
        debug!("Endpoint response: {}", value);
        Ok(value)
    }
}
