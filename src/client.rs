use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use crate::chat::composer::{MessageSender, Outbound, SendReceipt};
use crate::config::{Config, ServerConfig};
use crate::poller::UpdateSource;
use crate::update::{CommandDescriptor, UpdateBatch};

/// Profile as served by `/getBotData`. Every field may be missing.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RawBotProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// HTTP client for the imitation backend.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    server: ServerConfig,
}

impl HttpClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.poll.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            server: config.server.clone(),
        })
    }

    /// GET a JSON document; `Ok(None)` on 204 No Content.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<Option<T>> {
        let url = self.server.endpoint(path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Content-Type", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("{} returned {}: {}", path, status, body);
        }

        let body = response
            .json()
            .await
            .with_context(|| format!("Failed to parse {} response", path))?;
        Ok(Some(body))
    }

    pub async fn fetch_commands(&self) -> Result<Vec<CommandDescriptor>> {
        Ok(self
            .get_json::<Vec<CommandDescriptor>>("getCommands")
            .await?
            .unwrap_or_default())
    }

    pub async fn fetch_bot_profile(&self) -> Result<Option<RawBotProfile>> {
        self.get_json("getBotData").await
    }
}

#[async_trait]
impl UpdateSource for HttpClient {
    async fn fetch_updates(&self) -> Result<Option<UpdateBatch>> {
        self.get_json("getUpdates").await
    }
}

#[async_trait]
impl MessageSender for HttpClient {
    async fn send(&self, outbound: &Outbound) -> Result<SendReceipt> {
        let url = self.server.endpoint("sendMessage");
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(outbound)
            .send()
            .await
            .with_context(|| format!("Failed to reach {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("sendMessage returned {}: {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse sendMessage response")
    }
}
