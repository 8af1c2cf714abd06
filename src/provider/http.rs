use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use crate::{configuration::Config, error::Error, types::ProtocolRecord};

// The feed endpoint is fixed, not configuration.
const PROTOCOLS_URL: &str = "https://api.llama.fi/protocols";

#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_protocols(&self) -> Result<Vec<ProtocolRecord>, Error>;
}

#[derive(Debug)]
pub struct LlamaFeed {
    client: Client,
}

impl LlamaFeed {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(LlamaFeed { client })
    }
}

#[async_trait]
impl FeedSource for LlamaFeed {
    async fn fetch_protocols(&self) -> Result<Vec<ProtocolRecord>, Error> {
        let response = self.client.get(PROTOCOLS_URL).send().await?;

        if !response.status().is_success() {
            return Err(Error::FeedFetchError(format!(
                "feed returned status {}",
                response.status()
            )));
        }

        let records = response
            .json::<Vec<ProtocolRecord>>()
            .await
            .map_err(|e| Error::FeedFetchError(e.to_string()))?;

        info!("fetched {} protocols from feed", records.len());
        Ok(records)
    }
}
