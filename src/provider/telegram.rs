use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::{configuration::Config, error::Error};

const API_BASE: &str = "https://api.telegram.org";

/// Outbound chat seam. One call per chunk; the caller owns ordering and
/// abort-on-failure semantics.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(&self, text: &str) -> Result<(), Error>;
}

pub struct TelegramClient {
    client: Client,
    token: String,
    chat_id: String,
}

impl TelegramClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        // The client timeout bounds every chunk send with the same deadline.
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(TelegramClient {
            client,
            token: config.telegram_token.to_owned(),
            chat_id: config.telegram_chat_id.to_owned(),
        })
    }
}

#[derive(Debug, Serialize)]
struct SendMessageBody<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send_message(&self, text: &str) -> Result<(), Error> {
        let url = format!("{}/bot{}/sendMessage", API_BASE, self.token);
        let body = SendMessageBody {
            chat_id: &self.chat_id,
            text,
            parse_mode: "HTML",
        };

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::DeliveryError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::DeliveryError(format!(
                "telegram returned {}: {}",
                status, detail
            )));
        }

        Ok(())
    }
}
