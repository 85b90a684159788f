use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use crate::{Channel, Message, Transport, TransportError};

pub const DEFAULT_API_URL: &str = "https://api.twilio.com";

/// Credentials and endpoint of the messaging API
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    pub api_url: String,
    pub account_sid: String,
    pub auth_token: String,
    pub channel: Channel,
}

#[derive(Debug, Deserialize)]
struct MessageCreated {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
}

/// Sends messages through the Twilio messages API.
pub struct TwilioTransport {
    config: TwilioConfig,
    client: reqwest::Client,
}

impl TwilioTransport {
    pub fn new(config: TwilioConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { config, client })
    }

    /// Endpoint for creating messages
    pub fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_url.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

#[async_trait]
impl Transport for TwilioTransport {
    async fn send(&self, message: &Message) -> Result<(), TransportError> {
        let from = self.config.channel.address(&message.from);
        let to = self.config.channel.address(&message.to);
        let params = [
            ("Body", message.body.as_str()),
            ("From", from.as_str()),
            ("To", to.as_str()),
        ];

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ApiError>()
                .await
                .ok()
                .and_then(|e| e.message)
                .unwrap_or_else(|| status.to_string());
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        match response.json::<MessageCreated>().await {
            Ok(created) => log::debug!("message {} queued for {}", created.sid, to),
            Err(e) => log::debug!("message queued for {}, unreadable response: {}", to, e),
        }
        Ok(())
    }
}
