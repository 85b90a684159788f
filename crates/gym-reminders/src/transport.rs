use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error as ThisError;

#[derive(ThisError, Debug)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Message rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// An outbound text message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub body: String,
    pub from: String,
    pub to: String,
}

/// Delivers messages to members. Delivery itself is
/// the concern of the service behind the transport.
#[async_trait]
pub trait Transport {
    async fn send(&self, message: &Message) -> Result<(), TransportError>;
}

/// The messaging channel decides how addresses are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Channel {
    #[default]
    Whatsapp,
    Sms,
}

impl Channel {
    /// Address a phone number on this channel
    pub fn address(&self, number: &str) -> String {
        match self {
            Channel::Whatsapp => format!("whatsapp:{}", number),
            Channel::Sms => number.to_string(),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Whatsapp => write!(f, "whatsapp"),
            Channel::Sms => write!(f, "sms"),
        }
    }
}

#[derive(ThisError, Debug, PartialEq, Eq)]
#[error("Unknown channel {0}, expected whatsapp or sms")]
pub struct UnknownChannel(String);

impl FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "whatsapp" => Ok(Channel::Whatsapp),
            "sms" => Ok(Channel::Sms),
            _ => Err(UnknownChannel(s.to_string())),
        }
    }
}

/// Keeps messages instead of sending them.
#[derive(Default)]
pub struct DryRunTransport {
    messages: Mutex<Vec<Message>>,
}

impl DryRunTransport {
    /// Messages that would have been sent, in order
    pub fn into_messages(self) -> Vec<Message> {
        self.messages
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Transport for DryRunTransport {
    async fn send(&self, message: &Message) -> Result<(), TransportError> {
        log::info!(
            "dry run: message from {} to {}: {}",
            message.from,
            message.to,
            message.body
        );
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message.clone());
        Ok(())
    }
}
