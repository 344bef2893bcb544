use async_trait::async_trait;
use thiserror::Error;

pub mod pixstrike;

pub use pixstrike::PixStrikeClient;

#[derive(Error, Debug)]
pub enum BrokerError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Unexpected broker response: {0}")]
    UnexpectedResponse(String),
}

/// Result of a broker login attempt. `balance` is only meaningful on success.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrokerAuthentication {
    pub success: bool,
    pub balance: f64,
}

impl BrokerAuthentication {
    pub fn rejected() -> Self {
        Self {
            success: false,
            balance: 0.0,
        }
    }
}

/// The betting broker the bot trades on.
#[async_trait]
pub trait BrokerApi: Send + Sync {
    /// Logs in with the user's broker account and reports the current balance.
    /// Wrong credentials are a successful call with `success == false`;
    /// `Err` is reserved for transport and protocol failures.
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<BrokerAuthentication, BrokerError>;
}
