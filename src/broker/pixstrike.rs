use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::{BrokerApi, BrokerAuthentication, BrokerError};

/// HTTP client for the Pixstrike broker.
pub struct PixStrikeClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default = "default_success")]
    success: bool,
    #[serde(default)]
    balance: f64,
}

fn default_success() -> bool {
    true
}

impl PixStrikeClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BrokerError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn login_url(&self) -> String {
        format!("{}/auth/login", self.base_url)
    }
}

#[async_trait]
impl BrokerApi for PixStrikeClient {
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<BrokerAuthentication, BrokerError> {
        let response = self
            .client
            .post(self.login_url())
            .json(&LoginRequest { email, password })
            .send()
            .await?;

        let status = response.status();
        if matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            debug!(%status, "Broker rejected the login.");
            return Ok(BrokerAuthentication::rejected());
        }
        if !status.is_success() {
            warn!(%status, "Broker login returned an unexpected status.");
            return Err(BrokerError::UnexpectedResponse(format!("status {status}")));
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| BrokerError::UnexpectedResponse(e.to_string()))?;

        if !body.success {
            return Ok(BrokerAuthentication::rejected());
        }
        if !body.balance.is_finite() || body.balance < 0.0 {
            return Err(BrokerError::UnexpectedResponse(format!(
                "invalid balance {}",
                body.balance
            )));
        }

        Ok(BrokerAuthentication {
            success: true,
            balance: body.balance,
        })
    }
}
