// SMS alerts via the Twilio REST API.
use std::env;
use std::time::Duration;

use reqwest::Client;
use tokio::time::timeout;
use tracing::{info, warn};

use super::Notifier;
use crate::model::NotifyError;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub struct SmsNotifier {
    account_sid: String,
    auth_token: String,
    phone_from: String,
    phone_to: String,
    client: Client,
}

impl SmsNotifier {
    pub fn new(
        account_sid: String,
        auth_token: String,
        phone_from: String,
        phone_to: String,
    ) -> Self {
        let client = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .expect("failed to build HTTP client");
        Self { account_sid, auth_token, phone_from, phone_to, client }
    }

    /// SMS alerts are enabled only when all four Twilio variables are set,
    /// mirroring how the rest of the config treats the threshold: absent
    /// means disabled, not an error.
    pub fn from_env() -> Option<Self> {
        let account_sid = env::var("TWILIO_ACCOUNT_SID").ok()?;
        let auth_token = env::var("TWILIO_AUTH_TOKEN").ok()?;
        let phone_from = env::var("TWILIO_PHONE_FROM").ok()?;
        let phone_to = env::var("TWILIO_PHONE_TO").ok()?;
        Some(Self::new(account_sid, auth_token, phone_from, phone_to))
    }

    pub fn recipient(&self) -> &str {
        &self.phone_to
    }
}

#[async_trait::async_trait]
impl Notifier for SmsNotifier {
    fn log(&self, lines: &[String]) {
        for line in lines {
            info!("{line}");
        }
    }

    async fn alert(&self, message: &str) -> Result<(), NotifyError> {
        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        );
        let params = [
            ("From", self.phone_from.as_str()),
            ("To", self.phone_to.as_str()),
            ("Body", message),
        ];

        let request = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send();
        let response = match timeout(SEND_TIMEOUT, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!("SMS send failed: {e}");
                return Err(NotifyError::ApiError(e.to_string()));
            }
            Err(_) => {
                warn!("SMS send timed out");
                return Err(NotifyError::Unreachable);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "unknown".into());
            warn!("Twilio API responded [{status}]: {body}");
            return Err(NotifyError::ApiError(format!("status {status}")));
        }
        info!("SMS alert sent to {}", self.phone_to);
        Ok(())
    }
}
