use crate::model::NotifyError;
use crate::notifier::report::{split_message, MAX_MESSAGE_CHARS};
use reqwest::Client;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, warn};

pub struct TelegramNotifier {
    bot_token: String,
    chat_id: i64,
    client: Client,
}

impl TelegramNotifier {
    pub fn new(bot_token: String, chat_id: i64) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| NotifyError::ApiError(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self {
            bot_token,
            chat_id,
            client,
        })
    }

    /// Sends a single text message.
    pub async fn notify_text(&self, text: &str) -> Result<(), NotifyError> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);
        let response = match timeout(
            Duration::from_secs(10),
            self.client
                .post(&url)
                .form(&[("chat_id", self.chat_id.to_string()), ("text", text.to_string())])
                .send(),
        )
        .await
        {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                warn!("❌ Telegram send() failed: {:?}", e);
                return Err(NotifyError::ApiError(format!("Send failed: {}", e)));
            }
            Err(_) => {
                warn!("⏳ Telegram send() timed out");
                return Err(NotifyError::Unreachable);
            }
        };
        let status = response.status();
        let body = response.text().await.unwrap_or_else(|_| "unknown".into());
        if !status.is_success() {
            warn!("❌ Telegram API responded [{}]: {}", status, body);
            return Err(NotifyError::ApiError(format!("[{}] {}", status, body)));
        }
        info!("✅ Telegram message sent [{}]", status);
        Ok(())
    }

    /// Sends a report, split into as many messages as Telegram needs.
    pub async fn notify_report(&self, report: &str) -> Result<(), NotifyError> {
        let parts = split_message(report, MAX_MESSAGE_CHARS);
        info!("📤 Sending report in {} message(s)", parts.len());
        for part in &parts {
            self.notify_text(part).await?;
        }
        Ok(())
    }
}
