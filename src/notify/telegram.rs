// src/notify/telegram.rs
use anyhow::{anyhow, Context, Result};
use metrics::counter;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ENV_TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
const DEFAULT_API_BASE: &str = "https://api.telegram.org";

#[derive(Clone)]
pub struct TelegramNotifier {
    token: Option<String>,
    api_base: String,
    client: Client,
    timeout: Duration,
}

#[derive(Serialize)]
struct SendMessageReq<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

#[derive(Deserialize)]
struct ApiResp {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<SentMessage>,
}

#[derive(Deserialize)]
struct SentMessage {
    message_id: i64,
}

/// Outcome for one chat in a sector fan-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delivery {
    pub chat_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TelegramNotifier {
    pub fn from_env() -> Self {
        Self::with_token(std::env::var(ENV_TELEGRAM_BOT_TOKEN).ok())
    }

    pub fn new(token: String) -> Self {
        Self::with_token(Some(token))
    }

    fn with_token(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.trim().is_empty()),
            api_base: DEFAULT_API_BASE.to_string(),
            client: Client::new(),
            timeout: Duration::from_secs(10),
        }
    }

    /// Point at a different Bot API host (tests, self-hosted bot API).
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    pub fn is_configured(&self) -> bool {
        self.token.is_some()
    }

    /// Send an HTML message; returns the Telegram message id.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<i64> {
        let result = self.post_message(chat_id, text).await;
        match &result {
            Ok(id) => {
                counter!("alerts_sent_total").increment(1);
                tracing::info!(chat_id, message_id = id, "telegram message sent");
            }
            Err(e) => {
                counter!("alerts_failed_total").increment(1);
                tracing::warn!(chat_id, error = %e, "telegram send failed");
            }
        }
        result
    }

    async fn post_message(&self, chat_id: &str, text: &str) -> Result<i64> {
        let Some(token) = &self.token else {
            return Err(anyhow!("{ENV_TELEGRAM_BOT_TOKEN} not set"));
        };
        let url = format!("{}/bot{}/sendMessage", self.api_base, token);
        let body = SendMessageReq {
            chat_id,
            text,
            parse_mode: "HTML",
        };

        let resp: ApiResp = self
            .client
            .post(url)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await
            .context("telegram request")?
            .json()
            .await
            .context("telegram response")?;

        if !resp.ok {
            return Err(anyhow!(resp
                .description
                .unwrap_or_else(|| "telegram api error".to_string())));
        }
        resp.result
            .map(|m| m.message_id)
            .ok_or_else(|| anyhow!("telegram response without message_id"))
    }

    /// Send `text` to every chat concurrently. Per-chat results keep input order.
    pub async fn broadcast(&self, chat_ids: &[String], text: &str) -> Vec<Delivery> {
        let mut set = tokio::task::JoinSet::new();
        for (idx, chat_id) in chat_ids.iter().enumerate() {
            let this = self.clone();
            let chat_id = chat_id.clone();
            let text = text.to_string();
            set.spawn(async move {
                let res = this.send_message(&chat_id, &text).await;
                (idx, chat_id, res)
            });
        }

        let mut out: Vec<(usize, Delivery)> = Vec::with_capacity(chat_ids.len());
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((idx, chat_id, res)) => out.push((
                    idx,
                    Delivery {
                        chat_id,
                        success: res.is_ok(),
                        message_id: res.as_ref().ok().copied(),
                        error: res.err().map(|e| e.to_string()),
                    },
                )),
                Err(e) => tracing::warn!(error = %e, "telegram send task failed"),
            }
        }
        out.sort_by_key(|(idx, _)| *idx);
        out.into_iter().map(|(_, d)| d).collect()
    }
}
