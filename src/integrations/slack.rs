//! Chat notifications through an incoming-webhook URL.

use serde_json::{json, Map, Value};

use crate::config::SlackConfig;
use crate::integrations::http_client::{
    JsonRequester, OutboundRequest, ReqwestTransport, RequestError, Transport,
};

/// Posts plain-text messages to a configured chat webhook.
#[derive(Debug, Clone)]
pub struct SlackNotifier<T = ReqwestTransport> {
    requester: JsonRequester<T>,
    config: SlackConfig,
}

impl<T: Transport> SlackNotifier<T> {
    pub fn new(requester: JsonRequester<T>, config: SlackConfig) -> Self {
        Self { requester, config }
    }

    pub fn is_configured(&self) -> bool {
        self.config.webhook_url.is_some()
    }

    /// Message payload; `extra` keys override the defaults.
    pub fn build_payload(&self, text: &str, extra: Option<Map<String, Value>>) -> Value {
        let mut payload = json!({
            "text": text,
            "username": self.config.username,
            "icon_emoji": self.config.icon_emoji,
        });
        if let Some(obj) = payload.as_object_mut() {
            if let Some(channel) = &self.config.channel {
                obj.insert("channel".into(), Value::String(channel.clone()));
            }
            if let Some(extra) = extra {
                obj.extend(extra);
            }
        }
        payload
    }

    /// Send `text`. Returns `Ok(false)` without any I/O when no URL is set.
    pub async fn send(&self, text: &str) -> Result<bool, RequestError> {
        self.send_with(text, None).await
    }

    pub async fn send_with(
        &self,
        text: &str,
        extra: Option<Map<String, Value>>,
    ) -> Result<bool, RequestError> {
        let Some(url) = &self.config.webhook_url else {
            return Ok(false);
        };
        // Incoming webhooks answer with a plain-text `ok`.
        let request =
            OutboundRequest::post(url.as_str(), self.build_payload(text, extra)).accept_text();
        self.requester.request(&request).await?;
        Ok(true)
    }
}
