use api::proto::UpdateType;
use compact_str::CompactString;
use eyre::ensure;
use std::time::Duration;

pub const BASE_URL: &str = "https://api.telegram.org";

#[derive(Debug, Clone)]
pub struct CommunicatorConfig {
    pub api_url: CompactString,
    pub request_timeout: Duration,
}

impl Default for CommunicatorConfig {
    fn default() -> Self {
        Self {
            api_url: BASE_URL.into(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl CommunicatorConfig {
    pub fn verify(&self) -> eyre::Result<()> {
        ensure!(!self.api_url.is_empty(), "api url cannot be empty");
        ensure!(
            !self.request_timeout.is_zero(),
            "request timeout should be positive"
        );
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Route the updates are posted to.
    pub path: CompactString,
    /// Public https url announced with `setWebhook`, if any.
    pub public_url: Option<CompactString>,
    pub drop_pending_updates: bool,
    pub allowed_updates: Vec<UpdateType>,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            path: "/".into(),
            public_url: None,
            drop_pending_updates: false,
            allowed_updates: vec![
                UpdateType::Message,
                UpdateType::EditedMessage,
                UpdateType::ChannelPost,
                UpdateType::EditedChannelPost,
            ],
        }
    }
}

impl WebhookConfig {
    pub fn verify(&self) -> eyre::Result<()> {
        ensure!(
            self.path.starts_with('/'),
            "webhook path '{}' must start with '/'",
            self.path
        );
        if let Some(url) = &self.public_url {
            ensure!(
                url.starts_with("https://"),
                "telegram only delivers webhooks to https urls, got '{url}'"
            );
        }
        Ok(())
    }
}
