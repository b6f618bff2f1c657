use crate::config::CommunicatorConfig;
use api::{
    basic_types::MessageId,
    endpoints::{DeleteMessage, Endpoint, SetWebhook},
    proto::ChatId,
    request::{DeleteMessageRequest, SetWebhookRequest},
    response::CommonResponse,
};
use async_trait::async_trait;
use compact_str::CompactString;
use eyre::eyre;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// The slice of the Bot API the janitor talks to.
#[async_trait]
pub trait Communicate: Send + Sync {
    async fn delete_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> eyre::Result<CommonResponse<bool>>;

    async fn set_webhook(&self, request: SetWebhookRequest) -> eyre::Result<CommonResponse<bool>>;
}

#[derive(Clone)]
pub struct Communicator {
    token: Arc<CompactString>,
    api_url: CompactString,
    client: reqwest::Client,
}

impl Communicator {
    pub fn new(token: &str) -> eyre::Result<Self> {
        Self::with_config(token, CommunicatorConfig::default())
    }

    pub fn with_config(token: &str, config: CommunicatorConfig) -> eyre::Result<Self> {
        config.verify()?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            token: Arc::new(token.into()),
            api_url: config.api_url.trim_end_matches('/').into(),
            client,
        })
    }

    fn query_url<E: Endpoint>(&self) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, E::PATH)
    }

    /// Sends one request and decodes the Bot API envelope, whatever the http status.
    pub(crate) async fn send_request<E>(
        &self,
        data: &E::Request,
    ) -> eyre::Result<CommonResponse<E::Response>>
    where
        E: Endpoint,
        E::Request: Serialize,
        E::Response: for<'de> Deserialize<'de> + std::fmt::Debug,
    {
        let url = self.query_url::<E>();
        // reqwest errors carry the url, and the url carries the token
        let request = self
            .client
            .request(E::METHOD, url)
            .json(data)
            .build()
            .map_err(reqwest::Error::without_url)?;
        let response = self
            .client
            .execute(request)
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(reqwest::Error::without_url)?;
        debug!("{} responded with {status}: {text}", E::PATH);
        let response =
            serde_json::from_str::<CommonResponse<E::Response>>(&text).map_err(|err| {
                eyre!(
                    "{}, status = {}, type = {:?}, response = {}",
                    err,
                    status,
                    std::any::type_name::<CommonResponse<E::Response>>(),
                    text
                )
            })?;
        Ok(response)
    }
}

#[async_trait]
impl Communicate for Communicator {
    async fn delete_message(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
    ) -> eyre::Result<CommonResponse<bool>> {
        let request = DeleteMessageRequest {
            chat_id,
            message_id,
        };
        self.send_request::<DeleteMessage>(&request).await
    }

    async fn set_webhook(&self, request: SetWebhookRequest) -> eyre::Result<CommonResponse<bool>> {
        self.send_request::<SetWebhook>(&request).await
    }
}
