use crate::{classifier::DeleteTarget, communicator::Communicate};
use api::{
    proto::ChatId,
    response::{ApiErrorKind, CommonResponse, ErrorResponse},
};
use derive_more::Display;
use log::{error, info, warn};

/// How a single best-effort `deleteMessage` call ended.
#[derive(Debug, Display)]
pub enum DeleteOutcome {
    #[display(fmt = "deleted")]
    Deleted,
    /// Deleted already, by someone else or by an earlier delivery.
    #[display(fmt = "not found")]
    NotFound,
    /// The bot lacks the right to delete, or the message is too old.
    #[display(fmt = "forbidden: {}", _0)]
    Forbidden(ErrorResponse),
    #[display(fmt = "chat not found")]
    ChatNotFound,
    /// Any other 400. Telegram answers these for stale or malformed targets
    /// in normal operation, so they are logged as warnings.
    #[display(fmt = "rejected: {}", _0)]
    Rejected(ErrorResponse),
    #[display(fmt = "failed: {}", _0)]
    Failed(eyre::Report),
}

impl DeleteOutcome {
    /// Whether the outcome is expected in normal operation.
    pub fn is_benign(&self) -> bool {
        !matches!(self, DeleteOutcome::Failed(_))
    }

    fn from_error(err: ErrorResponse) -> Self {
        match err.kind() {
            ApiErrorKind::MessageNotFound => DeleteOutcome::NotFound,
            ApiErrorKind::Forbidden => DeleteOutcome::Forbidden(err),
            ApiErrorKind::ChatNotFound => DeleteOutcome::ChatNotFound,
            ApiErrorKind::BadRequest => DeleteOutcome::Rejected(err),
            ApiErrorKind::Other => DeleteOutcome::Failed(err.into()),
        }
    }
}

/// Deletes the targeted service message once and logs how it went.
///
/// Never fails and never retries: every error is absorbed into the outcome.
pub async fn sweep(comm: &dyn Communicate, target: &DeleteTarget<'_>) -> DeleteOutcome {
    let DeleteTarget {
        chat_id,
        message_id,
        event,
    } = *target;
    info!("sending delete request: chat_id={chat_id}, message_id={message_id}");

    let outcome = match comm.delete_message(ChatId::from(chat_id), message_id).await {
        Ok(CommonResponse::Ok(true)) => DeleteOutcome::Deleted,
        // deleteMessage only ever answers `true` on success
        Ok(CommonResponse::Ok(false)) => {
            DeleteOutcome::Failed(eyre::eyre!("deleteMessage returned false"))
        }
        Ok(CommonResponse::Err(err)) => DeleteOutcome::from_error(err),
        Err(report) => DeleteOutcome::Failed(report),
    };

    match &outcome {
        DeleteOutcome::Deleted => {
            info!(
                "successfully deleted {} service message {message_id} in chat {chat_id}",
                event.kind()
            );
        }
        DeleteOutcome::NotFound => {
            warn!("message {message_id} already deleted or not found");
        }
        DeleteOutcome::Forbidden(err) => {
            warn!(
                "cannot delete message {message_id}: insufficient permissions or message too old, {err}"
            );
        }
        DeleteOutcome::ChatNotFound => {
            warn!("chat {chat_id} not found - possibly left or deleted");
        }
        DeleteOutcome::Rejected(err) => {
            warn!("telegram api error deleting message {message_id}: {err}");
        }
        DeleteOutcome::Failed(report) => {
            error!("failed to delete message {message_id} in chat {chat_id}: {report:?}");
        }
    }
    outcome
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use api::{
        basic_types::{ChatIntId, MessageId},
        request::SetWebhookRequest,
        service::ServiceEvent,
    };
    use assert2::{check, let_assert};
    use async_trait::async_trait;
    use serde_json::json;
    use std::{collections::HashSet, sync::Mutex};

    /// Stand-in for the Bot API that remembers what it was asked to delete.
    #[derive(Default)]
    pub(crate) struct FakeApi {
        pub(crate) deleted: Mutex<HashSet<(ChatIntId, MessageId)>>,
        pub(crate) calls: Mutex<Vec<(ChatIntId, MessageId)>>,
        pub(crate) reply: Mutex<Option<serde_json::Value>>,
        pub(crate) webhooks: Mutex<Vec<SetWebhookRequest>>,
        pub(crate) webhook_reply: Mutex<Option<serde_json::Value>>,
    }

    impl FakeApi {
        pub(crate) fn replying(reply: serde_json::Value) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                ..Default::default()
            }
        }

        pub(crate) fn refusing_webhook(reply: serde_json::Value) -> Self {
            Self {
                webhook_reply: Mutex::new(Some(reply)),
                ..Default::default()
            }
        }

        pub(crate) fn calls(&self) -> Vec<(ChatIntId, MessageId)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Communicate for FakeApi {
        async fn delete_message(
            &self,
            chat_id: ChatId,
            message_id: MessageId,
        ) -> eyre::Result<CommonResponse<bool>> {
            let ChatId::Int(chat_id) = chat_id else {
                eyre::bail!("fake api only knows integer chat ids");
            };
            self.calls.lock().unwrap().push((chat_id, message_id));
            let reply = self.reply.lock().unwrap().clone();
            if let Some(reply) = reply {
                if reply.is_null() {
                    eyre::bail!("connection reset by peer");
                }
                return Ok(serde_json::from_value(reply)?);
            }
            let fresh = self.deleted.lock().unwrap().insert((chat_id, message_id));
            let reply = if fresh {
                json!({"ok": true, "result": true})
            } else {
                json!({
                    "ok": false,
                    "error_code": 400,
                    "description": "Bad Request: message to delete not found"
                })
            };
            Ok(serde_json::from_value(reply)?)
        }

        async fn set_webhook(
            &self,
            request: SetWebhookRequest,
        ) -> eyre::Result<CommonResponse<bool>> {
            self.webhooks.lock().unwrap().push(request);
            let reply = self.webhook_reply.lock().unwrap().clone();
            match reply {
                Some(reply) => Ok(serde_json::from_value(reply)?),
                None => Ok(CommonResponse::Ok(true)),
            }
        }
    }

    fn target() -> DeleteTarget<'static> {
        DeleteTarget {
            chat_id: -100123,
            message_id: 55,
            event: ServiceEvent::NewChatTitle("Team Chat"),
        }
    }

    #[tokio::test]
    async fn deletes_once_then_reports_not_found() {
        let api = FakeApi::default();

        let_assert!(DeleteOutcome::Deleted = sweep(&api, &target()).await);
        let_assert!(DeleteOutcome::NotFound = sweep(&api, &target()).await);
        check!(api.calls() == [(-100123, 55), (-100123, 55)]);
    }

    #[tokio::test]
    async fn permission_problems_are_benign() {
        let api = FakeApi::replying(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: message can't be deleted"
        }));
        let outcome = sweep(&api, &target()).await;
        let_assert!(DeleteOutcome::Forbidden(_) = &outcome);
        check!(outcome.is_benign());

        let api = FakeApi::replying(json!({
            "ok": false,
            "error_code": 403,
            "description": "Forbidden: bot is not a member of the supergroup chat"
        }));
        let_assert!(DeleteOutcome::Forbidden(_) = sweep(&api, &target()).await);
    }

    #[tokio::test]
    async fn chat_not_found_and_other_bad_requests() {
        let api = FakeApi::replying(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: chat not found"
        }));
        let_assert!(DeleteOutcome::ChatNotFound = sweep(&api, &target()).await);

        let api = FakeApi::replying(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: MESSAGE_ID_INVALID"
        }));
        let outcome = sweep(&api, &target()).await;
        let_assert!(DeleteOutcome::Rejected(_) = &outcome);
        check!(outcome.is_benign());
    }

    #[tokio::test]
    async fn unexpected_failures_are_absorbed() {
        let api = FakeApi::replying(json!({
            "ok": false,
            "error_code": 401,
            "description": "Unauthorized"
        }));
        let outcome = sweep(&api, &target()).await;
        let_assert!(DeleteOutcome::Failed(_) = &outcome);
        check!(!outcome.is_benign());

        let api = FakeApi::replying(serde_json::Value::Null);
        let outcome = sweep(&api, &target()).await;
        let_assert!(DeleteOutcome::Failed(report) = &outcome);
        check!(report.to_string().contains("connection reset"));
        check!(api.calls().len() == 1, "no retries");
    }
}
