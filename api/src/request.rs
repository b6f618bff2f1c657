use crate::{
    basic_types::MessageId,
    proto::{ChatId, UpdateType},
};
use compact_str::CompactString;
use serde::Serialize;
use serde_with::skip_serializing_none;

/// Use this method to specify a URL and receive incoming updates via an outgoing webhook.
/// https://core.telegram.org/bots/api#setwebhook
#[skip_serializing_none]
#[derive(Debug, Default, Serialize)]
pub struct SetWebhookRequest {
    pub url: CompactString,
    pub ip_address: Option<CompactString>,
    pub max_connections: Option<i32>,
    pub allowed_updates: Option<Vec<UpdateType>>,
    pub drop_pending_updates: Option<bool>,
}

/// Use this method to delete a message, including service messages, with the following limitations:
/// - A message can only be deleted if it was sent less than 48 hours ago.
/// - Bots can delete outgoing messages in private chats, groups, and supergroups.
/// - If the bot is an administrator of a group, it can delete any message there.
/// - If the bot has can_delete_messages permission in a supergroup or a channel,
///   it can delete any message there.
///
/// https://core.telegram.org/bots/api#deletemessage
#[derive(Debug, Serialize)]
pub struct DeleteMessageRequest {
    pub chat_id: ChatId,
    pub message_id: MessageId,
}

#[cfg(test)]
mod tests {
    use crate::{
        proto::{ChatId, UpdateType},
        request::{DeleteMessageRequest, SetWebhookRequest},
    };
    use assert2::check;
    use serde_json::json;

    #[test]
    fn delete_message_request_shape() {
        let request = DeleteMessageRequest {
            chat_id: ChatId::from(-100123),
            message_id: 55,
        };
        check!(
            serde_json::to_value(&request).unwrap() == json!({"chat_id": -100123, "message_id": 55})
        );
    }

    #[test]
    fn set_webhook_request_skips_unset_fields() {
        let request = SetWebhookRequest {
            url: "https://example.org/hook".into(),
            allowed_updates: Some(vec![UpdateType::Message, UpdateType::ChannelPost]),
            drop_pending_updates: Some(true),
            ..Default::default()
        };
        check!(
            serde_json::to_value(&request).unwrap()
                == json!({
                    "url": "https://example.org/hook",
                    "allowed_updates": ["message", "channel_post"],
                    "drop_pending_updates": true
                })
        );
    }
}
