use compact_str::CompactString;
use derive_more::Display;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use serde_json::{Map, Value};
use serde_with::skip_serializing_none;
use std::str::FromStr;

use crate::basic_types::{ChatIntId, Date, MessageId, MessageThreadId, UpdateId, UserId};

#[derive(Debug, Display, Copy, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    #[display(fmt = "message")]
    Message,
    #[display(fmt = "edited_message")]
    EditedMessage,
    #[display(fmt = "channel_post")]
    ChannelPost,
    #[display(fmt = "edited_channel_post")]
    EditedChannelPost,
    #[display(fmt = "inline_query")]
    InlineQuery,
    #[display(fmt = "chosen_inline_result")]
    ChosenInlineResult,
    #[display(fmt = "callback_query")]
    CallbackQuery,
    #[display(fmt = "shipping_query")]
    ShippingQuery,
    #[display(fmt = "pre_checkout_query")]
    PreCheckoutQuery,
    #[display(fmt = "poll")]
    Poll,
    #[display(fmt = "poll_answer")]
    PollAnswer,
    #[display(fmt = "my_chat_member")]
    MyChatMember,
    #[display(fmt = "chat_member")]
    ChatMember,
    #[display(fmt = "chat_join_request")]
    ChatJoinRequest,
}

impl UpdateType {
    pub fn carries_message(self) -> bool {
        matches!(
            self,
            UpdateType::Message
                | UpdateType::EditedMessage
                | UpdateType::ChannelPost
                | UpdateType::EditedChannelPost
        )
    }

    /// Human readable description used in diagnostics.
    pub fn description(self) -> &'static str {
        match self {
            UpdateType::Message => "regular message",
            UpdateType::EditedMessage => "edited message",
            UpdateType::ChannelPost => "channel post",
            UpdateType::EditedChannelPost => "edited channel post",
            UpdateType::InlineQuery => "inline query",
            UpdateType::ChosenInlineResult => "chosen inline result",
            UpdateType::CallbackQuery => "callback query from inline button",
            UpdateType::ShippingQuery => "shipping query",
            UpdateType::PreCheckoutQuery => "pre checkout query",
            UpdateType::Poll => "poll",
            UpdateType::PollAnswer => "poll answer",
            UpdateType::MyChatMember => "bot status change in chat",
            UpdateType::ChatMember => "chat member change",
            UpdateType::ChatJoinRequest => "chat join request",
        }
    }
}

impl FromStr for UpdateType {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(Value::String(s.to_owned()))
            .map_err(|_| eyre::eyre!("'{s}' is not a known update type"))
    }
}

#[derive(Debug)]
pub struct CommonUpdate {
    pub id: UpdateId,
    pub data: Update,
}

#[derive(Debug)]
pub enum Update {
    MessageUpdate(Message),
    EditedMessageUpdate(Message),
    ChannelPostUpdate(Message),
    EditedChannelPostUpdate(Message),
    /// A known update that never carries a message, e.g. `callback_query`.
    Other(UpdateType, Value),
    /// An update body this crate does not know about.
    Unknown(CompactString, Value),
    /// Nothing but `update_id`.
    Empty,
}

impl Update {
    pub fn message(&self) -> Option<&Message> {
        match self {
            Update::MessageUpdate(message)
            | Update::EditedMessageUpdate(message)
            | Update::ChannelPostUpdate(message)
            | Update::EditedChannelPostUpdate(message) => Some(message),
            Update::Other(..) | Update::Unknown(..) | Update::Empty => None,
        }
    }

    pub fn update_type(&self) -> Option<UpdateType> {
        match self {
            Update::MessageUpdate(_) => Some(UpdateType::Message),
            Update::EditedMessageUpdate(_) => Some(UpdateType::EditedMessage),
            Update::ChannelPostUpdate(_) => Some(UpdateType::ChannelPost),
            Update::EditedChannelPostUpdate(_) => Some(UpdateType::EditedChannelPost),
            Update::Other(update_type, _) => Some(*update_type),
            Update::Unknown(..) | Update::Empty => None,
        }
    }
}

impl<'de> Deserialize<'de> for CommonUpdate {
    fn deserialize<D>(deserializer: D) -> Result<CommonUpdate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut map = Map::deserialize(deserializer)?;

        let id = map
            .remove("update_id")
            .ok_or_else(|| de::Error::missing_field("update_id"))
            .map(Deserialize::deserialize)?
            .map_err(de::Error::custom)?;

        // a known body wins over anything else the payload might carry
        let known = map
            .keys()
            .find_map(|key| UpdateType::from_str(key).ok());

        let data = match known {
            Some(update_type) => {
                let value = map
                    .remove(&update_type.to_string())
                    .ok_or_else(|| de::Error::custom("update with no data"))?;
                let message = |value| serde_json::from_value::<Message>(value);
                match update_type {
                    UpdateType::Message => message(value).map(Update::MessageUpdate),
                    UpdateType::EditedMessage => message(value).map(Update::EditedMessageUpdate),
                    UpdateType::ChannelPost => message(value).map(Update::ChannelPostUpdate),
                    UpdateType::EditedChannelPost => {
                        message(value).map(Update::EditedChannelPostUpdate)
                    }
                    other => Ok(Update::Other(other, value)),
                }
                .map_err(de::Error::custom)?
            }
            None => match map.into_iter().next() {
                Some((key, value)) => Update::Unknown(key.into(), value),
                None => Update::Empty,
            },
        };
        Ok(CommonUpdate { id, data })
    }
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
#[serde(untagged)]
pub enum ChatId {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    Int(ChatIntId),
    Str(CompactString),
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<CompactString> for ChatId {
    fn from(id: CompactString) -> Self {
        Self::Str(id)
    }
}

#[skip_serializing_none]
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub is_bot: bool,
    pub first_name: CompactString,
    pub last_name: Option<CompactString>,
    pub username: Option<CompactString>,
    pub language_code: Option<CompactString>,
}

impl User {
    pub fn full_name_with_username(&self) -> CompactString {
        let mut name = self.first_name.clone();
        if let Some(s) = &self.username {
            name += &format!(" {s}");
        }
        if let Some(s) = &self.last_name {
            name += &format!(" {s}");
        }
        name
    }
}

#[derive(Debug, Display, Default, Deserialize, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum ChatType {
    #[default]
    #[display(fmt = "private")]
    Private,
    #[display(fmt = "group")]
    Group,
    #[display(fmt = "supergroup")]
    Supergroup,
    #[display(fmt = "channel")]
    Channel,
}

#[derive(Debug, Default, Deserialize)]
pub struct Chat {
    pub id: ChatIntId,
    #[serde(default, rename = "type")]
    pub chat_type: ChatType,
    pub title: Option<CompactString>,
    pub username: Option<CompactString>,
    pub first_name: Option<CompactString>,
    pub last_name: Option<CompactString>,
    pub is_forum: Option<bool>,
}

/// This object represents one size of a photo or a file / sticker thumbnail.
/// https://core.telegram.org/bots/api#photosize
#[derive(Debug, Deserialize, Serialize)]
pub struct PhotoSize {
    pub file_id: CompactString,
    pub file_unique_id: CompactString,
    pub width: i32,
    pub height: i32,
    pub file_size: Option<i64>,
}

/// This object represents a service message about a change in auto-delete timer settings.
/// https://core.telegram.org/bots/api#messageautodeletetimerchanged
#[derive(Debug, Deserialize, Serialize)]
pub struct MessageAutoDeleteTimerChanged {
    pub message_auto_delete_time: i64,
}

/// https://core.telegram.org/bots/api#proximityalerttriggered
/// This object represents the content of a service message,
/// sent whenever a user in the chat triggers a proximity alert set by another user.
#[derive(Debug, Deserialize, Serialize)]
pub struct ProximityAlertTriggered {
    pub traveler: User,
    pub watcher: User,
    pub distance: i32,
}

/// This object represents a service message about a new forum topic created in the chat.
/// https://core.telegram.org/bots/api#forumtopiccreated
#[skip_serializing_none]
#[derive(Debug, Deserialize, Serialize)]
pub struct ForumTopicCreated {
    pub name: CompactString,
    pub icon_color: i32,
    pub icon_custom_emoji_id: Option<CompactString>,
}

/// This object represents a service message about an edited forum topic.
/// https://core.telegram.org/bots/api#forumtopicedited
#[skip_serializing_none]
#[derive(Debug, Deserialize, Serialize)]
pub struct ForumTopicEdited {
    pub name: Option<CompactString>,
    pub icon_custom_emoji_id: Option<CompactString>,
}

// The payload-less service objects below are sent as `{}`, so they are
// braced structs rather than unit structs.

/// This object represents a service message about a forum topic closed in the chat.
/// Currently holds no information.
/// https://core.telegram.org/bots/api#forumtopicclosed
#[derive(Debug, Deserialize, Serialize)]
pub struct ForumTopicClosed {}

/// This object represents a service message about a forum topic reopened in the chat.
/// Currently holds no information.
#[derive(Debug, Deserialize, Serialize)]
pub struct ForumTopicReopened {}

/// This object represents a service message about General forum topic hidden in the chat.
/// Currently holds no information.
/// https://core.telegram.org/bots/api#generalforumtopichidden
#[derive(Debug, Deserialize, Serialize)]
pub struct GeneralForumTopicHidden {}

/// This object represents a service message about General forum topic unhidden in the chat.
/// Currently holds no information.
/// https://core.telegram.org/bots/api#generalforumtopicunhidden
#[derive(Debug, Deserialize, Serialize)]
pub struct GeneralForumTopicUnhidden {}

/// This object represents a service message about a video chat scheduled in the chat.
/// https://core.telegram.org/bots/api#videochatscheduled
#[derive(Debug, Deserialize, Serialize)]
pub struct VideoChatScheduled {
    pub start_date: Date,
}

/// This object represents a service message about a video chat started in the chat.
/// Currently holds no information.
/// https://core.telegram.org/bots/api#videochatstarted
#[derive(Debug, Deserialize, Serialize)]
pub struct VideoChatStarted {}

/// This object represents a service message about a video chat ended in the chat.
/// https://core.telegram.org/bots/api#videochatended
#[derive(Debug, Deserialize, Serialize)]
pub struct VideoChatEnded {
    pub duration: i32,
}

/// This object represents a service message about new members invited to a video chat.
/// https://core.telegram.org/bots/api#videochatparticipantsinvited
#[derive(Debug, Deserialize, Serialize)]
pub struct VideoChatParticipantsInvited {
    #[serde(default)]
    pub users: Vec<User>,
}

/// Describes data sent from a [Web App](https://core.telegram.org/bots/webapps) to the bot.
/// https://core.telegram.org/bots/api#webappdata
#[derive(Debug, Deserialize, Serialize)]
pub struct WebAppData {
    pub data: CompactString,
    pub button_text: CompactString,
}

/// A message as delivered inside an update.
///
/// `message_id`, `chat` and `date` are always present on real updates but are
/// optional here: a partial message still decodes and is simply never acted on.
#[derive(Debug, Default, Deserialize)]
pub struct Message {
    pub message_id: Option<MessageId>,
    pub message_thread_id: Option<MessageThreadId>,
    pub from: Option<User>,
    pub sender_chat: Option<Chat>,
    pub date: Option<Date>,
    pub chat: Option<Chat>,
    pub text: Option<CompactString>,
    pub caption: Option<CompactString>,
    pub new_chat_members: Option<Vec<User>>,
    pub left_chat_member: Option<User>,
    pub new_chat_title: Option<CompactString>,
    pub new_chat_photo: Option<Vec<PhotoSize>>,
    pub delete_chat_photo: Option<bool>,
    pub group_chat_created: Option<bool>,
    pub supergroup_chat_created: Option<bool>,
    pub channel_chat_created: Option<bool>,
    pub message_auto_delete_timer_changed: Option<MessageAutoDeleteTimerChanged>,
    pub migrate_to_chat_id: Option<ChatIntId>,
    pub migrate_from_chat_id: Option<ChatIntId>,
    pub pinned_message: Option<Box<Message>>,
    pub successful_payment: Option<Value>,
    pub connected_website: Option<CompactString>,
    pub passport_data: Option<Value>,
    pub proximity_alert_triggered: Option<ProximityAlertTriggered>,
    pub forum_topic_created: Option<ForumTopicCreated>,
    pub forum_topic_edited: Option<ForumTopicEdited>,
    pub forum_topic_closed: Option<ForumTopicClosed>,
    pub forum_topic_reopened: Option<ForumTopicReopened>,
    pub general_forum_topic_hidden: Option<GeneralForumTopicHidden>,
    pub general_forum_topic_unhidden: Option<GeneralForumTopicUnhidden>,
    pub video_chat_scheduled: Option<VideoChatScheduled>,
    pub video_chat_started: Option<VideoChatStarted>,
    pub video_chat_ended: Option<VideoChatEnded>,
    pub video_chat_participants_invited: Option<VideoChatParticipantsInvited>,
    pub web_app_data: Option<WebAppData>,
}

impl Message {
    /// Fields that look like service content but are never swept:
    /// payments, passport data, web app data and website logins.
    pub fn informational_fields(&self) -> Vec<&'static str> {
        let mut fields = vec![];
        if self.successful_payment.is_some() {
            fields.push("successful_payment");
        }
        if self.connected_website.is_some() {
            fields.push("connected_website");
        }
        if self.passport_data.is_some() {
            fields.push("passport_data");
        }
        if self.web_app_data.is_some() {
            fields.push("web_app_data");
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use crate::proto::{ChatType, CommonUpdate, Update, UpdateType};
    use assert2::{check, let_assert};

    #[test]
    fn deserialize_common_update() {
        let data = serde_json::json!({
            "message": {
                "chat": {
                    "first_name": "Test",
                    "id": 1111111,
                    "last_name": "Test Lastname",
                    "username": "Test"
                },
                "date": 1441645532,
                "from": {
                    "first_name": "Test",
                    "id": 1111111,
                    "last_name": "Test Lastname",
                    "username": "Test"
                },
                "message_id": 1365,
                "text": "/start"
            },
            "update_id": 10000
        });
        let update = serde_json::from_value::<CommonUpdate>(data).unwrap();
        check!(update.id == 10000);
        let_assert!(Update::MessageUpdate(message) = update.data);
        check!(message.message_id == Some(1365));
        check!(message.text.as_deref() == Some("/start"));
        let chat = message.chat.unwrap();
        check!(chat.id == 1111111);
        check!(chat.chat_type == ChatType::Private);
    }

    #[test]
    fn deserialize_channel_post() {
        let data = serde_json::json!({
            "update_id": 7,
            "channel_post": {
                "message_id": 3,
                "date": 1700000000,
                "chat": {"id": -1001, "type": "channel", "title": "News"},
                "channel_chat_created": true
            }
        });
        let update = serde_json::from_value::<CommonUpdate>(data).unwrap();
        let_assert!(Update::ChannelPostUpdate(message) = update.data);
        check!(message.channel_chat_created == Some(true));
        check!(message.chat.unwrap().chat_type == ChatType::Channel);
    }

    #[test]
    fn non_message_updates_are_kept_as_other() {
        let data = serde_json::json!({
            "update_id": 8,
            "my_chat_member": {"chat": {"id": -5, "type": "group"}}
        });
        let update = serde_json::from_value::<CommonUpdate>(data).unwrap();
        check!(update.data.message().is_none());
        check!(update.data.update_type() == Some(UpdateType::MyChatMember));
    }

    #[test]
    fn unknown_updates_are_not_an_error() {
        let data = serde_json::json!({
            "update_id": 9,
            "message_reaction": {"chat": {"id": -5}}
        });
        let update = serde_json::from_value::<CommonUpdate>(data).unwrap();
        let_assert!(Update::Unknown(key, _) = update.data);
        check!(key == "message_reaction");
    }

    #[test]
    fn known_body_wins_over_unknown_keys() {
        let data = serde_json::json!({
            "update_id": 10,
            "aaa_future_field": 1,
            "message": {"message_id": 1, "chat": {"id": 2}, "date": 3}
        });
        let update = serde_json::from_value::<CommonUpdate>(data).unwrap();
        check!(update.data.update_type() == Some(UpdateType::Message));
    }

    #[test]
    fn empty_message_still_decodes() {
        let data = serde_json::json!({"update_id": 11, "message": {}});
        let update = serde_json::from_value::<CommonUpdate>(data).unwrap();
        let message = update.data.message().unwrap();
        check!(message.message_id.is_none());
        check!(message.chat.is_none());
    }

    #[test]
    fn reject_update_without_id() {
        let no_id = serde_json::json!({"message": {}});
        check!(serde_json::from_value::<CommonUpdate>(no_id).is_err());

        let not_object = serde_json::json!([1, 2, 3]);
        check!(serde_json::from_value::<CommonUpdate>(not_object).is_err());
    }

    #[test]
    fn bare_update_id_decodes_as_empty() {
        let data = serde_json::json!({"update_id": 13});
        let update = serde_json::from_value::<CommonUpdate>(data).unwrap();
        check!(update.id == 13);
        let_assert!(Update::Empty = &update.data);
        check!(update.data.message().is_none());
        check!(update.data.update_type().is_none());
    }

    #[test]
    fn payload_less_service_objects_accept_empty_object() {
        let data = serde_json::json!({
            "update_id": 12,
            "message": {
                "message_id": 1,
                "chat": {"id": -1, "type": "supergroup", "is_forum": true},
                "date": 1,
                "forum_topic_closed": {},
                "video_chat_started": {}
            }
        });
        let update = serde_json::from_value::<CommonUpdate>(data).unwrap();
        let message = update.data.message().unwrap();
        check!(message.forum_topic_closed.is_some());
        check!(message.video_chat_started.is_some());
    }

    #[test]
    fn update_type_round_trips_through_its_name() {
        for name in ["message", "edited_channel_post", "chat_join_request"] {
            let update_type: UpdateType = name.parse().unwrap();
            check!(update_type.to_string() == name);
        }
        check!("message_reaction".parse::<UpdateType>().is_err());
    }
}
