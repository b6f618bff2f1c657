//! Service messages: chat events generated by Telegram itself rather than
//! written by a user.

use crate::{
    basic_types::ChatIntId,
    proto::{
        ForumTopicCreated, ForumTopicEdited, Message, MessageAutoDeleteTimerChanged, PhotoSize,
        ProximityAlertTriggered, User, VideoChatEnded, VideoChatParticipantsInvited,
        VideoChatScheduled,
    },
};
use derive_more::Display;

/// Payload-free tag of a [`ServiceEvent`], displayed as its wire field name.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ServiceEventKind {
    #[display(fmt = "new_chat_members")]
    NewChatMembers,
    #[display(fmt = "left_chat_member")]
    LeftChatMember,
    #[display(fmt = "new_chat_title")]
    NewChatTitle,
    #[display(fmt = "new_chat_photo")]
    NewChatPhoto,
    #[display(fmt = "delete_chat_photo")]
    DeleteChatPhoto,
    #[display(fmt = "group_chat_created")]
    GroupChatCreated,
    #[display(fmt = "supergroup_chat_created")]
    SupergroupChatCreated,
    #[display(fmt = "channel_chat_created")]
    ChannelChatCreated,
    #[display(fmt = "message_auto_delete_timer_changed")]
    MessageAutoDeleteTimerChanged,
    #[display(fmt = "pinned_message")]
    PinnedMessage,
    #[display(fmt = "migrate_to_chat_id")]
    MigrateToChatId,
    #[display(fmt = "migrate_from_chat_id")]
    MigrateFromChatId,
    #[display(fmt = "proximity_alert_triggered")]
    ProximityAlertTriggered,
    #[display(fmt = "forum_topic_created")]
    ForumTopicCreated,
    #[display(fmt = "forum_topic_edited")]
    ForumTopicEdited,
    #[display(fmt = "forum_topic_closed")]
    ForumTopicClosed,
    #[display(fmt = "forum_topic_reopened")]
    ForumTopicReopened,
    #[display(fmt = "general_forum_topic_hidden")]
    GeneralForumTopicHidden,
    #[display(fmt = "general_forum_topic_unhidden")]
    GeneralForumTopicUnhidden,
    #[display(fmt = "video_chat_scheduled")]
    VideoChatScheduled,
    #[display(fmt = "video_chat_started")]
    VideoChatStarted,
    #[display(fmt = "video_chat_ended")]
    VideoChatEnded,
    #[display(fmt = "video_chat_participants_invited")]
    VideoChatParticipantsInvited,
}

/// A service event found on a [`Message`], borrowing its payload.
#[derive(Debug, Clone, Copy)]
pub enum ServiceEvent<'a> {
    NewChatMembers(&'a [User]),
    LeftChatMember(&'a User),
    NewChatTitle(&'a str),
    NewChatPhoto(&'a [PhotoSize]),
    DeleteChatPhoto,
    GroupChatCreated,
    SupergroupChatCreated,
    ChannelChatCreated,
    MessageAutoDeleteTimerChanged(&'a MessageAutoDeleteTimerChanged),
    PinnedMessage(&'a Message),
    MigrateToChatId(ChatIntId),
    MigrateFromChatId(ChatIntId),
    ProximityAlertTriggered(&'a ProximityAlertTriggered),
    ForumTopicCreated(&'a ForumTopicCreated),
    ForumTopicEdited(&'a ForumTopicEdited),
    ForumTopicClosed,
    ForumTopicReopened,
    GeneralForumTopicHidden,
    GeneralForumTopicUnhidden,
    VideoChatScheduled(&'a VideoChatScheduled),
    VideoChatStarted,
    VideoChatEnded(&'a VideoChatEnded),
    VideoChatParticipantsInvited(&'a VideoChatParticipantsInvited),
}

impl ServiceEvent<'_> {
    pub fn kind(&self) -> ServiceEventKind {
        match self {
            ServiceEvent::NewChatMembers(_) => ServiceEventKind::NewChatMembers,
            ServiceEvent::LeftChatMember(_) => ServiceEventKind::LeftChatMember,
            ServiceEvent::NewChatTitle(_) => ServiceEventKind::NewChatTitle,
            ServiceEvent::NewChatPhoto(_) => ServiceEventKind::NewChatPhoto,
            ServiceEvent::DeleteChatPhoto => ServiceEventKind::DeleteChatPhoto,
            ServiceEvent::GroupChatCreated => ServiceEventKind::GroupChatCreated,
            ServiceEvent::SupergroupChatCreated => ServiceEventKind::SupergroupChatCreated,
            ServiceEvent::ChannelChatCreated => ServiceEventKind::ChannelChatCreated,
            ServiceEvent::MessageAutoDeleteTimerChanged(_) => {
                ServiceEventKind::MessageAutoDeleteTimerChanged
            }
            ServiceEvent::PinnedMessage(_) => ServiceEventKind::PinnedMessage,
            ServiceEvent::MigrateToChatId(_) => ServiceEventKind::MigrateToChatId,
            ServiceEvent::MigrateFromChatId(_) => ServiceEventKind::MigrateFromChatId,
            ServiceEvent::ProximityAlertTriggered(_) => ServiceEventKind::ProximityAlertTriggered,
            ServiceEvent::ForumTopicCreated(_) => ServiceEventKind::ForumTopicCreated,
            ServiceEvent::ForumTopicEdited(_) => ServiceEventKind::ForumTopicEdited,
            ServiceEvent::ForumTopicClosed => ServiceEventKind::ForumTopicClosed,
            ServiceEvent::ForumTopicReopened => ServiceEventKind::ForumTopicReopened,
            ServiceEvent::GeneralForumTopicHidden => ServiceEventKind::GeneralForumTopicHidden,
            ServiceEvent::GeneralForumTopicUnhidden => ServiceEventKind::GeneralForumTopicUnhidden,
            ServiceEvent::VideoChatScheduled(_) => ServiceEventKind::VideoChatScheduled,
            ServiceEvent::VideoChatStarted => ServiceEventKind::VideoChatStarted,
            ServiceEvent::VideoChatEnded(_) => ServiceEventKind::VideoChatEnded,
            ServiceEvent::VideoChatParticipantsInvited(_) => {
                ServiceEventKind::VideoChatParticipantsInvited
            }
        }
    }

    /// Short human readable summary of the payload for logs.
    pub fn summary(&self) -> String {
        match self {
            ServiceEvent::NewChatMembers(users) => users
                .iter()
                .map(|user| user.full_name_with_username().to_string())
                .collect::<Vec<_>>()
                .join(", "),
            ServiceEvent::LeftChatMember(user) => user.full_name_with_username().to_string(),
            ServiceEvent::NewChatTitle(title) => format!("'{title}'"),
            ServiceEvent::NewChatPhoto(sizes) => format!("{} sizes", sizes.len()),
            ServiceEvent::MessageAutoDeleteTimerChanged(timer) => {
                format!("{}s", timer.message_auto_delete_time)
            }
            ServiceEvent::PinnedMessage(message) => match message.message_id {
                Some(id) => format!("message {id}"),
                None => "message without id".into(),
            },
            ServiceEvent::MigrateToChatId(id) | ServiceEvent::MigrateFromChatId(id) => {
                format!("chat {id}")
            }
            ServiceEvent::ProximityAlertTriggered(alert) => format!("{}m", alert.distance),
            ServiceEvent::ForumTopicCreated(topic) => format!("'{}'", topic.name),
            ServiceEvent::ForumTopicEdited(topic) => match &topic.name {
                Some(name) => format!("'{name}'"),
                None => "icon".into(),
            },
            ServiceEvent::VideoChatScheduled(scheduled) => format!("at {}", scheduled.start_date),
            ServiceEvent::VideoChatEnded(ended) => format!("after {}s", ended.duration),
            ServiceEvent::VideoChatParticipantsInvited(invited) => {
                format!("{} users", invited.users.len())
            }
            ServiceEvent::DeleteChatPhoto
            | ServiceEvent::GroupChatCreated
            | ServiceEvent::SupergroupChatCreated
            | ServiceEvent::ChannelChatCreated
            | ServiceEvent::ForumTopicClosed
            | ServiceEvent::ForumTopicReopened
            | ServiceEvent::GeneralForumTopicHidden
            | ServiceEvent::GeneralForumTopicUnhidden
            | ServiceEvent::VideoChatStarted => "-".into(),
        }
    }
}

fn flag(value: Option<bool>, event: ServiceEvent<'_>) -> Option<ServiceEvent<'_>> {
    value.unwrap_or(false).then_some(event)
}

impl Message {
    /// Every service event present on the message, highest priority first.
    ///
    /// Empty lists, empty titles and `false` flags count as absent.
    pub fn service_events(&self) -> impl Iterator<Item = ServiceEvent<'_>> {
        [
            self.new_chat_members
                .as_deref()
                .filter(|users| !users.is_empty())
                .map(ServiceEvent::NewChatMembers),
            self.left_chat_member
                .as_ref()
                .map(ServiceEvent::LeftChatMember),
            self.new_chat_title
                .as_deref()
                .filter(|title| !title.is_empty())
                .map(ServiceEvent::NewChatTitle),
            self.new_chat_photo
                .as_deref()
                .filter(|sizes| !sizes.is_empty())
                .map(ServiceEvent::NewChatPhoto),
            flag(self.delete_chat_photo, ServiceEvent::DeleteChatPhoto),
            flag(self.group_chat_created, ServiceEvent::GroupChatCreated),
            flag(
                self.supergroup_chat_created,
                ServiceEvent::SupergroupChatCreated,
            ),
            flag(self.channel_chat_created, ServiceEvent::ChannelChatCreated),
            self.message_auto_delete_timer_changed
                .as_ref()
                .map(ServiceEvent::MessageAutoDeleteTimerChanged),
            self.pinned_message
                .as_deref()
                .map(ServiceEvent::PinnedMessage),
            self.migrate_to_chat_id.map(ServiceEvent::MigrateToChatId),
            self.migrate_from_chat_id
                .map(ServiceEvent::MigrateFromChatId),
            self.proximity_alert_triggered
                .as_ref()
                .map(ServiceEvent::ProximityAlertTriggered),
            self.forum_topic_created
                .as_ref()
                .map(ServiceEvent::ForumTopicCreated),
            self.forum_topic_edited
                .as_ref()
                .map(ServiceEvent::ForumTopicEdited),
            self.forum_topic_closed
                .as_ref()
                .map(|_| ServiceEvent::ForumTopicClosed),
            self.forum_topic_reopened
                .as_ref()
                .map(|_| ServiceEvent::ForumTopicReopened),
            self.general_forum_topic_hidden
                .as_ref()
                .map(|_| ServiceEvent::GeneralForumTopicHidden),
            self.general_forum_topic_unhidden
                .as_ref()
                .map(|_| ServiceEvent::GeneralForumTopicUnhidden),
            self.video_chat_scheduled
                .as_ref()
                .map(ServiceEvent::VideoChatScheduled),
            self.video_chat_started
                .as_ref()
                .map(|_| ServiceEvent::VideoChatStarted),
            self.video_chat_ended
                .as_ref()
                .map(ServiceEvent::VideoChatEnded),
            self.video_chat_participants_invited
                .as_ref()
                .map(ServiceEvent::VideoChatParticipantsInvited),
        ]
        .into_iter()
        .flatten()
    }

    /// The service event attributed to this message: first match wins.
    pub fn service_event(&self) -> Option<ServiceEvent<'_>> {
        self.service_events().next()
    }
}
