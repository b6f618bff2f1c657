use crate::ward;
use api::{
    basic_types::{ChatIntId, MessageId},
    proto::{Message, Update},
    service::ServiceEvent,
};
use log::{debug, error, info, warn};

/// A service message that should be swept out of its chat.
#[derive(Debug, Clone, Copy)]
pub struct DeleteTarget<'a> {
    pub chat_id: ChatIntId,
    pub message_id: MessageId,
    pub event: ServiceEvent<'a>,
}

/// Decides whether an update is a service message worth deleting.
///
/// Only message-carrying updates are inspected. The first service event in
/// priority order is attributed to the message, see [`Message::service_event`].
pub fn classify(update: &Update) -> Option<DeleteTarget<'_>> {
    let message = ward!(update.message(), {
        log_non_message_update(update);
        return None;
    });
    classify_message(message)
}

fn log_non_message_update(update: &Update) {
    match update {
        Update::Other(update_type, body) => {
            info!(
                "found {update_type} update - {}, nothing to sweep",
                update_type.description()
            );
            debug!("{update_type} content: {body}");
        }
        Update::Unknown(key, body) => {
            warn!("unknown update type '{key}' received");
            debug!("{key} content: {body}");
        }
        Update::Empty => {
            warn!("update carries no body, nothing to sweep");
        }
        _ => {}
    }
}

pub fn classify_message(message: &Message) -> Option<DeleteTarget<'_>> {
    for field in message.informational_fields() {
        info!("'{field}' present, not treated as a service message");
    }

    let events = message.service_events().collect::<Vec<_>>();
    let event = ward!(events.first().copied(), {
        debug!(
            "message {:?} is not a service message, skipping",
            message.message_id
        );
        return None;
    });
    for event in &events {
        info!(
            "found service message type: {} = {}",
            event.kind(),
            event.summary()
        );
    }

    let chat = ward!(message.chat.as_ref(), {
        error!("service message has no chat information");
        return None;
    });
    let message_id = ward!(message.message_id, {
        error!(
            "cannot delete service message in chat {}: message_id is missing",
            chat.id
        );
        return None;
    });

    info!(
        "confirmed {} service message {message_id} in {} chat {}",
        event.kind(),
        chat.chat_type,
        chat.id
    );
    Some(DeleteTarget {
        chat_id: chat.id,
        message_id,
        event,
    })
}
