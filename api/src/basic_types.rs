pub type UpdateId = i64;
pub type UserId = i64;
pub type ChatIntId = i64;
pub type MessageId = i32;
pub type MessageThreadId = i32;

/// Unix time in seconds, as sent by the Bot API.
pub type Date = u64;
