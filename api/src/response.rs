use crate::basic_types::ChatIntId;
use compact_str::CompactString;
use derive_more::Display;
use serde::{de, Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::{
    error::Error,
    fmt::{Display, Formatter},
};

#[derive(Debug)]
pub enum CommonResponse<R> {
    Ok(R),
    Err(ErrorResponse),
}

#[allow(clippy::from_over_into)]
impl<R> Into<Result<R, ErrorResponse>> for CommonResponse<R> {
    fn into(self) -> Result<R, ErrorResponse> {
        match self {
            CommonResponse::Ok(response) => Ok(response),
            CommonResponse::Err(error) => Err(error),
        }
    }
}

impl<R> CommonResponse<R> {
    pub fn into_result(self) -> Result<R, ErrorResponse> {
        self.into()
    }
}

/// Describes why a request was unsuccessful.
/// https://core.telegram.org/bots/api#responseparameters
#[derive(Debug, Default, Deserialize)]
pub struct ResponseParameters {
    pub migrate_to_chat_id: Option<ChatIntId>,
    pub retry_after: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub description: CompactString,
    pub error_code: i64,
    #[serde(default)]
    pub parameters: ResponseParameters,
}

/// What an API error means for a `deleteMessage` call.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The message is already gone.
    #[display(fmt = "message not found")]
    MessageNotFound,
    /// Missing rights, or the message is too old to be deleted.
    #[display(fmt = "forbidden")]
    Forbidden,
    /// The bot left the chat or the chat was deleted.
    #[display(fmt = "chat not found")]
    ChatNotFound,
    /// Any other `400 Bad Request`.
    #[display(fmt = "bad request")]
    BadRequest,
    #[display(fmt = "other")]
    Other,
}

impl ErrorResponse {
    pub fn kind(&self) -> ApiErrorKind {
        let description = self.description.to_lowercase();
        match self.error_code {
            400 if description.contains("message to delete not found") => {
                ApiErrorKind::MessageNotFound
            }
            400 if description.contains("message can't be deleted") => ApiErrorKind::Forbidden,
            400 if description.contains("chat not found") => ApiErrorKind::ChatNotFound,
            400 => ApiErrorKind::BadRequest,
            403 => ApiErrorKind::Forbidden,
            _ => ApiErrorKind::Other,
        }
    }
}

impl Display for ErrorResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "response error: {}, code: {}",
            self.description, self.error_code
        )
    }
}

impl Error for ErrorResponse {}

impl<'de, R: Deserialize<'de>> Deserialize<'de> for CommonResponse<R> {
    fn deserialize<D>(deserializer: D) -> Result<CommonResponse<R>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut map = Map::deserialize(deserializer)?;

        let ok = map
            .remove("ok")
            .ok_or_else(|| de::Error::missing_field("ok"))
            .map(Deserialize::deserialize)?
            .map_err(de::Error::custom)?;
        if ok {
            let result = map
                .remove("result")
                .ok_or_else(|| de::Error::missing_field("result"))
                .map(R::deserialize)?
                .map_err(de::Error::custom)?;
            Ok(CommonResponse::Ok(result))
        } else {
            let rest = Value::Object(map);
            ErrorResponse::deserialize(rest)
                .map(CommonResponse::Err)
                .map_err(de::Error::custom)
        }
    }
}
