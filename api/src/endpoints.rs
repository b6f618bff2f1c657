use http::Method;

use crate::request::{DeleteMessageRequest, SetWebhookRequest};

pub trait Endpoint {
    type Request;
    type Response;

    const METHOD: Method;
    const PATH: &'static str;
}

pub struct SetWebhook;

impl Endpoint for SetWebhook {
    type Request = SetWebhookRequest;
    type Response = bool;

    const METHOD: Method = Method::POST;
    const PATH: &'static str = "setWebhook";
}

pub struct DeleteMessage;

impl Endpoint for DeleteMessage {
    type Request = DeleteMessageRequest;
    type Response = bool;

    const METHOD: Method = Method::POST;
    const PATH: &'static str = "deleteMessage";
}
