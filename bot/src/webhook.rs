use crate::{
    classifier::classify, communicator::Communicate, config::WebhookConfig, janitor::sweep,
};
use api::{
    proto::{CommonUpdate, Update},
    request::SetWebhookRequest,
};
use axum::{body::Bytes, extract::State, http::StatusCode, routing::post, Json, Router};
use log::{debug, error, info};
use serde_json::Value;
use std::sync::Arc;

pub const OK: &str = "OK";
pub const EMPTY_BODY: &str = "Error: Empty request body";
pub const INVALID_JSON: &str = "Error: Invalid JSON format";
pub const INVALID_PAYLOAD: &str = "Error: Invalid payload format";

pub type Reply = (StatusCode, Json<&'static str>);

#[derive(Clone)]
pub struct WebhookState {
    comm: Arc<dyn Communicate>,
}

pub fn router(config: &WebhookConfig, comm: Arc<dyn Communicate>) -> Router {
    Router::new()
        .route(config.path.as_str(), post(receive_update))
        .with_state(WebhookState { comm })
}

async fn receive_update(State(state): State<WebhookState>, body: Bytes) -> Reply {
    handle_update(state.comm.as_ref(), &body).await
}

/// Handles one webhook delivery.
///
/// Only an undecodable payload is answered with `400`. Everything past
/// decoding is acknowledged with `200` so Telegram does not redeliver it,
/// whatever happened to the delete call.
pub async fn handle_update(comm: &dyn Communicate, body: &[u8]) -> Reply {
    if body.is_empty() {
        error!("empty body in request");
        return (StatusCode::BAD_REQUEST, Json(EMPTY_BODY));
    }

    let payload = match serde_json::from_slice::<Value>(body) {
        Ok(payload) => payload,
        Err(err) => {
            error!("invalid json in body: {err}");
            return (StatusCode::BAD_REQUEST, Json(INVALID_JSON));
        }
    };
    debug!("received webhook payload: {payload}");

    let update = match serde_json::from_value::<CommonUpdate>(payload) {
        Ok(update) => update,
        Err(err) => {
            error!("failed to parse update: {err}");
            return (StatusCode::BAD_REQUEST, Json(INVALID_PAYLOAD));
        }
    };
    match &update.data {
        Update::Unknown(key, _) => info!("update {} received: {key}", update.id),
        Update::Empty => info!("update {} received with no body", update.id),
        data => {
            if let Some(update_type) = data.update_type() {
                info!("update {} received: {update_type}", update.id);
            }
        }
    }

    if let Some(target) = classify(&update.data) {
        sweep(comm, &target).await;
    }

    (StatusCode::OK, Json(OK))
}

/// Announces the public url to Telegram, if one is configured.
pub async fn register(comm: &dyn Communicate, config: &WebhookConfig) -> eyre::Result<()> {
    let Some(url) = config.public_url.clone() else {
        info!("no public url configured, expecting the webhook to be set externally");
        return Ok(());
    };
    let request = SetWebhookRequest {
        url: url.clone(),
        allowed_updates: Some(config.allowed_updates.clone()),
        drop_pending_updates: Some(config.drop_pending_updates),
        ..Default::default()
    };
    comm.set_webhook(request).await?.into_result()?;
    info!("webhook set to {url}");
    Ok(())
}
