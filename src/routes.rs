//! HTTP endpoints: provider webhook and promotional broadcast.

use std::sync::Arc;

use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use chrono::Utc;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::concierge::Concierge;
use crate::dialogue::engine::InboundMessage;

/// Form fields posted by the messaging provider.
#[derive(Debug, Deserialize)]
pub struct WebhookForm {
    #[serde(rename = "From", default)]
    pub from: String,
    #[serde(rename = "Body", default)]
    pub body: String,
    #[serde(rename = "MediaUrl0", default)]
    pub media_url: Option<String>,
}

impl WebhookForm {
    fn into_inbound(self) -> InboundMessage {
        InboundMessage {
            from: self.from.trim().to_string(),
            body: self.body,
            media_url: self.media_url.filter(|url| !url.trim().is_empty()),
            received_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BroadcastQuery {
    pub msg: Option<String>,
}

/// POST /bot, POST /whatsapp
///
/// Runs the message through the dialogue and answers with the reply as
/// plain text; the provider delivers it to the sender.
async fn webhook(
    State(concierge): State<Arc<Concierge>>,
    Form(form): Form<WebhookForm>,
) -> impl IntoResponse {
    if form.from.trim().is_empty() {
        return (StatusCode::BAD_REQUEST, "Missing sender".to_string());
    }
    let reply = concierge.handle_inbound(form.into_inbound()).await;
    (StatusCode::OK, reply)
}

/// GET /broadcast?msg=...
async fn broadcast(
    State(concierge): State<Arc<Concierge>>,
    Query(query): Query<BroadcastQuery>,
) -> impl IntoResponse {
    let Some(message) = query.msg.filter(|m| !m.is_empty()) else {
        return (StatusCode::BAD_REQUEST, "Missing message");
    };
    concierge.broadcast(&message).await;
    (StatusCode::OK, "Broadcast sent")
}

async fn health() -> &'static str {
    "ok"
}

/// Build the concierge router.
pub fn concierge_routes(concierge: Arc<Concierge>) -> Router {
    Router::new()
        .route("/bot", post(webhook))
        .route("/whatsapp", post(webhook))
        .route("/broadcast", get(broadcast))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(concierge)
}
