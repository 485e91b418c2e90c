//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::session::run_session;
use crate::app_state::AppState;

/// `GET /realtime` — Upgrade HTTP connection to a realtime session.
///
/// The hub registration is taken before the upgrade response is sent,
/// so every quote added after the client sees the handshake complete is
/// delivered. If the upgrade never completes the registration is dropped
/// with the callback.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let subscription = state.hub.subscribe();
    let greeter = state
        .send_latest_on_connect
        .then(|| Arc::clone(&state.quote_service));

    ws.on_upgrade(move |socket| run_session(socket, subscription, greeter))
}
