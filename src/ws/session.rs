//! Realtime session state machine.
//!
//! A session is Open from the moment the upgrade completes until the
//! client closes, the transport fails, a write fails, or the hub shuts
//! down. Every one of those paths leaves the loop and drops the
//! [`Subscription`], which removes the hub registration.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use crate::domain::{Quote, Subscription};
use crate::service::QuoteService;

/// Runs one realtime session until it closes.
///
/// - Forwards each hub event to the client as one JSON text frame.
/// - Ignores inbound data frames; a close frame or stream end ends the
///   session.
/// - With a `greeter`, first sends the latest stored quote and skips the
///   queued event for that same quote, if any.
pub async fn run_session(
    socket: WebSocket,
    mut subscription: Subscription,
    greeter: Option<Arc<QuoteService>>,
) {
    let session_id = subscription.id();
    let (mut ws_tx, mut ws_rx) = socket.split();
    tracing::info!(%session_id, "realtime session opened");

    let mut greeted: Option<i64> = None;
    if let Some(service) = greeter {
        match service.latest_quote().await {
            Ok(Some(latest)) => {
                if let Some(frame) = encode(&latest) {
                    if ws_tx.send(frame).await.is_err() {
                        tracing::info!(%session_id, "realtime session closed during greeting");
                        return;
                    }
                    greeted = latest.quote_id;
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(%session_id, error = %e, "latest quote unavailable for greeting"),
        }
    }

    loop {
        tokio::select! {
            // Incoming frame from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(%session_id, error = %e, "realtime read failed");
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
            // Event from NotificationHub
            event = subscription.recv() => {
                let Some(event) = event else {
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                };
                if is_greeted(greeted, event.quote()) {
                    continue;
                }
                let Some(frame) = encode(event.quote()) else {
                    continue;
                };
                if ws_tx.send(frame).await.is_err() {
                    break;
                }
            }
        }
    }

    drop(subscription);
    tracing::info!(%session_id, "realtime session closed");
}

/// Whether `quote` is the one already sent as the greeting.
///
/// Quotes with a lower id can still be published after the greeting when
/// inserts race, so only an exact match is skipped.
fn is_greeted(greeted: Option<i64>, quote: &Quote) -> bool {
    greeted.is_some() && quote.quote_id == greeted
}

/// Encodes `quote` as a JSON text frame. Returns `None`, and the quote is
/// not sent, if serialization fails.
fn encode(quote: &Quote) -> Option<Message> {
    match serde_json::to_string(quote) {
        Ok(json) => Some(Message::text(json)),
        Err(e) => {
            tracing::error!(quote_id = quote.quote_id, error = %e, "quote serialization failed, not sent");
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn quote(id: i64) -> Quote {
        Quote::from_row(id, format!("quote {id}"), "A".to_string())
    }

    #[test]
    fn only_the_greeted_quote_is_skipped() {
        assert!(is_greeted(Some(7), &quote(7)));
        assert!(!is_greeted(Some(7), &quote(6)));
        assert!(!is_greeted(Some(7), &quote(8)));
    }

    #[test]
    fn nothing_is_skipped_without_a_greeting() {
        assert!(!is_greeted(None, &quote(1)));
    }

    #[test]
    fn encoded_frame_is_the_quote_json() {
        let Some(Message::Text(text)) = encode(&quote(3)) else {
            panic!("expected a text frame");
        };
        let json: serde_json::Value = serde_json::from_str(text.as_str()).unwrap_or_default();
        assert_eq!(json["quote_id"], 3);
        assert_eq!(json["text"], "quote 3");
    }
}
