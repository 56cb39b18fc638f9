//! WebSocket handler for live complaint updates
//!
//! Browsers cannot set an `Authorization` header on a WebSocket handshake,
//! so the token travels as `?token=`. It is checked the same way as the
//! bearer gate before the upgrade. Each connection only receives events for
//! complaints its user is allowed to see, and is closed once the account is
//! deactivated.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::select;
use tracing::{debug, error, info, warn};

use crate::application::events::{EventMessage, SharedEventBus};
use crate::application::identity::UserService;
use crate::domain::user::Actor;
use crate::interfaces::http::error::ApiError;
use crate::shared::DomainError;

/// How often an open socket re-checks that its account is still active
pub const ACCOUNT_RECHECK_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
pub struct NotificationParams {
    pub token: Option<String>,
}

/// State for notification WebSocket handler
#[derive(Clone)]
pub struct NotificationState {
    pub event_bus: SharedEventBus,
    pub users: Arc<UserService>,
}

/// `GET /api/notifications/ws?token=<jwt>`
pub async fn ws_notifications_handler(
    State(state): State<NotificationState>,
    Query(params): Query<NotificationParams>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let Some(token) = params.token.as_deref().filter(|t| !t.is_empty()) else {
        return ApiError::unauthorized("Access denied. No token provided.").into_response();
    };

    let user = match state.users.authenticate(token).await {
        Ok(user) => user,
        Err(err) => return ApiError::from(err).into_response(),
    };

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return rejection.into_response(),
    };

    info!(user_id = %user.id, role = %user.role, "Notification WebSocket connecting");
    let actor = user.actor();
    ws.on_upgrade(move |socket| {
        handle_notification_socket(socket, state.event_bus, state.users, actor)
    })
}

/// `false` once the account is gone or deactivated. Storage errors keep the
/// socket open; the next check retries.
pub async fn account_still_active(users: &UserService, user_id: &str) -> bool {
    match users.get_user(user_id).await {
        Ok(user) => user.is_active,
        Err(DomainError::NotFound { .. }) => false,
        Err(e) => {
            warn!(user_id, error = %e, "Account re-check failed");
            true
        }
    }
}

/// JSON frame for `event`, or `None` when `actor` may not see it
pub fn frame_for(event: &EventMessage, actor: &Actor) -> Option<String> {
    if !event.event.is_visible_to(actor) {
        return None;
    }
    match serde_json::to_string(event) {
        Ok(json) => Some(json),
        Err(e) => {
            error!("Failed to serialize event: {}", e);
            None
        }
    }
}

async fn handle_notification_socket(
    socket: WebSocket,
    event_bus: SharedEventBus,
    users: Arc<UserService>,
    actor: Actor,
) {
    let (mut sender, mut receiver) = socket.split();
    let mut subscriber = event_bus.subscribe();
    let mut recheck = tokio::time::interval(ACCOUNT_RECHECK_INTERVAL);
    // The handshake just authenticated; skip the immediate first tick
    recheck.reset();

    let welcome = serde_json::json!({
        "type": "connected",
        "message": "Connected to notification stream",
    });

    if let Err(e) = sender
        .send(Message::Text(welcome.to_string().into()))
        .await
    {
        error!("Failed to send welcome message: {}", e);
        return;
    }

    loop {
        select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if let Err(e) = sender.send(Message::Pong(data)).await {
                            error!("Failed to send pong: {}", e);
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        warn!("WebSocket error: {}", e);
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }

            _ = recheck.tick() => {
                if !account_still_active(&users, &actor.id).await {
                    info!(user_id = %actor.id, "Account deactivated; closing notification socket");
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            }

            event = subscriber.recv() => {
                let Some(event_msg) = event else {
                    warn!("Event bus closed");
                    break;
                };
                let Some(json) = frame_for(&event_msg, &actor) else {
                    continue;
                };
                if let Err(e) = sender.send(Message::Text(json.into())).await {
                    error!("Failed to send event: {}", e);
                    break;
                }
                debug!(event = event_msg.event.kind.as_str(), user_id = %actor.id, "Event sent");
            }
        }
    }

    info!(user_id = %actor.id, "Notification WebSocket client disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::events::{ComplaintEvent, ComplaintEventKind};
    use crate::domain::user::UserRole;
    use axum::http::{Method, StatusCode};
    use chrono::Utc;

    use crate::test_support::TestApp;

    fn event(customer: &str, assignee: Option<&str>) -> EventMessage {
        EventMessage::new(ComplaintEvent {
            kind: ComplaintEventKind::ComplaintStatusChanged,
            complaint_id: "c-1".into(),
            status: "resolved".into(),
            customer_id: customer.into(),
            assigned_to: assignee.map(String::from),
            timestamp: Utc::now(),
        })
    }

    #[test]
    fn frames_only_visible_events() {
        let msg = event("cust-1", Some("tech-1"));

        let json = frame_for(&msg, &Actor::new("cust-1", UserRole::Customer)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["event"]["type"], "complaint_status_changed");
        assert_eq!(value["event"]["complaint_id"], "c-1");

        assert!(frame_for(&msg, &Actor::new("cust-2", UserRole::Customer)).is_none());
        assert!(frame_for(&msg, &Actor::new("tech-2", UserRole::Technician)).is_none());
        assert!(frame_for(&msg, &Actor::new("root", UserRole::Admin)).is_some());
    }

    #[tokio::test]
    async fn deactivated_accounts_fail_the_recheck() {
        let app = TestApp::new().await;
        let (admin, _) = app.user("Root", UserRole::Admin).await;
        let (alice, _) = app.user("Alice", UserRole::Customer).await;

        assert!(account_still_active(&app.users, &alice.id).await);

        app.users
            .toggle_status(&admin.actor(), &alice.id)
            .await
            .unwrap();
        assert!(!account_still_active(&app.users, &alice.id).await);
        assert!(!account_still_active(&app.users, "missing").await);
    }

    #[tokio::test]
    async fn handshake_requires_a_valid_token() {
        let app = TestApp::new().await;

        let (status, _) = app
            .request(Method::GET, "/api/notifications/ws", None, None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = app
            .request(Method::GET, "/api/notifications/ws?token=bogus", None, None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
