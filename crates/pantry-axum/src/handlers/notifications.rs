//! `sendNotificationTo` handler.

use axum::extract::State;

use crate::callable::{Callable, CallableResult, Caller};
use crate::dto::SendNotificationRequest;
use crate::error::HttpError;
use crate::state::AppState;

/// Push a message from the caller to another user. Result is always `true`.
pub async fn send_notification_to(
    State(state): State<AppState>,
    caller: Caller,
    Callable(req): Callable<SendNotificationRequest>,
) -> Result<CallableResult<bool>, HttpError> {
    let sent = state
        .functions
        .notifications()
        .send_notification_to(
            caller.as_deref(),
            req.user_id.as_deref(),
            req.message.as_deref(),
        )
        .await?;
    Ok(CallableResult::new(sent))
}
