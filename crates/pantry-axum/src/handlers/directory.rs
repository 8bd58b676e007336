//! `fetchAllUsers` handler.

use axum::extract::State;
use pantry_core::DirectoryEntry;

use crate::callable::{Callable, CallableResult, Caller};
use crate::dto::FetchAllUsersRequest;
use crate::error::HttpError;
use crate::state::AppState;

/// List every user with post count and premium status.
pub async fn fetch_all_users(
    State(state): State<AppState>,
    caller: Caller,
    Callable(_): Callable<FetchAllUsersRequest>,
) -> Result<CallableResult<Vec<DirectoryEntry>>, HttpError> {
    let entries = state
        .functions
        .directory()
        .fetch_all_users(caller.as_deref())
        .await?;
    Ok(CallableResult::new(entries))
}
