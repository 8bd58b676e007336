//! `analyzeImageContents` handler.

use axum::extract::State;

use crate::callable::{Callable, CallableResult, Caller};
use crate::dto::{AnalyzeImageRequest, AnalyzeImageResponse};
use crate::error::HttpError;
use crate::state::AppState;

/// Answer an instruction about an image, optionally with spoken audio.
pub async fn analyze_image_contents(
    State(state): State<AppState>,
    caller: Caller,
    Callable(req): Callable<AnalyzeImageRequest>,
) -> Result<CallableResult<AnalyzeImageResponse>, HttpError> {
    let result = state
        .functions
        .analysis()
        .analyze_image_contents(caller.as_deref(), req.into())
        .await?;
    Ok(CallableResult::new(result.into()))
}
