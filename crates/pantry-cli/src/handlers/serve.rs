//! Serve command handler.

use anyhow::Result;
use pantry_axum::{ServiceConfig, start_server};

use crate::commands::ServeArgs;

/// Execute the serve command.
///
/// Runs until Ctrl+C.
pub async fn execute(args: &ServeArgs) -> Result<()> {
    let service = ServiceConfig::from_env()?;
    let server = args.server_config();
    tracing::debug!(
        bind = %server.bind_address(),
        caller_header = %server.caller_header,
        "Resolved server config"
    );

    println!();
    println!("  pantry functions starting...");
    println!("  Listening on: http://{}", server.bind_address());
    if server.api_token.is_some() {
        println!("  Service token required on /api routes");
    }
    println!();

    start_server(service, server).await
}
