//! Subcommands and their arguments.

use clap::{Args, Subcommand};
use pantry_axum::ServerConfig;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server for the callable functions
    Serve(ServeArgs),

    /// Show the resolved configuration (secrets redacted)
    Config,
}

/// Listener and access settings for `pantry serve`.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct ServeArgs {
    /// Interface to bind
    #[arg(long, env = "PANTRY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PANTRY_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Allowed CORS origin; repeat for several. Allows any origin when omitted
    #[arg(long = "cors-origin", env = "PANTRY_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// Require `Authorization: Bearer <token>` on every /api route
    #[arg(long, env = "PANTRY_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Header the gateway puts the verified caller user ID in
    #[arg(long, env = "PANTRY_CALLER_HEADER", default_value = pantry_axum::DEFAULT_CALLER_HEADER)]
    pub caller_header: String,
}

impl ServeArgs {
    /// Translate flags into the server configuration.
    pub fn server_config(&self) -> ServerConfig {
        let mut config = ServerConfig::default()
            .with_host(self.host.clone())
            .with_port(self.port)
            .with_caller_header(self.caller_header.clone());

        let origins: Vec<String> = self
            .cors_origins
            .iter()
            .map(String::as_str)
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
        if !origins.is_empty() {
            config = config.with_allowed_origins(origins);
        }

        if let Some(token) = self.api_token.as_deref().filter(|t| !t.is_empty()) {
            config = config.with_api_token(token);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pantry_axum::CorsConfig;

    use crate::{Cli, Commands};

    fn serve_args(args: &[&str]) -> super::ServeArgs {
        let argv = ["pantry", "serve"].iter().chain(args).copied();
        match Cli::parse_from(argv).command {
            Some(Commands::Serve(args)) => args,
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_serve_defaults() {
        let config = serve_args(&[]).server_config();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.cors, CorsConfig::AllowAll);
        assert_eq!(config.api_token, None);
        assert_eq!(config.caller_header, pantry_axum::DEFAULT_CALLER_HEADER);
    }

    #[test]
    fn test_serve_flags() {
        let config = serve_args(&[
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
            "--cors-origin",
            "https://a.test",
            "--cors-origin",
            "https://b.test",
            "--api-token",
            "tok",
            "--caller-header",
            "x-forwarded-user",
        ])
        .server_config();

        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(
            config.cors,
            CorsConfig::AllowOrigins(vec!["https://a.test".into(), "https://b.test".into()])
        );
        assert_eq!(config.api_token.as_deref(), Some("tok"));
        assert_eq!(config.caller_header, "x-forwarded-user");
    }

    #[test]
    fn test_comma_separated_origins() {
        let config = serve_args(&["--cors-origin", "https://a.test, https://b.test"]).server_config();
        assert_eq!(
            config.cors,
            CorsConfig::AllowOrigins(vec!["https://a.test".into(), "https://b.test".into()])
        );
    }

    #[test]
    fn test_empty_token_disables_auth() {
        let config = serve_args(&["--api-token", ""]).server_config();
        assert_eq!(config.api_token, None);
    }
}
