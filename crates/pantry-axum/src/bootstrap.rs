//! Axum server bootstrap - the composition root.
//!
//! This module is the ONLY place where infrastructure is wired together
//! for the HTTP adapter. All concrete provider clients are instantiated here.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::http::HeaderName;
use pantry_core::{FunctionsConfig, PantryFunctions, TelemetryQueue, TelemetrySink};
use pantry_providers::{ProvidersConfig, build_collector, build_providers};
use tokio::task::JoinHandle;

/// Header carrying the verified caller ID, set by the fronting gateway.
pub const DEFAULT_CALLER_HEADER: &str = "x-pantry-uid";

/// How long shutdown waits for queued telemetry to be delivered.
const TELEMETRY_DRAIN_GRACE: Duration = Duration::from_secs(5);

/// CORS configuration for the web server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsConfig {
    /// Allow all origins (development mode).
    #[default]
    AllowAll,
    /// Allow specific origins (production mode).
    AllowOrigins(Vec<String>),
}

/// Server configuration for the Axum adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port for the HTTP server.
    pub port: u16,
    /// CORS configuration.
    pub cors: CorsConfig,
    /// When set, `/api/*` requires `Authorization: Bearer <token>`.
    pub api_token: Option<String>,
    /// Request header the caller's user ID is read from.
    pub caller_header: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            cors: CorsConfig::default(),
            api_token: None,
            caller_header: DEFAULT_CALLER_HEADER.to_string(),
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set CORS to allow specific origins.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.cors = CorsConfig::AllowOrigins(origins);
        self
    }

    #[must_use]
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_caller_header(mut self, header: impl Into<String>) -> Self {
        self.caller_header = header.into();
        self
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    fn caller_header_name(&self) -> Result<HeaderName> {
        HeaderName::try_from(self.caller_header.as_str())
            .with_context(|| format!("invalid caller header name {:?}", self.caller_header))
    }
}

/// Everything the callable operations need: provider settings plus the
/// operation tunables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    pub providers: ProvidersConfig,
    pub functions: FunctionsConfig,
}

impl ServiceConfig {
    /// Read the service configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ServiceConfig::from_env`], reading through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let providers = ProvidersConfig::from_lookup(&lookup)?;

        let mut functions = FunctionsConfig::default();
        if let Some(entitlement) = lookup("PANTRY_PREMIUM_ENTITLEMENT").filter(|v| !v.is_empty()) {
            functions.premium_entitlement = entitlement;
        }
        if let Some(raw) = lookup("PANTRY_ENTITLEMENT_CONCURRENCY").filter(|v| !v.is_empty()) {
            functions.entitlement_concurrency = raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .with_context(|| {
                    format!("PANTRY_ENTITLEMENT_CONCURRENCY must be a positive integer, got {raw:?}")
                })?;
        }

        Ok(Self {
            providers,
            functions,
        })
    }
}

/// Application context for the Axum adapter.
pub struct AxumContext {
    /// The three callable operations.
    pub functions: Arc<PantryFunctions>,
    /// Header the caller ID is read from.
    pub caller_header: HeaderName,
    /// Delivery task behind the telemetry queue, when this context owns one.
    telemetry_worker: Option<JoinHandle<()>>,
}

impl AxumContext {
    /// Context reading the caller from [`DEFAULT_CALLER_HEADER`].
    pub fn new(functions: Arc<PantryFunctions>) -> Self {
        Self {
            functions,
            caller_header: HeaderName::from_static(DEFAULT_CALLER_HEADER),
            telemetry_worker: None,
        }
    }

    #[must_use]
    pub fn with_caller_header(mut self, header: HeaderName) -> Self {
        self.caller_header = header;
        self
    }

    #[must_use]
    pub fn with_telemetry_worker(mut self, worker: JoinHandle<()>) -> Self {
        self.telemetry_worker = Some(worker);
        self
    }

    /// Detach the telemetry worker so it can be awaited after the router,
    /// and with it every queue sender, is gone.
    pub fn take_telemetry_worker(&mut self) -> Option<JoinHandle<()>> {
        self.telemetry_worker.take()
    }
}

/// Wire providers, telemetry and services together.
///
/// Must run inside a tokio runtime: the telemetry worker is spawned here.
pub fn bootstrap(service: &ServiceConfig, server: &ServerConfig) -> Result<AxumContext> {
    let caller_header = server.caller_header_name()?;

    for name in service.providers.missing_credentials() {
        tracing::warn!(
            target: "pantry.bootstrap",
            variable = name,
            "Credential not configured; calls needing it will fail"
        );
    }

    // 1. Telemetry: queue in front of PostHog or the log stream
    let collector = build_collector(&service.providers.posthog)
        .context("failed to build telemetry collector")?;
    let (queue, worker) = TelemetryQueue::spawn(collector);
    let telemetry: Arc<dyn TelemetrySink> = Arc::new(queue);

    // 2. Provider clients
    let providers = build_providers(&service.providers, telemetry)
        .context("failed to build provider clients")?;

    // 3. Services
    let functions = Arc::new(PantryFunctions::new(providers, service.functions.clone()));

    tracing::info!(
        target: "pantry.bootstrap",
        caller_header = %caller_header,
        premium_entitlement = %service.functions.premium_entitlement,
        entitlement_concurrency = service.functions.entitlement_concurrency,
        analytics = service.providers.posthog.is_enabled(),
        "Pantry services ready"
    );

    Ok(AxumContext::new(functions)
        .with_caller_header(caller_header)
        .with_telemetry_worker(worker))
}

/// Start the web server and run until Ctrl-C.
pub async fn start_server(service: ServiceConfig, server: ServerConfig) -> Result<()> {
    use tokio::net::TcpListener;
    use tracing::info;

    let mut ctx = bootstrap(&service, &server)?;
    let telemetry_worker = ctx.take_telemetry_worker();
    let app = crate::routes::create_router(ctx, &server);

    let addr = server.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(
        auth_enabled = server.api_token.is_some(),
        "pantry functions listening on http://{}", addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");

    // The router is gone, so the queue's senders are too.
    if let Some(worker) = telemetry_worker {
        drain_telemetry(worker, TELEMETRY_DRAIN_GRACE).await;
    }
    Ok(())
}

/// Wait for the telemetry worker to deliver what is still queued.
///
/// Returns `false` if the worker failed or did not finish within `grace`.
pub async fn drain_telemetry(worker: JoinHandle<()>, grace: Duration) -> bool {
    match tokio::time::timeout(grace, worker).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Telemetry worker failed");
            false
        }
        Err(_) => {
            tracing::warn!(
                grace_secs = grace.as_secs(),
                "Telemetry still queued at shutdown; dropping the rest"
            );
            false
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
