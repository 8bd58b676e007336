//! Public configuration for the provider clients.
//!
//! Every client has a builder-style config with sensible defaults.
//! [`ProvidersConfig`] bundles them and knows how to read the environment.

use std::time::Duration;

use thiserror::Error;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_OPENAI_TIMEOUT: Duration = Duration::from_secs(120);

/// User agent sent with every provider request.
pub const USER_AGENT: &str = concat!("pantry-providers/", env!("CARGO_PKG_VERSION"));

/// Placeholder printed instead of secret values.
const REDACTED: &str = "<redacted>";
const UNSET: &str = "<unset>";

/// Invalid value in the environment.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid value for {name}: {value:?} ({reason})")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
    pub reason: &'static str,
}

// ============================================================================
// Google (Identity Toolkit + Firestore)
// ============================================================================

/// Configuration shared by the Identity Toolkit and Firestore clients.
///
/// ```
/// use pantry_providers::GoogleConfig;
///
/// let config = GoogleConfig::new()
///     .with_project_id("pantry-prod")
///     .with_content_collection("posts");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleConfig {
    pub(crate) project_id: Option<String>,
    /// OAuth2 access token sent as a bearer token.
    pub(crate) access_token: Option<String>,
    pub(crate) identity_base_url: String,
    pub(crate) firestore_base_url: String,
    pub(crate) content_collection: String,
    /// Document field holding the author's user ID.
    pub(crate) author_field: String,
    pub(crate) page_size: u32,
    pub(crate) timeout: Duration,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            access_token: None,
            identity_base_url: "https://identitytoolkit.googleapis.com".to_string(),
            firestore_base_url: "https://firestore.googleapis.com".to_string(),
            content_collection: "posts".to_string(),
            author_field: "postUserID".to_string(),
            page_size: 500,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl GoogleConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    #[must_use]
    pub fn with_identity_base_url(mut self, url: impl Into<String>) -> Self {
        self.identity_base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_firestore_base_url(mut self, url: impl Into<String>) -> Self {
        self.firestore_base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_content_collection(mut self, collection: impl Into<String>) -> Self {
        self.content_collection = collection.into();
        self
    }

    #[must_use]
    pub fn with_author_field(mut self, field: impl Into<String>) -> Self {
        self.author_field = field.into();
        self
    }

    /// Page size for listing calls. Zero is treated as one.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ============================================================================
// RevenueCat
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueCatConfig {
    pub(crate) api_key: Option<String>,
    pub(crate) base_url: String,
    pub(crate) timeout: Duration,
}

impl Default for RevenueCatConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.revenuecat.com".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RevenueCatConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ============================================================================
// OneSignal
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneSignalConfig {
    pub(crate) app_id: Option<String>,
    /// REST API key, sent as `Authorization: Key <api_key>`.
    pub(crate) api_key: Option<String>,
    pub(crate) base_url: String,
    pub(crate) timeout: Duration,
}

impl Default for OneSignalConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            api_key: None,
            base_url: "https://onesignal.com".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl OneSignalConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = Some(app_id.into());
        self
    }

    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ============================================================================
// OpenAI
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiConfig {
    pub(crate) api_key: Option<String>,
    pub(crate) base_url: String,
    pub(crate) vision_model: String,
    pub(crate) max_tokens: u32,
    pub(crate) speech_model: String,
    pub(crate) voice: String,
    pub(crate) timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com".to_string(),
            vision_model: "gpt-4o".to_string(),
            max_tokens: 1024,
            speech_model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            timeout: DEFAULT_OPENAI_TIMEOUT,
        }
    }
}

impl OpenAiConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_vision_model(mut self, model: impl Into<String>) -> Self {
        self.vision_model = model.into();
        self
    }

    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    #[must_use]
    pub fn with_speech_model(mut self, model: impl Into<String>) -> Self {
        self.speech_model = model.into();
        self
    }

    #[must_use]
    pub fn with_voice(mut self, voice: impl Into<String>) -> Self {
        self.voice = voice.into();
        self
    }

    /// Defaults to 120 seconds; vision calls on large images are slow.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ============================================================================
// PostHog
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostHogConfig {
    /// Project API key. Without one, telemetry stays in the log stream.
    pub(crate) api_key: Option<String>,
    pub(crate) host: String,
    pub(crate) timeout: Duration,
}

impl Default for PostHogConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            host: "https://us.i.posthog.com".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl PostHogConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub const fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

// ============================================================================
// Bundle
// ============================================================================

/// Configuration for every provider client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvidersConfig {
    pub google: GoogleConfig,
    pub revenuecat: RevenueCatConfig,
    pub onesignal: OneSignalConfig,
    pub openai: OpenAiConfig,
    pub posthog: PostHogConfig,
}

impl ProvidersConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let timeout = seconds(get("PANTRY_HTTP_TIMEOUT_SECS"), "PANTRY_HTTP_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_TIMEOUT);
        let openai_timeout =
            seconds(get("PANTRY_OPENAI_TIMEOUT_SECS"), "PANTRY_OPENAI_TIMEOUT_SECS")?
                .unwrap_or(DEFAULT_OPENAI_TIMEOUT);

        let defaults = Self::default();

        let google = GoogleConfig {
            project_id: get("GOOGLE_CLOUD_PROJECT"),
            access_token: get("GOOGLE_ACCESS_TOKEN"),
            identity_base_url: get("PANTRY_IDENTITY_URL")
                .unwrap_or(defaults.google.identity_base_url),
            firestore_base_url: get("PANTRY_FIRESTORE_URL")
                .unwrap_or(defaults.google.firestore_base_url),
            content_collection: get("PANTRY_CONTENT_COLLECTION")
                .unwrap_or(defaults.google.content_collection),
            author_field: get("PANTRY_AUTHOR_FIELD").unwrap_or(defaults.google.author_field),
            page_size: defaults.google.page_size,
            timeout,
        };

        let revenuecat = RevenueCatConfig {
            api_key: get("REVENUECAT_API_KEY"),
            base_url: get("REVENUECAT_BASE_URL").unwrap_or(defaults.revenuecat.base_url),
            timeout,
        };

        let onesignal = OneSignalConfig {
            app_id: get("ONESIGNAL_APP_ID"),
            api_key: get("ONESIGNAL_API_KEY"),
            base_url: get("ONESIGNAL_BASE_URL").unwrap_or(defaults.onesignal.base_url),
            timeout,
        };

        let openai = OpenAiConfig {
            api_key: get("OPENAI_API_KEY"),
            base_url: get("OPENAI_BASE_URL").unwrap_or(defaults.openai.base_url),
            vision_model: get("PANTRY_VISION_MODEL").unwrap_or(defaults.openai.vision_model),
            max_tokens: defaults.openai.max_tokens,
            speech_model: get("PANTRY_SPEECH_MODEL").unwrap_or(defaults.openai.speech_model),
            voice: get("PANTRY_SPEECH_VOICE").unwrap_or(defaults.openai.voice),
            timeout: openai_timeout,
        };

        let posthog = PostHogConfig {
            api_key: get("POSTHOG_API_KEY"),
            host: get("POSTHOG_HOST").unwrap_or(defaults.posthog.host),
            timeout,
        };

        Ok(Self {
            google,
            revenuecat,
            onesignal,
            openai,
            posthog,
        })
    }

    /// Key/value view of the configuration with secrets redacted.
    pub fn describe(&self) -> Vec<(&'static str, String)> {
        vec![
            ("google.project_id", plain(self.google.project_id.as_deref())),
            ("google.access_token", secret(self.google.access_token.as_deref())),
            ("google.identity_base_url", self.google.identity_base_url.clone()),
            ("google.firestore_base_url", self.google.firestore_base_url.clone()),
            ("google.content_collection", self.google.content_collection.clone()),
            ("google.author_field", self.google.author_field.clone()),
            ("google.timeout_secs", self.google.timeout.as_secs().to_string()),
            ("revenuecat.api_key", secret(self.revenuecat.api_key.as_deref())),
            ("revenuecat.base_url", self.revenuecat.base_url.clone()),
            ("onesignal.app_id", plain(self.onesignal.app_id.as_deref())),
            ("onesignal.api_key", secret(self.onesignal.api_key.as_deref())),
            ("onesignal.base_url", self.onesignal.base_url.clone()),
            ("openai.api_key", secret(self.openai.api_key.as_deref())),
            ("openai.base_url", self.openai.base_url.clone()),
            ("openai.vision_model", self.openai.vision_model.clone()),
            ("openai.speech_model", self.openai.speech_model.clone()),
            ("openai.voice", self.openai.voice.clone()),
            ("openai.timeout_secs", self.openai.timeout.as_secs().to_string()),
            ("posthog.api_key", secret(self.posthog.api_key.as_deref())),
            ("posthog.host", self.posthog.host.clone()),
        ]
    }

    /// Names of credentials that are not configured.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        [
            ("GOOGLE_CLOUD_PROJECT", self.google.project_id.is_none()),
            ("GOOGLE_ACCESS_TOKEN", self.google.access_token.is_none()),
            ("REVENUECAT_API_KEY", self.revenuecat.api_key.is_none()),
            ("ONESIGNAL_APP_ID", self.onesignal.app_id.is_none()),
            ("ONESIGNAL_API_KEY", self.onesignal.api_key.is_none()),
            ("OPENAI_API_KEY", self.openai.api_key.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect()
    }
}

fn seconds(value: Option<String>, name: &'static str) -> Result<Option<Duration>, ConfigError> {
    value
        .map(|raw| match raw.trim().parse::<u64>() {
            Ok(0) => Err(ConfigError {
                name,
                value: raw,
                reason: "must be greater than zero",
            }),
            Ok(secs) => Ok(Duration::from_secs(secs)),
            Err(_) => Err(ConfigError {
                name,
                value: raw,
                reason: "expected a whole number of seconds",
            }),
        })
        .transpose()
}

fn plain(value: Option<&str>) -> String {
    value.unwrap_or(UNSET).to_string()
}

fn secret(value: Option<&str>) -> String {
    value.map_or(UNSET, |_| REDACTED).to_string()
}
