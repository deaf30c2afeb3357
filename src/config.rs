use std::{
    env, fmt,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use thiserror::Error;

const DEFAULT_PORT: u16 = 3001;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported AI provider '{0}' (expected ollama, openai or gemini)")]
    UnsupportedProvider(String),
    #[error("{0} must be set for the selected AI provider")]
    MissingCredential(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    /// Self-hosted Ollama server.
    Local,
    /// OpenAI-compatible chat completions API.
    HostedChat,
    /// Gemini generateContent API.
    HostedGenerative,
}

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderKind::Local => "ollama",
            ProviderKind::HostedChat => "openai",
            ProviderKind::HostedGenerative => "gemini",
        }
    }

    fn default_model(self) -> &'static str {
        match self {
            ProviderKind::Local => "llama3",
            ProviderKind::HostedChat => "gpt-4o-mini",
            ProviderKind::HostedGenerative => "gemini-1.5-flash",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "ollama" | "local" => Ok(ProviderKind::Local),
            "openai" | "chat" => Ok(ProviderKind::HostedChat),
            "gemini" | "generative" => Ok(ProviderKind::HostedGenerative),
            _ => Err(ConfigError::UnsupportedProvider(raw.to_string())),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub endpoint: String,
    pub credential: Option<String>,
    pub model: String,
}

// Credentials stay out of the startup log.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("endpoint", &self.endpoint)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .finish()
    }
}

#[derive(Clone)]
pub struct ImageSearchConfig {
    pub endpoint: String,
    pub access_key: String,
}

impl fmt::Debug for ImageSearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageSearchConfig")
            .field("endpoint", &self.endpoint)
            .field("access_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub provider: ProviderConfig,
    pub image_search: ImageSearchConfig,
    pub static_dir: PathBuf,
    pub optimize_output: bool,
    pub upstream_timeout: Option<Duration>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup so tests do not
    /// have to touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen_addr = var("SERVER_ADDR")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(|| {
                let port = var("PORT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_PORT);
                SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port)
            });

        let kind = match var("AI_PROVIDER") {
            Some(raw) => raw.parse()?,
            None => ProviderKind::Local,
        };
        let model = var("AI_MODEL").unwrap_or_else(|| kind.default_model().to_string());

        let (endpoint, credential) = match kind {
            ProviderKind::Local => {
                let host = var("OLLAMA_API_HOST").unwrap_or_else(|| "localhost".to_string());
                let port = var("OLLAMA_API_PORT")
                    .and_then(|v| v.parse::<u16>().ok())
                    .unwrap_or(11434);
                (format!("http://{host}:{port}"), None)
            }
            ProviderKind::HostedChat => (
                var("OPENAI_BASE_URL").unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
                Some(var("OPENAI_API_KEY").ok_or(ConfigError::MissingCredential("OPENAI_API_KEY"))?),
            ),
            ProviderKind::HostedGenerative => (
                var("GEMINI_BASE_URL").unwrap_or_else(|| {
                    "https://generativelanguage.googleapis.com/v1beta".to_string()
                }),
                Some(var("GEMINI_API_KEY").ok_or(ConfigError::MissingCredential("GEMINI_API_KEY"))?),
            ),
        };

        let image_search = ImageSearchConfig {
            endpoint: trim_endpoint(
                var("UNSPLASH_BASE_URL").unwrap_or_else(|| "https://api.unsplash.com".to_string()),
            ),
            access_key: var("UNSPLASH_ACCESS_KEY").unwrap_or_default(),
        };

        let static_dir = PathBuf::from(var("STATIC_DIR").unwrap_or_else(|| "public".to_string()));

        let optimize_output = var("ENABLE_OPTIMIZATION")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
            .unwrap_or(false);

        let upstream_timeout = match var("UPSTREAM_TIMEOUT_SECS").and_then(|v| v.parse::<u64>().ok())
        {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None => Some(Duration::from_secs(120)),
        };

        Ok(Self {
            listen_addr,
            provider: ProviderConfig {
                kind,
                endpoint: trim_endpoint(endpoint),
                credential,
                model,
            },
            image_search,
            static_dir,
            optimize_output,
            upstream_timeout,
        })
    }

    /// Shared outbound client for the provider and image search calls.
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = self.upstream_timeout {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

fn trim_endpoint(endpoint: String) -> String {
    endpoint.trim_end_matches('/').to_string()
}
