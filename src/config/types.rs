use serde::Deserialize;

/// Main configuration structure for Fauna-Watch
///
/// Constructed once at startup, validated, and passed by reference into
/// every component that needs it.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub forum: ForumConfig,
    pub fetch: FetchConfig,
    pub email: EmailConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Forum crawl target configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ForumConfig {
    /// Origin that relative thread links are joined to
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the thread listing below the base URL
    #[serde(rename = "listing-path")]
    pub listing_path: String,

    /// Number of listing pages to walk
    #[serde(rename = "page-count")]
    pub page_count: u32,

    /// Polite delay between successful page fetches (milliseconds)
    #[serde(rename = "page-delay-ms", default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
}

impl ForumConfig {
    /// Full URL of the first listing page
    pub fn listing_url(&self) -> String {
        format!("{}{}", self.base_url, self.listing_path)
    }
}

fn default_page_delay_ms() -> u64 {
    1000
}

/// Fetch strategy selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Plain GET requests carrying the configured user-agent
    Direct,
    /// Requests wrapped through a web-unlocker proxy service
    Proxy,
}

/// HTTP fetch configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    pub mode: FetchMode,

    /// Client identity attached to direct requests
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Request endpoint of the web-unlocker proxy service
    #[serde(rename = "proxy-endpoint", default = "default_proxy_endpoint")]
    pub proxy_endpoint: String,

    /// Response zone requested from the proxy service
    #[serde(rename = "proxy-zone", default = "default_proxy_zone")]
    pub proxy_zone: String,

    /// Bearer token for the proxy service
    ///
    /// May also be supplied through the FAUNA_WATCH_PROXY_TOKEN
    /// environment variable. Proxy mode without a token is a hard
    /// configuration error, never a silent fallback.
    #[serde(rename = "proxy-token")]
    pub proxy_token: Option<String>,
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
        .to_string()
}

fn default_proxy_endpoint() -> String {
    "https://api.brightdata.com/request".to_string()
}

fn default_proxy_zone() -> String {
    "web_unlocker1".to_string()
}

/// Email digest configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// Digest recipient address
    pub recipient: String,

    /// Digest subject line
    #[serde(default = "default_subject")]
    pub subject: String,

    /// Path of the stored authorization token
    #[serde(rename = "token-path", default = "default_token_path")]
    pub token_path: String,

    /// Path of the OAuth client credentials file used by the
    /// interactive grant flow
    #[serde(rename = "credentials-path", default = "default_credentials_path")]
    pub credentials_path: String,

    /// Base URL of the mail provider API
    #[serde(rename = "api-base", default = "default_api_base")]
    pub api_base: String,
}

fn default_subject() -> String {
    "New Forum Posts Found!".to_string()
}

fn default_token_path() -> String {
    "token.json".to_string()
}

fn default_credentials_path() -> String {
    "credentials.json".to_string()
}

fn default_api_base() -> String {
    "https://gmail.googleapis.com".to_string()
}

/// File input/output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the keyword list (a JSON array of strings)
    #[serde(rename = "keywords-path", default = "default_keywords_path")]
    pub keywords_path: String,

    /// Path the interactive mode saves raw records to
    #[serde(rename = "records-path", default = "default_records_path")]
    pub records_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            keywords_path: default_keywords_path(),
            records_path: default_records_path(),
        }
    }
}

fn default_keywords_path() -> String {
    "keywords.json".to_string()
}

fn default_records_path() -> String {
    "forum_posts.json".to_string()
}

/// Runtime environment configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub environment: Environment,
}

/// Execution environment, modeled as an explicit capability
///
/// Controls whether refreshed authorization tokens may be written back
/// to disk and whether the interactive grant flow is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local run: prompts are possible and the token store is writable
    #[default]
    Interactive,
    /// Triggered run in a read-only context: refreshed tokens are
    /// use-once and the grant flow must fail fast
    Ephemeral,
}

impl Environment {
    /// True when the token store may be written back
    pub fn is_writable(&self) -> bool {
        matches!(self, Self::Interactive)
    }
}
