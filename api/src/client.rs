use log::debug;
use reqwest::{Client, StatusCode};
use std::fmt;

pub type ApiResult<T> = Result<T, ApiError>;

/// Where the documents live and how requests to them are signed.
///
/// `access_token` is appended verbatim to every address (a SAS-style
/// `?sv=...&sig=...` string), so `request_uri` must end where a document
/// path can be glued on, usually with a trailing `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsConfig {
    pub request_uri: String,
    pub access_token: String,
}

impl StatsConfig {
    pub fn new(request_uri: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self { request_uri: request_uri.into(), access_token: access_token.into() }
    }

    /// Full address of a document: base + path + token, concatenated as-is.
    pub fn document_url(&self, path: &str) -> String {
        format!("{}{}{}", self.request_uri, path, self.access_token)
    }

    /// Same address without the token, for logs and error messages.
    pub fn display_url(&self, path: &str) -> String {
        format!("{}{}", self.request_uri, path)
    }
}

/// Reads raw documents from blob storage.
#[derive(Debug, Clone)]
pub struct BlobClient {
    client: Client,
    config: StatsConfig,
}

/// Coarse failure class, used to pick the caller-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection, DNS or non-2xx status.
    Network,
    /// Body could not be read or parsed, or anything else.
    Unexpected,
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Status(StatusCode, String),
    Body(reqwest::Error, String),
    Parsing(serde_json::Error, String),
    Other(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(..) | ApiError::Status(..) => ErrorKind::Network,
            ApiError::Body(..) | ApiError::Parsing(..) | ApiError::Other(_) => ErrorKind::Unexpected,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Status(status, url) => write!(f, "{url} responded with {status}"),
            ApiError::Body(e, url) => write!(f, "Could not read body of {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Network(e, _) | ApiError::Body(e, _) => Some(e),
            ApiError::Parsing(e, _) => Some(e),
            ApiError::Status(..) | ApiError::Other(_) => None,
        }
    }
}

impl BlobClient {
    pub fn new(config: StatsConfig) -> Self {
        let client = Client::builder()
            .user_agent(concat!("stats-data/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        Self::with_client(client, config)
    }

    /// Share an existing connection pool.
    pub fn with_client(client: Client, config: StatsConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &StatsConfig {
        &self.config
    }

    /// GET one document and return its body text.
    ///
    /// No retries and no timeout beyond the transport defaults. Errors carry
    /// the token-free address.
    pub async fn fetch(&self, path: &str) -> ApiResult<String> {
        let url = self.config.display_url(path);
        debug!("fetching {url}");

        let response = self
            .client
            .get(self.config.document_url(path))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.without_url(), url.clone()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status, url));
        }

        response.text().await.map_err(|e| ApiError::Body(e.without_url(), url))
    }
}
