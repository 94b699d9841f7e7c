use thiserror::Error;

/// Errors raised by resource retrieval collaborators.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// Error originating from the underlying HTTP client (`reqwest`).
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// An I/O error occurred while reading a local resource.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The reference could not be turned into an absolute URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The URL uses a scheme the retriever does not know how to fetch.
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    /// The resource is larger than the configured byte limit.
    #[error("Resource {url} exceeds the size limit of {limit} bytes")]
    SizeLimitExceeded { url: String, limit: u64 },
}

/// Errors raised by node renderer factories.
#[derive(Error, Debug)]
pub enum RendererError {
    #[error("No renderer is mapped to tag: {0}")]
    UnsupportedTag(String),
}

/// Errors raised while loading converter settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to deserialize settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// A type alias for `Result<T, ResourceError>` for convenience within the crate.
pub type Result<T> = std::result::Result<T, ResourceError>;
