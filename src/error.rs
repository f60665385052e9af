//! Typed failures for each stage of the pipeline.
//!
//! Every stage reports its own error kind so callers (and tests) can tell
//! a fetch problem apart from a bad container or a failed write, even
//! though the entry point treats all of them as "log and carry on".

use reqwest::StatusCode;
use thiserror::Error;

/// The listing page could not be turned into a document.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid fetch settings: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid value for header {name}: {reason}")]
    InvalidHeader { name: &'static str, reason: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}")]
    Status { status: StatusCode, url: String },

    #[error("unexpected content type {content_type:?} from {url}")]
    ContentType { content_type: String, url: String },

    #[error("failed to read response body from {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// True when the server answered but not with an HTML document.
    pub fn is_content_type(&self) -> bool {
        matches!(self, FetchError::ContentType { .. })
    }
}

/// A single container did not hold a usable article card.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("container has no title element")]
    MissingTitle,

    #[error("title element has no text")]
    EmptyTitle,

    #[error("container has no link")]
    MissingLink,

    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// The CSV output could not be written.
#[derive(Error, Debug)]
pub enum WriteError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error writing {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// The configuration file or overrides are unusable.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid URL {value:?}: {source}")]
    Url {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
