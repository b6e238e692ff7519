//! Error types for fetching, adapter compilation and dictionary loading.
//!
//! Per-article failures are values, not panics: the fetcher returns a
//! [`FetchError`] for a single URL and the batch operations log and drop it.
//! Only [`DictionaryError`] and [`AdapterError`] are expected to halt a
//! caller, since both occur once at startup. [`RecordsError`] and
//! [`UrlListError`] cover the input files of the batch commands.

use thiserror::Error;

/// Failure to turn one URL into an [`Article`](crate::models::Article) or a
/// list of article links.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid url {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("could not decode page body from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("no site adapter matches {url}")]
    NoAdapterMatch { url: String },
}

impl FetchError {
    /// The URL this failure belongs to.
    pub fn url(&self) -> &str {
        match self {
            FetchError::InvalidUrl { url, .. }
            | FetchError::Transport { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::Parse { url, .. }
            | FetchError::NoAdapterMatch { url } => url,
        }
    }
}

/// A site adapter entry that could not be compiled.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("adapter {site}: invalid selector `{selector}`: {message}")]
    Selector {
        site: String,
        selector: String,
        message: String,
    },
    #[error("adapter {site}: invalid origin `{origin}`: {source}")]
    Origin {
        site: String,
        origin: String,
        #[source]
        source: url::ParseError,
    },
}

/// The skill dictionary could not be read or parsed.
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("failed to read skill dictionary {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON skill dictionary: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed YAML skill dictionary: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("category `{0}` must be a list of strings")]
    Category(String),
}

/// A record file for trend aggregation could not be read or parsed.
#[derive(Debug, Error)]
pub enum RecordsError {
    #[error("failed to read records {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed JSON records: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed CSV records: {0}")]
    Csv(#[from] csv::Error),
}

/// A URL list file could not be read.
#[derive(Debug, Error)]
#[error("failed to read url list {path}: {source}")]
pub struct UrlListError {
    pub path: String,
    #[source]
    pub source: std::io::Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_adapter_message_and_url() {
        let err = FetchError::NoAdapterMatch {
            url: "https://example.com/".to_string(),
        };
        assert_eq!(err.to_string(), "no site adapter matches https://example.com/");
        assert_eq!(err.url(), "https://example.com/");
    }

    #[test]
    fn test_status_message() {
        let err = FetchError::Status {
            url: "https://zenn.dev/x".to_string(),
            status: reqwest::StatusCode::NOT_FOUND,
        };
        assert!(err.to_string().contains("404"));
    }
}
