//! Error kinds surfaced by the token and limit fetchers.

use std::num::ParseIntError;

/// Failure of a single scrape against the registry.
///
/// Fetchers return these unchanged; the metric collector is the only place
/// that recovers from them.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request could not be sent, the connection failed or the body could not be read.
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The token response was not valid JSON or lacked the `token` field.
    #[error("could not decode token response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A rate-limit header did not start with a base-10 integer.
    #[error("invalid rate-limit header value {value:?}: {source}")]
    Parse {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

impl Error {
    pub(crate) fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Error::Network {
            url: url.into(),
            source,
        }
    }

    /// Short label used in logs and the scrape outcome counter.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Network { .. } => "network",
            Error::Decode(_) => "decode",
            Error::Parse { .. } => "parse",
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
