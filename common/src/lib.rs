use thiserror::Error;
use url::ParseError;

pub mod config;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    /// Invalid setup detected before any request is served, e.g. a bad
    /// search index endpoint or an incomplete filter registry.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The search index could not be reached or runs an unsupported version.
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The search index rejected or failed a query.
    #[error("Upstream query error: {0}")]
    UpstreamQuery(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid Uri: {0}")]
    InvalidUri(String),
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::InvalidUri(format!("URL parse error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_parse_error_maps_to_invalid_uri() {
        let err: Error = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(err, Error::InvalidUri(_)));
        assert!(err.to_string().starts_with("Invalid Uri: URL parse error"));
    }

    #[test]
    fn test_display_messages() {
        let err = Error::InvalidArgument("unknown domain 'foo'".to_string());
        assert_eq!(err.to_string(), "Invalid argument: unknown domain 'foo'");

        let err = Error::UpstreamQuery("status 400".to_string());
        assert_eq!(err.to_string(), "Upstream query error: status 400");
    }
}
