use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to send the api request")]
    RequestError(#[from] reqwest::Error),

    #[error("failed to parse the api response")]
    ParseError(#[from] serde_json::Error),

    #[error("invalid upstream url")]
    UrlError(#[from] url::ParseError),

    #[error("malformed request body: {0}")]
    BadRequest(String),

    #[error("Symbols not specified")]
    SymbolsNotSpecified,

    #[error("Symbol at position {0} is empty")]
    InvalidSymbol(usize),

    #[error("upstream returned {status} for {symbol}")]
    UpstreamStatus { symbol: String, status: StatusCode },

    #[error("No usable data for {0}")]
    MissingData(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Status code reported to the caller when this error ends a whole batch.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::BadRequest(_) | Error::SymbolsNotSpecified | Error::InvalidSymbol(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::RequestError(_) | Error::ParseError(_) | Error::UpstreamStatus { .. } => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
