use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode vendor response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// The vendor answered, but with an error of its own.
    #[error("{vendor} error {code}: {message}")]
    Vendor {
        vendor: &'static str,
        code: String,
        message: String,
    },

    #[error("no price data for {symbol}")]
    NoData { symbol: String },

    #[error("invalid symbol: {0:?}")]
    InvalidSymbol(String),

    #[error("missing credentials: {0} must be set")]
    MissingCredentials(&'static str),

    #[error("configuration error: {0}")]
    Config(String),
}

impl FeedError {
    /// True when the failure was caused by the request itself (unknown symbol,
    /// bad parameters) rather than by the vendor or the network.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::NoData { .. } | Self::InvalidSymbol(_) => true,
            Self::Vendor { code, .. } => code
                .parse::<u16>()
                // rate limiting is the vendor's problem, not the caller's
                .map(|code| (400..500).contains(&code) && code != 429)
                .unwrap_or(false),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vendor_codes_in_the_4xx_range_are_client_errors() {
        let vendor = |code: &str| FeedError::Vendor {
            vendor: "twelvedata",
            code: code.to_string(),
            message: String::new(),
        };

        assert!(vendor("400").is_client_error());
        assert!(vendor("404").is_client_error());
        assert!(!vendor("429").is_client_error());
        assert!(!vendor("500").is_client_error());
        assert!(!vendor("Internal Server Error").is_client_error());
        assert!(FeedError::NoData {
            symbol: "X".to_string()
        }
        .is_client_error());
        assert!(!FeedError::MissingCredentials("TWELVEDATA_KEY").is_client_error());
    }
}
