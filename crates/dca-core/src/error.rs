use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DcaError {
    /// The periodic amount was zero, negative, NaN or infinite.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Nothing was left to simulate, either because the series was empty or
    /// because every price in it was unusable.
    #[error("no usable price data for {symbol}")]
    EmptySeries { symbol: String },
}
