use thiserror::Error;

pub type MarketResult<T> = Result<T, MarketError>;

#[derive(Debug, Error)]
pub enum MarketError {
    #[error("invalid year range: start={start}, end={end}")]
    InvalidYearRange { start: i32, end: i32 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
