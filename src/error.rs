use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid transition timing: {0}")]
    InvalidTiming(String),

    #[error("attribute computation failed for mark `{key}`: {reason}")]
    Attribute { key: String, reason: String },

    #[error("data feed error: {0}")]
    Feed(String),
}
