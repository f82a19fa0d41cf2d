use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("cannot derive {axis} domain from empty data")]
    EmptyData { axis: &'static str },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("render task #{sequence} failed: {message}")]
    TaskFailed { sequence: u64, message: String },
}

impl From<serde_json::Error> for ChartError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidConfig(err.to_string())
    }
}
