use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("drawing surface failure: {0}")]
    Surface(String),
}

/// Structural problems in a content descriptor.
///
/// A validation failure rejects the whole `update` call; the engine keeps the
/// previously stored content untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("content must be an object")]
    NotAnObject,

    #[error("content must specify labels and data")]
    MissingLabelsOrData,

    #[error("labels and data must be arrays")]
    NotArrays,

    #[error("labels and data length must match: labels={labels}, data={data}")]
    LengthMismatch { labels: usize, data: usize },

    #[error("`{field}[{index}]` has an unsupported shape")]
    InvalidEntry { field: &'static str, index: usize },

    #[error("`data[{index}]` contains a non-finite value")]
    NonFiniteSample { index: usize },

    #[error("field `{field}` is malformed: {message}")]
    MalformedField { field: String, message: String },
}
