use thiserror::Error;

pub type VisResult<T> = Result<T, VisError>;

#[derive(Debug, Error)]
pub enum VisError {
    #[error("`{operation}` called before a render target was bound")]
    Unbound { operation: &'static str },

    #[error("invalid density range: [{low}, {high})")]
    InvalidRange { low: f64, high: f64 },

    #[error("invalid margin: top={top}, bottom={bottom}, left={left}, right={right}")]
    InvalidMargin {
        top: f64,
        bottom: f64,
        left: f64,
        right: f64,
    },

    #[error("feature `{0}` is already registered")]
    DuplicateFeature(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}
