use hostbridge_abi::{AllocError, OutOfBounds};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarshalError {
    #[error(transparent)]
    OutOfBounds(#[from] OutOfBounds),
    #[error(transparent)]
    Alloc(#[from] AllocError),
    #[error("cannot marshal a {value} value as {shape}")]
    Mismatch { value: &'static str, shape: String },
    #[error("array of {count} elements exceeds the native length limit")]
    TooManyElements { count: usize },
    #[error("expected {expected} parameter(s), received {received}")]
    ArityMismatch { expected: usize, received: usize },
    #[error("native array has negative length {0}")]
    NegativeLength(i32),
    #[error("native array of {count} elements has no data")]
    NullArrayData { count: i32 },
    #[error("struct value is missing field `{0}`")]
    MissingField(String),
}
