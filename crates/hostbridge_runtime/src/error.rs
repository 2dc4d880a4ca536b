use hostbridge_abi::AllocError;
use hostbridge_marshal::MarshalError;
use hostbridge_symbol::Symbol;
use hostbridge_ty::TypeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("object handle {0} does not refer to a live object")]
    InvalidHandle(u64),
    #[error("output buffer holds {capacity} entries but {required} are required")]
    BufferTooSmall { capacity: usize, required: usize },
    #[error("type `{ty}` has no instance field `{field}`")]
    UnknownField { ty: Symbol, field: String },
    #[error("required argument `{0}` is null")]
    NullArgument(&'static str),
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error(transparent)]
    Marshal(#[from] MarshalError),
    #[error(transparent)]
    Alloc(#[from] AllocError),
    #[error("panic: {0}")]
    Panic(String),
}
