use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("custom error occurred: {0}")]
pub struct CustomError(pub u32);
