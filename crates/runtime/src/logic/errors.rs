use thiserror::Error;

use crate::errors::{FunctionCallError, HostError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VMLogicError {
    #[error(transparent)]
    HostError(#[from] HostError),
}

impl From<wasmer::MemoryAccessError> for VMLogicError {
    fn from(err: wasmer::MemoryAccessError) -> Self {
        match err {
            wasmer::MemoryAccessError::Overflow => Self::HostError(HostError::IntegerOverflow),
            _ => Self::HostError(HostError::InvalidMemoryAccess),
        }
    }
}

impl From<VMLogicError> for FunctionCallError {
    fn from(err: VMLogicError) -> Self {
        match err {
            VMLogicError::HostError(err) => Self::HostError(err),
        }
    }
}
