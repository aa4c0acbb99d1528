#[cfg(test)]
#[path = "tests/errors.rs"]
mod tests;

use serde::Serialize;
use thiserror::Error;
use wasmer_types::TrapCode;

/// Failures while turning a binary into a callable [`Plugin`](crate::Plugin).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VMRuntimeError {
    #[error("compilation error: {0}")]
    CompilationError(#[from] wasmer::CompileError),
    #[error("link error: {0}")]
    LinkError(#[from] wasmer::LinkError),
    #[error("start function failed: {0}")]
    StartError(FunctionCallError),
    #[error("cannot instantiate on this host: {0}")]
    IncompatibleHost(String),
    #[error("guest does not export its linear memory as {:?}", bytecall_sys::MEMORY_EXPORT)]
    MissingMemory,
}

#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
#[non_exhaustive]
pub enum FunctionCallError {
    #[error(transparent)]
    MethodResolutionError(MethodResolutionError),
    #[error(transparent)]
    WasmTrap(WasmTrap),
    #[error(transparent)]
    HostError(HostError),
    #[error(transparent)]
    ProtocolViolation(ProtocolViolation),
    #[error("the function failed with status {status}: {message}")]
    ExecutionError { status: i32, message: String },
}

#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
#[non_exhaustive]
pub enum MethodResolutionError {
    #[error("function {name:?} not found")]
    MethodNotFound { name: String },
    #[error("function {name:?} has invalid signature {signature}: expected i32 parameters and a single i32 result")]
    InvalidSignature { name: String, signature: String },
    #[error("function {name:?} expects {expected} arguments, {found} given")]
    ArgumentCountMismatch {
        name: String,
        expected: usize,
        found: usize,
    },
}

#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
#[non_exhaustive]
pub enum HostError {
    #[error("invalid memory access")]
    InvalidMemoryAccess,
    #[error("guest memory is not initialized")]
    MemoryNotInitialized,
    #[error("integer overflow")]
    IntegerOverflow,
    #[error("arguments were already written for this call")]
    ArgumentsAlreadyWritten,
    #[error("a result was already sent for this call")]
    ResultAlreadySent,
    #[error("arguments span {size} bytes, at most {max} are allowed")]
    ArgumentsTooLarge { size: u64, max: u64 },
    #[error("result spans {size} bytes, at most {max} are allowed")]
    ResultTooLarge { size: u64, max: u64 },
    #[error(
        "host panicked: {message}{}",
        match .location {
            Location::Unknown => String::new(),
            Location::At { file, line, column } => format!(" at {file}:{line}:{column}"),
        }
    )]
    Panic {
        message: String,
        #[serde(skip_serializing_if = "Location::is_unknown")]
        location: Location,
    },
}

/// The guest ended a call without honoring the calling convention.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "data")]
#[non_exhaustive]
pub enum ProtocolViolation {
    #[error("function {name:?} returned status {status} without sending a result")]
    MissingResult { name: String, status: i32 },
}

#[derive(Debug, Error, Serialize)]
#[non_exhaustive]
pub enum WasmTrap {
    #[error("stack overflow")]
    StackOverflow,
    #[error("memory out of bounds")]
    MemoryOutOfBounds,
    #[error("heap misaligned")]
    HeapMisaligned,
    #[error("table access out of bounds")]
    TableAccessOutOfBounds,
    #[error("indirect call to null")]
    IndirectCallToNull,
    #[error("bad signature")]
    BadSignature,
    #[error("illegal arithmetic operation")]
    IllegalArithmetic,
    #[error("unreachable code reached")]
    Unreachable,
    #[error("unaligned atomic operation")]
    UnalignedAtomic,
    #[error("indeterminate trap: {message}")]
    Indeterminate { message: String },
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Location {
    At {
        file: String,
        line: u32,
        column: u32,
    },
    Unknown,
}

impl Location {
    const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl From<&core::panic::Location<'_>> for Location {
    fn from(location: &core::panic::Location<'_>) -> Self {
        Self::At {
            file: location.file().to_owned(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl From<wasmer::InstantiationError> for VMRuntimeError {
    fn from(err: wasmer::InstantiationError) -> Self {
        match err {
            wasmer::InstantiationError::Link(err) => err.into(),
            wasmer::InstantiationError::Start(err) => Self::StartError(err.into()),
            wasmer::InstantiationError::CpuFeature(err) => {
                Self::IncompatibleHost(format!("missing CPU feature: {err}"))
            }
            wasmer::InstantiationError::DifferentStores => {
                Self::IncompatibleHost("imports belong to a different store".to_owned())
            }
            wasmer::InstantiationError::DifferentArchOS => Self::IncompatibleHost(
                "module was compiled for a different architecture or operating system".to_owned(),
            ),
        }
    }
}

impl From<WasmTrap> for FunctionCallError {
    fn from(trap: WasmTrap) -> Self {
        Self::WasmTrap(trap)
    }
}

impl From<HostError> for FunctionCallError {
    fn from(err: HostError) -> Self {
        Self::HostError(err)
    }
}

impl From<MethodResolutionError> for FunctionCallError {
    fn from(err: MethodResolutionError) -> Self {
        Self::MethodResolutionError(err)
    }
}

impl From<ProtocolViolation> for FunctionCallError {
    fn from(err: ProtocolViolation) -> Self {
        Self::ProtocolViolation(err)
    }
}

impl From<wasmer::RuntimeError> for FunctionCallError {
    fn from(err: wasmer::RuntimeError) -> Self {
        match err.downcast::<crate::logic::VMLogicError>() {
            Ok(err) => err.into(),
            Err(err) => WasmTrap::from(err).into(),
        }
    }
}

impl From<wasmer::RuntimeError> for WasmTrap {
    fn from(err: wasmer::RuntimeError) -> Self {
        match err.clone().to_trap() {
            Some(TrapCode::StackOverflow) => Self::StackOverflow,
            Some(TrapCode::HeapAccessOutOfBounds) => Self::MemoryOutOfBounds,
            Some(TrapCode::TableAccessOutOfBounds) => Self::TableAccessOutOfBounds,
            Some(TrapCode::HeapMisaligned) => Self::HeapMisaligned,
            Some(TrapCode::IndirectCallToNull) => Self::IndirectCallToNull,
            Some(TrapCode::BadSignature) => Self::BadSignature,
            Some(
                TrapCode::IntegerOverflow
                | TrapCode::IntegerDivisionByZero
                | TrapCode::BadConversionToInteger,
            ) => Self::IllegalArithmetic,
            Some(TrapCode::UnreachableCodeReached) => Self::Unreachable,
            Some(TrapCode::UnalignedAtomic) => Self::UnalignedAtomic,
            None => Self::Indeterminate {
                message: err.message(),
            },
        }
    }
}
