#![expect(
    single_use_lifetimes,
    unused_lifetimes,
    reason = "Lifetimes generated by ouroboros for `VMHostFunctions`"
)]

use ouroboros::self_referencing;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::errors::{FunctionCallError, HostError, ProtocolViolation};

mod errors;
mod imports;

pub use errors::VMLogicError;

pub type VMLogicResult<T, E = VMLogicError> = Result<T, E>;

/// Resource limits applied to every guest.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
#[non_exhaustive]
pub struct VMLimits {
    /// In 64 KiB wasm pages.
    pub max_memory_pages: u32,
    pub max_stack_size: usize,
    /// Combined length of every argument of one call.
    pub max_arguments_size: u64,
    pub max_result_size: u64,
}

impl Default for VMLimits {
    fn default() -> Self {
        Self {
            max_memory_pages: 1 << 10,     // 64 MiB
            max_stack_size: 200 << 10,     // 200 KiB
            max_arguments_size: 16 << 20,  // 16 MiB
            max_result_size: 16 << 20,     // 16 MiB
        }
    }
}

impl VMLimits {
    #[must_use]
    pub const fn new(
        max_memory_pages: u32,
        max_stack_size: usize,
        max_arguments_size: u64,
        max_result_size: u64,
    ) -> Self {
        Self {
            max_memory_pages,
            max_stack_size,
            max_arguments_size,
            max_result_size,
        }
    }
}

/// Host-side state of the call in flight.
#[derive(Debug)]
pub struct VMLogic {
    limits: VMLimits,
    memory: Option<wasmer::Memory>,
    arguments: Vec<u8>,
    arguments_written: bool,
    result: Option<Vec<u8>>,
}

impl VMLogic {
    #[must_use]
    pub const fn new(limits: VMLimits) -> Self {
        Self {
            limits,
            memory: None,
            arguments: Vec::new(),
            arguments_written: false,
            result: None,
        }
    }

    #[must_use]
    pub const fn limits(&self) -> &VMLimits {
        &self.limits
    }

    #[cfg(test)]
    pub(crate) fn staged(&self) -> (&[u8], bool, Option<&[u8]>) {
        (
            &self.arguments,
            self.arguments_written,
            self.result.as_deref(),
        )
    }

    pub fn with_memory(&mut self, memory: wasmer::Memory) -> &mut Self {
        self.memory = Some(memory);
        self
    }

    /// Stages the concatenated arguments of a new call, discarding whatever
    /// the previous one left behind.
    pub fn begin(&mut self, arguments: Vec<u8>) {
        self.arguments = arguments;
        self.arguments_written = false;
        self.result = None;
    }

    /// Classifies a call that returned `status` to the host.
    pub fn finish(&mut self, name: &str, status: i32) -> Outcome {
        self.arguments = Vec::new();

        let Some(result) = self.result.take() else {
            warn!(function = name, status, "guest returned without sending a result");

            return Outcome {
                status: Some(status),
                returns: Err(ProtocolViolation::MissingResult {
                    name: name.to_owned(),
                    status,
                }
                .into()),
            };
        };

        let returns = if status == 0 {
            Ok(result)
        } else {
            Err(FunctionCallError::ExecutionError {
                status,
                message: String::from_utf8_lossy(&result).into_owned(),
            })
        };

        Outcome {
            status: Some(status),
            returns,
        }
    }

    /// Classifies a call that never returned.
    pub fn abort(&mut self, err: FunctionCallError) -> Outcome {
        self.arguments = Vec::new();
        self.result = None;

        Outcome {
            status: None,
            returns: Err(err),
        }
    }

    pub fn host_functions<'a>(
        &'a mut self,
        store: wasmer::StoreMut<'a>,
    ) -> VMLogicResult<VMHostFunctions<'a>> {
        let memory = self
            .memory
            .clone()
            .ok_or(HostError::MemoryNotInitialized)?;

        Ok(VMHostFunctionsBuilder {
            logic: self,
            store,

            memory_builder: |store| memory.view(store),
        }
        .build())
    }
}

/// How one call ended.
#[derive(Debug, Serialize)]
#[non_exhaustive]
pub struct Outcome {
    /// The raw status code, absent when the call never returned.
    pub status: Option<i32>,
    pub returns: Result<Vec<u8>, FunctionCallError>,
}

impl Outcome {
    pub fn into_result(self) -> Result<Vec<u8>, FunctionCallError> {
        self.returns
    }
}

#[self_referencing]
pub struct VMHostFunctions<'a> {
    logic: &'a mut VMLogic,
    store: wasmer::StoreMut<'a>,

    #[covariant]
    #[borrows(store)]
    memory: wasmer::MemoryView<'this>,
}

impl VMHostFunctions<'_> {
    /// Copies the staged arguments to `ptr`.
    ///
    /// The guest sized the buffer from the same lengths the host passed as
    /// parameters, so no length travels with the address.
    pub fn write_args_to_buffer(&mut self, ptr: u32) -> VMLogicResult<()> {
        let logic = self.borrow_logic();

        if logic.arguments_written {
            warn!("guest asked for its arguments twice");
            return Err(HostError::ArgumentsAlreadyWritten.into());
        }

        trace!(ptr, len = logic.arguments.len(), "writing arguments");

        self.borrow_memory()
            .write(u64::from(ptr), &logic.arguments)?;

        self.with_logic_mut(|logic| logic.arguments_written = true);

        Ok(())
    }

    /// Reads the result of the current call from `ptr..ptr + len`.
    pub fn send_result_to_host(&mut self, ptr: u32, len: u32) -> VMLogicResult<()> {
        let logic = self.borrow_logic();

        if logic.result.is_some() {
            warn!("guest sent a second result");
            return Err(HostError::ResultAlreadySent.into());
        }

        let max = logic.limits.max_result_size;
        if u64::from(len) > max {
            return Err(HostError::ResultTooLarge {
                size: u64::from(len),
                max,
            }
            .into());
        }

        trace!(ptr, len, "reading result");

        let len = usize::try_from(len).map_err(|_| HostError::IntegerOverflow)?;
        let mut buf = vec![0; len];

        self.borrow_memory().read(u64::from(ptr), &mut buf)?;

        self.with_logic_mut(|logic| logic.result = Some(buf));

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn panic_in_host(&mut self, at: u32) -> VMLogicResult<()> {
        panic!("unexpected value {at}")
    }
}
