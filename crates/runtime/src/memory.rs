use core::ptr::NonNull;

use wasmer::sys::{BaseTunables, Tunables};
use wasmer_types::{
    MemoryError, MemoryStyle, MemoryType, Pages, TableStyle, TableType, WASM_MAX_PAGES,
};
use wasmer_vm::{VMConfig, VMMemory, VMMemoryDefinition, VMTable, VMTableDefinition};

use crate::logic::VMLimits;

/// Caps every linear memory at `max_memory_pages`, and the stack at
/// `max_stack_size`.
///
/// Memories without a declared maximum are given the limit as their maximum,
/// so `memory.grow` fails inside the guest instead of exhausting the host.
pub struct WasmerTunables {
    base: BaseTunables,
    limit: Pages,
    vmconfig: VMConfig,
}

impl WasmerTunables {
    pub fn new(limits: &VMLimits) -> Self {
        let base = BaseTunables {
            static_memory_bound: Pages(limits.max_memory_pages),
            static_memory_offset_guard_size: u64::from(WASM_MAX_PAGES),
            dynamic_memory_offset_guard_size: u64::from(WASM_MAX_PAGES),
        };

        let vmconfig = VMConfig {
            wasm_stack_size: Some(limits.max_stack_size),
        };

        Self {
            base,
            limit: Pages(limits.max_memory_pages),
            vmconfig,
        }
    }

    fn adjust_memory(&self, requested: &MemoryType) -> MemoryType {
        let mut adjusted = *requested;

        if requested.maximum.is_none() {
            adjusted.maximum = Some(self.limit);
        }

        adjusted
    }

    fn validate_memory(&self, ty: &MemoryType) -> Result<(), MemoryError> {
        if ty.minimum > self.limit {
            return Err(MemoryError::Generic(format!(
                "memory needs at least {} pages, the limit is {}",
                ty.minimum.0, self.limit.0
            )));
        }

        match ty.maximum {
            Some(maximum) if maximum > self.limit => Err(MemoryError::Generic(format!(
                "memory may grow to {} pages, the limit is {}",
                maximum.0, self.limit.0
            ))),
            Some(_) => Ok(()),
            None => Err(MemoryError::Generic("memory maximum is unset".to_owned())),
        }
    }
}

impl Tunables for WasmerTunables {
    fn vmconfig(&self) -> &VMConfig {
        &self.vmconfig
    }

    fn memory_style(&self, memory: &MemoryType) -> MemoryStyle {
        self.base.memory_style(&self.adjust_memory(memory))
    }

    fn table_style(&self, table: &TableType) -> TableStyle {
        self.base.table_style(table)
    }

    fn create_host_memory(
        &self,
        ty: &MemoryType,
        style: &MemoryStyle,
    ) -> Result<VMMemory, MemoryError> {
        let adjusted = self.adjust_memory(ty);
        self.validate_memory(&adjusted)?;

        self.base.create_host_memory(&adjusted, style)
    }

    unsafe fn create_vm_memory(
        &self,
        ty: &MemoryType,
        style: &MemoryStyle,
        vm_definition_location: NonNull<VMMemoryDefinition>,
    ) -> Result<VMMemory, MemoryError> {
        let adjusted = self.adjust_memory(ty);
        self.validate_memory(&adjusted)?;

        self.base
            .create_vm_memory(&adjusted, style, vm_definition_location)
    }

    fn create_host_table(&self, ty: &TableType, style: &TableStyle) -> Result<VMTable, String> {
        self.base.create_host_table(ty, style)
    }

    unsafe fn create_vm_table(
        &self,
        ty: &TableType,
        style: &TableStyle,
        vm_definition_location: NonNull<VMTableDefinition>,
    ) -> Result<VMTable, String> {
        self.base.create_vm_table(ty, style, vm_definition_location)
    }
}
