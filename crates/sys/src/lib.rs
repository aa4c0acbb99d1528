//! Raw surface of the bytecall protocol.
//!
//! This crate is shared by both ends of the protocol: guests link against the
//! two imported primitives, hosts use the names and the status convention to
//! provide them.

mod status;

pub use status::Status;

/// Import module under which the host provides both primitives.
pub const IMPORT_MODULE: &str = "typst_env";

/// `fn(ptr: i32)`: host copies all pending argument bytes to `ptr`.
pub const WRITE_ARGS_TO_BUFFER: &str = "wasm_minimal_protocol_write_args_to_buffer";

/// `fn(ptr: i32, len: i32)`: host reads `len` bytes at `ptr` as the call result.
pub const SEND_RESULT_TO_HOST: &str = "wasm_minimal_protocol_send_result_to_host";

/// Name under which a guest must export its linear memory.
pub const MEMORY_EXPORT: &str = "memory";

cfg_if::cfg_if! {
    if #[cfg(target_arch = "wasm32")] {
        // The names must stay in sync with the constants above.
        #[link(wasm_import_module = "typst_env")]
        extern "C" {
            #[link_name = "wasm_minimal_protocol_write_args_to_buffer"]
            pub fn write_args_to_buffer(ptr: *mut u8);

            #[link_name = "wasm_minimal_protocol_send_result_to_host"]
            pub fn send_result_to_host(ptr: *const u8, len: usize);
        }
    }
}
