//! Host side of the bytecall protocol.
//!
//! A guest exports functions taking one `i32` byte length per argument and
//! returning an `i32` status code. During a call it asks for its arguments
//! through `wasm_minimal_protocol_write_args_to_buffer` and publishes exactly
//! one result through `wasm_minimal_protocol_send_result_to_host`, both
//! imported from the `typst_env` module. [`Plugin`] supplies those imports and
//! classifies every call into a success payload, a failure message, or an
//! abnormal termination.

use tracing::debug;

pub mod errors;
pub mod inspect;
pub mod logic;
mod memory;
mod plugin;

pub use plugin::Plugin;


pub type Result<T, E = errors::VMRuntimeError> = std::result::Result<T, E>;

/// Instantiates `code` for a single call of `name`.
pub fn run(
    code: &[u8],
    name: &str,
    args: &[&[u8]],
    limits: &logic::VMLimits,
) -> Result<logic::Outcome> {
    let mut plugin = Plugin::new(code, limits)?;

    debug!(function = name, "one-shot call");

    Ok(plugin.call(name, args))
}
