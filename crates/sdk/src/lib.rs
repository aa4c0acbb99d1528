//! Guest-side SDK for the bytecall protocol.
//!
//! A function annotated with [`export`] whose parameters are all `&[u8]` (or
//! `&mut [u8]`) is exported as a function taking one integer per parameter,
//! the byte length of that argument, and returning an integer status code.
//! The argument bytes themselves travel through guest memory: the generated
//! wrapper allocates a buffer of the declared total length, lets the host fill
//! it, slices it back into the declared arguments and publishes whatever the
//! function returns.
//!
//! # Example
//!
//! ```
//! use bytecall_sdk::export;
//!
//! #[export]
//! pub fn concatenate(left: &[u8], right: &[u8]) -> Vec<u8> {
//!     [left, b"*", right].concat()
//! }
//! ```
//!
//! # Return types
//!
//! - `Vec<u8>`, `Box<[u8]>`, `String`, `&[u8]`, `&mut [u8]`, `&str`
//! - `Result<T, E>` where `T` is any type implementing `AsRef<[u8]>` and `E`
//!   implements [`Display`](core::fmt::Display). An `Err` is reported to the
//!   host as a failure with the error's text as the message.
//!
//! # Trust boundary
//!
//! Argument lengths are never negotiated. The host is trusted to write exactly
//! the bytes it declared through the integer parameters, and the guest trusts
//! those parameters to size its buffer. Nothing inside the protocol detects a
//! disagreement.
//!
//! # Aborting
//!
//! Panics and [`env::abort`] terminate the call without publishing a result.
//! The host observes a trap, never a status code. Use them only for
//! unrecoverable conditions; everything else should be returned as an `Err`.

pub use bytecall_sdk_macros::export;
pub use bytecall_sys::Status;
#[cfg(feature = "cbor")]
pub use ciborium;
pub use serde;
#[cfg(feature = "json")]
pub use serde_json;

pub mod args;
pub mod buffer;
pub mod call;
pub mod codec;
pub mod env;
mod returns;
#[cfg(not(target_arch = "wasm32"))]
pub mod testing;

pub use returns::IntoOutcome;

#[doc(hidden)]
pub mod __private {
    pub use crate::args::ArgumentBuffer;
    pub use crate::call::respond;
    pub use crate::env::Env;
}
