//! Procedural macros for bytecall guests.

use proc_macro::TokenStream;
use quote::ToTokens;
use syn::ItemFn;

use crate::export::{ExportArgs, ExportFn, ExportFnInput};
use crate::macros::parse_macro_input;

mod errors;
mod export;
mod macros;

/// Exports a function over the bytecall protocol.
///
/// Every parameter must be a byte slice, `&[u8]` or `&mut [u8]`, bound to a
/// plain identifier. The function may return any type implementing
/// `bytecall_sdk::IntoOutcome`.
///
/// The function itself is left untouched. Next to it, the macro generates a
/// wrapper taking one `usize` length per parameter and returning the status
/// code. On `wasm32` the wrapper is `extern "C"` and exported under the
/// function's name, or under `name` when given:
///
/// ```ignore
/// #[bytecall_sdk::export(name = "greet")]
/// fn hello() -> &'static str {
///     "Hello from wasm!!!"
/// }
/// ```
///
/// Elsewhere it is an `extern "C-unwind"` function named
/// `__bytecall_export_<ident>`, which is how `bytecall_sdk::testing::invoke`
/// drives it. A panic inside it unwinds to the caller.
#[proc_macro_attribute]
pub fn export(args: TokenStream, input: TokenStream) -> TokenStream {
    let args = parse_macro_input!({ input } => args as ExportArgs);
    let item = parse_macro_input!(input as ItemFn);

    let tokens = match ExportFn::try_from(ExportFnInput {
        item: &item,
        args: &args,
    }) {
        Ok(data) => data.to_token_stream(),
        Err(err) => err.to_compile_error(),
    };

    tokens.into()
}
