use core::cell::RefCell;
use core::fmt::{self, Debug, Display, Formatter};
use core::panic::Location as PanicLocation;
use std::thread::panicking;

use prettyplease::unparse;
use proc_macro2::TokenStream;
use quote::{quote, quote_spanned, ToTokens};
use syn::{parse2, Error as SynError, File, Type};
use thiserror::Error as ThisError;

/// A type rendered the way `rustfmt` would print it.
pub struct Pretty<'a>(pub &'a Type);

impl Debug for Pretty<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pretty").field(&format_args!("{self}")).finish()
    }
}

impl Display for Pretty<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let ty = self.0;
        let item = parse2(quote! { type T = #ty; }).map_err(|_err| fmt::Error)?;

        let parsed = unparse(&File {
            shebang: None,
            attrs: vec![],
            items: vec![item],
        });

        f.pad(
            parsed
                .trim()
                .strip_prefix("type T = ")
                .and_then(|rest| rest.strip_suffix(';'))
                .ok_or(fmt::Error)?,
        )
    }
}

static TAG: &str = "(bytecall)>";

#[derive(Debug, ThisError)]
pub enum ParseError<'a> {
    #[error("unknown argument, expected `name = \"...\"`")]
    UnknownArgument,
    #[error("`name` may only be given once")]
    DuplicateName,
    #[error("export name must not be empty")]
    EmptyExportName,
    #[error("exported functions cannot take `self`")]
    NoReceiverSupport,
    #[error("expected `&[u8]` or `&mut [u8]`, found `{0}`")]
    ExpectedByteSlice(Pretty<'a>),
    #[error("expected an identifier, found a pattern")]
    ExpectedIdent,
    #[error("parameters cannot be bound by reference")]
    NoByRefBinding,
    #[error("this identifier is reserved")]
    UseOfReservedIdent,
    #[error("generic types are not supported")]
    NoGenericTypeSupport,
    #[error("const generics are not supported")]
    NoConstGenericSupport,
    #[error("where clauses are not supported")]
    NoWhereClauseSupport,
    #[error("exporting an async function is not supported")]
    NoAsyncSupport,
    #[error("exporting an unsafe function is not supported")]
    NoUnsafeSupport,
    #[error("explicit ABIs are not supported")]
    NoExplicitAbi,
    #[error("variadic functions are not supported")]
    NoVariadicSupport,
    #[error("exported functions must return their result")]
    MissingReturnType,
}

/// Accumulates every error found in `item` so they are reported together.
#[derive(Debug)]
pub struct Errors<'a, T> {
    item: &'a T,
    errors: RefCell<Option<SynError>>,
    defined_at: &'static PanicLocation<'static>,
}

impl<'a, T> Errors<'a, T> {
    #[track_caller]
    pub fn new(item: &'a T) -> Self {
        Self {
            item,
            errors: RefCell::new(None),
            defined_at: PanicLocation::caller(),
        }
    }

    pub fn subsume(&self, error: SynError) {
        match &mut *self.errors.borrow_mut() {
            err @ None => *err = Some(error),
            Some(err) => err.combine(error),
        }
    }

    pub fn check(self) -> Result<(), Self> {
        if self.errors.borrow().is_some() {
            return Err(self);
        }

        Ok(())
    }

    /// Emits every error, followed by the item itself so that the rest of the
    /// crate still resolves it.
    pub fn to_compile_error(self) -> TokenStream
    where
        T: ToTokens,
    {
        let mut tokens = TokenStream::new();

        for err in self.errors.take().into_iter().flatten() {
            let msg = err.to_string();
            quote_spanned! {err.span()=>
                ::core::compile_error!(::core::concat!(#TAG, " ", #msg));
            }
            .to_tokens(&mut tokens);
        }

        self.item.to_tokens(&mut tokens);

        tokens
    }
}

impl<T> Drop for Errors<'_, T> {
    fn drop(&mut self) {
        if !panicking() {
            assert!(
                self.errors.borrow().is_none(),
                "dropped non-empty error accumulator defined at: {}:{}:{}",
                self.defined_at.file(),
                self.defined_at.line(),
                self.defined_at.column()
            );
        }
    }
}
