use proc_macro2::{Span, TokenStream};
use quote::{format_ident, quote, quote_spanned, ToTokens};
use syn::ext::IdentExt;
use syn::parse::{Parse, ParseStream, Parser};
use syn::spanned::Spanned;
use syn::{
    meta, Error as SynError, FnArg, GenericParam, Ident, ItemFn, LitStr, Pat, ReturnType, Type,
    TypeReference,
};

use crate::errors::{Errors, ParseError, Pretty};

const RESERVED_PREFIX: &str = "__bytecall";

/// `#[export(name = "...")]`
#[derive(Default)]
pub struct ExportArgs {
    name: Option<LitStr>,
}

impl Parse for ExportArgs {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let mut args = Self::default();

        let parser = meta::parser(|meta| {
            if !meta.path.is_ident("name") {
                return Err(meta.error(ParseError::UnknownArgument));
            }

            if args.name.is_some() {
                return Err(meta.error(ParseError::DuplicateName));
            }

            let name: LitStr = meta.value()?.parse()?;
            if name.value().is_empty() {
                return Err(SynError::new(name.span(), ParseError::EmptyExportName));
            }

            args.name = Some(name);
            Ok(())
        });

        parser.parse2(input.parse()?)?;

        Ok(args)
    }
}

struct ExportArg {
    binding: Ident,
    len: Ident,
    mutable: bool,
    span: Span,
}

pub struct ExportFn<'a> {
    item: &'a ItemFn,
    export_name: String,
    wrapper: Ident,
    args: Vec<ExportArg>,
}

pub struct ExportFnInput<'a> {
    pub item: &'a ItemFn,
    pub args: &'a ExportArgs,
}

impl<'a> TryFrom<ExportFnInput<'a>> for ExportFn<'a> {
    type Error = Errors<'a, ItemFn>;

    fn try_from(input: ExportFnInput<'a>) -> Result<Self, Self::Error> {
        let errors = Errors::new(input.item);
        let sig = &input.item.sig;

        if let Some(abi) = &sig.abi {
            errors.subsume(SynError::new_spanned(abi, ParseError::NoExplicitAbi));
        }

        if let Some(asyncness) = &sig.asyncness {
            errors.subsume(SynError::new_spanned(asyncness, ParseError::NoAsyncSupport));
        }

        if let Some(unsafety) = &sig.unsafety {
            errors.subsume(SynError::new_spanned(unsafety, ParseError::NoUnsafeSupport));
        }

        if let Some(variadic) = &sig.variadic {
            errors.subsume(SynError::new_spanned(variadic, ParseError::NoVariadicSupport));
        }

        for generic in &sig.generics.params {
            match generic {
                GenericParam::Lifetime(_) => {}
                GenericParam::Type(_) => errors.subsume(SynError::new_spanned(
                    generic,
                    ParseError::NoGenericTypeSupport,
                )),
                GenericParam::Const(_) => errors.subsume(SynError::new_spanned(
                    generic,
                    ParseError::NoConstGenericSupport,
                )),
            }
        }

        if let Some(where_clause) = &sig.generics.where_clause {
            errors.subsume(SynError::new_spanned(
                where_clause,
                ParseError::NoWhereClauseSupport,
            ));
        }

        let mut args = vec![];
        for (index, arg) in sig.inputs.iter().enumerate() {
            match ExportArg::parse(index, arg) {
                Ok(arg) => args.push(arg),
                Err(err) => errors.subsume(err),
            }
        }

        if let ReturnType::Default = sig.output {
            errors.subsume(SynError::new_spanned(
                &sig.ident,
                ParseError::MissingReturnType,
            ));
        }

        errors.check()?;

        let export_name = input
            .args
            .name
            .as_ref()
            .map_or_else(|| sig.ident.unraw().to_string(), LitStr::value);

        Ok(Self {
            item: input.item,
            wrapper: format_ident!("__bytecall_export_{}", sig.ident.unraw()),
            export_name,
            args,
        })
    }
}

impl ExportArg {
    fn parse(index: usize, arg: &FnArg) -> Result<Self, SynError> {
        let arg = match arg {
            FnArg::Receiver(receiver) => {
                return Err(SynError::new_spanned(
                    receiver,
                    ParseError::NoReceiverSupport,
                ))
            }
            FnArg::Typed(arg) => arg,
        };

        let mut errors: Option<SynError> = None;
        let mut subsume = |err: SynError| match &mut errors {
            Some(errors) => errors.combine(err),
            None => errors = Some(err),
        };

        match &*arg.pat {
            Pat::Ident(pat) if pat.subpat.is_some() => {
                subsume(SynError::new_spanned(&arg.pat, ParseError::ExpectedIdent));
            }
            Pat::Ident(pat) if pat.by_ref.is_some() => {
                subsume(SynError::new_spanned(pat.by_ref, ParseError::NoByRefBinding));
            }
            Pat::Ident(pat) => {
                if pat.ident.unraw().to_string().starts_with(RESERVED_PREFIX) {
                    subsume(SynError::new_spanned(
                        &pat.ident,
                        ParseError::UseOfReservedIdent,
                    ));
                }
            }
            Pat::Wild(_) => {}
            _ => subsume(SynError::new_spanned(&arg.pat, ParseError::ExpectedIdent)),
        }

        let mutable = byte_slice(&arg.ty).map(|ty| ty.mutability.is_some());
        if mutable.is_none() {
            subsume(SynError::new_spanned(
                &arg.ty,
                ParseError::ExpectedByteSlice(Pretty(&arg.ty)),
            ));
        }

        match (errors, mutable) {
            (Some(errors), _) => Err(errors),
            (None, Some(mutable)) => Ok(Self {
                binding: format_ident!("__bytecall_arg{}", index),
                len: format_ident!("__bytecall_arg{}_len", index),
                mutable,
                span: arg.span(),
            }),
            (None, None) => Err(SynError::new_spanned(
                &arg.ty,
                ParseError::ExpectedByteSlice(Pretty(&arg.ty)),
            )),
        }
    }
}

/// `&[u8]`, `&mut [u8]` or either with a named lifetime.
fn byte_slice(ty: &Type) -> Option<&TypeReference> {
    let Type::Reference(reference) = ty else {
        return None;
    };

    let Type::Slice(slice) = &*reference.elem else {
        return None;
    };

    let Type::Path(path) = &*slice.elem else {
        return None;
    };

    (path.qself.is_none() && path.path.is_ident("u8")).then_some(reference)
}

impl ToTokens for ExportFn<'_> {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let item = self.item;
        let name = &item.sig.ident;
        let wrapper = &self.wrapper;
        let export_name = &self.export_name;

        let lens = self.args.iter().map(|arg| &arg.len).collect::<Vec<_>>();
        let bindings = self.args.iter().map(|arg| &arg.binding).collect::<Vec<_>>();

        let passed = self
            .args
            .iter()
            .map(|arg| {
                let binding = &arg.binding;
                if arg.mutable {
                    quote_spanned! {arg.span=> #binding }
                } else {
                    quote_spanned! {arg.span=> &*#binding }
                }
            })
            .collect::<Vec<_>>();

        let receive = if self.args.is_empty() {
            quote! {}
        } else {
            quote_spanned! {name.span()=>
                let mut __bytecall_args = ::bytecall_sdk::__private::ArgumentBuffer::receive(
                    &::bytecall_sdk::__private::Env,
                    [#(#lens),*],
                );

                let [#(#bindings),*] = __bytecall_args.split();
            }
        };

        let body = quote! {
            #receive

            let __bytecall_output = #name(#(#passed),*);

            ::bytecall_sdk::__private::respond(
                &::bytecall_sdk::__private::Env,
                __bytecall_output,
            )
        };

        // Natively the wrapper runs under `testing::invoke`, which has to see
        // panics and aborts unwind out of it.
        quote! {
            #item

            #[doc(hidden)]
            #[cfg(target_arch = "wasm32")]
            #[export_name = #export_name]
            pub extern "C" fn #wrapper(#(#lens: usize),*) -> i32 {
                #body
            }

            #[doc(hidden)]
            #[cfg(not(target_arch = "wasm32"))]
            pub extern "C-unwind" fn #wrapper(#(#lens: usize),*) -> i32 {
                #body
            }
        }
        .to_tokens(tokens);
    }
}
