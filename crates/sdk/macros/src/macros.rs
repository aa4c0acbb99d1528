macro_rules! parse_macro_input {
    ({ $item:expr } => $stream:ident as $ty:ty) => {
        match syn::parse::<$ty>($stream) {
            Ok(data) => data,
            Err(err) => {
                let item = proc_macro2::TokenStream::from($item);
                let errors = $crate::errors::Errors::new(&item);
                errors.subsume(err);
                return errors.to_compile_error().into();
            }
        }
    };
    ($stream:ident as $ty:ty) => {
        match syn::parse::<$ty>($stream) {
            Ok(data) => data,
            Err(err) => return err.to_compile_error().into(),
        }
    };
}

pub(crate) use parse_macro_input;
