use core::cell::{Cell, RefCell};
use std::panic::{catch_unwind, set_hook, take_hook, AssertUnwindSafe};
use std::sync::Once;

use bytecall_sys::{IMPORT_MODULE, SEND_RESULT_TO_HOST, WRITE_ARGS_TO_BUFFER};
use wasmer::{FunctionEnv, Imports, Store};

use super::{VMLogic, VMLogicResult};
use crate::errors::{HostError, Location};

static PANIC_HOOK: Once = Once::new();

thread_local! {
    static IN_PRIMITIVE: Cell<bool> = const { Cell::new(false) };
    static LAST_PANIC: RefCell<Option<(String, Location)>> = const { RefCell::new(None) };
}

impl VMLogic {
    /// The two protocol primitives, bound to `env`.
    pub fn imports(store: &mut Store, env: &FunctionEnv<Self>) -> Imports {
        imports! {
            store;
            env: env;

            fn write_args_to_buffer(ptr: u32) => WRITE_ARGS_TO_BUFFER;
            fn send_result_to_host(ptr: u32, len: u32) => SEND_RESULT_TO_HOST;
        }
    }
}

/// Records the message and location of panics raised inside a primitive,
/// leaving every other panic to the hook that was installed before.
fn install_panic_hook() {
    PANIC_HOOK.call_once(|| {
        let previous = take_hook();

        set_hook(Box::new(move |info| {
            if IN_PRIMITIVE.with(Cell::get) {
                let payload = info.payload();

                let message = payload
                    .downcast_ref::<&'static str>()
                    .copied()
                    .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                    .unwrap_or("<no message>");

                let location = info.location().map_or(Location::Unknown, Location::from);

                LAST_PANIC.with(|last| *last.borrow_mut() = Some((message.to_owned(), location)));
            }

            previous(info);
        }));
    });
}

/// Runs a primitive, reporting a panic inside it as [`HostError::Panic`]
/// instead of unwinding into the guest.
pub(super) fn guarded<T>(primitive: impl FnOnce() -> VMLogicResult<T>) -> VMLogicResult<T> {
    install_panic_hook();

    IN_PRIMITIVE.with(|flag| flag.set(true));
    let result = catch_unwind(AssertUnwindSafe(primitive));
    IN_PRIMITIVE.with(|flag| flag.set(false));

    result.unwrap_or_else(|_| {
        let (message, location) = LAST_PANIC
            .with(RefCell::take)
            .unwrap_or_else(|| ("<no message>".to_owned(), Location::Unknown));

        Err(HostError::Panic { message, location }.into())
    })
}

macro_rules! _imports {
    ($store:ident; env: $env:ident; $(fn $func:ident($($arg:ident: $arg_ty:ty),*$(,)?) $(-> $returns:ty)? => $name:expr;)*) => {
        {
            $(
                #[expect(clippy::allow_attributes, reason = "Needed for the macro")]
                #[allow(unused_parens, reason = "Needed for the macro")]
                fn $func(
                    mut env: wasmer::FunctionEnvMut<'_, VMLogic>,
                    $($arg: $arg_ty),*
                ) -> Result<($( $returns )?), wasmer::RuntimeError> {
                    #[cfg(feature = "host-traces")]
                    use owo_colors::OwoColorize;

                    #[cfg(feature = "host-traces")]
                    {
                        let params: &[String] = &[$(
                            format!(
                                "{}: {} = {}",
                                stringify!($arg).fg_rgb::<253, 151, 31>(),
                                stringify!($arg_ty).fg_rgb::<102, 217, 239>(),
                                $arg.fg_rgb::<190, 132, 255>()
                            )
                        ),*][..];

                        println!(
                            "{} {}({})",
                            "typst_env".fg_rgb::<102, 217, 239>(),
                            stringify!($func).fg_rgb::<166, 226, 46>(),
                            params.join(", ")
                        );
                    };

                    let res = guarded(|| {
                        let (logic, store) = env.data_and_store_mut();

                        logic.host_functions(store)?.$func($($arg),*)
                    });

                    #[cfg(feature = "host-traces")]
                    println!(
                        "  {} {}",
                        stringify!($func).fg_rgb::<166, 226, 46>(),
                        match &res {
                            Ok(_) => "ok".fg_rgb::<166, 226, 46>().to_string(),
                            Err(err) => err.to_string().fg_rgb::<249, 38, 114>().to_string(),
                        }
                    );

                    res.map_err(|err| wasmer::RuntimeError::user(Box::new(err)))
                }
            )*

            let store = $store;
            let env = $env;

            let mut imports = Imports::new();

            $(
                imports.define(
                    IMPORT_MODULE,
                    $name,
                    wasmer::Function::new_typed_with_env(&mut *store, env, $func),
                );
            )*

            imports
        }
    };
}

use _imports as imports;
