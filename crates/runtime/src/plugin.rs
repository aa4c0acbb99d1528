use core::fmt;

use tracing::{debug, instrument};
use wasmer::{
    Engine, Extern, Function, FunctionEnv, Instance, Module, NativeEngineExt, Store, Type, Value,
};

use crate::errors::{FunctionCallError, HostError, MethodResolutionError, VMRuntimeError};
use crate::logic::{Outcome, VMLimits, VMLogic};
use crate::memory::WasmerTunables;

/// An instantiated guest, ready to serve calls one at a time.
pub struct Plugin {
    store: Store,
    instance: Instance,
    env: FunctionEnv<VMLogic>,
    functions: Vec<String>,
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("functions", &self.functions)
            .finish_non_exhaustive()
    }
}

impl Plugin {
    /// Compiles and instantiates `code` with the protocol primitives linked
    /// in.
    ///
    /// `code` may be a binary module or, with wasmer's `wat` feature, its text
    /// form.
    pub fn new(code: &[u8], limits: &VMLimits) -> Result<Self, VMRuntimeError> {
        let mut engine = Engine::default();

        engine.set_tunables(WasmerTunables::new(limits));

        let mut store = Store::new(engine);

        let module = Module::new(&store, code)?;

        let env = FunctionEnv::new(&mut store, VMLogic::new(limits.clone()));

        let imports = VMLogic::imports(&mut store, &env);

        let instance = Instance::new(&mut store, &module, &imports)?;

        let memory = instance
            .exports
            .get_memory(bytecall_sys::MEMORY_EXPORT)
            .map_err(|_| VMRuntimeError::MissingMemory)?
            .clone();

        let _ = env.as_mut(&mut store).with_memory(memory);

        let functions = instance
            .exports
            .iter()
            .filter_map(|(name, export)| {
                matches!(export, Extern::Function(_)).then(|| name.clone())
            })
            .collect::<Vec<_>>();

        debug!(?functions, "instantiated guest");

        Ok(Self {
            store,
            instance,
            env,
            functions,
        })
    }

    /// Names of every exported function, in export order.
    pub fn functions(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(String::as_str)
    }

    #[must_use]
    pub fn has_function(&self, name: &str) -> bool {
        self.functions.iter().any(|function| function == name)
    }

    /// Calls `name` with `args`, one length parameter per argument.
    ///
    /// Every call starts from a clean slate: nothing staged by a previous call,
    /// successful or not, is visible to the next one.
    #[instrument(level = "debug", skip(self, args), fields(arity = args.len()))]
    pub fn call(&mut self, name: &str, args: &[&[u8]]) -> Outcome {
        let resolved = self
            .instance
            .exports
            .get_function(name)
            .map_err(|_| {
                FunctionCallError::from(MethodResolutionError::MethodNotFound {
                    name: name.to_owned(),
                })
            })
            .and_then(|function| Ok((function.clone(), self.prepare(name, function, args)?)));

        let (function, params) = match resolved {
            Ok(resolved) => resolved,
            Err(err) => {
                debug!(%err, "call rejected");
                return self.env.as_mut(&mut self.store).abort(err);
            }
        };

        self.env.as_mut(&mut self.store).begin(args.concat());

        let outcome = match function.call(&mut self.store, &params) {
            Ok(values) => match values.first() {
                Some(Value::I32(status)) => {
                    self.env.as_mut(&mut self.store).finish(name, *status)
                }
                _ => {
                    let err = MethodResolutionError::InvalidSignature {
                        name: name.to_owned(),
                        signature: format!("{values:?}"),
                    };
                    self.env.as_mut(&mut self.store).abort(err.into())
                }
            },
            Err(err) => {
                let err = FunctionCallError::from(err);
                debug!(%err, "call did not return");
                self.env.as_mut(&mut self.store).abort(err)
            }
        };

        debug!(status = ?outcome.status, ok = outcome.returns.is_ok(), "call finished");

        outcome
    }

    /// Checks `function` takes exactly one `i32` per argument and returns a
    /// single `i32`, then turns the argument lengths into its parameters.
    fn prepare(
        &self,
        name: &str,
        function: &Function,
        args: &[&[u8]],
    ) -> Result<Vec<Value>, FunctionCallError> {
        let signature = function.ty(&self.store);

        if !(signature.params().iter().all(|ty| *ty == Type::I32)
            && signature.results() == [Type::I32])
        {
            return Err(MethodResolutionError::InvalidSignature {
                name: name.to_owned(),
                signature: signature.to_string(),
            }
            .into());
        }

        if signature.params().len() != args.len() {
            return Err(MethodResolutionError::ArgumentCountMismatch {
                name: name.to_owned(),
                expected: signature.params().len(),
                found: args.len(),
            }
            .into());
        }

        let limits = self.env.as_ref(&self.store).limits();

        let size = args
            .iter()
            .try_fold(0_u64, |total, arg| {
                u64::try_from(arg.len())
                    .ok()
                    .and_then(|len| total.checked_add(len))
            })
            .ok_or(HostError::IntegerOverflow)?;

        if size > limits.max_arguments_size {
            return Err(HostError::ArgumentsTooLarge {
                size,
                max: limits.max_arguments_size,
            }
            .into());
        }

        args.iter()
            .map(|arg| {
                i32::try_from(arg.len())
                    .map(Value::I32)
                    .map_err(|_| HostError::IntegerOverflow.into())
            })
            .collect()
    }
}
