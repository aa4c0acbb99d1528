//! Native harness for exported functions.
//!
//! [`Loopback`] plays the host: it serves a fixed set of arguments and
//! records every result the guest publishes. [`invoke`] installs one for the
//! duration of a call so that the generated wrappers, which talk to
//! [`crate::env::Env`], can run outside of a WebAssembly instance.

use core::cell::RefCell;

use bytecall_sys::Status;

use crate::buffer::{Exposed, ExposedMut};
use crate::env::Host;

thread_local! {
    static CURRENT: RefCell<Option<Loopback>> = const { RefCell::new(None) };
}

#[derive(Debug, Default)]
struct State {
    argument_writes: usize,
    results: Vec<Vec<u8>>,
}

/// An in-process host.
#[derive(Debug)]
pub struct Loopback {
    pending: Vec<u8>,
    state: RefCell<State>,
}

impl Loopback {
    #[must_use]
    pub fn new(args: &[&[u8]]) -> Self {
        Self {
            pending: args.concat(),
            state: RefCell::default(),
        }
    }

    /// How many times the guest asked for its arguments.
    #[must_use]
    pub fn argument_writes(&self) -> usize {
        self.state.borrow().argument_writes
    }

    /// How many times the guest published a result.
    #[must_use]
    pub fn result_sends(&self) -> usize {
        self.state.borrow().results.len()
    }

    /// The last published result.
    #[must_use]
    pub fn result(&self) -> Option<Vec<u8>> {
        self.state.borrow().results.last().cloned()
    }
}

impl Host for Loopback {
    fn write_args(&self, mut buffer: ExposedMut<'_>) {
        assert_eq!(
            buffer.len(),
            self.pending.len(),
            "declared lengths disagree with the argument bytes"
        );

        buffer.as_mut_slice().copy_from_slice(&self.pending);

        self.state.borrow_mut().argument_writes += 1;
    }

    fn send_result(&self, buffer: Exposed<'_>) {
        self.state.borrow_mut().results.push(buffer.as_slice().to_vec());
    }
}

pub(crate) fn with_current<R>(f: impl FnOnce(&Loopback) -> R) -> R {
    CURRENT.with(|current| {
        let current = current.borrow();

        let Some(host) = current.as_ref() else {
            panic!("no host installed, run exported functions through `testing::invoke`");
        };

        f(host)
    })
}

struct Uninstall;

impl Drop for Uninstall {
    fn drop(&mut self) {
        CURRENT.with(|current| *current.borrow_mut() = None);
    }
}

/// What the host observed during one call.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Invocation {
    pub status: i32,
    pub result: Option<Vec<u8>>,
    pub argument_writes: usize,
    pub result_sends: usize,
}

impl Invocation {
    #[must_use]
    pub const fn status(&self) -> Status {
        Status::from_code(self.status)
    }

    /// The published bytes when the call succeeded.
    #[must_use]
    pub fn payload(&self) -> Option<&[u8]> {
        self.status()
            .is_success()
            .then_some(self.result.as_deref())
            .flatten()
    }

    /// The published message when the call failed.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        if self.status().is_success() {
            return None;
        }

        self.result
            .as_deref()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

/// Runs `f` as the host would run an export: with `args` staged and their
/// lengths passed as the parameters.
///
/// ```
/// use bytecall_sdk::testing::invoke;
///
/// #[bytecall_sdk::export]
/// fn concatenate(left: &[u8], right: &[u8]) -> Vec<u8> {
///     [left, &b"*"[..], right].concat()
/// }
///
/// let call = invoke(&[b"foo", b"bar"], |lengths| {
///     __bytecall_export_concatenate(lengths[0], lengths[1])
/// });
///
/// assert_eq!(call.payload(), Some(&b"foo*bar"[..]));
/// ```
pub fn invoke(args: &[&[u8]], f: impl FnOnce(&[usize]) -> i32) -> Invocation {
    let lengths: Vec<usize> = args.iter().map(|arg| arg.len()).collect();

    CURRENT.with(|current| {
        let mut current = current.borrow_mut();
        assert!(current.is_none(), "calls cannot be nested");
        *current = Some(Loopback::new(args));
    });

    let guard = Uninstall;
    let status = f(&lengths);

    let host = CURRENT.with(|current| current.borrow_mut().take());
    drop(guard);

    let Some(host) = host else {
        panic!("host was uninstalled during the call");
    };

    Invocation {
        status,
        result: host.result(),
        argument_writes: host.argument_writes(),
        result_sends: host.result_sends(),
    }
}
