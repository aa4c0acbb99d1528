//! The two host primitives, and the one way out of a call that bypasses them.

use crate::buffer::{Exposed, ExposedMut};

/// The host side of a call, as seen from the guest.
///
/// Both primitives are synchronous: they return only once the host has
/// finished reading from or writing to the exposed buffer.
pub trait Host {
    /// Hands `buffer` to the host, which fills it with the concatenation of
    /// every argument of the current call.
    ///
    /// Only the address travels. The host already knows how many bytes it
    /// will write; the guest sized `buffer` from the same lengths.
    fn write_args(&self, buffer: ExposedMut<'_>);

    /// Hands `buffer` to the host as the result of the current call.
    fn send_result(&self, buffer: Exposed<'_>);
}

impl<H: Host + ?Sized> Host for &H {
    #[inline]
    fn write_args(&self, buffer: ExposedMut<'_>) {
        (**self).write_args(buffer);
    }

    #[inline]
    fn send_result(&self, buffer: Exposed<'_>) {
        (**self).send_result(buffer);
    }
}

/// The host the guest is running under.
///
/// On `wasm32` this calls the imported primitives. Elsewhere it forwards to
/// the loopback host installed by [`crate::testing::invoke`].
#[derive(Clone, Copy, Debug, Default)]
pub struct Env;

#[cfg(target_arch = "wasm32")]
impl Host for Env {
    #[inline]
    fn write_args(&self, mut buffer: ExposedMut<'_>) {
        unsafe { bytecall_sys::write_args_to_buffer(buffer.as_mut_ptr()) }
    }

    #[inline]
    fn send_result(&self, buffer: Exposed<'_>) {
        unsafe { bytecall_sys::send_result_to_host(buffer.as_ptr(), buffer.len()) }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Host for Env {
    #[inline]
    fn write_args(&self, buffer: ExposedMut<'_>) {
        crate::testing::with_current(|host| host.write_args(buffer));
    }

    #[inline]
    fn send_result(&self, buffer: Exposed<'_>) {
        crate::testing::with_current(|host| host.send_result(buffer));
    }
}

/// Terminates the call without publishing a result.
///
/// This is not a failure in the protocol sense: no status code reaches the
/// host, which only observes a trap and cannot learn `message`. Reserve it for
/// conditions the guest cannot recover from.
#[track_caller]
#[cold]
pub fn abort(message: &str) -> ! {
    #[cfg(target_arch = "wasm32")]
    {
        let _ = message;
        core::arch::wasm32::unreachable()
    }

    #[cfg(not(target_arch = "wasm32"))]
    panic!("call aborted: {message}")
}
