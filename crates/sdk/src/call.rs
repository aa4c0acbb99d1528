use bytecall_sys::Status;

use crate::buffer::Exposed;
use crate::env::Host;
use crate::returns::IntoOutcome;

/// How a call ended, before it is flattened into a status code and bytes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Outcome<P> {
    Success(P),
    Failure(String),
}

impl<P: AsRef<[u8]>> Outcome<P> {
    #[must_use]
    pub const fn status(&self) -> Status {
        match self {
            Self::Success(_) => Status::Success,
            Self::Failure(_) => Status::Failure,
        }
    }

    /// The bytes published to the host: the payload, or the UTF-8 message.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        match self {
            Self::Success(payload) => payload.as_ref(),
            Self::Failure(message) => message.as_bytes(),
        }
    }

    /// Publishes the outcome and yields the status code to return.
    ///
    /// This must be the last thing an exported function does.
    pub fn publish<H: Host + ?Sized>(self, host: &H) -> i32 {
        host.send_result(Exposed::new(self.bytes()));

        self.status().code()
    }
}

/// Publishes whatever an exported function returned.
pub fn respond<H, R>(host: &H, output: R) -> i32
where
    H: Host + ?Sized,
    R: IntoOutcome,
{
    output.into_outcome().publish(host)
}
