/// Status code returned by every exported guest function.
///
/// Only the distinction between zero and nonzero carries meaning. Guests emit
/// [`Status::Failure`] for every recoverable error; hosts must accept any
/// nonzero value as a failure.
#[repr(i32)]
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub enum Status {
    Success = 0,
    Failure = 1,
}

impl Status {
    #[inline]
    #[must_use]
    pub const fn code(self) -> i32 {
        self as i32
    }

    #[inline]
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        if code == 0 {
            Self::Success
        } else {
            Self::Failure
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<Status> for i32 {
    #[inline]
    fn from(status: Status) -> Self {
        status.code()
    }
}
