use core::fmt::Display;

use crate::call::Outcome;

mod private {
    pub trait Sealed {}
}

/// Return types an exported function may have.
pub trait IntoOutcome: private::Sealed {
    type Payload: AsRef<[u8]>;

    fn into_outcome(self) -> Outcome<Self::Payload>;
}

macro_rules! infallible {
    ($($ty:ty),* $(,)?) => {
        $(
            impl private::Sealed for $ty {}

            impl IntoOutcome for $ty {
                type Payload = Self;

                #[inline]
                fn into_outcome(self) -> Outcome<Self::Payload> {
                    Outcome::Success(self)
                }
            }
        )*
    };
}

infallible!(Vec<u8>, Box<[u8]>, String, &[u8], &mut [u8], &str);

impl<T, E> private::Sealed for Result<T, E> {}

impl<T, E> IntoOutcome for Result<T, E>
where
    T: AsRef<[u8]>,
    E: Display,
{
    type Payload = T;

    #[inline]
    fn into_outcome(self) -> Outcome<Self::Payload> {
        match self {
            Ok(payload) => Outcome::Success(payload),
            Err(err) => Outcome::Failure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IntoOutcome;
    use crate::call::Outcome;

    #[test]
    fn plain_returns_succeed() {
        assert_eq!(
            "text".into_outcome(),
            Outcome::Success("text"),
            "&str is a payload"
        );
        assert_eq!(
            String::from("owned").into_outcome().bytes(),
            b"owned",
            "String is a payload"
        );
        assert_eq!(
            vec![1_u8, 2].into_boxed_slice().into_outcome().bytes(),
            &[1_u8, 2],
            "boxed slices are payloads"
        );
    }

    #[test]
    fn results_keep_their_branch() {
        let ok: Result<&[u8], String> = Ok(b"fine");
        let err: Result<&[u8], String> = Err("broken".to_owned());

        assert_eq!(ok.into_outcome(), Outcome::Success(&b"fine"[..]), "ok");
        assert_eq!(
            err.into_outcome(),
            Outcome::Failure("broken".to_owned()),
            "err"
        );
    }
}
