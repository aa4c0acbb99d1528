//! Structured payloads on top of raw argument and result bytes.
//!
//! A codec carries no schema or version tag: both ends of an exported
//! function must agree on the record type out of band. Decoding errors are
//! meant to be returned as `Err`, which the protocol reports as an ordinary
//! failure.
//!
//! ```
//! # #[cfg(feature = "cbor")] {
//! use bytecall_sdk::codec::{Cbor, Codec, CodecError};
//! use bytecall_sdk::serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! #[serde(crate = "bytecall_sdk::serde")]
//! struct Point {
//!     x: i32,
//!     y: f64,
//! }
//!
//! fn sum(arg: &[u8]) -> Result<Vec<u8>, CodecError> {
//!     let point: Point = Cbor::decode(arg)?;
//!     Cbor::encode(&(f64::from(point.x) + point.y))
//! }
//! # }
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error as ThisError;

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[non_exhaustive]
pub enum CodecError {
    #[error("failed to decode payload: {0}")]
    Decode(String),
    #[error("failed to encode payload: {0}")]
    Encode(String),
}

/// A stable binary representation shared by the writer and the reader of a
/// buffer.
pub trait Codec {
    fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError>;

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError>;
}

/// CBOR, as produced by `ciborium`.
#[cfg(feature = "cbor")]
#[derive(Clone, Copy, Debug, Default)]
pub struct Cbor;

#[cfg(feature = "cbor")]
impl Codec for Cbor {
    fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::new();

        ciborium::ser::into_writer(value, &mut out)
            .map_err(|err| CodecError::Encode(err.to_string()))?;

        Ok(out)
    }

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
        ciborium::de::from_reader(bytes).map_err(|err| CodecError::Decode(err.to_string()))
    }
}

/// JSON, as produced by `serde_json`.
#[cfg(feature = "json")]
#[derive(Clone, Copy, Debug, Default)]
pub struct Json;

#[cfg(feature = "json")]
impl Codec for Json {
    fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(|err| CodecError::Encode(err.to_string()))
    }

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, CodecError> {
        serde_json::from_slice(bytes).map_err(|err| CodecError::Decode(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::{Codec, CodecError};
    use crate::call::respond;
    use crate::testing::Loopback;

    #[derive(Debug, Deserialize, PartialEq, Serialize)]
    struct Record {
        x: i32,
        y: f64,
    }

    fn sum<C: Codec>(arg: &[u8]) -> Result<Vec<u8>, CodecError> {
        let record: Record = C::decode(arg)?;

        C::encode(&(f64::from(record.x) + record.y))
    }

    fn round_trip<C: Codec>() {
        let record = Record { x: -7, y: 0.25 };

        let bytes = C::encode(&record).expect("records always encode");
        let decoded: Record = C::decode(&bytes).expect("encoded bytes decode");

        assert_eq!(decoded, record, "round trip must be lossless");
    }

    fn field_sum<C: Codec>() {
        let input = C::encode(&Record { x: 2, y: 3.5 }).expect("records always encode");

        let output = sum::<C>(&input).expect("valid input");
        let total: f64 = C::decode(&output).expect("output is a float");

        assert!((total - 5.5).abs() < f64::EPSILON, "2 + 3.5, got {total}");
    }

    fn corrupt_input_is_a_failure<C: Codec>() {
        let input = C::encode(&Record { x: 2, y: 3.5 }).expect("records always encode");
        let truncated = &input[..input.len() / 2];
        let host = Loopback::new(&[]);

        let code = respond(&host, sum::<C>(truncated));

        assert_ne!(code, 0, "decode errors are failures");
        let message = host.result().expect("failures still publish a message");
        assert!(!message.is_empty(), "diagnostic must not be empty");
        assert!(
            String::from_utf8(message).is_ok_and(|m| m.starts_with("failed to decode payload")),
            "diagnostic names the decode step"
        );
    }

    #[cfg(feature = "cbor")]
    mod cbor {
        use crate::codec::Cbor;

        #[test]
        fn round_trip() {
            super::round_trip::<Cbor>();
        }

        #[test]
        fn field_sum() {
            super::field_sum::<Cbor>();
        }

        #[test]
        fn corrupt_input_is_a_failure() {
            super::corrupt_input_is_a_failure::<Cbor>();
        }

        #[test]
        fn schema_mismatch_is_a_decode_error() {
            use crate::codec::{Codec, CodecError};

            let input = Cbor::encode("not a record").expect("strings always encode");
            let result: Result<super::Record, _> = Cbor::decode(&input);

            assert!(
                matches!(result, Err(CodecError::Decode(_))),
                "a string is not a record"
            );
        }
    }

    #[cfg(feature = "json")]
    mod json {
        use crate::codec::Json;

        #[test]
        fn round_trip() {
            super::round_trip::<Json>();
        }

        #[test]
        fn field_sum() {
            super::field_sum::<Json>();
        }

        #[test]
        fn corrupt_input_is_a_failure() {
            super::corrupt_input_is_a_failure::<Json>();
        }
    }
}
