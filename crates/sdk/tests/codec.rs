use bytecall_sdk::serde::de::DeserializeOwned;
use bytecall_sdk::serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, PartialEq, Serialize)]
#[serde(crate = "bytecall_sdk::serde")]
struct Point {
    x: i32,
    y: f64,
}

const fn structured<T: Serialize + DeserializeOwned>() {}

#[test]
fn derives_come_with_the_sdk() {
    structured::<Point>();
}

#[cfg(feature = "cbor")]
#[test]
fn cbor_records() {
    use bytecall_sdk::codec::{Cbor, Codec};

    let point = Point { x: 2, y: 3.5 };

    let bytes = Cbor::encode(&point).expect("records always encode");

    assert_eq!(Cbor::decode::<Point>(&bytes).expect("valid record"), point);
}

#[cfg(feature = "json")]
#[test]
fn json_records() {
    use bytecall_sdk::codec::{Codec, Json};

    let point: Point = Json::decode(br#"{"x":2,"y":3.5}"#).expect("valid record");

    assert_eq!(point, Point { x: 2, y: 3.5 });
}
