//! Example guest.
//!
//! Build with `cargo build -p hello --target wasm32-unknown-unknown --profile app-release`
//! and call it with `bytecall call target/wasm32-unknown-unknown/app-release/hello.wasm hello`.

use bytecall_sdk::codec::{Cbor, Codec, CodecError};
use bytecall_sdk::export;
use bytecall_sdk::serde::Deserialize;

#[export]
pub fn hello() -> &'static str {
    "Hello from wasm!!!"
}

#[export]
pub fn double_it(arg: &[u8]) -> Vec<u8> {
    [arg, arg].concat()
}

#[export]
pub fn concatenate(left: &[u8], right: &[u8]) -> Vec<u8> {
    [left, &b"*"[..], right].concat()
}

#[export]
pub fn shuffle(first: &[u8], second: &[u8], third: &[u8]) -> Vec<u8> {
    [third, &b"-"[..], first, &b"-"[..], second].concat()
}

#[export]
pub fn returns_ok() -> Result<&'static str, String> {
    Ok("This is an `Ok`")
}

#[export]
pub fn returns_err() -> Result<Vec<u8>, String> {
    Err("This is an `Err`".to_owned())
}

#[export]
pub fn will_panic() -> Vec<u8> {
    panic!("unconditional panic")
}

#[derive(Debug, Deserialize)]
#[serde(crate = "bytecall_sdk::serde")]
struct Point {
    x: i32,
    y: f64,
}

/// Sums a CBOR `{ x: i32, y: f64 }` into a CBOR `f64`.
#[export]
pub fn complex_data(arg: &[u8]) -> Result<Vec<u8>, CodecError> {
    let point: Point = Cbor::decode(arg)?;

    Cbor::encode(&(f64::from(point.x) + point.y))
}

#[export]
pub fn set_to_a(arg: &mut [u8]) -> Vec<u8> {
    arg.fill(b'a');
    arg.to_vec()
}

/// Same as [`set_to_a`], publishing the argument buffer itself.
#[export]
pub fn set_to_a_reuse_buffer(arg: &mut [u8]) -> &[u8] {
    arg.fill(b'a');
    arg
}
