use core::fmt;

use bytecall_sdk::export;

#[derive(Debug)]
struct Refused;

impl fmt::Display for Refused {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("refused")
    }
}

#[export]
fn owned() -> Vec<u8> {
    b"owned".to_vec()
}

#[export]
fn boxed() -> Box<[u8]> {
    Box::new(*b"boxed")
}

#[export]
fn text() -> String {
    String::from("text")
}

#[export]
fn literal() -> &'static str {
    "literal"
}

#[export]
fn borrowed(arg: &[u8]) -> &[u8] {
    arg
}

#[export]
fn borrowed_mut(arg: &mut [u8]) -> &mut [u8] {
    arg.fill(0);
    arg
}

#[export]
fn fallible(arg: &[u8]) -> Result<Vec<u8>, String> {
    if arg.is_empty() {
        return Err("empty".to_owned());
    }
    Ok(arg.to_vec())
}

#[export]
fn custom_error() -> Result<&'static str, Refused> {
    Err(Refused)
}

fn main() {}
