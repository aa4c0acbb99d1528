#![allow(dead_code)]

use bytecall_sdk::export;

#[export]
fn echo<T>(arg: &[u8]) -> Vec<u8> {
    arg.to_vec()
}

fn main() {}
