#![allow(dead_code)]

use bytecall_sdk::export;

#[export]
async fn echo(arg: &[u8]) -> Vec<u8> {
    arg.to_vec()
}

fn main() {}
