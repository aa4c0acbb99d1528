#![allow(dead_code)]

use bytecall_sdk::export;

#[export]
fn count(items: u32) -> Vec<u8> {
    vec![0; items as usize]
}

fn main() {}
