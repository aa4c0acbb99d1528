#![allow(dead_code)]

use bytecall_sdk::export;

struct Guest;

impl Guest {
    #[export]
    fn consume(self) -> Vec<u8> {
        Vec::new()
    }
}

fn main() {}
