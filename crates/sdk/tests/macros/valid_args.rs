use bytecall_sdk::export;

#[export]
fn no_args() -> Vec<u8> {
    Vec::new()
}

#[export]
fn shared(left: &[u8], right: &[u8]) -> Vec<u8> {
    [left, right].concat()
}

#[export]
fn exclusive(buffer: &mut [u8]) -> Vec<u8> {
    buffer.reverse();
    buffer.to_vec()
}

#[export]
fn mixed<'a>(first: &'a [u8], second: &'a mut [u8], _: &[u8]) -> &'a [u8] {
    second.copy_from_slice(first);
    first
}

#[export]
fn mutable_binding(mut data: &[u8]) -> Vec<u8> {
    data = &data[..data.len().min(1)];
    data.to_vec()
}

fn main() {
    let _: extern "C-unwind" fn() -> i32 = __bytecall_export_no_args;
    let _: extern "C-unwind" fn(usize, usize) -> i32 = __bytecall_export_shared;
    let _: extern "C-unwind" fn(usize) -> i32 = __bytecall_export_exclusive;
    let _: extern "C-unwind" fn(usize, usize, usize) -> i32 = __bytecall_export_mixed;
    let _: extern "C-unwind" fn(usize) -> i32 = __bytecall_export_mutable_binding;
}
