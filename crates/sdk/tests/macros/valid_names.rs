use bytecall_sdk::export;

#[export(name = "greet")]
fn hello() -> &'static str {
    "Hello from wasm!!!"
}

#[export(name = "type")]
fn r#type(arg: &[u8]) -> Vec<u8> {
    arg.to_vec()
}

mod nested {
    #[bytecall_sdk::export]
    pub fn inner() -> Vec<u8> {
        Vec::new()
    }
}

fn main() {
    let _ = hello();
    let _: extern "C-unwind" fn() -> i32 = __bytecall_export_hello;
    let _: extern "C-unwind" fn(usize) -> i32 = __bytecall_export_type;
    let _: extern "C-unwind" fn() -> i32 = nested::__bytecall_export_inner;
}
