use std::panic::catch_unwind;

use bytecall_sdk::env::abort;
use bytecall_sdk::testing::invoke;
use bytecall_sdk::{export, Status};

#[export]
fn concatenate(left: &[u8], right: &[u8]) -> Vec<u8> {
    [left, &b"*"[..], right].concat()
}

#[export]
fn shuffle(first: &[u8], second: &[u8], third: &[u8]) -> Vec<u8> {
    [third, first, second].join(&b'-')
}

#[export]
fn set_to_a(arg: &mut [u8]) -> &[u8] {
    arg.fill(b'a');
    arg
}

#[export]
fn parse_number(arg: &[u8]) -> Result<String, String> {
    let text = core::str::from_utf8(arg).map_err(|err| err.to_string())?;
    let number: u32 = text.parse().map_err(|_| format!("not a number: {text}"))?;

    Ok((number * 2).to_string())
}

#[export(name = "hello")]
fn greet() -> &'static str {
    "Hello from wasm!!!"
}

#[export]
fn will_panic() -> Vec<u8> {
    panic!("Panic")
}

#[export]
fn aborts(arg: &[u8]) -> Vec<u8> {
    if arg.is_empty() {
        abort("unrecoverable");
    }

    arg.to_vec()
}

#[test]
fn arguments_arrive_in_declaration_order() {
    let call = invoke(&[b"a", b"b", b"c"], |lengths| {
        __bytecall_export_shuffle(lengths[0], lengths[1], lengths[2])
    });

    assert_eq!(call.status(), Status::Success);
    assert_eq!(call.payload(), Some(&b"c-a-b"[..]));
    assert_eq!(call.argument_writes, 1);
    assert_eq!(call.result_sends, 1);
}

#[test]
fn empty_arguments_are_valid() {
    let call = invoke(&[b"", b""], |lengths| {
        __bytecall_export_concatenate(lengths[0], lengths[1])
    });

    assert_eq!(call.payload(), Some(&b"*"[..]));
}

#[test]
fn no_arguments_means_no_handoff() {
    let call = invoke(&[], |_| __bytecall_export_greet());

    assert_eq!(call.payload(), Some(&b"Hello from wasm!!!"[..]));
    assert_eq!(call.argument_writes, 0, "nothing to hand off");
}

#[test]
fn mutable_arguments_can_be_returned_in_place() {
    let call = invoke(&[b"xyz"], |lengths| __bytecall_export_set_to_a(lengths[0]));

    assert_eq!(call.payload(), Some(&b"aaa"[..]));
}

#[test]
fn errors_become_failures() {
    let ok = invoke(&[b"21"], |lengths| __bytecall_export_parse_number(lengths[0]));
    let err = invoke(&[b"abc"], |lengths| {
        __bytecall_export_parse_number(lengths[0])
    });

    assert_eq!(ok.payload(), Some(&b"42"[..]));
    assert_eq!(err.status(), Status::Failure);
    assert_ne!(err.status, 0);
    assert_eq!(err.message().as_deref(), Some("not a number: abc"));
    assert_eq!(err.result_sends, 1, "failures publish exactly once");
}

#[test]
fn panics_publish_nothing() {
    let outcome = catch_unwind(|| invoke(&[], |_| __bytecall_export_will_panic()));

    assert!(outcome.is_err(), "a panic is not a failure status");
}

#[test]
fn aborts_unwind_to_the_caller() {
    let outcome = catch_unwind(|| invoke(&[b""], |lengths| __bytecall_export_aborts(lengths[0])));

    let payload = outcome.expect_err("abort never returns a status");
    assert_eq!(
        payload.downcast_ref::<String>().map(String::as_str),
        Some("call aborted: unrecoverable")
    );
}

#[test]
fn calls_after_an_abort_start_clean() {
    let _aborted = catch_unwind(|| invoke(&[b""], |lengths| __bytecall_export_aborts(lengths[0])));

    let call = invoke(&[b"ok"], |lengths| __bytecall_export_aborts(lengths[0]));

    assert_eq!(call.payload(), Some(&b"ok"[..]));
    assert_eq!(call.result_sends, 1);
}
