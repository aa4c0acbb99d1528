#![allow(unused_crate_dependencies, reason = "Dependencies of the library")]

use bytecall_runtime::errors::{
    FunctionCallError, HostError, MethodResolutionError, ProtocolViolation, VMRuntimeError,
    WasmTrap,
};
use bytecall_runtime::logic::VMLimits;
use bytecall_runtime::{run, Plugin};

fn guest() -> Vec<u8> {
    wat::parse_str(include_str!("guest.wat")).expect("guest.wat is valid")
}

fn plugin() -> Plugin {
    Plugin::new(&guest(), &VMLimits::default()).expect("guest instantiates")
}

#[test]
fn concatenate() {
    let outcome = plugin().call("concatenate", &[b"foo", b"bar"]);

    assert_eq!(outcome.status, Some(0));
    assert_eq!(outcome.into_result().expect("success"), b"foo*bar");
}

#[test]
fn shuffle() {
    let outcome = plugin().call("shuffle", &[b"a", b"b", b"c"]);

    assert_eq!(outcome.into_result().expect("success"), b"c-a-b");
}

#[test]
fn double_it() {
    let outcome = plugin().call("double_it", &[b"xy"]);

    assert_eq!(outcome.into_result().expect("success"), b"xyxy");
}

#[test]
fn no_arguments() {
    let outcome = plugin().call("hello", &[]);

    assert_eq!(outcome.into_result().expect("success"), b"Hello from wasm!!!");
}

#[test]
fn zero_length_arguments() {
    let outcome = plugin().call("concatenate", &[b"", b""]);

    assert_eq!(outcome.into_result().expect("success"), b"*");
}

#[test]
fn repeated_calls_are_identical() {
    let mut plugin = plugin();

    let first = plugin.call("shuffle", &[b"value1", b"value2", b"value3"]);
    let second = plugin.call("shuffle", &[b"value1", b"value2", b"value3"]);

    assert_eq!(first.status, second.status);
    assert_eq!(
        first.into_result().expect("success"),
        second.into_result().expect("success")
    );
}

#[test]
fn failures_carry_their_message() {
    let outcome = plugin().call("returns_err", &[]);

    assert_eq!(outcome.status, Some(1));
    match outcome.returns {
        Err(FunctionCallError::ExecutionError { status, message }) => {
            assert_eq!(status, 1);
            assert_eq!(message, "This is an `Err`");
        }
        other => panic!("expected a failure, got {other:?}"),
    }
}

#[test]
fn any_nonzero_status_is_a_failure() {
    let outcome = plugin().call("returns_status", &[b"ignored"]);

    assert!(matches!(
        outcome.returns,
        Err(FunctionCallError::ExecutionError { status: -7, .. })
    ));
}

#[test]
fn traps_publish_nothing() {
    let mut plugin = plugin();

    let unreachable = plugin.call("will_trap", &[]);
    let arithmetic = plugin.call("divides_by_zero", &[]);

    assert_eq!(unreachable.status, None);
    assert!(matches!(
        unreachable.returns,
        Err(FunctionCallError::WasmTrap(WasmTrap::Unreachable))
    ));
    assert!(matches!(
        arithmetic.returns,
        Err(FunctionCallError::WasmTrap(WasmTrap::IllegalArithmetic))
    ));
}

#[test]
fn plugin_survives_a_trap() {
    let mut plugin = plugin();

    let _trapped = plugin.call("will_trap", &[]);
    let outcome = plugin.call("concatenate", &[b"foo", b"bar"]);

    assert_eq!(outcome.into_result().expect("success"), b"foo*bar");
}

#[test]
fn returning_without_a_result_is_a_violation() {
    let outcome = plugin().call("forgets_result", &[]);

    assert!(matches!(
        outcome.returns,
        Err(FunctionCallError::ProtocolViolation(
            ProtocolViolation::MissingResult { status: 0, .. }
        ))
    ));
}

#[test]
fn results_do_not_leak_into_the_next_call() {
    let mut plugin = plugin();

    let _hello = plugin.call("hello", &[]);
    let outcome = plugin.call("forgets_result", &[]);

    assert!(matches!(
        outcome.returns,
        Err(FunctionCallError::ProtocolViolation(_))
    ));
}

#[test]
fn handoffs_happen_at_most_once() {
    let mut plugin = plugin();

    let sent = plugin.call("sends_twice", &[]);
    let written = plugin.call("writes_twice", &[b"ab"]);

    assert!(matches!(
        sent.returns,
        Err(FunctionCallError::HostError(HostError::ResultAlreadySent))
    ));
    assert!(matches!(
        written.returns,
        Err(FunctionCallError::HostError(
            HostError::ArgumentsAlreadyWritten
        ))
    ));
}

#[test]
fn out_of_bounds_addresses_are_rejected() {
    let mut plugin = plugin();

    let written = plugin.call("writes_out_of_bounds", &[b"ab"]);
    let sent = plugin.call("sends_out_of_bounds", &[]);

    assert!(matches!(
        written.returns,
        Err(FunctionCallError::HostError(HostError::InvalidMemoryAccess))
    ));
    assert!(matches!(
        sent.returns,
        Err(FunctionCallError::HostError(HostError::InvalidMemoryAccess))
    ));
}

#[test]
fn limits_are_enforced() {
    let limits = VMLimits::new(16, 200 << 10, 4, 1024);
    let mut plugin = Plugin::new(&guest(), &limits).expect("guest instantiates");

    let arguments = plugin.call("concatenate", &[b"foo", b"bar"]);
    let result = plugin.call("sends_everything", &[]);

    assert!(matches!(
        arguments.returns,
        Err(FunctionCallError::HostError(HostError::ArgumentsTooLarge {
            size: 6,
            max: 4
        }))
    ));
    assert!(matches!(
        result.returns,
        Err(FunctionCallError::HostError(HostError::ResultTooLarge {
            size: 65536,
            max: 1024
        }))
    ));
}

#[test]
fn calls_are_resolved_against_the_protocol() {
    let mut plugin = plugin();

    let missing = plugin.call("missing", &[]);
    let wide = plugin.call("takes_i64", &[b"x"]);
    let silent = plugin.call("returns_nothing", &[b"x"]);
    let arity = plugin.call("concatenate", &[b"foo"]);

    assert!(matches!(
        missing.returns,
        Err(FunctionCallError::MethodResolutionError(
            MethodResolutionError::MethodNotFound { .. }
        ))
    ));
    for outcome in [wide, silent] {
        assert!(matches!(
            outcome.returns,
            Err(FunctionCallError::MethodResolutionError(
                MethodResolutionError::InvalidSignature { .. }
            ))
        ));
    }
    assert!(matches!(
        arity.returns,
        Err(FunctionCallError::MethodResolutionError(
            MethodResolutionError::ArgumentCountMismatch {
                expected: 2,
                found: 1,
                ..
            }
        ))
    ));
}

#[test]
fn functions_are_listed() {
    let plugin = plugin();

    assert!(plugin.has_function("concatenate"));
    assert!(!plugin.has_function("memory"));
    assert!(plugin.functions().any(|name| name == "shuffle"));
}

#[test]
fn memory_must_be_exported() {
    let code = wat::parse_str("(module (memory 1))").expect("valid module");

    assert!(matches!(
        Plugin::new(&code, &VMLimits::default()),
        Err(VMRuntimeError::MissingMemory)
    ));
}

#[test]
fn foreign_imports_do_not_link() {
    let code = wat::parse_str(
        r#"(module
            (import "env" "abort" (func))
            (memory (export "memory") 1))"#,
    )
    .expect("valid module");

    assert!(matches!(
        Plugin::new(&code, &VMLimits::default()),
        Err(VMRuntimeError::LinkError(_))
    ));
}

#[test]
fn memory_is_capped() {
    let code = wat::parse_str(r#"(module (memory (export "memory") 32))"#).expect("valid module");
    let limits = VMLimits::new(16, 200 << 10, 1 << 20, 1 << 20);

    assert!(Plugin::new(&code, &limits).is_err());
}

#[test]
fn one_shot_runs() {
    let outcome = run(&guest(), "concatenate", &[b"foo", b"bar"], &VMLimits::default())
        .expect("guest instantiates");

    assert_eq!(outcome.into_result().expect("success"), b"foo*bar");
}
