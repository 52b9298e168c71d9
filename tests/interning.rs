use std::rc::Rc;

use quill_lang::value::Value;
use quill_lang::Environment;

/// Two `intern` calls with equal content share the same allocation.
#[test]
fn equal_text_interns_to_the_same_allocation() {
    let env = Environment::new();
    let a = env.intern("shared");
    let b = env.intern("shared");
    assert!(Rc::ptr_eq(&a, &b));
}

#[test]
fn string_literals_in_a_script_intern_through_the_environment() {
    let mut env = Environment::new();
    let program = env
        .compile("local a = \"hello\"; local b = \"hello\"; return a == b;")
        .unwrap();
    let result = env.call(&program, Vec::new()).unwrap();
    assert_eq!(result, Value::Boolean(true));
}

#[test]
fn arrays_and_tables_hold_their_own_storage_across_copies() {
    let mut env = Environment::new();
    let program = env
        .compile(
            "local t = { n = 1 };
             local copy = t;
             copy.n = 2;
             return t.n;",
        )
        .unwrap();
    let result = env.call(&program, Vec::new()).unwrap();
    // Tables are reference-counted handles: assigning `copy = t` shares the
    // same storage, so mutating through `copy` is visible through `t`.
    assert_eq!(result, Value::Integer(2));
}
