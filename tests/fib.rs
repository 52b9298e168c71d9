use quill_lang::value::Value;
use quill_lang::Environment;

/// Grounded on the teacher's `tests/fib.rs`, which spawns the compiled
/// binary and checks its stdout. This crate has no built-in `print` (a
/// standard library is an explicit non-goal), so the embedding API is
/// exercised directly instead: compile the script, call it, and check
/// the value it returns.
#[test]
fn recursive_fibonacci() {
    let mut env = Environment::new();
    let program = env
        .compile(
            "function fib(n) {
                if (n < 2) {
                    return n;
                }
                return fib(n - 1) + fib(n - 2);
            }
            return fib(15);",
        )
        .expect("script compiles");

    let result = env.call(&program, Vec::new()).expect("script runs");
    assert_eq!(result, Value::Integer(610));
}

#[test]
fn iterative_fibonacci_matches_recursive() {
    let mut env = Environment::new();
    let program = env
        .compile(
            "function fib(n) {
                local a = 0;
                local b = 1;
                for (local i = 0; i < n; i += 1) {
                    local next = a + b;
                    a = b;
                    b = next;
                }
                return a;
            }
            return fib(15);",
        )
        .expect("script compiles");

    let result = env.call(&program, Vec::new()).expect("script runs");
    assert_eq!(result, Value::Integer(610));
}
