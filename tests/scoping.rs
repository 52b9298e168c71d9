use quill_lang::value::Value;
use quill_lang::Environment;

fn run(source: &str) -> Value {
    let mut env = Environment::new();
    let program = env.compile(source).expect("script compiles");
    env.call(&program, Vec::new()).expect("script runs")
}

#[test]
fn local_shadows_outer_binding() {
    let result = run(
        "local x = 1;
         {
             local x = 2;
         }
         return x;",
    );
    assert_eq!(result, Value::Integer(1));
}

#[test]
fn inner_write_without_local_updates_outer() {
    let result = run(
        "local x = 1;
         {
             x = 2;
         }
         return x;",
    );
    assert_eq!(result, Value::Integer(2));
}

#[test]
fn function_calls_do_not_close_over_caller_locals() {
    let result = run(
        "local secret = 99;
         function reader() {
             return secret;
         }
         return reader();",
    );
    // `secret` lives in the caller's frame, not in globals, and this
    // language has no closures, so the callee sees Null instead.
    assert_eq!(result, Value::Null);
}

#[test]
fn if_else_if_else_chain_runs_at_most_one_arm() {
    let result = run(
        "function classify(n) {
             if (n < 0) {
                 return \"negative\";
             } else if (n == 0) {
                 return \"zero\";
             } else {
                 return \"positive\";
             }
         }
         return classify(0);",
    );
    match result {
        Value::String(s) => assert_eq!(&*s, "zero"),
        other => panic!("expected a string, got {other:?}"),
    }
}
