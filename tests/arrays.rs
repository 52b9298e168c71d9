use quill_lang::value::Value;
use quill_lang::Environment;

fn run(source: &str) -> Value {
    let mut env = Environment::new();
    let program = env.compile(source).expect("script compiles");
    env.call(&program, Vec::new()).expect("script runs")
}

#[test]
fn slicing_and_negative_indices() {
    let result = run(
        "local a = [10, 20, 30, 40, 50];
         local tail = a[-2:-1];
         return tail[0] + tail[1];",
    );
    assert_eq!(result, Value::Integer(90));
}

#[test]
fn append_mutates_shared_storage() {
    let result = run(
        "local a = [1, 2];
         local b = a;
         a += 3;
         return #b;",
    );
    assert_eq!(result, Value::Integer(3));
}

#[test]
fn length_of_a_view_matches_its_window() {
    let result = run(
        "local a = [1, 2, 3, 4, 5, 6];
         local middle = a[1:3];
         return #middle;",
    );
    assert_eq!(result, Value::Integer(3));
}

#[test]
fn out_of_bounds_index_is_an_error() {
    let mut env = Environment::new();
    let program = env.compile("local a = [1, 2]; return a[5];").unwrap();
    let err = env.call(&program, Vec::new()).unwrap_err();
    assert_eq!(err.kind, quill_lang::error::ErrorKind::Bounds);
}
