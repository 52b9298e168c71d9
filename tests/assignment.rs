use quill_lang::value::Value;
use quill_lang::Environment;

fn run(source: &str) -> Value {
    let mut env = Environment::new();
    let program = env.compile(source).expect("script compiles");
    env.call(&program, Vec::new()).expect("script runs")
}

#[test]
fn compound_assignment_operators() {
    let result = run(
        "local x = 10;
         x += 5;
         x -= 3;
         x *= 2;
         x /= 4;
         return x;",
    );
    assert_eq!(result, Value::Number(6.0));
}

#[test]
fn prefix_and_postfix_increment() {
    let result = run(
        "local x = 5;
         local pre = ++x;
         local post = x++;
         return pre + post + x;",
    );
    // pre = 6 (x now 6), post = 6 (x now 7, post keeps the old value), x = 7
    assert_eq!(result, Value::Integer(19));
}

#[test]
fn unresolved_write_creates_a_global() {
    let result = run(
        "function set_it() {
             total = 42;
         }
         set_it();
         return total;",
    );
    assert_eq!(result, Value::Integer(42));
}

#[test]
fn table_field_assignment_via_dot() {
    let result = run(
        "local t = { value = 1 };
         t.value = t.value + 41;
         return t.value;",
    );
    assert_eq!(result, Value::Integer(42));
}
