use quill_lang::value::Value;
use quill_lang::Environment;

fn run(source: &str) -> Value {
    let mut env = Environment::new();
    let program = env.compile(source).expect("script compiles");
    env.call(&program, Vec::new()).expect("script runs")
}

#[test]
fn exponent_is_right_associative_and_always_a_number() {
    let result = run("return 2 ^ 3 ^ 2;");
    assert_eq!(result, Value::Number(512.0));
}

#[test]
fn division_always_promotes_even_for_exact_integers() {
    let result = run("return 10 / 2;");
    assert_eq!(result, Value::Number(5.0));
}

#[test]
fn modulus_stays_integer_for_two_integers() {
    let result = run("return 17 % 5;");
    assert_eq!(result, Value::Integer(2));
}

#[test]
fn short_circuit_or_skips_the_right_operand() {
    let result = run("local x = 0; local hit = true || (x = 99); return x;");
    assert_eq!(result, Value::Integer(0));
}

#[test]
fn short_circuit_and_evaluates_the_right_operand() {
    let result = run("local x = 0; local hit = false && (x = 99); return x;");
    assert_eq!(result, Value::Integer(0));
}

#[test]
fn logical_and_returns_false_not_null_on_short_circuit() {
    let result = run("return false && 5;");
    assert_eq!(result, Value::Boolean(false));
}

#[test]
fn string_and_integer_compare_by_byte_length() {
    let result = run("return \"abc\" < 5;");
    assert_eq!(result, Value::Boolean(true));
}

#[test]
fn equality_does_not_cross_numeric_types() {
    let result = run("return 5 == 5.0;");
    assert_eq!(result, Value::Boolean(false));
}

#[test]
fn bitwise_or_reinterprets_integer_bits() {
    let result = run("return 5 | 2;");
    assert_eq!(result, Value::Integer(7));
}
