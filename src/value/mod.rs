//! The runtime value domain: an eight-variant tagged `Value` plus the
//! operator-dispatch tables (arithmetic, comparison, indexing) that the
//! interpreter drives.
//!
//! Grounded on the language reference's data model (spec.md §3/§4.D) and,
//! where the reference is silent on exact per-combination behavior, on
//! `original_source/include/rebar.hpp`'s `object::add`/`divide`/`modulus`/
//! `exponentiate`/`greater_than`/... free functions. Where the source's
//! manual refcounting shows through (copy bumps a refcount, destroy frees
//! at zero), `Value`'s heap-backed variants just hold an `Rc` and get that
//! behavior from `#[derive(Clone)]` plus ordinary `Drop` — there is no
//! separate copy/destroy API to write by hand.

pub mod array;
pub mod function;
pub mod native;
pub mod table;

pub use array::Array;
pub use function::{FunctionRecord, NativeFn};
pub use native::{NativeClass, NativeHandle, NativeObject};
pub use table::Table;

use std::cmp::Ordering;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::environment::Environment;
use crate::error::EvalError;
use crate::symbols::Separator;

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(isize),
    Number(f64),
    Function(Rc<FunctionRecord>),
    /// Interned, reference-counted. Two `Value::String`s built from the
    /// same `Environment::intern` call share one `Rc<str>` allocation, so
    /// `Rc::ptr_eq` is the fast path for equality; the fallback content
    /// comparison only fires for a `Value` built outside interning (there
    /// is no such path in this crate, but the impl stays honest about it).
    String(Rc<str>),
    Table(Table),
    Array(Array),
    NativeObject(NativeHandle),
}

impl Value {
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Number(_) => "number",
            Value::Function(_) => "function",
            Value::String(_) => "string",
            Value::Table(_) => "table",
            Value::Array(_) => "array",
            Value::NativeObject(o) => o.type_name(),
        }
    }

    /// `Null` is false, `Boolean(false)` is false, and — per the source's
    /// `payload != 0` truthiness check — `Integer(0)` and `Number(0.0)`
    /// are also false. Every other value (including heap-backed ones,
    /// whose payload is a non-null pointer) is true.
    pub fn truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Integer(i) => *i != 0,
            Value::Number(n) => *n != 0.0,
            _ => true,
        }
    }

    pub fn is_native_object(&self) -> bool {
        matches!(self, Value::NativeObject(_))
    }

    /// The text used when this value is coerced into a string, e.g. by
    /// `+` concatenation with a string operand. Resolves the source's
    /// silence on this exact text (spec.md names the coercion rule for
    /// `+` but not its output); grounded on `object::to_string` with
    /// quoting dropped (that quoting is for the source's own AST/debug
    /// dump, not this coercion path).
    pub fn display_string(&self, env: &Environment) -> String {
        match self {
            Value::Null => "null".to_owned(),
            Value::Boolean(b) => b.to_string(),
            Value::Integer(i) => i.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Function(_) => "function".to_owned(),
            Value::String(s) => s.to_string(),
            Value::Table(t) => format!("table[{}]", t.len()),
            Value::Array(a) => {
                let items: Vec<String> = a.iter().map(|v| v.display_string(env)).collect();
                format!("[{}]", items.join(", "))
            }
            Value::NativeObject(o) => o.to_display_string(),
        }
    }

    /// `#x`: byte length for strings, element count for arrays, the
    /// vtable length slot for native objects, and — per spec.md §4.D —
    /// the value itself, unchanged, for everything else.
    pub fn length(&self) -> Result<Value, EvalError> {
        match self {
            Value::String(s) => Ok(Value::Integer(s.len() as isize)),
            Value::Array(a) => Ok(Value::Integer(a.len() as isize)),
            Value::NativeObject(o) => o.length(),
            other => Ok(other.clone()),
        }
    }

    /// `value[key]` — Array+Integer, Table+any, String+Integer (byte),
    /// String+String (method lookup in the environment's string vtable),
    /// or a NativeObject's index slot.
    pub fn index(&self, env: &Environment, key: &Value) -> Result<Value, EvalError> {
        match self {
            Value::Array(arr) => {
                let i = require_integer(key)?;
                let idx = normalize_index(i, arr.len())
                    .ok_or_else(|| EvalError::bounds("array index out of range"))?;
                arr.get(idx)
                    .ok_or_else(|| EvalError::bounds("array index out of range"))
            }
            Value::Table(t) => Ok(t.get(key).unwrap_or(Value::Null)),
            Value::String(s) => match key {
                Value::Integer(_) => {
                    let i = require_integer(key)?;
                    let idx = normalize_index(i, s.len())
                        .ok_or_else(|| EvalError::bounds("string index out of range"))?;
                    Ok(Value::Integer(s.as_bytes()[idx] as isize))
                }
                Value::String(_) => Ok(env.string_vtable().get(key).unwrap_or(Value::Null)),
                _ => Err(EvalError::type_error(
                    "string index must be an integer or string",
                )),
            },
            Value::NativeObject(o) => o.index(key),
            _ => Err(EvalError::type_error(format!(
                "{} is not indexable",
                self.type_name()
            ))),
        }
    }

    /// `value[key] = rhs` — the mutating counterpart of `index`.
    pub fn set_index(&self, env: &Environment, key: Value, value: Value) -> Result<(), EvalError> {
        match self {
            Value::Array(arr) => {
                let i = require_integer(&key)?;
                let idx = normalize_index(i, arr.len())
                    .ok_or_else(|| EvalError::bounds("array index out of range"))?;
                if arr.set(idx, value) {
                    Ok(())
                } else {
                    Err(EvalError::bounds("array index out of range"))
                }
            }
            Value::Table(t) => {
                let _ = env;
                t.set(key, value);
                Ok(())
            }
            Value::NativeObject(o) => o.set_index(&key, value),
            _ => Err(EvalError::type_error(format!(
                "{} does not support index assignment",
                self.type_name()
            ))),
        }
    }

    /// `value[lower:upper]` — substring/sub-array view, or a
    /// NativeObject's ranged-select slot.
    pub fn ranged_index(
        &self,
        env: &Environment,
        lower: &Value,
        upper: &Value,
    ) -> Result<Value, EvalError> {
        match self {
            Value::Array(arr) => {
                let lo = require_integer(lower)?;
                let hi = require_integer(upper)?;
                Ok(Value::Array(arr.slice(lo, hi)))
            }
            Value::String(s) => {
                let lo = require_integer(lower)?;
                let hi = require_integer(upper)?;
                Ok(Value::String(env.intern(&string_slice(s, lo, hi))))
            }
            Value::NativeObject(o) => o.ranged_index(lower, upper),
            _ => Err(EvalError::type_error(format!(
                "{} does not support ranged indexing",
                self.type_name()
            ))),
        }
    }
}

fn require_integer(v: &Value) -> Result<isize, EvalError> {
    match v {
        Value::Integer(i) => Ok(*i),
        Value::Boolean(b) => Ok(if *b { 1 } else { 0 }),
        _ => Err(EvalError::type_error("expected an integer index")),
    }
}

/// Negative indices count from the end; returns `None` when the
/// (possibly negative) index still falls outside `[0, len)`.
fn normalize_index(i: isize, len: usize) -> Option<usize> {
    let len = len as isize;
    let resolved = if i < 0 { len + i } else { i };
    if resolved < 0 || resolved >= len {
        None
    } else {
        Some(resolved as usize)
    }
}

/// Byte-oriented inclusive `[lower, upper]` substring, negative indices
/// counting from the end and bounds swapped if `lower > upper` — the
/// string counterpart of `Array::slice`.
fn string_slice(s: &str, lower: isize, upper: isize) -> String {
    let bytes = s.as_bytes();
    let len = bytes.len() as isize;
    if len == 0 {
        return String::new();
    }
    let normalize = |i: isize| -> isize {
        if i < 0 {
            (len + i).max(0)
        } else {
            i.min(len - 1)
        }
    };
    let (mut lo, mut hi) = (normalize(lower), normalize(upper));
    if lo > hi {
        std::mem::swap(&mut lo, &mut hi);
    }
    String::from_utf8_lossy(&bytes[lo as usize..=hi as usize]).into_owned()
}

/// A numeric operand after Boolean-as-0/1 coercion, per spec.md §4.D:
/// "Boolean participates as 0/1 in arithmetic with Integer/Number."
#[derive(Clone, Copy)]
enum Num {
    Int(isize),
    Float(f64),
}

impl Num {
    fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }
}

fn as_num(v: &Value) -> Option<Num> {
    match v {
        Value::Integer(i) => Some(Num::Int(*i)),
        Value::Boolean(b) => Some(Num::Int(if *b { 1 } else { 0 })),
        Value::Number(n) => Some(Num::Float(*n)),
        _ => None,
    }
}

fn numeric_binary(
    a: Num,
    b: Num,
    int_op: impl FnOnce(isize, isize) -> isize,
    float_op: impl FnOnce(f64, f64) -> f64,
) -> Value {
    match (a, b) {
        (Num::Int(x), Num::Int(y)) => Value::Integer(int_op(x, y)),
        _ => Value::Number(float_op(a.as_f64(), b.as_f64())),
    }
}

/// Dispatches a binary operator over two already-evaluated operands.
/// `&&`/`||` are excluded — they short-circuit and are handled directly
/// by the interpreter, which must not evaluate the right operand eagerly.
pub fn binary_op(env: &mut Environment, op: Separator, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    use Separator::*;

    if let Value::NativeObject(obj) = &lhs {
        return obj.binary_op(op, &rhs);
    }

    match op {
        Addition => add(env, lhs, rhs),
        Subtraction => arith(op, lhs, rhs, isize::wrapping_sub, |x, y| x - y),
        Multiplication => multiply(env, lhs, rhs),
        Division => divide(lhs, rhs),
        Modulus => modulus(lhs, rhs),
        Exponent => exponent(lhs, rhs),
        BitwiseOr => bitwise(lhs, rhs, |x, y| x | y),
        BitwiseAnd => bitwise(lhs, rhs, |x, y| x & y),
        BitwiseXor => bitwise(lhs, rhs, |x, y| x ^ y),
        ShiftLeft => bitwise(lhs, rhs, |x, y| x << (y & 63)),
        ShiftRight => bitwise(lhs, rhs, |x, y| x >> (y & 63)),
        Equality => Ok(Value::Boolean(values_equal(&lhs, &rhs))),
        InverseEquality => Ok(Value::Boolean(!values_equal(&lhs, &rhs))),
        Greater => compare(&lhs, &rhs).map(|o| Value::Boolean(o == Ordering::Greater)),
        Lesser => compare(&lhs, &rhs).map(|o| Value::Boolean(o == Ordering::Less)),
        GreaterEquality => compare(&lhs, &rhs).map(|o| Value::Boolean(o != Ordering::Less)),
        LesserEquality => compare(&lhs, &rhs).map(|o| Value::Boolean(o != Ordering::Greater)),
        other => Err(EvalError::type_error(format!(
            "{other:?} is not a binary operator"
        ))),
    }
}

fn arith(
    op: Separator,
    lhs: Value,
    rhs: Value,
    int_op: impl FnOnce(isize, isize) -> isize,
    float_op: impl FnOnce(f64, f64) -> f64,
) -> Result<Value, EvalError> {
    match (as_num(&lhs), as_num(&rhs)) {
        (Some(a), Some(b)) => Ok(numeric_binary(a, b, int_op, float_op)),
        _ => Err(EvalError::type_error(format!(
            "cannot apply {op:?} to {} and {}",
            lhs.type_name(),
            rhs.type_name()
        ))),
    }
}

/// `+`: string concatenation (either side a string coerces the other via
/// `display_string`), in-place array append, or numeric addition.
fn add(env: &mut Environment, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    if matches!(lhs, Value::String(_)) || matches!(rhs, Value::String(_)) {
        let lhs_text = match &lhs {
            Value::String(s) => s.to_string(),
            other => other.display_string(env),
        };
        let rhs_text = match &rhs {
            Value::String(s) => s.to_string(),
            other => other.display_string(env),
        };
        return Ok(Value::String(env.intern(&format!("{lhs_text}{rhs_text}"))));
    }
    if let Value::Array(arr) = &lhs {
        arr.push(rhs);
        return Ok(lhs);
    }
    arith(Separator::Addition, lhs, rhs, isize::wrapping_add, |x, y| x + y)
}

/// `*`: numeric product, or `(String, Integer)` k-fold repetition.
fn multiply(env: &mut Environment, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    if let (Value::String(s), Value::Integer(n)) = (&lhs, &rhs) {
        if *n < 0 {
            return Err(EvalError::type_error(
                "cannot repeat a string a negative number of times",
            ));
        }
        return Ok(Value::String(env.intern(&s.repeat(*n as usize))));
    }
    arith(
        Separator::Multiplication,
        lhs,
        rhs,
        isize::wrapping_mul,
        |x, y| x * y,
    )
}

/// `/` always promotes to `Number`, even for two integers — matching
/// `object::divide`'s unconditional `static_cast<number>`.
fn divide(lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    match (as_num(&lhs), as_num(&rhs)) {
        (Some(a), Some(b)) => Ok(Value::Number(a.as_f64() / b.as_f64())),
        _ => Err(EvalError::type_error(format!(
            "cannot divide {} by {}",
            lhs.type_name(),
            rhs.type_name()
        ))),
    }
}

/// `%`: truncated integer remainder for `Integer % Integer`, `fmod`
/// otherwise — grounded on `object::modulus`.
fn modulus(lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    match (as_num(&lhs), as_num(&rhs)) {
        (Some(Num::Int(x)), Some(Num::Int(y))) => {
            if y == 0 {
                Err(EvalError::type_error("modulus by zero"))
            } else {
                Ok(Value::Integer(x % y))
            }
        }
        (Some(a), Some(b)) => Ok(Value::Number(a.as_f64() % b.as_f64())),
        _ => Err(EvalError::type_error(format!(
            "cannot apply '%' to {} and {}",
            lhs.type_name(),
            rhs.type_name()
        ))),
    }
}

/// `^` (exponent, not XOR — see the language reference's operator
/// quirks) always yields a `Number`, matching `object::exponentiate`'s
/// `std::pow`.
fn exponent(lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    match (as_num(&lhs), as_num(&rhs)) {
        (Some(a), Some(b)) => Ok(Value::Number(a.as_f64().powf(b.as_f64()))),
        _ => Err(EvalError::type_error(format!(
            "cannot apply '^' to {} and {}",
            lhs.type_name(),
            rhs.type_name()
        ))),
    }
}

/// Bitwise operators reinterpret the pointer-width bit pattern of
/// Integer/Number operands; the result keeps the left operand's variant.
fn bitwise(lhs: Value, rhs: Value, op: impl FnOnce(i64, i64) -> i64) -> Result<Value, EvalError> {
    let lbits = bit_pattern(&lhs).ok_or_else(|| {
        EvalError::type_error(format!("cannot apply a bitwise operator to {}", lhs.type_name()))
    })?;
    let rbits = bit_pattern(&rhs).ok_or_else(|| {
        EvalError::type_error(format!("cannot apply a bitwise operator to {}", rhs.type_name()))
    })?;
    let result = op(lbits, rbits);
    Ok(match lhs {
        Value::Number(_) => Value::Number(f64::from_bits(result as u64)),
        _ => Value::Integer(result as isize),
    })
}

/// Unary `!`: truthiness-coercing, not type-checking — applies uniformly
/// to every variant, including `NativeObject` (the source dispatches a
/// vtable slot here, but `binary_op` has no unary shape to reuse, so the
/// truthy-based default stands in; documented as an Open Question
/// resolution in DESIGN.md).
pub fn logical_not(v: &Value) -> Value {
    Value::Boolean(!v.truthy())
}

/// Unary `~`: reinterprets the operand's bit pattern and flips every bit,
/// keeping the operand's own variant (`Integer` stays `Integer`, `Number`
/// keeps its bit width reinterpreted).
pub fn bitwise_not(v: &Value) -> Result<Value, EvalError> {
    let bits = bit_pattern(v).ok_or_else(|| {
        EvalError::type_error(format!("cannot apply '~' to {}", v.type_name()))
    })?;
    let flipped = !bits;
    Ok(match v {
        Value::Number(_) => Value::Number(f64::from_bits(flipped as u64)),
        _ => Value::Integer(flipped as isize),
    })
}

fn bit_pattern(v: &Value) -> Option<i64> {
    match v {
        Value::Integer(i) => Some(*i as i64),
        Value::Number(n) => Some(n.to_bits() as i64),
        Value::Boolean(b) => Some(if *b { 1 } else { 0 }),
        _ => None,
    }
}

/// `==`/`!=`: payload-bitwise equality for the four simple variants plus
/// `Function` (pointer equality), structural text equality for `String`,
/// identity for `Table`/`Array`/`NativeObject` — an Open Question
/// resolved this way in DESIGN.md (the source leaves complex-type
/// equality a TODO). Mixed types are never equal, matching
/// `object::equals`'s `lhs.m_type != rhs.m_type` guard.
pub fn values_equal(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Null, Value::Null) => true,
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        (Value::Integer(a), Value::Integer(b)) => a == b,
        (Value::Number(a), Value::Number(b)) => a.to_bits() == b.to_bits(),
        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
        (Value::String(a), Value::String(b)) => Rc::ptr_eq(a, b) || **a == **b,
        (Value::Table(a), Value::Table(b)) => a.ptr_eq(b),
        (Value::Array(a), Value::Array(b)) => a.ptr_eq(b),
        (Value::NativeObject(a), Value::NativeObject(b)) => Rc::ptr_eq(a, b),
        _ => false,
    }
}

/// Ordering comparisons: numeric-vs-numeric, lexical string-vs-string,
/// and the source's unusual string-vs-integer-by-length rule (either
/// order) — grounded on `object::greater_than`/`lesser_than`.
fn compare(lhs: &Value, rhs: &Value) -> Result<Ordering, EvalError> {
    if let (Some(a), Some(b)) = (as_num(lhs), as_num(rhs)) {
        return a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .ok_or_else(|| EvalError::type_error("cannot compare NaN"));
    }
    if let (Value::String(a), Value::String(b)) = (lhs, rhs) {
        return Ok(a.as_bytes().cmp(b.as_bytes()));
    }
    if let (Value::Integer(n), Value::String(s)) = (lhs, rhs) {
        return Ok(n.cmp(&(s.len() as isize)));
    }
    if let (Value::String(s), Value::Integer(n)) = (lhs, rhs) {
        return Ok((s.len() as isize).cmp(n));
    }
    Err(EvalError::type_error(format!(
        "cannot compare {} and {}",
        lhs.type_name(),
        rhs.type_name()
    )))
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        values_equal(self, other)
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => 0u8.hash(state),
            Value::Boolean(b) => {
                1u8.hash(state);
                b.hash(state);
            }
            Value::Integer(i) => {
                2u8.hash(state);
                i.hash(state);
            }
            Value::Number(n) => {
                3u8.hash(state);
                n.to_bits().hash(state);
            }
            Value::Function(f) => {
                4u8.hash(state);
                (Rc::as_ptr(f) as usize).hash(state);
            }
            Value::String(s) => {
                5u8.hash(state);
                s.as_ref().hash(state);
            }
            Value::Table(t) => {
                6u8.hash(state);
                t.identity().hash(state);
            }
            Value::Array(a) => {
                7u8.hash(state);
                a.identity().hash(state);
            }
            Value::NativeObject(o) => {
                8u8.hash(state);
                (Rc::as_ptr(o) as *const () as usize).hash(state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env() -> Environment {
        Environment::new()
    }

    #[test]
    fn integer_plus_number_promotes() {
        let mut e = env();
        let v = binary_op(&mut e, Separator::Addition, Value::Integer(1), Value::Number(2.5)).unwrap();
        assert!(matches!(v, Value::Number(n) if n == 3.5));
    }

    #[test]
    fn integer_plus_integer_stays_integer() {
        let mut e = env();
        let v = binary_op(&mut e, Separator::Addition, Value::Integer(2), Value::Integer(2)).unwrap();
        assert!(matches!(v, Value::Integer(4)));
    }

    #[test]
    fn division_always_promotes_to_number() {
        let v = divide(Value::Integer(4), Value::Integer(2)).unwrap();
        assert!(matches!(v, Value::Number(n) if n == 2.0));
    }

    #[test]
    fn string_repetition() {
        let mut e = env();
        let v = binary_op(
            &mut e,
            Separator::Multiplication,
            Value::String(e.intern("ab")),
            Value::Integer(3),
        )
        .unwrap();
        assert!(matches!(v, Value::String(s) if &*s == "ababab"));
    }

    #[test]
    fn string_vs_integer_compares_by_length() {
        let mut e = env();
        let s = Value::String(e.intern("abc"));
        let v = binary_op(&mut e, Separator::Lesser, s, Value::Integer(5)).unwrap();
        assert!(matches!(v, Value::Boolean(true)));
    }

    #[test]
    fn truthiness_of_numeric_zero() {
        assert!(!Value::Integer(0).truthy());
        assert!(!Value::Number(0.0).truthy());
        assert!(Value::Integer(-1).truthy());
    }

    #[test]
    fn mixed_type_equality_is_false() {
        assert!(!values_equal(&Value::Integer(5), &Value::Number(5.0)));
    }

    #[test]
    fn array_negative_index() {
        let arr = Array::new(vec![Value::Integer(10), Value::Integer(20), Value::Integer(30)]);
        let v = Value::Array(arr);
        let got = v.index(&env(), &Value::Integer(-1)).unwrap();
        assert!(matches!(got, Value::Integer(30)));
    }
}
