//! Lexer, parser and tree-walking interpreter for the Quill embeddable
//! scripting language.
//!
//! Grounded on the teacher's `lib.rs` (`#[macro_use] extern crate
//! pest_derive; pub mod ast; pub mod compiler; pub mod interpreter;
//! pub mod typechecker;`), generalized to the module set this crate
//! actually ships (no compiler/typechecker/asm backends — this is a
//! tree-walking interpreter only) and with the `pest`-macro import
//! dropped, since the parser below is hand-rolled rather than
//! PEG-derived.

pub mod ast;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod symbols;
pub mod value;

pub use environment::Environment;
pub use error::Error;
pub use value::Value;

/// Compiles and runs `source` in a fresh `Environment`, returning the
/// value its top-level block evaluates to (or the `return`ed value, if
/// any). The convenience entry point an embedder reaches for when it
/// doesn't need to keep the `Environment` around between runs.
pub fn run(source: &str) -> Result<Value, Error> {
    let mut env = Environment::new();
    let program = env.compile(source)?;
    Ok(env.call(&program, Vec::new())?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_evaluates_top_level_return() {
        let value = run("return 2 + 2;").unwrap();
        assert!(matches!(value, Value::Integer(4)));
    }
}
