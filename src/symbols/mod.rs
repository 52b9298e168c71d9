//! Symbol table: maps source lexemes (punctuation and reserved words) to
//! token kinds, with longest-prefix-match lookup for the lexer.
//!
//! Grounded on the teacher's `lazy_static!` `LEX_MAP` in `lexer/mod.rs`,
//! generalized from a handful of terminals to the full punctuation table
//! and rebuilt on `once_cell::sync::Lazy` (already a teacher dependency).

mod separator;
mod keyword;

pub use separator::*;
pub use keyword::*;

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// A single entry in the symbol table.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolEntry {
    /// Whether this symbol may terminate an identifier in progress.
    /// Punctuation and `=` are interrupters; word-forms (`or`, `and`,
    /// `not`, `new`, and all keywords) are not and may only match on a
    /// word boundary.
    pub interrupter: bool,
    /// The token kind this lexeme resolves to.
    pub replaced: Symbol,
}

/// What a matched lexeme resolves to: either a punctuation/operator
/// separator or a reserved word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Separator(Separator),
    Keyword(Keyword),
    /// Whitespace; filtered out of the token stream after lexing.
    Space,
}

/// Lexeme -> entry map with longest-prefix-match lookup.
#[derive(Debug, Default)]
pub struct SymbolTable {
    entries: HashMap<&'static str, SymbolEntry>,
    max_len: usize,
}

impl SymbolTable {
    fn insert(&mut self, lexeme: &'static str, interrupter: bool, replaced: Symbol) {
        self.max_len = self.max_len.max(lexeme.len());
        self.entries.insert(
            lexeme,
            SymbolEntry {
                interrupter,
                replaced,
            },
        );
    }

    /// Exact-match retrieval.
    pub fn lookup(&self, text: &str) -> Option<&SymbolEntry> {
        self.entries.get(text)
    }

    /// Return the entry whose key is the *longest* prefix of `input`, or
    /// `None` if nothing matches. Construction guarantees no two keys of
    /// equal length both match the same input, so the tie-break never
    /// triggers in practice.
    pub fn match_prefix<'a>(&self, input: &'a str) -> Option<(&'a str, &SymbolEntry)> {
        let upper = self.max_len.min(input.len());
        for len in (1..=upper).rev() {
            // Respect UTF-8 boundaries; punctuation/keywords are all ASCII
            // so this only ever skips a length that can't be a boundary.
            if !input.is_char_boundary(len) {
                continue;
            }
            let candidate = &input[..len];
            if let Some(entry) = self.entries.get(candidate) {
                return Some((candidate, entry));
            }
        }
        None
    }
}

/// The default symbol table: whitespace, all punctuation/operators, the
/// `or`/`and`/`not`/`new` word-forms, and the reserved keywords.
pub static DEFAULT_SYMBOLS: Lazy<SymbolTable> = Lazy::new(build_default_symbols);

fn build_default_symbols() -> SymbolTable {
    use Separator::*;

    let mut table = SymbolTable::default();

    for ws in [" ", "\t", "\n", "\r\n"] {
        table.insert(ws, true, Symbol::Space);
    }

    let punctuation: &[(&str, Separator)] = &[
        ("=", Assignment),
        ("*", Multiplication),
        ("*=", MultiplicationAssignment),
        ("/", Division),
        ("/=", DivisionAssignment),
        ("+", Addition),
        ("+=", AdditionAssignment),
        ("-", Subtraction),
        ("-=", SubtractionAssignment),
        ("++", Increment),
        ("--", Decrement),
        ("(", GroupOpen),
        (")", GroupClose),
        ("[", SelectorOpen),
        ("]", SelectorClose),
        ("{", ScopeOpen),
        ("}", ScopeClose),
        ("==", Equality),
        ("!=", InverseEquality),
        (">", Greater),
        ("<", Lesser),
        (">=", GreaterEquality),
        ("<=", LesserEquality),
        ("||", LogicalOr),
        ("&&", LogicalAnd),
        ("!", LogicalNot),
        ("|", BitwiseOr),
        ("|=", BitwiseOrAssignment),
        (">|", BitwiseXor),
        (">|=", BitwiseXorAssignment),
        ("&", BitwiseAnd),
        ("&=", BitwiseAndAssignment),
        ("~", BitwiseNot),
        (">>", ShiftRight),
        (">>=", ShiftRightAssignment),
        ("<<", ShiftLeft),
        ("<<=", ShiftLeftAssignment),
        ("^", Exponent),
        ("^=", ExponentAssignment),
        ("%", Modulus),
        ("%=", ModulusAssignment),
        (":", Seek),
        ("?", Ternary),
        (".", Dot),
        (",", List),
        ("->", Arrow),
        ("#", Length),
        ("...", Ellipsis),
        (";", EndStatement),
        ("::", NamespaceIndex),
    ];

    for (lexeme, separator) in punctuation {
        table.insert(lexeme, true, Symbol::Separator(*separator));
    }

    for (lexeme, separator) in [("or", LogicalOr), ("and", LogicalAnd), ("not", LogicalNot), ("new", NewObject)] {
        table.insert(lexeme, false, Symbol::Separator(separator));
    }

    for (lexeme, keyword) in Keyword::ALL {
        table.insert(lexeme, false, Symbol::Keyword(*keyword));
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_prefix_wins() {
        let table = &*DEFAULT_SYMBOLS;
        let (matched, entry) = table.match_prefix(">|=x").unwrap();
        assert_eq!(matched, ">|=");
        assert_eq!(entry.replaced, Symbol::Separator(Separator::BitwiseXorAssignment));

        let (matched, entry) = table.match_prefix(">x").unwrap();
        assert_eq!(matched, ">");
        assert_eq!(entry.replaced, Symbol::Separator(Separator::Greater));
    }

    #[test]
    fn word_forms_are_not_interrupters() {
        let table = &*DEFAULT_SYMBOLS;
        let entry = table.lookup("new").unwrap();
        assert!(!entry.interrupter);
        let entry = table.lookup("=").unwrap();
        assert!(entry.interrupter);
    }

    #[test]
    fn no_duplicate_lexemes() {
        // Construction-time invariant: every lexeme in the table is
        // unique, so match_prefix's longest-length tie-break never has
        // two equal-length candidates to choose between.
        let table = &*DEFAULT_SYMBOLS;
        let mut seen = std::collections::HashSet::new();
        for key in table.entries.keys() {
            assert!(seen.insert(*key), "duplicate lexeme {key}");
        }
    }
}
