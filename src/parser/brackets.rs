use crate::error::{ParseError, Position};
use crate::lexer::Token;
use crate::symbols::Separator;

fn position_of(tokens: &[Token], default: Position) -> Position {
    tokens.first().map(|t| t.position).unwrap_or(default)
}

/// Find the index (into `tokens`, starting the scan at `open_idx + 1`) of
/// the separator that closes the bracket opened at `open_idx`, tracking
/// nested occurrences of the same open/close pair. Other bracket kinds
/// in between are assumed well-formed and are not cross-checked.
pub fn matching_close(
    tokens: &[Token],
    open_idx: usize,
    open: Separator,
    close: Separator,
) -> Result<usize, ParseError> {
    let mut depth = 0usize;
    for (offset, token) in tokens[open_idx..].iter().enumerate() {
        let idx = open_idx + offset;
        match token.as_separator() {
            Some(s) if s == open => depth += 1,
            Some(s) if s == close => {
                depth -= 1;
                if depth == 0 {
                    return Ok(idx);
                }
            }
            _ => {}
        }
    }
    Err(ParseError::new(
        "unbalanced bracket",
        tokens[open_idx].position,
    ))
}

/// Scan `tokens` for the first occurrence of any separator in `seps` at
/// bracket depth 0 (depth tracked jointly across `()`, `[]` and `{}`).
/// Returns an index relative to the start of `tokens`.
pub fn find_top_level_separator(tokens: &[Token], seps: &[Separator]) -> Option<usize> {
    let mut depth = 0i64;
    for (i, token) in tokens.iter().enumerate() {
        match token.as_separator() {
            Some(Separator::GroupOpen | Separator::SelectorOpen | Separator::ScopeOpen) => {
                depth += 1
            }
            Some(Separator::GroupClose | Separator::SelectorClose | Separator::ScopeClose) => {
                depth -= 1
            }
            Some(s) if depth == 0 && seps.contains(&s) => return Some(i),
            _ => {}
        }
    }
    None
}

/// Split `tokens` at every top-level occurrence of `sep` (bracket depth
/// 0), the way a comma-separated argument list or table-entry list is
/// split into its constituent spans.
pub fn split_top_level(tokens: &[Token], sep: Separator) -> Vec<&[Token]> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut depth = 0i64;
    for (i, token) in tokens.iter().enumerate() {
        match token.as_separator() {
            Some(Separator::GroupOpen | Separator::SelectorOpen | Separator::ScopeOpen) => {
                depth += 1
            }
            Some(Separator::GroupClose | Separator::SelectorClose | Separator::ScopeClose) => {
                depth -= 1
            }
            Some(s) if depth == 0 && s == sep => {
                parts.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&tokens[start..]);
    parts
}

pub fn expect_position(tokens: &[Token]) -> Position {
    position_of(tokens, (0, 0))
}
