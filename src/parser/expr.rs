use super::brackets::*;
use crate::ast::{Ast, ParseNode, TableKey};
use crate::error::ParseError;
use crate::lexer::{Token, TokenKind};
use crate::symbols::{Keyword, Separator};

/// `parse_group`: resolve bracketed structure in `tokens` into a flat
/// node sequence, then hand that sequence to `parse_ast` for
/// operator-precedence reduction into a single `Ast`.
pub fn parse_group(tokens: &[Token]) -> Result<Ast, ParseError> {
    let nodes = bracket_pass(tokens)?;
    parse_ast(nodes, expect_position(tokens))
}

/// Resolve `(...)`, `[...]` and `{...}` spans into `Group`/`Selector`/
/// `RangedSelector`/`ArgumentList`/`ImmediateArray`/`ImmediateTable`
/// nodes (recursively parsing their interiors), leaving everything else
/// as leaf `Token` nodes.
fn bracket_pass(tokens: &[Token]) -> Result<Vec<ParseNode>, ParseError> {
    let mut nodes = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let sep = tokens[i].as_separator();
        match sep {
            Some(Separator::GroupOpen) => {
                let close = matching_close(tokens, i, Separator::GroupOpen, Separator::GroupClose)?;
                let inner = &tokens[i + 1..close];
                if find_top_level_separator(inner, &[Separator::List]).is_some() {
                    let mut args = Vec::new();
                    for part in split_top_level(inner, Separator::List) {
                        args.push(parse_group(part)?);
                    }
                    nodes.push(ParseNode::ArgumentList(args));
                } else {
                    nodes.push(ParseNode::Group(Box::new(parse_group(inner)?)));
                }
                i = close + 1;
            }
            Some(Separator::SelectorOpen) => {
                let close =
                    matching_close(tokens, i, Separator::SelectorOpen, Separator::SelectorClose)?;
                let inner = &tokens[i + 1..close];
                if find_top_level_separator(inner, &[Separator::List]).is_some() {
                    let mut items = Vec::new();
                    for part in split_top_level(inner, Separator::List) {
                        items.push(parse_group(part)?);
                    }
                    nodes.push(ParseNode::ImmediateArray(items));
                } else if find_top_level_separator(inner, &[Separator::Seek]).is_some() {
                    let parts = split_top_level(inner, Separator::Seek);
                    let lower = parse_group(parts[0])?;
                    let upper = if parts.len() > 1 {
                        parse_group(parts[1])?
                    } else {
                        Ast::empty()
                    };
                    nodes.push(ParseNode::RangedSelector(Box::new(lower), Box::new(upper)));
                } else {
                    nodes.push(ParseNode::Selector(Box::new(parse_group(inner)?)));
                }
                i = close + 1;
            }
            Some(Separator::ScopeOpen) => {
                let close = matching_close(tokens, i, Separator::ScopeOpen, Separator::ScopeClose)?;
                let inner = &tokens[i + 1..close];
                let mut entries = Vec::new();
                for part in split_top_level(inner, Separator::List) {
                    if part.is_empty() {
                        continue;
                    }
                    let eq = find_top_level_separator(part, &[Separator::Assignment]).ok_or_else(|| {
                        ParseError::new("malformed table entry: expected 'key = value'", expect_position(part))
                    })?;
                    let key_tokens = &part[..eq];
                    let value_tokens = &part[eq + 1..];
                    let key = parse_table_key(key_tokens)?;
                    let value = parse_group(value_tokens)?;
                    entries.push((key, value));
                }
                nodes.push(ParseNode::ImmediateTable(entries));
                i = close + 1;
            }
            _ => {
                nodes.push(ParseNode::Token(tokens[i].clone()));
                i += 1;
            }
        }
    }
    Ok(nodes)
}

fn parse_table_key(tokens: &[Token]) -> Result<TableKey, ParseError> {
    if tokens.len() == 1 {
        if let TokenKind::Identifier(name) = &tokens[0].kind {
            return Ok(TableKey::Ident(name.clone()));
        }
    }
    if tokens.first().and_then(|t| t.as_separator()) == Some(Separator::SelectorOpen) {
        let close = matching_close(tokens, 0, Separator::SelectorOpen, Separator::SelectorClose)?;
        if close == tokens.len() - 1 {
            let expr = parse_group(&tokens[1..close])?;
            return Ok(TableKey::Computed(Box::new(expr)));
        }
    }
    Err(ParseError::new(
        "invalid table key: expected an identifier or '[expr]'",
        expect_position(tokens),
    ))
}

/// Operator-precedence reduction of an already bracket-resolved node
/// sequence into a single `Ast`. `fold_postfix` runs first so that
/// trailing `Group`/`Selector`/`RangedSelector`/`ArgumentList` nodes
/// (precedence 10, left-associative) collapse into call/index `Ast`s
/// before the general precedence scan runs.
pub fn parse_ast(nodes: Vec<ParseNode>, position: crate::error::Position) -> Result<Ast, ParseError> {
    for node in &nodes {
        if let ParseNode::Token(token) = node {
            if token.as_keyword() == Some(Keyword::Typeof) {
                return Err(ParseError::unsupported("typeof", token.position));
            }
        }
    }
    let nodes = fold_postfix(nodes)?;
    reduce(nodes, position)
}

fn is_operand_like(node: &ParseNode) -> bool {
    match node {
        ParseNode::Token(t) => t.as_separator().is_none(),
        ParseNode::Group(_)
        | ParseNode::Selector(_)
        | ParseNode::RangedSelector(_, _)
        | ParseNode::ImmediateArray(_)
        | ParseNode::ImmediateTable(_)
        | ParseNode::Expression(_) => true,
        _ => false,
    }
}

fn fold_postfix(nodes: Vec<ParseNode>) -> Result<Vec<ParseNode>, ParseError> {
    let mut out: Vec<ParseNode> = Vec::new();
    for node in nodes {
        let foldable = matches!(
            node,
            ParseNode::Group(_)
                | ParseNode::Selector(_)
                | ParseNode::RangedSelector(_, _)
                | ParseNode::ArgumentList(_)
        );
        if foldable && out.last().map(is_operand_like).unwrap_or(false) {
            let callee = out.pop().unwrap();
            let callee_ast = node_to_ast(callee)?;
            let combined = match node {
                ParseNode::Group(group) => {
                    let args = if group.is_empty() { vec![] } else { vec![*group] };
                    Ast::call(callee_ast, args)
                }
                ParseNode::ArgumentList(args) => Ast::call(callee_ast, args),
                ParseNode::Selector(selector) => Ast::index(callee_ast, *selector),
                ParseNode::RangedSelector(lo, hi) => Ast::ranged_index(callee_ast, *lo, *hi),
                _ => unreachable!(),
            };
            out.push(ParseNode::Expression(Box::new(combined)));
            continue;
        }
        out.push(node);
    }
    Ok(out)
}

fn node_to_ast(node: ParseNode) -> Result<Ast, ParseError> {
    Ok(match node {
        ParseNode::Token(t) => Ast::leaf(t),
        ParseNode::Expression(ast) => *ast,
        ParseNode::Group(ast) => *ast,
        ParseNode::Empty => Ast::empty(),
        other => {
            let position = other.position();
            Ast {
                operation: Separator::Space,
                operands: vec![other],
                position,
            }
        }
    })
}

fn reduce(nodes: Vec<ParseNode>, position: crate::error::Position) -> Result<Ast, ParseError> {
    if nodes.is_empty() {
        return Ok(Ast::empty());
    }
    if nodes.len() == 1 {
        return node_to_ast(nodes.into_iter().next().unwrap());
    }

    // A pure keyword-qualifier + assignable run (e.g. `local x`) carries
    // no separator at all; wrap it in the `space` sentinel rather than
    // erroring out of the generic scan below.
    let has_separator = nodes
        .iter()
        .any(|n| matches!(n, ParseNode::Token(t) if t.as_separator().is_some()));
    if !has_separator {
        return Ok(Ast {
            operation: Separator::Space,
            operands: nodes,
            position,
        });
    }

    let mut min_idx = 0usize;
    let mut min_prec = u8::MAX;
    let mut found = false;
    for (i, node) in nodes.iter().enumerate() {
        let ParseNode::Token(token) = node else {
            continue;
        };
        let Some(sep) = token.as_separator() else {
            continue;
        };
        let prec = sep.precedence();
        let update = if !found {
            true
        } else if prec < min_prec {
            true
        } else if prec == min_prec {
            // Rightmost occurrence wins ties, except among exponent
            // operators: `2 ^ 3 ^ 2` evaluates right-to-left (512, not
            // 64), so exponent ties keep the leftmost occurrence.
            sep != Separator::Exponent
        } else {
            false
        };
        if update {
            min_idx = i;
            min_prec = prec;
            found = true;
        }
    }

    if !found {
        return Err(ParseError::new("malformed expression", position));
    }

    let ParseNode::Token(op_token) = &nodes[min_idx] else {
        unreachable!()
    };
    let sep = op_token.as_separator().unwrap();
    let op_position = op_token.position;

    if sep == Separator::Ternary {
        let tail = &nodes[min_idx + 1..];
        let colon_rel = find_matching_colon(tail, op_position)?;
        let cond = reduce(nodes[..min_idx].to_vec(), position)?;
        let if_true = reduce(tail[..colon_rel].to_vec(), op_position)?;
        let if_false = reduce(tail[colon_rel + 1..].to_vec(), op_position)?;
        return Ok(Ast::ternary(cond, if_true, if_false, op_position));
    }

    if sep.is_single_operand() {
        let is_postfix = min_idx == nodes.len() - 1
            && matches!(sep, Separator::Increment | Separator::Decrement);
        if is_postfix {
            let operand = reduce(nodes[..min_idx].to_vec(), position)?;
            let meta = if sep == Separator::Increment {
                Separator::PostfixIncrement
            } else {
                Separator::PostfixDecrement
            };
            return Ok(Ast::unary(meta, operand, op_position));
        }
        if min_idx != 0 {
            return Err(ParseError::new(
                "unexpected tokens before unary operator",
                op_position,
            ));
        }
        let operand = reduce(nodes[min_idx + 1..].to_vec(), op_position)?;
        let meta = match sep {
            Separator::Increment => Separator::PrefixIncrement,
            Separator::Decrement => Separator::PrefixDecrement,
            other => other,
        };
        return Ok(Ast::unary(meta, operand, op_position));
    }

    let lhs = reduce(nodes[..min_idx].to_vec(), position)?;
    let rhs = reduce(nodes[min_idx + 1..].to_vec(), op_position)?;
    Ok(Ast::binary(sep, lhs, rhs, op_position))
}

/// Scan for the `:` that closes a ternary's `?`, skipping past any
/// nested `?...:` pairs.
fn find_matching_colon(
    nodes: &[ParseNode],
    position: crate::error::Position,
) -> Result<usize, ParseError> {
    let mut depth = 0i64;
    for (i, node) in nodes.iter().enumerate() {
        let ParseNode::Token(token) = node else {
            continue;
        };
        match token.as_separator() {
            Some(Separator::Ternary) => depth += 1,
            Some(Separator::Seek) => {
                if depth == 0 {
                    return Ok(i);
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    Err(ParseError::new("ternary '?' without matching ':'", position))
}
