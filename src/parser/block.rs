use super::brackets::*;
use super::expr::parse_group;
use crate::ast::{
    Ast, ForDecl, FunctionDecl, FunctionTag, IfDecl, Param, ParseNode, WhileDecl,
};
use crate::error::ParseError;
use crate::lexer::Token;
use crate::symbols::{Keyword, Separator};

/// Parse a full program as a top-level statement block.
pub fn parse_program(tokens: &[Token]) -> Result<Vec<ParseNode>, ParseError> {
    parse_block(tokens)
}

/// Parse `tokens` as a flat sequence of statements, each consuming its
/// own span (a control construct consumes its header and body; a bare
/// statement runs to its next top-level `;`).
fn parse_block(tokens: &[Token]) -> Result<Vec<ParseNode>, ParseError> {
    let mut stmts = Vec::new();
    let mut i = 0;
    while i < tokens.len() {
        let (node, next) = parse_statement(tokens, i)?;
        stmts.push(node);
        i = next;
    }
    Ok(stmts)
}

/// Parse a construct body: either a `{ ... }` block or a single
/// statement, wrapped uniformly as `ParseNode::Block`.
fn parse_body(tokens: &[Token], start: usize) -> Result<(ParseNode, usize), ParseError> {
    if start >= tokens.len() {
        return Err(ParseError::new(
            "expected a statement or block",
            expect_position(tokens),
        ));
    }
    if tokens[start].as_separator() == Some(Separator::ScopeOpen) {
        let close = matching_close(tokens, start, Separator::ScopeOpen, Separator::ScopeClose)?;
        let inner = &tokens[start + 1..close];
        let body = parse_block(inner)?;
        Ok((ParseNode::Block(body), close + 1))
    } else {
        let (stmt, next) = parse_statement(tokens, start)?;
        Ok((ParseNode::Block(vec![stmt]), next))
    }
}

fn expect_group_open(tokens: &[Token], idx: usize) -> Result<usize, ParseError> {
    if tokens.get(idx).and_then(|t| t.as_separator()) == Some(Separator::GroupOpen) {
        Ok(idx)
    } else {
        Err(ParseError::new(
            "expected '(' here",
            expect_position(&tokens[idx.min(tokens.len())..]),
        ))
    }
}

fn find_semicolon(tokens: &[Token], start: usize) -> Result<usize, ParseError> {
    find_top_level_separator(&tokens[start..], &[Separator::EndStatement])
        .map(|rel| start + rel)
        .ok_or_else(|| ParseError::new("expected ';'", expect_position(&tokens[start..])))
}

fn parse_statement(tokens: &[Token], i: usize) -> Result<(ParseNode, usize), ParseError> {
    let token = &tokens[i];

    if let Some(keyword) = token.as_keyword() {
        return match keyword {
            Keyword::Local | Keyword::Const => parse_qualified_statement(tokens, i),
            Keyword::Function => parse_function_decl(tokens, i, false, false),
            Keyword::If => parse_if(tokens, i),
            Keyword::Else => parse_else(tokens, i),
            Keyword::For => parse_for(tokens, i),
            Keyword::While => parse_while(tokens, i),
            Keyword::Do => Err(ParseError::unsupported("do-while", token.position)),
            Keyword::Switch => Err(ParseError::unsupported("switch", token.position)),
            Keyword::Class => Err(ParseError::unsupported("class", token.position)),
            Keyword::Return => parse_return(tokens, i),
            Keyword::Break => parse_break_continue(tokens, i, ParseNode::Break),
            Keyword::Continue => parse_break_continue(tokens, i, ParseNode::Continue),
            Keyword::Typeof => Err(ParseError::unsupported("typeof", token.position)),
            Keyword::Case | Keyword::Default => {
                Err(ParseError::new("'case'/'default' outside of switch", token.position))
            }
            Keyword::True | Keyword::False | Keyword::Null => parse_expression_statement(tokens, i),
        };
    }

    if token.as_separator() == Some(Separator::ScopeOpen) {
        let close = matching_close(tokens, i, Separator::ScopeOpen, Separator::ScopeClose)?;
        let inner = &tokens[i + 1..close];
        return Ok((ParseNode::Block(parse_block(inner)?), close + 1));
    }

    parse_expression_statement(tokens, i)
}

fn parse_expression_statement(tokens: &[Token], i: usize) -> Result<(ParseNode, usize), ParseError> {
    let semi = find_semicolon(tokens, i)?;
    let ast = parse_group(&tokens[i..semi])?;
    Ok((ParseNode::Expression(Box::new(ast)), semi + 1))
}

/// A `local`/`const` run at statement start: if it qualifies a `function`
/// declaration, compute the declaration's `FunctionTag`; otherwise the
/// qualifiers are left in-band and the whole span (qualifiers included)
/// is handed to the generic expression path, which represents them via
/// the `space` sentinel (see `Ast::operation`'s documentation).
fn parse_qualified_statement(tokens: &[Token], i: usize) -> Result<(ParseNode, usize), ParseError> {
    let mut local = false;
    let mut const_ = false;
    let mut j = i;
    while let Some(keyword) = tokens.get(j).and_then(|t| t.as_keyword()) {
        match keyword {
            Keyword::Local => local = true,
            Keyword::Const => const_ = true,
            _ => break,
        }
        j += 1;
    }
    if tokens.get(j).and_then(|t| t.as_keyword()) == Some(Keyword::Function) {
        return parse_function_decl(tokens, j, local, const_);
    }
    parse_expression_statement(tokens, i)
}

fn parse_function_decl(
    tokens: &[Token],
    function_idx: usize,
    local: bool,
    const_: bool,
) -> Result<(ParseNode, usize), ParseError> {
    let name_start = function_idx + 1;
    let mut k = name_start;
    while k < tokens.len() && tokens[k].as_separator() != Some(Separator::GroupOpen) {
        k += 1;
    }
    if k >= tokens.len() {
        return Err(ParseError::new(
            "expected '(' after function name",
            expect_position(&tokens[name_start..]),
        ));
    }
    let name_ast = parse_group(&tokens[name_start..k])?;
    let is_method = name_ast.operation == Separator::Dot;

    let close = matching_close(tokens, k, Separator::GroupOpen, Separator::GroupClose)?;
    let mut params = Vec::new();
    for part in split_top_level(&tokens[k + 1..close], Separator::List) {
        if part.is_empty() {
            continue;
        }
        let name = part
            .first()
            .and_then(|t| t.as_identifier())
            .ok_or_else(|| ParseError::new("expected a parameter name", expect_position(part)))?
            .to_owned();
        params.push(Param { name });
    }
    if is_method {
        FunctionDecl::prepend_this(&mut params);
    }

    let (body, next) = parse_body(tokens, close + 1)?;
    Ok((
        ParseNode::FunctionDecl(FunctionDecl {
            name: Box::new(ParseNode::Expression(Box::new(name_ast))),
            params,
            body: Box::new(body),
            tag: FunctionTag::from_flags(local, const_),
        }),
        next,
    ))
}

fn parse_if(tokens: &[Token], if_idx: usize) -> Result<(ParseNode, usize), ParseError> {
    let open = expect_group_open(tokens, if_idx + 1)?;
    let close = matching_close(tokens, open, Separator::GroupOpen, Separator::GroupClose)?;
    let condition = parse_group(&tokens[open + 1..close])?;
    let (body, next) = parse_body(tokens, close + 1)?;
    Ok((
        ParseNode::IfDecl(IfDecl {
            condition: Box::new(condition),
            body: Box::new(body),
        }),
        next,
    ))
}

fn parse_else(tokens: &[Token], else_idx: usize) -> Result<(ParseNode, usize), ParseError> {
    if tokens.get(else_idx + 1).and_then(|t| t.as_keyword()) == Some(Keyword::If) {
        let if_idx = else_idx + 1;
        let open = expect_group_open(tokens, if_idx + 1)?;
        let close = matching_close(tokens, open, Separator::GroupOpen, Separator::GroupClose)?;
        let condition = parse_group(&tokens[open + 1..close])?;
        let (body, next) = parse_body(tokens, close + 1)?;
        return Ok((
            ParseNode::ElseIfDecl(IfDecl {
                condition: Box::new(condition),
                body: Box::new(body),
            }),
            next,
        ));
    }
    let (body, next) = parse_body(tokens, else_idx + 1)?;
    Ok((ParseNode::ElseDecl(Box::new(body)), next))
}

fn parse_for(tokens: &[Token], for_idx: usize) -> Result<(ParseNode, usize), ParseError> {
    let open = expect_group_open(tokens, for_idx + 1)?;
    let close = matching_close(tokens, open, Separator::GroupOpen, Separator::GroupClose)?;
    let inner = &tokens[open + 1..close];
    let parts = split_top_level(inner, Separator::EndStatement);
    if parts.len() != 3 {
        return Err(ParseError::new(
            "expected 'for (init; condition; iteration)'",
            expect_position(inner),
        ));
    }
    let init = parse_group(parts[0])?;
    let condition = if parts[1].is_empty() {
        Ast::empty()
    } else {
        parse_group(parts[1])?
    };
    let iteration = parse_group(parts[2])?;
    let (body, next) = parse_body(tokens, close + 1)?;
    Ok((
        ParseNode::ForDecl(ForDecl {
            init: Box::new(init),
            condition: Box::new(condition),
            iteration: Box::new(iteration),
            body: Box::new(body),
        }),
        next,
    ))
}

fn parse_while(tokens: &[Token], while_idx: usize) -> Result<(ParseNode, usize), ParseError> {
    let open = expect_group_open(tokens, while_idx + 1)?;
    let close = matching_close(tokens, open, Separator::GroupOpen, Separator::GroupClose)?;
    let condition = parse_group(&tokens[open + 1..close])?;
    let (body, next) = parse_body(tokens, close + 1)?;
    Ok((
        ParseNode::WhileDecl(WhileDecl {
            condition: Box::new(condition),
            body: Box::new(body),
        }),
        next,
    ))
}

fn parse_return(tokens: &[Token], return_idx: usize) -> Result<(ParseNode, usize), ParseError> {
    let semi = find_semicolon(tokens, return_idx + 1)?;
    let expr_tokens = &tokens[return_idx + 1..semi];
    let value = if expr_tokens.is_empty() {
        None
    } else {
        Some(Box::new(parse_group(expr_tokens)?))
    };
    Ok((ParseNode::ReturnStmt(value), semi + 1))
}

fn parse_break_continue(
    tokens: &[Token],
    idx: usize,
    node: ParseNode,
) -> Result<(ParseNode, usize), ParseError> {
    if tokens.get(idx + 1).and_then(|t| t.as_separator()) != Some(Separator::EndStatement) {
        return Err(ParseError::new(
            "expected ';' after this statement",
            tokens[idx].position,
        ));
    }
    Ok((node, idx + 2))
}
