use logos::Logos;

use crate::{
    ast::ParseNode,
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{groups::parse_primary, method::rewrite_method_calls},
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses one raw statement into a prefix-form parse tree.
///
/// This is the entry point for parsing. The statement runs through the
/// method-call rewrite, is tokenized, has unary minus folded, and is then
/// reduced by precedence. Malformed structure degrades silently to empty
/// captures; only unclassifiable input raises an error.
///
/// # Parameters
/// - `source`: One statement of raw text (may span lines inside groups).
///
/// # Returns
/// The root parse node of the statement.
///
/// # Errors
/// Returns a `ParseError` if the lexer cannot classify a piece of input.
pub fn parse_statement(source: &str) -> ParseResult<ParseNode> {
    let rewritten = rewrite_method_calls(source);
    let tokens = tokenize(&rewritten)?;
    let tokens = fold_unary_minus(tokens);
    Ok(parse_tokens(&tokens))
}

/// Tokenizes statement text into a flat token sequence.
///
/// # Errors
/// Returns `UnterminatedText` for an unclosed text literal and
/// `UnrecognizedToken` for anything else the lexer rejects.
pub fn tokenize(text: &str) -> ParseResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(text);
    while let Some(item) = lexer.next() {
        match item {
            Ok(token) => tokens.push(token),
            Err(()) => {
                let slice = lexer.slice();
                return Err(if slice.starts_with('"') {
                    ParseError::UnterminatedText
                } else {
                    ParseError::UnrecognizedToken { token: slice.to_string(), }
                });
            },
        }
    }
    Ok(tokens)
}

/// The fixed operator-precedence table. Higher binds tighter.
///
/// Returns `None` for tokens that are not infix operators.
#[must_use]
pub const fn precedence(token: &Token) -> Option<u8> {
    use Token::{
        Ampersand, Arrow, BackslashArrow, BangEqual, Colon, DotDot, EqualEqual, Equals, FatArrow,
        Greater, GreaterEqual, Less, LessEqual, Minus, Percent, Pipe, Plus, Question, Slash, Star,
        TildeArrow,
    };
    Some(match token {
        Star | Slash => 10,
        Plus | Minus => 9,
        Percent => 8,
        DotDot => 7,
        EqualEqual | BangEqual | Less | LessEqual | Greater | GreaterEqual => 6,
        Ampersand | Pipe => 5,
        Arrow | TildeArrow | BackslashArrow => 4,
        FatArrow | Question => 3,
        Equals => 2,
        Colon => 1,
        _ => return None,
    })
}

/// Whether equal-precedence occurrences of this operator group rightward.
const fn is_right_associative(token: &Token) -> bool {
    matches!(token, Token::Equals | Token::FatArrow)
}

/// Reduces a token sequence to a parse node by the precedence table.
///
/// The sequence is split at its loosest-binding top-level operator — the
/// rightmost occurrence, or the leftmost for the right-associative set —
/// and both sides are reduced recursively. A sequence with top-level
/// newlines becomes a multi-statement group; a sequence with no top-level
/// operator is a primary form.
///
/// A top-level `name = ...` forces the left-hand name to a plain term so
/// the name being bound is never itself dispatched.
#[must_use]
pub fn parse_tokens(tokens: &[Token]) -> ParseNode {
    let tokens = trim_newlines(tokens);
    if tokens.is_empty() {
        return ParseNode::term("");
    }

    if let Some(statements) = split_statement_lines(tokens) {
        let children = statements.into_iter().map(parse_tokens).collect();
        return ParseNode::container(crate::ast::NodeKind::Group, children);
    }

    if let Some(at) = find_split(tokens) {
        let operator = &tokens[at];
        let left = &tokens[..at];
        let right = &tokens[at + 1..];
        let left_node = match (operator, left) {
            (Token::Equals, [Token::Identifier(name)]) => ParseNode::term(name.clone()),
            _ => parse_tokens(left),
        };
        return ParseNode::operator(operator.lexeme(), vec![left_node, parse_tokens(right)]);
    }

    parse_primary(tokens)
}

fn trim_newlines(mut tokens: &[Token]) -> &[Token] {
    while let [Token::NewLine, rest @ ..] = tokens {
        tokens = rest;
    }
    while let [rest @ .., Token::NewLine] = tokens {
        tokens = rest;
    }
    tokens
}

/// Splits the sequence at top-level newlines into two or more statements.
///
/// Returns `None` when there is at most one statement, in which case the
/// caller reduces the sequence as a single expression.
fn split_statement_lines(tokens: &[Token]) -> Option<Vec<&[Token]>> {
    let mut statements = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        if token.is_open() {
            depth += 1;
        } else if token.is_close() {
            depth -= 1;
        } else if depth == 0 && *token == Token::NewLine {
            if i > start {
                statements.push(&tokens[start..i]);
            }
            start = i + 1;
        }
    }
    if start < tokens.len() {
        statements.push(&tokens[start..]);
    }
    if statements.len() > 1 {
        Some(statements)
    } else {
        None
    }
}

/// Finds the index of the operator to split at, if any.
fn find_split(tokens: &[Token]) -> Option<usize> {
    let mut depth = 0i32;
    let mut best: Option<(u8, usize)> = None;
    for (i, token) in tokens.iter().enumerate() {
        if token.is_open() {
            depth += 1;
            continue;
        }
        if token.is_close() {
            depth -= 1;
            continue;
        }
        if depth != 0 {
            continue;
        }
        let Some(level) = precedence(token) else {
            continue;
        };
        best = match best {
            None => Some((level, i)),
            Some((min, at)) => {
                if level < min {
                    Some((level, i))
                } else if level == min && !is_right_associative(token) {
                    // Left-associative: the rightmost occurrence splits.
                    Some((min, i))
                } else {
                    Some((min, at))
                }
            },
        };
    }
    best.map(|(_, at)| at)
}

/// Folds unary minus out of the token stream.
///
/// A `-` is unary when the previous significant token is nothing, an
/// operator, `=`, `,`, or an opening bracket. A unary minus directly
/// before a numeric literal folds into the literal; any other operand is
/// wrapped in a `neg(...)` call.
fn fold_unary_minus(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if *token != Token::Minus || !unary_position(out.last()) {
            out.push(token.clone());
            i += 1;
            continue;
        }
        match tokens.get(i + 1) {
            Some(Token::Number(n)) => {
                out.push(Token::Number(-n));
                i += 2;
            },
            _ => match operand_end(&tokens, i + 1) {
                Some(end) => {
                    out.push(Token::Identifier("neg".to_string()));
                    out.push(Token::LParen);
                    out.extend(tokens[i + 1..end].iter().cloned());
                    out.push(Token::RParen);
                    i = end;
                },
                None => {
                    out.push(token.clone());
                    i += 1;
                },
            },
        }
    }
    out
}

/// Whether a minus after `previous` negates rather than subtracts.
fn unary_position(previous: Option<&Token>) -> bool {
    match previous {
        None | Some(Token::Comma | Token::NewLine) => true,
        Some(token) => token.is_open() || precedence(token).is_some(),
    }
}

/// The end (exclusive) of the primary operand starting at `start`.
fn operand_end(tokens: &[Token], start: usize) -> Option<usize> {
    match tokens.get(start)? {
        Token::Identifier(_) => {
            if tokens.get(start + 1) == Some(&Token::LParen) {
                Some(matching_close(tokens, start + 1).map_or(tokens.len(), |c| c + 1))
            } else {
                Some(start + 1)
            }
        },
        Token::Text(_) | Token::Boolean(_) | Token::Number(_) => Some(start + 1),
        token if token.is_open() => {
            Some(matching_close(tokens, start).map_or(tokens.len(), |c| c + 1))
        },
        _ => None,
    }
}

/// The index of the close matching the open bracket at `open`.
pub(in crate::interpreter::parser) fn matching_close(tokens: &[Token], open: usize)
                                                    -> Option<usize> {
    let mut depth = 0i32;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        if token.is_open() {
            depth += 1;
        } else if token.is_close() {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}
