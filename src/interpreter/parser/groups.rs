use crate::{
    ast::{NodeKind, ParseNode},
    interpreter::{
        lexer::Token,
        parser::core::{matching_close, parse_tokens},
    },
};

/// Reduces a token sequence with no top-level operator to a parse node.
///
/// Primary forms are single tokens, `name(...)` calls, `[...]` lists,
/// `{...}` signatures, and bare `(...)` groups. A bare group is a tuple
/// when it splits at top-level commas, a sequential multi-statement group
/// when it splits at top-level newlines, and transparent grouping
/// otherwise. Anything else is degraded input and collapses to a single
/// term of the joined lexemes.
pub(in crate::interpreter) fn parse_primary(tokens: &[Token]) -> ParseNode {
    let last = tokens.len().wrapping_sub(1);
    match tokens {
        [] => ParseNode::term(""),
        [single] => single_term(single),
        [Token::Identifier(name), Token::LParen, ..] => match matching_close(tokens, 1) {
            Some(close) if close == last => {
                ParseNode::call(name.clone(), split_elements(&tokens[2..close]))
            },
            // Unmatched argument list: the capture is empty.
            None => ParseNode::call(name.clone(), Vec::new()),
            Some(_) => degraded(tokens),
        },
        [Token::LParen, ..] => match matching_close(tokens, 0) {
            Some(close) if close == last => paren_body(&tokens[1..close]),
            None => ParseNode::container(NodeKind::Tuple, Vec::new()),
            Some(_) => degraded(tokens),
        },
        [Token::LBracket, ..] => match matching_close(tokens, 0) {
            Some(close) if close == last => {
                ParseNode::container(NodeKind::List, split_elements(&tokens[1..close]))
            },
            None => ParseNode::container(NodeKind::List, Vec::new()),
            Some(_) => degraded(tokens),
        },
        [Token::LBrace, ..] => match matching_close(tokens, 0) {
            Some(close) if close == last => {
                ParseNode::container(NodeKind::Signature, split_elements(&tokens[1..close]))
            },
            None => ParseNode::container(NodeKind::Signature, Vec::new()),
            Some(_) => degraded(tokens),
        },
        _ => degraded(tokens),
    }
}

/// A single token as a leaf term.
fn single_term(token: &Token) -> ParseNode {
    ParseNode::term(token.lexeme())
}

/// The body of a bare parenthesized group.
fn paren_body(inner: &[Token]) -> ParseNode {
    if inner.is_empty() {
        return ParseNode::container(NodeKind::Tuple, Vec::new());
    }
    if has_top_level(inner, &Token::NewLine) {
        // Multi-statement body: let the statement splitter group it.
        return parse_tokens(inner);
    }
    if has_top_level(inner, &Token::Comma) {
        return ParseNode::container(NodeKind::Tuple, split_elements(inner));
    }
    parse_tokens(inner)
}

/// Splits a bracketed body at top-level commas and parses each element.
///
/// Newlines directly inside a comma-separated body are insignificant;
/// empty elements are dropped so trailing commas degrade quietly.
fn split_elements(tokens: &[Token]) -> Vec<ParseNode> {
    let mut elements = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        if token.is_open() {
            depth += 1;
        } else if token.is_close() {
            depth -= 1;
        } else if depth == 0 && *token == Token::Comma {
            push_element(&mut elements, &tokens[start..i]);
            start = i + 1;
        }
    }
    push_element(&mut elements, &tokens[start..]);
    elements
}

fn push_element(elements: &mut Vec<ParseNode>, tokens: &[Token]) {
    let element = parse_tokens(tokens);
    if !element.is_bare_term() || !element.text.is_empty() {
        elements.push(element);
    }
}

/// Whether `separator` occurs at bracket depth zero.
fn has_top_level(tokens: &[Token], separator: &Token) -> bool {
    let mut depth = 0i32;
    for token in tokens {
        if token.is_open() {
            depth += 1;
        } else if token.is_close() {
            depth -= 1;
        } else if depth == 0 && token == separator {
            return true;
        }
    }
    false
}

/// Degraded input: collapse to a single term of the joined lexemes.
fn degraded(tokens: &[Token]) -> ParseNode {
    let joined: Vec<String> = tokens.iter().map(Token::lexeme).collect();
    ParseNode::term(joined.join(" "))
}
