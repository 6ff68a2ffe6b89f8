//! # polyma
//!
//! polyma is the runtime core of a small expression-oriented language:
//! a parser that linearizes mixed infix/prefix surface syntax into an
//! abstract tree, a structural-plus-nominal type system, and an evaluator
//! that resolves every call through multiple dispatch scored by type fit,
//! runtime predicates, and author-assigned specificity, with implicit
//! type conversion ("morphism") search as a fallback.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc)]

use crate::interpreter::{
    evaluator::core::Context,
    lexer::NestTracker,
    parser::core::parse_statement,
    value::core::Value,
};

/// Defines the structure of parsed code.
///
/// This module declares the parse-node tree the parser produces and the
/// evaluator consumes: a uniform node of text, kind, and children, fully
/// prefix-form with no remaining operator ambiguity.
///
/// # Responsibilities
/// - Defines node kinds for terms, operators, calls, and containers.
/// - Renders nodes back to readable surface text.
/// - Collects the free names of an expression subtree.
pub mod ast;
/// Provides the two error tiers of the runtime.
///
/// Value-level errors (no matching overload, bad index, failed parse) are
/// ordinary error-typed values and are not represented here; this module
/// defines the hard lexical faults and the host-level invariant faults
/// that the line-oriented driver catches per statement.
///
/// # Responsibilities
/// - Defines the error enums for lexical and host-level failures.
/// - Supports standard error handling traits and reporting.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation, the type
/// system, value representations, and dispatch to provide a complete
/// runtime for source statements. It exposes the components behind the
/// public entry points below.
///
/// # Responsibilities
/// - Coordinates the core components: lexer, parser, types, evaluator.
/// - Provides multiple dispatch with conversion search and generics.
/// - Manages the scope stack and conversion registry per context.
pub mod interpreter;
/// General utilities for numeric parsing, formatting, and conversion.
pub mod util;

/// Whether a raw line should be evaluated at all.
///
/// The caller applies this predicate before invoking the parser: empty
/// lines and `//` comments never reach the core.
///
/// ## Example
/// ```
/// use polyma::should_evaluate;
///
/// assert!(should_evaluate("x = 1"));
/// assert!(!should_evaluate("   "));
/// assert!(!should_evaluate("// commentary"));
/// ```
#[must_use]
pub fn should_evaluate(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty() && !trimmed.starts_with("//")
}

/// Splits raw source into `(line number, statement)` pairs.
///
/// Statements break at newlines, but only at top nesting level: a
/// bracketed body spanning several lines stays one statement. Line
/// numbers are 1-based and name the line a statement starts on.
#[must_use]
pub fn split_statements(source: &str) -> Vec<(usize, String)> {
    let mut statements = Vec::new();
    let mut tracker = NestTracker::new();
    let mut buffer = String::new();
    let mut line = 1;
    let mut start = 1;

    for c in source.chars() {
        if c == '\n' && tracker.at_top() {
            statements.push((start, std::mem::take(&mut buffer)));
            line += 1;
            start = line;
            continue;
        }
        if c == '\n' {
            line += 1;
        }
        tracker.feed(c);
        buffer.push(c);
    }
    statements.push((start, buffer));
    statements
}

/// Interprets one source statement against a context.
///
/// Every statement yields exactly one value, possibly error-typed:
/// dispatch failures, bad indexes, and unknown names come back as values,
/// not errors. The `Err` side carries only lexical faults and host-level
/// invariant faults, which a line-oriented driver reports per statement
/// before moving on.
///
/// # Errors
/// Returns the boxed [`error::ParseError`] or [`error::RuntimeError`] on
/// a host-level fault.
///
/// ## Example
/// ```
/// use polyma::{interpret, interpreter::evaluator::core::Context};
///
/// let mut ctx = Context::bootstrapped();
/// interpret(&mut ctx, "x = 3 + 4").unwrap();
/// let value = interpret(&mut ctx, "x").unwrap();
/// assert_eq!(value.as_number(), Some(7.0));
/// ```
pub fn interpret(ctx: &mut Context, statement: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let node = parse_statement(statement)?;
    Ok(ctx.eval(&node)?)
}

/// Evaluates a whole script in a freshly bootstrapped context and
/// returns the last value.
///
/// Stops at the first host-level fault. This is the embedding and test
/// convenience; the forgiving per-statement loop is [`run_script`].
///
/// # Errors
/// Returns the first host-level fault encountered.
pub fn eval_script(source: &str) -> Result<Value, Box<dyn std::error::Error>> {
    let mut ctx = Context::bootstrapped();
    let mut last = Value::tuple(Vec::new());
    for (_, statement) in split_statements(source) {
        if should_evaluate(&statement) {
            last = interpret(&mut ctx, &statement)?;
        }
    }
    Ok(last)
}

/// The line-oriented driver loop.
///
/// Interprets every statement of `source`, reporting host-level faults to
/// stderr with their line numbers and continuing with the next statement.
/// With `auto_print`, the final value is printed to stdout.
pub fn run_script(source: &str, auto_print: bool) {
    let mut ctx = Context::bootstrapped();
    let mut last = None;
    for (line, statement) in split_statements(source) {
        if !should_evaluate(&statement) {
            continue;
        }
        match interpret(&mut ctx, &statement) {
            Ok(value) => last = Some(value),
            Err(fault) => eprintln!("Error on line {line}: {fault}"),
        }
    }
    if auto_print && let Some(value) = last {
        println!("{value}");
    }
}
