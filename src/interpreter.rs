/// The evaluator module walks parse trees and resolves every call.
///
/// The evaluator recursively reduces parse nodes to values, resolves names
/// through the scope stack, and sends each call through multiple dispatch:
/// candidates are scored by type fit, runtime predicates, and declared
/// specificity, with implicit conversion search as a fallback. It also
/// implements the short-circuit control constructs and function/type
/// definition.
///
/// # Responsibilities
/// - Evaluates parse nodes, deferring unresolved expressions.
/// - Resolves and invokes the best-scoring function candidate per call.
/// - Manages the scope stack and the conversion (morphism) registry.
pub mod evaluator;
/// The lexer module tokenizes statements and tracks lexical nesting.
///
/// The lexer turns raw statement text into a stream of tokens covering the
/// operator table, literals, identifiers, and group delimiters. It also
/// provides the nesting tracker used by every component that must know
/// whether a character sits inside a literal or a nested group.
///
/// # Responsibilities
/// - Converts the input character stream into classified tokens.
/// - Preserves whitespace inside quotes, discards it elsewhere.
/// - Tracks quote/bracket/brace nesting depth over raw text.
pub mod lexer;
/// The parser module builds prefix-form parse trees from statements.
///
/// The parser rewrites method-call sugar into ordinary calls, resolves
/// operator ambiguity (unary versus binary minus, longest-token
/// operators), reduces infix operators by precedence, and recursively
/// descends into bracketed groups: lists, tuples, signatures, calls, and
/// multi-statement bodies.
///
/// # Responsibilities
/// - Converts token sequences into [`crate::ast::ParseNode`] trees.
/// - Applies the fixed precedence table with associativity rules.
/// - Degrades silently on unmatched groups (empty capture).
pub mod parser;
/// The type system: structural trees, nominal aliases, generics.
///
/// Types are structural trees with optional nominal aliases and generic
/// placeholders. This module decides whether a call is type-admissible,
/// how good the match is (for ranking competing overloads), and which
/// generic bindings a match implies.
///
/// # Responsibilities
/// - Scores value types against parameter types for dispatch ranking.
/// - Unifies named generics on first match within one dispatch attempt.
/// - Renders types to their canonical string form.
pub mod types;
/// The value module defines the runtime data types for evaluation.
///
/// Every evaluated statement yields exactly one value: a tagged payload
/// plus its type. Function-typed values additionally carry their ordered
/// overload table. Error values are ordinary values and propagate through
/// dispatch rather than unwinding.
///
/// # Responsibilities
/// - Defines [`value::core::Value`] and all supported payload variants.
/// - Defines function candidates (one compiled overload each).
/// - Renders values, overload tables, and errors for display.
pub mod value;
