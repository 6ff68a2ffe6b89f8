/// Parsing errors.
///
/// Defines the hard lexical faults the tokenizer can raise. The parser
/// itself degrades silently on malformed structure (unmatched groups
/// capture empty), so parse errors are limited to input the lexer cannot
/// classify at all.
pub mod parse_error;
/// Host-level runtime faults.
///
/// Contains the faults raised when the core's own invariants are misused,
/// such as a required-variable lookup that misses. Expected, recoverable
/// failures are never represented here: dispatch failures, arity
/// mismatches, bad indexes and the like are ordinary error-typed values
/// that flow through evaluation.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
