/// Numeric parsing, formatting, and safe conversion helpers.
///
/// These routines are shared between the parser (literal recognition), the
/// evaluator (index arithmetic), and value rendering. They centralize the
/// rules for what counts as a numeric literal and how numbers print.
///
/// # Responsibilities
/// - Parse numeric literal text strictly (whole-slice, no stray suffixes).
/// - Format numbers so integral values print without a fractional part.
/// - Convert `f64` values to collection indexes without silent truncation.
pub mod num;
