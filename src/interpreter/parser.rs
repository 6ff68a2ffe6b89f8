/// Statement parsing and operator-precedence resolution.
///
/// The entry point [`core::parse_statement`] turns one raw statement into a
/// prefix-form parse tree: method-call sugar is rewritten first, the text
/// is tokenized, unary minus is disambiguated, and the token sequence is
/// reduced by the fixed precedence table.
pub mod core;
/// Recursive descent into bracketed groups.
///
/// Handles the primary forms once no top-level operator remains: literals,
/// names, `[...]` lists, `{...}` signatures, `name(...)` calls, and bare
/// `(...)` tuples, groupings, and multi-statement bodies. Unmatched
/// brackets capture empty rather than raising a parse error.
pub mod groups;
/// The method-call rewrite pre-pass.
///
/// Rewrites `receiver.method(args)` into `method(receiver, args)` on the
/// raw text, balancing quotes and brackets with the nesting tracker, and
/// restarts the scan after each rewrite.
pub mod method;
