/// The native builtin table, the in-language prelude, and bootstrap.
pub mod builtin;
/// The evaluation context and the recursive evaluation walk.
pub mod core;
/// Function and type definition: signature compilation and registration.
pub mod define;
/// The dispatch core: candidate scoring, selection, and invocation.
pub mod dispatch;
/// The type-conversion (morphism) registry and its graph search.
pub mod morphism;
