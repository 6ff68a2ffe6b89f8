/// Core value representation: payloads, types, function candidates.
pub mod core;
/// Rendering of values, overload tables, and errors for display.
///
/// Backs the `stringify` and `show` builtins: both are first-class
/// dispatchable functions whose native bodies delegate here.
pub mod display;
