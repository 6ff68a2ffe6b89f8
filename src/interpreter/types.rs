use std::collections::HashMap;

use crate::interpreter::value::core::{Payload, Value};

/// Base name of the number type.
pub const NUMBER: &str = "number";
/// Base name of the text type.
pub const TEXT: &str = "text";
/// Base name of the boolean type.
pub const BOOLEAN: &str = "boolean";
/// Base name of the list type.
pub const LIST: &str = "list";
/// Base name of the tuple type.
pub const TUPLE: &str = "tuple";
/// Base name of the function type.
pub const FUNCTION: &str = "function";
/// Base name of first-class type values.
pub const TYPE: &str = "type";
/// Base name of unresolved expression placeholders.
pub const EXPRESSION: &str = "expression";
/// Base name of error values.
pub const ERROR: &str = "error";

/// Score awarded to an exact nominal or meta base-name match.
const NOMINAL_SCORE: f64 = 1.1;
/// Score awarded when an empty-base tuple parent relaxes over width.
const WIDTH_RELAXED_SCORE: f64 = 0.75;

/// A type in the structural-plus-nominal system.
///
/// Types are structural trees with optional nominal aliases and generic
/// placeholders. The wildcard matches everything at a score that decays
/// with nesting depth; a named generic acts as a unification variable
/// bound on first match within one dispatch attempt; a nominal alias only
/// matches the identical alias, regardless of structural shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// The wildcard, optionally carrying a generic placeholder name.
    Any {
        /// The generic name, when this wildcard unifies.
        generic: Option<String>,
    },
    /// A non-structural base type (`number`, `text`, `boolean`, ...).
    Meta(String),
    /// A structural type: base kind plus recursive component shape.
    Structural {
        /// The base kind (`list`, `tuple`, `function`).
        base:       String,
        /// The component types.
        components: Vec<Type>,
    },
    /// A nominally aliased record type over a structural shape.
    Nominal {
        /// The alias that nominal matching requires.
        alias:      String,
        /// The underlying structural base kind.
        base:       String,
        /// The field types.
        components: Vec<Type>,
    },
}

impl Type {
    /// The plain wildcard.
    #[must_use]
    pub const fn any() -> Self {
        Self::Any { generic: None }
    }

    /// A named generic placeholder.
    #[must_use]
    pub fn generic(name: impl Into<String>) -> Self {
        Self::Any { generic: Some(name.into()), }
    }

    /// The number type.
    #[must_use]
    pub fn number() -> Self {
        Self::Meta(NUMBER.to_string())
    }

    /// The text type.
    #[must_use]
    pub fn text() -> Self {
        Self::Meta(TEXT.to_string())
    }

    /// The boolean type.
    #[must_use]
    pub fn boolean() -> Self {
        Self::Meta(BOOLEAN.to_string())
    }

    /// A list type over one element type.
    #[must_use]
    pub fn list(element: Self) -> Self {
        Self::Structural { base:       LIST.to_string(),
                           components: vec![element], }
    }

    /// A tuple type over its positional component types.
    #[must_use]
    pub fn tuple(components: Vec<Self>) -> Self {
        Self::Structural { base: TUPLE.to_string(),
                           components }
    }

    /// The empty-base tuple type, which relaxes over any tuple width.
    #[must_use]
    pub fn any_tuple() -> Self {
        Self::tuple(Vec::new())
    }

    /// The function type.
    #[must_use]
    pub fn function() -> Self {
        Self::Structural { base:       FUNCTION.to_string(),
                           components: Vec::new(), }
    }

    /// The type of first-class type values.
    #[must_use]
    pub fn type_ref() -> Self {
        Self::Meta(TYPE.to_string())
    }

    /// The type of unresolved expression placeholders.
    #[must_use]
    pub fn expression() -> Self {
        Self::Meta(EXPRESSION.to_string())
    }

    /// The type of error values.
    #[must_use]
    pub fn error() -> Self {
        Self::Meta(ERROR.to_string())
    }

    /// The base kind used for name comparison.
    #[must_use]
    pub fn base_name(&self) -> &str {
        match self {
            Self::Any { .. } => "anything",
            Self::Meta(base) => base,
            Self::Structural { base, .. } | Self::Nominal { base, .. } => base,
        }
    }

    /// The component types, empty for non-structural types.
    #[must_use]
    pub fn components(&self) -> &[Self] {
        match self {
            Self::Any { .. } | Self::Meta(_) => &[],
            Self::Structural { components, .. } | Self::Nominal { components, .. } => components,
        }
    }

    /// Whether matching recurses into components.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::Structural { .. } | Self::Nominal { .. })
    }

    /// Whether this is an unresolved expression placeholder type.
    #[must_use]
    pub fn is_expression(&self) -> bool {
        matches!(self, Self::Meta(base) if base == EXPRESSION)
    }

    /// The canonical string form.
    ///
    /// This rendering keys the morphism registry and backs the `type`
    /// builtin, so it must be stable: `#`-style sigils are expanded, lists
    /// render as `[element]`, tuples as `(a, b)`, nominal types as their
    /// alias.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Any { generic: None } => "*".to_string(),
            Self::Any { generic: Some(name), } => name.clone(),
            Self::Meta(base) => base.clone(),
            Self::Nominal { alias, .. } => alias.clone(),
            Self::Structural { base, components } => {
                if base == LIST && components.len() == 1 {
                    format!("[{}]", components[0].render())
                } else if base == TUPLE {
                    let parts: Vec<String> = components.iter().map(Self::render).collect();
                    format!("({})", parts.join(", "))
                } else {
                    base.clone()
                }
            },
        }
    }
}

/// Generic-name bindings accumulated over one dispatch attempt.
pub type GenericBindings = HashMap<String, Type>;

/// Wildcard attractiveness at a given structural nesting depth.
///
/// A wildcard match is worth half a concrete match at top level and decays
/// as it occurs deeper inside a structural match, so a concrete match at
/// any position always outranks a wildcard fallback at the same position,
/// and shallow wildcards outrank deep ones.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn wildcard_score(depth: usize) -> f64 {
    0.5 / (1.0 + depth as f64)
}

/// Scores how well a concrete value's type satisfies a parameter type.
///
/// Returns `0.0` for an inadmissible match and a positive score otherwise;
/// higher is better. `bindings` accumulates generic unification across the
/// positions of one dispatch attempt: a named generic binds to the first
/// type it meets and must be confirmed by every later occurrence.
/// `witness` is the concrete value being matched, used where structure
/// alone cannot decide (empty lists, element witnesses).
///
/// # Parameters
/// - `child`: The type of the concrete argument value.
/// - `parent`: The declared parameter type.
/// - `bindings`: Generic bindings accumulated so far (updated in place).
/// - `depth`: Structural nesting depth, `0` at the parameter itself.
/// - `witness`: The concrete value, when one exists at this position.
#[must_use]
pub fn type_satisfaction(child: &Type,
                         parent: &Type,
                         bindings: &mut GenericBindings,
                         depth: usize,
                         witness: Option<&Value>)
                         -> f64 {
    // An unresolved placeholder never satisfies a concrete expectation.
    if child.is_expression() && !matches!(parent, Type::Any { .. }) && !parent.is_expression() {
        return 0.0;
    }

    if let Type::Any { generic } = parent {
        return match generic {
            Some(name) => match bindings.get(name).cloned() {
                Some(bound) => type_satisfaction(child, &bound, bindings, depth, witness),
                None => {
                    bindings.insert(name.clone(), child.clone());
                    1.0
                },
            },
            None => wildcard_score(depth),
        };
    }

    if child.base_name() != parent.base_name() {
        return 0.0;
    }

    // Nominal types are not structurally interchangeable.
    if let Type::Nominal { alias, .. } = parent {
        return match child {
            Type::Nominal { alias: child_alias, .. } if child_alias == alias => NOMINAL_SCORE,
            _ => 0.0,
        };
    }

    if !child.is_structural() || !parent.is_structural() {
        return NOMINAL_SCORE;
    }

    let child_components = child.components();
    let parent_components = parent.components();
    if child_components.len() != parent_components.len() {
        return if parent.base_name() == TUPLE && parent_components.is_empty() {
            WIDTH_RELAXED_SCORE
        } else {
            0.0
        };
    }

    // Empty collections satisfy any element type.
    if child.base_name() == LIST
       && matches!(witness.map(|w| &w.payload), Some(Payload::List(elements)) if elements.is_empty())
    {
        return 1.0;
    }

    if parent_components.is_empty() {
        return 1.0;
    }

    let mut total = 0.0;
    for (i, parent_component) in parent_components.iter().enumerate() {
        let child_component = &child_components[i];
        let component_witness = witness.and_then(|w| component_value(w, i));
        let score = type_satisfaction(child_component,
                                      parent_component,
                                      bindings,
                                      depth + 1,
                                      component_witness);
        if score == 0.0 {
            return 0.0;
        }
        total += score;
    }
    #[allow(clippy::cast_precision_loss)]
    let average = total / parent_components.len() as f64;
    average
}

/// The witness sub-value at component position `i`, when one exists.
///
/// Lists are witnessed by their first actual element; tuples and records
/// position-for-position.
fn component_value(witness: &Value, i: usize) -> Option<&Value> {
    match &witness.payload {
        Payload::List(elements) => elements.first(),
        Payload::Tuple(elements) => elements.get(i),
        _ => None,
    }
}

/// A cheaper boolean assignability check.
///
/// Follows the same nominal/structural/wildcard rules as
/// [`type_satisfaction`] without scoring, generic binding, or witnesses.
#[must_use]
pub fn type_assignable_from(child: &Type, parent: &Type) -> bool {
    if matches!(parent, Type::Any { .. }) {
        return true;
    }
    if child.is_expression() && !parent.is_expression() {
        return false;
    }
    if child.base_name() != parent.base_name() {
        return false;
    }
    if let Type::Nominal { alias, .. } = parent {
        return matches!(child, Type::Nominal { alias: child_alias, .. } if child_alias == alias);
    }
    if !child.is_structural() || !parent.is_structural() {
        return true;
    }
    let child_components = child.components();
    let parent_components = parent.components();
    if child_components.len() != parent_components.len() {
        return parent.base_name() == TUPLE && parent_components.is_empty();
    }
    child_components.iter()
                    .zip(parent_components)
                    .all(|(c, p)| type_assignable_from(c, p))
}
