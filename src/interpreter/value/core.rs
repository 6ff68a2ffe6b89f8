use crate::{
    ast::ParseNode,
    interpreter::{evaluator::core::Context, types::Type},
};

/// The signature shared by every native function body.
///
/// Natives receive the (possibly morphed) argument values and the context,
/// and return exactly one value. Failures are returned as error-typed
/// values, never raised.
pub type NativeFn = fn(&[Value], &mut Context) -> Value;

/// Classifies a value-level error.
///
/// These are the expected, recoverable failures of user programs. They
/// propagate automatically through dispatch: any function receiving an
/// error argument short-circuits and returns it untouched, except the
/// designated error sink (`show`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No candidate scored above zero for a call.
    NoMatch,
    /// No candidate accepted the call's argument count.
    ArityMismatch,
    /// A collection index fell outside the valid range.
    IndexOutOfRange,
    /// Text failed to parse as a number.
    NumberParse,
    /// A call named a function bound nowhere.
    UnknownFunction,
    /// A call name resolved through both the `?` and `!` aliases.
    AmbiguousFunction,
    /// An explicitly constructed or miscellaneous failure.
    Failure,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::NoMatch => "no-match",
            Self::ArityMismatch => "arity-mismatch",
            Self::IndexOutOfRange => "index-out-of-range",
            Self::NumberParse => "number-parse",
            Self::UnknownFunction => "unknown-function",
            Self::AmbiguousFunction => "ambiguous-function",
            Self::Failure => "failure",
        };
        write!(f, "{label}")
    }
}

/// A value-level error: kind plus human-readable detail.
///
/// Compared structurally, like every other payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorValue {
    /// The error classification.
    pub kind:   ErrorKind,
    /// Human-readable detail for display.
    pub detail: String,
}

/// The payload of a runtime value.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// A numeric value (double precision floating-point).
    Number(f64),
    /// A text value.
    Text(String),
    /// A boolean value, produced by comparisons and logic.
    Boolean(bool),
    /// An ordered list of element values.
    List(Vec<Value>),
    /// A fixed-width tuple of values. Nominal record instances share this
    /// payload and are distinguished by their type's alias.
    Tuple(Vec<Value>),
    /// A function: its human-readable case listing plus the arena indexes
    /// of its registered overloads, in insertion order. The case listing
    /// is the exposed payload for introspection; the invocation list is
    /// the operative dispatch table.
    Function {
        /// Human-readable renderings of each case.
        cases:       Vec<String>,
        /// Arena indexes of the overloads, insertion-ordered.
        invocations: Vec<usize>,
    },
    /// An unresolved expression, kept unevaluated until its free
    /// variables are all bound.
    Expression(Box<ParseNode>),
    /// A first-class type value.
    TypeRef(Type),
    /// A value-level error.
    Error(ErrorValue),
}

/// A tagged runtime value: payload plus type.
///
/// Values are created per evaluation and never interned or mutated in
/// place; container operations rebuild.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    /// The data itself.
    pub payload: Payload,
    /// The type tag used by dispatch scoring.
    pub ty:      Type,
}

impl Value {
    /// Creates a number value.
    #[must_use]
    pub fn number(value: f64) -> Self {
        Self { payload: Payload::Number(value),
               ty:      Type::number(), }
    }

    /// Creates a text value.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self { payload: Payload::Text(value.into()),
               ty:      Type::text(), }
    }

    /// Creates a boolean value.
    #[must_use]
    pub fn boolean(value: bool) -> Self {
        Self { payload: Payload::Boolean(value),
               ty:      Type::boolean(), }
    }

    /// Creates a list value, typed by its first element.
    #[must_use]
    pub fn list(elements: Vec<Self>) -> Self {
        let element_type = elements.first().map_or_else(Type::any, |e| e.ty.clone());
        Self { payload: Payload::List(elements),
               ty:      Type::list(element_type), }
    }

    /// Creates a tuple value typed position-for-position.
    #[must_use]
    pub fn tuple(elements: Vec<Self>) -> Self {
        let components = elements.iter().map(|e| e.ty.clone()).collect();
        Self { payload: Payload::Tuple(elements),
               ty:      Type::tuple(components), }
    }

    /// Creates an unresolved expression placeholder.
    #[must_use]
    pub fn expression(node: ParseNode) -> Self {
        Self { payload: Payload::Expression(Box::new(node)),
               ty:      Type::expression(), }
    }

    /// Creates a first-class type value.
    #[must_use]
    pub fn type_ref(ty: Type) -> Self {
        Self { payload: Payload::TypeRef(ty),
               ty:      Type::type_ref(), }
    }

    /// Creates an error value.
    #[must_use]
    pub fn error(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self { payload: Payload::Error(ErrorValue { kind,
                                                    detail: detail.into() }),
               ty:      Type::error(), }
    }

    /// Whether this value is error-typed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.payload, Payload::Error(_))
    }

    /// Whether this value is function-typed.
    #[must_use]
    pub const fn is_function(&self) -> bool {
        matches!(self.payload, Payload::Function { .. })
    }

    /// The number payload, if this is a number.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self.payload {
            Payload::Number(n) => Some(n),
            _ => None,
        }
    }

    /// The boolean payload, if this is a boolean.
    #[must_use]
    pub const fn as_boolean(&self) -> Option<bool> {
        match self.payload {
            Payload::Boolean(b) => Some(b),
            _ => None,
        }
    }

    /// The text payload, if this is text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.payload {
            Payload::Text(t) => Some(t),
            _ => None,
        }
    }

    /// The list elements, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match &self.payload {
            Payload::List(elements) => Some(elements),
            _ => None,
        }
    }

    /// The tuple elements, if this is a tuple or record.
    #[must_use]
    pub fn as_tuple(&self) -> Option<&[Self]> {
        match &self.payload {
            Payload::Tuple(elements) => Some(elements),
            _ => None,
        }
    }

    /// The referenced type, if this is a type value.
    #[must_use]
    pub fn as_type(&self) -> Option<&Type> {
        match &self.payload {
            Payload::TypeRef(ty) => Some(ty),
            _ => None,
        }
    }

    /// The overload arena indexes, if this is a function.
    #[must_use]
    pub fn invocations(&self) -> Option<&[usize]> {
        match &self.payload {
            Payload::Function { invocations, .. } => Some(invocations),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::number(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::text(v)
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::list(v)
    }
}

/// One compiled overload of a function.
///
/// Candidates are created once, at registration time, and are immutable
/// thereafter: new overloads append new arena entries, never mutate
/// existing ones. Insertion order is significant — on score ties the
/// earliest-registered candidate wins.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCandidate {
    /// The number of parameters.
    pub arity:         usize,
    /// Binding names, one per parameter.
    pub param_names:   Vec<String>,
    /// Declared types, one per parameter.
    pub param_types:   Vec<Type>,
    /// Optional guard expressions, one per parameter, re-evaluated
    /// against the (possibly morphed) argument at dispatch time.
    pub predicates:    Vec<Option<ParseNode>>,
    /// Author-assigned weights multiplied into each position's score.
    pub specificities: Vec<f64>,
    /// What invoking the candidate does.
    pub body:          CandidateBody,
}

/// The body of a function candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateBody {
    /// A native operation.
    Native(NativeFn),
    /// A user-written case: the body expression, evaluated with the
    /// parameters bound in a fresh scope.
    Defined(ParseNode),
    /// A record constructor for the given nominal type.
    Construct(Type),
    /// A record field getter by position.
    GetField(usize),
    /// A record field setter by position (rebuilds the record).
    SetField(usize),
}
