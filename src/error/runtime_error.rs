#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents host-level faults raised during evaluation.
///
/// These are failures of the core's own invariants, not of the user
/// program: user-facing failures (no matching overload, bad index, failed
/// parse) are error-typed values, not faults. The line-oriented driver is
/// expected to catch a fault per statement, report it, and continue with
/// the next statement.
pub enum RuntimeError {
    /// A required variable was absent from every scope frame.
    MissingVariable {
        /// The name of the variable.
        name: String,
    },
    /// A function candidate referenced an arena slot that does not exist.
    MissingCandidate {
        /// The arena index that was requested.
        index: usize,
    },
    /// The evaluator reached a node shape it maintains should not exist.
    MalformedNode {
        /// Details describing the invariant that was violated.
        details: String,
    },
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingVariable { name } => {
                write!(f, "Missing required variable '{name}'.")
            },
            Self::MissingCandidate { index } => {
                write!(f, "Function candidate {index} is not registered.")
            },
            Self::MalformedNode { details } => {
                write!(f, "Malformed parse node: {details}.")
            },
        }
    }
}

impl std::error::Error for RuntimeError {}
