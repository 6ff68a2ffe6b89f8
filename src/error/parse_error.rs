#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents the errors that can occur while tokenizing a statement.
pub enum ParseError {
    /// The lexer could not classify a piece of input.
    UnrecognizedToken {
        /// The offending slice of source text.
        token: String,
    },
    /// A text literal was opened but never closed.
    UnterminatedText,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnrecognizedToken { token } => {
                write!(f, "Unrecognized token: {token}.")
            },
            Self::UnterminatedText => write!(f, "Text literal is never closed."),
        }
    }
}

impl std::error::Error for ParseError {}
