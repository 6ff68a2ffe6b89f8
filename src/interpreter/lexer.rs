use logos::Logos;

use crate::util::num::format_number;

/// Represents a lexical token in one statement of source input.
///
/// The token set covers the full operator/precedence table, bracketed group
/// delimiters, literals, and identifiers (which may end in a single `?` or
/// `!` suffix). Newlines are kept as tokens so that bracketed bodies can be
/// split into sequential statements; all other whitespace is discardable
/// outside quotes.
#[derive(Logos, Debug, PartialEq, Clone)]
pub enum Token {
    /// Numeric literal tokens, such as `42`, `3.5` or `2e10`.
    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?", parse_number_token)]
    Number(f64),
    /// Text literal tokens. Quotes preserve inner whitespace.
    #[regex(r#""[^"]*""#, parse_text_token)]
    Text(String),
    /// Boolean literal tokens, `true` or `false`.
    #[token("true", parse_boolean_token)]
    #[token("false", parse_boolean_token)]
    Boolean(bool),
    /// Identifier tokens: names such as `x`, `double`, or `even?`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*[?!]?", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `// Comments.`
    #[regex(r"//[^\n]*", logos::skip)]
    Comment,
    /// `->`
    #[token("->")]
    Arrow,
    /// `~>`
    #[token("~>")]
    TildeArrow,
    /// `\>`
    #[token("\\>")]
    BackslashArrow,
    /// `=>`
    #[token("=>")]
    FatArrow,
    /// `..`
    #[token("..")]
    DotDot,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `&`
    #[token("&")]
    Ampersand,
    /// `|`
    #[token("|")]
    Pipe,
    /// `?`
    #[token("?")]
    Question,
    /// `=`
    #[token("=")]
    Equals,
    /// `:`
    #[token(":")]
    Colon,
    /// `,`
    #[token(",")]
    Comma,
    /// `.`
    #[token(".")]
    Dot,
    /// `#`
    #[token("#")]
    Hash,
    /// `$`
    #[token("$")]
    Dollar,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// Statement separator inside multi-statement groups.
    #[token("\n")]
    NewLine,
    /// Tabs, spaces and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
}

impl Token {
    /// Renders the token back to surface text.
    ///
    /// Used to build [`crate::ast::ParseNode`] text fields and to
    /// reassemble degraded input into a single term.
    #[must_use]
    pub fn lexeme(&self) -> String {
        match self {
            Self::Number(n) => format_number(*n),
            Self::Text(t) => format!("\"{t}\""),
            Self::Boolean(b) => b.to_string(),
            Self::Identifier(name) => name.clone(),
            Self::Comment | Self::Ignored => String::new(),
            Self::Arrow => "->".to_string(),
            Self::TildeArrow => "~>".to_string(),
            Self::BackslashArrow => "\\>".to_string(),
            Self::FatArrow => "=>".to_string(),
            Self::DotDot => "..".to_string(),
            Self::EqualEqual => "==".to_string(),
            Self::BangEqual => "!=".to_string(),
            Self::LessEqual => "<=".to_string(),
            Self::GreaterEqual => ">=".to_string(),
            Self::Less => "<".to_string(),
            Self::Greater => ">".to_string(),
            Self::Plus => "+".to_string(),
            Self::Minus => "-".to_string(),
            Self::Star => "*".to_string(),
            Self::Slash => "/".to_string(),
            Self::Percent => "%".to_string(),
            Self::Ampersand => "&".to_string(),
            Self::Pipe => "|".to_string(),
            Self::Question => "?".to_string(),
            Self::Equals => "=".to_string(),
            Self::Colon => ":".to_string(),
            Self::Comma => ",".to_string(),
            Self::Dot => ".".to_string(),
            Self::Hash => "#".to_string(),
            Self::Dollar => "$".to_string(),
            Self::LParen => "(".to_string(),
            Self::RParen => ")".to_string(),
            Self::LBracket => "[".to_string(),
            Self::RBracket => "]".to_string(),
            Self::LBrace => "{".to_string(),
            Self::RBrace => "}".to_string(),
            Self::NewLine => "\n".to_string(),
        }
    }

    /// Whether the token opens a bracketed group.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::LParen | Self::LBracket | Self::LBrace)
    }

    /// Whether the token closes a bracketed group.
    #[must_use]
    pub const fn is_close(&self) -> bool {
        matches!(self, Self::RParen | Self::RBracket | Self::RBrace)
    }
}

fn parse_number_token(lex: &logos::Lexer<Token>) -> Option<f64> {
    lex.slice().parse().ok()
}

fn parse_text_token(lex: &logos::Lexer<Token>) -> Option<String> {
    let slice = lex.slice();
    Some(slice[1..slice.len() - 1].to_string())
}

fn parse_boolean_token(lex: &logos::Lexer<Token>) -> Option<bool> {
    match lex.slice() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Tracks quote and bracket nesting depth while scanning raw text.
///
/// Every component that needs to know whether a character sits "inside" a
/// literal or a nested group feeds characters through a tracker: the
/// method-call rewrite uses it to balance receivers and argument lists,
/// and the statement splitter uses it so multi-line bracketed bodies stay
/// one statement.
///
/// ## Example
/// ```
/// use polyma::interpreter::lexer::NestTracker;
///
/// let mut tracker = NestTracker::new();
/// for c in "f(a, \"b)\"".chars() {
///     tracker.feed(c);
/// }
/// assert!(!tracker.at_top());
/// assert_eq!(tracker.depth(), 1);
/// ```
#[derive(Debug, Default, Clone)]
pub struct NestTracker {
    in_quotes: bool,
    parens:    i32,
    brackets:  i32,
    braces:    i32,
}

impl NestTracker {
    /// Creates a tracker at top level, outside any quotes or brackets.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the tracker over one character of raw text.
    pub fn feed(&mut self, c: char) {
        if c == '"' {
            self.in_quotes = !self.in_quotes;
            return;
        }
        if self.in_quotes {
            return;
        }
        match c {
            '(' => self.parens += 1,
            ')' => self.parens -= 1,
            '[' => self.brackets += 1,
            ']' => self.brackets -= 1,
            '{' => self.braces += 1,
            '}' => self.braces -= 1,
            _ => {},
        }
    }

    /// Whether the tracker currently sits inside a text literal.
    #[must_use]
    pub const fn in_quotes(&self) -> bool {
        self.in_quotes
    }

    /// Total bracket nesting depth, ignoring quote state.
    #[must_use]
    pub const fn depth(&self) -> i32 {
        self.parens + self.brackets + self.braces
    }

    /// Whether the tracker is at top level: no quotes, no open groups.
    #[must_use]
    pub const fn at_top(&self) -> bool {
        !self.in_quotes && self.depth() == 0
    }
}
