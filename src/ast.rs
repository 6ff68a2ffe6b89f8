use std::fmt;

/// Classifies a [`ParseNode`] in the prefix-form parse tree.
///
/// Every node produced by the parser carries exactly one kind. The kind
/// decides how the evaluator walks the node: terms resolve to values,
/// operators and calls dispatch, and the container kinds rebuild their
/// children element-wise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A literal or a bare name (`3.5`, `"text"`, `x`).
    Term,
    /// An infix operator reduced to prefix form (`+`, `->`, `=`).
    Operator,
    /// A named function call (`double(5)`).
    Call,
    /// A `[...]` list literal.
    List,
    /// A `(...)` tuple literal with two or more elements.
    Tuple,
    /// A `{...}` parameter-pattern list.
    Signature,
    /// A multi-statement body evaluated sequentially.
    Group,
}

/// One node of the parse tree.
///
/// The parser linearizes mixed infix/prefix surface syntax into trees of
/// these nodes: a binary-operator tree rooted by call nodes plus literal
/// leaves. Nodes are immutable once built and are consumed exactly once by
/// the evaluator.
///
/// For [`NodeKind::Operator`] and [`NodeKind::Call`] nodes, `text` holds the
/// operator symbol or callee name; for terms it holds the literal or name
/// itself; for containers it is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseNode {
    /// Operator symbol, callee name, or literal text.
    pub text:     String,
    /// The node classification.
    pub kind:     NodeKind,
    /// Operands, arguments, elements, entries, or statements.
    pub children: Vec<ParseNode>,
}

impl ParseNode {
    /// Creates a leaf term node.
    #[must_use]
    pub fn term(text: impl Into<String>) -> Self {
        Self { text:     text.into(),
               kind:     NodeKind::Term,
               children: Vec::new(), }
    }

    /// Creates a prefix-form operator node.
    #[must_use]
    pub fn operator(text: impl Into<String>, children: Vec<Self>) -> Self {
        Self { text: text.into(),
               kind: NodeKind::Operator,
               children }
    }

    /// Creates a named call node.
    #[must_use]
    pub fn call(name: impl Into<String>, arguments: Vec<Self>) -> Self {
        Self { text:     name.into(),
               kind:     NodeKind::Call,
               children: arguments, }
    }

    /// Creates a container node of the given kind with empty text.
    #[must_use]
    pub fn container(kind: NodeKind, children: Vec<Self>) -> Self {
        Self { text: String::new(),
               kind,
               children }
    }

    /// Whether this node is a bare name with no children.
    #[must_use]
    pub fn is_bare_term(&self) -> bool {
        self.kind == NodeKind::Term && self.children.is_empty()
    }

    /// Collects every name-shaped term (and callee) in this subtree.
    ///
    /// Used to decide whether an unresolved expression still has free
    /// variables. Literal terms (numbers, quoted text, booleans, type
    /// sigils) are not names and are skipped.
    pub fn collect_names(&self, out: &mut Vec<String>) {
        if matches!(self.kind, NodeKind::Term | NodeKind::Call) && is_name(&self.text) {
            out.push(self.text.clone());
        }
        for child in &self.children {
            child.collect_names(out);
        }
    }
}

/// Whether `text` is an identifier rather than a literal or symbol.
///
/// Identifiers start with a letter or underscore and may end in a single
/// `?` or `!` suffix. The boolean literals are not names.
#[must_use]
pub fn is_name(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }
    if text == "true" || text == "false" {
        return false;
    }
    let mut rest = chars.peekable();
    while let Some(c) = rest.next() {
        let is_suffix = (c == '?' || c == '!') && rest.peek().is_none();
        if !c.is_ascii_alphanumeric() && c != '_' && !is_suffix {
            return false;
        }
    }
    true
}

impl fmt::Display for ParseNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            NodeKind::Term => write!(f, "{}", self.text),
            NodeKind::Operator => {
                if self.children.len() == 2 {
                    write!(f, "({} {} {})", self.children[0], self.text, self.children[1])
                } else {
                    write!(f, "{}({})", self.text, join(&self.children))
                }
            },
            NodeKind::Call => write!(f, "{}({})", self.text, join(&self.children)),
            NodeKind::List => write!(f, "[{}]", join(&self.children)),
            NodeKind::Tuple => write!(f, "({})", join(&self.children)),
            NodeKind::Signature => write!(f, "{{{}}}", join(&self.children)),
            NodeKind::Group => {
                let parts: Vec<String> = self.children.iter().map(ToString::to_string).collect();
                write!(f, "({})", parts.join("\n"))
            },
        }
    }
}

fn join(children: &[ParseNode]) -> String {
    let parts: Vec<String> = children.iter().map(ToString::to_string).collect();
    parts.join(", ")
}
