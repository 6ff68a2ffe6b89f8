use std::collections::{BTreeMap, HashMap};

use crate::{
    ast::{NodeKind, ParseNode},
    error::RuntimeError,
    interpreter::value::core::{ErrorKind, FunctionCandidate, Payload, Value},
    util::num::parse_number,
};

/// Result type used by the evaluator.
///
/// The `Err` side carries host-level faults only; expected failures of the
/// user program (no matching overload, bad index, failed parse) are
/// ordinary error-typed values on the `Ok` side.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Stores the state of one interpreter instance.
///
/// This struct holds the lexical scope stack, the append-only arena of
/// function candidates, and the type-conversion registry. Embedders
/// construct one context per interpreter and thread it through every
/// parser/evaluator call; there is no implicit global instance.
///
/// ## Usage
///
/// A context is created once (usually via
/// [`Context::bootstrapped`](crate::interpreter::evaluator::builtin)) and
/// reused for evaluating statements. All evaluation methods access this
/// state to resolve names, score overloads, and search conversions.
pub struct Context {
    /// Name-to-value frames, innermost last. Frame 0 is the global frame.
    pub scope_stack: Vec<HashMap<String, Value>>,
    /// The append-only arena of compiled overloads. Function values hold
    /// insertion-ordered index lists into this arena.
    pub candidates:  Vec<FunctionCandidate>,
    /// Conversion registry: rendered source type to rendered destination
    /// type to converter function value.
    pub morphisms:   BTreeMap<String, BTreeMap<String, Value>>,
}

#[allow(clippy::new_without_default)]
impl Context {
    /// Creates an empty context with a single global frame.
    #[must_use]
    pub fn new() -> Self {
        Self { scope_stack: vec![HashMap::new()],
               candidates:  Vec::new(),
               morphisms:   BTreeMap::new(), }
    }

    /// Pushes a fresh innermost scope frame.
    pub fn enter_scope(&mut self) {
        self.scope_stack.push(HashMap::new());
    }

    /// Pops the innermost scope frame. The global frame is never popped.
    pub fn exit_scope(&mut self) {
        if self.scope_stack.len() > 1 {
            self.scope_stack.pop();
        }
    }

    /// Writes a binding into the innermost frame.
    pub fn assign_value(&mut self, name: impl Into<String>, value: Value) {
        if let Some(frame) = self.scope_stack.last_mut() {
            frame.insert(name.into(), value);
        }
    }

    /// Writes a binding directly into the global frame.
    pub fn global_assign_value(&mut self, name: impl Into<String>, value: Value) {
        if let Some(frame) = self.scope_stack.first_mut() {
            frame.insert(name.into(), value);
        }
    }

    /// Resolves a name, walking frames innermost to outermost.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.scope_stack.iter().rev().find_map(|frame| frame.get(name))
    }

    /// Resolves a name the core itself is supposed to maintain.
    ///
    /// # Errors
    /// Faults with [`RuntimeError::MissingVariable`] when absent — this is
    /// internal misuse, not a user-program failure.
    pub fn lookup_required(&self, name: &str) -> EvalResult<Value> {
        self.lookup(name)
            .cloned()
            .ok_or_else(|| RuntimeError::MissingVariable { name: name.to_string(), })
    }

    /// Removes a name from the first (innermost) frame containing it.
    ///
    /// Used to un-bind temporary generic-type variables after a dispatch
    /// completes.
    pub fn delete_value(&mut self, name: &str) {
        for frame in self.scope_stack.iter_mut().rev() {
            if frame.remove(name).is_some() {
                return;
            }
        }
    }

    /// Appends a candidate to the arena, returning its index.
    pub fn add_candidate(&mut self, candidate: FunctionCandidate) -> usize {
        self.candidates.push(candidate);
        self.candidates.len() - 1
    }

    /// The candidate at an arena index.
    ///
    /// # Errors
    /// Faults with [`RuntimeError::MissingCandidate`] on a dangling index.
    pub fn candidate(&self, index: usize) -> EvalResult<&FunctionCandidate> {
        self.candidates
            .get(index)
            .ok_or(RuntimeError::MissingCandidate { index })
    }

    /// Evaluates a parse node and returns the resulting value.
    ///
    /// This is the main entry point for evaluation. Terms resolve to
    /// literals or bindings, operators and calls go through short-circuit
    /// handling or dispatch, containers rebuild element-wise, and groups
    /// evaluate sequentially. Unknown names pass through as unresolved
    /// expression values so forward references in signatures and
    /// conditions stay representable.
    ///
    /// # Errors
    /// Host-level faults only; user-level failures come back as
    /// error-typed values.
    pub fn eval(&mut self, node: &ParseNode) -> EvalResult<Value> {
        match node.kind {
            NodeKind::Term => self.eval_term(node),
            NodeKind::Operator | NodeKind::Call => self.eval_call(node),
            NodeKind::List => {
                let elements = self.eval_elements(&node.children)?;
                Ok(Value::list(elements))
            },
            NodeKind::Tuple => {
                let elements = self.eval_elements(&node.children)?;
                Ok(Value::tuple(elements))
            },
            // Signatures are patterns: never evaluated element-wise.
            NodeKind::Signature => Ok(Value::expression(node.clone())),
            NodeKind::Group => self.eval_group(node),
        }
    }

    /// Evaluates container children element-wise.
    ///
    /// Containers are rebuilt rather than mutated in place, so previously
    /// resolved siblings are never clobbered by partially resolved ones.
    fn eval_elements(&mut self, children: &[ParseNode]) -> EvalResult<Vec<Value>> {
        children.iter().map(|child| self.eval(child)).collect()
    }

    /// Evaluates a leaf term: literal or name.
    fn eval_term(&mut self, node: &ParseNode) -> EvalResult<Value> {
        let text = &node.text;
        if let Some(n) = parse_number(text) {
            return Ok(Value::number(n));
        }
        if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
            return Ok(Value::text(&text[1..text.len() - 1]));
        }
        if text == "true" || text == "false" {
            return Ok(Value::boolean(text == "true"));
        }
        match self.lookup(text).cloned() {
            Some(value) => {
                // A stored expression reduces once its free variables
                // are all bound; until then it passes through untouched.
                if let Payload::Expression(inner) = &value.payload
                   && self.unresolved_names(inner).is_empty()
                {
                    let inner = (**inner).clone();
                    return self.eval(&inner);
                }
                Ok(value)
            },
            None => Ok(Value::expression(node.clone())),
        }
    }

    /// Evaluates an operator or call node.
    fn eval_call(&mut self, node: &ParseNode) -> EvalResult<Value> {
        match node.text.as_str() {
            "?" => self.eval_ternary(node),
            "&" | "|" => self.eval_logical(node),
            "=" => self.eval_assignment(node),
            "=>" => {
                let [signature, body] = self.binary_operands(node)?;
                if signature.kind == NodeKind::Signature {
                    self.anonymous_function(signature, body)
                } else {
                    Ok(Value::error(ErrorKind::Failure,
                                    "a function case needs a {signature} left of '=>'"))
                }
            },
            _ => {
                let arguments = self.eval_elements(&node.children)?;
                self.dispatch_function(&node.text, arguments)
            },
        }
    }

    /// Evaluates `condition ? (then, else)` with early exit.
    ///
    /// Only the selected branch is evaluated. The right-hand side must be
    /// a two-element tuple node; anything else is a malformed ternary.
    fn eval_ternary(&mut self, node: &ParseNode) -> EvalResult<Value> {
        let [condition, branches] = self.binary_operands(node)?;
        let chosen = self.eval(condition)?;
        if chosen.is_error() {
            return Ok(chosen);
        }
        let Some(which) = chosen.as_boolean() else {
            return Ok(Value::error(ErrorKind::Failure, "ternary condition must be a boolean"));
        };
        if branches.kind != NodeKind::Tuple || branches.children.len() != 2 {
            return Ok(Value::error(ErrorKind::Failure,
                                   "ternary expects a (then, else) tuple"));
        }
        let branch = if which { &branches.children[0] } else { &branches.children[1] };
        self.eval(branch)
    }

    /// Evaluates `&`/`|` with early exit on the deciding operand.
    fn eval_logical(&mut self, node: &ParseNode) -> EvalResult<Value> {
        let conjunction = node.text == "&";
        let [left_node, right_node] = self.binary_operands(node)?;

        let left = self.eval(left_node)?;
        if left.is_error() {
            return Ok(left);
        }
        let Some(left) = left.as_boolean() else {
            return Ok(Value::error(ErrorKind::Failure, "logical operand must be a boolean"));
        };
        if conjunction != left {
            // false & _  |  true | _
            return Ok(Value::boolean(left));
        }
        let right = self.eval(right_node)?;
        if right.is_error() {
            return Ok(right);
        }
        match right.as_boolean() {
            Some(b) => Ok(Value::boolean(b)),
            None => Ok(Value::error(ErrorKind::Failure, "logical operand must be a boolean")),
        }
    }

    /// Evaluates an assignment, a function definition, or a type
    /// definition.
    ///
    /// The left-hand side is a name being bound, so it is never looked up
    /// or dispatched. A signature right-hand side defines a nominal type;
    /// a `{signature} => body` right-hand side appends a function case;
    /// anything else evaluates and binds.
    fn eval_assignment(&mut self, node: &ParseNode) -> EvalResult<Value> {
        let [target, source] = self.binary_operands(node)?;
        if !target.is_bare_term() || !crate::ast::is_name(&target.text) {
            return Ok(Value::error(ErrorKind::Failure, "assignment target must be a name"));
        }
        let name = target.text.clone();

        if source.kind == NodeKind::Signature {
            return self.define_type(&name, source);
        }
        if source.kind == NodeKind::Operator
           && source.text == "=>"
           && source.children.len() == 2
           && source.children[0].kind == NodeKind::Signature
        {
            return self.define_function(&name, &source.children[0], &source.children[1]);
        }

        let value = self.eval(source)?;
        self.assign_value(&name, value.clone());
        Ok(value)
    }

    /// Evaluates a multi-statement group sequentially.
    ///
    /// An assignment inside the group registers its name for subsequent
    /// statements of the same group; the group yields its last value.
    fn eval_group(&mut self, node: &ParseNode) -> EvalResult<Value> {
        let mut last = Value::tuple(Vec::new());
        for statement in &node.children {
            last = self.eval(statement)?;
        }
        Ok(last)
    }

    /// The two operands of a binary operator node.
    ///
    /// # Errors
    /// Faults with [`RuntimeError::MalformedNode`] — the parser only
    /// builds binary operator nodes, so any other shape is internal
    /// misuse.
    fn binary_operands<'n>(&self, node: &'n ParseNode) -> EvalResult<[&'n ParseNode; 2]> {
        match node.children.as_slice() {
            [left, right] => Ok([left, right]),
            _ => Err(RuntimeError::MalformedNode {
                details: format!("operator '{}' with {} operand(s)",
                                 node.text,
                                 node.children.len()),
            }),
        }
    }

    /// The names in `node` that resolve to no binding in any frame.
    #[must_use]
    pub fn unresolved_names(&self, node: &ParseNode) -> Vec<String> {
        let mut names = Vec::new();
        node.collect_names(&mut names);
        names.retain(|name| self.lookup(name).is_none());
        names
    }
}
