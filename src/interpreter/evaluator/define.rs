use crate::{
    ast::{NodeKind, ParseNode, is_name},
    interpreter::{
        evaluator::core::{Context, EvalResult},
        types::{TUPLE, Type},
        value::core::{CandidateBody, FunctionCandidate, Payload, Value},
    },
};

/// A signature compiled into dispatchable parameter data.
pub struct CompiledSignature {
    /// Binding names, one per entry.
    pub names:      Vec<String>,
    /// Declared parameter types, one per entry.
    pub types:      Vec<Type>,
    /// Guard expressions for entries whose pattern is not a bare name.
    pub predicates: Vec<Option<ParseNode>>,
}

impl Context {
    /// Compiles a signature node into typed parameters with guards.
    ///
    /// Each entry is `pattern : type`. A bare-name pattern just binds; any
    /// other pattern expression becomes a guard predicate whose binding
    /// name is the first name it mentions (`n > 0 : #` binds `n` and
    /// guards on the comparison). An entry without `:` binds at the
    /// wildcard type.
    pub fn compile_signature(&mut self, signature: &ParseNode) -> CompiledSignature {
        let mut compiled = CompiledSignature { names:      Vec::new(),
                                               types:      Vec::new(),
                                               predicates: Vec::new(), };
        for entry in &signature.children {
            let (pattern, ty) = match entry {
                ParseNode { kind: NodeKind::Operator,
                            text,
                            children, } if text == ":" && children.len() == 2 => {
                    (&children[0], self.parse_type_expression(&children[1]))
                },
                _ => (entry, Type::any()),
            };
            let (name, predicate) = pattern_parts(pattern);
            compiled.names.push(name);
            compiled.types.push(ty);
            compiled.predicates.push(predicate);
        }
        compiled
    }

    /// Resolves a type expression from a signature entry.
    ///
    /// `#` is number, `$` is text, `*` the wildcard; `[T]` a list and
    /// `(T, U)` a tuple; a name bound to a type value resolves nominally,
    /// and any other name is a generic placeholder unified at dispatch
    /// time.
    pub fn parse_type_expression(&mut self, node: &ParseNode) -> Type {
        match node.kind {
            NodeKind::Term => match node.text.as_str() {
                "#" | "number" => Type::number(),
                "$" | "text" => Type::text(),
                "boolean" => Type::boolean(),
                "*" | "" => Type::any(),
                name => match self.lookup(name).and_then(Value::as_type) {
                    Some(ty) => ty.clone(),
                    None => Type::generic(name),
                },
            },
            NodeKind::List => match node.children.as_slice() {
                [element] => Type::list(self.parse_type_expression(element)),
                _ => Type::list(Type::any()),
            },
            NodeKind::Tuple => {
                let components = node.children
                                     .iter()
                                     .map(|child| self.parse_type_expression(child))
                                     .collect();
                Type::tuple(components)
            },
            _ => Type::any(),
        }
    }

    /// Compiles `name = {signature} => body` into a new function case.
    ///
    /// The case appends to the name's overload table; existing overloads
    /// are never mutated, and insertion order stays significant for
    /// dispatch ties.
    ///
    /// # Errors
    /// Host-level faults only.
    pub fn define_function(&mut self,
                           name: &str,
                           signature: &ParseNode,
                           body: &ParseNode)
                           -> EvalResult<Value> {
        let compiled = self.compile_signature(signature);
        let case = format!("{signature} => {body}");
        let arity = compiled.names.len();
        let candidate = FunctionCandidate { arity,
                                            param_names: compiled.names,
                                            param_types: compiled.types,
                                            predicates: compiled.predicates,
                                            specificities: vec![1.0; arity],
                                            body: CandidateBody::Defined(body.clone()) };
        Ok(self.append_case(name, candidate, case))
    }

    /// Compiles an unbound `{signature} => body` into a function value.
    ///
    /// # Errors
    /// Host-level faults only.
    pub fn anonymous_function(&mut self,
                              signature: &ParseNode,
                              body: &ParseNode)
                              -> EvalResult<Value> {
        let compiled = self.compile_signature(signature);
        let case = format!("{signature} => {body}");
        let arity = compiled.names.len();
        let candidate = FunctionCandidate { arity,
                                            param_names: compiled.names,
                                            param_types: compiled.types,
                                            predicates: compiled.predicates,
                                            specificities: vec![1.0; arity],
                                            body: CandidateBody::Defined(body.clone()) };
        let index = self.add_candidate(candidate);
        Ok(function_value(vec![case], vec![index]))
    }

    /// Compiles `name = {signature}` into a brand-new nominal type.
    ///
    /// The signature's entries become the record's field types. A
    /// constructor on `new` (taking the type value first), a getter and a
    /// setter per field are auto-registered as ordinary dispatchable
    /// candidates — user records reuse the exact same dispatch machinery
    /// as builtins.
    ///
    /// # Errors
    /// Host-level faults only.
    pub fn define_type(&mut self, name: &str, signature: &ParseNode) -> EvalResult<Value> {
        let compiled = self.compile_signature(signature);
        let nominal = Type::Nominal { alias:      name.to_string(),
                                      base:       TUPLE.to_string(),
                                      components: compiled.types.clone(), };
        let type_value = Value::type_ref(nominal.clone());
        self.assign_value(name, type_value.clone());

        let field_count = compiled.names.len();
        let mut constructor_names = vec!["t".to_string()];
        constructor_names.extend(compiled.names.iter().cloned());
        let mut constructor_types = vec![Type::type_ref()];
        constructor_types.extend(compiled.types.iter().cloned());
        // Guard the constructor to this exact type value, so records with
        // the same field shape keep distinct constructors.
        let guard = ParseNode::operator("==", vec![ParseNode::term("t"), ParseNode::term(name)]);
        let mut constructor_predicates = vec![Some(guard)];
        constructor_predicates.extend(std::iter::repeat_n(None, field_count));
        let constructor = FunctionCandidate { arity:         field_count + 1,
                                              param_names:   constructor_names,
                                              param_types:   constructor_types,
                                              predicates:    constructor_predicates,
                                              specificities: vec![1.0; field_count + 1],
                                              body:          CandidateBody::Construct(nominal.clone()), };
        self.append_case("new", constructor, format!("new({name}, ...) => {name}"));

        for (position, field) in compiled.names.iter().enumerate() {
            let getter = FunctionCandidate { arity:         1,
                                             param_names:   vec![field.clone()],
                                             param_types:   vec![nominal.clone()],
                                             predicates:    vec![None],
                                             specificities: vec![1.0],
                                             body:          CandidateBody::GetField(position), };
            self.append_case(field, getter, format!("{field}({name}) => field"));

            let setter = FunctionCandidate { arity:         2,
                                             param_names:   vec![field.clone(),
                                                                 "value".to_string()],
                                             param_types:   vec![nominal.clone(),
                                                                 compiled.types[position].clone()],
                                             predicates:    vec![None, None],
                                             specificities: vec![1.0, 1.0],
                                             body:          CandidateBody::SetField(position), };
            self.append_case(field, setter, format!("{field}({name}, value) => {name}"));
        }
        Ok(type_value)
    }

    /// Appends a candidate to a name's overload table.
    ///
    /// If the name is already bound to a function, the rebuilt value
    /// (with the case appended) replaces it in the frame where it lives;
    /// otherwise a new function value is bound in the innermost frame.
    /// Returns the function value after the append.
    pub fn append_case(&mut self, name: &str, candidate: FunctionCandidate, case: String)
                       -> Value {
        let index = self.add_candidate(candidate);
        for frame in self.scope_stack.iter_mut().rev() {
            if let Some(value) = frame.get_mut(name) {
                if let Payload::Function { cases, invocations } = &mut value.payload {
                    cases.push(case);
                    invocations.push(index);
                    return value.clone();
                }
                // Bound to a plain value: shadow with a fresh function.
                break;
            }
        }
        let value = function_value(vec![case], vec![index]);
        self.assign_value(name, value.clone());
        value
    }
}

/// The binding name and optional guard of one signature pattern.
fn pattern_parts(pattern: &ParseNode) -> (String, Option<ParseNode>) {
    if pattern.is_bare_term() && is_name(&pattern.text) {
        return (pattern.text.clone(), None);
    }
    let mut names = Vec::new();
    pattern.collect_names(&mut names);
    let name = names.into_iter().next().unwrap_or_else(|| "_".to_string());
    (name, Some(pattern.clone()))
}

/// Builds a function value over existing arena indexes.
fn function_value(cases: Vec<String>, invocations: Vec<usize>) -> Value {
    Value { payload: Payload::Function { cases, invocations },
            ty:      Type::function(), }
}
