use crate::interpreter::{
    evaluator::core::{Context, EvalResult},
    types::{GenericBindings, type_satisfaction},
    value::core::{CandidateBody, ErrorKind, FunctionCandidate, Payload, Value},
};

/// Below this normalized best score, a call over equal-width tuples is
/// reinterpreted as an element-wise "zip" over the tuple slots.
const BROADCAST_THRESHOLD: f64 = 0.25;

/// The sole error-tolerant call name: diagnostics must render errors.
const ERROR_SINK: &str = "show";

impl Context {
    /// Resolves a name and dispatches a call to it.
    ///
    /// When the name itself is unbound, the `?` (boolean-style) and `!`
    /// (assertion-style) suffixes are tried as ergonomic aliases; both
    /// being registered is an ambiguity error, neither an unknown-function
    /// error. A resolved non-function value is returned as-is, which lets
    /// a plain value serve as a 0-ary function.
    ///
    /// # Errors
    /// Host-level faults only; all dispatch failures are error values.
    pub fn dispatch_function(&mut self, name: &str, arguments: Vec<Value>) -> EvalResult<Value> {
        let (function, resolved) = match self.lookup(name).cloned() {
            Some(value) => (value, name.to_string()),
            None => {
                let query = format!("{name}?");
                let bang = format!("{name}!");
                match (self.lookup(&query).cloned(), self.lookup(&bang).cloned()) {
                    (Some(_), Some(_)) => {
                        return Ok(Value::error(ErrorKind::AmbiguousFunction,
                                               format!("both '{query}' and '{bang}' are registered")));
                    },
                    (Some(value), None) => (value, query),
                    (None, Some(value)) => (value, bang),
                    (None, None) => {
                        return Ok(Value::error(ErrorKind::UnknownFunction,
                                               format!("unknown function '{name}'")));
                    },
                }
            },
        };
        if !function.is_function() {
            return Ok(function);
        }
        self.call_function_by_reference(&function, arguments, &resolved)
    }

    /// Finds and invokes the best-scoring candidate of a function value.
    ///
    /// The candidates matching the argument count are each scored per
    /// parameter position by type satisfaction, multiplied by the
    /// position's predicate result and declared specificity. A position
    /// scoring zero disqualifies the candidate unless a registered
    /// conversion path exists from the argument's type to the parameter's
    /// type, in which case the argument is converted and the position
    /// rescored by conversion distance. Ties keep the earliest-registered
    /// candidate. When even the best normalized score falls under the
    /// broadcast threshold and every argument is an equal-width tuple, the
    /// call zips element-wise instead.
    ///
    /// Dispatch never faults for "no match": failures come back as error
    /// values.
    ///
    /// # Errors
    /// Host-level faults only (dangling candidate indexes, internal
    /// invariant misuse inside a winning body).
    pub fn call_function_by_reference(&mut self,
                                      function: &Value,
                                      arguments: Vec<Value>,
                                      name: &str)
                                      -> EvalResult<Value> {
        if name != ERROR_SINK
           && let Some(error) = arguments.iter().find(|a| a.is_error())
        {
            return Ok(error.clone());
        }

        let invocations: Vec<usize> = function.invocations().unwrap_or(&[]).to_vec();
        let mut considered = 0usize;
        let mut best: Option<Scored> = None;
        for index in invocations {
            let candidate = self.candidate(index)?.clone();
            if candidate.arity != arguments.len() {
                continue;
            }
            considered += 1;
            // Scoring gets a fresh scope for predicate bindings, discarded
            // whether or not the candidate survives.
            self.enter_scope();
            let scored = self.score_candidate(&candidate, &arguments);
            self.exit_scope();
            if let Some(scored) = scored
               && best.as_ref().is_none_or(|b| scored.score > b.score)
            {
                best = Some(Scored { index, ..scored });
            }
        }
        if considered == 0 {
            return Ok(Value::error(ErrorKind::ArityMismatch,
                                   format!("no case of '{name}' takes {} argument(s)",
                                           arguments.len())));
        }

        let best_score = best.as_ref().map_or(0.0, |b| b.score);
        #[allow(clippy::cast_precision_loss)]
        let normalized = best_score / arguments.len().max(1) as f64;
        if normalized < BROADCAST_THRESHOLD
           && let Some(zipped) = self.broadcast_tuple_call(name, &arguments)?
        {
            return Ok(zipped);
        }

        match best {
            Some(found) if found.score > 0.0 => self.invoke_candidate(found),
            _ => Ok(Value::error(ErrorKind::NoMatch,
                                 format!("no satisfactory match for '{name}'"))),
        }
    }

    /// Scores one candidate against the arguments.
    ///
    /// Returns `None` when the candidate is disqualified by a
    /// zero-scoring position with no conversion path, or by a failed
    /// predicate. A predicate that faults internally reads as false, so
    /// guard failures never crash dispatch.
    ///
    /// A position rescued by a conversion path scores by conversion
    /// distance, but the conversion itself runs lazily at invocation for
    /// the winning candidate only — unless the position carries a
    /// predicate, which must see the morphed argument. Losing candidates
    /// therefore never run converter bodies.
    fn score_candidate(&mut self,
                       candidate: &FunctionCandidate,
                       arguments: &[Value])
                       -> Option<Scored> {
        let mut bindings = GenericBindings::new();
        let mut morphed = arguments.to_vec();
        let mut pending = Vec::new();
        // A 0-ary candidate has nothing to score and matches perfectly.
        let mut total = if candidate.arity == 0 { 1.0 } else { 0.0 };

        for i in 0..candidate.arity {
            let parameter = &candidate.param_types[i];
            let mut score =
                type_satisfaction(&morphed[i].ty, parameter, &mut bindings, 0, Some(&morphed[i]));
            if score == 0.0 {
                let path = self.path_between(&morphed[i].ty.render(), &parameter.render());
                if path.len() < 2 {
                    return None;
                }
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                let hops = (path.len() - 1) as i32;
                score = 0.5f64.powi(hops);
                if candidate.predicates[i].is_some() {
                    let converted = self.apply_morph_path(&morphed[i], &path).ok()?;
                    if converted.is_error() {
                        return None;
                    }
                    morphed[i] = converted;
                } else {
                    pending.push((i, path));
                }
            }
            if let Some(predicate) = &candidate.predicates[i] {
                let predicate = predicate.clone();
                self.assign_value(&candidate.param_names[i], morphed[i].clone());
                let passed = self.eval(&predicate)
                                 .map(|outcome| outcome.as_boolean() == Some(true))
                                 .unwrap_or(false);
                if !passed {
                    return None;
                }
            }
            total += score * candidate.specificities[i];
        }
        Some(Scored { score: total,
                      index: 0,
                      morphed,
                      pending,
                      bindings })
    }

    /// Reinterprets a poorly matched call as an element-wise tuple zip.
    ///
    /// Requires every argument to be a tuple of one shared width; each
    /// slot dispatches recursively, and only if every slot succeeds are
    /// the results bundled back into a tuple of the first argument's
    /// type. This lets scalar operators work pointwise over tuples
    /// without per-width overloads.
    fn broadcast_tuple_call(&mut self,
                            name: &str,
                            arguments: &[Value])
                            -> EvalResult<Option<Value>> {
        let Some(first) = arguments.first().and_then(Value::as_tuple) else {
            return Ok(None);
        };
        let width = first.len();
        if width == 0 {
            return Ok(None);
        }
        let mut columns: Vec<&[Value]> = Vec::with_capacity(arguments.len());
        for argument in arguments {
            match argument.as_tuple() {
                Some(elements) if elements.len() == width => columns.push(elements),
                _ => return Ok(None),
            }
        }

        let mut slots = Vec::with_capacity(width);
        for slot in 0..width {
            let slot_arguments: Vec<Value> =
                columns.iter().map(|column| column[slot].clone()).collect();
            let outcome = self.dispatch_function(name, slot_arguments)?;
            if outcome.is_error() {
                return Ok(None);
            }
            slots.push(outcome);
        }
        let mut bundled = Value::tuple(slots);
        bundled.ty = arguments[0].ty.clone();
        Ok(Some(bundled))
    }

    /// Invokes a winning candidate with its morphed arguments.
    ///
    /// Conversions deferred during scoring are applied first; generic
    /// placeholders resolved during scoring are bound as visible type
    /// variables for the body's duration, then un-bound.
    fn invoke_candidate(&mut self, mut found: Scored) -> EvalResult<Value> {
        for (position, path) in std::mem::take(&mut found.pending) {
            let converted = self.apply_morph_path(&found.morphed[position], &path)?;
            if converted.is_error() {
                return Ok(converted);
            }
            found.morphed[position] = converted;
        }
        let found = &found;
        let candidate = self.candidate(found.index)?.clone();
        for (generic, bound) in &found.bindings {
            self.assign_value(generic, Value::type_ref(bound.clone()));
        }

        let outcome = match &candidate.body {
            CandidateBody::Native(body) => Ok(body(&found.morphed, self)),
            CandidateBody::Defined(expression) => {
                self.enter_scope();
                for (parameter, argument) in candidate.param_names.iter().zip(&found.morphed) {
                    self.assign_value(parameter, argument.clone());
                }
                let result = self.eval(expression);
                self.exit_scope();
                result
            },
            CandidateBody::Construct(ty) => {
                let fields = found.morphed[1..].to_vec();
                Ok(Value { payload: Payload::Tuple(fields),
                           ty:      ty.clone(), })
            },
            CandidateBody::GetField(position) => self.get_field(found, *position),
            CandidateBody::SetField(position) => self.set_field(found, *position),
        };

        for generic in found.bindings.keys() {
            self.delete_value(generic);
        }
        outcome
    }

    fn get_field(&self, found: &Scored, position: usize) -> EvalResult<Value> {
        found.morphed
             .first()
             .and_then(Value::as_tuple)
             .and_then(|fields| fields.get(position))
             .cloned()
             .ok_or_else(|| missing_field(position))
    }

    fn set_field(&self, found: &Scored, position: usize) -> EvalResult<Value> {
        let record = found.morphed.first().cloned().ok_or_else(|| missing_field(position))?;
        let replacement = found.morphed.get(1).cloned().ok_or_else(|| missing_field(position))?;
        match record.payload {
            Payload::Tuple(mut fields) if position < fields.len() => {
                fields[position] = replacement;
                Ok(Value { payload: Payload::Tuple(fields),
                           ty:      record.ty, })
            },
            _ => Err(missing_field(position)),
        }
    }
}

/// A candidate that survived scoring.
struct Scored {
    score:    f64,
    index:    usize,
    morphed:  Vec<Value>,
    /// Conversions to apply at invocation: position and found path.
    pending:  Vec<(usize, Vec<String>)>,
    bindings: GenericBindings,
}

/// Field accessors only ever match their own record type, so a missing
/// field is internal invariant misuse, not a user failure.
fn missing_field(position: usize) -> crate::error::RuntimeError {
    crate::error::RuntimeError::MalformedNode { details: format!("record has no field {position}"), }
}
