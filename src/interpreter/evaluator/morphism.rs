use crate::interpreter::{
    evaluator::core::{Context, EvalResult},
    types::{Type, type_assignable_from},
    value::core::{ErrorKind, Value},
};

impl Context {
    /// Registers an implicit conversion from one type to another.
    ///
    /// The registry is keyed by the canonical string rendering of both
    /// endpoints; registering the same pair again replaces the converter.
    pub fn register_morphism(&mut self, from: &Type, to: &Type, converter: Value) {
        self.morphisms
            .entry(from.render())
            .or_default()
            .insert(to.render(), converter);
    }

    /// Removes a registered conversion, if present.
    pub fn remove_morphism(&mut self, from: &Type, to: &Type) {
        if let Some(destinations) = self.morphisms.get_mut(&from.render()) {
            destinations.remove(&to.render());
        }
    }

    /// Finds a conversion path between two rendered type names.
    ///
    /// Depth-first search over the registry graph. A type already on the
    /// current path is not revisited, but may be reached again via a
    /// different path. The first complete path found is returned — not
    /// the shortest; callers must not assume minimal conversion distance.
    /// An empty result means no conversion exists.
    #[must_use]
    pub fn path_between(&self, start: &str, end: &str) -> Vec<String> {
        let mut path = vec![start.to_string()];
        if self.search(start, end, &mut path) {
            path
        } else {
            Vec::new()
        }
    }

    fn search(&self, current: &str, end: &str, path: &mut Vec<String>) -> bool {
        let Some(destinations) = self.morphisms.get(current) else {
            return false;
        };
        for next in destinations.keys() {
            if path.iter().any(|seen| seen == next) {
                continue;
            }
            path.push(next.clone());
            if next == end || self.search(next, end, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    /// Converts a value to a target type along a registered path.
    ///
    /// Walks the found path pairwise, invoking each hop's converter
    /// through ordinary dispatch and chaining one hop's output into the
    /// next. No path, or a hop failing, yields an error value.
    ///
    /// # Errors
    /// Host-level faults from converter bodies only.
    pub fn morph_types(&mut self, value: &Value, target: &Type) -> EvalResult<Value> {
        // Already the declared type: identity conversion.
        if type_assignable_from(&value.ty, target) {
            return Ok(value.clone());
        }
        let path = self.path_between(&value.ty.render(), &target.render());
        if path.len() < 2 {
            return Ok(Value::error(ErrorKind::NoMatch,
                                   format!("no satisfactory match converting {} to {}",
                                           value.ty.render(),
                                           target.render())));
        }
        self.apply_morph_path(value, &path)
    }

    /// Applies an already-found conversion path hop by hop.
    pub(in crate::interpreter::evaluator) fn apply_morph_path(&mut self,
                                                              value: &Value,
                                                              path: &[String])
                                                              -> EvalResult<Value> {
        let mut current = value.clone();
        for hop in path.windows(2) {
            let converter = self.morphisms
                                .get(&hop[0])
                                .and_then(|destinations| destinations.get(&hop[1]))
                                .cloned();
            let Some(converter) = converter else {
                return Ok(Value::error(ErrorKind::NoMatch,
                                       format!("no converter from {} to {}", hop[0], hop[1])));
            };
            if !converter.is_function() {
                return Ok(Value::error(ErrorKind::NoMatch,
                                       format!("converter from {} to {} is not a function",
                                               hop[0], hop[1])));
            }
            current = self.call_function_by_reference(&converter, vec![current], "morph")?;
            if current.is_error() {
                return Ok(current);
            }
        }
        Ok(current)
    }
}
