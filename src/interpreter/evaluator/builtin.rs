use ordered_float::OrderedFloat;

use crate::{
    interpreter::{
        evaluator::core::Context,
        types::Type,
        value::core::{ErrorKind, NativeFn, Value},
        value::display::render_value,
    },
    util::num::{f64_to_index, parse_number},
};

/// One native function registration.
///
/// The standard table below covers the engine's own needs; embedders pass
/// extra tables through [`Context::bootstrapped_with`] to add or bias
/// their own natives (file and IO primitives are deliberately absent here
/// and must come from the host).
pub struct NativeBuiltin {
    /// The global name the overload registers under.
    pub name:        &'static str,
    /// Declared parameter types.
    pub params:      Vec<Type>,
    /// Specificity weight applied at every position.
    pub specificity: f64,
    /// The native body.
    pub body:        NativeFn,
}

impl NativeBuiltin {
    fn new(name: &'static str, params: Vec<Type>, body: NativeFn) -> Self {
        Self { name,
               params,
               specificity: 1.0,
               body }
    }
}

/// In-language standard library, interpreted at bootstrap through the
/// same entry point user statements take.
pub const PRELUDE: &[&str] = &["add = {a:#, b:#} => (a + b)",
                              "min = {a:#, b:#} => (a < b ? (a, b))",
                              "max = {a:#, b:#} => (a < b ? (b, a))",
                              "abs = {n:#} => (n < 0 ? (0 - n, n))",
                              "even? = {n:#} => (n % 2 == 0)",
                              "odd? = {n:#} => (n % 2 == 1)",
                              "sum = {values:[#]} => (values \\> add)"];

impl Context {
    /// A context loaded with the standard natives and the prelude.
    #[must_use]
    pub fn bootstrapped() -> Self {
        Self::bootstrapped_with(&[])
    }

    /// A context loaded with the standard natives, an embedder-supplied
    /// extra table, and the prelude.
    ///
    /// Extra registrations append after the standard ones, so on equal
    /// scores the standard overload still wins; embedders override by
    /// registering at a higher specificity.
    #[must_use]
    pub fn bootstrapped_with(extra: &[NativeBuiltin]) -> Self {
        let mut ctx = Self::new();
        for builtin in &standard_builtins() {
            ctx.register_native(builtin);
        }
        for builtin in extra {
            ctx.register_native(builtin);
        }
        for statement in PRELUDE {
            let _ = crate::interpret(&mut ctx, statement);
        }
        ctx
    }

    /// Registers one native overload in the global namespace.
    pub fn register_native(&mut self, builtin: &NativeBuiltin) {
        let arity = builtin.params.len();
        let candidate = crate::interpreter::value::core::FunctionCandidate {
            arity,
            param_names: (0..arity).map(|i| format!("arg{i}")).collect(),
            param_types: builtin.params.clone(),
            predicates: vec![None; arity],
            specificities: vec![builtin.specificity; arity],
            body: crate::interpreter::value::core::CandidateBody::Native(builtin.body),
        };
        let rendered: Vec<String> = builtin.params.iter().map(Type::render).collect();
        let case = format!("native {}({})", builtin.name, rendered.join(", "));
        self.append_case(builtin.name, candidate, case);
    }
}

/// The fixed table of standard native registrations.
#[must_use]
pub fn standard_builtins() -> Vec<NativeBuiltin> {
    let number = Type::number;
    let text = Type::text;
    let any = Type::any;
    vec![NativeBuiltin::new("+", vec![number(), number()], native_add),
         NativeBuiltin::new("+", vec![text(), text()], native_concat),
         NativeBuiltin::new("-", vec![number(), number()], native_sub),
         NativeBuiltin::new("*", vec![number(), number()], native_mul),
         NativeBuiltin::new("/", vec![number(), number()], native_div),
         NativeBuiltin::new("%", vec![number(), number()], native_rem),
         NativeBuiltin::new("neg", vec![number()], native_neg),
         NativeBuiltin::new("<", vec![number(), number()], native_less),
         NativeBuiltin::new("<=", vec![number(), number()], native_less_equal),
         NativeBuiltin::new(">", vec![number(), number()], native_greater),
         NativeBuiltin::new(">=", vec![number(), number()], native_greater_equal),
         NativeBuiltin::new("<", vec![text(), text()], native_text_less),
         NativeBuiltin::new(">", vec![text(), text()], native_text_greater),
         NativeBuiltin::new("==", vec![any(), any()], native_equal),
         NativeBuiltin::new("!=", vec![any(), any()], native_not_equal),
         NativeBuiltin::new("..", vec![number(), number()], native_range),
         NativeBuiltin::new("size", vec![Type::list(Type::any())], native_size),
         NativeBuiltin::new("size", vec![text()], native_text_size),
         NativeBuiltin::new("size", vec![Type::any_tuple()], native_tuple_size),
         NativeBuiltin::new("get", vec![Type::list(Type::any()), number()], native_get),
         NativeBuiltin::new("append", vec![Type::list(Type::any()), any()], native_append),
         NativeBuiltin::new("sort", vec![Type::list(Type::any())], native_sort),
         NativeBuiltin::new("->", vec![Type::list(Type::any()), Type::function()], native_map),
         NativeBuiltin::new("~>", vec![Type::list(Type::any()), Type::function()], native_filter),
         NativeBuiltin::new("\\>", vec![Type::list(Type::any()), Type::function()], native_reduce),
         NativeBuiltin::new("number", vec![text()], native_parse_number),
         NativeBuiltin::new("stringify", vec![any()], native_stringify),
         NativeBuiltin::new("show", vec![any()], native_stringify),
         NativeBuiltin::new("type", vec![any()], native_type),
         NativeBuiltin::new("convert", vec![any(), Type::type_ref()], native_convert),
         NativeBuiltin::new("morphism",
                            vec![Type::type_ref(), Type::type_ref(), Type::function()],
                            native_morphism),
         NativeBuiltin::new("fail", vec![text()], native_fail),
         NativeBuiltin::new("assert", vec![Type::boolean()], native_assert)]
}

/// A native received a payload its declared types should have excluded.
fn confused(name: &str) -> Value {
    Value::error(ErrorKind::Failure, format!("'{name}' received an unexpected value"))
}

fn numbers(args: &[Value]) -> Option<(f64, f64)> {
    Some((args.first()?.as_number()?, args.get(1)?.as_number()?))
}

fn native_add(args: &[Value], _ctx: &mut Context) -> Value {
    numbers(args).map_or_else(|| confused("+"), |(a, b)| Value::number(a + b))
}

fn native_concat(args: &[Value], _ctx: &mut Context) -> Value {
    match (args[0].as_text(), args[1].as_text()) {
        (Some(a), Some(b)) => Value::text(format!("{a}{b}")),
        _ => confused("+"),
    }
}

fn native_sub(args: &[Value], _ctx: &mut Context) -> Value {
    numbers(args).map_or_else(|| confused("-"), |(a, b)| Value::number(a - b))
}

fn native_mul(args: &[Value], _ctx: &mut Context) -> Value {
    numbers(args).map_or_else(|| confused("*"), |(a, b)| Value::number(a * b))
}

fn native_div(args: &[Value], _ctx: &mut Context) -> Value {
    match numbers(args) {
        Some((_, b)) if b == 0.0 => Value::error(ErrorKind::Failure, "division by zero"),
        Some((a, b)) => Value::number(a / b),
        None => confused("/"),
    }
}

fn native_rem(args: &[Value], _ctx: &mut Context) -> Value {
    match numbers(args) {
        Some((_, b)) if b == 0.0 => Value::error(ErrorKind::Failure, "division by zero"),
        Some((a, b)) => Value::number(a % b),
        None => confused("%"),
    }
}

fn native_neg(args: &[Value], _ctx: &mut Context) -> Value {
    args[0].as_number().map_or_else(|| confused("neg"), |n| Value::number(-n))
}

fn native_less(args: &[Value], _ctx: &mut Context) -> Value {
    numbers(args).map_or_else(|| confused("<"), |(a, b)| Value::boolean(a < b))
}

fn native_less_equal(args: &[Value], _ctx: &mut Context) -> Value {
    numbers(args).map_or_else(|| confused("<="), |(a, b)| Value::boolean(a <= b))
}

fn native_greater(args: &[Value], _ctx: &mut Context) -> Value {
    numbers(args).map_or_else(|| confused(">"), |(a, b)| Value::boolean(a > b))
}

fn native_greater_equal(args: &[Value], _ctx: &mut Context) -> Value {
    numbers(args).map_or_else(|| confused(">="), |(a, b)| Value::boolean(a >= b))
}

fn native_text_less(args: &[Value], _ctx: &mut Context) -> Value {
    match (args[0].as_text(), args[1].as_text()) {
        (Some(a), Some(b)) => Value::boolean(a < b),
        _ => confused("<"),
    }
}

fn native_text_greater(args: &[Value], _ctx: &mut Context) -> Value {
    match (args[0].as_text(), args[1].as_text()) {
        (Some(a), Some(b)) => Value::boolean(a > b),
        _ => confused(">"),
    }
}

fn native_equal(args: &[Value], _ctx: &mut Context) -> Value {
    Value::boolean(args[0].payload == args[1].payload)
}

fn native_not_equal(args: &[Value], _ctx: &mut Context) -> Value {
    Value::boolean(args[0].payload != args[1].payload)
}

/// `a..b` is the inclusive ascending range; descending bounds are empty.
fn native_range(args: &[Value], _ctx: &mut Context) -> Value {
    let Some((from, to)) = numbers(args) else {
        return confused("..");
    };
    let mut elements = Vec::new();
    let mut current = from;
    while current <= to {
        elements.push(Value::number(current));
        current += 1.0;
    }
    Value::list(elements)
}

#[allow(clippy::cast_precision_loss)]
fn native_size(args: &[Value], _ctx: &mut Context) -> Value {
    args[0].as_list()
           .map_or_else(|| confused("size"), |elements| Value::number(elements.len() as f64))
}

#[allow(clippy::cast_precision_loss)]
fn native_text_size(args: &[Value], _ctx: &mut Context) -> Value {
    args[0].as_text()
           .map_or_else(|| confused("size"), |t| Value::number(t.chars().count() as f64))
}

/// The empty-base tuple parameter accepts any tuple width.
#[allow(clippy::cast_precision_loss)]
fn native_tuple_size(args: &[Value], _ctx: &mut Context) -> Value {
    args[0].as_tuple()
           .map_or_else(|| confused("size"), |elements| Value::number(elements.len() as f64))
}

/// Zero-based list access; a bad index is an error value, not a fault.
fn native_get(args: &[Value], _ctx: &mut Context) -> Value {
    let (Some(elements), Some(raw)) = (args[0].as_list(), args[1].as_number()) else {
        return confused("get");
    };
    let element = f64_to_index(raw).and_then(|i| elements.get(i));
    element.cloned().unwrap_or_else(|| {
                        Value::error(ErrorKind::IndexOutOfRange,
                                     format!("index {raw} outside 0..{}", elements.len()))
                    })
}

fn native_append(args: &[Value], _ctx: &mut Context) -> Value {
    args[0].as_list().map_or_else(
                                  || confused("append"),
                                  |elements| {
                                      let mut extended = elements.to_vec();
                                      extended.push(args[1].clone());
                                      Value::list(extended)
                                  },
    )
}

fn native_sort(args: &[Value], _ctx: &mut Context) -> Value {
    let Some(elements) = args[0].as_list() else {
        return confused("sort");
    };
    let mut numbers = Vec::with_capacity(elements.len());
    for element in elements {
        match element.as_number() {
            Some(n) => numbers.push(n),
            None => return Value::error(ErrorKind::Failure, "sort expects a list of numbers"),
        }
    }
    numbers.sort_by_key(|n| OrderedFloat(*n));
    Value::list(numbers.into_iter().map(Value::number).collect())
}

fn native_map(args: &[Value], ctx: &mut Context) -> Value {
    let Some(elements) = args[0].as_list() else {
        return confused("->");
    };
    let mut mapped = Vec::with_capacity(elements.len());
    for element in elements {
        match ctx.call_function_by_reference(&args[1], vec![element.clone()], "->") {
            Ok(outcome) if outcome.is_error() => return outcome,
            Ok(outcome) => mapped.push(outcome),
            Err(fault) => return Value::error(ErrorKind::Failure, fault.to_string()),
        }
    }
    Value::list(mapped)
}

fn native_filter(args: &[Value], ctx: &mut Context) -> Value {
    let Some(elements) = args[0].as_list() else {
        return confused("~>");
    };
    let mut kept = Vec::new();
    for element in elements {
        match ctx.call_function_by_reference(&args[1], vec![element.clone()], "~>") {
            Ok(outcome) if outcome.is_error() => return outcome,
            Ok(outcome) => match outcome.as_boolean() {
                Some(true) => kept.push(element.clone()),
                Some(false) => {},
                None => {
                    return Value::error(ErrorKind::Failure, "filter predicate must be a boolean");
                },
            },
            Err(fault) => return Value::error(ErrorKind::Failure, fault.to_string()),
        }
    }
    Value::list(kept)
}

fn native_reduce(args: &[Value], ctx: &mut Context) -> Value {
    let Some(elements) = args[0].as_list() else {
        return confused("\\>");
    };
    let Some((first, rest)) = elements.split_first() else {
        return Value::error(ErrorKind::Failure, "cannot reduce an empty list");
    };
    let mut accumulated = first.clone();
    for element in rest {
        match ctx.call_function_by_reference(&args[1],
                                             vec![accumulated, element.clone()],
                                             "\\>")
        {
            Ok(outcome) if outcome.is_error() => return outcome,
            Ok(outcome) => accumulated = outcome,
            Err(fault) => return Value::error(ErrorKind::Failure, fault.to_string()),
        }
    }
    accumulated
}

fn native_parse_number(args: &[Value], _ctx: &mut Context) -> Value {
    let Some(text) = args[0].as_text() else {
        return confused("number");
    };
    parse_number(text).map_or_else(|| {
                                       Value::error(ErrorKind::NumberParse,
                                                    format!("'{text}' is not a number"))
                                   },
                                   Value::number)
}

fn native_stringify(args: &[Value], _ctx: &mut Context) -> Value {
    Value::text(render_value(&args[0]))
}

fn native_type(args: &[Value], _ctx: &mut Context) -> Value {
    Value::type_ref(args[0].ty.clone())
}

fn native_convert(args: &[Value], ctx: &mut Context) -> Value {
    let Some(target) = args[1].as_type().cloned() else {
        return confused("convert");
    };
    match ctx.morph_types(&args[0], &target) {
        Ok(converted) => converted,
        Err(fault) => Value::error(ErrorKind::Failure, fault.to_string()),
    }
}

fn native_morphism(args: &[Value], ctx: &mut Context) -> Value {
    let (Some(from), Some(to)) = (args[0].as_type(), args[1].as_type()) else {
        return confused("morphism");
    };
    ctx.register_morphism(from, to, args[2].clone());
    Value::boolean(true)
}

fn native_fail(args: &[Value], _ctx: &mut Context) -> Value {
    let detail = args[0].as_text().unwrap_or("failure").to_string();
    Value::error(ErrorKind::Failure, detail)
}

fn native_assert(args: &[Value], _ctx: &mut Context) -> Value {
    match args[0].as_boolean() {
        Some(true) => Value::boolean(true),
        Some(false) => Value::error(ErrorKind::Failure, "assertion failed"),
        None => confused("assert"),
    }
}
