use std::fs;

use polyma::{
    eval_script, interpret,
    interpreter::{
        evaluator::core::Context,
        parser::{core::parse_statement, method::rewrite_method_calls},
        types::{Type, type_satisfaction, wildcard_score},
        value::core::{ErrorKind, Payload, Value},
    },
    should_evaluate, split_statements,
};
use walkdir::WalkDir;

fn eval_all(source: &str) -> Value {
    eval_script(source).unwrap_or_else(|e| panic!("Script faulted:\n{source}\nFault: {e}"))
}

fn assert_number(source: &str, expected: f64) {
    let value = eval_all(source);
    assert_eq!(value.as_number(), Some(expected), "source: {source}, got {value}");
}

fn assert_boolean(source: &str, expected: bool) {
    let value = eval_all(source);
    assert_eq!(value.as_boolean(), Some(expected), "source: {source}, got {value}");
}

fn assert_text(source: &str, expected: &str) {
    let value = eval_all(source);
    assert_eq!(value.as_text(), Some(expected), "source: {source}, got {value}");
}

fn assert_error_kind(source: &str, expected: ErrorKind) {
    let value = eval_all(source);
    match &value.payload {
        Payload::Error(e) => assert_eq!(e.kind, expected, "source: {source}"),
        other => panic!("expected a {expected} error for {source}, got {other:?}"),
    }
}

#[test]
fn demo_scripts_work() {
    let mut count = 0;

    for entry in
        WalkDir::new("demos").into_iter()
                             .filter_map(Result::ok)
                             .filter(|e| e.path().extension().is_some_and(|ext| ext == "pma"))
    {
        count += 1;
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));

        let mut ctx = Context::bootstrapped();
        for (line, statement) in split_statements(&source) {
            if !should_evaluate(&statement) {
                continue;
            }
            let value = interpret(&mut ctx, &statement).unwrap_or_else(|e| {
                            panic!("{path:?} line {line} faulted: {e}")
                        });
            assert!(!value.is_error(), "{path:?} line {line}: {value}");
        }
    }

    assert!(count > 0, "No demo scripts found in demos/");
}

#[test]
fn precedence_binds_multiplication_tighter() {
    let tree = parse_statement("1 + 2 * 3").unwrap();
    assert_eq!(tree.text, "+");
    assert_eq!(tree.children[0].text, "1");
    assert_eq!(tree.children[1].text, "*");
    assert_eq!(tree.children[1].children[0].text, "2");
    assert_eq!(tree.children[1].children[1].text, "3");

    assert_number("1 + 2 * 3", 7.0);
    assert_number("2 * 3 + 1", 7.0);
    assert_number("10 - 2 - 3", 5.0);
}

#[test]
fn minus_disambiguation() {
    // Binary between two operands.
    let subtraction = parse_statement("3 - 1").unwrap();
    assert_eq!(subtraction.text, "-");

    // Negation folds into a following literal.
    let negated = parse_statement("(-1)").unwrap();
    assert_eq!(negated.text, "-1");

    let call = parse_statement("f(-1)").unwrap();
    assert_eq!(call.children[0].text, "-1");

    assert_number("3 - 1", 2.0);
    assert_number("3 - -1", 4.0);
    assert_number("neg(5)", -5.0);
    assert_number("x = -4\nabs(x)", 4.0);
}

#[test]
fn method_call_rewrite() {
    assert_eq!(rewrite_method_calls("5.double()"), "double(5)");
    assert_eq!(rewrite_method_calls("x.plus(1, 2)"), "plus(x, 1, 2)");
    assert_eq!(rewrite_method_calls("(1, 2).sum()"), "sum((1, 2))");
    assert_eq!(rewrite_method_calls("\"a.b\""), "\"a.b\"");
    assert_eq!(rewrite_method_calls("1 .. 5"), "1 .. 5");
    assert_eq!(rewrite_method_calls("3.5 + 1"), "3.5 + 1");

    assert_number("double = {n:#} => (n * 2)\n5.double()", 10.0);
    assert_number("values = [1, 2, 3]\nvalues.size()", 3.0);
}

#[test]
fn wildcard_attractiveness_decays_with_depth() {
    assert!(wildcard_score(0) > wildcard_score(1));
    assert!(wildcard_score(1) > wildcard_score(2));
    assert!(wildcard_score(5) > wildcard_score(6));

    // A concrete top-level match outranks a wildcard at the same position.
    let mut bindings = std::collections::HashMap::new();
    let concrete = type_satisfaction(&Type::number(), &Type::number(), &mut bindings, 0, None);
    let wildcard = type_satisfaction(&Type::number(), &Type::any(), &mut bindings, 0, None);
    assert!(concrete > wildcard);

    // The same wildcard is worth less one level deeper.
    let witness = Value::list(vec![Value::number(1.0)]);
    let nested = type_satisfaction(&Type::list(Type::number()),
                                   &Type::list(Type::any()),
                                   &mut bindings,
                                   0,
                                   Some(&witness));
    assert!(wildcard > nested);
}

#[test]
fn dispatch_is_deterministic_and_ties_keep_the_earliest_case() {
    let source = "pick = {n:#} => (\"first\")\n\
                  pick = {n:#} => (\"second\")\n\
                  pick(1)";
    for _ in 0..10 {
        assert_text(source, "first");
    }
}

#[test]
fn tuple_broadcast_zips_element_wise() {
    let value = eval_all("(1, 2) + (3, 4)");
    let elements = value.as_tuple().expect("expected a tuple");
    assert_eq!(elements[0].as_number(), Some(4.0));
    assert_eq!(elements[1].as_number(), Some(6.0));

    let value = eval_all("(1, 2, 3) * (2, 2, 2)");
    let elements = value.as_tuple().expect("expected a tuple");
    assert_eq!(elements.len(), 3);
    assert_eq!(elements[2].as_number(), Some(6.0));

    // Width mismatch cannot zip: the call fails as a value, not a fault.
    assert_error_kind("(1, 2) + (3, 4, 5)", ErrorKind::NoMatch);

    // A call that already matches well does not broadcast.
    assert_boolean("(1, 2) == (1, 2)", true);
    assert_boolean("(1, 2) == (1, 3)", false);
}

#[test]
fn morphism_chaining_converts_through_intermediate_types() {
    let source = "A = {amount:#}\n\
                  B = {amount:#}\n\
                  C = {amount:#}\n\
                  a2b = {a:A} => (new(B, amount(a) * 2))\n\
                  b2c = {b:B} => (new(C, amount(b) * 10))\n\
                  morphism(A, B, a2b)\n\
                  morphism(B, C, b2c)\n\
                  amount(convert(new(A, 100), C))";
    assert_number(source, 2000.0);
}

#[test]
fn removing_a_morphism_hop_breaks_the_chain() {
    let mut ctx = Context::bootstrapped();
    let statements = ["A = {amount:#}",
                      "B = {amount:#}",
                      "C = {amount:#}",
                      "a2b = {a:A} => (new(B, amount(a) * 2))",
                      "b2c = {b:B} => (new(C, amount(b) * 10))",
                      "morphism(A, B, a2b)",
                      "morphism(B, C, b2c)"];
    for statement in statements {
        interpret(&mut ctx, statement).unwrap();
    }
    let converted = interpret(&mut ctx, "convert(new(A, 1), C)").unwrap();
    assert!(!converted.is_error());

    let b = ctx.lookup("B").and_then(Value::as_type).cloned().unwrap();
    let c = ctx.lookup("C").and_then(Value::as_type).cloned().unwrap();
    ctx.remove_morphism(&b, &c);

    let broken = interpret(&mut ctx, "convert(new(A, 1), C)").unwrap();
    match &broken.payload {
        Payload::Error(e) => assert_eq!(e.kind, ErrorKind::NoMatch),
        other => panic!("expected a no-match error, got {other:?}"),
    }
}

#[test]
fn dispatch_also_tries_morphism_paths_for_mismatched_positions() {
    // `describe` only accepts B; an A argument converts on the way in.
    let source = "A = {amount:#}\n\
                  B = {amount:#}\n\
                  a2b = {a:A} => (new(B, amount(a) * 2))\n\
                  morphism(A, B, a2b)\n\
                  describe = {b:B} => (amount(b))\n\
                  describe(new(A, 21))";
    assert_number(source, 42.0);
}

#[test]
fn errors_short_circuit_every_function_except_show() {
    let failure = eval_all("fail(\"boom\")");
    let propagated = eval_all("fail(\"boom\") + 2");
    assert_eq!(propagated, failure);

    let deep = eval_all("double = {n:#} => (n * 2)\ndouble(double(fail(\"boom\")))");
    assert_eq!(deep, failure);

    // The designated sink renders instead of re-raising.
    let shown = eval_all("show(fail(\"boom\"))");
    assert_eq!(shown.as_text(), Some("error(failure): boom"));

    // `stringify` is not exempt.
    assert_error_kind("stringify(fail(\"boom\"))", ErrorKind::Failure);
}

#[test]
fn assignment_round_trip() {
    assert_number("x = 3 + 4\nx", 7.0);
    assert_number("double = {n:#} => (n * 2)\ndouble(5)", 10.0);
    assert_number("x = 2\nx = x + 3\nx", 5.0);
}

#[test]
fn scope_isolation() {
    // A body-scoped binding is invisible after the call returns.
    let source = "f = {n:#} => (t = n + 1\n\
                  t * 2)\n\
                  f(3)\n\
                  t";
    let leaked = eval_all(source);
    assert!(matches!(leaked.payload, Payload::Expression(_)),
            "body binding leaked: {leaked}");

    assert_number("f = {n:#} => (t = n + 1\nt * 2)\nf(3)", 8.0);

    // Top-level bindings persist across statements.
    assert_number("x = 1\ny = 2\nx + y", 3.0);
}

#[test]
fn short_circuit_control_constructs() {
    assert_number("1 < 2 ? (10, 20)", 10.0);
    assert_number("1 > 2 ? (10, 20)", 20.0);
    // Only the selected branch evaluates.
    assert_number("true ? (1, fail(\"untouched\"))", 1.0);
    assert_boolean("false & (1 / 0 == 0)", false);
    assert_boolean("true | (1 / 0 == 0)", true);
    assert_boolean("true & false", false);
    assert_error_kind("5 ? (1, 2)", ErrorKind::Failure);
}

#[test]
fn records_construct_access_and_update() {
    let source = "Point = {x:#, y:#}\n\
                  p = new(Point, 3, 4)\n\
                  x(p)";
    assert_number(source, 3.0);

    let source = "Point = {x:#, y:#}\n\
                  p = new(Point, 3, 4)\n\
                  moved = x(p, 10)\n\
                  x(moved) + y(moved)";
    assert_number(source, 14.0);

    // Setters rebuild; the original record is untouched.
    let source = "Point = {x:#, y:#}\n\
                  p = new(Point, 3, 4)\n\
                  q = x(p, 10)\n\
                  x(p)";
    assert_number(source, 3.0);
}

#[test]
fn nominal_types_are_not_structurally_interchangeable() {
    let source = "Point = {x:#, y:#}\n\
                  Size = {x:#, y:#}\n\
                  wide? = {s:Size} => (x(s) > y(s))\n\
                  wide?(new(Point, 3, 4))";
    assert_error_kind(source, ErrorKind::NoMatch);

    let source = "Point = {x:#, y:#}\n\
                  Size = {x:#, y:#}\n\
                  wide? = {s:Size} => (x(s) > y(s))\n\
                  wide?(new(Size, 4, 3))";
    assert_boolean(source, true);
}

#[test]
fn generics_unify_and_are_visible_in_the_body() {
    let source = "same = {a:g, b:g} => (true)\nsame(1, 2)";
    assert_boolean(source, true);

    let source = "same = {a:g, b:g} => (true)\nsame(1, \"two\")";
    assert_error_kind(source, ErrorKind::NoMatch);

    // The bound generic is a visible type variable inside the body.
    let source = "matched = {a:g} => (stringify(g))\nmatched(5)";
    assert_text(source, "number");

    // The binding is gone once the call completes.
    let source = "matched = {a:g} => (stringify(g))\nmatched(5)\ng";
    let after = eval_all(source);
    assert!(matches!(after.payload, Payload::Expression(_)));
}

#[test]
fn name_suffix_aliases() {
    assert_boolean("even?(4)", true);
    // A bare name reaches the `?`-suffixed registration.
    assert_boolean("even(4)", true);
    assert_boolean("even(3)", false);

    let source = "flag? = {n:#} => (true)\n\
                  flag! = {n:#} => (true)\n\
                  flag(1)";
    assert_error_kind(source, ErrorKind::AmbiguousFunction);

    assert_error_kind("vanish(1)", ErrorKind::UnknownFunction);
}

#[test]
fn guarded_signatures_choose_by_predicate() {
    let source = "sign = {n > 0 : #} => (1)\n\
                  sign = {n < 0 : #} => (0 - 1)\n\
                  sign = {n:#} => (0)\n";
    assert_number(&format!("{source}sign(9)"), 1.0);
    assert_number(&format!("{source}sign(-9)"), -1.0);
    assert_number(&format!("{source}sign(0)"), 0.0);
}

#[test]
fn pipeline_operators() {
    assert_number("double = {n:#} => (n * 2)\nget([1, 2, 3] -> double, 2)", 6.0);
    assert_number("size(1..10 ~> even?)", 5.0);
    assert_number("[1, 2, 3] \\> add", 6.0);
    assert_number("sum([1, 2, 3, 4])", 10.0);
    assert_number("size(1..5)", 5.0);
    assert_number("size(5..1)", 0.0);
}

#[test]
fn prelude_functions() {
    assert_number("min(3, 8)", 3.0);
    assert_number("max(3, 8)", 8.0);
    assert_number("abs(-7)", 7.0);
    assert_boolean("odd?(3)", true);
}

#[test]
fn value_level_failures_are_values() {
    assert_error_kind("add(1)", ErrorKind::ArityMismatch);
    assert_error_kind("get([1, 2], 9)", ErrorKind::IndexOutOfRange);
    assert_error_kind("number(\"abc\")", ErrorKind::NumberParse);
    assert_number("number(\"42\")", 42.0);
    assert_error_kind("1 / 0", ErrorKind::Failure);
    assert_error_kind("assert(1 == 2)", ErrorKind::Failure);
    assert_boolean("assert(1 < 2)", true);
}

#[test]
fn introspection_builtins() {
    assert_text("stringify(3.5)", "3.5");
    assert_text("stringify(7.0)", "7");
    assert_text("stringify(true)", "true");
    assert_text("stringify([1, 2])", "[1, 2]");
    assert_text("stringify(type(1))", "number");
    assert_text("stringify(type([1]))", "[number]");
    assert_text("stringify(type((1, \"a\")))", "(number, text)");
    assert_text("Point = {x:#, y:#}\nstringify(type(new(Point, 1, 2)))", "Point");
    // A function renders its readable case listing.
    let rendered = eval_all("double = {n:#} => (n * 2)\nshow(double)");
    assert!(rendered.as_text().is_some_and(|t| t.contains("=>")));
}

#[test]
fn groups_evaluate_sequentially_and_see_earlier_assignments() {
    assert_number("(a = 1\na + 1)", 2.0);
    assert_number("total = (a = 2\nb = 3\na * b)\ntotal", 6.0);
}

#[test]
fn plain_values_serve_as_zero_ary_functions() {
    assert_number("k = 5\nk()", 5.0);
    assert_text("greeting = \"hi\"\ngreeting()", "hi");
}

#[test]
fn empty_collections_and_text() {
    assert_number("size([])", 0.0);
    assert_error_kind("sum([])", ErrorKind::Failure);
    assert_number("size(\"hello\")", 5.0);
    assert_text("\"poly\" + \"ma\"", "polyma");
    assert_boolean("\"a\" < \"b\"", true);
}

#[test]
fn comments_and_blank_lines_are_filtered() {
    assert!(!should_evaluate("// nothing to see"));
    assert!(!should_evaluate(""));
    assert!(should_evaluate("x = 1"));
    assert_number("// setup\nx = 1\n\nx + 1", 2.0);
}

#[test]
fn sorting_uses_a_total_order() {
    assert_number("get(sort([3, 1, 2]), 0)", 1.0);
    assert_number("get(sort([2.5, 0.5, 1.5]), 2)", 2.5);
    assert_error_kind("sort([1, \"two\"])", ErrorKind::Failure);
}

#[test]
fn tuple_width_relaxation() {
    // The empty-base tuple parameter accepts any tuple width.
    assert_number("size((1, 2, 3))", 3.0);
    assert_number("size((\"a\", 1))", 2.0);
}

#[test]
fn converting_to_an_already_satisfied_type_is_identity() {
    assert_number("convert(5, type(1))", 5.0);
    assert_text("convert(\"five\", type(\"\"))", "five");
}

#[test]
fn context_scope_api() {
    let mut ctx = Context::bootstrapped();
    assert!(ctx.lookup_required("add").is_ok());
    assert!(ctx.lookup_required("nonexistent").is_err());

    // Global assignment is visible through nested frames and survives
    // their exit; inner assignment does not.
    ctx.enter_scope();
    ctx.global_assign_value("g", Value::number(1.0));
    ctx.assign_value("local", Value::number(2.0));
    assert!(ctx.lookup("g").is_some());
    assert!(ctx.lookup("local").is_some());
    ctx.exit_scope();
    assert!(ctx.lookup("g").is_some());
    assert!(ctx.lookup("local").is_none());

    ctx.delete_value("g");
    assert!(ctx.lookup("g").is_none());
}

#[test]
fn statements_split_at_top_level_only() {
    let statements = split_statements("a = 1\nf = {n:#} => (t = n\nt)\nf(2)");
    assert_eq!(statements.len(), 3);
    assert_eq!(statements[0], (1, "a = 1".to_string()));
    assert_eq!(statements[2].0, 4);
}
