use std::fmt;

use crate::{
    interpreter::{
        types::Type,
        value::core::{Payload, Value},
    },
    util::num::format_number,
};

/// Renders a value to its display string.
///
/// Text renders bare at top level and quoted inside containers, numbers
/// drop integral fractional parts, records render as `Alias(fields...)`,
/// and functions render their readable case listing.
#[must_use]
pub fn render_value(value: &Value) -> String {
    match &value.payload {
        Payload::Text(t) => t.clone(),
        _ => render_element(value),
    }
}

/// Renders a value as a container element (text keeps its quotes).
fn render_element(value: &Value) -> String {
    match &value.payload {
        Payload::Number(n) => format_number(*n),
        Payload::Text(t) => format!("\"{t}\""),
        Payload::Boolean(b) => b.to_string(),
        Payload::List(elements) => format!("[{}]", join(elements)),
        Payload::Tuple(elements) => match &value.ty {
            Type::Nominal { alias, .. } => format!("{alias}({})", join(elements)),
            _ => format!("({})", join(elements)),
        },
        Payload::Function { cases, .. } => render_cases(cases),
        Payload::Expression(node) => node.to_string(),
        Payload::TypeRef(ty) => ty.render(),
        Payload::Error(e) => format!("error({}): {}", e.kind, e.detail),
    }
}

/// Renders a function's overload table as a readable case listing.
#[must_use]
pub fn render_cases(cases: &[String]) -> String {
    if cases.is_empty() {
        return "function".to_string();
    }
    let mut out = String::from("function");
    for case in cases {
        out.push_str("\n  ");
        out.push_str(case);
    }
    out
}

fn join(elements: &[Value]) -> String {
    let parts: Vec<String> = elements.iter().map(render_element).collect();
    parts.join(", ")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", render_value(self))
    }
}
