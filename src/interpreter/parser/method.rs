use crate::interpreter::lexer::NestTracker;

/// Rewrites every `receiver.method(args)` occurrence into
/// `method(receiver, args)`.
///
/// The scan restarts from the beginning after each rewrite, so nested and
/// chained method calls unwind outside-in. Termination is guaranteed by a
/// bound on the original text length: every rewrite removes the `.` it
/// found, and the rewritten text introduces none.
///
/// Dots inside text literals, dots between digits (numeric literals), and
/// the `..` range operator are left alone. A bare `receiver.method` with
/// no argument list rewrites to `method(receiver)`.
///
/// ## Example
/// ```
/// use polyma::interpreter::parser::method::rewrite_method_calls;
///
/// assert_eq!(rewrite_method_calls("5.double()"), "double(5)");
/// assert_eq!(rewrite_method_calls("x.plus(1, 2)"), "plus(x, 1, 2)");
/// assert_eq!(rewrite_method_calls("1 .. 5"), "1 .. 5");
/// ```
#[must_use]
pub fn rewrite_method_calls(text: &str) -> String {
    let mut current = text.to_string();
    for _ in 0..=text.len() {
        match rewrite_first(&current) {
            Some(next) => current = next,
            None => break,
        }
    }
    current
}

/// Rewrites the first eligible method-call dot, if any.
fn rewrite_first(text: &str) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut tracker = NestTracker::new();

    for i in 0..chars.len() {
        let c = chars[i];
        if c != '.' || tracker.in_quotes() {
            tracker.feed(c);
            continue;
        }
        tracker.feed(c);

        let prev = if i > 0 { Some(chars[i - 1]) } else { None };
        let next = chars.get(i + 1).copied();
        // Numeric literals and the range operator keep their dots.
        if prev.is_some_and(|p| p.is_ascii_digit()) && next.is_some_and(|n| n.is_ascii_digit()) {
            continue;
        }
        if prev == Some('.') || next == Some('.') {
            continue;
        }

        let (name, name_end) = scan_method_name(&chars, i + 1);
        if name.is_empty() {
            continue;
        }
        let receiver_start = scan_receiver_start(&chars, i);
        if receiver_start == i {
            continue;
        }
        let receiver: String = chars[receiver_start..i].iter().collect();
        let receiver = receiver.trim().to_string();
        if receiver.is_empty() {
            continue;
        }

        let (arguments, call_end) = capture_arguments(&chars, name_end);
        let replacement = match arguments {
            Some(args) if !args.trim().is_empty() => {
                format!("{name}({receiver}, {args})")
            },
            _ => format!("{name}({receiver})"),
        };

        let prefix: String = chars[..receiver_start].iter().collect();
        let suffix: String = chars[call_end..].iter().collect();
        return Some(format!("{prefix}{replacement}{suffix}"));
    }
    None
}

/// Scans an identifier (with optional `?`/`!` suffix) starting at `start`.
fn scan_method_name(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start;
    while end < chars.len() && (chars[end].is_ascii_alphanumeric() || chars[end] == '_') {
        end += 1;
    }
    if end > start && end < chars.len() && (chars[end] == '?' || chars[end] == '!') {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}

/// Captures a balanced `(...)` argument list starting at `open`, if present.
///
/// Returns the inner argument text and the index one past the closing
/// paren. An unmatched opening paren captures empty, consuming to the end
/// of the text.
fn capture_arguments(chars: &[char], open: usize) -> (Option<String>, usize) {
    if chars.get(open) != Some(&'(') {
        return (None, open);
    }
    let mut tracker = NestTracker::new();
    for (offset, &c) in chars[open..].iter().enumerate() {
        tracker.feed(c);
        if offset > 0 && tracker.at_top() {
            let inner: String = chars[open + 1..open + offset].iter().collect();
            return (Some(inner), open + offset + 1);
        }
    }
    (Some(String::new()), chars.len())
}

/// Finds where the receiver expression begins, scanning backward from the
/// dot at `dot`.
///
/// The scan balances closing brackets and skips text literals whole, so
/// `(1, 2).sum` captures the full tuple. At top level it stops at
/// whitespace, a comma, an opening bracket, or any operator character —
/// the receiver is the maximal balanced run before the dot.
fn scan_receiver_start(chars: &[char], dot: usize) -> usize {
    const STOPPERS: &str = " \t,+-*/%<>=&|?~\\:";
    let mut depth = 0i32;
    let mut r = dot;
    while r > 0 {
        let c = chars[r - 1];
        if c == '"' {
            // Skip backward over the whole literal.
            let mut q = r - 1;
            while q > 0 && chars[q - 1] != '"' {
                q -= 1;
            }
            r = q.saturating_sub(1);
            continue;
        }
        if depth == 0 && (STOPPERS.contains(c) || c == '(' || c == '[' || c == '{') {
            break;
        }
        if c == ')' || c == ']' || c == '}' {
            depth += 1;
        } else if c == '(' || c == '[' || c == '{' {
            depth -= 1;
        }
        r -= 1;
    }
    r
}
