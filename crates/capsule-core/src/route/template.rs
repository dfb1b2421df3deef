//! Dynamic URL segment substitution.
//!
//! Placeholders start with `:` or `*` and continue with one or more word characters
//! (`[A-Za-z0-9_]`). Both sigils are looked up the same way, by name. Values are inserted
//! verbatim: no escaping and no percent-encoding.

use serde_json::Value;
use tracing::warn;

/// Call parameters: placeholder name to value.
pub type Params = serde_json::Map<String, Value>;

/// Rendered in place of a placeholder that has no matching parameter.
pub const MISSING_PARAM: &str = "undefined";

fn is_sigil(byte: u8) -> bool {
    byte == b':' || byte == b'*'
}

fn is_word(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// Splits `template` into literal text and placeholder names, in order.
fn scan<'a>(template: &'a str, mut visit: impl FnMut(Segment<'a>)) {
    let bytes = template.as_bytes();
    let mut literal_start = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        if is_sigil(bytes[i]) && i + 1 < bytes.len() && is_word(bytes[i + 1]) {
            let name_start = i + 1;
            let name_end = bytes[name_start..]
                .iter()
                .position(|b| !is_word(*b))
                .map_or(bytes.len(), |offset| name_start + offset);

            visit(Segment::Literal(&template[literal_start..i]));
            visit(Segment::Placeholder(&template[name_start..name_end]));
            literal_start = name_end;
            i = name_end;
            continue;
        }
        i += 1;
    }

    visit(Segment::Literal(&template[literal_start..]));
}

/// Renders a parameter value the way it appears inside a URL.
pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Replaces every placeholder in `template` with the matching entry of `params`.
///
/// A missing parameter renders as [`MISSING_PARAM`] and is logged as a warning.
///
/// ```
/// use capsule_core::route::substitute;
/// use serde_json::json;
///
/// let params = json!({ "id": 42 }).as_object().cloned().unwrap_or_default();
/// assert_eq!(substitute("/users/:id", &params), "/users/42");
/// ```
#[must_use]
pub fn substitute(template: &str, params: &Params) -> String {
    let mut out = String::with_capacity(template.len());
    scan(template, |segment| match segment {
        Segment::Literal(text) => out.push_str(text),
        Segment::Placeholder(name) => match params.get(name) {
            Some(value) => out.push_str(&render_value(value)),
            None => {
                warn!(placeholder = name, template = template, "missing url parameter");
                out.push_str(MISSING_PARAM);
            }
        },
    });
    out
}

/// Lists placeholder names in the order they appear.
#[must_use]
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    scan(template, |segment| {
        if let Segment::Placeholder(name) = segment {
            names.push(name);
        }
    });
    names
}
