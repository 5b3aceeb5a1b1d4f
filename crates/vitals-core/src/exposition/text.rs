//! Single-line rendering: `name{k1="v1",k2="v2"} value`.

use std::fmt::Write;

/// Escape a tag value (`\`, `"` and newline).
pub fn escape_tag_value(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Format a sample value.
///
/// Finite values use the shortest round-trip decimal form, so `3.0` renders as
/// `3`. Non-finite values use the exposition spellings `NaN`, `+Inf`, `-Inf`.
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "+Inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else {
        format!("{v}")
    }
}

/// Append one line (without trailing newline) to `out`.
///
/// Tags are written in the order given; callers pass them sorted. An empty tag
/// list renders without braces.
pub fn write_line<K, V>(out: &mut String, name: &str, tags: &[(K, V)], value: f64)
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    out.push_str(name);
    if !tags.is_empty() {
        out.push('{');
        for (i, (k, v)) in tags.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            let _ = write!(out, "{}=\"{}\"", k.as_ref(), escape_tag_value(v.as_ref()));
        }
        out.push('}');
    }
    out.push(' ');
    out.push_str(&format_value(value));
}

/// Render one line into a fresh `String`.
pub fn format_line<K, V>(name: &str, tags: &[(K, V)], value: f64) -> String
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut out = String::with_capacity(name.len() + 16);
    write_line(&mut out, name, tags, value);
    out
}
