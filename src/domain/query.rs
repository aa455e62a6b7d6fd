//! Shared query-string assembly for list-style operations
//!
//! Only filters the caller actually supplied contribute a parameter, and
//! parameters always appear in the order the handler lists them, so identical
//! logical requests produce byte-identical request paths. Values are
//! percent-encoded; keys are handler-declared literals and pass through as-is.

pub fn path_with_query(path: &str, params: &[(&str, Option<&str>)]) -> String {
    let mut out = String::from(path);
    let mut separator = '?';

    for (key, value) in params {
        if let Some(value) = value {
            out.push(separator);
            out.push_str(key);
            out.push('=');
            out.push_str(&urlencoding::encode(value));
            separator = '&';
        }
    }

    out
}
