//! Normalization of `requires_dist` dependency strings.
//!
//! Package indexes publish dependencies as loosely structured requirement
//! strings such as `requests (>=2.26.0) ; python_version >= "3.7"` or
//! `Some-Pkg[extra]>=1.0`. The graph only needs the bare package name, so
//! everything from the first version or marker character onwards is cut off.

/// Characters that end the package name portion of a requirement string.
///
/// The first occurrence of any of these wins, so names containing one of
/// them literally are not supported.
pub const NAME_TERMINATORS: &[char] = &[';', '(', ' ', '<', '>', '!', '~', '='];

/// Reduces a raw requirement string to a canonical lowercase package name.
///
/// Leading whitespace is skipped before scanning for a terminator.
///
/// Returns `None` when nothing usable remains (e.g. blank input or a string
/// that starts with a version specifier).
///
/// # Example
///
/// ```rust
/// use depmap::parser::normalize;
///
/// assert_eq!(
///     normalize("requests (>=2.26.0) ; python_version >= \"3.7\""),
///     Some("requests".to_string())
/// );
/// assert_eq!(normalize("Some-Pkg[extra]>=1.0"), Some("some-pkg".to_string()));
/// assert_eq!(normalize("   "), None);
/// ```
pub fn normalize(raw: &str) -> Option<String> {
    let raw = raw.trim_start();
    let head = match raw.find(NAME_TERMINATORS) {
        Some(end) => &raw[..end],
        None => raw,
    };

    let name = strip_extras(head);
    let name = name.trim().to_lowercase();

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Removes every `[...]` extras segment. An unclosed `[` is left as-is.
fn strip_extras(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('[') {
        let Some(close) = rest[open..].find(']') else {
            break;
        };
        out.push_str(&rest[..open]);
        rest = &rest[open + close + 1..];
    }

    out.push_str(rest);
    out
}
