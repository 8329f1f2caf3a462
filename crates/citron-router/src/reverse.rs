//! Reverse resolution: a route template plus parameter values back to a URL.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// The one optional-group shape reverse resolution can substitute:
/// `(/<name>)` with a single placeholder. Other group shapes are not
/// substitutable; their parenthesis markup is stripped from the generated
/// URL instead, leaving any unfilled placeholders verbatim.
static OPTIONAL_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(/<([A-Za-z0-9_]+)>\)").expect("optional group pattern"));

/// Substitutes `data` into a normalized route template, producing a path
/// with a single leading separator.
pub(crate) fn substitute(template: &str, data: &HashMap<String, String>) -> String {
    let encoded: HashMap<&str, String> = data
        .iter()
        .map(|(k, v)| (k.as_str(), encode_component(v)))
        .collect();

    let mut path = template.to_string();

    let optional = OPTIONAL_PARAM
        .captures(&path)
        .map(|caps| (caps[0].to_string(), caps[1].to_string()));
    if let Some((group, key)) = optional {
        let replacement = encoded
            .get(key.as_str())
            .map(|value| format!("/{value}"))
            .unwrap_or_default();
        path = path.replace(&group, &replacement);
    }

    for (key, value) in &encoded {
        path = path.replace(&format!("<{key}>"), value);
    }

    let mut url = String::from("/");
    url.extend(path.chars().filter(|c| !matches!(c, '(' | ')' | '\\')));
    url
}

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Percent-encodes a parameter value. RFC 3986 unreserved characters stay
/// literal, as do both separators, so path-valued parameters remain
/// path-shaped.
fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());

    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'~'
            | b'/'
            | b'\\' => out.push(byte as char),
            _ => {
                out.push('%');
                out.push(HEX[(byte >> 4) as usize] as char);
                out.push(HEX[(byte & 0x0F) as usize] as char);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_plain_placeholder_substitution() {
        assert_eq!(substitute("post/<pid>", &data(&[("pid", "42")])), "/post/42");
    }

    #[test]
    fn test_optional_group_with_and_without_value() {
        assert_eq!(substitute("hello(/<name>)", &data(&[])), "/hello");
        assert_eq!(
            substitute("hello(/<name>)", &data(&[("name", "x")])),
            "/hello/x"
        );
    }

    #[test]
    fn test_values_are_percent_encoded() {
        assert_eq!(
            substitute("search/<q>", &data(&[("q", "a b&c")])),
            "/search/a%20b%26c"
        );
    }

    #[test]
    fn test_separators_stay_literal_in_values() {
        assert_eq!(
            substitute("files/<path>", &data(&[("path", "docs/readme")])),
            "/files/docs/readme"
        );
    }

    #[test]
    fn test_missing_value_leaves_placeholder_verbatim() {
        assert_eq!(substitute("post/<pid>", &data(&[])), "/post/<pid>");
    }

    #[test]
    fn test_only_the_single_param_group_shape_is_substituted() {
        // A two-placeholder group is outside the supported shape: the
        // markup is stripped, the placeholders are filled independently.
        assert_eq!(
            substitute("docs(/<a>/<b>)", &data(&[("a", "1"), ("b", "2")])),
            "/docs/1/2"
        );
        // Without values the stripped markup leaves the placeholders behind.
        assert_eq!(substitute("docs(/<a>/<b>)", &data(&[])), "/docs/<a>/<b>");
    }

    #[test]
    fn test_root_template() {
        assert_eq!(substitute("", &data(&[])), "/");
    }
}
