//! Route template parsing and compilation.

use std::collections::HashMap;

use regex::Regex;

use crate::error::{Result, RouterError};
use crate::params::PathParams;

/// Default capture class for a placeholder: everything up to the next path
/// separator or URL delimiter.
const DEFAULT_SEGMENT: &str = "[^/.,;?\n]+";

/// Characters that are special to the regex engine but carry no meaning in
/// the template DSL; escaped verbatim during compilation.
const ESCAPED: &[char] = &[
    '.', '\\', '+', '*', '?', '[', '^', ']', '$', '{', '}', '=', '!', '|',
];

#[derive(Debug, Clone)]
enum Token {
    Literal(char),
    OpenGroup,
    CloseGroup,
    Param(String),
}

/// A parsed route template.
///
/// Templates contain literal text, `<name>` placeholders and `(...)`
/// optional groups, which may nest:
///
/// ```
/// use std::collections::HashMap;
/// use citron_router::PathTemplate;
///
/// let template = PathTemplate::parse("/hello(/<name>)").unwrap();
/// let matcher = template.compile(&HashMap::new()).unwrap();
///
/// assert!(matcher.match_path("/hello").is_some());
/// let params = matcher.match_path("/hello/world").unwrap();
/// assert_eq!(params.get("name"), Some("world"));
/// ```
#[derive(Debug, Clone)]
pub struct PathTemplate {
    template: String,
    tokens: Vec<Token>,
    param_names: Vec<String>,
}

impl PathTemplate {
    /// Parses a template string, trimming leading and trailing separators.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPattern`] for unbalanced optional
    /// groups and for malformed placeholders: empty names, names outside
    /// `[A-Za-z0-9_]+`, an unterminated `<`, a stray `>`, or the same name
    /// used twice.
    pub fn parse(template: &str) -> Result<Self> {
        let template = template.trim_matches('/').to_string();
        let mut tokens = Vec::new();
        let mut param_names: Vec<String> = Vec::new();
        let mut depth = 0_usize;
        let mut chars = template.chars();

        while let Some(c) = chars.next() {
            match c {
                '(' => {
                    depth += 1;
                    tokens.push(Token::OpenGroup);
                }
                ')' => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| invalid(&template, "unbalanced `)`"))?;
                    tokens.push(Token::CloseGroup);
                }
                '<' => {
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('>') => break,
                            Some(c) if c.is_ascii_alphanumeric() || c == '_' => name.push(c),
                            Some(c) => {
                                return Err(invalid(
                                    &template,
                                    &format!("invalid character `{c}` in placeholder name"),
                                ))
                            }
                            None => return Err(invalid(&template, "unterminated placeholder")),
                        }
                    }
                    if name.is_empty() {
                        return Err(invalid(&template, "empty placeholder name"));
                    }
                    if param_names.contains(&name) {
                        return Err(invalid(
                            &template,
                            &format!("duplicate placeholder `{name}`"),
                        ));
                    }
                    param_names.push(name.clone());
                    tokens.push(Token::Param(name));
                }
                '>' => return Err(invalid(&template, "stray `>`")),
                c => tokens.push(Token::Literal(c)),
            }
        }

        if depth != 0 {
            return Err(invalid(&template, "unbalanced `(`"));
        }

        Ok(Self {
            template,
            tokens,
            param_names,
        })
    }

    /// The normalized template, without leading or trailing separator.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Placeholder names, in first-appearance order. This is the order
    /// handlers receive their positional arguments in.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Compiles the template into an anchored, case-sensitive matcher.
    ///
    /// Each `conditions` entry replaces the default capture class for that
    /// placeholder. Optional groups become non-capturing zero-or-one
    /// repetitions.
    ///
    /// # Errors
    ///
    /// Fails only when a condition is not valid syntax for the regex
    /// engine; the template structure itself was validated by
    /// [`PathTemplate::parse`].
    pub fn compile(
        &self,
        conditions: &HashMap<String, String>,
    ) -> std::result::Result<CompiledTemplate, regex::Error> {
        let mut expr = String::from("^/");

        for token in &self.tokens {
            match token {
                Token::OpenGroup => expr.push_str("(?:"),
                Token::CloseGroup => expr.push_str(")?"),
                Token::Param(name) => {
                    let class = conditions.get(name).map_or(DEFAULT_SEGMENT, String::as_str);
                    expr.push_str("(?P<");
                    expr.push_str(name);
                    expr.push('>');
                    expr.push_str(class);
                    expr.push(')');
                }
                Token::Literal(c) => {
                    if ESCAPED.contains(c) {
                        expr.push('\\');
                    }
                    expr.push(*c);
                }
            }
        }

        expr.push('$');

        Ok(CompiledTemplate {
            regex: Regex::new(&expr)?,
            param_names: self.param_names.clone(),
        })
    }
}

fn invalid(template: &str, reason: &str) -> RouterError {
    RouterError::InvalidPattern(format!("`{template}`: {reason}"))
}

/// A compiled matcher derived from a template and its conditions.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    regex: Regex,
    param_names: Vec<String>,
}

impl CompiledTemplate {
    /// Tests a concrete path against the whole template, returning captures
    /// in template order on success.
    ///
    /// Expects a normalized path: single leading separator, no trailing
    /// separator, query string already stripped. Placeholders inside
    /// unmatched optional groups are absent from the result.
    pub fn match_path(&self, path: &str) -> Option<PathParams> {
        let caps = self.regex.captures(path)?;

        let mut params = PathParams::new();
        for name in &self.param_names {
            if let Some(value) = caps.name(name) {
                params.insert(name.clone(), value.as_str().to_string());
            }
        }

        Some(params)
    }

    /// The compiled expression, useful for diagnostics.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(template: &str) -> CompiledTemplate {
        PathTemplate::parse(template)
            .unwrap()
            .compile(&HashMap::new())
            .unwrap()
    }

    #[test]
    fn test_literal_template_is_exact() {
        let matcher = compile("/about");
        assert!(matcher.match_path("/about").is_some());
        assert!(matcher.match_path("/about/us").is_none());
        assert!(matcher.match_path("/abou").is_none());
        assert!(matcher.match_path("/aboutx").is_none());
    }

    #[test]
    fn test_root_template() {
        let matcher = compile("/");
        assert!(matcher.match_path("/").is_some());
        assert!(matcher.match_path("/x").is_none());
    }

    #[test]
    fn test_placeholder_capture() {
        let matcher = compile("/post/<pid>");
        let params = matcher.match_path("/post/42").unwrap();
        assert_eq!(params.get("pid"), Some("42"));
        assert!(matcher.match_path("/post").is_none());
        assert!(matcher.match_path("/post/42/extra").is_none());
    }

    #[test]
    fn test_default_class_excludes_delimiters() {
        let matcher = compile("/file/<name>");
        assert!(matcher.match_path("/file/readme.md").is_none());
        assert!(matcher.match_path("/file/a,b").is_none());
        assert!(matcher.match_path("/file/a;b").is_none());
        assert!(matcher.match_path("/file/a?b").is_none());
        assert!(matcher.match_path("/file/readme").is_some());
    }

    #[test]
    fn test_trailing_optional_group() {
        let matcher = compile("/hello(/<name>)");
        assert!(matcher.match_path("/hello").is_some());
        let params = matcher.match_path("/hello/world").unwrap();
        assert_eq!(params.get("name"), Some("world"));
        assert!(matcher.match_path("/hello/two/segments").is_none());
    }

    #[test]
    fn test_unmatched_optional_capture_is_absent() {
        let matcher = compile("/hello(/<name>)");
        let params = matcher.match_path("/hello").unwrap();
        assert_eq!(params.get("name"), None);
        assert!(params.is_empty());
    }

    #[test]
    fn test_nested_optional_groups() {
        let matcher = compile("/archive(/<year>(/<month>))");
        assert!(matcher.match_path("/archive").is_some());

        let params = matcher.match_path("/archive/2024").unwrap();
        assert_eq!(params.get("year"), Some("2024"));
        assert_eq!(params.get("month"), None);

        let params = matcher.match_path("/archive/2024/06").unwrap();
        assert_eq!(params.get("year"), Some("2024"));
        assert_eq!(params.get("month"), Some("06"));
    }

    #[test]
    fn test_condition_overrides_default_class() {
        let conditions: HashMap<String, String> =
            [("pid".to_string(), "[0-9]+".to_string())].into_iter().collect();
        let matcher = PathTemplate::parse("/post/<pid>")
            .unwrap()
            .compile(&conditions)
            .unwrap();

        assert!(matcher.match_path("/post/42").is_some());
        assert!(matcher.match_path("/post/abc").is_none());
    }

    #[test]
    fn test_literal_regex_metacharacters_are_escaped() {
        let matcher = compile("/price/$<amount>");
        assert!(matcher.match_path("/price/$10").is_some());

        let matcher = compile("/v1.0/status");
        assert!(matcher.match_path("/v1.0/status").is_some());
        assert!(matcher.match_path("/v1x0/status").is_none());
    }

    #[test]
    fn test_param_names_in_template_order() {
        let template = PathTemplate::parse("/post/<a>/<b>/<c>").unwrap();
        assert_eq!(template.param_names(), ["a", "b", "c"]);
    }

    #[test]
    fn test_template_is_normalized() {
        let template = PathTemplate::parse("//post/<pid>/").unwrap();
        assert_eq!(template.template(), "post/<pid>");
    }

    #[test]
    fn test_parse_errors() {
        assert!(PathTemplate::parse("/a(/<b>").is_err());
        assert!(PathTemplate::parse("/a/<b>)").is_err());
        assert!(PathTemplate::parse("/a/<>").is_err());
        assert!(PathTemplate::parse("/a/<na me>").is_err());
        assert!(PathTemplate::parse("/a/<open").is_err());
        assert!(PathTemplate::parse("/a/stray>").is_err());
        assert!(PathTemplate::parse("/a/<x>/<x>").is_err());
    }

    #[test]
    fn test_bad_condition_fails_compilation() {
        let conditions: HashMap<String, String> =
            [("pid".to_string(), "[".to_string())].into_iter().collect();
        let template = PathTemplate::parse("/post/<pid>").unwrap();
        assert!(template.compile(&conditions).is_err());
    }
}
