//! Path-template compilation.
//!
//! A template like `/add/<name>/<email>` compiles to an anchored regex in
//! which every `<name>` placeholder captures one path segment (one or more
//! non-`/` characters) and all other text matches literally. Compilation
//! happens once at registration time, so bad templates fail at startup.

use crate::error::AppError;
use regex::Regex;

fn compile_error(template: &str, reason: impl Into<String>) -> AppError {
    AppError::RouteCompile {
        template: template.to_string(),
        reason: reason.into(),
    }
}

fn valid_placeholder_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Compile a path template into an anchored matcher.
pub fn compile(template: &str) -> Result<Regex, AppError> {
    let mut pattern = String::with_capacity(template.len() + 16);
    pattern.push('^');
    let mut rest = template;
    let mut seen = Vec::new();
    while let Some(start) = rest.find('<') {
        let (literal, tail) = rest.split_at(start);
        pattern.push_str(&regex::escape(literal));
        let end = tail
            .find('>')
            .ok_or_else(|| compile_error(template, "unclosed '<' placeholder"))?;
        let name = &tail[1..end];
        if !valid_placeholder_name(name) {
            return Err(compile_error(
                template,
                format!("invalid placeholder name '{}'", name),
            ));
        }
        if seen.contains(&name) {
            return Err(compile_error(
                template,
                format!("duplicate placeholder '{}'", name),
            ));
        }
        seen.push(name);
        pattern.push_str(&format!("(?P<{}>[^/]+)", name));
        rest = &tail[end + 1..];
    }
    pattern.push_str(&regex::escape(rest));
    pattern.push('$');
    Regex::new(&pattern).map_err(|e| compile_error(template, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholders_capture_single_segments() {
        let re = compile("/add/<name>/<email>").unwrap();
        let caps = re.captures("/add/Bob/bob@x.com").unwrap();
        assert_eq!(&caps["name"], "Bob");
        assert_eq!(&caps["email"], "bob@x.com");
    }

    #[test]
    fn segment_count_must_match_exactly() {
        let re = compile("/add/<name>/<email>").unwrap();
        assert!(re.captures("/add/Bob").is_none());
        assert!(re.captures("/add/Bob/x/extra").is_none());
        // anchored: no prefix or suffix matching
        assert!(re.captures("/prefix/add/Bob/x").is_none());
    }

    #[test]
    fn a_segment_never_spans_a_slash_or_matches_empty() {
        let re = compile("/user/<id>").unwrap();
        assert!(re.captures("/user/a/b").is_none());
        assert!(re.captures("/user/").is_none());
    }

    #[test]
    fn literal_text_is_escaped() {
        let re = compile("/file.txt").unwrap();
        assert!(re.is_match("/file.txt"));
        assert!(!re.is_match("/fileXtxt"));
    }

    #[test]
    fn bad_templates_fail_at_compile_time() {
        assert!(matches!(
            compile("/a/<name").unwrap_err(),
            AppError::RouteCompile { .. }
        ));
        assert!(matches!(
            compile("/a/<>").unwrap_err(),
            AppError::RouteCompile { .. }
        ));
        assert!(matches!(
            compile("/a/<x>/<x>").unwrap_err(),
            AppError::RouteCompile { .. }
        ));
        assert!(matches!(
            compile("/a/<with space>").unwrap_err(),
            AppError::RouteCompile { .. }
        ));
    }

    #[test]
    fn root_template_matches_only_root() {
        let re = compile("/").unwrap();
        assert!(re.is_match("/"));
        assert!(!re.is_match("/anything"));
    }
}
