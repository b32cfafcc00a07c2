// src/core/template_engine.rs
//! Prompt template rendering with `{{var}}` placeholders

use std::collections::HashMap;

/// A fixed prompt with named placeholders, filled once per model call.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    template: &'static str,
}

impl PromptTemplate {
    pub const fn new(template: &'static str) -> Self {
        Self { template }
    }

    /// Substitute every `{{key}}`; unknown placeholders are left untouched.
    pub fn render(&self, variables: &HashMap<&str, String>) -> String {
        process_variables(self.template, variables)
    }
}

/// Replace `{{key}}` placeholders in one left-to-right pass, so substituted
/// values are never re-scanned for placeholders.
pub fn process_variables(content: &str, variables: &HashMap<&str, String>) -> String {
    let mut result = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("{{") {
        result.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];

        match after_open.find("}}") {
            Some(end) => {
                let key = after_open[..end].trim();
                match variables.get(key) {
                    Some(value) => result.push_str(value),
                    None => {
                        result.push_str("{{");
                        result.push_str(&after_open[..end]);
                        result.push_str("}}");
                    }
                }
                rest = &after_open[end + 2..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    result.push_str(rest);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn test_repeated_placeholders() {
        let rendered = process_variables(
            "You are {{name}}. Remember you are {{ name }}.",
            &vars(&[("name", "Mohan")]),
        );
        assert_eq!(rendered, "You are Mohan. Remember you are Mohan.");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let rendered = process_variables(
            "{{page}} / {{role}}",
            &vars(&[("page", "literal {{role}} in page"), ("role", "SWE")]),
        );
        assert_eq!(rendered, "literal {{role}} in page / SWE");
    }

    #[test]
    fn test_unknown_and_unclosed_placeholders() {
        let rendered = process_variables("a {{missing}} b {{open", &vars(&[]));
        assert_eq!(rendered, "a {{missing}} b {{open");
    }

    #[test]
    fn test_json_braces_survive() {
        let template = PromptTemplate::new("return {\"role\": ...} for {{text}}");
        let rendered = template.render(&vars(&[("text", "page")]));
        assert_eq!(rendered, "return {\"role\": ...} for page");
    }
}
