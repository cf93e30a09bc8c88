//! Template placeholder normalization
//!
//! Rewrites `@{{ expr }}` to `@<expr>` and `{{ expr }}` to `<expr>` so the
//! structured and heuristic passes see one token shape regardless of how the
//! template was spaced.

use regex::Regex;

use crate::core::GraphError;

/// Collapses templated placeholders into canonical bracket tokens
#[derive(Debug, Clone)]
pub struct TemplateNormalizer {
    prefixed: Regex,
    bare: Regex,
}

impl TemplateNormalizer {
    pub fn new() -> Result<Self, GraphError> {
        Ok(Self {
            prefixed: Regex::new(r"@\{\{\s*([^{}]+?)\s*\}\}")?,
            bare: Regex::new(r"\{\{\s*([^{}]+?)\s*\}\}")?,
        })
    }

    /// Normalize both placeholder shapes
    ///
    /// The prefixed shape must be rewritten first: the bare pattern matches
    /// inside it.
    pub fn normalize(&self, text: &str) -> String {
        let prefixed = self.prefixed.replace_all(text, "@<${1}>");
        self.bare.replace_all(&prefixed, "<${1}>").into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn normalizer() -> TemplateNormalizer {
        TemplateNormalizer::new().unwrap()
    }

    #[test]
    fn test_bare_placeholder() {
        assert_eq!(normalizer().normalize("{{ x }}"), "<x>");
        assert_eq!(normalizer().normalize("{{x}}"), "<x>");
    }

    #[test]
    fn test_prefixed_placeholder_is_distinct() {
        let n = normalizer();
        let prefixed = n.normalize("@{{ x }}");
        let bare = n.normalize("{{ x }}");
        assert_eq!(prefixed, "@<x>");
        assert_ne!(prefixed, bare);
    }

    #[test]
    fn test_both_shapes_on_separate_lines() {
        let input = "unit: worker@{{ instance }}.service\nname: {{ app }}-api\n";
        assert_eq!(
            normalizer().normalize(input),
            "unit: worker@<instance>.service\nname: <app>-api\n"
        );
    }

    #[test]
    fn test_whitespace_inside_delimiters() {
        assert_eq!(
            normalizer().normalize("@{{   pillar['site']   }}"),
            "@<pillar['site']>"
        );
    }

    #[test]
    fn test_text_without_placeholders_is_untouched() {
        let input = "nginx:\n  service.running:\n    - enable: True\n";
        assert_eq!(normalizer().normalize(input), input);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let n = normalizer();
        let once = n.normalize("a@{{ b }} {{ c }}");
        assert_eq!(n.normalize(&once), once);
    }

    fn placeholder() -> impl Strategy<Value = String> {
        (any::<bool>(), "[a-z_.]{1,8}", " {0,3}", " {0,3}").prop_map(|(prefixed, expr, l, r)| {
            format!("{}{{{{{}{}{}}}}}", if prefixed { "@" } else { "" }, l, expr, r)
        })
    }

    fn template_text() -> impl Strategy<Value = String> {
        prop::collection::vec(("[a-z :.\n-]{0,10}", placeholder()), 0..6).prop_map(|parts| {
            parts
                .into_iter()
                .map(|(text, token)| format!("{}{}", text, token))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_normalize_idempotent(input in template_text()) {
            let n = normalizer();
            let once = n.normalize(&input);
            prop_assert_eq!(n.normalize(&once), once.clone());
            prop_assert!(!once.contains("{{"));
        }

        #[test]
        fn prop_prefixed_keeps_its_marker(expr in "[a-z_]{1,8}", pad in " {0,3}") {
            let n = normalizer();
            let out = n.normalize(&format!("@{{{{{}{}{}}}}}", pad, expr, pad));
            prop_assert_eq!(out, format!("@<{}>", expr));
        }
    }
}
