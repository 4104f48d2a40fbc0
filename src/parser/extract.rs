//! Export rule classification and shared-data tree building.
//!
//! Rules whose selector matches the export grammar are turned into tree
//! data; every other node is passed through as CSS text, in source order.

use std::ops::Range;

use tracing::debug;

use crate::types::SharedData;
use crate::validation::{
    check_export_path, codes, describe_characters, Diagnostic, Diagnostics, PathIssueKind,
    FORBIDDEN_CHARACTERS,
};

use super::selector::{match_export_selector, ExportSelector};
use super::span::Span;
use super::stylesheet::{parse_stylesheet, AtRule, Node, Rule};

/// Renames export path segments and property names.
pub type NameTransformer = dyn Fn(&str) -> String + Send + Sync;

/// Output of the first phase for one stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedResult {
    /// Data declared by export rules.
    pub shared_data: SharedData,
    /// Every non-export node, newline separated.
    pub passthrough_code: String,
}

/// A `ParsedResult` together with the diagnostics raised while building it.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub result: ParsedResult,
    pub diagnostics: Diagnostics,
}

/// Split a stylesheet into shared data and passthrough CSS.
///
/// Export rules with forbidden characters in their path are reported and
/// dropped: none of their declarations reach the tree.
pub fn extract_shared_data(source: &str, transformer: Option<&NameTransformer>) -> Extraction {
    let sheet = parse_stylesheet(source);
    let mut extractor = Extractor {
        source,
        transformer,
        shared: SharedData::new(),
        diagnostics: Diagnostics::new(),
        export_rules: 0,
    };

    let passthrough: Vec<String> = sheet
        .nodes
        .iter()
        .filter_map(|node| extractor.visit(node))
        .collect();

    for offset in sheet.unclosed {
        extractor.diagnostics.push(
            Diagnostic::warning(codes::UNCLOSED_BLOCK, "block is not closed before end of file")
                .with_span(Span::from_offsets(source, offset, offset)),
        );
    }

    debug!(
        export_rules = extractor.export_rules,
        keys = extractor.shared.len(),
        "extracted shared data"
    );

    Extraction {
        result: ParsedResult {
            shared_data: extractor.shared,
            passthrough_code: passthrough.join("\n"),
        },
        diagnostics: extractor.diagnostics,
    }
}

fn rename(transformer: Option<&NameTransformer>, name: &str) -> String {
    match transformer {
        Some(transform) => transform(name),
        None => name.to_string(),
    }
}

struct Extractor<'a> {
    source: &'a str,
    transformer: Option<&'a NameTransformer>,
    shared: SharedData,
    diagnostics: Diagnostics,
    export_rules: usize,
}

impl<'a> Extractor<'a> {
    /// Consume export rules in `node`; return whatever CSS is left of it.
    fn visit(&mut self, node: &Node) -> Option<String> {
        match node {
            Node::Rule(rule) => match match_export_selector(&rule.selector) {
                Some(selector) => {
                    self.apply(rule, &selector);
                    None
                }
                None => Some(self.source[rule.range.clone()].to_string()),
            },
            Node::AtRule(AtRule {
                block: Some(block),
                range,
                ..
            }) => {
                let mut excluded = Vec::new();
                self.collect(&block.nodes, &mut excluded);

                if excluded.is_empty() {
                    return Some(self.source[range.clone()].to_string());
                }

                let emptied = block.declarations.is_empty()
                    && block.nodes.iter().all(|child| match child {
                        Node::Rule(rule) => excluded.contains(&rule.range),
                        Node::Comment(_) => true,
                        _ => false,
                    });
                if emptied {
                    return None;
                }

                Some(render_without(self.source, range.clone(), &excluded))
            }
            other => Some(self.source[other.range()].to_string()),
        }
    }

    /// Apply export rules found anywhere inside at-rule blocks.
    fn collect(&mut self, nodes: &[Node], excluded: &mut Vec<Range<usize>>) {
        for node in nodes {
            match node {
                Node::Rule(rule) => {
                    if let Some(selector) = match_export_selector(&rule.selector) {
                        self.apply(rule, &selector);
                        excluded.push(rule.range.clone());
                    }
                }
                Node::AtRule(AtRule {
                    block: Some(block), ..
                }) => self.collect(&block.nodes, excluded),
                _ => {}
            }
        }
    }

    fn apply(&mut self, rule: &Rule, selector: &ExportSelector<'_>) {
        self.export_rules += 1;

        if !self.check(rule, selector) {
            debug!(selector = %rule.selector, "dropping export rule with invalid path");
            return;
        }

        let transformer = self.transformer;
        let segments: Vec<String> = selector
            .segments
            .iter()
            .map(|segment| rename(transformer, segment))
            .filter(|segment| !segment.is_empty())
            .collect();
        let values: Vec<(String, String)> = rule
            .block
            .declarations
            .iter()
            .map(|d| (rename(transformer, &d.property), d.value.clone()))
            .filter(|(name, _)| !name.is_empty())
            .collect();

        let mut replaced = Vec::new();
        let target = self.shared.drill_down(&segments, &mut replaced);
        for (name, value) in values {
            target.insert(name, value);
        }

        let selector_span = Span::from_offsets(
            self.source,
            rule.selector_offset,
            rule.selector_offset + rule.selector.len(),
        );
        for index in replaced {
            self.diagnostics.push(
                Diagnostic::warning(
                    codes::PATH_COLLISION,
                    format!(
                        "`{}` was a value and is now replaced by an object",
                        segments[..=index].join(" ")
                    ),
                )
                .with_span(selector_span),
            );
        }

        if rule.block.has_nested_rules() {
            self.diagnostics.push(
                Diagnostic::warning(codes::NESTED_RULE, "nested rules inside an export rule are ignored")
                    .with_help("Use a separate export rule with a longer path instead")
                    .with_span(selector_span),
            );
        }
    }

    /// Report path issues; returns false when the rule must be dropped.
    fn check(&mut self, rule: &Rule, selector: &ExportSelector<'_>) -> bool {
        let path_offset = rule.selector_offset + selector.marker.len();
        let mut accepted = true;

        for issue in check_export_path(selector.path) {
            let span = Span::char_at(self.source, path_offset + issue.offset);
            match issue.kind {
                PathIssueKind::Forbidden => {
                    accepted = false;
                    self.diagnostics.push(
                        Diagnostic::error(
                            codes::FORBIDDEN_CHARACTER,
                            format!("export path contains forbidden character `{}`", issue.character),
                        )
                        .with_help(format!(
                            "Property names may not contain any of {}",
                            describe_characters(FORBIDDEN_CHARACTERS)
                        ))
                        .with_span(span),
                    );
                }
                PathIssueKind::Discouraged if self.transformer.is_none() => {
                    self.diagnostics.push(
                        Diagnostic::warning(
                            codes::DISCOURAGED_CHARACTER,
                            format!("export path contains `{}`", issue.character),
                        )
                        .with_help("Use camelCase names or configure a property name transformer")
                        .with_span(span),
                    );
                }
                PathIssueKind::Discouraged => {}
            }
        }

        accepted
    }
}

/// Copy `range` of `source`, leaving out the `excluded` sub-ranges.
fn render_without(source: &str, range: Range<usize>, excluded: &[Range<usize>]) -> String {
    let mut out = String::with_capacity(range.len());
    let mut cursor = range.start;
    for cut in excluded {
        out.push_str(&source[cursor..cut.start]);
        cursor = cut.end;
    }
    out.push_str(&source[cursor..range.end]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casing::kebab_to_lower_camel;
    use crate::types::SharedValue;
    use crate::validation::Severity;
    use pretty_assertions::assert_eq;

    fn leaf<'a>(data: &'a SharedData, path: &[&str]) -> Option<&'a str> {
        data.get_path(path).and_then(SharedValue::as_str)
    }

    #[test]
    fn test_plain_css_passes_through() {
        let source = ".a { color: red; }\n@import \"b.css\";\n/* c */\n.d:hover { margin: 0 }";
        let extraction = extract_shared_data(source, None);

        assert!(extraction.result.shared_data.is_empty());
        assert!(extraction.diagnostics.is_ok());
        assert_eq!(
            extraction.result.passthrough_code,
            ".a { color: red; }\n@import \"b.css\";\n/* c */\n.d:hover { margin: 0 }"
        );
    }

    #[test]
    fn test_root_export() {
        let extraction = extract_shared_data(":export { colorPrimary: #fff; }\n.a { color: red }", None);
        let result = extraction.result;

        assert_eq!(result.shared_data.to_json(), r##"{"colorPrimary":"#fff"}"##);
        assert_eq!(result.passthrough_code, ".a { color: red }");
    }

    #[test]
    fn test_nested_paths_accumulate() {
        let source = ":export nav { bgColor: #000; } :export nav menuItem { color: #111; }";
        let result = extract_shared_data(source, None).result;

        assert_eq!(
            result.shared_data.to_json(),
            r##"{"nav":{"bgColor":"#000","menuItem":{"color":"#111"}}}"##
        );
        assert_eq!(result.passthrough_code, "");
    }

    #[test]
    fn test_share_marker_and_last_write_wins() {
        let source = ":share theme { a: 1; a: 2 }\n:export theme { a: 3 }";
        let result = extract_shared_data(source, None).result;

        assert_eq!(leaf(&result.shared_data, &["theme", "a"]), Some("3"));
    }

    #[test]
    fn test_forbidden_character_drops_rule() {
        let source = ":export .nav { color: red; }\n:export ok { a: b }";
        let extraction = extract_shared_data(source, None);

        assert_eq!(extraction.diagnostics.error_count(), 1);
        let error = extraction.diagnostics.iter().next().unwrap();
        assert_eq!(error.severity, Severity::Error);
        assert_eq!(error.code, codes::FORBIDDEN_CHARACTER);
        assert_eq!(error.span.unwrap().start.offset, 8);
        assert_eq!(&source[error.span.unwrap().range()], ".");

        assert_eq!(extraction.result.shared_data.to_json(), r#"{"ok":{"a":"b"}}"#);
        assert!(!extraction.result.passthrough_code.contains(".nav"));
    }

    #[test]
    fn test_error_offset_is_absolute() {
        let source = ".a {}\n\n  :export nav>item { a: b }";
        let extraction = extract_shared_data(source, None);
        let span = extraction.diagnostics.iter().next().unwrap().span.unwrap();

        assert_eq!(&source[span.range()], ">");
        assert_eq!(span.start.line, 3);
        assert_eq!(span.start.column, 14);
    }

    #[test]
    fn test_hyphen_warns_without_transformer() {
        let extraction = extract_shared_data(":export nav-bar { bg-color: red }", None);

        assert_eq!(extraction.diagnostics.warning_count(), 1);
        assert!(!extraction.diagnostics.has_errors());
        assert_eq!(leaf(&extraction.result.shared_data, &["nav-bar", "bg-color"]), Some("red"));
    }

    #[test]
    fn test_transformer_renames_and_silences_warnings() {
        let transform = |name: &str| kebab_to_lower_camel(name);
        let extraction =
            extract_shared_data(":export nav-bar { bg-color: red }", Some(&transform));

        assert!(extraction.diagnostics.is_ok());
        assert_eq!(leaf(&extraction.result.shared_data, &["navBar", "bgColor"]), Some("red"));
    }

    #[test]
    fn test_export_rules_inside_media() {
        let source = "@media (min-width: 1px) {\n  .a { color: red }\n  :export { wide: 1px }\n}\n@media print { :export { printing: yes } }";
        let result = extract_shared_data(source, None).result;

        assert_eq!(leaf(&result.shared_data, &["wide"]), Some("1px"));
        assert_eq!(leaf(&result.shared_data, &["printing"]), Some("yes"));
        assert_eq!(
            result.passthrough_code,
            "@media (min-width: 1px) {\n  .a { color: red }\n  \n}"
        );
    }

    #[test]
    fn test_path_collision_warns() {
        let source = ":export { nav: red }\n:export nav { color: blue }";
        let extraction = extract_shared_data(source, None);

        assert_eq!(extraction.diagnostics.warning_count(), 1);
        assert_eq!(
            extraction.diagnostics.iter().next().unwrap().code,
            codes::PATH_COLLISION
        );
        assert_eq!(leaf(&extraction.result.shared_data, &["nav", "color"]), Some("blue"));
    }

    #[test]
    fn test_nested_rule_in_export_warns() {
        let extraction = extract_shared_data(":export { a: b; .x { c: d } }", None);

        assert_eq!(extraction.diagnostics.warning_count(), 1);
        assert_eq!(extraction.result.shared_data.to_json(), r#"{"a":"b"}"#);
    }

    #[test]
    fn test_important_is_not_part_of_value() {
        let result = extract_shared_data(":export { size: 12px !important }", None).result;
        assert_eq!(leaf(&result.shared_data, &["size"]), Some("12px"));
    }

    #[test]
    fn test_unclosed_block_warns() {
        let extraction = extract_shared_data(":export { a: b", None);

        assert_eq!(extraction.diagnostics.warning_count(), 1);
        assert_eq!(leaf(&extraction.result.shared_data, &["a"]), Some("b"));
    }
}
