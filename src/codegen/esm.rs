//! Serialization of a shared-data tree into ES module text.

use crate::types::{SharedData, SharedValue};

/// Words that cannot be used as binding names.
pub const RESERVED_WORDS: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let", "new",
    "null", "package", "private", "protected", "public", "return", "static", "super", "switch",
    "this", "throw", "true", "try", "typeof", "undefined", "var", "void", "while", "with", "yield",
];

/// Whether `name` can be exported as `export const <name>`.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$');

    starts_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && !RESERVED_WORDS.contains(&name)
}

/// Top-level keys of `data` that become named exports.
pub fn named_exports(data: &SharedData) -> Vec<&str> {
    data.keys().filter(|key| is_valid_identifier(key)).collect()
}

/// Render `data` as module text.
///
/// Each top-level key that is a usable identifier gets its own
/// `export const`; the default export re-exports the whole tree, using
/// shorthand properties for those keys and inline literals for the rest.
///
/// ```text
/// export const colorPrimary = "#fff";
/// export default {
/// 	colorPrimary,
/// 	"nav-bar": {"height":"40px"}
/// };
/// ```
pub fn data_to_esm(data: &SharedData) -> String {
    let mut named = String::new();
    let mut rows = Vec::with_capacity(data.len());

    for (key, value) in data.iter() {
        if is_valid_identifier(key) {
            named.push_str(&format!("export const {} = {};\n", key, literal(value)));
            rows.push(key.to_string());
        } else {
            rows.push(format!("{}: {}", string_literal(key), literal(value)));
        }
    }

    if rows.is_empty() {
        return format!("{}export default {{}};\n", named);
    }
    format!("{}export default {{\n\t{}\n}};\n", named, rows.join(",\n\t"))
}

fn literal(value: &SharedValue) -> String {
    match value {
        SharedValue::Leaf(text) => string_literal(text),
        SharedValue::Node(node) => node.to_json(),
    }
}

/// Quote `text` as a JSON (and therefore JS) string literal.
pub fn string_literal(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_identifiers() {
        assert!(is_valid_identifier("colorPrimary"));
        assert!(is_valid_identifier("$theme_2"));
        assert!(!is_valid_identifier("nav-bar"));
        assert!(!is_valid_identifier("2col"));
        assert!(!is_valid_identifier("default"));
        assert!(!is_valid_identifier(""));
    }

    #[test]
    fn test_data_to_esm() {
        let mut data = SharedData::new();
        data.insert("colorPrimary", "#fff");
        data.insert("nav-bar", SharedData::from_iter([("height", "40px")]));
        data.insert("quote", "\"a\"");

        assert_eq!(
            data_to_esm(&data),
            "export const colorPrimary = \"#fff\";\n\
             export const quote = \"\\\"a\\\"\";\n\
             export default {\n\
             \tcolorPrimary,\n\
             \t\"nav-bar\": {\"height\":\"40px\"},\n\
             \tquote\n\
             };\n"
        );
    }

    #[test]
    fn test_empty_data() {
        assert_eq!(data_to_esm(&SharedData::new()), "export default {};\n");
    }

    #[test]
    fn test_named_exports() {
        let data = SharedData::from_iter([("a", "1"), ("b-c", "2"), ("class", "3")]);
        assert_eq!(named_exports(&data), vec!["a"]);
    }
}
