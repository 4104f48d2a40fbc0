//! Reference stylesheet-to-module compiler.
//!
//! Stands in for the host's own compiler so the pipeline can run end to end.
//! Output shapes:
//!
//! ```text
//! a.css?inline       export default "<css>";
//! a.css              export const __vite__css = "<css>";
//!                    export default __vite__css;
//! a.module.css       export const __vite__css = "<css with hashed classes>";
//!                    export const title = "title_3f9a1c";
//!                    export default { title: "title_3f9a1c" };
//! ```

use indexmap::IndexMap;

use crate::codegen::esm::string_literal;
use crate::codegen::is_valid_identifier;
use crate::error::Result;
use crate::parser::parse_stylesheet;

use super::stage::{Stage, TransformContext};

/// Name of the stage the plugin composes with.
pub const DOWNSTREAM_STAGE: &str = "css-post";

/// Binding that carries the compiled CSS.
pub const CSS_BINDING: &str = "__vite__css";

/// Compiles stylesheet text into an ES module.
#[derive(Debug, Clone, Default)]
pub struct CssModuleStage;

impl CssModuleStage {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for CssModuleStage {
    fn name(&self) -> &str {
        DOWNSTREAM_STAGE
    }

    fn transform(&self, ctx: &mut TransformContext<'_>, code: &str) -> Result<Option<String>> {
        let request = ctx.request;
        if !request.is_stylesheet() || request.is_virtual() {
            return Ok(None);
        }

        if request.is_inline() {
            return Ok(Some(format!("export default {};\n", string_literal(code))));
        }

        if !request.is_class_map() {
            return Ok(Some(format!(
                "export const {binding} = {};\nexport default {binding};\n",
                string_literal(code),
                binding = CSS_BINDING
            )));
        }

        let (css, classes) = hash_classes(code, request.path());
        let mut module = format!("export const {} = {};\n", CSS_BINDING, string_literal(&css));
        let mut rows = Vec::with_capacity(classes.len());
        for (class, hashed) in &classes {
            let value = string_literal(hashed);
            if is_valid_identifier(class) {
                module.push_str(&format!("export const {} = {};\n", class, value));
            }
            rows.push(format!("{}: {}", string_literal(class), value));
        }
        module.push_str(&format!("export default {{ {} }};\n", rows.join(", ")));

        Ok(Some(module))
    }
}

/// Rewrite every class selector of `css` to a name scoped by `path`.
///
/// Returns the rewritten CSS and the class map in order of first use.
fn hash_classes(css: &str, path: &str) -> (String, IndexMap<String, String>) {
    let sheet = parse_stylesheet(css);
    let mut classes = IndexMap::new();
    let mut edits = Vec::new();

    sheet.walk_rules(&mut |rule| {
        for (offset, class) in class_names(&rule.selector) {
            let hashed = classes
                .entry(class.to_string())
                .or_insert_with(|| format!("{}_{:06x}", class, fnv1a(path, class) & 0xff_ffff))
                .clone();
            let start = rule.selector_offset + offset;
            edits.push((start..start + class.len(), hashed));
        }
    });

    edits.sort_by_key(|(range, _)| range.start);
    let mut out = String::with_capacity(css.len());
    let mut cursor = 0;
    for (range, replacement) in edits {
        out.push_str(&css[cursor..range.start]);
        out.push_str(&replacement);
        cursor = range.end;
    }
    out.push_str(&css[cursor..]);

    (out, classes)
}

/// Class names in a selector with their byte offsets (after the dot).
fn class_names(selector: &str) -> Vec<(usize, &str)> {
    let bytes = selector.as_bytes();
    let mut names = Vec::new();
    let mut bracket = false;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'[' => bracket = true,
            b']' => bracket = false,
            b'.' if !bracket => {
                let start = i + 1;
                let end = bytes[start..]
                    .iter()
                    .position(|&b| !(b.is_ascii_alphanumeric() || b == b'_' || b == b'-'))
                    .map(|p| start + p)
                    .unwrap_or(bytes.len());
                if end > start && !bytes[start].is_ascii_digit() {
                    names.push((start, &selector[start..end]));
                }
                i = end;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    names
}

fn fnv1a(path: &str, class: &str) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in path.bytes().chain([b':']).chain(class.bytes()) {
        hash ^= u32::from(byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::Module;

    fn compile(id: &str, css: &str) -> String {
        let mut ctx = TransformContext::new(id);
        CssModuleStage::new().transform(&mut ctx, css).unwrap().unwrap()
    }

    #[test]
    fn test_inline() {
        assert_eq!(compile("a.css?inline", "a{}"), "export default \"a{}\";\n");
    }

    #[test]
    fn test_plain_stylesheet() {
        assert_eq!(
            compile("a.css", ".a { color: red }"),
            "export const __vite__css = \".a { color: red }\";\nexport default __vite__css;\n"
        );
    }

    #[test]
    fn test_class_map() {
        let code = compile("/src/a.module.css", ".title, .title:hover { }\n.nav-bar .title {}");
        let module = Module::parse(&code).unwrap();

        assert_eq!(module.exported_names(), vec!["__vite__css", "title"]);
        assert!(module.default_export().is_some());

        let hashed = format!("title_{:06x}", fnv1a("/src/a.module.css", "title") & 0xff_ffff);
        assert!(code.contains(&format!(".{hashed}, .{hashed}:hover")));
        assert!(code.contains("\"nav-bar\": "));
    }

    #[test]
    fn test_class_names() {
        let names: Vec<&str> = class_names("a.b > .c-d[data-x=\".e\"] .5x")
            .into_iter()
            .map(|(_, name)| name)
            .collect();
        assert_eq!(names, vec!["b", "c-d"]);
    }

    #[test]
    fn test_non_stylesheets_are_skipped() {
        let mut ctx = TransformContext::new("a.ts");
        assert!(CssModuleStage::new().transform(&mut ctx, "x").unwrap().is_none());
    }
}
