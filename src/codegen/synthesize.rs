//! Merging shared data into compiled stylesheet modules.

use std::fmt;

use crate::error::{CssExportError, Result};
use crate::types::SharedData;

use super::esm::{data_to_esm, named_exports};
use super::module::{ItemKind, Module};

/// Named exports with this prefix belong to the host and survive override.
pub const RESERVED_EXPORT_PREFIX: &str = "__vite__";

/// How generated exports are combined with the downstream module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Replace the default export and any clashing named exports.
    Plain,
    /// Replace every export except reserved ones.
    Override,
    /// Keep every export and add the shared data to the default object.
    Merge,
}

impl MergePolicy {
    /// Pick the policy for one request.
    pub fn select(is_class_map: bool, is_global_module: bool, enable_merge_exports: bool) -> Self {
        match (is_class_map || is_global_module, enable_merge_exports) {
            (false, _) => MergePolicy::Plain,
            (true, false) => MergePolicy::Override,
            (true, true) => MergePolicy::Merge,
        }
    }
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MergePolicy::Plain => "plain",
            MergePolicy::Override => "override",
            MergePolicy::Merge => "merge",
        };
        write!(f, "{}", name)
    }
}

/// Produce the final module text for one stylesheet.
///
/// Pure: the same inputs always produce the same text.
pub fn synthesize(
    shared: &SharedData,
    downstream: &str,
    policy: MergePolicy,
    inline: bool,
    shared_export_name: &str,
) -> Result<String> {
    let mut module = Module::parse(downstream)?;

    match policy {
        MergePolicy::Plain => {
            let fragment_names = named_exports(shared);
            module.remove_default_export();
            module.retain_named_exports(|name| !fragment_names.iter().any(|n| *n == name));
            append_fragment(module, shared, &fragment_names)
        }
        MergePolicy::Override => {
            let fragment_names = named_exports(shared);
            module.remove_default_export();
            module.retain_named_exports(|name| {
                name.starts_with(RESERVED_EXPORT_PREFIX) && !fragment_names.iter().any(|n| *n == name)
            });
            append_fragment(module, shared, &fragment_names)
        }
        MergePolicy::Merge => merge_into_default(shared, downstream, &module, inline, shared_export_name),
    }
}

/// Append the generated exports. A binding the rewrite left declared under
/// a generated name would be declared twice, so that is an error.
fn append_fragment(mut module: Module, shared: &SharedData, fragment_names: &[&str]) -> Result<String> {
    if let Some(name) = module
        .local_names()
        .into_iter()
        .find(|local| fragment_names.iter().any(|n| n == local))
    {
        return Err(CssExportError::Build {
            message: format!("compiled module still declares `{}` after its export was removed", name),
            help: Some(format!("Rename the `{}` export rule or the compiled binding", name)),
        });
    }

    module.extend(Module::parse(&data_to_esm(shared))?);
    Ok(module.to_code())
}

fn merge_into_default(
    shared: &SharedData,
    downstream: &str,
    module: &Module,
    inline: bool,
    name: &str,
) -> Result<String> {
    if module.exported_names().iter().any(|n| *n == name) {
        return Err(CssExportError::Build {
            message: format!("compiled module already exports `{}`", name),
            help: Some("Choose a different shared export name".to_string()),
        });
    }

    let declaration = format!("export const {} = {};", name, shared.to_json());

    let anchor = module.default_export().and_then(|item| match item.kind {
        ItemKind::ExportDefault {
            object_brace: Some(brace),
        } => Some((item.range.start, brace)),
        _ => None,
    });

    match anchor {
        Some((start, brace)) if !inline => Ok(format!(
            "{}{}\nexport default {{ {},{}",
            &downstream[..start],
            declaration,
            name,
            &downstream[brace + 1..]
        )),
        _ => {
            let mut code = downstream.trim_end().to_string();
            if !code.is_empty() {
                code.push('\n');
            }
            code.push_str(&declaration);
            code.push('\n');
            Ok(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn shared() -> SharedData {
        SharedData::from_iter([("x", "1")])
    }

    const CLASS_MAP: &str = "export const __vite__css = \".a_123 { color: red }\";\n\
                             export const a = \"a_123\";\n\
                             export default { a: \"a_123\" };\n";

    #[test]
    fn test_select_policy() {
        assert_eq!(MergePolicy::select(false, false, true), MergePolicy::Plain);
        assert_eq!(MergePolicy::select(true, false, false), MergePolicy::Override);
        assert_eq!(MergePolicy::select(false, true, true), MergePolicy::Merge);
    }

    #[test]
    fn test_plain() {
        let downstream = "export const __vite__css = \"body{}\";\nexport const x = 0;\nexport default __vite__css;\n";
        let code = synthesize(&shared(), downstream, MergePolicy::Plain, false, "sharedData").unwrap();

        assert_eq!(
            code,
            "export const __vite__css = \"body{}\";\n\
             export const x = \"1\";\n\
             export default {\n\tx\n};\n"
        );
    }

    #[test]
    fn test_override_keeps_reserved_exports() {
        let code = synthesize(&shared(), CLASS_MAP, MergePolicy::Override, false, "sharedData").unwrap();

        assert_eq!(
            code,
            "export const __vite__css = \".a_123 { color: red }\";\n\
             export const x = \"1\";\n\
             export default {\n\tx\n};\n"
        );
    }

    #[test]
    fn test_merge_injects_shorthand() {
        let downstream = "export default { a: \"a_123\" }";
        let code = synthesize(&shared(), downstream, MergePolicy::Merge, false, "shared").unwrap();

        assert_eq!(
            code,
            "export const shared = {\"x\":\"1\"};\nexport default { shared, a: \"a_123\" }"
        );
    }

    #[test]
    fn test_merge_keeps_named_exports() {
        let code = synthesize(&shared(), CLASS_MAP, MergePolicy::Merge, false, "sharedData").unwrap();

        assert!(code.contains("export const a = \"a_123\";"));
        assert!(code.contains("export const sharedData = {\"x\":\"1\"};\nexport default { sharedData, a: \"a_123\" };"));
    }

    #[test]
    fn test_merge_falls_back_to_named_export() {
        let inline = synthesize(&shared(), "export default \".a{}\";", MergePolicy::Merge, false, "shared").unwrap();
        assert_eq!(
            inline,
            "export default \".a{}\";\nexport const shared = {\"x\":\"1\"};\n"
        );

        let forced = synthesize(&shared(), CLASS_MAP, MergePolicy::Merge, true, "shared").unwrap();
        assert!(forced.ends_with("export default { a: \"a_123\" };\nexport const shared = {\"x\":\"1\"};\n"));
    }

    #[test]
    fn test_merge_rejects_name_clash() {
        let error = synthesize(&shared(), CLASS_MAP, MergePolicy::Merge, false, "a").unwrap_err();
        assert!(matches!(error, CssExportError::Build { .. }));
    }

    #[test]
    fn test_override_rejects_leftover_local_binding() {
        let downstream = "export const __vite__css = \"\", x = 1;\nexport default __vite__css;\n";

        let error = synthesize(&shared(), downstream, MergePolicy::Override, false, "sharedData").unwrap_err();
        assert!(matches!(error, CssExportError::Build { .. }));

        let other = SharedData::from_iter([("y", "2")]);
        let code = synthesize(&other, downstream, MergePolicy::Override, false, "sharedData").unwrap();
        assert!(code.starts_with("const __vite__css = \"\", x = 1;\nexport { __vite__css };\n"));
    }

    #[test]
    fn test_synthesis_is_repeatable() {
        for policy in [MergePolicy::Plain, MergePolicy::Override, MergePolicy::Merge] {
            let first = synthesize(&shared(), CLASS_MAP, policy, false, "sharedData").unwrap();
            let second = synthesize(&shared(), CLASS_MAP, policy, false, "sharedData").unwrap();
            assert_eq!(first, second, "{policy}");
        }
    }
}
