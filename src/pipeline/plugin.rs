//! The css-export plugin: request scoping, the two transform phases and the
//! virtual CSS modules.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::codegen::esm::string_literal;
use crate::codegen::{synthesize, MergePolicy};
use crate::error::{CssExportError, Result};
use crate::parser::{extract_shared_data, Extraction};
use crate::types::ModuleRequest;

use super::context::BuildContext;
use super::downstream::DOWNSTREAM_STAGE;
use super::options::ModuleOptions;
use super::stage::{Pipeline, Stage, TransformContext};

/// Stylesheet export plugin.
///
/// Phase one (`extract`) runs before the downstream stylesheet compiler and
/// hands it only the ordinary CSS; phase two (`finalize`) runs on the
/// compiler's module output and adds the exports.
#[derive(Debug)]
pub struct CssExportPlugin {
    options: ModuleOptions,
    context: Arc<BuildContext>,
    downstream_stage: String,
}

impl CssExportPlugin {
    /// Name of the extraction stage inserted into a pipeline.
    pub const NAME: &'static str = "css-export";

    pub fn new(options: ModuleOptions) -> Self {
        Self::with_context(options, Arc::new(BuildContext::new()))
    }

    /// Use an existing build context, e.g. one shared with the host.
    pub fn with_context(options: ModuleOptions, context: Arc<BuildContext>) -> Self {
        Self {
            options,
            context,
            downstream_stage: DOWNSTREAM_STAGE.to_string(),
        }
    }

    /// Compose with a downstream stage of another name.
    pub fn with_downstream_stage(mut self, name: impl Into<String>) -> Self {
        self.downstream_stage = name.into();
        self
    }

    pub fn options(&self) -> &ModuleOptions {
        &self.options
    }

    pub fn context(&self) -> &Arc<BuildContext> {
        &self.context
    }

    /// Whether phase one should handle `id`.
    pub fn is_in_scope(&self, id: &str) -> bool {
        let request = ModuleRequest::parse(id);
        request.is_stylesheet()
            && !request.is_virtual()
            && (request.has_export_marker() || self.options.should_transform(id))
    }

    pub fn build_start(&self) {
        self.context.begin_build();
    }

    /// Claim `id` if it is a registered virtual CSS module.
    pub fn resolve_id(&self, id: &str) -> Option<String> {
        self.context.has_virtual_css(id).then(|| id.to_string())
    }

    /// CSS of a registered virtual module.
    pub fn load(&self, id: &str) -> Option<String> {
        self.context.virtual_css(id)
    }

    /// Phase one: split shared data from CSS and cache it for `finalize`.
    ///
    /// Returns `None` for requests out of scope. The returned result carries
    /// the CSS to hand to the downstream compiler.
    pub fn extract(&self, id: &str, css: &str) -> Option<Extraction> {
        if !self.is_in_scope(id) {
            return None;
        }

        let transformer = self.options.property_name_transformer().map(|t| t.as_ref());
        let mut extraction = extract_shared_data(css, transformer);
        extraction
            .result
            .shared_data
            .merge(self.options.additional_data());

        let request = ModuleRequest::parse(id);
        if !request.is_inline() {
            self.context
                .register_virtual_css(request.virtual_id(), extraction.result.passthrough_code.clone());
        }

        debug!(
            id,
            keys = extraction.result.shared_data.len(),
            errors = extraction.diagnostics.error_count(),
            "cached shared data"
        );
        self.context.store_result(id, extraction.result.clone());
        Some(extraction)
    }

    /// Phase two: merge the cached shared data into the compiled module.
    ///
    /// Without a cached result the module is returned unchanged.
    pub fn finalize(&self, id: &str, module_code: &str) -> Result<String> {
        let Some(result) = self.context.take_result(id) else {
            debug!(id, "no cached shared data, module left unchanged");
            return Ok(module_code.to_string());
        };

        let request = ModuleRequest::parse(id);
        let inline = request.is_inline();
        let policy = MergePolicy::select(
            request.is_class_map(),
            self.options.is_global_module(),
            self.options.enable_merge_exports(),
        );
        debug!(id, %policy, "synthesizing exports");

        let code = synthesize(
            &result.shared_data,
            module_code,
            policy,
            inline,
            self.options.shared_export_name(),
        )?;

        if inline {
            return Ok(code);
        }
        Ok(format!(
            "import {};\n{}",
            string_literal(&request.virtual_id()),
            code
        ))
    }

    /// Compose the plugin around its downstream stage in `pipeline`.
    ///
    /// The extraction stage is inserted right before the downstream stage,
    /// which is then wrapped so synthesis runs on its output. Installing
    /// twice is a no-op.
    pub fn install(self: &Arc<Self>, pipeline: &mut Pipeline) -> Result<()> {
        if pipeline.position(Self::NAME).is_some() {
            return Ok(());
        }

        let Some(index) = pipeline.position(&self.downstream_stage) else {
            warn!(
                stage = %self.downstream_stage,
                "downstream stage not found, css exports are disabled"
            );
            return Err(CssExportError::StageNotFound {
                stage: self.downstream_stage.clone(),
            });
        };

        pipeline.insert(
            index,
            Box::new(ExtractStage {
                plugin: Arc::clone(self),
            }),
        );
        pipeline.wrap(&self.downstream_stage, |inner| {
            Box::new(SynthesizeStage {
                plugin: Arc::clone(self),
                inner,
            })
        });
        Ok(())
    }
}

struct ExtractStage {
    plugin: Arc<CssExportPlugin>,
}

impl Stage for ExtractStage {
    fn name(&self) -> &str {
        CssExportPlugin::NAME
    }

    fn transform(&self, ctx: &mut TransformContext<'_>, code: &str) -> Result<Option<String>> {
        Ok(self.plugin.extract(ctx.request.id(), code).map(|extraction| {
            ctx.diagnostics.merge(extraction.diagnostics);
            extraction.result.passthrough_code
        }))
    }
}

/// The downstream stage with synthesis applied to its output.
struct SynthesizeStage {
    plugin: Arc<CssExportPlugin>,
    inner: Box<dyn Stage>,
}

impl Stage for SynthesizeStage {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn transform(&self, ctx: &mut TransformContext<'_>, code: &str) -> Result<Option<String>> {
        let compiled = self.inner.transform(ctx, code)?;
        let id = ctx.request.id();
        if !self.plugin.context.has_result(id) {
            return Ok(compiled);
        }

        let module_code = compiled.as_deref().unwrap_or(code);
        self.plugin.finalize(id, module_code).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::CssModuleStage;
    use crate::types::SharedData;
    use pretty_assertions::assert_eq;

    fn plugin(options: ModuleOptions) -> CssExportPlugin {
        CssExportPlugin::new(options)
    }

    #[test]
    fn test_scope() {
        let plugin = plugin(
            ModuleOptions::builder()
                .should_transform(|id| id.contains("/theme/"))
                .build()
                .unwrap(),
        );

        assert!(plugin.is_in_scope("/src/a.scss?export"));
        assert!(plugin.is_in_scope("/src/a.css?inline&export"));
        assert!(plugin.is_in_scope("/src/theme/a.less"));
        assert!(!plugin.is_in_scope("/src/a.css"));
        assert!(!plugin.is_in_scope("/src/a.css?exported"));
        assert!(!plugin.is_in_scope("/src/a.ts?export"));
        assert!(!plugin.is_in_scope("virtual:css-export/theme/a.css.css?export"));
    }

    #[test]
    fn test_extract_caches_and_registers_css() {
        let plugin = plugin(ModuleOptions::default());
        let extraction = plugin
            .extract("/src/a.css?export", ":export { a: b }\n.x { color: red }")
            .unwrap();

        assert_eq!(extraction.result.passthrough_code, ".x { color: red }");
        assert!(plugin.context().has_result("/src/a.css?export"));

        let virtual_id = "virtual:css-export/src/a.css.css";
        assert_eq!(plugin.resolve_id(virtual_id).as_deref(), Some(virtual_id));
        assert_eq!(plugin.load(virtual_id).as_deref(), Some(".x { color: red }"));
        assert_eq!(plugin.resolve_id("virtual:css-export/other.css"), None);
    }

    #[test]
    fn test_inline_skips_virtual_css() {
        let plugin = plugin(ModuleOptions::default());
        plugin.extract("/src/a.css?export&inline", ":export { a: b }");

        assert!(plugin.load("virtual:css-export/src/a.css.css").is_none());
    }

    #[test]
    fn test_additional_data_wins() {
        let additional = SharedData::from_iter([
            ("a", SharedData::from_iter([("x", "extra")])),
        ]);
        let plugin = plugin(
            ModuleOptions::builder()
                .additional_data(additional)
                .build()
                .unwrap(),
        );
        let extraction = plugin
            .extract("a.css?export", ":export a { x: own; y: own }")
            .unwrap();

        assert_eq!(
            extraction.result.shared_data.to_json(),
            r#"{"a":{"x":"extra","y":"own"}}"#
        );
    }

    #[test]
    fn test_finalize_without_cache_is_noop() {
        let plugin = plugin(ModuleOptions::default());
        let code = plugin.finalize("a.css?export", "export default 1;").unwrap();
        assert_eq!(code, "export default 1;");
    }

    #[test]
    fn test_build_start_discards_results() {
        let plugin = plugin(ModuleOptions::default());
        plugin.extract("a.css?export&inline", ":export { a: b }");

        plugin.build_start();

        let code = plugin.finalize("a.css?export&inline", "export default \"\";").unwrap();
        assert_eq!(code, "export default \"\";");
    }

    #[test]
    fn test_finalize_prepends_virtual_import() {
        let plugin = plugin(ModuleOptions::default());
        plugin.extract("/a.css?export", ":export { a: b }");

        let code = plugin
            .finalize("/a.css?export", "export const __vite__css = \"\";\nexport default __vite__css;")
            .unwrap();

        assert_eq!(
            code,
            "import \"virtual:css-export/a.css.css\";\n\
             export const __vite__css = \"\";\n\
             export const a = \"b\";\n\
             export default {\n\ta\n};\n"
        );
    }

    #[test]
    fn test_install_around_downstream_stage() {
        let plugin = Arc::new(plugin(ModuleOptions::default()));
        let mut pipeline = Pipeline::new().with_stage(CssModuleStage::new());

        plugin.install(&mut pipeline).unwrap();
        plugin.install(&mut pipeline).unwrap();

        assert_eq!(pipeline.stage_names(), vec!["css-export", "css-post"]);
    }

    #[test]
    fn test_install_without_downstream_stage() {
        let plugin = Arc::new(plugin(ModuleOptions::default()));
        let mut pipeline = Pipeline::new();

        let error = plugin.install(&mut pipeline).unwrap_err();

        assert!(matches!(error, CssExportError::StageNotFound { .. }));
        assert!(pipeline.stage_names().is_empty());
    }
}
