//! Per-plugin options.

use std::fmt;
use std::sync::Arc;

use crate::codegen::is_valid_identifier;
use crate::error::{CssExportError, Result};
use crate::types::SharedData;

/// Default binding name of the shared data in merge mode.
pub const DEFAULT_SHARED_EXPORT_NAME: &str = "sharedData";

/// Renames export path segments and property names.
pub type Transformer = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Extra in-scope test on request ids.
pub type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Options of one plugin instance. Immutable once built.
#[derive(Clone)]
pub struct ModuleOptions {
    is_global_module: bool,
    enable_merge_exports: bool,
    shared_export_name: String,
    property_name_transformer: Option<Transformer>,
    additional_data: SharedData,
    should_transform: Option<Predicate>,
}

impl ModuleOptions {
    pub fn builder() -> ModuleOptionsBuilder {
        ModuleOptionsBuilder::default()
    }

    /// Apply class-map policies to every stylesheet, not only `.module.` ones.
    pub fn is_global_module(&self) -> bool {
        self.is_global_module
    }

    /// Merge into the class-map default export instead of replacing it.
    pub fn enable_merge_exports(&self) -> bool {
        self.enable_merge_exports
    }

    pub fn shared_export_name(&self) -> &str {
        &self.shared_export_name
    }

    pub fn property_name_transformer(&self) -> Option<&Transformer> {
        self.property_name_transformer.as_ref()
    }

    /// Data merged over every file's own shared data.
    pub fn additional_data(&self) -> &SharedData {
        &self.additional_data
    }

    /// Whether the caller-supplied predicate accepts `id`.
    pub fn should_transform(&self, id: &str) -> bool {
        self.should_transform
            .as_ref()
            .is_some_and(|predicate| predicate(id))
    }
}

impl Default for ModuleOptions {
    fn default() -> Self {
        Self {
            is_global_module: false,
            enable_merge_exports: false,
            shared_export_name: DEFAULT_SHARED_EXPORT_NAME.to_string(),
            property_name_transformer: None,
            additional_data: SharedData::new(),
            should_transform: None,
        }
    }
}

impl fmt::Debug for ModuleOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleOptions")
            .field("is_global_module", &self.is_global_module)
            .field("enable_merge_exports", &self.enable_merge_exports)
            .field("shared_export_name", &self.shared_export_name)
            .field(
                "property_name_transformer",
                &self.property_name_transformer.is_some(),
            )
            .field("additional_data", &self.additional_data)
            .field("should_transform", &self.should_transform.is_some())
            .finish()
    }
}

/// Builder for `ModuleOptions`.
#[derive(Default)]
pub struct ModuleOptionsBuilder {
    options: ModuleOptions,
}

impl ModuleOptionsBuilder {
    pub fn global_module(mut self, enabled: bool) -> Self {
        self.options.is_global_module = enabled;
        self
    }

    pub fn merge_exports(mut self, enabled: bool) -> Self {
        self.options.enable_merge_exports = enabled;
        self
    }

    pub fn shared_export_name(mut self, name: impl Into<String>) -> Self {
        self.options.shared_export_name = name.into();
        self
    }

    pub fn property_name_transformer(
        mut self,
        transformer: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.options.property_name_transformer = Some(Arc::new(transformer));
        self
    }

    pub fn additional_data(mut self, data: SharedData) -> Self {
        self.options.additional_data = data;
        self
    }

    pub fn should_transform(
        mut self,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.options.should_transform = Some(Arc::new(predicate));
        self
    }

    /// Finish, rejecting a shared export name that cannot be a binding.
    pub fn build(self) -> Result<ModuleOptions> {
        let name = &self.options.shared_export_name;
        if !is_valid_identifier(name) {
            return Err(CssExportError::Config {
                message: format!("`{}` is not a valid shared export name", name),
                help: Some("Use a JavaScript identifier such as `sharedData`".to_string()),
            });
        }
        Ok(self.options)
    }
}
