//! Module request identifiers.
//!
//! A request id is a file path optionally followed by a `?query`. The query
//! carries the markers this crate reacts to:
//!
//! - `export` - the stylesheet's shared data should be exported
//! - `inline` - the caller wants module text only, no separate CSS asset
//!
//! ```text
//! src/theme.module.scss?export&inline
//! ```

/// Stylesheet extensions handled by the pipeline.
pub const STYLESHEET_EXTENSIONS: &[&str] = &[
    "css", "less", "sass", "scss", "styl", "stylus", "pcss", "postcss",
];

/// Prefix of the synthetic ids that carry passthrough CSS.
pub const VIRTUAL_PREFIX: &str = "virtual:css-export/";

/// Query parameter requesting shared-data exports.
pub const EXPORT_PARAM: &str = "export";

/// Query parameter requesting inline module text.
pub const INLINE_PARAM: &str = "inline";

/// A parsed view over a module request id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleRequest<'a> {
    id: &'a str,
    path: &'a str,
    query: Option<&'a str>,
}

impl<'a> ModuleRequest<'a> {
    pub fn parse(id: &'a str) -> Self {
        match id.split_once('?') {
            Some((path, query)) => Self {
                id,
                path,
                query: Some(query),
            },
            None => Self {
                id,
                path: id,
                query: None,
            },
        }
    }

    /// The full request id, query included.
    pub fn id(&self) -> &'a str {
        self.id
    }

    /// The id without its query.
    pub fn path(&self) -> &'a str {
        self.path
    }

    pub fn query(&self) -> Option<&'a str> {
        self.query
    }

    /// File name component of the path.
    pub fn file_name(&self) -> &'a str {
        self.path.rsplit(['/', '\\']).next().unwrap_or(self.path)
    }

    /// Extension of the file name, without the dot.
    pub fn extension(&self) -> Option<&'a str> {
        let name = self.file_name();
        let dot = name.rfind('.')?;
        if dot == 0 {
            return None;
        }
        Some(&name[dot + 1..])
    }

    /// Whether the path has a stylesheet extension.
    pub fn is_stylesheet(&self) -> bool {
        self.extension()
            .map(|ext| STYLESHEET_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }

    /// Whether the query contains the parameter `name` (with or without a value).
    pub fn has_param(&self, name: &str) -> bool {
        self.query
            .map(|query| {
                query
                    .split('&')
                    .any(|param| param.split('=').next() == Some(name))
            })
            .unwrap_or(false)
    }

    pub fn has_export_marker(&self) -> bool {
        self.has_param(EXPORT_PARAM)
    }

    pub fn is_inline(&self) -> bool {
        self.has_param(INLINE_PARAM)
    }

    /// Whether the file follows the `.module.<ext>` class-map convention.
    pub fn is_class_map(&self) -> bool {
        if !self.is_stylesheet() {
            return false;
        }
        let name = self.file_name();
        match name.rfind('.') {
            Some(dot) => name[..dot].ends_with(".module"),
            None => false,
        }
    }

    /// Whether this id names a passthrough CSS virtual module.
    pub fn is_virtual(&self) -> bool {
        self.id.starts_with(VIRTUAL_PREFIX)
    }

    /// Synthetic id under which this file's passthrough CSS is registered.
    ///
    /// Derived only from the path, so every query variant of the same file
    /// maps to the same virtual module.
    pub fn virtual_id(&self) -> String {
        format!("{}{}.css", VIRTUAL_PREFIX, self.path.trim_start_matches('/'))
    }
}
