//! Stylesheet parsing and shared-data extraction.
//!
//! Extraction runs in two steps:
//! - `stylesheet` splits the source into rules, at-rules and comments with
//!   byte ranges into the original text
//! - `extract` walks those nodes, turns export rules into a `SharedData`
//!   tree and re-emits everything else untouched
//!
//! # Usage
//!
//! ```ignore
//! use css_export::parser::extract_shared_data;
//!
//! let source = std::fs::read_to_string("theme.css")?;
//! let extraction = extract_shared_data(&source, None);
//!
//! println!("{}", extraction.result.shared_data.to_json());
//! ```

mod extract;
pub mod selector;
pub mod span;
pub mod stylesheet;

pub use extract::{extract_shared_data, Extraction, NameTransformer, ParsedResult};
pub use selector::{match_export_selector, ExportSelector, MARKERS};
pub use span::{Location, Span};
pub use stylesheet::{parse_stylesheet, AtRule, Block, Declaration, Node, Rule, Stylesheet};
