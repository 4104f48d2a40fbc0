//! Top-level statement view of a compiled ES module.
//!
//! The downstream compiler hands over plain module text. Rewriting it only
//! ever touches whole top-level statements (drop the default export, drop or
//! narrow named exports, append a fragment), so the text is split into
//! statements rather than parsed into a full syntax tree. The splitter knows
//! enough JavaScript lexical structure to not be fooled by delimiters inside
//! strings, template literals, comments and regular expression literals.

use std::ops::Range;

use crate::error::{CssExportError, Result};
use crate::parser::span::offset_to_location;

/// Keywords that start a new statement when they begin a line and the
/// previous line looks complete.
const STATEMENT_KEYWORDS: &[&str] = &[
    "import", "export", "const", "let", "var", "function", "class", "async",
];

/// Keywords after which a `/` starts a regular expression.
const REGEX_PRECEDING_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case", "do",
    "else", "yield", "await",
];

/// One specifier of an `export { ... }` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSpecifier {
    pub local: String,
    pub exported: String,
}

impl ExportSpecifier {
    fn render(&self) -> String {
        if self.local == self.exported {
            self.local.clone()
        } else {
            format!("{} as {}", self.local, self.exported)
        }
    }
}

/// Classification of a top-level statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    Import,
    /// `export const|let|var|function|class ...`
    ExportDeclaration { names: Vec<String> },
    /// `export { a, b as c }`, optionally `from "source"`.
    ExportList {
        specifiers: Vec<ExportSpecifier>,
        source: Option<String>,
    },
    /// `export * from "source"` or `export * as name from "source"`.
    ExportAll { alias: Option<String> },
    /// A declaration that lost its `export` keyword to a rewrite.
    LocalDeclaration { names: Vec<String> },
    /// `export default <expr>`. `object_brace` is the byte offset of the
    /// opening brace when the expression is an object literal.
    ExportDefault { object_brace: Option<usize> },
    Comment,
    Statement,
}

/// A top-level statement and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleItem {
    pub text: String,
    /// Range in the text the module was parsed from. Items created by a
    /// rewrite keep the range of the statement they replace.
    pub range: Range<usize>,
    pub kind: ItemKind,
}

/// An ES module as an ordered list of top-level statements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Module {
    items: Vec<ModuleItem>,
}

impl Module {
    /// Split module text into classified top-level statements.
    pub fn parse(source: &str) -> Result<Self> {
        let items = split_statements(source)?
            .into_iter()
            .map(|(range, comment)| {
                let text = source[range.clone()].to_string();
                let kind = if comment {
                    ItemKind::Comment
                } else {
                    classify(&text, range.start)
                };
                ModuleItem { text, range, kind }
            })
            .collect();

        Ok(Self { items })
    }

    pub fn items(&self) -> &[ModuleItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every name exported by the module, except `default`.
    ///
    /// `export *` without an alias contributes nothing: its names are not
    /// known without resolving the source.
    pub fn exported_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for item in &self.items {
            match &item.kind {
                ItemKind::ExportDeclaration { names: declared } => {
                    names.extend(declared.iter().map(String::as_str));
                }
                ItemKind::ExportList { specifiers, .. } => names.extend(
                    specifiers
                        .iter()
                        .map(|s| s.exported.as_str())
                        .filter(|name| *name != "default"),
                ),
                ItemKind::ExportAll { alias: Some(alias) } => names.push(alias.as_str()),
                _ => {}
            }
        }
        names
    }

    /// Bindings of declarations demoted by `retain_named_exports`.
    pub fn local_names(&self) -> Vec<&str> {
        self.items
            .iter()
            .filter_map(|item| match &item.kind {
                ItemKind::LocalDeclaration { names } => Some(names),
                _ => None,
            })
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// The `export default` statement, if it is a statement of its own.
    pub fn default_export(&self) -> Option<&ModuleItem> {
        self.items
            .iter()
            .find(|item| matches!(item.kind, ItemKind::ExportDefault { .. }))
    }

    /// Whether anything is exported as `default`, by statement or specifier.
    pub fn has_default_export(&self) -> bool {
        self.items.iter().any(|item| match &item.kind {
            ItemKind::ExportDefault { .. } => true,
            ItemKind::ExportList { specifiers, .. } => {
                specifiers.iter().any(|s| s.exported == "default")
            }
            _ => false,
        })
    }

    /// Remove the default export, including `x as default` specifiers.
    pub fn remove_default_export(&mut self) {
        self.items
            .retain(|item| !matches!(item.kind, ItemKind::ExportDefault { .. }));
        self.retain_specifiers(|name| name != "default");
    }

    /// Keep only the named exports for which `keep(name)` holds.
    ///
    /// `export *` without an alias is tested as the name `*`. Declarations
    /// that export several names of which only some are kept lose their
    /// `export` keyword and the kept names are re-exported with a list.
    pub fn retain_named_exports(&mut self, keep: impl Fn(&str) -> bool) {
        let mut retained = Vec::with_capacity(self.items.len());

        for mut item in std::mem::take(&mut self.items) {
            match &item.kind {
                ItemKind::ExportDeclaration { names } => {
                    let kept: Vec<String> = names.iter().filter(|n| keep(n)).cloned().collect();
                    if kept.len() == names.len() {
                        retained.push(item);
                    } else if !kept.is_empty() {
                        let range = item.range.clone();
                        item.text = strip_export_keyword(&item.text).to_string();
                        item.kind = ItemKind::LocalDeclaration { names: names.clone() };
                        retained.push(item);
                        retained.push(export_list_item(
                            kept.into_iter()
                                .map(|name| ExportSpecifier {
                                    local: name.clone(),
                                    exported: name,
                                })
                                .collect(),
                            None,
                            range,
                        ));
                    }
                }
                ItemKind::ExportAll { alias } => {
                    if keep(alias.as_deref().unwrap_or("*")) {
                        retained.push(item);
                    }
                }
                _ => retained.push(item),
            }
        }

        self.items = retained;
        self.retain_specifiers(|name| name == "default" || keep(name));
    }

    /// Append the statements of `other`.
    pub fn extend(&mut self, other: Module) {
        self.items.extend(other.items);
    }

    /// Serialize back to module text, one statement per line group.
    pub fn to_code(&self) -> String {
        let mut code = self
            .items
            .iter()
            .map(|item| item.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        if !code.is_empty() {
            code.push('\n');
        }
        code
    }

    fn retain_specifiers(&mut self, keep: impl Fn(&str) -> bool) {
        self.items.retain_mut(|item| {
            let ItemKind::ExportList { specifiers, source } = &mut item.kind else {
                return true;
            };
            let before = specifiers.len();
            specifiers.retain(|s| keep(&s.exported));
            if specifiers.len() == before {
                return true;
            }
            if specifiers.is_empty() {
                return false;
            }
            item.text = render_export_list(specifiers, source.as_deref());
            true
        });
    }
}

fn export_list_item(
    specifiers: Vec<ExportSpecifier>,
    source: Option<String>,
    range: Range<usize>,
) -> ModuleItem {
    ModuleItem {
        text: render_export_list(&specifiers, source.as_deref()),
        range,
        kind: ItemKind::ExportList { specifiers, source },
    }
}

fn render_export_list(specifiers: &[ExportSpecifier], source: Option<&str>) -> String {
    let list: Vec<String> = specifiers.iter().map(ExportSpecifier::render).collect();
    match source {
        Some(source) => format!("export {{ {} }} from {};", list.join(", "), source),
        None => format!("export {{ {} }};", list.join(", ")),
    }
}

fn strip_export_keyword(text: &str) -> &str {
    strip_keyword(text, "export").map(str::trim_start).unwrap_or(text)
}

// --- classification ---------------------------------------------------------

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Strip a leading keyword that is not followed by an identifier character.
fn strip_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(keyword)?;
    match rest.bytes().next() {
        Some(b) if is_ident_byte(b) => None,
        _ => Some(rest),
    }
}

/// Leading identifier of `text`.
fn identifier(text: &str) -> Option<&str> {
    let end = text
        .bytes()
        .position(|b| !is_ident_byte(b))
        .unwrap_or(text.len());
    (end > 0).then(|| &text[..end])
}

fn classify(text: &str, offset: usize) -> ItemKind {
    if let Some(rest) = strip_keyword(text, "import") {
        // `import(...)` and `import.meta` are expressions.
        return match rest.trim_start().bytes().next() {
            Some(b'(') | Some(b'.') => ItemKind::Statement,
            _ => ItemKind::Import,
        };
    }

    let Some(rest) = strip_keyword(text, "export") else {
        return ItemKind::Statement;
    };
    let rest = rest.trim_start();
    let rest_offset = offset + (text.len() - rest.len());

    if let Some(expr) = strip_keyword(rest, "default") {
        let trimmed = expr.trim_start();
        let object_brace = trimmed
            .starts_with('{')
            .then(|| rest_offset + (rest.len() - trimmed.len()));
        return ItemKind::ExportDefault { object_brace };
    }

    if let Some(after_star) = rest.strip_prefix('*') {
        let alias = strip_keyword(after_star.trim_start(), "as")
            .and_then(|name| identifier(name.trim_start()))
            .map(str::to_string);
        return ItemKind::ExportAll { alias };
    }

    if let Some(list) = rest.strip_prefix('{') {
        return parse_export_list(list);
    }

    ItemKind::ExportDeclaration {
        names: declaration_names(rest),
    }
}

/// Parse what follows the `{` of an export list.
fn parse_export_list(list: &str) -> ItemKind {
    let (inner, tail) = match list.find('}') {
        Some(close) => (&list[..close], &list[close + 1..]),
        None => (list, ""),
    };

    let specifiers = inner
        .split(',')
        .map(str::trim)
        .filter(|spec| !spec.is_empty())
        .map(|spec| match spec.split_once(" as ") {
            Some((local, exported)) => ExportSpecifier {
                local: local.trim().to_string(),
                exported: exported.trim().to_string(),
            },
            None => ExportSpecifier {
                local: spec.to_string(),
                exported: spec.to_string(),
            },
        })
        .collect();

    let source = strip_keyword(tail.trim_start(), "from").map(|source| {
        source
            .trim()
            .trim_end_matches(';')
            .trim_end()
            .to_string()
    });

    ItemKind::ExportList { specifiers, source }
}

/// Names bound by an exported declaration.
fn declaration_names(declaration: &str) -> Vec<String> {
    let declaration = strip_keyword(declaration, "async")
        .map(str::trim_start)
        .unwrap_or(declaration);

    if let Some(rest) = strip_keyword(declaration, "function") {
        let rest = rest.trim_start().trim_start_matches('*').trim_start();
        return identifier(rest).map(str::to_string).into_iter().collect();
    }
    if let Some(rest) = strip_keyword(declaration, "class") {
        return identifier(rest.trim_start())
            .map(str::to_string)
            .into_iter()
            .collect();
    }

    let body = ["const", "let", "var"]
        .iter()
        .find_map(|keyword| strip_keyword(declaration, keyword));
    let Some(body) = body else {
        return Vec::new();
    };
    let body = body.trim().trim_end_matches(';');

    let mut names = Vec::new();
    for declarator in split_top_level(body, b',') {
        let target = split_top_level(declarator, b'=')
            .into_iter()
            .next()
            .unwrap_or("")
            .trim();
        binding_names(target, &mut names);
    }
    names
}

/// Collect the names bound by a binding target, destructuring included.
fn binding_names(target: &str, names: &mut Vec<String>) {
    let target = target.trim().trim_start_matches("...");
    let pattern = target
        .strip_prefix('{')
        .and_then(|t| t.strip_suffix('}'))
        .map(|inner| (inner, true))
        .or_else(|| {
            target
                .strip_prefix('[')
                .and_then(|t| t.strip_suffix(']'))
                .map(|inner| (inner, false))
        });

    let Some((inner, is_object)) = pattern else {
        if let Some(name) = identifier(target) {
            names.push(name.to_string());
        }
        return;
    };

    for element in split_top_level(inner, b',') {
        let element = split_top_level(element, b'=')
            .into_iter()
            .next()
            .unwrap_or("");
        let element = if is_object {
            split_top_level(element, b':')
                .into_iter()
                .last()
                .unwrap_or(element)
        } else {
            element
        };
        binding_names(element, names);
    }
}

/// Split `text` at every `separator` outside brackets, strings and
/// template literals. `=` inside `==`, `=>`, `<=` and friends never splits.
fn split_top_level(text: &str, separator: u8) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_quoted(bytes, i).unwrap_or(bytes.len());
                continue;
            }
            b'`' => {
                i = skip_template(bytes, i).unwrap_or(bytes.len());
                continue;
            }
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b if b == separator && depth == 0 => {
                let compound = separator == b'='
                    && (matches!(bytes.get(i + 1), Some(b'=') | Some(b'>'))
                        || (i > 0 && matches!(bytes[i - 1], b'=' | b'!' | b'<' | b'>')));
                if !compound {
                    parts.push(&text[start..i]);
                    start = i + 1;
                }
            }
            _ => {}
        }
        i += 1;
    }

    parts.push(&text[start..]);
    parts
}

// --- statement splitting ----------------------------------------------------

fn parse_error(source: &str, offset: usize, message: &str) -> CssExportError {
    let location = offset_to_location(source, offset);
    CssExportError::Parse {
        message: format!("{} at {} in compiled module", message, location),
        help: Some("The downstream stage must produce a valid ES module".to_string()),
    }
}

/// Split module text into top-level statement ranges. Comments between
/// statements become items of their own (flagged `true`).
fn split_statements(source: &str) -> Result<Vec<(Range<usize>, bool)>> {
    let bytes = source.as_bytes();
    let mut statements = Vec::new();
    let mut pos = 0;

    loop {
        while bytes.get(pos).is_some_and(u8::is_ascii_whitespace) {
            pos += 1;
        }
        if pos >= bytes.len() {
            break;
        }

        if bytes[pos..].starts_with(b"//") || bytes[pos..].starts_with(b"/*") {
            let end = skip_comment(bytes, pos)
                .ok_or_else(|| parse_error(source, pos, "unterminated comment"))?;
            statements.push((pos..trim_end(bytes, pos, end), true));
            pos = end;
            continue;
        }

        // A stray `;` is an empty statement.
        if bytes[pos] == b';' {
            pos += 1;
            continue;
        }

        let end = scan_statement(source, pos)?;
        statements.push((pos..trim_end(bytes, pos, end), false));
        pos = end;
    }

    Ok(statements)
}

fn trim_end(bytes: &[u8], start: usize, mut end: usize) -> usize {
    while end > start && bytes[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    end
}

/// Find the end of the statement starting at `start`: just past its `;`, or
/// the newline where automatic semicolon insertion would end it.
fn scan_statement(source: &str, start: usize) -> Result<usize> {
    let bytes = source.as_bytes();
    let mut stack: Vec<u8> = Vec::new();
    let mut last = 0u8;
    let mut i = start;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'"' | b'\'' => {
                i = skip_quoted(bytes, i)
                    .ok_or_else(|| parse_error(source, i, "unterminated string"))?;
                last = b;
                continue;
            }
            b'`' => {
                i = skip_template(bytes, i)
                    .ok_or_else(|| parse_error(source, i, "unterminated template literal"))?;
                last = b;
                continue;
            }
            b'/' if matches!(bytes.get(i + 1), Some(b'/') | Some(b'*')) => {
                i = skip_comment(bytes, i)
                    .ok_or_else(|| parse_error(source, i, "unterminated comment"))?;
                continue;
            }
            b'/' if regex_allowed(bytes, start, i) => {
                i = skip_regex(bytes, i)
                    .ok_or_else(|| parse_error(source, i, "unterminated regular expression"))?;
                last = b'/';
                continue;
            }
            b'(' | b'[' | b'{' => stack.push(b),
            b')' | b']' | b'}' => {
                let open = match b {
                    b')' => b'(',
                    b']' => b'[',
                    _ => b'{',
                };
                if stack.pop() != Some(open) {
                    return Err(parse_error(source, i, &format!("unexpected `{}`", b as char)));
                }
            }
            b';' if stack.is_empty() => return Ok(i + 1),
            b'\n' if stack.is_empty() && line_complete(last) && starts_statement(bytes, i + 1) => {
                return Ok(i);
            }
            _ => {}
        }
        if !b.is_ascii_whitespace() {
            last = b;
        }
        i += 1;
    }

    if let Some(&open) = stack.last() {
        return Err(parse_error(source, i, &format!("unclosed `{}`", open as char)));
    }
    Ok(bytes.len())
}

/// Whether a line ending in `last` can end a statement.
fn line_complete(last: u8) -> bool {
    !matches!(
        last,
        b'=' | b',' | b'(' | b'[' | b'{' | b':' | b'?' | b'+' | b'-' | b'*' | b'/' | b'%'
            | b'&' | b'|' | b'^' | b'!' | b'~' | b'<' | b'>' | b'.'
    )
}

/// Whether the text from `pos` begins with a declaration or module keyword.
fn starts_statement(bytes: &[u8], mut pos: usize) -> bool {
    while bytes.get(pos).is_some_and(u8::is_ascii_whitespace) {
        pos += 1;
    }
    let rest = &bytes[pos.min(bytes.len())..];
    STATEMENT_KEYWORDS.iter().any(|keyword| {
        rest.starts_with(keyword.as_bytes())
            && !rest
                .get(keyword.len())
                .is_some_and(|&b| is_ident_byte(b))
    })
}

/// Whether a `/` at `pos` starts a regular expression literal rather than a
/// division, judged by the previous significant token.
fn regex_allowed(bytes: &[u8], start: usize, pos: usize) -> bool {
    let mut j = pos;
    while j > start && bytes[j - 1].is_ascii_whitespace() {
        j -= 1;
    }
    if j == start {
        return true;
    }

    let prev = bytes[j - 1];
    if is_ident_byte(prev) {
        let mut k = j;
        while k > start && is_ident_byte(bytes[k - 1]) {
            k -= 1;
        }
        let word = &bytes[k..j];
        return REGEX_PRECEDING_KEYWORDS
            .iter()
            .any(|keyword| keyword.as_bytes() == word);
    }
    !matches!(prev, b')' | b']' | b'}' | b'"' | b'\'' | b'`')
}

/// Skip a `'` or `"` string; `None` if it is not closed on its line.
fn skip_quoted(bytes: &[u8], start: usize) -> Option<usize> {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return None,
            b if b == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

/// Skip a template literal, including `${}` substitutions.
fn skip_template(bytes: &[u8], start: usize) -> Option<usize> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'`' => return Some(i + 1),
            b'$' if bytes.get(i + 1) == Some(&b'{') => i = skip_substitution(bytes, i + 1)?,
            _ => i += 1,
        }
    }
    None
}

/// Skip a `${ ... }` substitution body whose `{` is at `open`.
fn skip_substitution(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_quoted(bytes, i)?;
                continue;
            }
            b'`' => {
                i = skip_template(bytes, i)?;
                continue;
            }
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Skip a `//` or `/* */` comment starting at `start`.
fn skip_comment(bytes: &[u8], start: usize) -> Option<usize> {
    if bytes[start + 1] == b'/' {
        return Some(
            bytes[start..]
                .iter()
                .position(|&b| b == b'\n')
                .map(|p| start + p)
                .unwrap_or(bytes.len()),
        );
    }
    bytes[start + 2..]
        .windows(2)
        .position(|w| w == b"*/")
        .map(|p| start + 2 + p + 2)
}

/// Skip a regular expression literal and its flags.
fn skip_regex(bytes: &[u8], start: usize) -> Option<usize> {
    let mut in_class = false;
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'\n' => return None,
            b'[' => in_class = true,
            b']' => in_class = false,
            b'/' if !in_class => {
                i += 1;
                while bytes.get(i).is_some_and(|&b| is_ident_byte(b)) {
                    i += 1;
                }
                return Some(i);
            }
            _ => {}
        }
        i += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(module: &Module) -> Vec<&ItemKind> {
        module.items().iter().map(|item| &item.kind).collect()
    }

    #[test]
    fn test_split_with_semicolons() {
        let module = Module::parse(
            "import \"./a.css\";\nexport const a = 1; export default { a };\n",
        )
        .unwrap();

        assert_eq!(module.items().len(), 3);
        assert_eq!(module.items()[1].text, "export const a = 1;");
        assert_eq!(
            kinds(&module)[2],
            &ItemKind::ExportDefault {
                object_brace: Some(53)
            }
        );
    }

    #[test]
    fn test_split_without_semicolons() {
        let source = "const a = {\n  b: 1\n}\nexport default a\nexport const c = `x\n${a}`";
        let module = Module::parse(source).unwrap();
        let texts: Vec<&str> = module.items().iter().map(|i| i.text.as_str()).collect();

        assert_eq!(
            texts,
            vec![
                "const a = {\n  b: 1\n}",
                "export default a",
                "export const c = `x\n${a}`"
            ]
        );
        assert_eq!(
            kinds(&module)[1],
            &ItemKind::ExportDefault { object_brace: None }
        );
    }

    #[test]
    fn test_continued_lines_stay_together() {
        let module = Module::parse("export const a = 1 +\n  2;\nconst b = [\n1,\n2]\n").unwrap();
        assert_eq!(module.items().len(), 2);
    }

    #[test]
    fn test_delimiters_in_literals() {
        let source = "export const a = \"};\";\nexport const r = /[;}]\\//g;\nexport const t = `${ \"}\" }`; // ;\n";
        let module = Module::parse(source).unwrap();

        assert_eq!(module.exported_names(), vec!["a", "r", "t"]);
        assert_eq!(module.items()[3].kind, ItemKind::Comment);
    }

    #[test]
    fn test_division_is_not_regex() {
        let module = Module::parse("export const a = (4) / 2 / 1;\nexport const b = 1;").unwrap();
        assert_eq!(module.exported_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_export_forms() {
        let source = "export function f() {}\nexport async function* g() {}\nexport class C {}\n\
                      export let { x, y: z, ...rest } = o, [p, q = 1] = arr;\n\
                      export { a as b, c } from \"./m.js\";\nexport * as ns from \"./n.js\";\n\
                      export * from \"./o.js\";";
        let module = Module::parse(source).unwrap();

        assert_eq!(
            module.exported_names(),
            vec!["f", "g", "C", "x", "z", "rest", "p", "q", "b", "c", "ns"]
        );
        match &module.items()[4].kind {
            ItemKind::ExportList { source, .. } => {
                assert_eq!(source.as_deref(), Some("\"./m.js\""));
            }
            other => panic!("expected export list, got {:?}", other),
        }
    }

    #[test]
    fn test_dynamic_import_is_a_statement() {
        let module = Module::parse("import(\"./a.js\");\nimport.meta.hot;").unwrap();
        assert_eq!(kinds(&module), vec![&ItemKind::Statement, &ItemKind::Statement]);
    }

    #[test]
    fn test_remove_default_export() {
        let mut module =
            Module::parse("const x = 1;\nexport { x as default, x };\nexport default x;").unwrap();
        assert!(module.has_default_export());

        module.remove_default_export();

        assert!(!module.has_default_export());
        assert_eq!(module.to_code(), "const x = 1;\nexport { x };\n");
    }

    #[test]
    fn test_retain_named_exports() {
        let source = "export const __vite__css = \"a\", other = 1;\nexport const a_1 = \"a_1\";\n\
                      export { a_1 as a, __vite__css as __vite__alias };\nexport * from \"./m.js\";";
        let mut module = Module::parse(source).unwrap();

        module.retain_named_exports(|name| name.starts_with("__vite__"));

        assert_eq!(
            module.to_code(),
            "const __vite__css = \"a\", other = 1;\n\
             export { __vite__css };\n\
             export { __vite__css as __vite__alias };\n"
        );
        assert_eq!(module.exported_names(), vec!["__vite__css", "__vite__alias"]);
        assert_eq!(module.local_names(), vec!["__vite__css", "other"]);
    }

    #[test]
    fn test_star_export_kept_unless_rejected() {
        let mut module = Module::parse("export * from \"./m.js\";\nexport const a = 1;").unwrap();
        module.retain_named_exports(|name| name != "a");
        assert_eq!(module.to_code(), "export * from \"./m.js\";\n");
    }

    #[test]
    fn test_parse_errors() {
        for source in ["export const a = \"open;", "const a = (1;", "const a = 1);", "/* open"] {
            let error = Module::parse(source).unwrap_err();
            assert!(matches!(error, CssExportError::Parse { .. }), "{source}");
        }
    }

    #[test]
    fn test_empty_module() {
        let module = Module::parse("  \n").unwrap();
        assert!(module.is_empty());
        assert_eq!(module.to_code(), "");
    }
}
