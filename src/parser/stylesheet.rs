//! Tolerant CSS structure parser.
//!
//! Splits stylesheet text into rules, at-rules, declarations and comments,
//! keeping byte ranges into the original source so that untouched nodes can
//! be re-emitted verbatim. Values are never interpreted.
//!
//! Strings, comments, parenthesised groups and `#{}` interpolations are
//! skipped when looking for the `;`, `{` and `}` that delimit items, so
//! `url(data:image/png;base64,...)` or `content: "}"` do not split a
//! declaration.

use std::ops::Range;

/// A parsed stylesheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    pub nodes: Vec<Node>,
    /// Offsets where a block was still open at end of input.
    pub unclosed: Vec<usize>,
}

/// A node in a stylesheet or block.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Rule(Rule),
    AtRule(AtRule),
    Comment(Range<usize>),
    /// Anything that is not a rule, at-rule or comment in its position,
    /// kept so it can be passed through unchanged.
    Other(Range<usize>),
}

impl Node {
    /// Byte range of the node in the source, terminator included.
    pub fn range(&self) -> Range<usize> {
        match self {
            Node::Rule(rule) => rule.range.clone(),
            Node::AtRule(at_rule) => at_rule.range.clone(),
            Node::Comment(range) | Node::Other(range) => range.clone(),
        }
    }
}

/// Contents of a `{}` block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    pub declarations: Vec<Declaration>,
    pub nodes: Vec<Node>,
}

impl Block {
    /// Whether the block holds nested rules or at-rules.
    pub fn has_nested_rules(&self) -> bool {
        self.nodes
            .iter()
            .any(|node| matches!(node, Node::Rule(_) | Node::AtRule(_)))
    }
}

/// A qualified rule: `selector { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    /// Selector text with surrounding whitespace removed.
    pub selector: String,
    /// Byte offset of the first selector character.
    pub selector_offset: usize,
    pub block: Block,
    pub range: Range<usize>,
}

/// An at-rule, with or without a block: `@media screen { ... }`, `@import "a.css";`.
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    pub name: String,
    pub params: String,
    pub block: Option<Block>,
    pub range: Range<usize>,
}

/// A `property: value` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    pub property_offset: usize,
    /// Raw value text, trimmed, without any `!important` flag.
    pub value: String,
    pub important: bool,
    pub range: Range<usize>,
}

impl Stylesheet {
    /// Visit every qualified rule, including rules nested in blocks.
    pub fn walk_rules<'a>(&'a self, visit: &mut impl FnMut(&'a Rule)) {
        walk_nodes(&self.nodes, visit);
    }
}

fn walk_nodes<'a>(nodes: &'a [Node], visit: &mut impl FnMut(&'a Rule)) {
    for node in nodes {
        match node {
            Node::Rule(rule) => {
                visit(rule);
                walk_nodes(&rule.block.nodes, visit);
            }
            Node::AtRule(AtRule {
                block: Some(block), ..
            }) => walk_nodes(&block.nodes, visit),
            _ => {}
        }
    }
}

/// Parse stylesheet text. Never fails; malformed input degrades to
/// `Node::Other` and unclosed blocks are closed at end of input.
pub fn parse_stylesheet(source: &str) -> Stylesheet {
    let mut parser = Parser {
        source,
        bytes: source.as_bytes(),
        pos: 0,
        unclosed: Vec::new(),
    };
    let block = parser.parse_block(false);

    let mut nodes = block.nodes;
    // Top-level declarations are not valid CSS; keep them as opaque text.
    nodes.extend(block.declarations.into_iter().map(|d| Node::Other(d.range)));
    nodes.sort_by_key(|node| node.range().start);

    Stylesheet {
        nodes,
        unclosed: parser.unclosed,
    }
}

struct Parser<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    unclosed: Vec<usize>,
}

impl<'a> Parser<'a> {
    fn parse_block(&mut self, nested: bool) -> Block {
        let mut block = Block::default();

        loop {
            self.skip_whitespace();

            let Some(&byte) = self.bytes.get(self.pos) else {
                if nested {
                    self.unclosed.push(self.pos);
                }
                break;
            };

            if byte == b'}' {
                self.pos += 1;
                if nested {
                    break;
                }
                block.nodes.push(Node::Other(self.pos - 1..self.pos));
                continue;
            }

            if self.bytes[self.pos..].starts_with(b"/*") {
                let start = self.pos;
                self.pos = skip_comment(self.bytes, start);
                block.nodes.push(Node::Comment(start..self.pos));
                continue;
            }

            let start = self.pos;
            let (end, terminator) = scan_item(self.bytes, start);

            if terminator == Some(b'{') {
                self.pos = end + 1;
                let inner = self.parse_block(true);
                let range = start..self.pos;
                let prelude = &self.source[start..end];

                let node = if prelude.starts_with('@') {
                    Node::AtRule(at_rule(prelude, Some(inner), range))
                } else {
                    Node::Rule(Rule {
                        selector: prelude.trim_end().to_string(),
                        selector_offset: start,
                        block: inner,
                        range,
                    })
                };
                block.nodes.push(node);
                continue;
            }

            // Statement ended by `;`, by the enclosing `}` or by end of input.
            self.pos = if terminator == Some(b';') { end + 1 } else { end };
            let range = start..self.pos;
            let text = &self.source[start..end];

            if text.starts_with('@') {
                block.nodes.push(Node::AtRule(at_rule(text, None, range)));
            } else if let Some(declaration) = parse_declaration(text, start, range.clone()) {
                block.declarations.push(declaration);
            } else {
                block.nodes.push(Node::Other(range));
            }
        }

        block
    }

    fn skip_whitespace(&mut self) {
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_whitespace())
        {
            self.pos += 1;
        }
    }
}

fn at_rule(prelude: &str, block: Option<Block>, range: Range<usize>) -> AtRule {
    let body = &prelude[1..];
    let name_end = body
        .find(|c: char| c.is_whitespace() || c == '(' || c == '"' || c == '\'')
        .unwrap_or(body.len());

    AtRule {
        name: body[..name_end].to_string(),
        params: body[name_end..].trim().to_string(),
        block,
        range,
    }
}

fn parse_declaration(text: &str, start: usize, range: Range<usize>) -> Option<Declaration> {
    let colon = find_top_level(text.as_bytes(), b':')?;
    let property = text[..colon].trim();
    if property.is_empty() {
        return None;
    }

    let (value, important) = split_important(text[colon + 1..].trim());

    Some(Declaration {
        property: property.to_string(),
        property_offset: start,
        value: value.to_string(),
        important,
        range,
    })
}

fn split_important(value: &str) -> (&str, bool) {
    if let Some(bang) = value.rfind('!') {
        if value[bang + 1..].trim().eq_ignore_ascii_case("important") {
            return (value[..bang].trim_end(), true);
        }
    }
    (value, false)
}

/// Find `needle` outside strings, comments and brackets.
fn find_top_level(bytes: &[u8], needle: u8) -> Option<usize> {
    let mut i = 0;
    let mut depth = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = skip_comment(bytes, i);
                continue;
            }
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b if b == needle && depth == 0 => return Some(i),
            _ => {}
        }
        i += 1;
    }
    None
}

/// Scan from `start` to the next top-level `;`, `{` or `}`.
///
/// Returns the delimiter position and the delimiter, or the input length and
/// `None` at end of input.
fn scan_item(bytes: &[u8], start: usize) -> (usize, Option<u8>) {
    let mut i = start;
    let mut depth = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i = skip_comment(bytes, i);
                continue;
            }
            b'\\' => {
                i += 2;
                continue;
            }
            b'#' if bytes.get(i + 1) == Some(&b'{') => {
                i = skip_interpolation(bytes, i + 1);
                continue;
            }
            b'(' | b'[' => depth += 1,
            b')' | b']' => depth = depth.saturating_sub(1),
            b @ (b';' | b'{' | b'}') if depth == 0 => return (i, Some(b)),
            _ => {}
        }
        i += 1;
    }
    (bytes.len(), None)
}

/// Skip a quoted string starting at `start`. Unterminated strings end at
/// the next newline.
fn skip_string(bytes: &[u8], start: usize) -> usize {
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'\n' => return i,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

fn skip_comment(bytes: &[u8], start: usize) -> usize {
    bytes[start + 2..]
        .windows(2)
        .position(|w| w == b"*/")
        .map(|p| start + 2 + p + 2)
        .unwrap_or(bytes.len())
}

/// Skip a `{ ... }` interpolation whose opening brace is at `open`.
fn skip_interpolation(bytes: &[u8], open: usize) -> usize {
    let mut depth = 0usize;
    let mut i = open;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return i + 1;
                }
            }
            b'"' | b'\'' => {
                i = skip_string(bytes, i);
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rule(node: &Node) -> &Rule {
        match node {
            Node::Rule(rule) => rule,
            other => panic!("expected rule, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rules_and_declarations() {
        let source = ".a { color: red; margin: 0 auto }\n:export nav { bgColor: #000; }";
        let sheet = parse_stylesheet(source);

        assert_eq!(sheet.nodes.len(), 2);
        let first = rule(&sheet.nodes[0]);
        assert_eq!(first.selector, ".a");
        assert_eq!(first.block.declarations.len(), 2);
        assert_eq!(first.block.declarations[1].property, "margin");
        assert_eq!(first.block.declarations[1].value, "0 auto");
        assert_eq!(&source[first.range.clone()], ".a { color: red; margin: 0 auto }");

        let second = rule(&sheet.nodes[1]);
        assert_eq!(second.selector, ":export nav");
        assert_eq!(second.selector_offset, 34);
        assert_eq!(second.block.declarations[0].value, "#000");
    }

    #[test]
    fn test_important_flag() {
        let sheet = parse_stylesheet(".a { color: red ! IMPORTANT; content: \"!important\" }");
        let decls = &rule(&sheet.nodes[0]).block.declarations;

        assert_eq!(decls[0].value, "red");
        assert!(decls[0].important);
        assert_eq!(decls[1].value, "\"!important\"");
        assert!(!decls[1].important);
    }

    #[test]
    fn test_delimiters_inside_strings_and_urls() {
        let source = r#".a { background: url(data:image/png;base64,AAA=); content: "}{;" }"#;
        let sheet = parse_stylesheet(source);
        let decls = &rule(&sheet.nodes[0]).block.declarations;

        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].value, "url(data:image/png;base64,AAA=)");
        assert_eq!(decls[1].value, r#""}{;""#);
    }

    #[test]
    fn test_comments_and_at_rules() {
        let source = "@charset \"utf-8\";\n/* note */\n@media (min-width: 1px) {\n  .a { color: red }\n  :export { a: b }\n}\n";
        let sheet = parse_stylesheet(source);

        assert_eq!(sheet.nodes.len(), 3);
        match &sheet.nodes[0] {
            Node::AtRule(at) => {
                assert_eq!(at.name, "charset");
                assert_eq!(at.params, "\"utf-8\"");
                assert!(at.block.is_none());
            }
            other => panic!("expected at-rule, got {:?}", other),
        }
        assert!(matches!(sheet.nodes[1], Node::Comment(_)));
        match &sheet.nodes[2] {
            Node::AtRule(at) => {
                assert_eq!(at.name, "media");
                assert_eq!(at.params, "(min-width: 1px)");
                let block = at.block.as_ref().unwrap();
                assert_eq!(block.nodes.len(), 2);
                assert_eq!(rule(&block.nodes[1]).selector, ":export");
            }
            other => panic!("expected at-rule, got {:?}", other),
        }
    }

    #[test]
    fn test_font_face_declarations() {
        let sheet = parse_stylesheet("@font-face { font-family: X; src: url(x.woff) }");
        match &sheet.nodes[0] {
            Node::AtRule(at) => {
                assert_eq!(at.name, "font-face");
                assert_eq!(at.block.as_ref().unwrap().declarations.len(), 2);
            }
            other => panic!("expected at-rule, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_rules() {
        let sheet = parse_stylesheet(".a { color: red; &:hover { color: blue } }");
        let outer = rule(&sheet.nodes[0]);

        assert_eq!(outer.block.declarations.len(), 1);
        assert!(outer.block.has_nested_rules());
        assert_eq!(rule(&outer.block.nodes[0]).selector, "&:hover");

        let mut seen = Vec::new();
        sheet.walk_rules(&mut |r| seen.push(r.selector.clone()));
        assert_eq!(seen, vec![".a", "&:hover"]);
    }

    #[test]
    fn test_interpolation_in_selector() {
        let sheet = parse_stylesheet(".icon-#{$name} { color: red }");
        assert_eq!(rule(&sheet.nodes[0]).selector, ".icon-#{$name}");
    }

    #[test]
    fn test_unclosed_block() {
        let sheet = parse_stylesheet(".a { color: red;");

        assert_eq!(sheet.unclosed, vec![16]);
        assert_eq!(rule(&sheet.nodes[0]).block.declarations.len(), 1);
    }

    #[test]
    fn test_stray_text_is_kept() {
        let source = "} .a { } b: c;";
        let sheet = parse_stylesheet(source);

        let ranges: Vec<&str> = sheet.nodes.iter().map(|n| &source[n.range()]).collect();
        assert_eq!(ranges, vec!["}", ".a { }", "b: c;"]);
    }

    #[test]
    fn test_empty_input() {
        let sheet = parse_stylesheet("  \n ");
        assert!(sheet.nodes.is_empty());
        assert!(sheet.unclosed.is_empty());
    }
}
