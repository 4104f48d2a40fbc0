//! Character checks for export paths.
//!
//! Path segments become object keys, so characters that would break a key
//! path or read as selector syntax are rejected, and characters that make
//! awkward keys are flagged.

/// Characters that are never allowed in an export path.
pub const FORBIDDEN_CHARACTERS: &[char] = &[
    '~', '>', '<', '[', ']', '(', ')', '.', '#', ':', '*', '/', '@',
];

/// Characters that are allowed but produce a warning.
pub const DISCOURAGED_CHARACTERS: &[char] = &['-', '\\'];

/// Classification of a single offending character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathIssueKind {
    Forbidden,
    Discouraged,
}

/// An offending character in an export path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathIssue {
    pub kind: PathIssueKind,
    /// Byte offset of the character within the checked text.
    pub offset: usize,
    pub character: char,
}

/// Check the text that follows the marker token of an export selector.
///
/// Every offending character is reported, in source order.
pub fn check_export_path(path: &str) -> Vec<PathIssue> {
    path.char_indices()
        .filter_map(|(offset, character)| {
            let kind = if FORBIDDEN_CHARACTERS.contains(&character) {
                PathIssueKind::Forbidden
            } else if DISCOURAGED_CHARACTERS.contains(&character) {
                PathIssueKind::Discouraged
            } else {
                return None;
            };
            Some(PathIssue {
                kind,
                offset,
                character,
            })
        })
        .collect()
}

/// Display form of a character set, e.g. `[~ > < ...]`.
pub fn describe_characters(set: &[char]) -> String {
    let chars: Vec<String> = set.iter().map(|c| c.to_string()).collect();
    format!("[{}]", chars.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path() {
        assert!(check_export_path(" nav menuItem").is_empty());
        assert!(check_export_path("").is_empty());
    }

    #[test]
    fn test_forbidden_characters() {
        let issues = check_export_path(" .nav");

        assert_eq!(
            issues,
            vec![PathIssue {
                kind: PathIssueKind::Forbidden,
                offset: 1,
                character: '.',
            }]
        );
    }

    #[test]
    fn test_every_issue_is_reported() {
        let issues = check_export_path(" a>b nav-item c\\d");
        let found: Vec<(PathIssueKind, char)> =
            issues.iter().map(|i| (i.kind, i.character)).collect();

        assert_eq!(
            found,
            vec![
                (PathIssueKind::Forbidden, '>'),
                (PathIssueKind::Discouraged, '-'),
                (PathIssueKind::Discouraged, '\\'),
            ]
        );
        assert_eq!(issues[1].offset, 8);
    }

    #[test]
    fn test_describe_characters() {
        assert_eq!(describe_characters(DISCOURAGED_CHARACTERS), "[- \\]");
    }
}
