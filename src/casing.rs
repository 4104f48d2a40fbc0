//! Kebab-case conversions usable as property name transformers.
//!
//! Each `-`-separated segment is lowercased; segments after the first (or
//! every segment, for the upper variants) get an uppercase first character.
//! Empty segments disappear, so trailing or doubled hyphens are dropped.

fn convert(name: &str, capitalize_first_segment: bool) -> String {
    let mut out = String::with_capacity(name.len());
    for (i, segment) in name.split('-').enumerate() {
        for (j, ch) in segment.chars().enumerate() {
            if j == 0 && (i != 0 || capitalize_first_segment) {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
        }
    }
    out
}

/// `background-color` -> `backgroundColor`
pub fn kebab_to_lower_camel(name: &str) -> String {
    convert(name, false)
}

/// `background-color` -> `BackgroundColor`
pub fn kebab_to_upper_camel(name: &str) -> String {
    convert(name, true)
}

/// Alias of [`kebab_to_upper_camel`].
pub fn kebab_to_pascal(name: &str) -> String {
    kebab_to_upper_camel(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_camel() {
        assert_eq!(kebab_to_lower_camel("background-color"), "backgroundColor");
        assert_eq!(kebab_to_lower_camel("BACKGROUND-COLOR"), "backgroundColor");
        assert_eq!(kebab_to_lower_camel("bacKgrOund-cOlor"), "backgroundColor");
        assert_eq!(kebab_to_lower_camel("backgroundColor"), "backgroundcolor");
        assert_eq!(
            kebab_to_lower_camel("animation-iteration-count"),
            "animationIterationCount"
        );
        assert_eq!(
            kebab_to_lower_camel("animation-iteration-count-"),
            "animationIterationCount"
        );
    }

    #[test]
    fn test_lower_camel_non_letters() {
        assert_eq!(kebab_to_lower_camel("1-2-3"), "123");
        assert_eq!(kebab_to_lower_camel("1RRR-2AAAA-3DDDD"), "1rrr2aaaa3dddd");
        assert_eq!(kebab_to_lower_camel("$12D-2AA5DA-dD4dD"), "$12d2aa5daDd4dd");
    }

    #[test]
    fn test_upper_camel() {
        assert_eq!(kebab_to_upper_camel("background-color"), "BackgroundColor");
        assert_eq!(kebab_to_upper_camel("BACKGROUND-COLOR"), "BackgroundColor");
        assert_eq!(kebab_to_upper_camel("BackgroundColor"), "Backgroundcolor");
        assert_eq!(
            kebab_to_upper_camel("animation-iteration-count-"),
            "AnimationIterationCount"
        );
        assert_eq!(kebab_to_upper_camel("1RRR-2AAAA-3DDDD"), "1rrr2aaaa3dddd");
        assert_eq!(kebab_to_pascal("$12D-2AA5DA-dD4dD"), "$12d2aa5daDd4dd");
    }
}
