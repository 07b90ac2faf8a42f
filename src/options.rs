use serde::Deserialize;

/// Flags controlling how a segment glob is compiled.
///
/// Every flag defaults to off, which gives plain shell-glob behavior:
/// extglobs enabled, case-sensitive, leading dots never matched by
/// wildcards.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    /// Match case-insensitively.
    pub nocase: bool,
    /// With `nocase`, only patterns containing glob magic get a regex;
    /// purely literal patterns stay literal even when they contain letters.
    pub nocase_magic_only: bool,
    /// Let wildcards match a leading dot.
    pub dot: bool,
    /// Disable extglob parsing; `!(`, `@(` and friends become plain text.
    pub noext: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn defaults_are_all_off() {
        let options = MatchOptions::default();
        assert!(!options.nocase);
        assert!(!options.nocase_magic_only);
        assert!(!options.dot);
        assert!(!options.noext);
    }

    #[rstest]
    #[case::empty("{}", MatchOptions::default())]
    #[case::dot_only(r#"{"dot": true}"#, MatchOptions { dot: true, ..Default::default() })]
    #[case::nocase_pair(
        r#"{"nocase": true, "nocase_magic_only": true}"#,
        MatchOptions { nocase: true, nocase_magic_only: true, ..Default::default() }
    )]
    #[case::noext(r#"{"noext": true}"#, MatchOptions { noext: true, ..Default::default() })]
    fn deserializes_with_defaults(#[case] json: &str, #[case] expected: MatchOptions) {
        let options: MatchOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options, expected);
    }
}
