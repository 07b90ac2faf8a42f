//! Compiled form of a segment glob.

use fancy_regex::Regex;

use crate::segment::ast::{SegmentAst, ROOT};
use crate::segment::error::PatternError;

/// What a segment glob compiles to: a plain string when nothing in the
/// pattern needs a regex, otherwise an anchored regex with its metadata.
#[derive(Debug, Clone)]
pub enum CompiledPattern {
    /// Exact-match literal, already unescaped.
    Literal(String),
    /// Anchored regular expression.
    Regex(SegmentRegex),
}

impl CompiledPattern {
    /// Test one segment against the compiled pattern.
    pub fn is_match(&self, segment: &str) -> bool {
        match self {
            CompiledPattern::Literal(text) => segment == text,
            CompiledPattern::Regex(regex) => regex.is_match(segment),
        }
    }
}

/// A compiled segment regex plus the sidecar data callers report on.
#[derive(Debug, Clone)]
pub struct SegmentRegex {
    regex: Regex,
    /// Unanchored source the regex was built from.
    pub source: String,
    /// Canonical reconstruction of the input glob.
    pub glob: String,
    /// Whether the source leans on Unicode property escapes. Matching here
    /// is Unicode-aware either way; the bit matters when the source is
    /// re-targeted at an engine where that needs opting into.
    pub unicode: bool,
}

impl SegmentRegex {
    pub fn is_match(&self, segment: &str) -> bool {
        self.regex.is_match(segment).unwrap_or(false)
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }
}

impl SegmentAst {
    /// Decide between a literal and a regex for this pattern.
    ///
    /// A pattern stays literal when lowering found no magic anywhere and
    /// case-insensitivity (if requested) cannot change what it matches.
    pub fn compile(&mut self) -> Result<CompiledPattern, PatternError> {
        let glob = self.to_glob_string();
        let emitted = self.to_regex_source();
        let options = self.options();
        let any_magic = emitted.has_magic
            || self.node_magic(ROOT) == Some(true)
            || (options.nocase
                && !options.nocase_magic_only
                && glob.to_uppercase() != glob.to_lowercase());
        if !any_magic {
            return Ok(CompiledPattern::Literal(emitted.body));
        }
        let flags = if options.nocase { "(?i)" } else { "" };
        let anchored = format!("{flags}^{}$", emitted.re);
        let regex = Regex::new(&anchored).map_err(|error| PatternError::Regex {
            glob: glob.clone(),
            source: Box::new(error),
        })?;
        Ok(CompiledPattern::Regex(SegmentRegex {
            regex,
            source: emitted.re,
            glob,
            unicode: emitted.uflag,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::MatchOptions;
    use rstest::rstest;

    fn compile(pattern: &str, options: MatchOptions) -> CompiledPattern {
        let mut tree = SegmentAst::parse(pattern, options);
        tree.compile().expect("pattern should compile")
    }

    // === Literal fast path ===

    #[rstest]
    #[case::plain("foo.txt", "foo.txt")]
    #[case::escaped_star(r"\*.txt", "*.txt")]
    #[case::escaped_extglob(r"\@(a)", "@(a)")]
    #[case::class_wrapped_char("[a]b", "ab")]
    #[case::empty("", "")]
    fn magicless_patterns_stay_literal(#[case] pattern: &str, #[case] expected: &str) {
        match compile(pattern, MatchOptions::default()) {
            CompiledPattern::Literal(text) => assert_eq!(text, expected),
            CompiledPattern::Regex(regex) => {
                panic!("expected literal for {pattern:?}, got regex {}", regex.source)
            }
        }
    }

    #[rstest]
    #[case::star("*.txt")]
    #[case::qmark("a?c")]
    #[case::class("[ab]")]
    #[case::extglob("@(a)")]
    #[case::negation("!(a)")]
    fn magic_patterns_get_a_regex(#[case] pattern: &str) {
        assert!(matches!(
            compile(pattern, MatchOptions::default()),
            CompiledPattern::Regex(_)
        ));
    }

    // === nocase ===

    #[test]
    fn nocase_forces_a_regex_for_cased_literals() {
        let options = MatchOptions {
            nocase: true,
            ..Default::default()
        };
        let compiled = compile("readme", options);
        assert!(matches!(compiled, CompiledPattern::Regex(_)));
        assert!(compiled.is_match("README"));
        assert!(compiled.is_match("ReadMe"));
        assert!(!compiled.is_match("README2"));
    }

    #[test]
    fn nocase_keeps_caseless_literals_literal() {
        let options = MatchOptions {
            nocase: true,
            ..Default::default()
        };
        assert!(matches!(
            compile("1234", options),
            CompiledPattern::Literal(text) if text == "1234"
        ));
    }

    #[test]
    fn nocase_magic_only_skips_the_casing_check() {
        let options = MatchOptions {
            nocase: true,
            nocase_magic_only: true,
            ..Default::default()
        };
        assert!(matches!(
            compile("readme", options),
            CompiledPattern::Literal(text) if text == "readme"
        ));
    }

    #[test]
    fn nocase_applies_to_magic_patterns() {
        let options = MatchOptions {
            nocase: true,
            ..Default::default()
        };
        let compiled = compile("*.TXT", options);
        assert!(compiled.is_match("notes.txt"));
        assert!(!compiled.is_match("notes.md"));
    }

    // === Sidecar metadata ===

    #[test]
    fn regex_carries_source_and_glob() {
        let compiled = compile("*.js", MatchOptions::default());
        let CompiledPattern::Regex(regex) = compiled else {
            panic!("expected a regex");
        };
        assert_eq!(regex.source, r"(?!\.)[^/]*?\.js");
        assert_eq!(regex.glob, "*.js");
        assert!(!regex.unicode);
    }

    #[test]
    fn unicode_flag_follows_posix_classes() {
        let compiled = compile("[[:alpha:]]*", MatchOptions::default());
        let CompiledPattern::Regex(regex) = compiled else {
            panic!("expected a regex");
        };
        assert!(regex.unicode);
        assert!(regex.is_match("héllo"));
        assert!(!regex.is_match("9lives"));
    }

    // === Matching through both arms ===

    #[test]
    fn literal_arm_matches_exactly() {
        let compiled = compile("foo.txt", MatchOptions::default());
        assert!(compiled.is_match("foo.txt"));
        assert!(!compiled.is_match("foo_txt"));
        assert!(!compiled.is_match("FOO.TXT"));
    }

    #[test]
    fn compiling_twice_is_stable() {
        let mut tree = SegmentAst::parse("a@(b|c)*", MatchOptions::default());
        let first = tree.to_regex_source();
        let second = tree.to_regex_source();
        assert_eq!(first, second);
    }
}
