//! Negated extglobs end to end.
//!
//! A `!(X)` cannot be judged on its own: the lookahead has to cover the
//! text that follows it in the segment, otherwise `!(foo)bar` would refuse
//! anything starting with `foo`. These tests pin down the spliced-tail
//! behavior through the public compile surface.

use globrx::{CompiledPattern, MatchOptions, SegmentAst};
use rstest::rstest;

fn compile(pattern: &str, options: MatchOptions) -> CompiledPattern {
    let mut tree = SegmentAst::parse(pattern, options);
    tree.compile().expect("pattern should compile")
}

fn assert_behavior(pattern: &str, accepted: &[&str], rejected: &[&str]) {
    let compiled = compile(pattern, MatchOptions::default());
    for segment in accepted {
        assert!(compiled.is_match(segment), "{pattern:?} should match {segment:?}");
    }
    for segment in rejected {
        assert!(!compiled.is_match(segment), "{pattern:?} should reject {segment:?}");
    }
}

// ========================================
// Bare negation
// ========================================

#[rstest]
#[case::simple("!(foo)", &["bar", "fo", "foobar", "food"], &["foo", ".foo"])]
#[case::alternatives("!(a|b)", &["c", "ab", "ba", ""], &["a", "b"])]
#[case::empty("!()", &["a", "anything"], &[""])]
fn bare_negation(#[case] pattern: &str, #[case] accepted: &[&str], #[case] rejected: &[&str]) {
    assert_behavior(pattern, accepted, rejected);
}

// ========================================
// Negation with a tail in the same segment
// ========================================

#[rstest]
#[case::sibling_tail("!(a|b)c", &["xc", "cc", "abc"], &["ac", "bc"])]
#[case::leading_text("a!(b)", &["a", "ax", "abc"], &["ab"])]
#[case::glob_tail("!(foo)*.js", &["main.js", "x.js"], &["foo.js", ".hidden.js"])]
#[case::both_sides("a!(b)c", &["ac", "axc", "abxc"], &["abc"])]
fn negation_with_tail(#[case] pattern: &str, #[case] accepted: &[&str], #[case] rejected: &[&str]) {
    assert_behavior(pattern, accepted, rejected);
}

// ========================================
// Negation nested under other extglobs
// ========================================

#[test]
fn nested_negation_sees_tails_from_every_literal_ancestor() {
    // the lookahead must cover `z` (sibling) and `b` (root tail)
    assert_behavior(
        "a@(i|w!(x|y)z|j)b",
        &["aib", "ajb", "awqzb", "awxzzb"],
        &["awxzb", "awyzb", "ab"],
    );
}

#[test]
fn double_negation_flips_back() {
    assert_behavior("!(!(a))", &["a"], &["b", "ab", ""]);
}

// ========================================
// Degenerate and disabled forms
// ========================================

#[test]
fn unterminated_negation_is_plain_text() {
    let compiled = compile("!(a", MatchOptions::default());
    match &compiled {
        CompiledPattern::Literal(text) => assert_eq!(text, "!(a"),
        CompiledPattern::Regex(regex) => {
            panic!("expected literal, got regex {}", regex.source)
        }
    }
    assert!(compiled.is_match("!(a"));
    assert!(!compiled.is_match("x"));
}

#[test]
fn negation_allows_leading_dot_when_dot_is_on() {
    let options = MatchOptions {
        dot: true,
        ..Default::default()
    };
    let compiled = compile("!(foo)", options);
    assert!(compiled.is_match(".bar"));
    assert!(!compiled.is_match("foo"));
}

#[test]
fn leading_negation_still_guards_the_leading_dot() {
    // the negation consumes nothing up front, so its own guard is what
    // keeps a dotfile out
    let compiled = compile("!(foo)*", MatchOptions::default());
    assert!(compiled.is_match("bar"));
    assert!(!compiled.is_match(".bar"));
}
