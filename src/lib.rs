//! globrx compiles one path-segment glob, extglobs included, into either
//! a plain literal string or an anchored regular expression.
//!
//! ```
//! use globrx::{MatchOptions, SegmentAst};
//!
//! let mut tree = SegmentAst::parse("!(foo|bar)*.js", MatchOptions::default());
//! let compiled = tree.compile().unwrap();
//! assert!(compiled.is_match("main.js"));
//! assert!(!compiled.is_match("foo.js"));
//! ```
//!
//! The interesting part is negated extglobs: `!(X)` is not locally
//! expressible as a regex, because what it must reject depends on what
//! follows it in the segment. The tree therefore keeps parent links, and a
//! one-shot pass before lowering splices each negation's trailing context
//! into its branches so the generated lookahead covers the full remainder.

pub mod cli;
pub mod options;
pub mod segment;

pub use options::MatchOptions;
pub use segment::{CompiledPattern, PatternError, SegmentAst, SegmentRegex};
