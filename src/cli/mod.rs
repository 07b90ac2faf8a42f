mod route;

use clap::{Parser, Subcommand};

pub use route::{run_ast, run_compile, run_match};

use crate::options::MatchOptions;

#[derive(Parser)]
#[command(name = "globrx")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub enum Commands {
    /// Compile a segment glob and print the regex source (or literal text)
    Compile(CompileArgs),
    /// Print the candidate segments that match a glob
    Match(MatchArgs),
    /// Print the parse tree as JSON
    Ast(AstArgs),
}

/// Flags shared by every subcommand, mapped onto [`MatchOptions`].
#[derive(clap::Args, Default)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct GlobFlags {
    /// Let wildcards match a leading dot
    #[arg(long)]
    pub dot: bool,

    /// Match case-insensitively
    #[arg(long)]
    pub nocase: bool,

    /// With --nocase, keep cased literal patterns literal
    #[arg(long)]
    pub nocase_magic_only: bool,

    /// Treat extglob operators as plain text
    #[arg(long)]
    pub noext: bool,
}

impl GlobFlags {
    pub fn to_options(&self) -> MatchOptions {
        MatchOptions {
            nocase: self.nocase,
            nocase_magic_only: self.nocase_magic_only,
            dot: self.dot,
            noext: self.noext,
        }
    }
}

#[derive(clap::Args, Default)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct CompileArgs {
    /// Glob pattern for one path segment
    pub pattern: String,

    /// Emit the result as JSON with the glob and source fields
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub flags: GlobFlags,
}

#[derive(clap::Args, Default)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct MatchArgs {
    /// Glob pattern for one path segment
    pub pattern: String,

    /// Candidate segments; read from stdin, one per line, when omitted
    pub candidates: Vec<String>,

    #[command(flatten)]
    pub flags: GlobFlags,
}

#[derive(clap::Args, Default)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub struct AstArgs {
    /// Glob pattern for one path segment
    pub pattern: String,

    #[command(flatten)]
    pub flags: GlobFlags,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::compile_plain(
        &["globrx", "compile", "*.js"],
        Commands::Compile(CompileArgs { pattern: "*.js".into(), ..Default::default() }),
    )]
    #[case::compile_json(
        &["globrx", "compile", "--json", "*.js"],
        Commands::Compile(CompileArgs { pattern: "*.js".into(), json: true, ..Default::default() }),
    )]
    #[case::compile_with_dot(
        &["globrx", "compile", "--dot", "*.js"],
        Commands::Compile(CompileArgs {
            pattern: "*.js".into(),
            flags: GlobFlags { dot: true, ..Default::default() },
            ..Default::default()
        }),
    )]
    #[case::match_with_candidates(
        &["globrx", "match", "*.js", "a.js", "b.md"],
        Commands::Match(MatchArgs {
            pattern: "*.js".into(),
            candidates: vec!["a.js".into(), "b.md".into()],
            ..Default::default()
        }),
    )]
    #[case::match_nocase(
        &["globrx", "match", "--nocase", "readme"],
        Commands::Match(MatchArgs {
            pattern: "readme".into(),
            flags: GlobFlags { nocase: true, ..Default::default() },
            ..Default::default()
        }),
    )]
    #[case::ast(
        &["globrx", "ast", "a@(b|c)"],
        Commands::Ast(AstArgs { pattern: "a@(b|c)".into(), ..Default::default() }),
    )]
    #[case::ast_noext(
        &["globrx", "ast", "--noext", "!(a)"],
        Commands::Ast(AstArgs {
            pattern: "!(a)".into(),
            flags: GlobFlags { noext: true, ..Default::default() },
        }),
    )]
    fn cli_parsing(#[case] argv: &[&str], #[case] expected: Commands) {
        let cli = Cli::parse_from(argv);
        assert_eq!(cli.command, expected);
    }

    #[test]
    fn flags_map_onto_options() {
        let flags = GlobFlags {
            dot: true,
            nocase: true,
            nocase_magic_only: false,
            noext: true,
        };
        assert_eq!(
            flags.to_options(),
            MatchOptions {
                dot: true,
                nocase: true,
                nocase_magic_only: false,
                noext: true,
            }
        );
    }
}
