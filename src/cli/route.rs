use std::io::{Read, Write};

use crate::segment::{CompiledPattern, SegmentAst};

use super::{AstArgs, CompileArgs, MatchArgs};

/// `globrx compile`: print what the pattern compiles to.
pub fn run_compile(args: &CompileArgs, out: &mut impl Write) -> Result<(), anyhow::Error> {
    let mut tree = SegmentAst::parse(&args.pattern, args.flags.to_options());
    let compiled = tree.compile()?;
    if args.json {
        let value = match &compiled {
            CompiledPattern::Literal(text) => serde_json::json!({ "literal": text }),
            CompiledPattern::Regex(regex) => serde_json::json!({
                "glob": regex.glob,
                "source": regex.source,
                "unicode": regex.unicode,
            }),
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        return Ok(());
    }
    match &compiled {
        CompiledPattern::Literal(text) => writeln!(out, "{text}")?,
        CompiledPattern::Regex(regex) => writeln!(out, "^{}$", regex.source)?,
    }
    Ok(())
}

/// `globrx match`: print matching candidates, taken from the command line
/// or from stdin (one per line). Returns whether anything matched.
pub fn run_match(
    args: &MatchArgs,
    mut stdin: impl Read,
    out: &mut impl Write,
) -> Result<bool, anyhow::Error> {
    let mut tree = SegmentAst::parse(&args.pattern, args.flags.to_options());
    let compiled = tree.compile()?;

    let candidates: Vec<String> = if args.candidates.is_empty() {
        let mut buffer = String::new();
        stdin.read_to_string(&mut buffer)?;
        buffer.lines().map(str::to_owned).collect()
    } else {
        args.candidates.clone()
    };

    let mut matched = false;
    for candidate in &candidates {
        if compiled.is_match(candidate) {
            writeln!(out, "{candidate}")?;
            matched = true;
        }
    }
    Ok(matched)
}

/// `globrx ast`: dump the parse tree as JSON. The splice pass runs first
/// so the printed tree is the one compilation actually lowers.
pub fn run_ast(args: &AstArgs, out: &mut impl Write) -> Result<(), anyhow::Error> {
    let mut tree = SegmentAst::parse(&args.pattern, args.flags.to_options());
    tree.fill_negs();
    writeln!(out, "{}", serde_json::to_string_pretty(&tree.to_json())?)?;
    Ok(())
}
