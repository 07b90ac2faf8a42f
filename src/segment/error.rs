/// Compilation is total up to the final regex build: any pattern string
/// parses and lowers to some source. Only handing that source to the
/// regex engine can fail, and only for degenerate inputs such as an empty
/// positive extglob glued to other magic.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("regex compilation failed for glob {glob:?}: {source}")]
    Regex {
        glob: String,
        #[source]
        source: Box<fancy_regex::Error>,
    },
}
