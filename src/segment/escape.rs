//! Backslash escaping and unescaping of glob text.
//!
//! `unescape` undoes both escape spellings a glob can carry: a single
//! character wrapped in a one-element class (`[*]`) and a backslash escape
//! (`\*`). `escape` produces the backslash spelling.

/// Remove glob escapes from `text`.
///
/// First collapses `[c]` wrappers around single characters (a slash or
/// backslash inside the brackets is left alone, as is a `[` that is itself
/// escaped), then strips each backslash that precedes a non-slash
/// character. A trailing backslash survives.
pub fn unescape(text: &str) -> String {
    strip_backslashes(&strip_class_wrappers(text))
}

fn strip_class_wrappers(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if i == 0
            && chars[0] == '['
            && matches!(chars.get(1), Some(&c) if !matches!(c, '/' | '\\'))
            && chars.get(2) == Some(&']')
        {
            out.push(chars[1]);
            i += 3;
            continue;
        }
        if chars[i] != '\\'
            && chars.get(i + 1) == Some(&'[')
            && matches!(chars.get(i + 2), Some(&c) if !matches!(c, '/' | '\\'))
            && chars.get(i + 3) == Some(&']')
        {
            out.push(chars[i]);
            out.push(chars[i + 2]);
            i += 4;
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

fn strip_backslashes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '\\' && matches!(chars.get(i + 1), Some(c) if *c != '/') {
            out.push(chars[i + 1]);
            i += 2;
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// Backslash-escape every character that could read as glob syntax.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '?' | '*' | '(' | ')' | '[' | ']' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Whether `c` must be escaped to appear literally in regex source.
pub(crate) fn is_regexp_meta(c: char) -> bool {
    matches!(
        c,
        '-' | '[' | ']' | '{' | '}' | '(' | ')' | '*' | '+' | '?' | '.' | ',' | '\\' | '^' | '$'
            | '|' | '#'
    ) || c.is_ascii_whitespace()
}

/// Regex-escape `text` so it matches itself.
pub(crate) fn regexp_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if is_regexp_meta(c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
