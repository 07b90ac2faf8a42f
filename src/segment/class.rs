//! Bracket-expression parsing.
//!
//! One `[...]` expression is translated to regex source on its own: POSIX
//! named classes become Unicode property escapes, ranges are validated,
//! and `^`/`!` negation is honored. The caller treats `consumed == 0` as
//! "not a class after all" and keeps the `[` literal.

use crate::segment::escape::regexp_escape;

/// POSIX named classes with their translations. The flag pair is
/// (needs unicode-aware matching, translation is itself negated).
const POSIX_CLASSES: &[(&str, &str, bool, bool)] = &[
    ("[:alnum:]", r"\p{L}\p{Nl}\p{Nd}", true, false),
    ("[:alpha:]", r"\p{L}\p{Nl}", true, false),
    ("[:ascii:]", r"\x00-\x7f", false, false),
    ("[:blank:]", r"\p{Zs}\t", true, false),
    ("[:cntrl:]", r"\p{Cc}", true, false),
    ("[:digit:]", "0-9", false, false),
    ("[:graph:]", r"\p{Z}\p{C}", true, true),
    ("[:lower:]", r"\p{Ll}", true, false),
    ("[:print:]", r"\p{C}", true, false),
    ("[:punct:]", r"\p{P}", true, false),
    ("[:space:]", r"\p{Z}\t\r\n\v\f", true, false),
    ("[:upper:]", r"\p{Lu}", true, false),
    ("[:word:]", r"\p{L}\p{Nl}\p{Nd}\p{Pc}", true, false),
    ("[:xdigit:]", "A-Fa-f0-9", false, false),
];

/// A source that can never match. Poisons classes that are empty or
/// structurally invalid in a way that should not fall back to literal text.
const UNMATCHABLE: &str = "$.";

/// Outcome of parsing one bracket expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassPattern {
    /// Regex source for the class.
    pub source: String,
    /// Whether the source relies on Unicode property escapes.
    pub uflag: bool,
    /// Characters consumed from the input. Zero means the `[` never closed
    /// into a valid class and should be treated as a literal bracket.
    pub consumed: usize,
    /// Whether the class actually narrows matching. A one-character class
    /// like `[a]` is just that character.
    pub magic: bool,
}

impl ClassPattern {
    fn not_a_class() -> Self {
        ClassPattern {
            source: String::new(),
            uflag: false,
            consumed: 0,
            magic: false,
        }
    }

    fn poisoned(consumed: usize) -> Self {
        ClassPattern {
            source: UNMATCHABLE.into(),
            uflag: false,
            consumed,
            magic: true,
        }
    }
}

/// Escape a character for use inside a regex character class.
fn class_escape(c: char) -> String {
    if matches!(c, '[' | ']' | '\\' | '-') {
        format!("\\{c}")
    } else {
        c.to_string()
    }
}

fn starts_with_at(chars: &[char], at: usize, needle: &str) -> bool {
    let mut i = at;
    for nc in needle.chars() {
        if chars.get(i) != Some(&nc) {
            return false;
        }
        i += 1;
    }
    true
}

/// Parse the bracket expression opening at `chars[position]` (which must
/// be `[`).
pub fn parse_class(chars: &[char], position: usize) -> ClassPattern {
    debug_assert_eq!(chars.get(position), Some(&'['));

    let mut ranges: Vec<String> = Vec::new();
    let mut negs: Vec<String> = Vec::new();

    let mut i = position + 1;
    let mut saw_start = false;
    let mut uflag = false;
    let mut escaping = false;
    let mut negate = false;
    let mut end = position;
    let mut range_start: Option<char> = None;

    'scan: while i < chars.len() {
        let c = chars[i];
        if (c == '!' || c == '^') && i == position + 1 {
            negate = true;
            i += 1;
            continue;
        }

        if c == ']' && saw_start && !escaping {
            end = i + 1;
            break;
        }

        saw_start = true;
        if c == '\\' && !escaping {
            escaping = true;
            i += 1;
            continue;
        }
        if c == '[' && !escaping {
            for &(name, translation, needs_uflag, negated) in POSIX_CLASSES {
                if starts_with_at(chars, i, name) {
                    // a named class cannot serve as a range endpoint
                    if range_start.is_some() {
                        return ClassPattern::poisoned(chars.len() - position);
                    }
                    i += name.chars().count();
                    if negated {
                        negs.push(translation.into());
                    } else {
                        ranges.push(translation.into());
                    }
                    uflag = uflag || needs_uflag;
                    continue 'scan;
                }
            }
        }

        // from here `c` is an ordinary member character
        escaping = false;
        if let Some(low) = range_start.take() {
            // an inverted range can never match and is dropped outright
            if c > low {
                ranges.push(format!("{}-{}", class_escape(low), class_escape(c)));
            } else if c == low {
                ranges.push(class_escape(c));
            }
            i += 1;
            continue;
        }

        // `c-]` keeps the dash literal; `c-x` opens a range
        if chars.get(i + 1) == Some(&'-') && chars.get(i + 2) == Some(&']') {
            ranges.push(format!("{}-", class_escape(c)));
            i += 2;
            continue;
        }
        if chars.get(i + 1) == Some(&'-') {
            range_start = Some(c);
            i += 2;
            continue;
        }

        ranges.push(class_escape(c));
        i += 1;
    }

    if end < i {
        // never saw the closing bracket
        return ClassPattern::not_a_class();
    }

    if ranges.is_empty() && negs.is_empty() {
        return ClassPattern::poisoned(chars.len() - position);
    }

    // one plain character and no negation is just that literal character
    if negs.is_empty() && ranges.len() == 1 && !negate {
        let only = &ranges[0];
        let char_count = only.chars().count();
        let plain = char_count == 1;
        let escaped = char_count == 2 && only.starts_with('\\');
        if plain || escaped {
            let literal: String = only.chars().last().map(String::from).unwrap_or_default();
            return ClassPattern {
                source: regexp_escape(&literal),
                uflag: false,
                consumed: end - position,
                magic: false,
            };
        }
    }

    let positive = format!("[{}{}]", if negate { "^" } else { "" }, ranges.concat());
    let negative = format!("[{}{}]", if negate { "" } else { "^" }, negs.concat());
    let source = if !ranges.is_empty() && !negs.is_empty() {
        format!("(?:{positive}|{negative})")
    } else if !ranges.is_empty() {
        positive
    } else {
        negative
    };

    ClassPattern {
        source,
        uflag,
        consumed: end - position,
        magic: true,
    }
}
