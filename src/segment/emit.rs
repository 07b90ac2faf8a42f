//! Lowering from the parse tree to regex source.
//!
//! Literal nodes concatenate their compiled fragments and decide on the
//! segment-start guards. Extglob nodes wrap their branch alternation in
//! the operator's quantifier; a negation becomes a lookahead over its
//! branches (which already carry their spliced tails) followed by a star
//! that consumes the real text.

use crate::segment::ast::{ExtOp, NodeId, Part, SegmentAst, ROOT};
use crate::segment::class::parse_class;
use crate::segment::escape::{is_regexp_meta, unescape};

/// Any single character other than the separator.
pub(crate) const QMARK: &str = "[^/]";
/// Any run of non-separator characters, possibly empty.
pub(crate) const STAR: &str = "[^/]*?";
/// Like [`STAR`] but at least one character long.
pub(crate) const STAR_NO_EMPTY: &str = "[^/]+?";
/// Refuse to match `.` or `..` as the leading portion.
pub(crate) const START_NO_TRAVERSAL: &str = r"(?!(?:^|/)\.\.?(?:$|/))";
/// Refuse to match a leading dot.
pub(crate) const START_NO_DOT: &str = r"(?!\.)";
/// Bound a negation tail at the end of the segment.
const END_OF_SEGMENT: &str = r"(?:$|\/)";

/// Result of lowering one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted {
    /// Regex source for the subtree.
    pub re: String,
    /// Unescaped rendition of the emitted body, without guards or anchors.
    pub body: String,
    /// Whether matching needs a regex at all.
    pub has_magic: bool,
    /// Whether the source leans on Unicode property escapes.
    pub uflag: bool,
}

/// Whether the source starting at byte `at` could match a dot: it begins
/// with a literal dot or a character class.
fn may_match_dot(src: &str, at: usize) -> bool {
    matches!(src.as_bytes().get(at), Some(b'[') | Some(b'.'))
}

impl SegmentAst {
    /// Lower the whole tree. The first call splices negation tails and
    /// memoizes the result; the tree is effectively frozen afterwards.
    pub fn to_regex_source(&mut self) -> Emitted {
        if let Some(cached) = &self.cached_source {
            return cached.clone();
        }
        let emitted = self.emit(ROOT, None);
        self.cached_source = Some(emitted.clone());
        emitted
    }

    /// Lower one node. `allow_dot` overrides the option-level dot policy
    /// for subtrees re-emitted in dot-permissive mode.
    pub(crate) fn emit(&mut self, id: NodeId, allow_dot: Option<bool>) -> Emitted {
        let dot = allow_dot.unwrap_or(self.options().dot);
        if id == ROOT {
            self.fill_negs();
        }
        match self.node(id).op {
            None => self.emit_literal(id, allow_dot, dot),
            Some(op) => self.emit_extglob(id, op, allow_dot, dot),
        }
    }

    fn emit_literal(&mut self, id: NodeId, allow_dot: Option<bool>, dot: bool) -> Emitted {
        let no_empty =
            self.is_start(id) && self.is_end(id) && self.node(id).parts.len() == 1;
        let parts = self.node(id).parts.clone();
        let mut src = String::new();
        for part in &parts {
            match part {
                Part::Text(text) => {
                    let seen_magic = self.node(id).has_magic.unwrap_or(false);
                    let (re, _, has_magic, uflag) = parse_glob(text, seen_magic, no_empty);
                    self.node_mut(id).has_magic = Some(has_magic);
                    self.node_mut(id).uflag |= uflag;
                    src.push_str(&re);
                }
                Part::Node(child) => {
                    let emitted = self.emit(*child, allow_dot);
                    let node = self.node_mut(id);
                    node.has_magic = Some(node.has_magic.unwrap_or(false) || emitted.has_magic);
                    node.uflag |= emitted.uflag;
                    src.push_str(&emitted.re);
                }
            }
        }

        let mut start = "";
        if self.is_start(id) {
            if let Some(Part::Text(first)) = self.node(id).parts.first() {
                // `.` and `..` can only ever match themselves; guarding
                // them away would make the pattern useless
                let bare_dots =
                    self.node(id).parts.len() == 1 && (first == "." || first == "..");
                if !bare_dots {
                    let needs_traversal_guard = (dot && may_match_dot(&src, 0))
                        || (src.starts_with("\\.") && may_match_dot(&src, 2))
                        || (src.starts_with("\\.\\.") && may_match_dot(&src, 4));
                    let needs_dot_guard =
                        !dot && !allow_dot.unwrap_or(false) && may_match_dot(&src, 0);
                    if needs_traversal_guard {
                        start = START_NO_TRAVERSAL;
                    } else if needs_dot_guard {
                        start = START_NO_DOT;
                    }
                }
            }
        }

        // a negation body must stop matching at the segment boundary
        let inside_negation = self.node(id).parent.is_some_and(|p| {
            self.node(p).op == Some(ExtOp::Not)
        });
        let end = if self.is_end(id) && self.filled_negs && inside_negation {
            END_OF_SEGMENT
        } else {
            ""
        };

        let has_magic = self.node(id).has_magic.unwrap_or(false);
        self.node_mut(id).has_magic = Some(has_magic);
        Emitted {
            re: format!("{start}{src}{end}"),
            body: unescape(&src),
            has_magic,
            uflag: self.node(id).uflag,
        }
    }

    fn emit_extglob(&mut self, id: NodeId, op: ExtOp, allow_dot: Option<bool>, dot: bool) -> Emitted {
        let repeated = matches!(op, ExtOp::ZeroOrMore | ExtOp::OneOrMore);
        let open = if op == ExtOp::Not { "(?:(?!(?:" } else { "(?:" };
        let mut body = self.branch_sources(id, dot);

        if self.is_start(id) && self.is_end(id) && body.is_empty() && op != ExtOp::Not {
            // an empty positive extglob spanning the whole segment can
            // only be meant literally; materialize the text first, then
            // demote the node
            let text = self.node_text(id);
            let node = self.node_mut(id);
            node.parts = vec![Part::Text(text.clone())];
            node.op = None;
            node.has_magic = None;
            return Emitted {
                re: text.clone(),
                body: unescape(&text),
                has_magic: false,
                uflag: false,
            };
        }

        // a leading repetition with dots disallowed gets its body twice:
        // the first pass may not match a dot, later repetitions may, so
        // `*(?)` can still match `x.y`
        let mut dotted_body = if !repeated || allow_dot.unwrap_or(false) || dot {
            String::new()
        } else {
            self.branch_sources(id, true)
        };
        if dotted_body == body {
            dotted_body.clear();
        }
        if !dotted_body.is_empty() {
            body = format!("(?:{body})(?:{dotted_body})*?");
        }

        if op == ExtOp::Not && self.node(id).empty_ext {
            // `!()` just means "something, and not nothing"
            let guard = if self.is_start(id) && !dot { START_NO_DOT } else { "" };
            return Emitted {
                re: format!("{guard}{STAR_NO_EMPTY}"),
                body: unescape(&body),
                has_magic: true,
                uflag: self.node(id).uflag,
            };
        }

        let close = match op {
            ExtOp::Not => {
                let guard = if self.is_start(id) && !dot && !allow_dot.unwrap_or(false) {
                    START_NO_DOT
                } else {
                    ""
                };
                format!(")){guard}{STAR})")
            }
            ExtOp::One => ")".into(),
            ExtOp::Optional => ")?".into(),
            ExtOp::OneOrMore if !dotted_body.is_empty() => ")".into(),
            ExtOp::ZeroOrMore if !dotted_body.is_empty() => ")?".into(),
            ExtOp::OneOrMore => ")+".into(),
            ExtOp::ZeroOrMore => ")*".into(),
        };
        Emitted {
            re: format!("{open}{body}{close}"),
            body: unescape(&body),
            has_magic: self.node(id).has_magic.unwrap_or(false),
            uflag: self.node(id).uflag,
        }
    }

    /// Emit every branch and join with `|`. When the extglob spans the
    /// whole segment, branches that emitted nothing are dropped so the
    /// alternation cannot silently match the empty segment.
    fn branch_sources(&mut self, id: NodeId, dot: bool) -> String {
        let whole = self.is_start(id) && self.is_end(id);
        let mut pieces = Vec::new();
        for branch in self.branches(id) {
            let emitted = self.emit(branch, Some(dot));
            self.node_mut(id).uflag |= emitted.uflag;
            if whole && emitted.re.is_empty() {
                continue;
            }
            pieces.push(emitted.re);
        }
        pieces.join("|")
    }
}

/// Compile one literal text fragment to regex source.
///
/// Returns `(re, unescaped, has_magic, uflag)`. `seen_magic` carries the
/// owning node's magic state in, so the result accumulates rather than
/// resets; `no_empty` upgrades a bare `*` to the non-empty star.
pub(crate) fn parse_glob(
    glob: &str,
    seen_magic: bool,
    no_empty: bool,
) -> (String, String, bool, bool) {
    let chars: Vec<char> = glob.chars().collect();
    let mut re = String::new();
    let mut has_magic = seen_magic;
    let mut uflag = false;
    let mut escaping = false;
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if escaping {
            escaping = false;
            if is_regexp_meta(c) {
                re.push('\\');
            }
            re.push(c);
            i += 1;
            continue;
        }
        match c {
            '\\' => {
                if i == chars.len() - 1 {
                    re.push_str(r"\\");
                } else {
                    escaping = true;
                }
                i += 1;
            }
            '[' => {
                let class = parse_class(&chars, i);
                if class.consumed > 0 {
                    re.push_str(&class.source);
                    uflag |= class.uflag;
                    has_magic |= class.magic;
                    i += class.consumed;
                } else {
                    // not a class after all; the bracket is literal
                    re.push_str(r"\[");
                    i += 1;
                }
            }
            '*' => {
                re.push_str(if no_empty && glob == "*" { STAR_NO_EMPTY } else { STAR });
                has_magic = true;
                i += 1;
            }
            '?' => {
                re.push_str(QMARK);
                has_magic = true;
                i += 1;
            }
            _ => {
                if is_regexp_meta(c) {
                    re.push('\\');
                }
                re.push(c);
                i += 1;
            }
        }
    }
    (re, unescape(glob), has_magic, uflag)
}
