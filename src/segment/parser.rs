//! Recursive descent over one segment string.
//!
//! A single routine drives both scanning modes: outside an extglob it
//! accumulates text and opens a child node at each `x(`; inside one it
//! additionally splits branches on `|` and closes on `)`. Backslash
//! escapes are kept in the accumulated text (unescaping happens later),
//! they only stop the next character from opening or closing anything.
//! Bracket expressions are tracked just far enough that an operator or
//! `)` inside `[...]` stays inert.

use crate::segment::ast::{ExtOp, NodeId, Part, SegmentAst};

/// Bracket-expression state shared by both scanning modes. A `]` directly
/// after `[^` or `[!` is a literal member, not the closer.
struct ClassTracker {
    inside: bool,
    start: usize,
    negated: bool,
}

impl ClassTracker {
    fn new() -> Self {
        ClassTracker {
            inside: false,
            start: 0,
            negated: false,
        }
    }

    /// Feed one character at cursor position `i` (already advanced past
    /// the character). Returns true while inside a bracket expression.
    fn step(&mut self, c: char, i: usize) -> bool {
        if self.inside {
            if i == self.start + 1 {
                if c == '^' || c == '!' {
                    self.negated = true;
                }
            } else if c == ']' && !(i == self.start + 2 && self.negated) {
                self.inside = false;
            }
            return true;
        }
        if c == '[' {
            self.inside = true;
            self.start = i;
            self.negated = false;
        }
        false
    }
}

/// Consume `chars` from `pos` into `node`, returning the cursor position
/// after the consumed region.
///
/// For a literal `node` this runs to the end of input. For an extglob
/// `node`, `pos` must sit on the opening `(` and the routine returns just
/// past the matching `)`; if the input ends first, the node is downgraded
/// to a literal holding its raw source from the operator character on.
pub(crate) fn parse_into(tree: &mut SegmentAst, node: NodeId, chars: &[char], pos: usize) -> usize {
    let mut escaping = false;
    let mut class = ClassTracker::new();

    if tree.node(node).op.is_none() {
        let mut i = pos;
        let mut acc = String::new();
        while i < chars.len() {
            let c = chars[i];
            i += 1;
            if escaping || c == '\\' {
                escaping = !escaping;
                acc.push(c);
                continue;
            }
            if class.step(c, i) || class.inside {
                acc.push(c);
                continue;
            }
            if !tree.options().noext {
                if let Some(op) = ExtOp::from_char(c) {
                    if chars.get(i) == Some(&'(') {
                        tree.push_text(node, std::mem::take(&mut acc));
                        let ext = tree.alloc(Some(op), Some(node));
                        i = parse_into(tree, ext, chars, i);
                        tree.push_node(node, ext);
                        continue;
                    }
                }
            }
            acc.push(c);
        }
        tree.push_text(node, acc);
        return i;
    }

    // extglob body: `pos` is the `(`, the operator sits one before it
    let mut i = pos + 1;
    let mut branch = tree.alloc(None, Some(node));
    let mut branches: Vec<NodeId> = Vec::new();
    let mut acc = String::new();
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        if escaping || c == '\\' {
            escaping = !escaping;
            acc.push(c);
            continue;
        }
        if class.step(c, i) || class.inside {
            acc.push(c);
            continue;
        }
        if let Some(op) = ExtOp::from_char(c) {
            if chars.get(i) == Some(&'(') {
                tree.push_text(branch, std::mem::take(&mut acc));
                let ext = tree.alloc(Some(op), Some(branch));
                tree.push_node(branch, ext);
                i = parse_into(tree, ext, chars, i);
                continue;
            }
        }
        if c == '|' {
            tree.push_text(branch, std::mem::take(&mut acc));
            branches.push(branch);
            branch = tree.alloc(None, Some(node));
            continue;
        }
        if c == ')' {
            if acc.is_empty() && branches.is_empty() {
                tree.node_mut(node).empty_ext = true;
            }
            tree.push_text(branch, acc);
            branches.push(branch);
            for finished in branches {
                tree.push_node(node, finished);
            }
            return i;
        }
        acc.push(c);
    }

    // ran out of input inside the extglob; it reads as plain text
    let text: String = chars[pos - 1..].iter().collect();
    let unterminated = tree.node_mut(node);
    unterminated.op = None;
    unterminated.has_magic = None;
    unterminated.parts = vec![Part::Text(text)];
    i
}
