//! Parse tree for a single path segment.
//!
//! The tree is arena-backed: nodes own their children through ids into the
//! arena, and point back at their parent the same way. State every node
//! needs to share (the option set, the negation worklist, the splice flag)
//! lives on [`SegmentAst`] itself rather than being threaded through each
//! node.
//!
//! Negated extglobs are the reason the tree exists at all. `!(X)` cannot be
//! lowered in isolation: whatever follows it in the same segment must be
//! visible inside the generated lookahead, so every negation records itself
//! in a worklist at parse time and [`SegmentAst::fill_negs`] later splices
//! the trailing context of each one into its branches.

use serde_json::Value;

use crate::options::MatchOptions;
use crate::segment::emit::Emitted;
use crate::segment::parser;

/// Extglob operator, the `x` of `x(a|b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtOp {
    /// `!(…)`: anything except the alternatives
    Not,
    /// `?(…)`: zero or one occurrence
    Optional,
    /// `+(…)`: one or more occurrences
    OneOrMore,
    /// `*(…)`: zero or more occurrences
    ZeroOrMore,
    /// `@(…)`: exactly one occurrence
    One,
}

impl ExtOp {
    pub(crate) fn from_char(c: char) -> Option<Self> {
        match c {
            '!' => Some(ExtOp::Not),
            '?' => Some(ExtOp::Optional),
            '+' => Some(ExtOp::OneOrMore),
            '*' => Some(ExtOp::ZeroOrMore),
            '@' => Some(ExtOp::One),
            _ => None,
        }
    }

    pub(crate) fn as_char(self) -> char {
        match self {
            ExtOp::Not => '!',
            ExtOp::Optional => '?',
            ExtOp::OneOrMore => '+',
            ExtOp::ZeroOrMore => '*',
            ExtOp::One => '@',
        }
    }
}

/// Index of a node in its owning [`SegmentAst`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeId(usize);

pub(crate) const ROOT: NodeId = NodeId(0);

/// One element of a node's body. Literal nodes hold text runs and child
/// extglobs in order; extglob nodes hold only child nodes, one per branch.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Part {
    Text(String),
    Node(NodeId),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Node {
    /// `None` for a literal node, the operator for an extglob.
    pub(crate) op: Option<ExtOp>,
    pub(crate) parent: Option<NodeId>,
    /// Slot this node occupies in its parent, frozen when the node is
    /// created. Splicing appends and never renumbers.
    pub(crate) parent_index: usize,
    pub(crate) parts: Vec<Part>,
    /// Unknown until lowering settles it. Extglob nodes are born magic.
    pub(crate) has_magic: Option<bool>,
    pub(crate) uflag: bool,
    /// The extglob was written with no branches and no content, `!()`.
    pub(crate) empty_ext: bool,
    cached_text: Option<String>,
}

/// The parsed form of one segment glob.
#[derive(Debug, Clone)]
pub struct SegmentAst {
    pub(crate) nodes: Vec<Node>,
    pub(crate) options: MatchOptions,
    /// Every `!(…)` node created during parsing, drained by the splice.
    pub(crate) negs: Vec<NodeId>,
    pub(crate) filled_negs: bool,
    pub(crate) cached_source: Option<Emitted>,
}

impl SegmentAst {
    /// Parse a single-segment glob. Parsing is total: malformed extglobs
    /// degrade to literal text instead of failing.
    pub fn parse(pattern: &str, options: MatchOptions) -> Self {
        let mut tree = SegmentAst {
            nodes: Vec::new(),
            options,
            negs: Vec::new(),
            filled_negs: false,
            cached_source: None,
        };
        let root = tree.alloc(None, None);
        let chars: Vec<char> = pattern.chars().collect();
        parser::parse_into(&mut tree, root, &chars, 0);
        tree
    }

    pub(crate) fn options(&self) -> MatchOptions {
        self.options
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Create a node. The parent slot is captured immediately; the caller
    /// pushes the node into `parent.parts` right after (or, for extglob
    /// branches, at branch close, when the slot is still correct because
    /// branches are only attached together).
    pub(crate) fn alloc(&mut self, op: Option<ExtOp>, parent: Option<NodeId>) -> NodeId {
        let parent_index = parent.map_or(0, |p| self.nodes[p.0].parts.len());
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            op,
            parent,
            parent_index,
            parts: Vec::new(),
            has_magic: if op.is_some() { Some(true) } else { None },
            uflag: false,
            empty_ext: false,
            cached_text: None,
        });
        if op == Some(ExtOp::Not) && !self.filled_negs {
            self.negs.push(id);
        }
        id
    }

    pub(crate) fn push_text(&mut self, id: NodeId, text: String) {
        if text.is_empty() {
            return;
        }
        self.nodes[id.0].parts.push(Part::Text(text));
    }

    pub(crate) fn push_node(&mut self, id: NodeId, child: NodeId) {
        debug_assert_eq!(self.nodes[child.0].parent, Some(id));
        self.nodes[id.0].parts.push(Part::Node(child));
    }

    /// Branch children of an extglob node.
    pub(crate) fn branches(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes[id.0]
            .parts
            .iter()
            .map(|part| match part {
                Part::Node(branch) => *branch,
                Part::Text(_) => unreachable!("text part in extglob node"),
            })
            .collect()
    }

    /// Deep-copy `part` onto the end of `dst`, reattaching parents.
    pub(crate) fn copy_in(&mut self, dst: NodeId, part: &Part) {
        match part {
            Part::Text(text) => self.push_text(dst, text.clone()),
            Part::Node(src) => {
                let copy = self.clone_node(*src, dst);
                self.push_node(dst, copy);
            }
        }
    }

    fn clone_node(&mut self, src: NodeId, parent: NodeId) -> NodeId {
        let op = self.nodes[src.0].op;
        let id = self.alloc(op, Some(parent));
        let parts = self.nodes[src.0].parts.clone();
        for part in &parts {
            self.copy_in(id, part);
        }
        id
    }

    /// Splice each negation's trailing context into its branches.
    ///
    /// For a negation `n`, walk up the ancestor chain. At every literal
    /// ancestor, every part sitting after the walk position is copied into
    /// each branch of `n`; extglob ancestors contribute nothing themselves
    /// but the walk keeps going above them. Runs once, and materializes
    /// the root's canonical text first so the reconstruction predates any
    /// mutation.
    pub(crate) fn fill_negs(&mut self) {
        if self.filled_negs {
            return;
        }
        self.node_text(ROOT);
        self.filled_negs = true;
        while let Some(n) = self.negs.pop() {
            // a downgraded `!(` is no longer a negation
            if self.nodes[n.0].op != Some(ExtOp::Not) {
                continue;
            }
            let mut walk = n;
            let mut ancestor = self.nodes[walk.0].parent;
            while let Some(pp) = ancestor {
                if self.nodes[pp.0].op.is_none() {
                    let mut i = self.nodes[walk.0].parent_index + 1;
                    while i < self.nodes[pp.0].parts.len() {
                        let sibling = self.nodes[pp.0].parts[i].clone();
                        for branch in self.branches(n) {
                            self.copy_in(branch, &sibling);
                        }
                        i += 1;
                    }
                }
                walk = pp;
                ancestor = self.nodes[walk.0].parent;
            }
        }
    }

    /// Reconstruct the glob text of one node. Memoized, so a reconstruction
    /// taken before the splice pass stays stable afterwards.
    pub(crate) fn node_text(&mut self, id: NodeId) -> String {
        if let Some(text) = &self.nodes[id.0].cached_text {
            return text.clone();
        }
        let parts = self.nodes[id.0].parts.clone();
        let rendered: Vec<String> = parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => text.clone(),
                Part::Node(child) => self.node_text(*child),
            })
            .collect();
        let text = match self.nodes[id.0].op {
            None => rendered.concat(),
            Some(op) => format!("{}({})", op.as_char(), rendered.join("|")),
        };
        self.nodes[id.0].cached_text = Some(text.clone());
        text
    }

    /// Canonical reconstruction of the whole pattern.
    pub fn to_glob_string(&mut self) -> String {
        self.node_text(ROOT)
    }

    /// Whether this node binds to the beginning of the segment. Negations
    /// ahead of a node do not consume the leading position, because their
    /// lookahead matches without advancing.
    pub(crate) fn is_start(&self, id: NodeId) -> bool {
        if id == ROOT {
            return true;
        }
        let node = &self.nodes[id.0];
        let parent = match node.parent {
            Some(parent) => parent,
            None => return true,
        };
        if !self.is_start(parent) {
            return false;
        }
        if node.parent_index == 0 {
            return true;
        }
        self.nodes[parent.0].parts[..node.parent_index]
            .iter()
            .all(|part| {
                matches!(part, Part::Node(c) if self.nodes[c.0].op == Some(ExtOp::Not))
            })
    }

    /// Whether this node binds to the end of the segment. Everything inside
    /// a negation counts as an end: its tail was spliced into the body, so
    /// the branch really does describe a full remainder.
    pub(crate) fn is_end(&self, id: NodeId) -> bool {
        if id == ROOT {
            return true;
        }
        let node = &self.nodes[id.0];
        let parent = match node.parent {
            Some(parent) => parent,
            None => return true,
        };
        if self.nodes[parent.0].op == Some(ExtOp::Not) {
            return true;
        }
        if !self.is_end(parent) {
            return false;
        }
        match node.op {
            None => true,
            Some(_) => node.parent_index == self.nodes[parent.0].parts.len() - 1,
        }
    }

    /// Tri-state magic for a node: `None` until lowering settles it, unless
    /// a descendant extglob already forces `true`.
    pub(crate) fn node_magic(&self, id: NodeId) -> Option<bool> {
        let node = &self.nodes[id.0];
        if node.has_magic.is_some() {
            return node.has_magic;
        }
        for part in &node.parts {
            if let Part::Node(child) = part {
                if self.nodes[child.0].op.is_some() || self.node_magic(*child) == Some(true) {
                    return Some(true);
                }
            }
        }
        None
    }

    /// Debug rendering of the tree. Literal nodes render as arrays of their
    /// parts, extglobs as `[op, branch…]`. A literal that binds the segment
    /// start gets a leading `[]` marker; a node that binds the end (the
    /// root, or a spliced negation branch) gets a trailing `{}` marker.
    pub fn to_json(&self) -> Value {
        self.node_json(ROOT)
    }

    fn node_json(&self, id: NodeId) -> Value {
        let node = &self.nodes[id.0];
        let mut items: Vec<Value> = match node.op {
            None => node
                .parts
                .iter()
                .map(|part| match part {
                    Part::Text(text) => Value::String(text.clone()),
                    Part::Node(child) => self.node_json(*child),
                })
                .collect(),
            Some(op) => {
                let mut items = vec![Value::String(op.as_char().to_string())];
                items.extend(node.parts.iter().map(|part| match part {
                    Part::Node(child) => self.node_json(*child),
                    Part::Text(_) => unreachable!("text part in extglob node"),
                }));
                items
            }
        };
        if node.op.is_none() && self.is_start(id) {
            items.insert(0, Value::Array(Vec::new()));
        }
        let inside_negation = node
            .parent
            .is_some_and(|p| self.nodes[p.0].op == Some(ExtOp::Not));
        if self.is_end(id) && (id == ROOT || (self.filled_negs && inside_negation)) {
            items.push(Value::Object(serde_json::Map::new()));
        }
        Value::Array(items)
    }
}
