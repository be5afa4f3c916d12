use crate::error::{GepError, Result};
use crate::functions::SymbolTable;
use serde::Serialize;
use std::fmt;

/// Index of a node inside its tree's arena
pub type NodeId = usize;

#[derive(Debug, Clone, Serialize)]
pub struct AstNode {
    pub symbol: char,
    pub children: Vec<NodeId>,
}

/// Expression tree stored as an arena of nodes addressed by index.
///
/// Traversal is strictly top-down, so nodes carry no parent links. Equality is
/// structural: two trees are equal when their symbols and shapes match, whatever
/// order their nodes were allocated in.
#[derive(Debug, Clone, Serialize)]
pub struct ExpressionTree {
    nodes: Vec<AstNode>,
    root: NodeId,
}

impl ExpressionTree {
    pub fn leaf(symbol: char) -> Self {
        Self {
            nodes: vec![AstNode {
                symbol,
                children: Vec::new(),
            }],
            root: 0,
        }
    }

    pub(crate) fn from_nodes(nodes: Vec<AstNode>, root: NodeId) -> Self {
        Self { nodes, root }
    }

    /// New tree with `symbol` at the root and `subtrees` as its children, in order
    pub fn graft(symbol: char, subtrees: Vec<ExpressionTree>) -> Self {
        let capacity = 1 + subtrees.iter().map(|t| t.nodes.len()).sum::<usize>();
        let mut nodes = Vec::with_capacity(capacity);
        nodes.push(AstNode {
            symbol,
            children: Vec::with_capacity(subtrees.len()),
        });

        for subtree in subtrees {
            let offset = nodes.len();
            nodes[0].children.push(subtree.root + offset);
            nodes.extend(subtree.nodes.into_iter().map(|node| AstNode {
                symbol: node.symbol,
                children: node.children.into_iter().map(|c| c + offset).collect(),
            }));
        }

        Self { nodes, root: 0 }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_symbol(&self) -> char {
        self.nodes[self.root].symbol
    }

    pub fn node(&self, id: NodeId) -> &AstNode {
        &self.nodes[id]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id].children
    }

    /// Copy of the subtree rooted at `id`
    pub fn subtree(&self, id: NodeId) -> ExpressionTree {
        let mut nodes = Vec::new();
        self.copy_into(id, &mut nodes);
        Self { nodes, root: 0 }
    }

    fn copy_into(&self, id: NodeId, nodes: &mut Vec<AstNode>) -> NodeId {
        let index = nodes.len();
        nodes.push(AstNode {
            symbol: self.nodes[id].symbol,
            children: Vec::new(),
        });
        let children: Vec<NodeId> = self.nodes[id]
            .children
            .iter()
            .map(|&child| self.copy_into(child, nodes))
            .collect();
        nodes[index].children = children;
        index
    }

    /// Number of nodes attached to the tree
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> usize {
        self.depth_from(self.root)
    }

    fn depth_from(&self, id: NodeId) -> usize {
        1 + self.nodes[id]
            .children
            .iter()
            .map(|&c| self.depth_from(c))
            .max()
            .unwrap_or(0)
    }

    /// Leaf symbols, left to right
    pub fn leaves(&self) -> Vec<char> {
        let mut leaves = Vec::new();
        self.collect_leaves(self.root, &mut leaves);
        leaves
    }

    fn collect_leaves(&self, id: NodeId, leaves: &mut Vec<char>) {
        let node = &self.nodes[id];
        if node.children.is_empty() {
            leaves.push(node.symbol);
        }
        for &child in &node.children {
            self.collect_leaves(child, leaves);
        }
    }

    /// Check that every node is known to `symbols` and has as many children as its arity
    pub fn validate(&self, symbols: &SymbolTable) -> Result<()> {
        if self.root >= self.nodes.len() {
            return Err(GepError::InvalidTree(format!(
                "root {} outside an arena of {} nodes",
                self.root,
                self.nodes.len()
            )));
        }

        let mut seen = vec![false; self.nodes.len()];
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if id >= self.nodes.len() || seen[id] {
                return Err(GepError::InvalidTree(format!(
                    "node {} is out of bounds or shared",
                    id
                )));
            }
            seen[id] = true;

            let node = &self.nodes[id];
            if !symbols.is_known(node.symbol) {
                return Err(GepError::InvalidTree(format!("unknown symbol '{}'", node.symbol)));
            }
            let arity = symbols.arity(node.symbol);
            if node.children.len() != arity {
                return Err(GepError::InvalidTree(format!(
                    "'{}' has {} children but arity {}",
                    node.symbol,
                    node.children.len(),
                    arity
                )));
            }
            stack.extend(node.children.iter().rev());
        }
        Ok(())
    }

    /// Infix rendering: binary nodes as `(l S r)`, others as `S(args)`
    pub fn to_formula(&self) -> String {
        let mut out = String::new();
        self.write_formula(self.root, &mut out);
        out
    }

    fn write_formula(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id];
        match node.children.as_slice() {
            [] => out.push(node.symbol),
            [left, right] => {
                out.push('(');
                self.write_formula(*left, out);
                out.push(node.symbol);
                self.write_formula(*right, out);
                out.push(')');
            }
            children => {
                out.push(node.symbol);
                out.push('(');
                for (i, &child) in children.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.write_formula(child, out);
                }
                out.push(')');
            }
        }
    }

    /// Indented drawing, one node per line
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push(self.root_symbol());
        out.push('\n');
        self.render_children(self.root, "", &mut out);
        out
    }

    fn render_children(&self, id: NodeId, prefix: &str, out: &mut String) {
        let children = &self.nodes[id].children;
        for (i, &child) in children.iter().enumerate() {
            let last = i + 1 == children.len();
            out.push_str(prefix);
            out.push_str(if last { "└── " } else { "├── " });
            out.push(self.nodes[child].symbol);
            out.push('\n');
            let nested = format!("{}{}", prefix, if last { "    " } else { "│   " });
            self.render_children(child, &nested, out);
        }
    }

    fn same_shape(&self, id: NodeId, other: &ExpressionTree, other_id: NodeId) -> bool {
        let (a, b) = (&self.nodes[id], &other.nodes[other_id]);
        a.symbol == b.symbol
            && a.children.len() == b.children.len()
            && a.children
                .iter()
                .zip(&b.children)
                .all(|(&x, &y)| self.same_shape(x, other, y))
    }
}

impl PartialEq for ExpressionTree {
    fn eq(&self, other: &Self) -> bool {
        self.same_shape(self.root, other, other.root)
    }
}

impl fmt::Display for ExpressionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_formula())
    }
}
