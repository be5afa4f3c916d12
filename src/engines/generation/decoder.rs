use crate::engines::generation::{
    ast::{AstNode, ExpressionTree, NodeId},
    gene_consumer::GeneConsumer,
};
use crate::error::{GepError, Result};
use crate::functions::SymbolTable;
use std::ops::Range;

/// Turns linear genes into expression trees.
///
/// A gene is read level by level: level 0 is the first symbol, and each following
/// level holds as many symbols as the arities of the previous level add up to.
/// Reading stops at a level made only of terminals. Every symbol of level k+1 is
/// then handed out, left to right, as a child of the level-k nodes. Whatever
/// follows the last level is non-coding and never reaches the tree.
pub struct GeneDecoder<'a> {
    symbols: &'a SymbolTable,
}

impl<'a> GeneDecoder<'a> {
    pub fn new(symbols: &'a SymbolTable) -> Self {
        Self { symbols }
    }

    /// Positions of each level inside the gene.
    ///
    /// Each level is at least one symbol long and they never overlap, so there are
    /// at most `gene.len()` of them. The last one is shorter than its parents need
    /// only when the gene runs out.
    pub fn levels(&self, gene: &[char]) -> Vec<Range<usize>> {
        let mut consumer = GeneConsumer::new(gene);
        let mut levels = Vec::new();
        let mut wanted = 1;

        while wanted > 0 && consumer.has_symbols() {
            let level = consumer.consume(wanted);
            wanted = consumer
                .symbols(level.clone())
                .iter()
                .map(|&s| self.symbols.arity(s))
                .sum();
            levels.push(level);
        }

        levels
    }

    pub fn decode(&self, gene: &str) -> Result<ExpressionTree> {
        let symbols: Vec<char> = gene.chars().collect();
        if symbols.is_empty() {
            return Err(GepError::InvalidGene("empty gene".to_string()));
        }

        let levels = self.levels(&symbols);
        let mut nodes: Vec<AstNode> = Vec::with_capacity(levels.last().map_or(0, |l| l.end));
        let mut parents: Vec<NodeId> = vec![self.push_node(&mut nodes, symbols[0], gene)?];

        for level in levels.iter().skip(1) {
            let mut next = level.start;
            let mut current = Vec::with_capacity(level.len());

            for parent in parents {
                for _ in 0..self.symbols.arity(nodes[parent].symbol) {
                    if next >= level.end {
                        return Err(truncated(gene));
                    }
                    let child = self.push_node(&mut nodes, symbols[next], gene)?;
                    nodes[parent].children.push(child);
                    current.push(child);
                    next += 1;
                }
            }
            parents = current;
        }

        // the last level must be all terminals, otherwise the gene ran out early
        if parents
            .iter()
            .any(|&id| self.symbols.arity(nodes[id].symbol) > 0)
        {
            return Err(truncated(gene));
        }

        log::trace!(
            "decoded '{}' into {} levels, {} coding symbols",
            gene,
            levels.len(),
            nodes.len()
        );
        Ok(ExpressionTree::from_nodes(nodes, 0))
    }

    fn push_node(&self, nodes: &mut Vec<AstNode>, symbol: char, gene: &str) -> Result<NodeId> {
        if !self.symbols.is_known(symbol) {
            return Err(GepError::InvalidGene(format!(
                "'{}' contains unknown symbol '{}'",
                gene, symbol
            )));
        }
        nodes.push(AstNode {
            symbol,
            children: Vec::new(),
        });
        Ok(nodes.len() - 1)
    }
}

/// Decode one gene against `symbols`
pub fn decode(gene: &str, symbols: &SymbolTable) -> Result<ExpressionTree> {
    GeneDecoder::new(symbols).decode(gene)
}

fn truncated(gene: &str) -> GepError {
    GepError::InvalidGene(format!("'{}' ends before its expression is complete", gene))
}
