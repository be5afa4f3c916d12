use crate::engines::generation::ast::ExpressionTree;
use crate::error::{GepError, Result};
use crate::functions::{symbols::can_link, SymbolTable};

/// Join per-gene trees under `linking_symbol`.
///
/// With `k` the linking arity, exactly `k` trees become the children of one new
/// root. More trees are folded: the first `k` are linked, then the running result
/// is linked with the next `k - 1`, and so on. The fold keeps gene order from
/// left to right, so a non-commutative linking function yields different trees
/// for different gene orders. A tree count the fold cannot consume exactly is
/// rejected rather than padded.
pub fn link(
    trees: Vec<ExpressionTree>,
    linking_symbol: char,
    symbols: &SymbolTable,
) -> Result<ExpressionTree> {
    let arity = symbols
        .function(linking_symbol)
        .map(|f| f.arity())
        .ok_or_else(|| {
            GepError::Configuration(format!(
                "linking function '{}' is not a defined function",
                linking_symbol
            ))
        })?;

    for tree in &trees {
        tree.validate(symbols)?;
    }

    if !can_link(trees.len(), arity) {
        return Err(GepError::LinkArity {
            symbol: linking_symbol,
            arity,
            trees: trees.len(),
        });
    }

    log::trace!(
        "linking {} trees with '{}' (arity {})",
        trees.len(),
        linking_symbol,
        arity
    );

    let mut remaining = trees.into_iter();
    let first: Vec<ExpressionTree> = remaining.by_ref().take(arity).collect();
    let mut linked = ExpressionTree::graft(linking_symbol, first);

    loop {
        let batch: Vec<ExpressionTree> = remaining.by_ref().take(arity - 1).collect();
        if batch.is_empty() {
            break;
        }
        let mut children = Vec::with_capacity(arity);
        children.push(linked);
        children.extend(batch);
        linked = ExpressionTree::graft(linking_symbol, children);
    }

    Ok(linked)
}
