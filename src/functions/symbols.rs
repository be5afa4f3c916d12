use crate::error::{GepError, Result};
use crate::functions::traits::Primitive;
use crate::types::EPHEMERAL_CONSTANT;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Immutable registry of gene symbols and the structural parameters of a run.
///
/// Built once through [`SymbolTableBuilder`] and shared by `Arc` with every
/// chromosome, so all chromosomes of a run agree on arities, constants and gene shape.
pub struct SymbolTable {
    functions: HashMap<char, Arc<dyn Primitive>>,
    terminals: Vec<char>,
    constants: HashMap<char, f64>,
    ephemeral_range: Option<(f64, f64)>,
    linking_function: Option<char>,
    num_genes: usize,
    head_length: usize,
    length: usize,
}

impl SymbolTable {
    pub fn builder() -> SymbolTableBuilder {
        SymbolTableBuilder::default()
    }

    /// Arity of a symbol; terminals and unknown symbols count as 0
    pub fn arity(&self, symbol: char) -> usize {
        self.functions.get(&symbol).map_or(0, |f| f.arity())
    }

    pub fn function(&self, symbol: char) -> Option<&Arc<dyn Primitive>> {
        self.functions.get(&symbol)
    }

    pub fn is_function(&self, symbol: char) -> bool {
        self.functions.contains_key(&symbol)
    }

    pub fn is_terminal(&self, symbol: char) -> bool {
        self.terminals.contains(&symbol)
    }

    pub fn is_known(&self, symbol: char) -> bool {
        self.is_function(symbol) || self.is_terminal(symbol)
    }

    pub fn constant(&self, symbol: char) -> Option<f64> {
        self.constants.get(&symbol).copied()
    }

    pub fn terminals(&self) -> &[char] {
        &self.terminals
    }

    /// Function symbols in a stable order
    pub fn function_symbols(&self) -> Vec<char> {
        let mut symbols: Vec<char> = self.functions.keys().copied().collect();
        symbols.sort_unstable();
        symbols
    }

    pub fn ephemeral_range(&self) -> Option<(f64, f64)> {
        self.ephemeral_range
    }

    pub fn uses_ephemeral_constants(&self) -> bool {
        self.is_terminal(EPHEMERAL_CONSTANT)
    }

    pub fn linking_function(&self) -> Option<char> {
        self.linking_function
    }

    pub fn num_genes(&self) -> usize {
        self.num_genes
    }

    pub fn head_length(&self) -> usize {
        self.head_length
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn tail_length(&self) -> usize {
        self.length - self.head_length
    }

    /// Ephemeral constants a chromosome carries: one per gene position across all genes
    pub fn ephemeral_slots(&self) -> usize {
        self.length * self.num_genes
    }

    pub fn max_arity(&self) -> usize {
        self.functions.values().map(|f| f.arity()).max().unwrap_or(0)
    }

    /// Check a gene against the configured length, alphabet and head/tail split
    pub fn validate_gene(&self, gene: &str) -> Result<()> {
        let symbols: Vec<char> = gene.chars().collect();
        if symbols.len() != self.length {
            return Err(GepError::InvalidGene(format!(
                "'{}' has {} symbols, expected {}",
                gene,
                symbols.len(),
                self.length
            )));
        }
        for (position, &symbol) in symbols.iter().enumerate() {
            if !self.is_known(symbol) {
                return Err(GepError::InvalidGene(format!(
                    "'{}' contains unknown symbol '{}' at {}",
                    gene, symbol, position
                )));
            }
            if position >= self.head_length && self.is_function(symbol) {
                return Err(GepError::InvalidGene(format!(
                    "'{}' has function '{}' in its tail at {}",
                    gene, symbol, position
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let functions: Vec<(char, &'static str, usize)> = self
            .function_symbols()
            .into_iter()
            .filter_map(|s| self.functions.get(&s).map(|p| (s, p.alias(), p.arity())))
            .collect();
        f.debug_struct("SymbolTable")
            .field("functions", &functions)
            .field("terminals", &self.terminals)
            .field("constants", &self.constants)
            .field("ephemeral_range", &self.ephemeral_range)
            .field("linking_function", &self.linking_function)
            .field("num_genes", &self.num_genes)
            .field("head_length", &self.head_length)
            .field("length", &self.length)
            .finish()
    }
}

#[derive(Default)]
pub struct SymbolTableBuilder {
    functions: HashMap<char, Arc<dyn Primitive>>,
    terminals: Vec<char>,
    constants: HashMap<char, f64>,
    ephemeral_range: Option<(f64, f64)>,
    linking_function: Option<char>,
    num_genes: Option<usize>,
    head_length: Option<usize>,
    length: Option<usize>,
}

impl SymbolTableBuilder {
    pub fn function(mut self, symbol: char, primitive: Arc<dyn Primitive>) -> Self {
        self.functions.insert(symbol, primitive);
        self
    }

    pub fn terminal(mut self, symbol: char) -> Self {
        self.terminals.push(symbol);
        self
    }

    /// Add every character of `symbols` as a terminal
    pub fn terminals(mut self, symbols: &str) -> Self {
        self.terminals.extend(symbols.chars());
        self
    }

    /// Register a fixed constant; the symbol is added as a terminal if missing
    pub fn constant(mut self, symbol: char, value: f64) -> Self {
        if !self.terminals.contains(&symbol) {
            self.terminals.push(symbol);
        }
        self.constants.insert(symbol, value);
        self
    }

    pub fn ephemeral_range(mut self, min: f64, max: f64) -> Self {
        self.ephemeral_range = Some((min, max));
        self
    }

    pub fn linking_function(mut self, symbol: char) -> Self {
        self.linking_function = Some(symbol);
        self
    }

    pub fn num_genes(mut self, num_genes: usize) -> Self {
        self.num_genes = Some(num_genes);
        self
    }

    pub fn head_length(mut self, head_length: usize) -> Self {
        self.head_length = Some(head_length);
        self
    }

    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    pub fn build(self) -> Result<Arc<SymbolTable>> {
        if self.functions.is_empty() {
            return Err(config_error("symbol table has no functions"));
        }
        if self.terminals.is_empty() {
            return Err(config_error("symbol table has no terminals"));
        }
        let length = self.length.ok_or_else(|| config_error("gene length is not defined"))?;
        let head_length = self
            .head_length
            .ok_or_else(|| config_error("head length is not defined"))?;
        let num_genes = self
            .num_genes
            .ok_or_else(|| config_error("number of genes is not defined"))?;

        if num_genes == 0 {
            return Err(config_error("number of genes must be at least 1"));
        }
        if head_length == 0 || head_length > length {
            return Err(config_error(&format!(
                "head length {} must be between 1 and the gene length {}",
                head_length, length
            )));
        }

        for (position, symbol) in self.terminals.iter().enumerate() {
            if self.functions.contains_key(symbol) {
                return Err(config_error(&format!(
                    "'{}' is declared as both function and terminal",
                    symbol
                )));
            }
            if self.terminals[..position].contains(symbol) {
                return Err(config_error(&format!("terminal '{}' is declared twice", symbol)));
            }
        }

        if self.terminals.contains(&EPHEMERAL_CONSTANT) {
            match self.ephemeral_range {
                None => {
                    return Err(config_error(
                        "ephemeral random constants are used but no range is defined",
                    ))
                }
                Some((min, max)) if !(max - min).is_finite() || min > max => {
                    return Err(config_error(&format!(
                        "invalid ephemeral constant range ({}, {})",
                        min, max
                    )))
                }
                Some(_) => {}
            }
        }

        if let Some(symbol) = self.linking_function {
            let arity = self
                .functions
                .get(&symbol)
                .map(|f| f.arity())
                .ok_or_else(|| {
                    config_error(&format!("linking function '{}' is not a defined function", symbol))
                })?;
            if arity == 0 || (num_genes > 1 && !can_link(num_genes, arity)) {
                return Err(config_error(&format!(
                    "linking function '{}' (arity {}) cannot link {} genes",
                    symbol, arity, num_genes
                )));
            }
        } else if num_genes > 1 {
            return Err(config_error("multigenic chromosomes need a linking function"));
        }

        let max_arity = self.functions.values().map(|f| f.arity()).max().unwrap_or(0);
        let min_tail = head_length * max_arity.saturating_sub(1) + 1;
        if length - head_length < min_tail {
            return Err(config_error(&format!(
                "tail length {} is shorter than the {} symbols a head of {} may require",
                length - head_length,
                min_tail,
                head_length
            )));
        }

        Ok(Arc::new(SymbolTable {
            functions: self.functions,
            terminals: self.terminals,
            constants: self.constants,
            ephemeral_range: self.ephemeral_range,
            linking_function: self.linking_function,
            num_genes,
            head_length,
            length,
        }))
    }
}

/// Whether a fold over chunks of an arity-`arity` function consumes exactly `trees` trees
pub(crate) fn can_link(trees: usize, arity: usize) -> bool {
    match arity {
        0 => false,
        1 => trees == 1,
        k => trees >= k && (trees - 1) % (k - 1) == 0,
    }
}

fn config_error(message: &str) -> GepError {
    GepError::Configuration(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::primitives::{Add, Divide, FnPrimitive, Multiply, Sqrt, Subtract};

    fn arithmetic() -> SymbolTableBuilder {
        SymbolTable::builder()
            .function('+', Arc::new(Add))
            .function('-', Arc::new(Subtract))
            .function('*', Arc::new(Multiply))
            .function('/', Arc::new(Divide))
            .function('Q', Arc::new(Sqrt))
            .terminals("ab")
            .head_length(3)
            .length(7)
            .num_genes(1)
    }

    #[test]
    fn test_build_valid_table() {
        let table = arithmetic().build().unwrap();
        assert_eq!(table.arity('+'), 2);
        assert_eq!(table.arity('Q'), 1);
        assert_eq!(table.arity('a'), 0);
        assert_eq!(table.tail_length(), 4);
        assert_eq!(table.max_arity(), 2);
        assert!(!table.uses_ephemeral_constants());
    }

    #[test]
    fn test_missing_functions() {
        let result = SymbolTable::builder()
            .terminals("a")
            .head_length(1)
            .length(2)
            .num_genes(1)
            .build();
        assert!(matches!(result, Err(GepError::Configuration(_))));
    }

    #[test]
    fn test_missing_terminals() {
        let result = SymbolTable::builder()
            .function('+', Arc::new(Add))
            .head_length(1)
            .length(3)
            .num_genes(1)
            .build();
        assert!(matches!(result, Err(GepError::Configuration(_))));
    }

    #[test]
    fn test_missing_structure() {
        let result = SymbolTable::builder()
            .function('+', Arc::new(Add))
            .terminals("a")
            .num_genes(1)
            .build();
        assert!(matches!(result, Err(GepError::Configuration(_))));
    }

    #[test]
    fn test_multigenic_requires_linking_function() {
        let result = arithmetic().num_genes(3).build();
        assert!(matches!(result, Err(GepError::Configuration(_))));

        let result = arithmetic().num_genes(3).linking_function('%').build();
        assert!(matches!(result, Err(GepError::Configuration(_))));

        assert!(arithmetic().num_genes(3).linking_function('+').build().is_ok());
    }

    #[test]
    fn test_terminal_like_linking_function_rejected() {
        let zero = FnPrimitive::new("zero", 0, |_| Ok(0.0));
        let result = arithmetic().function('Z', Arc::new(zero)).linking_function('Z').build();
        assert!(matches!(result, Err(GepError::Configuration(_))));
    }

    #[test]
    fn test_unary_linking_cannot_join_genes() {
        let result = arithmetic().num_genes(2).linking_function('Q').build();
        assert!(matches!(result, Err(GepError::Configuration(_))));
    }

    #[test]
    fn test_ephemeral_constants_need_range() {
        let result = arithmetic().terminal('?').build();
        assert!(matches!(result, Err(GepError::Configuration(_))));

        let result = arithmetic().terminal('?').ephemeral_range(1.0, -1.0).build();
        assert!(matches!(result, Err(GepError::Configuration(_))));

        let table = arithmetic().terminal('?').ephemeral_range(-1.0, 1.0).build().unwrap();
        assert!(table.uses_ephemeral_constants());
    }

    #[test]
    fn test_ephemeral_range_width_must_be_finite() {
        let result = arithmetic().terminal('?').ephemeral_range(-f64::MAX, f64::MAX).build();
        assert!(matches!(result, Err(GepError::Configuration(_))));

        let result = arithmetic().terminal('?').ephemeral_range(f64::NEG_INFINITY, 0.0).build();
        assert!(matches!(result, Err(GepError::Configuration(_))));

        let table = arithmetic()
            .terminal('?')
            .ephemeral_range(-f64::MAX / 2.0, f64::MAX / 2.0)
            .build()
            .unwrap();
        assert_eq!(table.ephemeral_range(), Some((-f64::MAX / 2.0, f64::MAX / 2.0)));
    }

    #[test]
    fn test_ephemeral_slots_cover_every_gene() {
        let table = arithmetic().num_genes(3).linking_function('+').build().unwrap();
        assert_eq!(table.ephemeral_slots(), 21);
    }

    #[test]
    fn test_symbol_cannot_be_function_and_terminal() {
        let result = arithmetic().terminal('+').build();
        assert!(matches!(result, Err(GepError::Configuration(_))));
    }

    #[test]
    fn test_tail_too_short() {
        let result = arithmetic().head_length(4).length(7).build();
        assert!(matches!(result, Err(GepError::Configuration(_))));
    }

    #[test]
    fn test_constant_registers_terminal() {
        let table = arithmetic().constant('p', std::f64::consts::PI).build().unwrap();
        assert!(table.is_terminal('p'));
        assert_eq!(table.constant('p'), Some(std::f64::consts::PI));
    }

    #[test]
    fn test_validate_gene() {
        let table = arithmetic().build().unwrap();
        assert!(table.validate_gene("+a*babb").is_ok());
        assert!(matches!(table.validate_gene("+ab"), Err(GepError::InvalidGene(_))));
        assert!(matches!(table.validate_gene("+azbabb"), Err(GepError::InvalidGene(_))));
        assert!(matches!(table.validate_gene("+abba+b"), Err(GepError::InvalidGene(_))));
    }

    #[test]
    fn test_can_link() {
        assert!(can_link(1, 1));
        assert!(!can_link(1, 2));
        assert!(can_link(2, 2));
        assert!(can_link(3, 2));
        assert!(can_link(5, 3));
        assert!(!can_link(4, 3));
        assert!(!can_link(2, 1));
        assert!(!can_link(2, 3));
        assert!(!can_link(0, 2));
    }
}
