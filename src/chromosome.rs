use crate::{
    engines::{
        evaluation::{EvaluationCache, Evaluator},
        generation::{link, ExpressionTree, GeneDecoder},
    },
    error::{GepError, Result},
    functions::SymbolTable,
    types::{BindingFingerprint, Bindings, ChromosomeReport},
};
use rand::distributions::{Distribution, Uniform};
use rand::Rng;
use std::sync::Arc;

/// An individual: `num_genes` linear genes plus its own ephemeral constants.
///
/// Genes and constants never change after construction. Trees are decoded on
/// first use and evaluation results are memoized per binding, so a chromosome is
/// mutated only through its own caches and needs `&mut self` to evaluate.
#[derive(Debug, Clone)]
pub struct Chromosome {
    symbols: Arc<SymbolTable>,
    genes: Vec<String>,
    ephemeral_constants: Vec<f64>,
    trees: Vec<ExpressionTree>,
    expression: Option<ExpressionTree>,
    cache: EvaluationCache,
    fitness: Option<f64>,
}

impl Chromosome {
    /// Build with ephemeral constants drawn from the thread-local RNG
    pub fn new(symbols: Arc<SymbolTable>, genes: Vec<String>) -> Result<Self> {
        Self::with_rng(symbols, genes, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(
        symbols: Arc<SymbolTable>,
        genes: Vec<String>,
        rng: &mut R,
    ) -> Result<Self> {
        Self::validate(&symbols, &genes)?;
        let slots = symbols.ephemeral_slots();
        let constants = match symbols.ephemeral_range() {
            Some((min, max)) if min < max => {
                let range = Uniform::new(min, max);
                (0..slots).map(|_| range.sample(rng)).collect()
            }
            Some((min, _)) => vec![min; slots],
            None => Vec::new(),
        };
        Ok(Self::assemble(symbols, genes, constants))
    }

    /// Build with explicit ephemeral constants, one per gene position across all genes
    pub fn with_constants(
        symbols: Arc<SymbolTable>,
        genes: Vec<String>,
        ephemeral_constants: Vec<f64>,
    ) -> Result<Self> {
        Self::validate(&symbols, &genes)?;
        if symbols.uses_ephemeral_constants() && ephemeral_constants.len() != symbols.ephemeral_slots() {
            return Err(GepError::Configuration(format!(
                "expected {} ephemeral constants, got {}",
                symbols.ephemeral_slots(),
                ephemeral_constants.len()
            )));
        }
        Ok(Self::assemble(symbols, genes, ephemeral_constants))
    }

    fn assemble(symbols: Arc<SymbolTable>, genes: Vec<String>, ephemeral_constants: Vec<f64>) -> Self {
        Self {
            symbols,
            genes,
            ephemeral_constants,
            trees: Vec::new(),
            expression: None,
            cache: EvaluationCache::new(),
            fitness: None,
        }
    }

    fn validate(symbols: &SymbolTable, genes: &[String]) -> Result<()> {
        if genes.len() != symbols.num_genes() {
            return Err(GepError::Configuration(format!(
                "chromosome has {} genes, expected {}",
                genes.len(),
                symbols.num_genes()
            )));
        }
        if genes.len() > 1 && symbols.linking_function().is_none() {
            return Err(GepError::Configuration(
                "multigenic chromosome defined with no linking function".to_string(),
            ));
        }
        genes.iter().try_for_each(|gene| symbols.validate_gene(gene))
    }

    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn ephemeral_constants(&self) -> &[f64] {
        &self.ephemeral_constants
    }

    pub fn symbols(&self) -> &Arc<SymbolTable> {
        &self.symbols
    }

    /// Whether the genes have been decoded yet
    pub fn is_expressed(&self) -> bool {
        !self.trees.is_empty()
    }

    /// Number of memoized evaluations
    pub fn cached_evaluations(&self) -> usize {
        self.cache.len()
    }

    /// One decoded tree per gene, built on first call
    pub fn trees(&mut self) -> Result<&[ExpressionTree]> {
        self.ensure_trees()?;
        Ok(&self.trees)
    }

    /// The chromosome-level tree: the sole gene tree, or all of them linked
    pub fn expression(&mut self) -> Result<&ExpressionTree> {
        self.ensure_expression()?;
        self.expression.as_ref().ok_or_else(missing_expression)
    }

    fn ensure_trees(&mut self) -> Result<()> {
        if self.trees.is_empty() {
            let decoder = GeneDecoder::new(&self.symbols);
            self.trees = self
                .genes
                .iter()
                .map(|gene| decoder.decode(gene))
                .collect::<Result<Vec<_>>>()?;
        }
        Ok(())
    }

    fn ensure_expression(&mut self) -> Result<()> {
        if self.expression.is_some() {
            return Ok(());
        }
        self.ensure_trees()?;

        let expression = if self.trees.len() > 1 {
            let linking = self.symbols.linking_function().ok_or_else(|| {
                GepError::Configuration("multigenic chromosome defined with no linking function".to_string())
            })?;
            link(self.trees.clone(), linking, &self.symbols)?
        } else {
            self.trees.first().cloned().ok_or_else(missing_expression)?
        };
        self.expression = Some(expression);
        Ok(())
    }

    /// Evaluate under `bindings`, memoized by the exact binding values.
    ///
    /// Arithmetic faults give NaN (and NaN is cached). An unbound variable is an
    /// error and leaves the cache untouched.
    pub fn evaluate(&mut self, bindings: &Bindings) -> Result<f64> {
        let key = BindingFingerprint::of(bindings);
        if let Some(value) = self.cache.get(&key) {
            log::trace!("cache hit for {:?}", key);
            return Ok(value);
        }

        self.ensure_expression()?;
        let Some(expression) = self.expression.as_ref() else {
            return Err(missing_expression());
        };
        let value = Evaluator::new(&self.symbols).evaluate(
            expression,
            bindings,
            &self.ephemeral_constants,
        )?;

        self.cache.set(key, value);
        Ok(value)
    }

    /// Fitness set by a scorer; 0 with a warning when not yet computed
    pub fn fitness(&self) -> f64 {
        match self.fitness {
            Some(fitness) => fitness,
            None => {
                log::warn!("Fitness of chromosome has not been calculated, returning 0");
                0.0
            }
        }
    }

    pub fn cached_fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Record the fitness; a chromosome is scored at most once
    pub fn set_fitness(&mut self, fitness: f64) -> Result<()> {
        if let Some(existing) = self.fitness {
            return Err(GepError::FitnessAlreadySet(existing));
        }
        self.fitness = Some(fitness);
        Ok(())
    }

    /// Each gene's tree drawn line by line, followed by the ephemeral constants
    pub fn dump(&mut self) -> Result<String> {
        self.ensure_trees()?;
        let mut out = String::new();
        for (index, tree) in self.trees.iter().enumerate() {
            out.push_str(&format!("Tree {}\n", index));
            for line in tree.render().lines() {
                out.push('\t');
                out.push_str(line);
                out.push('\n');
            }
        }
        out.push_str(&format!("{:?}\n", self.ephemeral_constants));
        Ok(out)
    }

    pub fn report(&mut self) -> Result<ChromosomeReport> {
        let formula = self.expression()?.to_formula();
        Ok(ChromosomeReport {
            genes: self.genes.clone(),
            formula,
            fitness: self.fitness,
            ephemeral_constants: self.ephemeral_constants.clone(),
        })
    }
}

fn missing_expression() -> GepError {
    GepError::InvalidTree("chromosome has no genes to express".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::primitives::{Add, FnPrimitive, Multiply, Subtract};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn table(num_genes: usize) -> Arc<SymbolTable> {
        SymbolTable::builder()
            .function('+', Arc::new(Add))
            .function('-', Arc::new(Subtract))
            .function('*', Arc::new(Multiply))
            .terminals("x?")
            .ephemeral_range(-1.0, 1.0)
            .linking_function('+')
            .head_length(2)
            .length(5)
            .num_genes(num_genes)
            .build()
            .unwrap()
    }

    fn genes(genes: &[&str]) -> Vec<String> {
        genes.iter().map(|g| g.to_string()).collect()
    }

    fn x(value: f64) -> Bindings {
        let mut b = Bindings::new();
        b.insert("x".to_string(), value);
        b
    }

    #[test]
    fn test_gene_count_mismatch() {
        let result = Chromosome::new(table(2), genes(&["*xxxx"]));
        assert!(matches!(result, Err(GepError::Configuration(_))));
    }

    #[test]
    fn test_invalid_gene_rejected() {
        let result = Chromosome::new(table(1), genes(&["*xx"]));
        assert!(matches!(result, Err(GepError::InvalidGene(_))));
    }

    #[test]
    fn test_ephemeral_constants_sampled_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let chromosome = Chromosome::with_rng(table(1), genes(&["*xxxx"]), &mut rng).unwrap();
        let constants = chromosome.ephemeral_constants();
        assert_eq!(constants.len(), 5);
        assert!(constants.iter().all(|c| (-1.0..1.0).contains(c)));
    }

    #[test]
    fn test_degenerate_range_repeats_its_bound() {
        let symbols = SymbolTable::builder()
            .function('+', Arc::new(Add))
            .terminals("?")
            .ephemeral_range(0.5, 0.5)
            .head_length(1)
            .length(3)
            .num_genes(1)
            .build()
            .unwrap();
        let chromosome = Chromosome::new(symbols, genes(&["+??"])).unwrap();
        assert_eq!(chromosome.ephemeral_constants(), &[0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_every_gene_gets_ephemeral_slots() {
        let symbols = SymbolTable::builder()
            .function('+', Arc::new(Add))
            .function('-', Arc::new(Subtract))
            .terminals("?")
            .ephemeral_range(-1.0, 1.0)
            .linking_function('+')
            .head_length(2)
            .length(5)
            .num_genes(2)
            .build()
            .unwrap();

        // three coding `?` per gene, six in total against five positions per gene
        let mut chromosome = Chromosome::new(symbols.clone(), genes(&["+-???", "+-???"])).unwrap();
        assert_eq!(chromosome.ephemeral_constants().len(), 10);
        assert!(chromosome.evaluate(&Bindings::new()).unwrap().is_finite());

        let constants = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 0.0, 0.0, 0.0, 0.0];
        let mut explicit =
            Chromosome::with_constants(symbols.clone(), genes(&["+-???", "+-???"]), constants).unwrap();
        // ((1 - 2) + 3) + ((4 - 5) + 6)
        assert_eq!(explicit.evaluate(&Bindings::new()).unwrap(), 7.0);

        let short = Chromosome::with_constants(symbols, genes(&["+-???", "+-???"]), vec![0.0; 5]);
        assert!(matches!(short, Err(GepError::Configuration(_))));
    }

    #[test]
    fn test_seeded_construction_is_reproducible() {
        let a = Chromosome::with_rng(table(1), genes(&["*xxxx"]), &mut StdRng::seed_from_u64(3)).unwrap();
        let b = Chromosome::with_rng(table(1), genes(&["*xxxx"]), &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a.ephemeral_constants(), b.ephemeral_constants());
    }

    #[test]
    fn test_trees_are_lazy() {
        let mut chromosome = Chromosome::new(table(1), genes(&["*xxxx"])).unwrap();
        assert!(!chromosome.is_expressed());
        assert_eq!(chromosome.evaluate(&x(3.0)).unwrap(), 9.0);
        assert!(chromosome.is_expressed());
    }

    #[test]
    fn test_multigenic_evaluation_links_genes() {
        let mut chromosome =
            Chromosome::with_constants(table(2), genes(&["*xxxx", "-x?xx"]), vec![0.5; 10]).unwrap();
        // x*x + (x - 0.5)
        assert_eq!(chromosome.evaluate(&x(2.0)).unwrap(), 5.5);
        assert_eq!(chromosome.expression().unwrap().to_formula(), "((x*x)+(x-?))");
    }

    #[test]
    fn test_ephemeral_constants_follow_gene_order() {
        let mut chromosome = Chromosome::with_constants(
            table(2),
            genes(&["-??xx", "-??xx"]),
            vec![1.0, 0.25, 0.5, 0.125, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        )
        .unwrap();
        // (1.0 - 0.25) + (0.5 - 0.125)
        assert_eq!(chromosome.evaluate(&Bindings::new()).unwrap(), 1.125);
    }

    #[test]
    fn test_evaluation_is_memoized() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let symbols = SymbolTable::builder()
            .function(
                'C',
                Arc::new(FnPrimitive::new("counted", 2, move |args| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(args[0] + args[1])
                })),
            )
            .terminals("x")
            .head_length(1)
            .length(3)
            .num_genes(1)
            .build()
            .unwrap();

        let mut chromosome = Chromosome::new(symbols, genes(&["Cxx"])).unwrap();
        let first = chromosome.evaluate(&x(1.5)).unwrap();
        let second = chromosome.evaluate(&x(1.5)).unwrap();

        assert_eq!(first.to_bits(), second.to_bits());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(chromosome.cached_evaluations(), 1);

        chromosome.evaluate(&x(2.5)).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(chromosome.cached_evaluations(), 2);
    }

    #[test]
    fn test_unbound_variable_not_cached() {
        let mut chromosome = Chromosome::new(table(1), genes(&["*xxxx"])).unwrap();
        let result = chromosome.evaluate(&Bindings::new());
        assert!(matches!(result, Err(GepError::UnboundVariable(_))));
        assert_eq!(chromosome.cached_evaluations(), 0);
    }

    #[test]
    fn test_fitness_set_once() {
        let mut chromosome = Chromosome::new(table(1), genes(&["*xxxx"])).unwrap();
        assert_eq!(chromosome.cached_fitness(), None);
        assert_eq!(chromosome.fitness(), 0.0);

        chromosome.set_fitness(4.0).unwrap();
        assert_eq!(chromosome.fitness(), 4.0);
        assert!(matches!(chromosome.set_fitness(5.0), Err(GepError::FitnessAlreadySet(_))));
    }

    #[test]
    fn test_dump() {
        let mut chromosome =
            Chromosome::with_constants(table(1), genes(&["+x?xx"]), vec![0.5, 0.0, 0.0, 0.0, 0.0]).unwrap();
        let dump = chromosome.dump().unwrap();
        assert!(dump.starts_with("Tree 0\n\t+\n\t├── x\n\t└── ?\n"));
        assert!(dump.ends_with("[0.5, 0.0, 0.0, 0.0, 0.0]\n"));
    }
}
