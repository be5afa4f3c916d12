use anyhow::{Context, Result};
use genexpr::config::ConfigManager;
use genexpr::{Chromosome, FunctionRegistry};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<()> {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .context("usage: genexpr <config-file>")?;

    let manager = ConfigManager::new();
    manager
        .load_from_file(&path)
        .with_context(|| format!("failed to load configuration from {}", path))?;
    let config = manager.get();

    let symbols = config.build_symbol_table(&FunctionRegistry::new())?;
    log::info!("symbol table: {:?}", symbols);

    let mut rng = match config.structure.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut population = config
        .individuals
        .iter()
        .map(|individual| Chromosome::with_rng(symbols.clone(), individual.genes.clone(), &mut rng))
        .collect::<genexpr::Result<Vec<_>>>()
        .context("invalid individual")?;

    let scorer = config.fitness.method.build();
    log::info!(
        "scoring {} individuals with {} fitness over {} cases",
        population.len(),
        scorer.name(),
        config.fitness.cases.len()
    );
    scorer.score(&config.fitness.cases, &mut population)?;

    for chromosome in population.iter_mut() {
        log::debug!("\n{}", chromosome.dump()?);
        println!("{}", serde_json::to_string_pretty(&chromosome.report()?)?);
    }

    Ok(())
}
