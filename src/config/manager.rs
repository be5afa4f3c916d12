use super::{
    fitness::FitnessConfig,
    structure::StructureConfig,
    symbols::SymbolsConfig,
    traits::ConfigSection,
};
use crate::error::GepError;
use crate::functions::{FunctionRegistry, SymbolTable};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Genes of one individual to construct from configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndividualConfig {
    pub genes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GepConfig {
    pub symbols: SymbolsConfig,
    pub structure: StructureConfig,
    pub fitness: FitnessConfig,
    #[serde(default)]
    pub individuals: Vec<IndividualConfig>,
}

impl GepConfig {
    pub fn validate(&self) -> Result<(), GepError> {
        validate_section(&self.symbols)?;
        validate_section(&self.structure)?;
        validate_section(&self.fitness)?;
        for individual in &self.individuals {
            if individual.genes.len() != self.structure.num_genes {
                return Err(GepError::Configuration(format!(
                    "Individual {:?} has {} genes, expected {}",
                    individual.genes,
                    individual.genes.len(),
                    self.structure.num_genes
                )));
            }
        }
        Ok(())
    }

    pub fn build_symbol_table(&self, registry: &FunctionRegistry) -> Result<Arc<SymbolTable>, GepError> {
        let builder = SymbolTable::builder()
            .num_genes(self.structure.num_genes)
            .head_length(self.structure.head_length)
            .length(self.structure.length);
        self.symbols.apply(registry, builder)?.build()
    }
}

fn validate_section<S: ConfigSection>(section: &S) -> Result<(), GepError> {
    section.validate().map_err(|error| match error {
        GepError::Configuration(message) => {
            GepError::Configuration(format!("[{}] {}", S::section_name(), message))
        }
        other => other,
    })
}

/// Loads, validates and stores the run configuration.
///
/// Files are read through the `config` crate, so TOML and JSON both work and any
/// value can be overridden from the environment, e.g. `GEP_STRUCTURE__SEED=7`.
pub struct ConfigManager {
    config: Arc<RwLock<GepConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(GepConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GepError> {
        let path = path.as_ref();
        log::debug!("loading configuration from {}", path.display());
        let config = Config::builder()
            .add_source(File::from(path))
            .add_source(
                Environment::with_prefix("GEP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        self.store(config.try_deserialize()?)
    }

    pub fn load_from_str(&self, contents: &str, format: FileFormat) -> Result<(), GepError> {
        let config = Config::builder()
            .add_source(File::from_str(contents, format))
            .build()?;
        self.store(config.try_deserialize()?)
    }

    fn store(&self, config: GepConfig) -> Result<(), GepError> {
        config.validate()?;
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GepError> {
        let config = self.get();
        let toml_str = toml::to_string_pretty(&config)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn get(&self) -> GepConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update<F>(&self, f: F) -> Result<(), GepError>
    where
        F: FnOnce(&mut GepConfig),
    {
        let mut updated = self.get();
        f(&mut updated);
        self.store(updated)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
