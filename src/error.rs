use thiserror::Error;

#[derive(Error, Debug)]
pub enum GepError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid gene: {0}")]
    InvalidGene(String),

    #[error("Invalid expression tree: {0}")]
    InvalidTree(String),

    #[error("Cannot link {trees} trees with '{symbol}' (arity {arity})")]
    LinkArity {
        symbol: char,
        arity: usize,
        trees: usize,
    },

    #[error("Unbound variable: '{0}' is neither a constant, a digit literal nor a binding")]
    UnboundVariable(String),

    #[error("Ephemeral random constants exhausted: only {available} available")]
    EphemeralConstantsExhausted { available: usize },

    #[error("Fitness case has '{dimension}' exactly at center {center}")]
    DegenerateCenter { dimension: String, center: f64 },

    #[error("Fitness already set to {0}")]
    FitnessAlreadySet(f64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GepError>;
