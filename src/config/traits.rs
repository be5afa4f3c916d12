use crate::error::GepError;
use serde::{Deserialize, Serialize};

/// Trait for configuration sections
pub trait ConfigSection: Serialize + for<'de> Deserialize<'de> + Default + Clone {
    fn section_name() -> &'static str;
    fn validate(&self) -> Result<(), GepError>;
}

/// Read a one-symbol string as a gene symbol
pub(crate) fn single_symbol(section: &str, value: &str) -> Result<char, GepError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), None) => Ok(symbol),
        _ => Err(GepError::Configuration(format!(
            "{}: '{}' must be exactly one symbol",
            section, value
        ))),
    }
}
