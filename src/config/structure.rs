use super::traits::ConfigSection;
use crate::error::GepError;
use serde::{Deserialize, Serialize};

/// Shape shared by every chromosome of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureConfig {
    pub num_genes: usize,
    pub head_length: usize,
    pub length: usize,
    /// Seed for ephemeral constant sampling; entropy when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            num_genes: 3,
            head_length: 6,
            length: 39,
            seed: None,
        }
    }
}

impl StructureConfig {
    pub fn tail_length(&self) -> usize {
        self.length.saturating_sub(self.head_length)
    }
}

impl ConfigSection for StructureConfig {
    fn section_name() -> &'static str {
        "structure"
    }

    fn validate(&self) -> Result<(), GepError> {
        if self.num_genes == 0 {
            return Err(GepError::Configuration(
                "Number of genes must be at least 1".to_string()
            ));
        }
        if self.head_length == 0 || self.head_length > self.length {
            return Err(GepError::Configuration(
                "Head length must be between 1 and the gene length".to_string()
            ));
        }
        Ok(())
    }
}
