use super::traits::ConfigSection;
use crate::engines::fitness::{
    AbsoluteFitness, CentralizedInverseSquaredError, FitnessFunction, InverseSquaredError,
    RelativeFitness,
};
use crate::error::GepError;
use crate::types::FitnessCase;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FitnessMethod {
    Absolute { range: f64 },
    Relative { range: f64 },
    InverseSquaredError,
    CentralizedInverseSquaredError { center: f64, dimension: String },
}

impl FitnessMethod {
    pub fn build(&self) -> Box<dyn FitnessFunction> {
        match self {
            FitnessMethod::Absolute { range } => Box::new(AbsoluteFitness { range: *range }),
            FitnessMethod::Relative { range } => Box::new(RelativeFitness { range: *range }),
            FitnessMethod::InverseSquaredError => Box::new(InverseSquaredError),
            FitnessMethod::CentralizedInverseSquaredError { center, dimension } => {
                Box::new(CentralizedInverseSquaredError {
                    center: *center,
                    dimension: dimension.clone(),
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessConfig {
    pub method: FitnessMethod,
    #[serde(default)]
    pub cases: Vec<FitnessCase>,
}

impl Default for FitnessConfig {
    fn default() -> Self {
        Self {
            method: FitnessMethod::InverseSquaredError,
            cases: Vec::new(),
        }
    }
}

impl ConfigSection for FitnessConfig {
    fn section_name() -> &'static str {
        "fitness"
    }

    fn validate(&self) -> Result<(), GepError> {
        match &self.method {
            FitnessMethod::Absolute { range } | FitnessMethod::Relative { range }
                if !range.is_finite() =>
            {
                return Err(GepError::Configuration(
                    "Fitness range must be finite".to_string()
                ));
            }
            FitnessMethod::CentralizedInverseSquaredError { center, dimension } => {
                if let Some(case) = self
                    .cases
                    .iter()
                    .find(|case| case.bindings.get(dimension) == Some(center))
                {
                    return Err(GepError::Configuration(format!(
                        "Fitness case with target {} sits exactly on the center {}",
                        case.target, center
                    )));
                }
            }
            _ => {}
        }
        Ok(())
    }
}
