use crate::{
    chromosome::Chromosome,
    error::{GepError, Result},
    types::FitnessCase,
};

/// Scores chromosomes against a fixed list of fitness cases.
///
/// A chromosome that already carries a fitness keeps it: `score` returns the
/// stored value without evaluating anything. Otherwise the computed value is
/// stored on the chromosome before being returned.
///
/// `score` visits the whole population even when one chromosome fails, so every
/// chromosome that can be scored ends up with its fitness stored. The first
/// failure, in population order, is then returned.
pub trait FitnessFunction {
    fn name(&self) -> &'static str;

    /// Fitness of one chromosome, ignoring any stored value
    fn compute(&self, cases: &[FitnessCase], chromosome: &mut Chromosome) -> Result<f64>;

    fn score_one(&self, cases: &[FitnessCase], chromosome: &mut Chromosome) -> Result<f64> {
        if let Some(fitness) = chromosome.cached_fitness() {
            return Ok(fitness);
        }
        let fitness = self.compute(cases, chromosome)?;
        chromosome.set_fitness(fitness)?;
        Ok(fitness)
    }

    fn score(&self, cases: &[FitnessCase], chromosomes: &mut [Chromosome]) -> Result<Vec<f64>> {
        let results: Vec<Result<f64>> = chromosomes
            .iter_mut()
            .map(|chromosome| self.score_one(cases, chromosome))
            .collect();
        results.into_iter().collect()
    }
}

/// `Σ (M − |C − T|)`, or 0 as soon as any case is not finite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbsoluteFitness {
    pub range: f64,
}

impl FitnessFunction for AbsoluteFitness {
    fn name(&self) -> &'static str {
        "absolute"
    }

    fn compute(&self, cases: &[FitnessCase], chromosome: &mut Chromosome) -> Result<f64> {
        let mut fitness = 0.0;
        for case in cases {
            let value = chromosome.evaluate(&case.bindings)?;
            if !value.is_finite() {
                return Ok(0.0);
            }
            fitness += self.range - (value - case.target).abs();
        }
        Ok(fitness)
    }
}

/// `Σ (M − 100·|C/T − 1|)`.
///
/// Unlike [`AbsoluteFitness`] there is no early exit: a non-finite case, or a zero
/// target, carries through into the sum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeFitness {
    pub range: f64,
}

impl FitnessFunction for RelativeFitness {
    fn name(&self) -> &'static str {
        "relative"
    }

    fn compute(&self, cases: &[FitnessCase], chromosome: &mut Chromosome) -> Result<f64> {
        let mut fitness = 0.0;
        for case in cases {
            let value = chromosome.evaluate(&case.bindings)?;
            fitness += self.range - 100.0 * (value / case.target - 1.0).abs();
        }
        Ok(fitness)
    }
}

/// `1 / (1 + Σ (C − T)²)`, in (0, 1]; exactly 0 when any case is not finite
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InverseSquaredError;

impl FitnessFunction for InverseSquaredError {
    fn name(&self) -> &'static str {
        "inverse_squared_error"
    }

    fn compute(&self, cases: &[FitnessCase], chromosome: &mut Chromosome) -> Result<f64> {
        let mut error = 0.0;
        for case in cases {
            let value = chromosome.evaluate(&case.bindings)?;
            if !value.is_finite() {
                error = f64::INFINITY;
                break;
            }
            error += (value - case.target).powi(2);
        }
        Ok(1.0 / (1.0 + error))
    }
}

/// Inverse error weighted towards cases whose `dimension` lies close to `center`.
///
/// Each case adds `|C − T| ^ (1 / |x − center|)` with `x` the case's binding for
/// `dimension`. A case sitting exactly on the center has no defined exponent and
/// is rejected before anything is evaluated.
#[derive(Debug, Clone, PartialEq)]
pub struct CentralizedInverseSquaredError {
    pub center: f64,
    pub dimension: String,
}

impl CentralizedInverseSquaredError {
    fn distances(&self, cases: &[FitnessCase]) -> Result<Vec<f64>> {
        cases
            .iter()
            .map(|case| {
                let position = case
                    .bindings
                    .get(&self.dimension)
                    .copied()
                    .ok_or_else(|| GepError::UnboundVariable(self.dimension.clone()))?;
                let distance = (position - self.center).abs();
                if distance == 0.0 {
                    return Err(GepError::DegenerateCenter {
                        dimension: self.dimension.clone(),
                        center: self.center,
                    });
                }
                Ok(distance)
            })
            .collect()
    }
}

impl FitnessFunction for CentralizedInverseSquaredError {
    fn name(&self) -> &'static str {
        "centralized_inverse_squared_error"
    }

    fn compute(&self, cases: &[FitnessCase], chromosome: &mut Chromosome) -> Result<f64> {
        let distances = self.distances(cases)?;

        let mut error = 0.0;
        for (case, distance) in cases.iter().zip(distances) {
            let value = chromosome.evaluate(&case.bindings)?;
            if !value.is_finite() {
                error = f64::INFINITY;
                break;
            }
            error += (value - case.target).abs().powf(1.0 / distance);
        }
        Ok(1.0 / (1.0 + error))
    }
}
