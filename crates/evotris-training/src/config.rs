//! Training parameters.
//!
//! [`TrainingConfig::default`] is the reference setup: 100 specimens, 10 elites,
//! 20 episodes per specimen, 1000 generations, 400 steps per episode, mutation
//! chance 0.2 with a fixed mutation scale of 1.0.
//!
//! The configuration can be loaded from JSON; missing fields take their
//! default values.
//!
//! ```
//! # use evotris_training::config::TrainingConfig;
//! let config = TrainingConfig::default();
//! assert!(config.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrainingConfig {
    /// Number of specimens per generation.
    pub population_size: usize,
    /// Number of top specimens copied unchanged into the next generation.
    pub elite_count: usize,
    /// Episodes played per specimen to compute its fitness.
    pub episodes_per_specimen: usize,
    pub generations: usize,
    /// Maximum shapes dropped per episode.
    pub step_limit: usize,
    /// Per-weight probability of mutation.
    pub mutation_chance: f32,
    /// Half-width of the uniform mutation noise. Fixed for the whole run.
    pub mutation_scale: f32,
    /// Half-width of the uniform range initial weights are drawn from; 0 starts
    /// every weight at zero.
    pub initial_weight_scale: f32,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            elite_count: 10,
            episodes_per_specimen: 20,
            generations: 1000,
            step_limit: 400,
            mutation_chance: 0.2,
            mutation_scale: 1.0,
            initial_weight_scale: 1.0,
        }
    }
}

impl TrainingConfig {
    /// Checks that the configuration describes a runnable training.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.elite_count == 0 || self.elite_count > self.population_size {
            return Err(ConfigError::InvalidEliteCount {
                elite_count: self.elite_count,
                population_size: self.population_size,
            });
        }
        if self.episodes_per_specimen == 0 {
            return Err(ConfigError::ZeroValue {
                name: "episodes_per_specimen",
            });
        }
        if self.generations == 0 {
            return Err(ConfigError::ZeroValue {
                name: "generations",
            });
        }
        if self.step_limit == 0 {
            return Err(ConfigError::ZeroValue { name: "step_limit" });
        }
        if !(0.0..=1.0).contains(&self.mutation_chance) {
            return Err(ConfigError::InvalidMutationChance {
                chance: self.mutation_chance,
            });
        }
        for (name, value) in [
            ("mutation_scale", self.mutation_scale),
            ("initial_weight_scale", self.initial_weight_scale),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidScale { name, value });
            }
        }
        Ok(())
    }
}

/// A [`TrainingConfig`] that cannot be run.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("population size must be at least 1")]
    EmptyPopulation,
    #[display("elite count must be between 1 and the population size ({population_size}), got {elite_count}")]
    InvalidEliteCount {
        elite_count: usize,
        population_size: usize,
    },
    #[display("{name} must be at least 1")]
    ZeroValue { name: &'static str },
    #[display("mutation chance must be within [0, 1], got {chance}")]
    InvalidMutationChance { chance: f32 },
    #[display("{name} must be a finite non-negative number, got {value}")]
    InvalidScale { name: &'static str, value: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_reference_setup() {
        let config = TrainingConfig::default();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.elite_count, 10);
        assert_eq!(config.episodes_per_specimen, 20);
        assert_eq!(config.generations, 1000);
        assert_eq!(config.step_limit, 400);
        assert_eq!(config.mutation_chance, 0.2);
        assert_eq!(config.mutation_scale, 1.0);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = TrainingConfig::default();

        let config = TrainingConfig {
            population_size: 0,
            ..base.clone()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyPopulation));

        for elite_count in [0, 101] {
            let config = TrainingConfig {
                elite_count,
                ..base.clone()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidEliteCount { .. })
            ));
        }

        let config = TrainingConfig {
            step_limit: 0,
            ..base.clone()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroValue { name: "step_limit" })
        );

        let config = TrainingConfig {
            mutation_chance: 1.5,
            ..base.clone()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMutationChance { .. })
        ));

        let config = TrainingConfig {
            mutation_scale: f32::NAN,
            ..base.clone()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidScale {
                name: "mutation_scale",
                ..
            })
        ));

        let config = TrainingConfig {
            initial_weight_scale: -1.0,
            ..base
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_elite_count_may_equal_population() {
        let config = TrainingConfig {
            population_size: 5,
            elite_count: 5,
            ..TrainingConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_json_fills_missing_fields_with_defaults() {
        let config: TrainingConfig =
            serde_json::from_str(r#"{ "population_size": 30, "mutation_chance": 0.1 }"#).unwrap();
        assert_eq!(config.population_size, 30);
        assert_eq!(config.mutation_chance, 0.1);
        assert_eq!(config.elite_count, 10);
        assert_eq!(config.generations, 1000);
    }

    #[test]
    fn test_json_rejects_unknown_fields() {
        let result = serde_json::from_str::<TrainingConfig>(r#"{ "population": 30 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_error_messages() {
        let err = ConfigError::InvalidEliteCount {
            elite_count: 0,
            population_size: 100,
        };
        assert_eq!(
            err.to_string(),
            "elite count must be between 1 and the population size (100), got 0"
        );
    }
}
