use crate::errors::{Groth16Error, Result, fail};
use crate::serialization::from_decimal;
use crate::setup::ToxicWaste;
use ark_ff::PrimeField;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_TOXIC_WASTE_ATTEMPTS: usize = 8;

/// Where the trusted setup gets its secret scalars from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToxicWasteSource {
    /// Fresh uniform scalars for every setup.
    #[default]
    Random,
    /// Publicly known decimal scalars. Insecure, for tests and reproducible runs only.
    Fixed {
        tau: String,
        alpha: String,
        beta: String,
        gamma: String,
        delta: String,
    },
}

impl ToxicWasteSource {
    /// `tau = 4, alpha = 2, beta = 3, gamma = 5, delta = 6`
    pub fn insecure_test_values() -> Self {
        ToxicWasteSource::Fixed {
            tau: "4".into(),
            alpha: "2".into(),
            beta: "3".into(),
            gamma: "5".into(),
            delta: "6".into(),
        }
    }

    /// Parse a fixed source into scalars; `None` for [`ToxicWasteSource::Random`].
    pub fn fixed_waste<F: PrimeField>(&self) -> Result<Option<ToxicWaste<F>>> {
        match self {
            ToxicWasteSource::Random => Ok(None),
            ToxicWasteSource::Fixed {
                tau,
                alpha,
                beta,
                gamma,
                delta,
            } => {
                let parse = |name: &str, value: &str| -> Result<F> {
                    from_decimal(value)
                        .map_err(|report| report.attach(format!("toxic waste scalar: {name}")))
                };
                ToxicWaste::insecure_fixed(
                    parse("tau", tau)?,
                    parse("alpha", alpha)?,
                    parse("beta", beta)?,
                    parse("gamma", gamma)?,
                    parse("delta", delta)?,
                )
                .map(Some)
            }
        }
    }
}

fn default_max_toxic_waste_attempts() -> usize {
    DEFAULT_MAX_TOXIC_WASTE_ATTEMPTS
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub toxic_waste: ToxicWasteSource,
    /// Upper bound on setup attempts when a random draw is degenerate.
    #[serde(default = "default_max_toxic_waste_attempts")]
    pub max_toxic_waste_attempts: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            toxic_waste: ToxicWasteSource::Random,
            max_toxic_waste_attempts: DEFAULT_MAX_TOXIC_WASTE_ATTEMPTS,
        }
    }
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(json).map_err(|e| {
            fail(Groth16Error::InvalidInput)
                .attach("invalid pipeline config")
                .attach(e.to_string())
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_toxic_waste_attempts == 0 {
            return Err(fail(Groth16Error::InvalidInput)
                .attach("max_toxic_waste_attempts must be at least 1"));
        }
        Ok(())
    }
}
