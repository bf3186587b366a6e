use super::base::{weighted_freq, CapraSinghConfig};
use crate::libs::alignment::Alignment;
use crate::libs::params::*;
use crate::libs::scorer::{dotted_name, Scorer, ScorerClass, ScorerConfig, ScorerModule};

pub const MODULE: ScorerModule = ScorerModule {
    module: module_path!(),
    is_base: false,
    classes: &[ScorerClass {
        name: "ShannonEntropy",
        module: module_path!(),
        params: ShannonEntropy::params,
        build,
    }],
};

fn build(overrides: &Overrides) -> Result<Box<dyn Scorer>, ParamError> {
    Ok(Box::new(ShannonEntropy::with_params(overrides)?))
}

/// One minus the normalized Shannon entropy of the column.
#[derive(Debug, Clone)]
pub struct ShannonEntropy {
    name: String,
    values: ParamValues,
    config: ScorerConfig,
    cs: CapraSinghConfig,
}

impl WithParams for ShannonEntropy {
    fn params() -> Params {
        CapraSinghConfig::params()
    }

    fn from_values(values: &ParamValues) -> Result<Self, ParamError> {
        Ok(Self {
            name: dotted_name(module_path!()),
            values: values.clone(),
            config: ScorerConfig::from_values(values)?,
            cs: CapraSinghConfig::from_values(values)?,
        })
    }
}

impl Scorer for ShannonEntropy {
    fn name(&self) -> &str {
        &self.name
    }

    fn config(&self) -> &ScorerConfig {
        &self.config
    }

    fn values(&self) -> &ParamValues {
        &self.values
    }

    fn score_raw(&self, alignment: &Alignment) -> Vec<f64> {
        self.cs.score_columns(alignment, |col, weights| {
            let freq = weighted_freq(col, weights, self.cs.pseudocount);
            let h: f64 = freq.iter().filter(|&&f| f > 0.0).map(|f| f * f.ln()).sum();

            // a single sequence has no entropy to normalize
            let max = (freq.len().min(col.len()) as f64).ln();
            if max > 0.0 {
                1.0 + h / max
            } else {
                1.0
            }
        })
    }
}
