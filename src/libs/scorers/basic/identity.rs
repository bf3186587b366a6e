use crate::libs::alignment::{aa_index, is_gap, Alignment};
use crate::libs::params::*;
use crate::libs::scorer::{dotted_name, Scorer, ScorerClass, ScorerConfig, ScorerModule};

pub const MODULE: ScorerModule = ScorerModule {
    module: module_path!(),
    is_base: false,
    classes: &[ScorerClass {
        name: "Identity",
        module: module_path!(),
        params: Identity::params,
        build,
    }],
};

fn build(overrides: &Overrides) -> Result<Box<dyn Scorer>, ParamError> {
    Ok(Box::new(Identity::with_params(overrides)?))
}

/// Fraction of sequences carrying the reference residue.
#[derive(Debug, Clone)]
pub struct Identity {
    name: String,
    values: ParamValues,
    config: ScorerConfig,
    count_gaps: bool,
}

impl WithParams for Identity {
    fn params() -> Params {
        ScorerConfig::params().extend(vec![ParamDef::new(
            "count_gaps",
            true,
            "Keep gapped sequences in the denominator",
        )])
    }

    fn from_values(values: &ParamValues) -> Result<Self, ParamError> {
        Ok(Self {
            name: dotted_name(module_path!()),
            values: values.clone(),
            config: ScorerConfig::from_values(values)?,
            count_gaps: values.bool("count_gaps")?,
        })
    }
}

impl Scorer for Identity {
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
        alignment
            .reference()
            .iter()
            .enumerate()
            .map(|(i, &residue)| {
                if is_gap(residue) {
                    return 0.0;
                }

                let target = aa_index(residue);
                let col = alignment.column(i);
                let same = col.iter().filter(|&&r| aa_index(r) == target).count();
                let total = if self.count_gaps {
                    col.len()
                } else {
                    col.iter().filter(|&&r| !is_gap(r)).count()
                };

                same as f64 / total as f64
            })
            .collect()
    }
}
