use super::base::{weighted_freq, CapraSinghConfig};
use crate::libs::alignment::{Alignment, GAP_INDEX};
use crate::libs::params::*;
use crate::libs::scorer::{dotted_name, Scorer, ScorerClass, ScorerConfig, ScorerModule};

pub const MODULE: ScorerModule = ScorerModule {
    module: module_path!(),
    is_base: false,
    classes: &[ScorerClass {
        name: "JsDivergence",
        module: module_path!(),
        params: JsDivergence::params,
        build,
    }],
};

fn build(overrides: &Overrides) -> Result<Box<dyn Scorer>, ParamError> {
    Ok(Box::new(JsDivergence::with_params(overrides)?))
}

/// BLOSUM62 background distribution, in `ARNDCQEGHILKMFPSTWYV` order.
pub const BLOSUM62_BACKGROUND: [f64; 20] = [
    0.078, 0.051, 0.041, 0.052, 0.024, 0.034, 0.059, 0.083, 0.025, 0.062, 0.092, 0.056, 0.024,
    0.044, 0.043, 0.059, 0.055, 0.014, 0.034, 0.072,
];

/// Jensen-Shannon divergence between the column and the background
/// distribution.
#[derive(Debug, Clone)]
pub struct JsDivergence {
    name: String,
    values: ParamValues,
    config: ScorerConfig,
    cs: CapraSinghConfig,
}

impl WithParams for JsDivergence {
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

impl Scorer for JsDivergence {
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
            js_divergence(&freq[..GAP_INDEX], &BLOSUM62_BACKGROUND)
        })
    }
}

/// Base 2 JS divergence. `p` is renormalized first.
///
/// ```
/// use conscore::libs::scorers::caprasingh07::js_divergence::js_divergence;
/// assert_eq!(js_divergence(&[0.5, 0.5], &[0.5, 0.5]), 0.0);
/// assert!((js_divergence(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-12);
/// ```
pub fn js_divergence(p: &[f64], q: &[f64]) -> f64 {
    let total: f64 = p.iter().sum();
    if total == 0.0 {
        return 0.0;
    }

    let mut d = 0.0;
    for (&p, &q) in p.iter().zip(q) {
        let p = p / total;
        let r = 0.5 * p + 0.5 * q;
        if r == 0.0 {
            continue;
        }
        if p > 0.0 {
            d += p * (p / r).log2();
        }
        if q > 0.0 {
            d += q * (q / r).log2();
        }
    }

    d / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_js_divergence_symmetric() {
        let p = [0.1, 0.2, 0.7];
        let q = [0.3, 0.3, 0.4];
        assert_relative_eq!(js_divergence(&p, &q), js_divergence(&q, &p), epsilon = 1e-12);
        assert!(js_divergence(&p, &q) > 0.0);
    }

    #[test]
    fn test_js_divergence_renormalizes() {
        assert_relative_eq!(
            js_divergence(&[2.0, 2.0], &[0.5, 0.5]),
            0.0,
            epsilon = 1e-12
        );
        assert_eq!(js_divergence(&[0.0, 0.0], &[0.5, 0.5]), 0.0);
    }

    #[test]
    fn test_conserved_column_scores_higher() {
        let overrides = Overrides::from([("window_size".to_string(), ParamValue::Int(0))]);
        let scorer = JsDivergence::with_params(&overrides).unwrap();
        let aln = Alignment::new(
            (0..4).map(|i| format!("s{}", i)).collect(),
            vec![b"WA".to_vec(), b"WL".to_vec(), b"WG".to_vec(), b"WV".to_vec()],
        )
        .unwrap();

        let scores = scorer.score(&aln);
        assert_eq!(scores.len(), 2);
        assert!(scores[0] > scores[1]);
        assert!(scores.iter().all(|&s| (0.0..=1.0).contains(&s)));
    }

    #[test]
    fn test_gap_penalty_lowers_score() {
        let rows = vec![b"W".to_vec(), b"W".to_vec(), b"W".to_vec(), b"-".to_vec()];
        let names: Vec<String> = (0..4).map(|i| format!("s{}", i)).collect();
        let aln = Alignment::new(names, rows).unwrap();

        // Henikoff weights would give the all-gap row no weight at all
        let penalized = JsDivergence::with_params(&Overrides::from([
            ("window_size".to_string(), ParamValue::Int(0)),
            ("use_seq_weights".to_string(), ParamValue::Bool(false)),
        ]))
        .unwrap();
        let plain = JsDivergence::with_params(&Overrides::from([
            ("window_size".to_string(), ParamValue::Int(0)),
            ("use_seq_weights".to_string(), ParamValue::Bool(false)),
            ("gap_penalty".to_string(), ParamValue::from("false")),
        ]))
        .unwrap();

        assert!(penalized.score(&aln)[0] < plain.score(&aln)[0]);
    }
}
