//! Parameters and column statistics shared by the Capra & Singh scorers.
use crate::libs::alignment::{aa_index, Alignment, GAP_INDEX};
use crate::libs::params::*;
use crate::libs::scorer::{ScorerConfig, ScorerModule};

pub const MODULE: ScorerModule = ScorerModule {
    module: module_path!(),
    is_base: true,
    classes: &[],
};

#[derive(Debug, Clone, PartialEq)]
pub struct CapraSinghConfig {
    pub gap_cutoff: f64,
    pub gap_penalty: bool,
    pub use_seq_weights: bool,
    pub pseudocount: f64,
}

impl WithParams for CapraSinghConfig {
    fn params() -> Params {
        ScorerConfig::params().extend(vec![
            ParamDef::new(
                "window_size",
                3,
                "Number of residues on either side included in the window",
            )
            .validator(non_negative),
            ParamDef::new(
                "gap_cutoff",
                0.3,
                "Columns with a larger fraction of gaps are not scored",
            )
            .validator(unit_interval),
            ParamDef::new(
                "gap_penalty",
                true,
                "Multiply each score by the weighted fraction of non-gap residues",
            ),
            ParamDef::new(
                "use_seq_weights",
                true,
                "Weight sequences by Henikoff position-based weights",
            ),
            ParamDef::new(
                "pseudocount",
                1e-7,
                "Added to every residue count before computing frequencies",
            )
            .validator(positive),
        ])
    }

    fn from_values(values: &ParamValues) -> Result<Self, ParamError> {
        Ok(Self {
            gap_cutoff: values.float("gap_cutoff")?,
            gap_penalty: values.bool("gap_penalty")?,
            use_seq_weights: values.bool("use_seq_weights")?,
            pseudocount: values.float("pseudocount")?,
        })
    }
}

/// Residue indices of column `i`, see [`aa_index`].
pub fn column_indices(alignment: &Alignment, i: usize) -> Vec<usize> {
    alignment.msa().iter().map(|row| aa_index(row[i])).collect()
}

pub fn gap_fraction(col: &[usize]) -> f64 {
    if col.is_empty() {
        return 0.0;
    }
    col.iter().filter(|&&idx| idx == GAP_INDEX).count() as f64 / col.len() as f64
}

/// One minus the weighted fraction of gaps.
pub fn weighted_gap_penalty(col: &[usize], weights: &[f64]) -> f64 {
    let total: f64 = weights.iter().sum();
    if total == 0.0 {
        return 0.0;
    }
    let gaps: f64 = col
        .iter()
        .zip(weights)
        .filter(|(&idx, _)| idx == GAP_INDEX)
        .map(|(_, w)| w)
        .sum();
    1.0 - gaps / total
}

/// Weighted frequencies of the 21 symbols, each count padded by `pc`.
pub fn weighted_freq(col: &[usize], weights: &[f64], pc: f64) -> [f64; 21] {
    let mut freq = [pc; 21];
    for (&idx, w) in col.iter().zip(weights) {
        freq[idx] += w;
    }

    let total: f64 = weights.iter().sum::<f64>() + 21.0 * pc;
    freq.iter_mut().for_each(|f| *f /= total);

    freq
}

impl CapraSinghConfig {
    /// Scores every column with `f(col, weights)`.
    ///
    /// Columns with more gaps than `gap_cutoff` are `NaN`; the others are
    /// multiplied by the weighted gap penalty when it is enabled.
    pub fn score_columns<F>(&self, alignment: &Alignment, f: F) -> Vec<f64>
    where
        F: Fn(&[usize], &[f64]) -> f64,
    {
        let weights = self.weights(alignment);

        (0..alignment.len())
            .map(|i| {
                let col = column_indices(alignment, i);
                if gap_fraction(&col) > self.gap_cutoff {
                    return f64::NAN;
                }

                let score = f(&col, &weights);
                if self.gap_penalty {
                    score * weighted_gap_penalty(&col, &weights)
                } else {
                    score
                }
            })
            .collect()
    }

    /// Uniform weights when disabled or when every weight is zero.
    fn weights(&self, alignment: &Alignment) -> Vec<f64> {
        let uniform = vec![1.0; alignment.num_seqs()];
        if !self.use_seq_weights {
            return uniform;
        }

        let weights = alignment.sequence_weights();
        if weights.iter().sum::<f64>() > 0.0 {
            weights
        } else {
            uniform
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_params_override_window() {
        let params = CapraSinghConfig::params();
        assert_eq!(
            params.names(),
            vec![
                "window_size",
                "window_lambda",
                "normalize",
                "gap_cutoff",
                "gap_penalty",
                "use_seq_weights",
                "pseudocount"
            ]
        );
        assert_eq!(params.get("window_size").unwrap().default, ParamValue::Int(3));
    }

    #[test]
    fn test_gap_stats() {
        let col = vec![0, GAP_INDEX, 0, GAP_INDEX];
        assert_relative_eq!(gap_fraction(&col), 0.5);
        assert_relative_eq!(weighted_gap_penalty(&col, &[1.0, 1.0, 1.0, 1.0]), 0.5);
        assert_relative_eq!(weighted_gap_penalty(&col, &[3.0, 1.0, 0.0, 0.0]), 0.75);
        assert_relative_eq!(gap_fraction(&[]), 0.0);
    }

    #[test]
    fn test_weighted_freq() {
        let freq = weighted_freq(&[0, 0, 1, GAP_INDEX], &[1.0, 1.0, 1.0, 1.0], 0.0);
        assert_relative_eq!(freq[0], 0.5);
        assert_relative_eq!(freq[1], 0.25);
        assert_relative_eq!(freq[GAP_INDEX], 0.25);
        assert_relative_eq!(freq.iter().sum::<f64>(), 1.0);

        let freq = weighted_freq(&[0], &[1.0], 1.0);
        assert_relative_eq!(freq[0], 2.0 / 22.0);
        assert_relative_eq!(freq[5], 1.0 / 22.0);
    }

    #[test]
    fn test_score_columns_gap_cutoff() {
        let aln = Alignment::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec![b"A-A".to_vec(), b"A-A".to_vec(), b"AA-".to_vec()],
        )
        .unwrap();
        let config = CapraSinghConfig {
            gap_cutoff: 0.5,
            gap_penalty: true,
            use_seq_weights: false,
            pseudocount: 1e-7,
        };
        let scores = config.score_columns(&aln, |_, _| 1.0);
        assert_relative_eq!(scores[0], 1.0);
        assert!(scores[1].is_nan());
        assert_relative_eq!(scores[2], 2.0 / 3.0);
    }
}
