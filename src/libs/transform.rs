//! Post-processing applied to every scorer's raw output.
//!
//! Non-finite scores mark columns a scorer declined to score. They pass through
//! both transforms untouched and never contribute to a neighbour average or to
//! the normalization statistics.

/// Number of extreme values dropped from each end when estimating the mean
/// and standard deviation for z-scores.
pub const NORM_FILTER: usize = 5;

/// Blends each score with the mean of its neighbours.
///
/// Neighbours of column `i` are the columns `i - window ..= i + window` other
/// than `i` itself that exist and hold a finite score. Near either end only
/// the existing columns are averaged. A column without any neighbour keeps its
/// raw score.
///
/// ```
/// use conscore::libs::transform::window_scores;
/// let scores = vec![0.0, 1.0, 2.0, 3.0, 10.0];
///
/// // window 0 is the identity
/// assert_eq!(window_scores(&scores, 0, 0.7), scores);
///
/// let w = window_scores(&scores, 1, 0.5);
/// assert_eq!(w[0], 0.5 * 0.0 + 0.5 * 1.0);
/// assert_eq!(w[2], 0.5 * 2.0 + 0.5 * (1.0 + 3.0) / 2.0);
/// assert_eq!(w[4], 0.5 * 10.0 + 0.5 * 3.0);
/// ```
pub fn window_scores(scores: &[f64], window: usize, lambda: f64) -> Vec<f64> {
    if window == 0 {
        return scores.to_vec();
    }

    let n = scores.len();
    (0..n)
        .map(|i| {
            let own = scores[i];
            if !own.is_finite() {
                return own;
            }

            let lo = i.saturating_sub(window);
            let hi = i.saturating_add(window).min(n - 1);
            let (sum, count) = (lo..=hi)
                .filter(|&j| j != i)
                .map(|j| scores[j])
                .filter(|s| s.is_finite())
                .fold((0.0, 0usize), |(sum, count), s| (sum + s, count + 1));

            if count == 0 {
                own
            } else {
                (1.0 - lambda) * own + lambda * sum / count as f64
            }
        })
        .collect()
}

/// Z-scores of `scores`.
///
/// The mean and population standard deviation are estimated after dropping the
/// `filter` lowest and `filter` highest finite scores; with fewer than
/// `2 * filter + 1` finite scores the whole finite set is used. Every finite
/// score gets a z-score, dropped extremes included. When the estimate has no
/// spread every finite score becomes `0.0`.
///
/// ```
/// use conscore::libs::transform::norm_scores;
/// let z = norm_scores(&[1.0, 2.0, 3.0], 5);
/// assert_eq!(z[1], 0.0);
/// assert!((z[0] + 1.224744871391589).abs() < 1e-12);
///
/// assert_eq!(norm_scores(&[4.2; 20], 5), vec![0.0; 20]);
/// assert!(norm_scores(&[], 5).is_empty());
/// ```
pub fn norm_scores(scores: &[f64], filter: usize) -> Vec<f64> {
    let mut finite: Vec<f64> = scores.iter().copied().filter(|s| s.is_finite()).collect();
    finite.sort_by(|a, b| a.total_cmp(b));

    let kept = if finite.len() > 2 * filter {
        &finite[filter..finite.len() - filter]
    } else {
        &finite[..]
    };

    // sorted, so equal ends mean no spread
    let spread = match (kept.first(), kept.last()) {
        (Some(first), Some(last)) => first != last,
        _ => false,
    };

    // on under- or overflow, estimate again over values scaled into [-1, 1]
    let max_abs = match (finite.first(), finite.last()) {
        (Some(first), Some(last)) => first.abs().max(last.abs()),
        _ => 0.0,
    };
    let estimate = if spread {
        [1.0, max_abs]
            .into_iter()
            .map(|scale| {
                let (mean, sd) = mean_sd(kept, scale);
                (scale, mean, sd)
            })
            .find(|&(_, _, sd)| sd > 0.0 && sd.is_finite())
    } else {
        None
    };

    scores
        .iter()
        .map(|&s| {
            if !s.is_finite() {
                s
            } else if let Some((scale, mean, sd)) = estimate {
                (s / scale - mean) / sd
            } else {
                0.0
            }
        })
        .collect()
}

/// Mean and population standard deviation of `values / scale`.
fn mean_sd(values: &[f64], scale: f64) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().map(|x| x / scale).sum::<f64>() / n;
    let var = values
        .iter()
        .map(|x| (x / scale - mean).powi(2))
        .sum::<f64>()
        / n;
    (mean, var.sqrt())
}
