//! The scorer contract and lookup of scorers by dotted name.
//!
//! A scorer named `"caprasingh07.js_divergence"` lives in the module
//! `scorers::caprasingh07::js_divergence` and is the class `JsDivergence`.
//!
//! ```
//! use conscore::libs::params::{Overrides, ParamValue};
//! use conscore::libs::scorer::{get_scorer, get_scorer_class};
//!
//! let class = get_scorer_class("caprasingh07.js_divergence").unwrap();
//! assert_eq!(class.name, "JsDivergence");
//!
//! let overrides = Overrides::from([("window_size".to_string(), ParamValue::Int(0))]);
//! let scorer = get_scorer("caprasingh07.js_divergence", &overrides).unwrap();
//! assert_eq!(scorer.name(), "caprasingh07.js_divergence");
//! assert_eq!(scorer.config().window_size, 0);
//! ```
use crate::libs::alignment::Alignment;
use crate::libs::params::*;
use crate::libs::transform::{norm_scores, window_scores, NORM_FILTER};
use log::debug;
use std::fmt;

/// Parameters every scorer inherits.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorerConfig {
    /// Residues on either side included in the window
    pub window_size: usize,
    pub window_lambda: f64,
    /// Return z-scores instead of the smoothed scores
    pub normalize: bool,
}

impl WithParams for ScorerConfig {
    fn params() -> Params {
        Params::new(vec![
            ParamDef::new(
                "window_size",
                2,
                "Number of residues on either side included in the window",
            )
            .validator(non_negative),
            ParamDef::new(
                "window_lambda",
                0.5,
                "Lambda for window heuristic linear combination. Meaningful only if window_size != 0",
            )
            .validator(unit_interval),
            ParamDef::new(
                "normalize",
                false,
                "Return z-scores (over the alignment) of each column, instead of original scores",
            ),
        ])
    }

    fn from_values(values: &ParamValues) -> Result<Self, ParamError> {
        Ok(Self {
            window_size: values.usize("window_size")?,
            window_lambda: values.float("window_lambda")?,
            normalize: values.bool("normalize")?,
        })
    }
}

pub trait Scorer: Send + Sync {
    /// Dotted name the scorer is registered under.
    fn name(&self) -> &str;

    fn config(&self) -> &ScorerConfig;

    /// Every resolved parameter, inherited ones included.
    fn values(&self) -> &ParamValues;

    /// One score per column of the reference sequence. Columns the algorithm
    /// declines to score are `NaN`.
    fn score_raw(&self, alignment: &Alignment) -> Vec<f64>;

    /// Raw scores, then windowing and normalization as configured.
    fn score(&self, alignment: &Alignment) -> Vec<f64> {
        let start = std::time::Instant::now();

        let mut scores = self.score_raw(alignment);
        assert_eq!(
            scores.len(),
            alignment.len(),
            "{} returned {} scores for {} columns",
            self.name(),
            scores.len(),
            alignment.len()
        );

        let config = self.config();
        if config.window_size > 0 {
            scores = window_scores(&scores, config.window_size, config.window_lambda);
        }
        if config.normalize {
            scores = norm_scores(&scores, NORM_FILTER);
        }

        debug!(
            "{}: {} sequences x {} columns in {:.3?}",
            self.name(),
            alignment.num_seqs(),
            alignment.len(),
            start.elapsed()
        );

        scores
    }
}

pub type Builder = fn(&Overrides) -> Result<Box<dyn Scorer>, ParamError>;

/// A constructible scorer.
#[derive(Debug)]
pub struct ScorerClass {
    /// CapitalizedConcatenated class name
    pub name: &'static str,
    /// `module_path!()` of the defining module
    pub module: &'static str,
    pub params: fn() -> Params,
    pub build: Builder,
}

impl ScorerClass {
    pub fn dotted_name(&self) -> String {
        dotted_name(self.module)
    }
}

/// A module under `scorers`. Base modules only share parameters and helpers
/// and are never handed out by the lookup.
#[derive(Debug)]
pub struct ScorerModule {
    pub module: &'static str,
    pub is_base: bool,
    pub classes: &'static [ScorerClass],
}

impl ScorerModule {
    pub fn dotted_name(&self) -> String {
        dotted_name(self.module)
    }
}

/// Module path relative to `scorers`, joined by dots.
///
/// ```
/// use conscore::libs::scorer::dotted_name;
/// assert_eq!(
///     dotted_name("conscore::libs::scorers::caprasingh07::js_divergence"),
///     "caprasingh07.js_divergence"
/// );
/// ```
pub fn dotted_name(module_path: &str) -> String {
    let relative = module_path
        .split_once("::scorers::")
        .map_or(module_path, |(_, rest)| rest);
    relative.replace("::", ".")
}

/// ```
/// use conscore::libs::scorer::class_name;
/// assert_eq!(class_name("js_divergence"), "JsDivergence");
/// assert_eq!(class_name("shannon_entropy"), "ShannonEntropy");
/// assert_eq!(class_name("SUM_of_pairs"), "SumOfPairs");
/// assert_eq!(class_name("identity"), "Identity");
/// ```
pub fn class_name(segment: &str) -> String {
    segment
        .split('_')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect()
}

/// Looks up the scorer class for `name`.
pub fn get_scorer_class(name: &str) -> Result<&'static ScorerClass, ScorerError> {
    let invalid = |cause| ScorerError {
        name: name.to_string(),
        cause,
    };
    let module_name = format!("scorers.{}", name);

    let module = crate::libs::scorers::MODULES
        .iter()
        .find(|m| m.dotted_name() == name)
        .ok_or_else(|| invalid(ResolveError::NoModule(module_name.clone())))?;

    if module.is_base {
        return Err(invalid(ResolveError::BaseScorer(module_name)));
    }

    let segment = name.rsplit_once('.').map_or(name, |(_, last)| last);
    let class = class_name(segment);
    module
        .classes
        .iter()
        .find(|c| c.name == class)
        .ok_or_else(|| invalid(ResolveError::NoClass {
            module: module_name,
            class,
        }))
}

/// Looks up `name` and builds it with `overrides`.
pub fn get_scorer(name: &str, overrides: &Overrides) -> Result<Box<dyn Scorer>, ScorerError> {
    let class = get_scorer_class(name)?;
    (class.build)(overrides).map_err(|e| ScorerError {
        name: name.to_string(),
        cause: ResolveError::Params(e),
    })
}

/// Dotted names of every constructible scorer.
pub fn list_scorers() -> Vec<String> {
    crate::libs::scorers::MODULES
        .iter()
        .filter(|m| !m.is_base)
        .flat_map(|m| m.classes.iter().map(|c| c.dotted_name()))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResolveError {
    NoModule(String),
    NoClass { module: String, class: String },
    /// The module only holds shared parameters
    BaseScorer(String),
    Params(ParamError),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NoModule(module) => write!(f, "No module named {}", module),
            ResolveError::NoClass { module, class } => {
                write!(f, "Module {} has no scorer {}", module, class)
            }
            ResolveError::BaseScorer(module) => write!(f, "{} is a base scorer", module),
            ResolveError::Params(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ResolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ResolveError::Params(e) => Some(e),
            _ => None,
        }
    }
}

/// `name` could not be turned into a scorer.
#[derive(Debug, Clone, PartialEq)]
pub struct ScorerError {
    pub name: String,
    pub cause: ResolveError,
}

impl ScorerError {
    pub fn param_error(&self) -> Option<&ParamError> {
        match &self.cause {
            ResolveError::Params(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for ScorerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} is not a valid scorer.", self.cause, self.name)
    }
}

impl std::error::Error for ScorerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.cause)
    }
}
