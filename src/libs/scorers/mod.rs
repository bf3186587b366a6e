//! Bundled scorers.
//!
//! Every scorer module exports a `MODULE` describing itself; a scorer is only
//! reachable by name once its `MODULE` is listed in [`MODULES`].

use crate::libs::scorer::ScorerModule;

pub mod basic;
pub mod caprasingh07;

pub const MODULES: &[ScorerModule] = &[
    basic::identity::MODULE,
    caprasingh07::base::MODULE,
    caprasingh07::js_divergence::MODULE,
    caprasingh07::shannon_entropy::MODULE,
];
