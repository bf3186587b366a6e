//! Scorers from Capra & Singh (2007), "Predicting functionally important
//! residues from sequence conservation".

pub mod base;
pub mod js_divergence;
pub mod shannon_entropy;
