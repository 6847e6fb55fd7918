//! Processing of external data files.

pub mod phenotype;
