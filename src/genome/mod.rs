//! Genome coordinates, transcript models, and consequence prediction.

pub mod bnd;
pub mod contig;
pub mod csq;
pub mod position;
pub mod seq;
pub mod service;
pub mod sv;
pub mod sv_csq;
pub mod txs;
pub mod variant;
