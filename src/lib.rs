//! Exomiser library main entry point.

pub mod annotate;
pub mod common;
pub mod data;
pub mod filter;
pub mod genome;
pub mod model;
pub mod server;
pub mod settings;
pub mod vcf;
pub mod writer;

/// Information about the build.
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}
