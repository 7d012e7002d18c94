//! Pipeline execution
//!
//! Drives one run end to end: profile the target, launch the scanners in
//! order, aggregate and classify their reports, then hand findings to the
//! model stages when a generator is configured.

pub mod engine;

pub use engine::ScanPipeline;
