//! asm-merge library crate.
//!
//! Merges independently authored biochemical model specifications into one.
//! Each input is a parsed [`Specification`](model::Specification) plus its
//! [`ModelObjectTable`](model::ModelObjectTable); the pipeline in [`merge`]
//! renumbers reactions into one namespace, folds the specification tables,
//! and unions the flux references of model objects that share a name.
//!
//! Parsing inputs and consuming the merged result are left to the caller.

pub mod config;
pub mod error;
pub mod merge;
pub mod model;
pub mod report;

pub use config::{ConfigError, MergeConfig};
pub use error::MergeError;
pub use merge::{MergeOutcome, MergePipeline, merge_models};
pub use report::{CollectingReporter, NullReporter, Reporter, TracingReporter};
