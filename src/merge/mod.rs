//! Specification merge engine.
//!
//! Implements the renumber → merge specifications → merge model objects
//! pipeline. Each stage is a separate module:
//!
//! - **renumber**: Give every reaction in the batch a unique `exp<n>`
//!   identifier and rewrite model-object flux keys to match.
//! - **specification**: Fold the five specification tables into the first
//!   specification and collect per-source statistics.
//! - **objects**: Fold model objects by name, unioning the flux references
//!   of objects that appear in several sources.
//! - **pipeline**: Validate the batch and run the three stages in order.
//!
//! # Determinism
//!
//! Tables preserve insertion order and sources are folded in input order, so
//! the same batch always yields the same identifiers and the same merged
//! tables.

pub mod objects;
pub mod pipeline;
pub mod renumber;
pub mod specification;

pub use objects::{FluxEntryOutcome, ObjectMergeStatistics, merge_fluxes, merge_model_objects};
pub use pipeline::{MergeOutcome, MergePipeline, merge_models};
pub use renumber::{RenumberOptions, RenumberOutcome, TranslationTable, renumber_batch, renumber_reactions};
pub use specification::{SpecificationStatistics, merge_specifications, merged_identifier_key};
