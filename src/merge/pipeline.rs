//! The full merge: renumber → merge specifications → merge model objects.

use std::path::Path;

use tracing::instrument;

use crate::config::MergeConfig;
use crate::error::MergeError;
use crate::model::{ModelObjectTable, Specification};
use crate::report::{NullReporter, Reporter};

use super::objects::{ObjectMergeStatistics, merge_model_objects};
use super::renumber::{RenumberOptions, renumber_batch};
use super::specification::{SpecificationStatistics, merge_specifications};

/// Everything a merge run produces.
#[derive(Clone, Debug, PartialEq)]
pub struct MergeOutcome {
    /// All specifications folded into one.
    pub specification: Specification,
    /// All model-object tables folded into one.
    pub model_objects: ModelObjectTable,
    pub specification_stats: SpecificationStatistics,
    pub object_stats: ObjectMergeStatistics,
    /// The renumbering counter after the last specification.
    pub next_reaction: u64,
}

impl MergeOutcome {
    /// Split into the merged specification and model-object table.
    #[must_use]
    pub fn into_parts(self) -> (Specification, ModelObjectTable) {
        (self.specification, self.model_objects)
    }
}

/// Sequences the three merge stages over one batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergePipeline {
    options: RenumberOptions,
    start: u64,
    report: bool,
}

impl Default for MergePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl MergePipeline {
    /// A pipeline with default options: prefix `exp`, counter from 1, reporting on.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&MergeConfig::default())
    }

    /// A pipeline configured from a [`MergeConfig`].
    #[must_use]
    pub fn from_config(config: &MergeConfig) -> Self {
        Self {
            options: config.renumber.options(),
            start: config.renumber.start,
            report: config.report.enabled,
        }
    }

    /// A pipeline configured from a TOML file.
    ///
    /// A missing file gives the default pipeline.
    ///
    /// # Errors
    /// [`MergeError::Config`] if the file cannot be read, is not valid TOML,
    /// or holds invalid values.
    pub fn load(path: &Path) -> Result<Self, MergeError> {
        let config = MergeConfig::load(path)?;
        Ok(Self::from_config(&config))
    }

    /// The renumbering options in use.
    #[must_use]
    pub const fn options(&self) -> &RenumberOptions {
        &self.options
    }

    /// Merge a batch of specifications and their model-object tables.
    ///
    /// The first specification and the first table are the accumulators;
    /// the rest are folded into them in order. `reporter` is ignored when
    /// reporting is disabled in the configuration.
    ///
    /// # Errors
    /// - [`MergeError::EmptyInput`] if `specs` is empty.
    /// - [`MergeError::LengthMismatch`] if the lists differ in length.
    /// - [`MergeError::DanglingReference`] if a flux key names a reaction
    ///   missing from its own specification.
    /// - [`MergeError::CounterOverflow`] if renumbering runs past `u64::MAX`.
    #[instrument(skip_all, fields(specifications = specs.len()))]
    pub fn run(
        &self,
        specs: Vec<Specification>,
        object_tables: Vec<ModelObjectTable>,
        reporter: &mut dyn Reporter,
    ) -> Result<MergeOutcome, MergeError> {
        if specs.is_empty() {
            return Err(MergeError::EmptyInput);
        }
        if specs.len() != object_tables.len() {
            return Err(MergeError::LengthMismatch {
                specifications: specs.len(),
                object_tables: object_tables.len(),
            });
        }

        if self.report {
            self.run_stages(specs, object_tables, reporter)
        } else {
            self.run_stages(specs, object_tables, &mut NullReporter)
        }
    }

    fn run_stages(
        &self,
        mut specs: Vec<Specification>,
        mut object_tables: Vec<ModelObjectTable>,
        reporter: &mut dyn Reporter,
    ) -> Result<MergeOutcome, MergeError> {
        let next_reaction = renumber_batch(
            &mut specs,
            &mut object_tables,
            self.start,
            &self.options,
            reporter,
        )?;

        let mut specs = specs.into_iter();
        let mut object_tables = object_tables.into_iter();
        let (Some(mut specification), Some(mut model_objects)) =
            (specs.next(), object_tables.next())
        else {
            return Err(MergeError::EmptyInput);
        };

        let specification_stats =
            merge_specifications(&mut specification, specs.collect(), reporter);
        let object_stats = merge_model_objects(&mut model_objects, object_tables.collect(), reporter);

        tracing::debug!(
            reactions = specification.reactions.len(),
            objects = model_objects.len(),
            next_reaction,
            "merge complete"
        );

        Ok(MergeOutcome {
            specification,
            model_objects,
            specification_stats,
            object_stats,
            next_reaction,
        })
    }
}

/// Merge a batch with default options, reporting to `reporter`.
///
/// # Errors
/// See [`MergePipeline::run`].
pub fn merge_models(
    specs: Vec<Specification>,
    object_tables: Vec<ModelObjectTable>,
    reporter: &mut dyn Reporter,
) -> Result<(Specification, ModelObjectTable), MergeError> {
    MergePipeline::new()
        .run(specs, object_tables, reporter)
        .map(MergeOutcome::into_parts)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelObject;
    use crate::report::CollectingReporter;
    use serde_json::json;

    fn spec_with(reactions: &[&str]) -> Specification {
        let mut spec = Specification::new();
        for id in reactions {
            spec.insert_reaction(*id, json!(id));
        }
        spec
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = MergePipeline::new()
            .run(vec![], vec![], &mut NullReporter)
            .unwrap_err();
        assert!(matches!(err, MergeError::EmptyInput));
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = MergePipeline::new()
            .run(
                vec![spec_with(&["r1"]), spec_with(&["r1"])],
                vec![ModelObjectTable::new()],
                &mut NullReporter,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            MergeError::LengthMismatch {
                specifications: 2,
                object_tables: 1
            }
        ));
    }

    #[test]
    fn single_specification_is_renumbered_only() {
        let mut objects = ModelObjectTable::new();
        objects.insert("A".to_owned(), ModelObject::new("A", "").with_influx("r2", "r2"));
        let outcome = MergePipeline::new()
            .run(vec![spec_with(&["r1", "r2"])], vec![objects], &mut NullReporter)
            .unwrap();

        let keys: Vec<_> = outcome.specification.reactions.keys().cloned().collect();
        assert_eq!(keys, ["exp1", "exp2"]);
        assert!(outcome.model_objects["A"].influx.contains_key("exp2"));
        assert_eq!(outcome.next_reaction, 3);
        assert_eq!(outcome.specification_stats.source_count(), 1);
    }

    #[test]
    fn config_drives_prefix_start_and_reporting() {
        let config = MergeConfig::parse(
            "[renumber]\nprefix = \"m\"\nstart = 10\n\n[report]\nenabled = false\n",
        )
        .unwrap();
        let pipeline = MergePipeline::from_config(&config);
        assert_eq!(pipeline.options().prefix, "m");
        assert!(pipeline.options().model_objects);

        let mut sink = CollectingReporter::new();
        let outcome = pipeline
            .run(
                vec![spec_with(&["a"]), spec_with(&["b"])],
                vec![ModelObjectTable::new(), ModelObjectTable::new()],
                &mut sink,
            )
            .unwrap();

        let keys: Vec<_> = outcome.specification.reactions.keys().cloned().collect();
        assert_eq!(keys, ["m10", "m11"]);
        assert!(sink.messages.is_empty());
    }

    #[test]
    fn load_reads_options_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merge.toml");
        std::fs::write(&path, "[renumber]\nprefix = \"v\"\nmodel_objects = false\n").unwrap();

        let pipeline = MergePipeline::load(&path).unwrap();
        assert_eq!(pipeline.options().prefix, "v");
        assert!(!pipeline.options().model_objects);

        let missing = MergePipeline::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(missing, MergePipeline::new());
    }

    #[test]
    fn load_surfaces_bad_file_as_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merge.toml");
        std::fs::write(&path, "[renumber]\nprefix = \"\"\n").unwrap();

        let err = MergePipeline::load(&path).unwrap_err();
        match &err {
            MergeError::Config(config) => {
                assert_eq!(config.path.as_deref(), Some(path.as_path()));
                assert!(config.message.contains("prefix"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!err.is_invalid_argument());
        assert!(err.to_string().contains("merge.toml"));
    }

    #[test]
    fn merge_models_reports_every_stage() {
        let mut sink = CollectingReporter::new();
        let (spec, objects) = merge_models(
            vec![spec_with(&["r1"]), spec_with(&["r1"])],
            vec![ModelObjectTable::new(), ModelObjectTable::new()],
            &mut sink,
        )
        .unwrap();

        assert_eq!(spec.reactions.len(), 2);
        assert!(objects.is_empty());
        assert!(sink.contains("Renaming / Renumbering Reactions in Specification 2"));
        assert!(sink.contains("Merge Specifications ..."));
        assert!(sink.contains("Merging Model Objects ..."));
    }
}
