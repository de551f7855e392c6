//! MERGE step for model objects.
//!
//! Folds model-object tables into an accumulator by object name:
//!
//! - A name not yet in the accumulator is moved in whole.
//! - A name already present keeps its first-seen `name` and `description`,
//!   and absorbs the incoming object's fluxes entry by entry. An incoming
//!   entry is added only if its reaction reference (the value) is not yet a
//!   value of the accumulator's map in the same direction. Local keys play
//!   no part in the test.
//!
//! ```text
//! accumulator  Glucose influx {a: exp1}
//! incoming     Glucose influx {b: exp2, c: exp1}
//! merged       Glucose influx {a: exp1, b: exp2}      (c skipped: exp1 present)
//! ```
//!
//! The reference set grows as entries are added, so when two incoming keys
//! point at the same new reference only the first is kept. A shared key with
//! a new reference replaces the accumulator's entry under that key.

use std::collections::HashSet;

use serde::Serialize;
use tracing::instrument;

use crate::model::{FluxDirection, FluxMap, ModelObject, ModelObjectTable};
use crate::report::Reporter;

// ---------------------------------------------------------------------------
// ObjectMergeStatistics
// ---------------------------------------------------------------------------

/// Counters collected while merging model objects.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ObjectMergeStatistics {
    /// Object count of each source table, accumulator first.
    pub source_counts: Vec<usize>,
    /// Objects moved in because their name was new.
    pub passed_through: usize,
    /// Objects whose fluxes were merged into an existing object.
    pub flux_merged: usize,
    /// Influx entries added to existing objects.
    pub influx_added: usize,
    /// Influx entries skipped because the reference was already present.
    pub influx_skipped: usize,
    /// Outflux entries added to existing objects.
    pub outflux_added: usize,
    /// Outflux entries skipped because the reference was already present.
    pub outflux_skipped: usize,
}

impl ObjectMergeStatistics {
    /// Sum of the source object counts.
    #[must_use]
    pub fn total(&self) -> usize {
        self.source_counts.iter().sum()
    }

    fn count(&mut self, direction: FluxDirection, added: bool) {
        let slot = match (direction, added) {
            (FluxDirection::Influx, true) => &mut self.influx_added,
            (FluxDirection::Influx, false) => &mut self.influx_skipped,
            (FluxDirection::Outflux, true) => &mut self.outflux_added,
            (FluxDirection::Outflux, false) => &mut self.outflux_skipped,
        };
        *slot += 1;
    }
}

// ---------------------------------------------------------------------------
// merge_fluxes
// ---------------------------------------------------------------------------

/// What happened to one incoming flux entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FluxEntryOutcome {
    /// The reference was new and the entry was inserted.
    Added(String),
    /// The reference was already a value of the accumulator's map.
    Skipped(String),
}

impl FluxEntryOutcome {
    /// The reaction reference of the entry.
    #[must_use]
    pub fn reference(&self) -> &str {
        match self {
            Self::Added(reference) | Self::Skipped(reference) => reference,
        }
    }

    /// Whether the entry was inserted.
    #[must_use]
    pub const fn is_added(&self) -> bool {
        matches!(self, Self::Added(_))
    }
}

/// Add each entry of `incoming` to `current` unless its reference is already
/// one of `current`'s values.
///
/// Returns one outcome per incoming entry, in `incoming` order.
pub fn merge_fluxes(current: &mut FluxMap, incoming: FluxMap) -> Vec<FluxEntryOutcome> {
    let mut present: HashSet<String> = current.values().cloned().collect();

    incoming
        .into_iter()
        .map(|(key, reference)| {
            if present.contains(&reference) {
                FluxEntryOutcome::Skipped(reference)
            } else {
                present.insert(reference.clone());
                current.insert(key, reference.clone());
                FluxEntryOutcome::Added(reference)
            }
        })
        .collect()
}

fn merge_existing(
    name: &str,
    current: &mut ModelObject,
    incoming: ModelObject,
    stats: &mut ObjectMergeStatistics,
    reporter: &mut dyn Reporter,
) {
    let ModelObject {
        influx, outflux, ..
    } = incoming;

    for (direction, flux) in [(FluxDirection::Influx, influx), (FluxDirection::Outflux, outflux)] {
        for outcome in merge_fluxes(current.flux_mut(direction), flux) {
            let (presence, verdict) = if outcome.is_added() {
                ("is not present", "merged")
            } else {
                ("is already present", "not merged")
            };
            reporter.report(&format!(
                "    {direction} ({}) in {name} {presence} in current object - {} {verdict}",
                outcome.reference(),
                lower(direction)
            ));
            stats.count(direction, outcome.is_added());
        }
    }
}

const fn lower(direction: FluxDirection) -> &'static str {
    match direction {
        FluxDirection::Influx => "influx",
        FluxDirection::Outflux => "outflux",
    }
}

fn join_names<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    names
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" | ")
}

// ---------------------------------------------------------------------------
// merge_model_objects
// ---------------------------------------------------------------------------

/// Fold `sources` into `acc` by object name, in order.
///
/// Returns the merge counters. Progress, including the merged names after
/// each source, goes to `reporter`.
#[instrument(skip_all, fields(sources = sources.len()))]
pub fn merge_model_objects(
    acc: &mut ModelObjectTable,
    sources: Vec<ModelObjectTable>,
    reporter: &mut dyn Reporter,
) -> ObjectMergeStatistics {
    reporter.report("Merging Model Objects ...");

    let mut stats = ObjectMergeStatistics {
        source_counts: std::iter::once(acc.len())
            .chain(sources.iter().map(ModelObjectTable::len))
            .collect(),
        ..ObjectMergeStatistics::default()
    };
    reporter.report(&format!(
        "Number of Model Objects: {}",
        stats
            .source_counts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    ));
    reporter.report(&format!(
        "... Total Numbers of Model Objects = {}",
        stats.total()
    ));
    reporter.report("");
    reporter.report(&format!(
        "  Names of Model Objects from Specification 1: {}",
        join_names(acc.keys())
    ));
    reporter.report("");

    for (index, source) in sources.into_iter().enumerate() {
        report_current(acc, reporter);
        reporter.report(&format!(
            "  Names of Model Objects from Specification {}: {}",
            index + 2,
            join_names(source.keys())
        ));
        reporter.report("");

        for (name, incoming) in source {
            if let Some(current) = acc.get_mut(&name) {
                reporter.report(&format!(
                    "    {name} object is in current merged list - merge fluxes"
                ));
                merge_existing(&name, current, incoming, &mut stats, reporter);
                stats.flux_merged += 1;
            } else {
                reporter.report(&format!(
                    "    {name} object is not in current merged list - full model object merge"
                ));
                acc.insert(name, incoming);
                stats.passed_through += 1;
            }
        }
        reporter.report("");
    }

    report_current(acc, reporter);

    tracing::debug!(
        objects = acc.len(),
        passed_through = stats.passed_through,
        flux_merged = stats.flux_merged,
        "merged model objects"
    );

    stats
}

fn report_current(acc: &ModelObjectTable, reporter: &mut dyn Reporter) {
    reporter.report(&format!("  Number of Merged Model Objects: {}", acc.len()));
    reporter.report(&format!(
        "  Current Names of Merged Model Objects: {}",
        join_names(acc.keys())
    ));
    reporter.report("");
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
