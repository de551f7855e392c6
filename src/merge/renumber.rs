//! RENUMBER step of the merge pipeline.
//!
//! Reaction identifiers are only unique within the specification that
//! declared them. Before specifications can be folded together, every
//! reaction in the batch is given a fresh identifier `<prefix><n>` from one
//! counter shared by the whole batch, so identifiers never repeat across
//! specifications.
//!
//! Each (specification, model-object table) pair is renumbered with its own
//! translation table:
//!
//! ```text
//! Specification 1: r1 r2      → exp1 exp2
//! Specification 2: r1 r2 r3   → exp3 exp4 exp5
//! ```
//!
//! The `Reactions` table and every model object's flux keys are rebuilt from
//! the same translation table, which keeps them in lockstep. Flux values are
//! carried over unchanged.

use indexmap::IndexMap;
use tracing::instrument;

use crate::error::MergeError;
use crate::model::{FluxDirection, FluxMap, ModelObjectTable, Specification};
use crate::report::Reporter;

/// Old reaction identifier → renumbered identifier, in allocation order.
pub type TranslationTable = IndexMap<String, String>;

// ---------------------------------------------------------------------------
// RenumberOptions
// ---------------------------------------------------------------------------

/// What a renumbering pass rewrites.
///
/// The translation table is computed and the counter advanced regardless of
/// the two switches, so a batch's identifier namespace never depends on them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenumberOptions {
    /// Prefix of every renumbered identifier.
    pub prefix: String,
    /// Rewrite the specification's `Reactions` table.
    pub specification: bool,
    /// Rewrite the flux keys of every model object.
    pub model_objects: bool,
}

impl Default for RenumberOptions {
    fn default() -> Self {
        Self {
            prefix: "exp".to_owned(),
            specification: true,
            model_objects: true,
        }
    }
}

// ---------------------------------------------------------------------------
// RenumberOutcome
// ---------------------------------------------------------------------------

/// The result of renumbering one pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenumberOutcome {
    /// How each reaction of the specification was renamed.
    pub translation: TranslationTable,
    /// The counter value the next pair starts from.
    pub next: u64,
}

// ---------------------------------------------------------------------------
// renumber_reactions
// ---------------------------------------------------------------------------

/// Renumber the reactions of one specification and its model objects.
///
/// `model_number` is the 1-based position of the pair in its batch and is
/// used for reporting and errors only. Identifiers are allocated from
/// `counter` in the `Reactions` table's iteration order.
///
/// The pair is left untouched when an error is returned.
///
/// # Errors
/// - [`MergeError::DanglingReference`] if a flux key is not a reaction of
///   `spec` (only checked when model objects are rewritten).
/// - [`MergeError::CounterOverflow`] if the counter would pass `u64::MAX`.
#[instrument(skip_all, fields(model = model_number, counter = counter))]
pub fn renumber_reactions(
    model_number: usize,
    counter: u64,
    spec: &mut Specification,
    objects: &mut ModelObjectTable,
    options: &RenumberOptions,
    reporter: &mut dyn Reporter,
) -> Result<RenumberOutcome, MergeError> {
    let mut translation = TranslationTable::with_capacity(spec.reactions.len());
    let mut next = counter;
    for old_id in spec.reactions.keys() {
        translation.insert(old_id.clone(), format!("{}{next}", options.prefix));
        next = next
            .checked_add(1)
            .ok_or_else(|| MergeError::CounterOverflow {
                specification: model_number,
                start: counter,
                reactions: spec.reactions.len(),
            })?;
    }

    // Stage every object's new fluxes first so a dangling reference leaves
    // the pair as it was.
    let staged = if options.model_objects {
        objects
            .iter()
            .map(|(key, obj)| -> Result<(FluxMap, FluxMap), MergeError> {
                Ok((
                    translate_flux(model_number, key, FluxDirection::Influx, &obj.influx, &translation)?,
                    translate_flux(model_number, key, FluxDirection::Outflux, &obj.outflux, &translation)?,
                ))
            })
            .collect::<Result<Vec<_>, MergeError>>()?
    } else {
        Vec::new()
    };

    if options.specification {
        reporter.report(&format!(
            "Renaming / Renumbering Reactions in Specification {model_number}"
        ));
        let old_reactions = std::mem::take(&mut spec.reactions);
        spec.reactions = old_reactions
            .into_iter()
            .zip(translation.values())
            .map(|((old_id, definition), new_id)| {
                reporter.report(&format!(
                    "  Specification {model_number}: {old_id} --> {new_id}"
                ));
                (new_id.clone(), definition)
            })
            .collect();
        reporter.report("");
    }

    if options.model_objects {
        reporter.report(&format!(
            "  Number of Model Objects in Specification {model_number}: {}",
            objects.len()
        ));
        reporter.report("");
        for (index, (obj, (influx, outflux))) in objects.values_mut().zip(staged).enumerate() {
            reporter.report(&format!(
                "  Object Name / Description {}: {} | {}",
                index + 1,
                obj.name,
                obj.description
            ));
            reporter.report("");
            report_flux_renames(reporter, FluxDirection::Influx, &obj.influx, &influx);
            report_flux_renames(reporter, FluxDirection::Outflux, &obj.outflux, &outflux);
            obj.influx = influx;
            obj.outflux = outflux;
            reporter.report("");
        }
    }

    tracing::debug!(
        reactions = translation.len(),
        objects = objects.len(),
        next,
        "renumbered specification"
    );

    Ok(RenumberOutcome { translation, next })
}

/// Rebuild a flux map with translated keys, keeping values.
fn translate_flux(
    model_number: usize,
    object: &str,
    direction: FluxDirection,
    flux: &FluxMap,
    translation: &TranslationTable,
) -> Result<FluxMap, MergeError> {
    flux.iter()
        .map(|(key, reference)| -> Result<(String, String), MergeError> {
            let new_key = translation
                .get(key)
                .ok_or_else(|| MergeError::DanglingReference {
                    specification: model_number,
                    object: object.to_owned(),
                    direction,
                    reaction: key.clone(),
                })?;
            Ok((new_key.clone(), reference.clone()))
        })
        .collect()
}

fn report_flux_renames(
    reporter: &mut dyn Reporter,
    direction: FluxDirection,
    before: &FluxMap,
    after: &FluxMap,
) {
    for (old_key, new_key) in before.keys().zip(after.keys()) {
        reporter.report(&format!("    {direction} {old_key} --> {new_key}"));
    }
}

// ---------------------------------------------------------------------------
// renumber_batch
// ---------------------------------------------------------------------------

/// Renumber every pair of a batch from one shared counter.
///
/// Returns the counter value after the last pair. Pairs before a failing
/// pair stay renumbered.
///
/// # Errors
/// - [`MergeError::LengthMismatch`] if the slices differ in length.
/// - [`MergeError::DanglingReference`] or [`MergeError::CounterOverflow`]
///   from [`renumber_reactions`].
pub fn renumber_batch(
    specs: &mut [Specification],
    objects: &mut [ModelObjectTable],
    start: u64,
    options: &RenumberOptions,
    reporter: &mut dyn Reporter,
) -> Result<u64, MergeError> {
    if specs.len() != objects.len() {
        return Err(MergeError::LengthMismatch {
            specifications: specs.len(),
            object_tables: objects.len(),
        });
    }

    let mut counter = start;
    for (index, (spec, table)) in specs.iter_mut().zip(objects.iter_mut()).enumerate() {
        counter = renumber_reactions(index + 1, counter, spec, table, options, reporter)?.next;
    }
    Ok(counter)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
