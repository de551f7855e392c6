//! MERGE step for specification tables.
//!
//! Folds a list of specifications into an accumulator, table by table:
//!
//! - **Identifiers**: every incoming key is inserted as `<key>_1`. The
//!   suffix is the same for every key, so two incoming keys only stay apart
//!   if they were already distinct, and an incoming `k` always replaces an
//!   earlier `k_1` in the accumulator.
//! - **Objects, Initials, Variables, Reactions**: key-for-key union. On a
//!   key collision the incoming value replaces the accumulator's
//!   (last source wins).
//!
//! Reactions are disjoint after renumbering, so the `Reactions` union never
//! collides in a full pipeline run.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use tracing::instrument;

use crate::model::{Specification, TableKind};
use crate::report::Reporter;

/// Suffix index appended to every merged identifier key.
const IDENTIFIER_SUFFIX: u32 = 1;

// ---------------------------------------------------------------------------
// SpecificationStatistics
// ---------------------------------------------------------------------------

/// Source cardinalities of each table, accumulator first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SpecificationStatistics {
    counts: BTreeMap<TableKind, Vec<usize>>,
}

impl SpecificationStatistics {
    fn record(&mut self, spec: &Specification) {
        for kind in TableKind::ALL {
            self.counts
                .entry(kind)
                .or_default()
                .push(spec.table(kind).len());
        }
    }

    /// Per-source sizes of `kind`, in fold order.
    #[must_use]
    pub fn counts(&self, kind: TableKind) -> &[usize] {
        self.counts.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Sum of the per-source sizes of `kind`.
    #[must_use]
    pub fn total(&self, kind: TableKind) -> usize {
        self.counts(kind).iter().sum()
    }

    /// Number of sources recorded (accumulator included).
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.counts(TableKind::Identifiers).len()
    }

    /// The report lines for every table: sizes, then total.
    #[must_use]
    pub fn report_lines(&self) -> Vec<String> {
        TableKind::ALL
            .into_iter()
            .flat_map(|kind| {
                let sizes = self
                    .counts(kind)
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                [
                    format!("Numbers of {kind} = {sizes}"),
                    format!("... Total Numbers of {kind} = {}", self.total(kind)),
                ]
            })
            .collect()
    }
}

impl fmt::Display for SpecificationStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.report_lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// merge_specifications
// ---------------------------------------------------------------------------

/// The key an incoming identifier is stored under in the accumulator.
#[must_use]
pub fn merged_identifier_key(key: &str) -> String {
    format!("{key}_{IDENTIFIER_SUFFIX}")
}

/// Fold `sources` into `acc`, in order.
///
/// Returns the per-table statistics, which are also sent to `reporter`.
#[instrument(skip_all, fields(sources = sources.len()))]
pub fn merge_specifications(
    acc: &mut Specification,
    sources: Vec<Specification>,
    reporter: &mut dyn Reporter,
) -> SpecificationStatistics {
    reporter.report("Merge Specifications ...");

    let mut stats = SpecificationStatistics::default();
    stats.record(acc);

    for source in sources {
        stats.record(&source);
        let Specification {
            identifiers,
            objects,
            initials,
            variables,
            reactions,
        } = source;

        acc.identifiers.extend(
            identifiers
                .into_iter()
                .map(|(key, value)| (merged_identifier_key(&key), value)),
        );
        acc.objects.extend(objects);
        acc.initials.extend(initials);
        acc.variables.extend(variables);
        acc.reactions.extend(reactions);
    }

    for line in stats.report_lines() {
        reporter.report(&line);
    }
    reporter.report("");

    tracing::debug!(
        sources = stats.source_count(),
        reactions = acc.reactions.len(),
        "merged specifications"
    );

    stats
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Table;
    use crate::report::{CollectingReporter, NullReporter};
    use serde_json::json;

    fn tbl(entries: &[(&str, i64)]) -> Table {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_owned(), json!(v)))
            .collect()
    }

    fn spec(
        identifiers: &[(&str, i64)],
        objects: &[(&str, i64)],
        reactions: &[(&str, i64)],
    ) -> Specification {
        Specification {
            identifiers: tbl(identifiers),
            objects: tbl(objects),
            reactions: tbl(reactions),
            ..Specification::default()
        }
    }

    #[test]
    fn no_sources_leaves_accumulator() {
        let mut acc = spec(&[("id", 1)], &[("A", 1)], &[("exp1", 1)]);
        let before = acc.clone();
        let stats = merge_specifications(&mut acc, vec![], &mut NullReporter);
        assert_eq!(acc, before);
        assert_eq!(stats.counts(TableKind::Objects), [1]);
        assert_eq!(stats.source_count(), 1);
    }

    #[test]
    fn identifiers_get_suffix() {
        let mut acc = spec(&[("model", 0)], &[], &[]);
        let incoming = spec(&[("model", 1), ("author", 2)], &[], &[]);
        merge_specifications(&mut acc, vec![incoming], &mut NullReporter);

        let keys: Vec<_> = acc.identifiers.keys().map(String::as_str).collect();
        assert_eq!(keys, ["model", "model_1", "author_1"]);
        assert_eq!(acc.identifiers["model"], json!(0));
        assert_eq!(acc.identifiers["model_1"], json!(1));
    }

    #[test]
    fn identifiers_from_two_sources_collide_on_suffix() {
        let mut acc = spec(&[], &[], &[]);
        let first = spec(&[("model", 1)], &[], &[]);
        let second = spec(&[("model", 2)], &[], &[]);
        merge_specifications(&mut acc, vec![first, second], &mut NullReporter);

        assert_eq!(acc.identifiers.len(), 1);
        assert_eq!(acc.identifiers["model_1"], json!(2));
    }

    #[test]
    fn colliding_keys_take_last_value() {
        let mut acc = spec(&[], &[("A", 1), ("B", 1)], &[]);
        let s2 = spec(&[], &[("B", 2), ("C", 2)], &[]);
        let s3 = spec(&[], &[("C", 3)], &[]);
        merge_specifications(&mut acc, vec![s2, s3], &mut NullReporter);

        assert_eq!(acc.objects, tbl(&[("A", 1), ("B", 2), ("C", 3)]));
    }

    #[test]
    fn initials_and_variables_union() {
        let mut acc = Specification {
            initials: tbl(&[("A", 10)]),
            variables: tbl(&[("k1", 1)]),
            ..Specification::default()
        };
        let incoming = Specification {
            initials: tbl(&[("A", 20), ("B", 5)]),
            variables: tbl(&[("k2", 2)]),
            ..Specification::default()
        };
        merge_specifications(&mut acc, vec![incoming], &mut NullReporter);
        assert_eq!(acc.initials, tbl(&[("A", 20), ("B", 5)]));
        assert_eq!(acc.variables, tbl(&[("k1", 1), ("k2", 2)]));
    }

    #[test]
    fn disjoint_reactions_are_a_pure_union() {
        let mut acc = spec(&[], &[], &[("exp1", 1), ("exp2", 2)]);
        let incoming = spec(&[], &[], &[("exp3", 3)]);
        let stats = merge_specifications(&mut acc, vec![incoming], &mut NullReporter);
        assert_eq!(acc.reactions.len(), 3);
        assert_eq!(acc.reactions.len(), stats.total(TableKind::Reactions));
    }

    #[test]
    fn statistics_count_sources_not_result() {
        let mut acc = spec(&[("a", 0)], &[("A", 0)], &[("exp1", 0)]);
        let s2 = spec(&[("a", 0), ("b", 0)], &[("A", 0)], &[]);
        let s3 = spec(&[], &[("B", 0), ("C", 0)], &[("exp2", 0)]);
        let stats = merge_specifications(&mut acc, vec![s2, s3], &mut NullReporter);

        assert_eq!(stats.counts(TableKind::Identifiers), [1, 2, 0]);
        assert_eq!(stats.counts(TableKind::Objects), [1, 1, 2]);
        assert_eq!(stats.total(TableKind::Objects), 4);
        assert_eq!(acc.objects.len(), 3);
        assert_eq!(stats.counts(TableKind::Initials), [0, 0, 0]);
        assert_eq!(stats.source_count(), 3);
    }

    #[test]
    fn reports_statistics_lines() {
        let mut acc = spec(&[], &[("A", 0)], &[]);
        let incoming = spec(&[], &[("B", 0), ("C", 0)], &[]);
        let mut sink = CollectingReporter::new();
        let stats = merge_specifications(&mut acc, vec![incoming], &mut sink);

        assert_eq!(sink.messages[0], "Merge Specifications ...");
        assert!(sink.contains("Numbers of Objects = 1, 2"));
        assert!(sink.contains("... Total Numbers of Objects = 3"));
        assert!(sink.contains("... Total Numbers of Reactions = 0"));
        assert!(stats.to_string().contains("Numbers of Identifiers = 0, 0"));
    }
}
