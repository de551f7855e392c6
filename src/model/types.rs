//! Core model types for specification merging.
//!
//! A [`Specification`] is the parsed form of one model: five string-keyed
//! tables whose values are opaque to the merge. A [`ModelObject`] is one
//! substance with the reactions that feed it (`influx`) and drain it
//! (`outflux`). Both are produced by an external parser and consumed by the
//! merge pipeline in [`crate::merge`].
//!
//! Every table is an [`IndexMap`], so iteration follows insertion order.
//! Renumbering allocates identifiers in that order.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A string-keyed, insertion-ordered table of opaque values.
pub type Table = IndexMap<String, serde_json::Value>;

/// Flux references of a [`ModelObject`]: reaction identifier → reaction reference.
pub type FluxMap = IndexMap<String, String>;

/// Model objects keyed by object name.
pub type ModelObjectTable = IndexMap<String, ModelObject>;

// ---------------------------------------------------------------------------
// TableKind
// ---------------------------------------------------------------------------

/// The five tables of a [`Specification`], in canonical order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TableKind {
    Identifiers,
    Objects,
    Initials,
    Variables,
    Reactions,
}

impl TableKind {
    /// All table kinds in canonical order.
    pub const ALL: [Self; 5] = [
        Self::Identifiers,
        Self::Objects,
        Self::Initials,
        Self::Variables,
        Self::Reactions,
    ];

    /// The table's display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Identifiers => "Identifiers",
            Self::Objects => "Objects",
            Self::Initials => "Initials",
            Self::Variables => "Variables",
            Self::Reactions => "Reactions",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Specification
// ---------------------------------------------------------------------------

/// One parsed model specification.
///
/// Keys are unique within each table. Values are never inspected by the
/// merge; they are moved between tables as-is.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Specification {
    /// Identifier declarations.
    #[serde(default)]
    pub identifiers: Table,
    /// Object (species) declarations.
    #[serde(default)]
    pub objects: Table,
    /// Initial conditions.
    #[serde(default)]
    pub initials: Table,
    /// Model variables.
    #[serde(default)]
    pub variables: Table,
    /// Reaction identifier → reaction definition.
    #[serde(default)]
    pub reactions: Table,
}

impl Specification {
    /// Create an empty specification.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the table of the given kind.
    #[must_use]
    pub const fn table(&self, kind: TableKind) -> &Table {
        match kind {
            TableKind::Identifiers => &self.identifiers,
            TableKind::Objects => &self.objects,
            TableKind::Initials => &self.initials,
            TableKind::Variables => &self.variables,
            TableKind::Reactions => &self.reactions,
        }
    }

    /// Mutably borrow the table of the given kind.
    pub const fn table_mut(&mut self, kind: TableKind) -> &mut Table {
        match kind {
            TableKind::Identifiers => &mut self.identifiers,
            TableKind::Objects => &mut self.objects,
            TableKind::Initials => &mut self.initials,
            TableKind::Variables => &mut self.variables,
            TableKind::Reactions => &mut self.reactions,
        }
    }

    /// Insert a reaction definition, returning the previous one for `id`.
    pub fn insert_reaction(
        &mut self,
        id: impl Into<String>,
        definition: serde_json::Value,
    ) -> Option<serde_json::Value> {
        self.reactions.insert(id.into(), definition)
    }

    /// Number of entries per table, in [`TableKind::ALL`] order.
    #[must_use]
    pub fn cardinalities(&self) -> [usize; 5] {
        TableKind::ALL.map(|kind| self.table(kind).len())
    }
}

// ---------------------------------------------------------------------------
// ModelObject
// ---------------------------------------------------------------------------

/// A named substance with the reactions that produce and consume it.
///
/// The containing [`ModelObjectTable`] key is the object's identity; `name`
/// is for display and need not match it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelObject {
    pub name: String,
    pub description: String,
    /// Reactions feeding this object.
    #[serde(default)]
    pub influx: FluxMap,
    /// Reactions draining this object.
    #[serde(default)]
    pub outflux: FluxMap,
}

impl ModelObject {
    /// Create an object with empty fluxes.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            influx: FluxMap::new(),
            outflux: FluxMap::new(),
        }
    }

    /// Add an influx entry (builder style).
    #[must_use]
    pub fn with_influx(mut self, key: impl Into<String>, reference: impl Into<String>) -> Self {
        self.influx.insert(key.into(), reference.into());
        self
    }

    /// Add an outflux entry (builder style).
    #[must_use]
    pub fn with_outflux(mut self, key: impl Into<String>, reference: impl Into<String>) -> Self {
        self.outflux.insert(key.into(), reference.into());
        self
    }

    /// Borrow the flux map for `direction`.
    #[must_use]
    pub const fn flux(&self, direction: FluxDirection) -> &FluxMap {
        match direction {
            FluxDirection::Influx => &self.influx,
            FluxDirection::Outflux => &self.outflux,
        }
    }

    /// Mutably borrow the flux map for `direction`.
    pub const fn flux_mut(&mut self, direction: FluxDirection) -> &mut FluxMap {
        match direction {
            FluxDirection::Influx => &mut self.influx,
            FluxDirection::Outflux => &mut self.outflux,
        }
    }
}

// ---------------------------------------------------------------------------
// FluxDirection
// ---------------------------------------------------------------------------

/// Which flux map of a [`ModelObject`] an entry belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FluxDirection {
    Influx,
    Outflux,
}

impl FluxDirection {
    /// Both directions, influx first.
    pub const BOTH: [Self; 2] = [Self::Influx, Self::Outflux];
}

impl fmt::Display for FluxDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Influx => write!(f, "Influx"),
            Self::Outflux => write!(f, "Outflux"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
