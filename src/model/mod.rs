//! Model data contracts shared by every merge stage.

pub mod types;

pub use types::{FluxDirection, FluxMap, ModelObject, ModelObjectTable, Specification, Table, TableKind};
