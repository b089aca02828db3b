// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! trellis-core: versioned, constraint-validated typed design graph.
//!
//! The core of the Trellis modeling tool: a typed object graph organized
//! into immutable [`FrozenFrame`]s with undo/redo history, validated against
//! a [`Metamodel`] of object types, traits, edge rules, and constraints.
//! Editing happens through copy-on-write [`TransientFrame`]s that are
//! atomically accepted or discarded; persistence is a JSON store with
//! version tolerance.
//!
//! Higher layers — simulators, expression evaluators, importers, user
//! interfaces — build on the frame, object, and graph-query surface exposed
//! here. The core is single-threaded with a scoped edit model: a transient
//! frame holds its design's only mutable borrow until the edit ends.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::missing_const_for_fn,
    clippy::redundant_pub_crate,
    clippy::module_name_repetitions,
    clippy::use_self,
    // Exact float comparison is intentional in the value conversion rules.
    clippy::float_cmp
)]

mod checker;
mod design;
mod frame;
mod ident;
mod identity;
/// Metamodel types: object types, traits, predicates, edge rules, and
/// constraints.
pub mod metamodel;
mod object;
mod snapshot_table;
/// Persistent store: raw JSON design format, reader, loader, and writer.
pub mod store;
mod transient;
mod value;

// Re-exports for the stable public API.
/// Frame validation: the checker, its phases, and their error types.
pub use checker::{
    ConstraintChecker, ConstraintViolation, EdgeRuleViolation, FrameValidationError,
    FrameValidationResult, ObjectTypeError, StructuralIntegrityError,
};
/// The top-level design database.
pub use design::{Design, DesignError};
/// Frames and graph queries.
pub use frame::{EdgeDirection, EdgeView, Frame, FrozenFrame, Neighbourhood};
/// Identifier types for objects, snapshots, and frames.
pub use ident::{FrameId, IdKind, ObjectId, SnapshotId};
/// Identity allocation and tracking.
pub use identity::{IdState, IdentityError, IdentityManager};
/// Object snapshots and their structural roles.
pub use object::{ObjectSnapshot, Structure};
/// Reference-counted snapshot storage.
pub use snapshot_table::SnapshotTable;
/// Transient editing: prototypes, the mutable frame, and accept/discard.
pub use transient::{
    AcceptError, ObjectPrototype, TransientError, TransientFrame, TransientState,
};
/// Attribute values and conversions.
pub use value::{
    AtomType, Point, ValueError, ValueType, Variant, VariantArray, VariantAtom, VariantEncoding,
};
