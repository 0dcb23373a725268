//! # qms-core
//!
//! Core types shared by every crate of the audit response engine.
//!
//! This crate provides:
//! - The answer model (`QuestionResponse`, `ResponsePatch`, `Score`)
//! - The standard section hierarchy (`SectionNode`, `SectionTree`)
//! - Immutable merged-response snapshots consumed by progress aggregation
//! - Record shapes exchanged with the persistence collaborator
//! - Save and section status enums with their transition rules
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod records;
pub mod snapshot;
pub mod tree;

pub use entities::{QuestionResponse, ResponsePatch, SectionNode};
pub use enums::{SaveFailureKind, SaveStatus, Score, SectionStatus};
pub use errors::CoreError;
pub use records::{ResponseUpsert, StoredResponse};
pub use snapshot::ResponseSnapshot;
pub use tree::SectionTree;
