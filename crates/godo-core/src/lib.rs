//! # godo-core
//!
//! Core types and tree reconstruction for godo.
//!
//! This crate provides the foundational types shared across all godo crates:
//! - The [`Task`](entities::Task) entity (task lists are tasks whose children
//!   are the list's top-level items)
//! - [`TaskStatus`](enums::TaskStatus) with its transition rules
//! - Cross-cutting error types
//! - [`Snapshot`](snapshot::Snapshot), the unit of cache replacement
//! - The tree builder that turns flat parent-pointer tasks into a forest, and
//!   the id-keyed [`TaskTree`](tree::TaskTree) arena used for navigation and
//!   single-node mutation

pub mod entities;
pub mod enums;
pub mod errors;
pub mod snapshot;
pub mod tree;

pub use entities::Task;
pub use enums::TaskStatus;
pub use errors::CoreError;
pub use snapshot::{Forest, Snapshot};
pub use tree::{TaskTree, build_forest, flatten};
