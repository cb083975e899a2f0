//! Tree reconstruction and navigation.
//!
//! - [`build_forest`] assembles one list's flat tasks into owned trees.
//! - [`TaskTree`] indexes a forest by id for lookup and single-node edits.

mod arena;
mod builder;

pub use arena::TaskTree;
pub use builder::{MAX_HIERARCHY_DEPTH, build_forest, flatten};
