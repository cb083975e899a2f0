//! Entity structs for godo domain objects.
//!
//! Task lists have no struct of their own: a list is a [`Task`] whose `tasks`
//! are the list's top-level items.

mod task;

pub use task::Task;
