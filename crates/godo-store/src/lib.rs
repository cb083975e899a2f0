//! # godo-store
//!
//! Local persistence for godo.
//!
//! Every write goes to a uniquely named temporary file in the destination
//! directory, is flushed and fsynced, then renamed over the destination. A
//! crash at any point leaves either the old file or the new one, never a
//! truncated mix.
//!
//! - [`SnapshotStore`]: the task forest as a JSON array of task trees
//! - [`TokenStore`]: the OAuth access/refresh token pair

mod atomic;
pub mod error;
pub mod snapshot_store;
pub mod token_store;

pub use atomic::write_atomic;
pub use error::StoreError;
pub use snapshot_store::SnapshotStore;
pub use token_store::{OAuthToken, TokenStore};
