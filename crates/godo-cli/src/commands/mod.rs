pub mod auth;
pub mod dispatch;
pub mod edit;
pub mod show;
pub mod sync;
pub mod watch;
