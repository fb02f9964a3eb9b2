//! Connection dispatch and process-wide server state.

pub mod context;
pub mod listener;

pub use context::ServerContext;
