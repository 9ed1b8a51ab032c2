//! Host-side table management.
//!
//! The engine is a plain synchronous state machine; this module supplies
//! what a chat host needs around it:
//!
//! - [`TableRegistry`]: explicit table-id → game map (no global)
//! - [`Table`]: per-table async mutex serializing commands
//! - [`RoundTimer`]: cancellable deferred round start
//!
//! Requires a tokio runtime for [`Table::apply`].

mod registry;
mod timer;

pub use registry::{Table, TableError, TableId, TableRegistry};
pub use timer::RoundTimer;
