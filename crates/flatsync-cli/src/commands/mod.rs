//! Command implementations for flatsync-cli

pub mod list;
pub mod record;

pub use list::run_list;
pub use record::{run_get, run_remove, run_set};
