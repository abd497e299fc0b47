//! Flat-file record synchronization engine
//!
//! Reconciles desired resource states against line-oriented backing files
//! (account tables, host tables, cron tables):
//!
//! - **Prefetch**: read and parse every known target into the record store
//! - **Match**: bind parsed records to registered instances by name, or by
//!   the format's custom predicate
//! - **Mutate**: read and write attributes through a [`FieldProxy`]; writes
//!   mark the affected targets dirty
//! - **Flush**: write each dirty target once, in path order, keeping every
//!   record nobody manages
//!
//! # Architecture
//!
//! ```text
//!          FlatFileSync<F: RecordFormat>   (one per record kind)
//!                        |
//!   +-------------+------+------+-----------+-------------+
//!   |             |             |           |             |
//! RecordStore TargetRegistry DirtySet InstanceRegistry  FieldProxy
//!                 |
//!          flatsync-fs::BackingFile
//! ```

pub mod config;
pub mod dirty;
pub mod engine;
pub mod error;
pub mod flush;
pub mod format;
pub mod instance;
pub mod logging;
mod matcher;
pub mod proxy;
pub mod record;
pub mod store;
pub mod target;

pub use config::KindConfig;
pub use dirty::DirtySet;
pub use engine::FlatFileSync;
pub use error::{Error, Result};
pub use flush::{FlushReport, FlushedTarget};
pub use format::RecordFormat;
pub use instance::{DesiredInstance, InstanceRegistry, Resource};
pub use proxy::{Event, FieldProxy};
pub use record::{CleanRecord, Ensure, Fields, Record};
pub use store::{RecordId, RecordStore};
pub use target::{Target, TargetRegistry};
