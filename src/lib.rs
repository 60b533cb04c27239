pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{memory::MemoryStore, snapshot::SnapshotStore, ActiveBackend};
pub use config::settings::Settings;
pub use crate::core::{
    defaults::DefaultsTable,
    format::{format_report, OutputMode},
    inspect::Inspector,
};
pub use domain::model::{HostScope, Origin, PreferenceValue, ResolutionResult, TypeTag, UserScope};
pub use domain::ports::PreferenceStore;
pub use utils::error::{PrefError, Result};
