pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::{engine::ArchiveEngine, pipeline::ArchivePipeline};
pub use utils::error::{ArchiveError, Result};
