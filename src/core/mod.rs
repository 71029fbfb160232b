pub mod downloader;
pub mod engine;
pub mod menu;
pub mod pipeline;

pub use crate::domain::model::{
    ArchivePlan, Division, DivisionBatch, DivisionReport, DownloadJob, DownloadOutcome, Submission,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, SheetSource, Storage, VideoFetcher};
pub use crate::utils::error::Result;
