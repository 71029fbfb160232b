use crate::domain::model::{ArchivePlan, ColumnMap, FetchError, Submission};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn sheet_source(&self) -> &str;
    fn contest_name(&self) -> &str;
    fn output_path(&self) -> &str;
    fn concurrent_downloads(&self) -> usize;
    fn zip_divisions(&self) -> bool;
}

/// Where submission rows come from: a local CSV export or a published sheet.
#[async_trait]
pub trait SheetSource: Send + Sync {
    async fn fetch_rows(&self, columns: &ColumnMap) -> Result<Vec<Submission>>;
}

/// The external video downloader. Implementations must distinguish a video
/// the platform took down from an ordinary failure.
#[async_trait]
pub trait VideoFetcher: Send + Sync {
    async fn fetch(
        &self,
        url: &str,
        dest_dir: &Path,
        file_stem: &str,
    ) -> std::result::Result<PathBuf, FetchError>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Submission>>;
    async fn transform(&self, rows: Vec<Submission>) -> Result<ArchivePlan>;
    async fn load(&self, plan: ArchivePlan) -> Result<String>;
}
