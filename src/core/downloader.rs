use crate::domain::model::{DownloadJob, DownloadOutcome, FetchError};
use crate::domain::ports::VideoFetcher;
use crate::utils::error::{ArchiveError, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::process::Command;
use tokio::sync::Semaphore;

/// Stderr fragments yt-dlp emits when the platform took the video down.
/// Anything else counts as an ordinary failure worth retrying manually.
const UNAVAILABLE_MARKERS: [&str; 5] = [
    "Video unavailable",
    "Private video",
    "has been removed",
    "account associated with this video has been terminated",
    "no longer available",
];

/// Invokes yt-dlp (or a compatible program) as a subprocess.
pub struct YtDlpFetcher {
    program: String,
}

impl YtDlpFetcher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `--print after_move:filepath` makes yt-dlp report the final file path
    /// on stdout; `--no-simulate` keeps the download itself enabled.
    fn build_args(dest_dir: &Path, file_stem: &str, url: &str) -> Vec<String> {
        vec![
            "--no-playlist".to_string(),
            "--no-progress".to_string(),
            "--no-simulate".to_string(),
            "--print".to_string(),
            "after_move:filepath".to_string(),
            "-o".to_string(),
            format!("{}/{}.%(ext)s", dest_dir.display(), file_stem),
            url.to_string(),
        ]
    }

    fn classify_failure(stderr: &str) -> FetchError {
        if UNAVAILABLE_MARKERS
            .iter()
            .any(|marker| stderr.contains(marker))
        {
            return FetchError::Unavailable;
        }

        let reason = stderr
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("downloader exited with an error")
            .trim()
            .to_string();
        FetchError::Failed(reason)
    }
}

#[async_trait]
impl VideoFetcher for YtDlpFetcher {
    async fn fetch(
        &self,
        url: &str,
        dest_dir: &Path,
        file_stem: &str,
    ) -> std::result::Result<PathBuf, FetchError> {
        tracing::debug!("Running {} for {}", self.program, url);

        let output = Command::new(&self.program)
            .args(Self::build_args(dest_dir, file_stem, url))
            .output()
            .await
            .map_err(|e| FetchError::Failed(format!("failed to run {}: {}", self.program, e)))?;

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            let path = stdout
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .map(|line| PathBuf::from(line.trim()))
                .unwrap_or_else(|| dest_dir.join(file_stem));
            Ok(path)
        } else {
            Err(Self::classify_failure(&String::from_utf8_lossy(
                &output.stderr,
            )))
        }
    }
}

/// Fan independent downloads out over a bounded worker pool and collect the
/// per-job outcomes. Completion order is not preserved and jobs share no
/// state; with a pool size of 1 the downloads stay strictly sequential.
pub async fn run_jobs<F>(
    fetcher: Arc<F>,
    dest_dir: PathBuf,
    jobs: Vec<DownloadJob>,
    concurrency: usize,
) -> Result<Vec<(DownloadJob, DownloadOutcome)>>
where
    F: VideoFetcher + 'static,
{
    if concurrency <= 1 {
        let mut results = Vec::with_capacity(jobs.len());
        for job in jobs {
            let outcome = DownloadOutcome::from(
                fetcher
                    .fetch(&job.submission.link, &dest_dir, &job.file_stem)
                    .await,
            );
            results.push((job, outcome));
        }
        return Ok(results);
    }

    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut handles = Vec::with_capacity(jobs.len());

    for job in jobs {
        let fetcher = Arc::clone(&fetcher);
        let semaphore = Arc::clone(&semaphore);
        let dest_dir = dest_dir.clone();

        handles.push(tokio::spawn(async move {
            let outcome = match semaphore.acquire_owned().await {
                Ok(_permit) => DownloadOutcome::from(
                    fetcher
                        .fetch(&job.submission.link, &dest_dir, &job.file_stem)
                        .await,
                ),
                Err(_) => DownloadOutcome::Failed("worker pool closed".to_string()),
            };
            (job, outcome)
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let entry = handle.await.map_err(|e| ArchiveError::ProcessingError {
            message: format!("download worker panicked: {}", e),
        })?;
        results.push(entry);
    }

    Ok(results)
}
