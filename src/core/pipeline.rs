use crate::core::downloader;
use crate::domain::model::{
    ArchivePlan, ColumnMap, Division, DivisionBatch, DivisionReport, DownloadJob, DownloadOutcome,
    RunSummary, Submission,
};
use crate::domain::ports::{ConfigProvider, Pipeline, SheetSource, Storage, VideoFetcher};
use crate::utils::error::{ArchiveError, Result};
use regex::Regex;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use zip::write::{FileOptions, ZipWriter};

/// The one-shot archive pipeline: fetch sheet rows, plan per-division
/// downloads and manifests, then download and organize everything under the
/// output root.
pub struct ArchivePipeline<Src, S, F, C>
where
    Src: SheetSource,
    S: Storage,
    F: VideoFetcher + 'static,
    C: ConfigProvider,
{
    source: Src,
    storage: S,
    fetcher: Arc<F>,
    config: C,
    columns: ColumnMap,
    selections: Vec<Division>,
}

impl<Src, S, F, C> ArchivePipeline<Src, S, F, C>
where
    Src: SheetSource,
    S: Storage,
    F: VideoFetcher + 'static,
    C: ConfigProvider,
{
    pub fn new(
        source: Src,
        storage: S,
        fetcher: Arc<F>,
        config: C,
        columns: ColumnMap,
        selections: Vec<Division>,
    ) -> Self {
        Self {
            source,
            storage,
            fetcher,
            config,
            columns,
            selections,
        }
    }

    async fn archive_division(&self, batch: DivisionBatch) -> Result<DivisionReport> {
        let division = batch.division;
        let folder = division.folder_name();
        let dest_dir = Path::new(self.config.output_path()).join(&folder);
        tokio::fs::create_dir_all(&dest_dir).await?;

        let results = downloader::run_jobs(
            Arc::clone(&self.fetcher),
            dest_dir.clone(),
            batch.jobs,
            self.config.concurrent_downloads(),
        )
        .await?;

        let mut completed = 0;
        let mut failed = Vec::new();
        let mut unavailable = Vec::new();

        for (job, outcome) in results {
            let player = &job.submission.name;
            match outcome {
                DownloadOutcome::Completed(path) => {
                    completed += 1;
                    tracing::info!(
                        "Downloaded {}'s {} to {}",
                        player,
                        division.label(),
                        path.display()
                    );
                }
                DownloadOutcome::Unavailable => {
                    tracing::warn!(
                        "{}'s {} video is unavailable. Please contact them and have them re-upload.",
                        player,
                        division.label()
                    );
                    unavailable.push(format!("{} {}", player, division.label()));
                }
                DownloadOutcome::Failed(reason) => {
                    tracing::error!(
                        "There was an issue with {}'s {} ({}), try downloading this video manually.",
                        player,
                        division.label(),
                        reason
                    );
                    failed.push(job.submission.link.clone());
                }
            }
        }

        for name in &batch.missing_link {
            tracing::warn!("{} submitted no link for {}", name, division.label());
            failed.push(format!("{} (no link)", name));
        }

        if !failed.is_empty() {
            self.storage
                .write_file(
                    &format!("{}/_failed_downloads.txt", folder),
                    as_lines(&failed).as_bytes(),
                )
                .await?;
        }

        if !unavailable.is_empty() {
            self.storage
                .write_file(
                    &format!("{}/_unavailable_videos.txt", folder),
                    as_lines(&unavailable).as_bytes(),
                )
                .await?;
        }

        self.storage
            .write_file(
                &format!("{}/_titles.csv", folder),
                batch.titles_csv.as_bytes(),
            )
            .await?;
        self.storage
            .write_file(
                &format!("{}/_thumbnails.csv", folder),
                batch.thumbnails_csv.as_bytes(),
            )
            .await?;

        if self.config.zip_divisions() {
            self.zip_division(&folder, &dest_dir).await?;
        }

        tracing::info!("Done with {}", division.label());

        Ok(DivisionReport {
            division: division.label().to_string(),
            completed,
            failed,
            unavailable,
        })
    }

    /// Bundle every file in the division folder into `{folder}.zip` next to
    /// it. Runs after the report files so they end up in the bundle too.
    async fn zip_division(&self, folder: &str, dest_dir: &Path) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(dest_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        entries.sort();

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            for path in entries {
                let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                zip.start_file::<_, ()>(name, FileOptions::default())?;
                let data = std::fs::read(&path)?;
                zip.write_all(&data)?;
            }

            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing {}.zip ({} bytes)", folder, zip_data.len());
        self.storage
            .write_file(&format!("{}.zip", folder), &zip_data)
            .await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl<Src, S, F, C> Pipeline for ArchivePipeline<Src, S, F, C>
where
    Src: SheetSource,
    S: Storage,
    F: VideoFetcher + 'static,
    C: ConfigProvider,
{
    async fn extract(&self) -> Result<Vec<Submission>> {
        self.source.fetch_rows(&self.columns).await
    }

    async fn transform(&self, rows: Vec<Submission>) -> Result<ArchivePlan> {
        let contest = self.config.contest_name();
        let mut batches = Vec::with_capacity(self.selections.len());

        for &division in &self.selections {
            let division_rows: Vec<Submission> = rows
                .iter()
                .filter(|row| division.contains(row))
                .cloned()
                .collect();
            tracing::debug!(
                "{}: {} of {} submissions",
                division.label(),
                division_rows.len(),
                rows.len()
            );

            let mut jobs = Vec::new();
            let mut missing_link = Vec::new();
            for row in &division_rows {
                if row.order.is_none() {
                    tracing::warn!("There is no order value for {}'s freestyle", row.name);
                }
                if row.link.is_empty() {
                    missing_link.push(row.name.clone());
                    continue;
                }
                jobs.push(DownloadJob {
                    submission: row.clone(),
                    division,
                    file_stem: row.file_stem(contest, division),
                });
            }

            let titles_csv = titles_manifest(contest, division, &division_rows)?;
            let thumbnails_csv = thumbnails_manifest(&division_rows)?;

            batches.push(DivisionBatch {
                division,
                jobs,
                missing_link,
                titles_csv,
                thumbnails_csv,
            });
        }

        Ok(ArchivePlan { batches })
    }

    async fn load(&self, plan: ArchivePlan) -> Result<String> {
        let mut reports = Vec::with_capacity(plan.batches.len());
        for batch in plan.batches {
            let report = self.archive_division(batch).await?;
            reports.push(report);
        }

        let summary = RunSummary {
            contest: self.config.contest_name().to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            divisions: reports,
        };
        self.storage
            .write_file(
                "run_summary.json",
                serde_json::to_string_pretty(&summary)?.as_bytes(),
            )
            .await?;

        Ok(self.config.output_path().to_string())
    }
}

fn as_lines(entries: &[String]) -> String {
    entries
        .iter()
        .map(|entry| format!("{}\n", entry))
        .collect()
}

/// Pull the video id out of the usual YouTube URL shapes (watch, youtu.be,
/// shorts, embed).
pub fn youtube_video_id(url: &str) -> Option<&str> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| {
        Regex::new(r"(?:youtube\.com/(?:watch\?v=|embed/|shorts/)|youtu\.be/)([A-Za-z0-9_-]{6,})")
            .expect("video id pattern")
    });
    re.captures(url)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", video_id)
}

fn titles_manifest(contest: &str, division: Division, rows: &[Submission]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["name", "title", "link", "uploaded"])?;

    for row in rows {
        let title = row.video_title(contest, division);
        writer.write_record([
            row.name.as_str(),
            title.as_str(),
            row.link.as_str(),
            if row.uploaded { "true" } else { "false" },
        ])?;
    }

    finish_manifest(writer)
}

/// Rows whose id cannot be extracted keep their line with empty id/URL so
/// the organizers can chase them by hand.
fn thumbnails_manifest(rows: &[Submission]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["name", "video_id", "thumbnail_url"])?;

    for row in rows {
        match youtube_video_id(&row.link) {
            Some(id) => {
                let url = thumbnail_url(id);
                writer.write_record([row.name.as_str(), id, url.as_str()])?;
            }
            None => writer.write_record([row.name.as_str(), "", ""])?,
        }
    }

    finish_manifest(writer)
}

fn finish_manifest(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ArchiveError::ProcessingError {
            message: format!("could not finish manifest: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| ArchiveError::ProcessingError {
        message: format!("manifest is not valid UTF-8: {}", e),
    })
}
