use async_trait::async_trait;
use httpmock::prelude::*;
use scales_archiver::core::downloader::YtDlpFetcher;
use scales_archiver::core::menu::MenuChoice;
use scales_archiver::domain::model::{ColumnMap, Division, FetchError};
use scales_archiver::adapters::{CsvFileSource, PublishedCsvSource};
use scales_archiver::domain::ports::VideoFetcher;
use scales_archiver::{ArchiveEngine, ArchivePipeline, CliConfig, LocalStorage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

const SHEET: &str = "\
Name,Freestyle Link,Order,Round of Video,Made Finals,Uploaded
Patrick,https://youtube.com/watch?v=abc123def45,1,Pro Prelim,0,0
Alex,https://youtu.be/xyz789ghi01,2,Pro Prelim,0,1
Casey,https://x.test/private,3,Pro Prelim,0,0
Jordan,https://youtu.be/fin000000001,1,Pro Final,1,0
Sam,https://youtu.be/ama000000001,,Amateur,,
";

/// Stands in for yt-dlp: writes a stub video file, or fails the way the
/// real downloader does for taken-down videos.
struct StubFetcher;

#[async_trait]
impl VideoFetcher for StubFetcher {
    async fn fetch(
        &self,
        url: &str,
        dest_dir: &Path,
        file_stem: &str,
    ) -> Result<PathBuf, FetchError> {
        if url.contains("private") {
            return Err(FetchError::Unavailable);
        }
        let path = dest_dir.join(format!("{}.mp4", file_stem));
        std::fs::write(&path, b"stub video").map_err(|e| FetchError::Failed(e.to_string()))?;
        Ok(path)
    }
}

fn test_config(sheet: String, output_path: String) -> CliConfig {
    CliConfig {
        sheet,
        contest_name: "Scales Open V4".to_string(),
        output_path,
        config: None,
        division: Some(MenuChoice::All),
        downloader: "yt-dlp".to_string(),
        concurrent_downloads: 1,
        zip: false,
        verbose: false,
        monitor: false,
    }
}

#[tokio::test]
async fn end_to_end_from_published_sheet() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let sheet_mock = server.mock(|when, then| {
        when.method(GET).path("/sheet");
        then.status(200)
            .header("Content-Type", "text/csv")
            .body(SHEET);
    });

    let config = test_config(server.url("/sheet"), output_path.clone());
    let source = PublishedCsvSource::new(config.sheet.clone());
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = ArchivePipeline::new(
        source,
        storage,
        Arc::new(StubFetcher),
        config,
        ColumnMap::default(),
        MenuChoice::ProPrelims.divisions(),
    );

    let engine = ArchiveEngine::new_with_monitoring(pipeline, false);
    let result = engine.run().await;

    assert!(result.is_ok());
    sheet_mock.assert();

    let prelims = temp_dir.path().join("Pro_Prelims");
    assert!(prelims
        .join("1 Scales Open V4 Pro Prelims - Patrick.mp4")
        .exists());
    assert!(prelims
        .join("2 Scales Open V4 Pro Prelims - Alex.mp4")
        .exists());

    // Casey's video is gone and must be reported, not downloaded.
    let unavailable =
        std::fs::read_to_string(prelims.join("_unavailable_videos.txt")).unwrap();
    assert_eq!(unavailable, "Casey Pro Prelims\n");
    assert!(!prelims.join("_failed_downloads.txt").exists());

    let titles = std::fs::read_to_string(prelims.join("_titles.csv")).unwrap();
    assert!(titles.contains("Patrick,Scales Open V4 Pro Prelims - Patrick"));
    assert!(titles.lines().count() == 4); // header + 3 prelim rows

    let thumbnails = std::fs::read_to_string(prelims.join("_thumbnails.csv")).unwrap();
    assert!(thumbnails.contains("https://img.youtube.com/vi/abc123def45/maxresdefault.jpg"));

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(temp_dir.path().join("run_summary.json")).unwrap())
            .unwrap();
    assert_eq!(summary["contest"], "Scales Open V4");
    assert_eq!(summary["divisions"][0]["completed"], 2);
}

#[tokio::test]
async fn end_to_end_from_local_csv_export() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("Open").to_str().unwrap().to_string();

    let sheet_path = temp_dir.path().join("freestyles.csv");
    std::fs::write(&sheet_path, SHEET).unwrap();

    let config = test_config(sheet_path.to_str().unwrap().to_string(), output_path.clone());
    let source = CsvFileSource::new(LocalStorage::new(String::new()), config.sheet.clone());
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = ArchivePipeline::new(
        source,
        storage,
        Arc::new(StubFetcher),
        config,
        ColumnMap::default(),
        MenuChoice::All.divisions(),
    );

    let result = ArchiveEngine::new(pipeline).run().await;
    assert!(result.is_ok());

    let root = Path::new(&output_path);
    // Every division gets its own folder; same-division rows stay together.
    for folder in ["Pro_Prelims", "Amateur", "Pro_Finals", "Non_Finalists"] {
        assert!(root.join(folder).is_dir(), "missing folder {}", folder);
    }

    // Sam has no order value and falls back to the 999 prefix.
    assert!(root
        .join("Amateur")
        .join("999 Scales Open V4 Amateur - Sam.mp4")
        .exists());
    assert!(root
        .join("Pro_Finals")
        .join("1 Scales Open V4 Pro Finals - Jordan.mp4")
        .exists());
}

#[tokio::test]
async fn zip_bundle_includes_reports_and_videos() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let sheet_path = temp_dir.path().join("freestyles.csv");
    std::fs::write(&sheet_path, SHEET).unwrap();

    let mut config = test_config(sheet_path.to_str().unwrap().to_string(), output_path.clone());
    config.zip = true;
    config.concurrent_downloads = 4;

    let source = CsvFileSource::new(LocalStorage::new(String::new()), config.sheet.clone());
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = ArchivePipeline::new(
        source,
        storage,
        Arc::new(StubFetcher),
        config,
        ColumnMap::default(),
        MenuChoice::ProPrelims.divisions(),
    );

    ArchiveEngine::new(pipeline).run().await.unwrap();

    let zip_bytes = std::fs::read(temp_dir.path().join("Pro_Prelims.zip")).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_bytes)).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();

    assert!(names.contains(&"1 Scales Open V4 Pro Prelims - Patrick.mp4".to_string()));
    assert!(names.contains(&"_titles.csv".to_string()));
    assert!(names.contains(&"_unavailable_videos.txt".to_string()));
}

#[tokio::test]
async fn sheet_fetch_failure_aborts_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let sheet_mock = server.mock(|when, then| {
        when.method(GET).path("/sheet");
        then.status(500);
    });

    let config = test_config(server.url("/sheet"), output_path.clone());
    let source = PublishedCsvSource::new(config.sheet.clone());
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = ArchivePipeline::new(
        source,
        storage,
        Arc::new(StubFetcher),
        config,
        ColumnMap::default(),
        MenuChoice::All.divisions(),
    );

    let result = ArchiveEngine::new(pipeline).run().await;

    sheet_mock.assert();
    assert!(result.is_err());
    // Nothing should have been archived.
    assert!(!temp_dir.path().join("Pro_Prelims").exists());
}

#[tokio::test]
async fn real_fetcher_reports_missing_downloader_as_failure() {
    let temp_dir = TempDir::new().unwrap();

    // A program name that cannot exist on PATH.
    let fetcher = YtDlpFetcher::new("definitely-not-a-downloader-7f3a");
    let err = fetcher
        .fetch("https://youtu.be/abc123def45", temp_dir.path(), "1 Test - X")
        .await
        .unwrap_err();

    match err {
        FetchError::Failed(reason) => assert!(reason.contains("failed to run")),
        other => panic!("expected Failed, got {:?}", other),
    }
}
