use clap::Parser;
use scales_archiver::adapters::{CsvFileSource, PublishedCsvSource};
use scales_archiver::config::toml_config::ContestConfig;
use scales_archiver::core::downloader::YtDlpFetcher;
use scales_archiver::core::menu::{self, MenuChoice};
use scales_archiver::domain::model::ColumnMap;
use scales_archiver::utils::validation::is_http_source;
use scales_archiver::utils::{logger, validation::Validate};
use scales_archiver::{ArchiveEngine, ArchivePipeline, CliConfig, LocalStorage};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting scales-archiver");

    // Contest config file overrides the CLI defaults.
    let mut columns = ColumnMap::default();
    if let Some(path) = config.config.clone() {
        match ContestConfig::from_file(&path) {
            Ok(contest) => {
                columns = contest.columns();
                contest.apply_to(&mut config);
            }
            Err(e) => {
                tracing::error!("❌ Could not load contest config {}: {}", path, e);
                eprintln!("❌ {}", e.user_friendly_message());
                std::process::exit(1);
            }
        }
    }

    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let choice = match config.division {
        Some(choice) => choice,
        None => menu::prompt(std::io::stdin().lock()),
    };
    if choice == MenuChoice::Exit {
        println!("bye (-:");
        return Ok(());
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let selections = choice.divisions();
    let storage = LocalStorage::new(config.output_path.clone());
    let fetcher = Arc::new(YtDlpFetcher::new(config.downloader.clone()));

    let run = if is_http_source(&config.sheet) {
        let source = PublishedCsvSource::new(config.sheet.clone());
        let pipeline = ArchivePipeline::new(source, storage, fetcher, config, columns, selections);
        ArchiveEngine::new_with_monitoring(pipeline, monitor_enabled)
            .run()
            .await
    } else {
        let source = CsvFileSource::new(LocalStorage::new(String::new()), config.sheet.clone());
        let pipeline = ArchivePipeline::new(source, storage, fetcher, config, columns, selections);
        ArchiveEngine::new_with_monitoring(pipeline, monitor_enabled)
            .run()
            .await
    };

    match run {
        Ok(output_path) => {
            tracing::info!("✅ Archive run completed successfully!");
            tracing::info!("📁 Output saved to: {}", output_path);
            println!("✅ Archive run completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Archive run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                scales_archiver::utils::error::ErrorSeverity::Low => 0,
                scales_archiver::utils::error::ErrorSeverity::Medium => 2,
                scales_archiver::utils::error::ErrorSeverity::High => 1,
                scales_archiver::utils::error::ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
