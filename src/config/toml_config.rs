use crate::domain::model::ColumnMap;
use crate::utils::error::Result;
use crate::utils::validation::{
    is_http_source, validate_non_empty_string, validate_positive_number, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Contest definition file. One file per contest edition keeps the recurring
/// runs identical except for the data that actually changes: the sheet, the
/// contest name, and the column headers the organizers picked this time.
///
/// Values set here override CLI defaults; flags passed explicitly should be
/// left off the command line when a config file is in play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestConfig {
    pub contest: ContestSection,
    pub source: Option<SourceSection>,
    pub columns: Option<ColumnMap>,
    pub download: Option<DownloadSection>,
    pub load: Option<LoadSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContestSection {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceSection {
    pub sheet: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadSection {
    pub program: Option<String>,
    pub concurrent: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadSection {
    pub output_path: Option<String>,
    pub zip_divisions: Option<bool>,
}

impl ContestConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ContestConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn columns(&self) -> ColumnMap {
        self.columns.clone().unwrap_or_default()
    }

    #[cfg(feature = "cli")]
    pub fn apply_to(&self, cli: &mut crate::config::CliConfig) {
        cli.contest_name = self.contest.name.clone();

        if let Some(source) = &self.source {
            cli.sheet = source.sheet.clone();
        }

        if let Some(download) = &self.download {
            if let Some(program) = &download.program {
                cli.downloader = program.clone();
            }
            if let Some(concurrent) = download.concurrent {
                cli.concurrent_downloads = concurrent;
            }
        }

        if let Some(load) = &self.load {
            if let Some(output_path) = &load.output_path {
                cli.output_path = output_path.clone();
            }
            if let Some(zip) = load.zip_divisions {
                cli.zip = zip;
            }
        }
    }
}

impl Validate for ContestConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("contest.name", &self.contest.name)?;

        if let Some(source) = &self.source {
            if is_http_source(&source.sheet) {
                validate_url("source.sheet", &source.sheet)?;
            } else {
                validate_non_empty_string("source.sheet", &source.sheet)?;
            }
        }

        if let Some(download) = &self.download {
            if let Some(concurrent) = download.concurrent {
                validate_positive_number("download.concurrent", concurrent, 1)?;
            }
        }

        Ok(())
    }
}
