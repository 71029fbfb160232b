pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::menu::MenuChoice;
#[cfg(feature = "cli")]
use crate::domain::ports::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{
    is_http_source, validate_non_empty_string, validate_path, validate_positive_number,
    validate_url, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "scales-archiver")]
#[command(about = "Download and organize Scales contest video submissions")]
pub struct CliConfig {
    /// Submission sheet: a local CSV export or a published-CSV URL
    #[arg(long, default_value = "freestyles.csv")]
    pub sheet: String,

    #[arg(long, default_value = "Scales Open V4")]
    pub contest_name: String,

    #[arg(long, default_value = "./Open")]
    pub output_path: String,

    /// TOML contest config; values set there override CLI defaults
    #[arg(long)]
    pub config: Option<String>,

    /// Skip the interactive menu and archive this selection
    #[arg(long)]
    pub division: Option<MenuChoice>,

    /// Downloader program to invoke
    #[arg(long, default_value = "yt-dlp")]
    pub downloader: String,

    /// Worker pool size; 1 downloads sequentially
    #[arg(long, default_value = "1")]
    pub concurrent_downloads: usize,

    /// Bundle each division folder into a zip after downloading
    #[arg(long)]
    pub zip: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn sheet_source(&self) -> &str {
        &self.sheet
    }

    fn contest_name(&self) -> &str {
        &self.contest_name
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn concurrent_downloads(&self) -> usize {
        self.concurrent_downloads
    }

    fn zip_divisions(&self) -> bool {
        self.zip
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("contest_name", &self.contest_name)?;
        validate_non_empty_string("downloader", &self.downloader)?;

        if is_http_source(&self.sheet) {
            validate_url("sheet", &self.sheet)?;
        } else {
            validate_path("sheet", &self.sheet)?;
        }

        validate_path("output_path", &self.output_path)?;
        validate_positive_number("concurrent_downloads", self.concurrent_downloads, 1)?;

        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;

    fn base_config() -> CliConfig {
        CliConfig::parse_from(["scales-archiver"])
    }

    #[test]
    fn defaults_parse_and_validate() {
        let config = base_config();
        assert_eq!(config.contest_name, "Scales Open V4");
        assert_eq!(config.output_path, "./Open");
        assert_eq!(config.concurrent_downloads, 1);
        assert!(!config.zip);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn http_sheet_must_be_a_valid_url() {
        let mut config = base_config();
        config.sheet = "https://".to_string();
        assert!(config.validate().is_err());

        config.sheet = "https://docs.example.com/pub?output=csv".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_workers_is_rejected() {
        let mut config = base_config();
        config.concurrent_downloads = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn division_flag_parses_menu_choices() {
        let config = CliConfig::parse_from(["scales-archiver", "--division", "pro-prelims"]);
        assert_eq!(config.division, Some(MenuChoice::ProPrelims));
    }
}
