use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("Sheet request failed: {0}")]
    SheetFetchError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Config file error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Downloader error: {message}")]
    DownloaderError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Io,
    Config,
    Downloader,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ArchiveError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ArchiveError::SheetFetchError(_) => ErrorCategory::Network,
            ArchiveError::CsvError(_)
            | ArchiveError::SerializationError(_)
            | ArchiveError::ProcessingError { .. } => ErrorCategory::Data,
            ArchiveError::IoError(_) | ArchiveError::ZipError(_) => ErrorCategory::Io,
            ArchiveError::DownloaderError { .. } => ErrorCategory::Downloader,
            ArchiveError::TomlError(_)
            | ArchiveError::ConfigError { .. }
            | ArchiveError::ValidationError { .. }
            | ArchiveError::InvalidConfigValueError { .. }
            | ArchiveError::MissingConfigError { .. } => ErrorCategory::Config,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ArchiveError::SheetFetchError(_) | ArchiveError::DownloaderError { .. } => {
                ErrorSeverity::Medium
            }
            ArchiveError::CsvError(_)
            | ArchiveError::SerializationError(_)
            | ArchiveError::ProcessingError { .. } => ErrorSeverity::High,
            ArchiveError::IoError(_) | ArchiveError::ZipError(_) => ErrorSeverity::Critical,
            ArchiveError::TomlError(_)
            | ArchiveError::ConfigError { .. }
            | ArchiveError::ValidationError { .. }
            | ArchiveError::InvalidConfigValueError { .. }
            | ArchiveError::MissingConfigError { .. } => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check the published sheet URL and your network connection, then retry"
            }
            ErrorCategory::Data => {
                "Check that the sheet columns match the configured column mapping"
            }
            ErrorCategory::Io => "Check that the output path exists and is writable",
            ErrorCategory::Config => "Fix the configuration value and run again",
            ErrorCategory::Downloader => {
                "Check that yt-dlp is installed and on PATH, or download the video manually"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ArchiveError::SheetFetchError(e) => {
                format!("Could not fetch the submission sheet: {}", e)
            }
            ArchiveError::CsvError(e) => format!("Could not parse the submission sheet: {}", e),
            ArchiveError::IoError(e) => format!("File operation failed: {}", e),
            ArchiveError::DownloaderError { message } => {
                format!("Video downloader problem: {}", message)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
