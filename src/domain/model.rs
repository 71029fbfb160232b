use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Rows without an order value sort to the back of the division folder.
pub const FALLBACK_ORDER: u32 = 999;

/// One submission row from the contest sheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub link: String,
    pub order: Option<u32>,
    pub round: String,
    pub made_finals: bool,
    pub uploaded: bool,
}

impl Submission {
    pub fn sort_order(&self) -> u32 {
        self.order.unwrap_or(FALLBACK_ORDER)
    }

    /// Public-facing title, without the order prefix.
    pub fn video_title(&self, contest_name: &str, division: Division) -> String {
        format!("{} {} - {}", contest_name, division.label(), self.name)
    }

    /// File name stem; the order prefix keeps videos sortable inside a folder.
    pub fn file_stem(&self, contest_name: &str, division: Division) -> String {
        format!(
            "{} {}",
            self.sort_order(),
            self.video_title(contest_name, division)
        )
    }
}

/// Competition divisions, derived from the round column and the made-finals
/// flag. Rows belonging to the same division always land in the same folder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Division {
    Amateur,
    ProPrelims,
    ProFinals,
    NonFinalists,
}

impl Division {
    pub const ALL: [Division; 4] = [
        Division::ProPrelims,
        Division::Amateur,
        Division::ProFinals,
        Division::NonFinalists,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Division::Amateur => "Amateur",
            Division::ProPrelims => "Pro Prelims",
            Division::ProFinals => "Pro Finals",
            Division::NonFinalists => "Non Finalists",
        }
    }

    pub fn folder_name(&self) -> String {
        self.label().replace(' ', "_")
    }

    pub fn contains(&self, submission: &Submission) -> bool {
        match self {
            Division::Amateur => submission.round == "Amateur",
            Division::ProPrelims => submission.round == "Pro Prelim",
            Division::ProFinals => submission.round == "Pro Final" && submission.made_finals,
            Division::NonFinalists => submission.round == "Pro Final" && !submission.made_finals,
        }
    }
}

/// A planned download for one submission.
#[derive(Debug, Clone)]
pub struct DownloadJob {
    pub submission: Submission,
    pub division: Division,
    pub file_stem: String,
}

/// Column headers of the external sheet. The schema is owned by the
/// organizers, so every header is remappable from the contest config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColumnMap {
    pub name: String,
    pub link: String,
    pub order: String,
    pub round: String,
    pub made_finals: String,
    pub uploaded: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            name: "Name".to_string(),
            link: "Freestyle Link".to_string(),
            order: "Order".to_string(),
            round: "Round of Video".to_string(),
            made_finals: "Made Finals".to_string(),
            uploaded: "Uploaded".to_string(),
        }
    }
}

/// Why a single video could not be archived. Per-row failures never abort
/// the batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The platform reports the video as gone (private, removed, terminated).
    Unavailable,
    /// Anything else; the URL gets recorded for a manual download attempt.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Completed(PathBuf),
    Unavailable,
    Failed(String),
}

impl From<std::result::Result<PathBuf, FetchError>> for DownloadOutcome {
    fn from(result: std::result::Result<PathBuf, FetchError>) -> Self {
        match result {
            Ok(path) => DownloadOutcome::Completed(path),
            Err(FetchError::Unavailable) => DownloadOutcome::Unavailable,
            Err(FetchError::Failed(reason)) => DownloadOutcome::Failed(reason),
        }
    }
}

/// Collected per-division results, also serialized into the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct DivisionReport {
    pub division: String,
    pub completed: usize,
    pub failed: Vec<String>,
    pub unavailable: Vec<String>,
}

/// Everything `load` needs for one division: the download jobs plus the
/// pre-rendered manifest files.
#[derive(Debug, Clone)]
pub struct DivisionBatch {
    pub division: Division,
    pub jobs: Vec<DownloadJob>,
    /// Names of rows that submitted no link at all.
    pub missing_link: Vec<String>,
    pub titles_csv: String,
    pub thumbnails_csv: String,
}

/// Output of the transform stage: one batch per selected division.
#[derive(Debug, Clone)]
pub struct ArchivePlan {
    pub batches: Vec<DivisionBatch>,
}

#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub contest: String,
    pub generated_at: String,
    pub divisions: Vec<DivisionReport>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(name: &str, round: &str, made_finals: bool, order: Option<u32>) -> Submission {
        Submission {
            name: name.to_string(),
            link: format!("https://youtube.com/watch?v=abc_{}", name),
            order,
            round: round.to_string(),
            made_finals,
            uploaded: false,
        }
    }

    #[test]
    fn file_stem_prefixes_order() {
        let s = submission("Patrick", "Pro Prelim", false, Some(3));
        assert_eq!(
            s.file_stem("Scales Open V4", Division::ProPrelims),
            "3 Scales Open V4 Pro Prelims - Patrick"
        );
    }

    #[test]
    fn missing_order_falls_back_to_999() {
        let s = submission("Patrick", "Amateur", false, None);
        assert_eq!(s.sort_order(), FALLBACK_ORDER);
        assert_eq!(
            s.file_stem("Scales Open V4", Division::Amateur),
            "999 Scales Open V4 Amateur - Patrick"
        );
    }

    #[test]
    fn folder_name_replaces_spaces() {
        assert_eq!(Division::ProPrelims.folder_name(), "Pro_Prelims");
        assert_eq!(Division::Amateur.folder_name(), "Amateur");
    }

    #[test]
    fn pro_final_rows_split_by_made_finals() {
        let finalist = submission("A", "Pro Final", true, Some(1));
        let non_finalist = submission("B", "Pro Final", false, Some(2));

        assert!(Division::ProFinals.contains(&finalist));
        assert!(!Division::ProFinals.contains(&non_finalist));
        assert!(Division::NonFinalists.contains(&non_finalist));
        assert!(!Division::NonFinalists.contains(&finalist));
    }

    #[test]
    fn amateur_rows_never_match_pro_divisions() {
        let amateur = submission("C", "Amateur", false, Some(1));
        assert!(Division::Amateur.contains(&amateur));
        assert!(!Division::ProPrelims.contains(&amateur));
        assert!(!Division::ProFinals.contains(&amateur));
        assert!(!Division::NonFinalists.contains(&amateur));
    }

    #[test]
    fn fetch_errors_map_to_outcomes() {
        let ok: std::result::Result<PathBuf, FetchError> = Ok(PathBuf::from("a.mp4"));
        assert_eq!(
            DownloadOutcome::from(ok),
            DownloadOutcome::Completed(PathBuf::from("a.mp4"))
        );
        assert_eq!(
            DownloadOutcome::from(Err(FetchError::Unavailable)),
            DownloadOutcome::Unavailable
        );
    }
}
