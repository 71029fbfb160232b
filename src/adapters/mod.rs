// Adapters layer: concrete sheet sources for the external spreadsheet export.

use crate::domain::model::{ColumnMap, Submission};
use crate::domain::ports::{SheetSource, Storage};
use crate::utils::error::{ArchiveError, Result};
use async_trait::async_trait;
use reqwest::Client;

/// Decode sheet rows from CSV bytes using the configured column headers.
///
/// The sheet schema is externally owned, so cells degrade instead of failing
/// the run: unparseable order cells become `None`, flag cells default to
/// `false`, and rows without a name (export padding) are dropped.
pub fn parse_sheet_csv(data: &[u8], columns: &ColumnMap) -> Result<Vec<Submission>> {
    let mut reader = csv::Reader::from_reader(data);
    let headers = reader.headers()?.clone();
    let position = |header: &str| headers.iter().position(|h| h.trim() == header);

    let name_idx = position(&columns.name).ok_or_else(|| missing_column(&columns.name))?;
    let link_idx = position(&columns.link).ok_or_else(|| missing_column(&columns.link))?;
    let round_idx = position(&columns.round).ok_or_else(|| missing_column(&columns.round))?;
    // Optional columns; older sheet revisions do not carry all of them.
    let order_idx = position(&columns.order);
    let finals_idx = position(&columns.made_finals);
    let uploaded_idx = position(&columns.uploaded);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cell = |i: usize| record.get(i).unwrap_or("").trim().to_string();

        let name = cell(name_idx);
        if name.is_empty() {
            continue;
        }

        rows.push(Submission {
            name,
            link: cell(link_idx),
            order: order_idx.and_then(|i| cell(i).parse::<u32>().ok()),
            round: cell(round_idx),
            made_finals: finals_idx.map(|i| truthy(&cell(i))).unwrap_or(false),
            uploaded: uploaded_idx.map(|i| truthy(&cell(i))).unwrap_or(false),
        });
    }

    Ok(rows)
}

fn missing_column(header: &str) -> ArchiveError {
    ArchiveError::ProcessingError {
        message: format!("Sheet is missing required column '{}'", header),
    }
}

fn truthy(cell: &str) -> bool {
    matches!(
        cell.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}

/// Local CSV export of the submission sheet.
pub struct CsvFileSource<S: Storage> {
    storage: S,
    path: String,
}

impl<S: Storage> CsvFileSource<S> {
    pub fn new(storage: S, path: String) -> Self {
        Self { storage, path }
    }
}

#[async_trait]
impl<S: Storage> SheetSource for CsvFileSource<S> {
    async fn fetch_rows(&self, columns: &ColumnMap) -> Result<Vec<Submission>> {
        tracing::debug!("Reading sheet export from {}", self.path);
        let data = self.storage.read_file(&self.path).await?;
        parse_sheet_csv(&data, columns)
    }
}

/// Published-to-the-web sheet fetched as CSV over HTTP.
pub struct PublishedCsvSource {
    client: Client,
    url: String,
}

impl PublishedCsvSource {
    pub fn new(url: String) -> Self {
        Self {
            client: Client::new(),
            url,
        }
    }
}

#[async_trait]
impl SheetSource for PublishedCsvSource {
    async fn fetch_rows(&self, columns: &ColumnMap) -> Result<Vec<Submission>> {
        tracing::debug!("Fetching published sheet from {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        parse_sheet_csv(&body, columns)
    }
}
