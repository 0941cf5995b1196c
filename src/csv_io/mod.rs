//! CSV export and import of incidents.

use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};
use thiserror::Error;

use crate::errors::AppError;
use crate::models::{timestamp, ImportedIncident, Incident, IncidentStatus, Severity};

pub const EXPORT_HEADER: [&str; 5] = ["ID", "Title", "Severity", "Status", "CreatedAt"];

const TITLE: &str = "Title";
const SEVERITY: &str = "Severity";
const STATUS: &str = "Status";
const CREATED_AT: &str = "CreatedAt";

#[derive(Debug, Error)]
pub enum CsvImportError {
    #[error("CSV is malformed: {0}")]
    Malformed(#[from] csv::Error),
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),
    #[error("row {row}: {message}")]
    InvalidRow { row: usize, message: String },
}

impl From<CsvImportError> for AppError {
    fn from(err: CsvImportError) -> Self {
        AppError::CsvParse(err.to_string())
    }
}

/// Render incidents as CSV, one row per incident after the header.
pub fn export_incidents(incidents: &[Incident]) -> Result<String, csv::Error> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADER)?;
    for incident in incidents {
        writer.write_record([
            incident.id.to_string(),
            incident.title.clone(),
            incident.severity.as_str().to_string(),
            incident.status.as_str().to_string(),
            timestamp::to_iso(&incident.created_at),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Positions of the required columns within the header row.
struct Columns {
    title: usize,
    severity: usize,
    status: usize,
    created_at: usize,
}

impl Columns {
    fn locate(header: &StringRecord) -> Result<Self, CsvImportError> {
        let find = |name: &'static str| {
            header
                .iter()
                .position(|h| {
                    h.trim_start_matches('\u{feff}')
                        .trim()
                        .eq_ignore_ascii_case(name)
                })
                .ok_or(CsvImportError::MissingColumn(name))
        };
        Ok(Self {
            title: find(TITLE)?,
            severity: find(SEVERITY)?,
            status: find(STATUS)?,
            created_at: find(CREATED_AT)?,
        })
    }
}

/// Parse an upload into incident rows. Any invalid row rejects the whole file.
///
/// Rows are numbered from 1, not counting the header.
pub fn parse_incident_import(bytes: &[u8]) -> Result<Vec<ImportedIncident>, CsvImportError> {
    let mut reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(bytes);
    let columns = Columns::locate(reader.headers()?)?;

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        rows.push(parse_row(&columns, &record, index + 1)?);
    }
    Ok(rows)
}

fn parse_row(
    columns: &Columns,
    record: &StringRecord,
    row: usize,
) -> Result<ImportedIncident, CsvImportError> {
    let invalid = |message: String| CsvImportError::InvalidRow { row, message };
    let cell = |index: usize| record.get(index).unwrap_or("");

    let title = cell(columns.title);
    if title.is_empty() {
        return Err(invalid("Title is required".to_string()));
    }

    let severity = Severity::parse(cell(columns.severity))
        .ok_or_else(|| invalid(format!("unknown severity {:?}", cell(columns.severity))))?;
    let status = IncidentStatus::parse(cell(columns.status))
        .ok_or_else(|| invalid(format!("unknown status {:?}", cell(columns.status))))?;
    let created_at = timestamp::parse_iso(cell(columns.created_at))
        .ok_or_else(|| invalid(format!("invalid CreatedAt {:?}", cell(columns.created_at))))?;

    Ok(ImportedIncident {
        title: title.to_string(),
        severity,
        status,
        created_at,
    })
}
