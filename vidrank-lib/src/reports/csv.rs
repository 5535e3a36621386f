use crate::Result;
use crate::columns::{COLUMN_DEFINITIONS, cells};
use crate::pipeline::VideoRecord;
use chrono::NaiveDate;
use core::fmt::Write;
use ohno::{IntoAppError, app_err};
use serde::Deserialize;

/// One row of the tabular export.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExportRow {
    pub title: String,
    pub channel: String,
    pub published: NaiveDate,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub views_per_day: f64,
}

impl From<&VideoRecord> for ExportRow {
    fn from(record: &VideoRecord) -> Self {
        Self {
            title: record.title().to_string(),
            channel: record.channel().to_string(),
            published: record.published(),
            views: record.views(),
            likes: record.likes(),
            comments: record.comments(),
            views_per_day: record.views_per_day(),
        }
    }
}

/// Write a header and one row per record, in column order.
///
/// Floats are written at round-trip precision so [`parse_csv`] recovers them exactly.
pub fn generate<W: Write>(records: &[VideoRecord], writer: &mut W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(Vec::new());

    csv_writer.write_record(COLUMN_DEFINITIONS.iter().map(|c| c.name))?;
    for record in records {
        csv_writer.write_record(cells(record).map(|(_, value)| value.to_string()))?;
    }

    let bytes = csv_writer.into_inner().map_err(|e| app_err!("unable to finish CSV output: {e}"))?;
    writer.write_str(&String::from_utf8(bytes)?)?;
    Ok(())
}

/// Read back a CSV export.
pub fn parse_csv(input: &str) -> Result<Vec<ExportRow>> {
    let mut reader = csv::Reader::from_reader(input.as_bytes());
    let mut rows = Vec::new();

    for (index, row) in reader.deserialize::<ExportRow>().enumerate() {
        rows.push(row.into_app_err_with(|| format!("invalid CSV row {}", index + 1))?);
    }

    Ok(rows)
}
