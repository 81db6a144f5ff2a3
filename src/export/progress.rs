use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::export::{Export, ExportError};
use crate::progress::{ProgressRecord, ReadingState};

#[derive(Serialize)]
struct ProgressExportRow {
    id: String,
    book_title: String,
    state: ReadingState,
    position: u32,
    position_percentage: u32,
    position_page: u32,
    diff: u32,
    diff_percentage: u32,
    diff_page: u32,
    created_at: String,
}

fn format_time(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn to_export_row(record: &ProgressRecord) -> ProgressExportRow {
    ProgressExportRow {
        id: record.id.to_string(),
        book_title: record.book.title.clone(),
        state: record.state,
        position: record.position.value,
        position_percentage: record.position.percentage,
        position_page: record.position.page,
        diff: record.diff.value,
        diff_percentage: record.diff.percentage,
        diff_page: record.diff.page,
        created_at: format_time(record.created_at),
    }
}

impl Export for [ProgressRecord] {
    fn to_csv(&self) -> Result<String, ExportError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in self {
            wtr.serialize(to_export_row(record))?;
        }
        Ok(String::from_utf8(wtr.into_inner()?)?)
    }

    fn to_md(&self) -> Result<String, ExportError> {
        let mut buffer = Vec::new();
        use std::io::Write;

        writeln!(buffer, "| Book | State | Position | Pages read | Date |")?;
        writeln!(buffer, "|------|-------|----------|------------|------|")?;

        for record in self {
            let state = match record.state {
                ReadingState::ToBeRead => "to be read",
                ReadingState::Reading => "reading",
                ReadingState::Read => "read",
            };
            writeln!(
                buffer,
                "| {} | {} | {} ({}%) | {} | {} |",
                record.book.title,
                state,
                record.position.value,
                record.position.percentage,
                record.diff.page,
                format_time(record.created_at),
            )?;
        }
        Ok(String::from_utf8(buffer)?)
    }

    fn to_json(&self) -> Result<String, ExportError> {
        serde_json::to_string(self).map_err(ExportError::JsonToString)
    }
}
