use crate::analytics::AnalyticsReport;
use crate::export::{Export, ExportError};

impl Export for AnalyticsReport {
    /// The per-day page series as CSV; the scalar sections belong to the
    /// JSON/markdown renderings.
    fn to_csv(&self) -> Result<String, ExportError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.write_record(["date", "pages"])?;
        for (date, pages) in &self.pages_daily {
            wtr.write_record([date.to_string(), pages.to_string()])?;
        }
        Ok(String::from_utf8(wtr.into_inner()?)?)
    }

    fn to_md(&self) -> Result<String, ExportError> {
        let mut buffer = Vec::new();
        use std::io::Write;

        writeln!(buffer, "## Reading summary")?;
        writeln!(
            buffer,
            "\n**Books:** {} read, {} reading, {} to be read ({} total)",
            self.number_of_books.read,
            self.number_of_books.reading,
            self.number_of_books.to_be_read,
            self.number_of_books.all,
        )?;
        writeln!(
            buffer,
            "**Pages:** {} total, {} per day",
            self.pages_read.total, self.pages_read.avg_per_day,
        )?;
        writeln!(
            buffer,
            "**Days:** {} reading days, streak {} (best {})",
            self.days.total, self.days.continuous, self.days.continuous_max,
        )?;

        if !self.authors_count.0.is_empty() {
            writeln!(buffer, "\n| Author | Books |")?;
            writeln!(buffer, "|--------|-------|")?;
            for author in &self.authors_count.0 {
                writeln!(buffer, "| {} | {} |", author.name, author.count)?;
            }
        }
        Ok(String::from_utf8(buffer)?)
    }

    fn to_json(&self) -> Result<String, ExportError> {
        serde_json::to_string(self).map_err(ExportError::JsonToString)
    }
}
