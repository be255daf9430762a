//! Dry-run sink and failure reports.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use database::NewContact;
use pipeline::{ContactSink, IngestError, RowFailure};
use serde::Serialize;

/// Writes prepared contacts as JSON lines instead of touching the store.
pub struct PreviewSink<W: Write + Send> {
    out: Mutex<W>,
}

impl PreviewSink<BufWriter<File>> {
    /// Create a preview sink writing to a file.
    pub fn create(path: &Path) -> std::io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?)))
    }
}

impl<W: Write + Send> PreviewSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Flush and return the underlying writer.
    pub fn finish(self) -> std::io::Result<W> {
        let mut out = self
            .out
            .into_inner()
            .map_err(|_| std::io::Error::other("preview writer poisoned"))?;
        out.flush()?;
        Ok(out)
    }
}

#[async_trait]
impl<W: Write + Send> ContactSink for PreviewSink<W> {
    async fn upsert(&self, contact: &NewContact) -> Result<(), IngestError> {
        let mut out = self
            .out
            .lock()
            .map_err(|_| IngestError::Store("preview writer poisoned".to_string()))?;
        serde_json::to_writer(&mut *out, contact).map_err(|e| IngestError::Store(e.to_string()))?;
        out.write_all(b"\n")
            .map_err(|e| IngestError::Store(e.to_string()))?;
        Ok(())
    }

    fn name(&self) -> &str {
        "preview"
    }
}

/// One line of the failed-rows report.
#[derive(Debug, Serialize)]
pub struct FailedRow<'a> {
    pub file: &'a str,
    /// One-based data line number, header excluded. Zero when the whole
    /// file could not be read.
    pub line: usize,
    pub phone: &'a str,
    pub error: String,
}

impl<'a> FailedRow<'a> {
    pub fn new(file: &'a str, failure: &'a RowFailure) -> Self {
        Self {
            file,
            line: failure.row + 1,
            phone: failure.phone.as_deref().unwrap_or(""),
            error: failure.error.to_string(),
        }
    }

    /// Entry for a file that yielded no rows at all.
    pub fn unreadable(file: &'a str, error: &str) -> Self {
        Self {
            file,
            line: 0,
            phone: "",
            error: error.to_string(),
        }
    }
}

/// Write failed rows as CSV.
pub fn write_failures<W: Write>(out: W, failures: &[FailedRow<'_>]) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(out);
    for failure in failures {
        wtr.serialize(failure)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipeline::{IngestOptions, Ingestor, RawRow};

    #[tokio::test]
    async fn test_preview_writes_json_lines() {
        let ingestor = Ingestor::new(PreviewSink::new(Vec::new()), IngestOptions::default());
        let rows = vec![
            RawRow::from_pairs([("number", "9876543210"), ("result_loc", "Pune, India")]),
            RawRow::from_pairs([("number", "1")]),
        ];

        let report = ingestor.ingest(rows, Some("batch_x")).await;
        assert_eq!(report.succeeded, 1);

        let out = ingestor.into_sink().finish().unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);

        let contact: NewContact = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(contact.phone, "9876543210");
        assert_eq!(contact.batch_id.as_deref(), Some("batch_x"));
        assert_eq!(contact.category, "Pune");
    }

    #[test]
    fn test_write_failures() {
        let failure = RowFailure {
            row: 4,
            phone: Some("12".to_string()),
            error: IngestError::Constraint("CHECK constraint failed".to_string()),
        };
        let rows = vec![
            FailedRow::new("in.csv", &failure),
            FailedRow::unreadable("gone.csv", "No such file or directory"),
        ];

        let mut out = Vec::new();
        write_failures(&mut out, &rows).unwrap();

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("file,line,phone,error"));
        assert_eq!(
            lines.next(),
            Some("in.csv,5,12,store rejected row: CHECK constraint failed")
        );
        assert_eq!(lines.next(), Some("gone.csv,0,,No such file or directory"));
    }
}
