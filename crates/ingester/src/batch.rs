//! Multi-file ingest runs.
//!
//! Each readable file is one batch. Once a batch aborts on store
//! connectivity, later files are still parsed so their rows can be counted
//! as not attempted, but nothing more is written.

use std::io;

use pipeline::{ContactSink, IngestReport, IngestSummary, Ingestor};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::input;
use crate::preview::FailedRow;

/// A file that could not be read or whose header could not be parsed.
#[derive(Debug)]
pub struct UnreadableFile {
    pub file: String,
    pub error: String,
}

/// Everything that happened during one run.
#[derive(Debug, Default)]
pub struct RunOutcome {
    /// Per-file batch reports, in input order.
    pub files: Vec<(String, IngestReport)>,
    pub unreadable: Vec<UnreadableFile>,
}

/// Final counts printed at the end of a run.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    #[serde(flatten)]
    pub rows: IngestSummary,
    pub unreadable_files: Vec<String>,
}

impl RunOutcome {
    pub fn aborted(&self) -> bool {
        self.files.iter().any(|(_, report)| report.aborted)
    }

    pub fn summary(&self) -> RunSummary {
        let mut rows = IngestSummary::default();
        for (_, report) in &self.files {
            rows.merge(report.summary());
        }

        RunSummary {
            rows,
            unreadable_files: self.unreadable.iter().map(|u| u.file.clone()).collect(),
        }
    }

    /// Failed-rows report entries: unreadable files first, then row failures.
    pub fn failed_rows(&self) -> Vec<FailedRow<'_>> {
        let unreadable = self
            .unreadable
            .iter()
            .map(|u| FailedRow::unreadable(&u.file, &u.error));
        let rows = self.files.iter().flat_map(|(file, report)| {
            report
                .failures
                .iter()
                .map(move |failure| FailedRow::new(file, failure))
        });

        unreadable.chain(rows).collect()
    }
}

/// Ingest named inputs in order.
pub async fn ingest_inputs<S, I>(ingestor: &Ingestor<S>, inputs: I) -> RunOutcome
where
    S: ContactSink,
    I: IntoIterator<Item = (String, io::Result<Vec<u8>>)>,
{
    let mut outcome = RunOutcome::default();
    let mut aborted = false;

    for (file, bytes) in inputs {
        let bytes = match bytes {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(file = %file, error = %e, "Failed to read file");
                outcome.unreadable.push(UnreadableFile {
                    file,
                    error: e.to_string(),
                });
                continue;
            }
        };

        let rows = match input::read_rows(bytes.as_slice()) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(file = %file, error = %e, "Failed to parse CSV header");
                outcome.unreadable.push(UnreadableFile {
                    file,
                    error: e.to_string(),
                });
                continue;
            }
        };

        let report = if aborted {
            warn!(file = %file, rows = rows.len(), "Skipping file: store unreachable");
            IngestReport::skipped(rows.len())
        } else {
            let batch_id = input::batch_id(&bytes);
            info!(file = %file, rows = rows.len(), batch = %batch_id, "Ingesting");

            let report = ingestor.ingest_parsed(rows, Some(&batch_id)).await;
            if report.aborted {
                error!(file = %file, "Store unreachable, remaining files will not be attempted");
                aborted = true;
            }
            report
        };

        outcome.files.push((file, report));
    }

    outcome
}
