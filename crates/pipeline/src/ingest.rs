//! Batch ingest orchestration.
//!
//! Rows are processed one at a time. A failing row is recorded and the loop
//! moves on; only a run of connectivity failures stops the batch early.

use serde::Serialize;
use tracing::{error, info, warn};

use crate::classify::TargetRegion;
use crate::error::IngestError;
use crate::row::{prepare_contact, RawRow};
use crate::sink::ContactSink;

/// Consecutive connectivity failures tolerated before a batch aborts.
pub const DEFAULT_MAX_CONNECTIVITY_FAILURES: usize = 3;

/// Ingest settings.
#[derive(Debug, Clone)]
pub struct IngestOptions {
    /// City and region used for classification.
    pub target: TargetRegion,
    /// Abort after this many consecutive connectivity failures (minimum 1).
    pub max_consecutive_connectivity_failures: usize,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            target: TargetRegion::default(),
            max_consecutive_connectivity_failures: DEFAULT_MAX_CONNECTIVITY_FAILURES,
        }
    }
}

/// A row that could not be ingested.
#[derive(Debug)]
pub struct RowFailure {
    /// Zero-based position of the row in the batch.
    pub row: usize,
    /// Raw phone value from the row, if any.
    pub phone: Option<String>,
    pub error: IngestError,
}

/// Outcome of one batch.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Rows seen, including those never attempted after an abort.
    pub total: usize,
    pub succeeded: usize,
    pub failures: Vec<RowFailure>,
    /// Rows skipped because the batch aborted.
    pub not_attempted: usize,
    /// Whether the batch stopped early on connectivity failures.
    pub aborted: bool,
}

impl IngestReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Summary suitable for logging or JSON output.
    pub fn summary(&self) -> IngestSummary {
        IngestSummary {
            total: self.total,
            succeeded: self.succeeded,
            failed: self.failed(),
            not_attempted: self.not_attempted,
            aborted: self.aborted,
        }
    }

    /// Report for a batch that was never started because an earlier one aborted.
    pub fn skipped(rows: usize) -> Self {
        Self {
            total: rows,
            not_attempted: rows,
            aborted: true,
            ..Default::default()
        }
    }
}

/// Counts from an [`IngestReport`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub not_attempted: usize,
    pub aborted: bool,
}

impl IngestSummary {
    /// Add another batch's counts to these.
    pub fn merge(&mut self, other: IngestSummary) {
        self.total += other.total;
        self.succeeded += other.succeeded;
        self.failed += other.failed;
        self.not_attempted += other.not_attempted;
        self.aborted |= other.aborted;
    }
}

/// Runs rows through normalize, extract, classify and upsert.
pub struct Ingestor<S> {
    sink: S,
    options: IngestOptions,
}

impl<S: ContactSink> Ingestor<S> {
    pub fn new(sink: S, options: IngestOptions) -> Self {
        Self { sink, options }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consume the ingestor and return its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Prepare and write a single row.
    pub async fn ingest_row(&self, row: &RawRow, batch_id: Option<&str>) -> Result<(), IngestError> {
        let contact = prepare_contact(row, &self.options.target, batch_id)?;
        self.sink.upsert(&contact).await
    }

    /// Ingest a batch of rows, isolating per-row failures.
    pub async fn ingest<I>(&self, rows: I, batch_id: Option<&str>) -> IngestReport
    where
        I: IntoIterator<Item = RawRow>,
    {
        self.ingest_parsed(rows.into_iter().map(Ok), batch_id).await
    }

    /// Ingest a batch where some records may already have failed to decode.
    ///
    /// Decode errors are recorded against their position like any other
    /// row failure.
    pub async fn ingest_parsed<I>(&self, rows: I, batch_id: Option<&str>) -> IngestReport
    where
        I: IntoIterator<Item = Result<RawRow, IngestError>>,
    {
        let max_failures = self.options.max_consecutive_connectivity_failures.max(1);
        let mut report = IngestReport::default();
        let mut consecutive_connectivity = 0usize;

        for (index, item) in rows.into_iter().enumerate() {
            report.total += 1;

            if report.aborted {
                report.not_attempted += 1;
                continue;
            }

            let (phone, outcome) = match item {
                Ok(row) => (
                    row.phone().map(str::to_string),
                    self.ingest_row(&row, batch_id).await,
                ),
                Err(err) => (None, Err(err)),
            };

            match outcome {
                Ok(()) => {
                    report.succeeded += 1;
                    consecutive_connectivity = 0;
                }
                Err(err) => {
                    warn!(row = index, error = %err, "Row failed");

                    if err.is_connectivity() {
                        consecutive_connectivity += 1;
                    } else {
                        consecutive_connectivity = 0;
                    }

                    report.failures.push(RowFailure {
                        row: index,
                        phone,
                        error: err,
                    });

                    if consecutive_connectivity >= max_failures {
                        error!(
                            sink = self.sink.name(),
                            failures = consecutive_connectivity,
                            "Store unreachable, aborting batch"
                        );
                        report.aborted = true;
                    }
                }
            }
        }

        info!(
            sink = self.sink.name(),
            batch = batch_id.unwrap_or("-"),
            total = report.total,
            succeeded = report.succeeded,
            failed = report.failed(),
            not_attempted = report.not_attempted,
            "Batch complete"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use database::NewContact;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Sink that replays scripted outcomes and records what it saw.
    #[derive(Default)]
    struct ScriptedSink {
        script: Mutex<VecDeque<Result<(), IngestError>>>,
        written: Mutex<Vec<NewContact>>,
    }

    impl ScriptedSink {
        fn with_script(script: Vec<Result<(), IngestError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                written: Mutex::new(Vec::new()),
            }
        }

        fn written_phones(&self) -> Vec<String> {
            self.written
                .lock()
                .unwrap()
                .iter()
                .map(|c| c.phone.clone())
                .collect()
        }
    }

    #[async_trait]
    impl ContactSink for ScriptedSink {
        async fn upsert(&self, contact: &NewContact) -> Result<(), IngestError> {
            let outcome = self.script.lock().unwrap().pop_front().unwrap_or(Ok(()));
            if outcome.is_ok() {
                self.written.lock().unwrap().push(contact.clone());
            }
            outcome
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn phone_row(phone: &str) -> RawRow {
        RawRow::from_pairs([("number", phone), ("result_loc", "Maharashtra, India")])
    }

    fn offline() -> Result<(), IngestError> {
        Err(IngestError::Connectivity("connection refused".to_string()))
    }

    #[tokio::test]
    async fn test_failed_rows_do_not_stop_batch() {
        let sink = ScriptedSink::with_script(vec![
            Ok(()),
            Err(IngestError::Constraint("CHECK constraint failed".to_string())),
            Ok(()),
        ]);
        let ingestor = Ingestor::new(sink, IngestOptions::default());

        let rows = vec![
            phone_row("1111111111"),
            phone_row("123"),
            phone_row("2222222222"),
            phone_row("3333333333"),
        ];
        let report = ingestor.ingest(rows, Some("batch")).await;

        assert_eq!(report.total, 4);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed(), 2);
        assert!(!report.aborted);

        // Row 1 fails validation without reaching the sink; row 2 is rejected by it.
        assert_eq!(report.failures[0].row, 1);
        assert_eq!(report.failures[0].phone.as_deref(), Some("123"));
        assert!(matches!(report.failures[0].error, IngestError::Validation(_)));
        assert_eq!(report.failures[1].row, 2);
        assert!(matches!(report.failures[1].error, IngestError::Constraint(_)));

        assert_eq!(
            ingestor.sink().written_phones(),
            vec!["1111111111", "3333333333"]
        );
    }

    #[tokio::test]
    async fn test_repeated_connectivity_failures_abort() {
        let sink = ScriptedSink::with_script(vec![Ok(()), offline(), offline(), offline()]);
        let ingestor = Ingestor::new(sink, IngestOptions::default());

        let rows = (0..6).map(|i| phone_row(&format!("900000000{}", i)));
        let report = ingestor.ingest(rows, None).await;

        assert!(report.aborted);
        assert_eq!(report.total, 6);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed(), 3);
        assert_eq!(report.not_attempted, 2);
    }

    #[tokio::test]
    async fn test_connectivity_streak_resets_on_success() {
        let sink = ScriptedSink::with_script(vec![offline(), offline(), Ok(()), offline(), offline()]);
        let ingestor = Ingestor::new(sink, IngestOptions::default());

        let rows = (0..6).map(|i| phone_row(&format!("800000000{}", i)));
        let report = ingestor.ingest(rows, None).await;

        assert!(!report.aborted);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed(), 4);
        assert_eq!(report.not_attempted, 0);
    }

    #[tokio::test]
    async fn test_decode_errors_are_row_failures() {
        let ingestor = Ingestor::new(ScriptedSink::default(), IngestOptions::default());
        let rows = vec![
            Ok(phone_row("1111111111")),
            Err(IngestError::Parse("invalid utf-8 in field 2".to_string())),
            Ok(phone_row("2222222222")),
        ];

        let report = ingestor.ingest_parsed(rows, None).await;

        assert_eq!(report.total, 3);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].row, 1);
        assert_eq!(report.failures[0].phone, None);
        assert!(matches!(report.failures[0].error, IngestError::Parse(_)));
    }

    #[tokio::test]
    async fn test_summary_and_merge() {
        let ingestor = Ingestor::new(ScriptedSink::default(), IngestOptions::default());

        let first = ingestor
            .ingest(vec![phone_row("1111111111"), phone_row("x")], None)
            .await;
        let second = ingestor.ingest(vec![phone_row("y")], None).await;

        let mut summary = first.summary();
        summary.merge(second.summary());
        summary.merge(IngestReport::skipped(4).summary());

        assert_eq!(
            summary,
            IngestSummary {
                total: 7,
                succeeded: 1,
                failed: 2,
                not_attempted: 4,
                aborted: true,
            }
        );
    }
}
