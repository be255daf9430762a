//! Contact ingest pipeline.
//!
//! Each input row goes through four steps:
//!
//! - [`normalize`] - canonical lowercase forms of free text
//! - [`location`] - state/country from the compound area field, city from a fixed gazetteer
//! - [`classify`] - target city / rest of region / other state
//! - [`ContactSink::upsert`] - atomic insert-or-replace keyed on the canonical phone
//!
//! [`Ingestor`] drives a batch of rows through these steps and returns an
//! [`IngestReport`] listing the rows that failed.
//!
//! # Example
//!
//! ```no_run
//! use database::Database;
//! use pipeline::{IngestOptions, Ingestor, RawRow};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:data/contacts.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let rows = vec![RawRow::from_pairs([
//!         ("number", "+911234567890"),
//!         ("result_loc", "Maharashtra, India"),
//!     ])];
//!
//!     let ingestor = Ingestor::new(db, IngestOptions::default());
//!     let report = ingestor.ingest(rows, Some("batch_local")).await;
//!     println!("{:?}", report.summary());
//!     Ok(())
//! }
//! ```

pub mod classify;
pub mod error;
pub mod ingest;
pub mod location;
pub mod normalize;
pub mod phone;
pub mod row;
pub mod sink;

pub use classify::{classify, Classification, TargetRegion};
pub use error::IngestError;
pub use ingest::{IngestOptions, IngestReport, IngestSummary, Ingestor, RowFailure};
pub use location::{extract_location, Location, LocationFields, KNOWN_CITIES};
pub use row::{prepare_contact, RawRow};
pub use sink::ContactSink;

// Re-export async_trait for sink implementations
pub use async_trait::async_trait;
