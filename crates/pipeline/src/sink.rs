//! The storage seam the ingest loop writes through.

use async_trait::async_trait;
use database::{contact, Database, NewContact};

use crate::error::IngestError;

/// A destination for prepared contacts.
///
/// Implementations must apply each write atomically: the contact is either
/// fully inserted/replaced or not written at all.
#[async_trait]
pub trait ContactSink: Send + Sync {
    /// Insert the contact, or replace the existing contact with the same phone.
    async fn upsert(&self, contact: &NewContact) -> Result<(), IngestError>;

    /// Get a human-readable name for this sink.
    fn name(&self) -> &str;
}

#[async_trait]
impl ContactSink for Database {
    async fn upsert(&self, record: &NewContact) -> Result<(), IngestError> {
        contact::upsert_contact(self.pool(), record).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "sqlite"
    }
}
