//! A single DNS record and its update/delete operations

use std::fmt;
use std::sync::Arc;

use crate::cache::Invalidator;
use crate::error::Result;
use crate::http_client::Transport;
use crate::types::{RecordChanges, RecordInfo};

/// One DNS record of a domain.
///
/// Holds the shared transport, its owning domain's id and a handle on that
/// domain's record listing, not the domain itself.
#[derive(Debug, Clone)]
pub struct Record {
    transport: Arc<Transport>,
    domain_id: u64,
    info: RecordInfo,
    listing: Invalidator,
}

impl Record {
    pub(crate) fn new(
        transport: Arc<Transport>,
        domain_id: u64,
        info: RecordInfo,
        listing: Invalidator,
    ) -> Self {
        Self {
            transport,
            domain_id,
            info,
            listing,
        }
    }

    pub fn info(&self) -> &RecordInfo {
        &self.info
    }

    pub fn id(&self) -> u64 {
        self.info.id
    }

    pub fn domain_id(&self) -> u64 {
        self.domain_id
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn record_type(&self) -> &str {
        &self.info.record_type
    }

    pub fn content(&self) -> &str {
        &self.info.content
    }

    fn path(&self) -> String {
        format!("/domains/{}/records/{}", self.domain_id, self.info.id)
    }

    /// Send a partial update with only the fields set in `changes`.
    ///
    /// Nothing is sent when `changes` is empty; that case logs a warning and
    /// returns `Ok(false)`. Any 2xx answer returns `Ok(true)`, whatever the
    /// body. `self` keeps the old values: the owning domain's listing is
    /// invalidated and shows the update on its next fetch.
    pub async fn update(&self, changes: &RecordChanges) -> Result<bool> {
        if changes.is_empty() {
            log::warn!("Record {} not updated, no data provided", self.info.id);
            return Ok(false);
        }

        self.transport
            .put(&self.path(), &changes.to_form())
            .await?
            .ensure_success()?;
        self.listing.invalidate();
        Ok(true)
    }

    /// Delete this record on the server and invalidate the owning domain's
    /// record listing.
    pub async fn delete(&self) -> Result<()> {
        self.transport.delete(&self.path()).await?.ensure_success()?;
        self.listing.invalidate();
        Ok(())
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.info.name, self.info.record_type, self.info.content
        )
    }
}
