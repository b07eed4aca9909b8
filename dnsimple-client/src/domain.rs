//! A hosted domain, its cached record listing and template operations

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use reqwest::StatusCode;

use crate::cache::{Cached, Invalidator};
use crate::error::Result;
use crate::http_client::Transport;
use crate::record::Record;
use crate::types::{DomainInfo, NewRecord, RecordEnvelope};

/// Target of the `mail` CNAME added for Google-hosted mail.
pub const GOOGLE_MAIL_HOST: &str = "ghs.googlehosted.com";
/// Built-in provider template with Google's MX records.
pub const GOOGLE_MX_TEMPLATE: &str = "googlemx";

/// Records of one domain, keyed by record id.
pub type RecordMap = BTreeMap<u64, Record>;

/// A domain hosted in the account, with its cached record listing.
///
/// The listing is fetched on first use and invalidated by every call that
/// adds or removes records ([`add_record`](Self::add_record),
/// [`apply_template`](Self::apply_template),
/// [`delete_record`](Self::delete_record)), and by [`Record::update`] or
/// [`Record::delete`] on one of its records.
#[derive(Debug, Clone)]
pub struct Domain {
    transport: Arc<Transport>,
    info: DomainInfo,
    records: Cached<RecordMap>,
    listing: Invalidator,
}

impl Domain {
    /// `listing` invalidates the client's domain listing this domain came from.
    pub(crate) fn new(transport: Arc<Transport>, info: DomainInfo, listing: Invalidator) -> Self {
        Self {
            transport,
            info,
            records: Cached::new(),
            listing,
        }
    }

    pub fn info(&self) -> &DomainInfo {
        &self.info
    }

    pub fn id(&self) -> u64 {
        self.info.id
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    fn records_path(&self) -> String {
        format!("/domains/{}/records", self.info.id)
    }

    /// All records of the domain, fetched on first use.
    pub async fn records(&mut self) -> Result<&RecordMap> {
        let transport = Arc::clone(&self.transport);
        let domain_id = self.info.id;
        let path = self.records_path();
        let invalidator = self.records.invalidator();
        let records = self
            .records
            .get_or_try_fetch(|| fetch_records(transport, domain_id, path, invalidator))
            .await?;
        Ok(&*records)
    }

    /// Drop the cached listing; the next [`records`](Self::records) call refetches.
    pub fn invalidate_records(&mut self) {
        self.records.invalidate();
    }

    /// Create a record. The API must answer `201 Created`.
    pub async fn add_record(&mut self, record: &NewRecord) -> Result<()> {
        log::debug!(
            "Adding {} record '{}' to {}",
            record.record_type,
            record.name,
            self.info.name
        );
        self.transport
            .post(&self.records_path(), &record.to_form())
            .await?
            .ensure_status(StatusCode::CREATED)?;
        self.records.invalidate();
        Ok(())
    }

    /// Delete one record and invalidate the listing.
    pub async fn delete_record(&mut self, record_id: u64) -> Result<()> {
        self.transport
            .delete(&format!("{}/{record_id}", self.records_path()))
            .await?
            .ensure_success()?;
        self.records.invalidate();
        Ok(())
    }

    /// Apply a provider template (by short name) to this domain.
    pub async fn apply_template(&mut self, short_name: &str) -> Result<()> {
        let path = format!(
            "/domains/{}/templates/{}/apply",
            self.info.id,
            urlencoding::encode(short_name)
        );
        self.transport.post(&path, &[]).await?.ensure_success()?;
        self.records.invalidate();
        Ok(())
    }

    /// Route mail through Google: a `mail` CNAME to Google's host, then the
    /// `googlemx` template.
    ///
    /// Stops at the first failure. A CNAME created before a failed template
    /// application stays in place.
    pub async fn apply_google_mail_template(&mut self) -> Result<()> {
        self.add_record(&NewRecord::new("mail", "CNAME", GOOGLE_MAIL_HOST))
            .await?;
        self.apply_template(GOOGLE_MX_TEMPLATE).await
    }

    /// First record with exactly this name and type (`""` is the apex).
    pub async fn get_record_by_name_and_type(
        &mut self,
        name: &str,
        record_type: &str,
    ) -> Result<Option<&Record>> {
        let records = self.records().await?;
        Ok(records
            .values()
            .find(|r| r.name() == name && r.record_type() == record_type))
    }

    /// Delete the domain itself and invalidate the client's domain listing.
    pub async fn delete(&self) -> Result<()> {
        self.transport
            .delete(&format!("/domains/{}.json", self.info.id))
            .await?
            .ensure_success()?;
        self.listing.invalidate();
        Ok(())
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.info.name)
    }
}

async fn fetch_records(
    transport: Arc<Transport>,
    domain_id: u64,
    path: String,
    invalidator: Invalidator,
) -> Result<RecordMap> {
    let envelopes: Vec<RecordEnvelope> = transport.json_get(&path).await?;
    log::debug!("Fetched {} records of domain {domain_id}", envelopes.len());
    Ok(envelopes
        .into_iter()
        .map(|e| {
            let record = Record::new(
                Arc::clone(&transport),
                domain_id,
                e.record,
                invalidator.clone(),
            );
            (record.id(), record)
        })
        .collect())
}
