//! Account-level entry point

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::Value;

use crate::cache::{Cached, Invalidator};
use crate::config::{ClientConfig, Credentials};
use crate::domain::Domain;
use crate::error::Result;
use crate::http_client::Transport;
use crate::types::{DomainEnvelope, NewRecord, RecordChanges, Template, TemplateEnvelope};

/// Domains of the account, keyed by domain name.
pub type DomainMap = BTreeMap<String, Domain>;

/// Client for one DNSimple account.
///
/// Owns the transport and a cached listing of the account's domains. The
/// listing is fetched on first use and invalidated when a domain is created
/// or deleted through this client. Each [`Domain`] caches its own records.
///
/// All caches are plain owned state: methods that may touch them take
/// `&mut self`, and sharing a client between tasks needs an external lock.
#[derive(Debug)]
pub struct DnsimpleClient {
    transport: Arc<Transport>,
    domains: Cached<DomainMap>,
}

impl DnsimpleClient {
    /// Client for the production API with default settings.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::default())
    }

    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        Ok(Self {
            transport: Arc::new(Transport::new(credentials, config)?),
            domains: Cached::new(),
        })
    }

    /// Client built from a `.dnsimple` file in the working directory or,
    /// failing that, the home directory.
    ///
    /// Returns `Ok(None)` (with a logged warning) when neither file exists.
    pub fn with_auth_file() -> Result<Option<Self>> {
        Self::with_auth_file_in(&Credentials::default_locations(), ClientConfig::default())
    }

    /// Like [`with_auth_file`](Self::with_auth_file) with explicit search locations.
    pub fn with_auth_file_in(locations: &[PathBuf], config: ClientConfig) -> Result<Option<Self>> {
        match Credentials::discover_in(locations)? {
            Some(credentials) => Self::with_config(credentials, config).map(Some),
            None => Ok(None),
        }
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    // ============ Domains ============

    /// All domains of the account, fetched on first use.
    pub async fn domains(&mut self) -> Result<&DomainMap> {
        Ok(&*self.domains_mut().await?)
    }

    async fn domains_mut(&mut self) -> Result<&mut DomainMap> {
        let transport = Arc::clone(&self.transport);
        let invalidator = self.domains.invalidator();
        self.domains
            .get_or_try_fetch(|| fetch_domains(transport, invalidator))
            .await
    }

    /// Look a domain up by name in the cached listing.
    pub async fn domain(&mut self, name: &str) -> Result<Option<&mut Domain>> {
        Ok(self.domains_mut().await?.get_mut(name))
    }

    /// Drop the cached listing; the next access refetches.
    pub fn invalidate_domains(&mut self) {
        self.domains.invalidate();
    }

    /// Add a domain to the account. The API must answer `201 Created`.
    pub async fn create_domain(&mut self, name: &str) -> Result<()> {
        let form = [("domain[name]", name.to_string())];
        self.transport
            .post("/domains", &form)
            .await?
            .ensure_status(StatusCode::CREATED)?;
        log::debug!("Created domain {name}");
        self.domains.invalidate();
        Ok(())
    }

    /// Delete a domain by name. `Ok(false)` if the account has no such domain.
    pub async fn delete_domain(&mut self, name: &str) -> Result<bool> {
        let Some(domain) = self.domain(name).await? else {
            log::warn!("Domain with name '{name}' is unknown");
            return Ok(false);
        };
        domain.delete().await?;
        self.domains.invalidate();
        Ok(true)
    }

    /// Availability check for a domain name. Not cached.
    pub async fn checkdomain(&self, name: &str) -> Result<Value> {
        self.transport
            .json_get(&format!("/domains/{}/check", urlencoding::encode(name)))
            .await
    }

    // ============ Templates ============

    pub async fn templates(&self) -> Result<Vec<Template>> {
        let envelopes: Vec<TemplateEnvelope> = self.transport.json_get("/templates").await?;
        Ok(envelopes.into_iter().map(|e| e.dns_template).collect())
    }

    pub async fn template(&self, short_name: &str) -> Result<Template> {
        let envelope: TemplateEnvelope = self
            .transport
            .json_get(&format!("/templates/{}", urlencoding::encode(short_name)))
            .await?;
        Ok(envelope.dns_template)
    }

    /// Apply a template to a domain looked up by name.
    pub async fn apply_template_to_domain(
        &mut self,
        domain_name: &str,
        short_name: &str,
    ) -> Result<bool> {
        let Some(domain) = self.domain(domain_name).await? else {
            log::warn!("Domain with name '{domain_name}' is unknown");
            return Ok(false);
        };
        domain.apply_template(short_name).await?;
        Ok(true)
    }

    // ============ Composite operations ============

    /// Create a domain pointing at `ip_address` with `www` and `stage`
    /// subdomains and Google mail routing.
    ///
    /// Steps, each awaited before the next: create the domain, apex `A`
    /// record, `www` CNAME, `stage` CNAME, then
    /// [`apply_google_mail_template`](Domain::apply_google_mail_template).
    /// The first failing step ends the sequence with its error; whatever the
    /// earlier steps created stays on the server. `Ok(false)` means the new
    /// domain did not show up in the account listing.
    pub async fn create_standard_domain(&mut self, name: &str, ip_address: &str) -> Result<bool> {
        self.create_domain(name).await?;

        let Some(domain) = self.domain(name).await? else {
            log::warn!("Domain '{name}' was created but is not listed");
            return Ok(false);
        };
        domain
            .add_record(&NewRecord::new("", "A", ip_address))
            .await?;
        domain
            .add_record(&NewRecord::new("www", "CNAME", name))
            .await?;
        domain
            .add_record(&NewRecord::new("stage", "CNAME", name))
            .await?;
        domain.apply_google_mail_template().await?;
        Ok(true)
    }

    /// Add `<sub_domain_name>.<domain_name>` as a CNAME to the domain itself.
    ///
    /// `Ok(false)` if the account has no such domain.
    pub async fn create_cname_subdomain(
        &mut self,
        domain_name: &str,
        sub_domain_name: &str,
    ) -> Result<bool> {
        let Some(domain) = self.domain(domain_name).await? else {
            log::warn!("Domain with name '{domain_name}' is unknown");
            return Ok(false);
        };
        domain
            .add_record(&NewRecord::new(sub_domain_name, "CNAME", domain_name))
            .await?;
        Ok(true)
    }

    /// Point the apex `A` record of a domain at a new address.
    ///
    /// `Ok(false)` if the domain is unknown or has no apex `A` record.
    pub async fn migrate_domain_arecord_to_new_address(
        &mut self,
        domain_name: &str,
        new_ip_address: &str,
    ) -> Result<bool> {
        let Some(domain) = self.domain(domain_name).await? else {
            log::warn!("Domain with name '{domain_name}' is unknown");
            return Ok(false);
        };
        let Some(record) = domain.get_record_by_name_and_type("", "A").await? else {
            log::warn!("A-Record with no name not defined for '{domain_name}'");
            return Ok(false);
        };
        // 成功的更新会使记录列表失效
        record
            .update(&RecordChanges::new().content(new_ip_address))
            .await
    }

    // ============ Raw access ============

    /// GET an arbitrary API path and decode the JSON response.
    pub async fn get(&self, path: &str) -> Result<Value> {
        self.transport.json_get(path).await
    }

    pub async fn post(&self, path: &str, form: &[(&str, String)]) -> Result<Value> {
        self.transport.post(path, form).await?.ensure_success()?.json()
    }

    pub async fn put(&self, path: &str, form: &[(&str, String)]) -> Result<Value> {
        self.transport.put(path, form).await?.ensure_success()?.json()
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        self.transport.delete(path).await?.ensure_success()?.json()
    }
}

async fn fetch_domains(transport: Arc<Transport>, invalidator: Invalidator) -> Result<DomainMap> {
    let envelopes: Vec<DomainEnvelope> = transport.json_get("/domains.json").await?;
    log::debug!("Fetched {} domains", envelopes.len());
    Ok(envelopes
        .into_iter()
        .map(|e| {
            (
                e.domain.name.clone(),
                Domain::new(Arc::clone(&transport), e.domain, invalidator.clone()),
            )
        })
        .collect())
}
