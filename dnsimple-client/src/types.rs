use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// TTL used by [`NewRecord`] unless overridden.
pub const DEFAULT_TTL: u32 = 3600;
/// Priority used by [`NewRecord`] unless overridden.
pub const DEFAULT_PRIO: u32 = 10;

// ============ Resources ============

/// A domain hosted in the account.
///
/// Only the fields the client relies on are typed; everything else the API
/// returns is kept in [`extra`](Self::extra).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainInfo {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unicode_name: Option<String>,
    /// Registration state as reported by the provider (e.g. `hosted`, `registered`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_renew: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<NaiveDate>,
    #[serde(default, with = "crate::utils::datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::utils::datetime")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Provider fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A DNS record of a domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordInfo {
    pub id: u64,
    pub domain_id: u64,
    /// Relative name; the empty string is the zone apex.
    pub name: String,
    /// Record type as the provider spells it (`A`, `CNAME`, `MX`, ...).
    pub record_type: String,
    pub content: String,
    pub ttl: u32,
    #[serde(default)]
    pub prio: Option<u32>,
    #[serde(default, with = "crate::utils::datetime")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::utils::datetime")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Provider fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A DNS template that can be applied to a domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: u64,
    pub name: String,
    pub short_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ============ Response envelopes ============

/// `{"domain": {...}}`
#[derive(Debug, Deserialize)]
pub(crate) struct DomainEnvelope {
    pub domain: DomainInfo,
}

/// `{"record": {...}}`
#[derive(Debug, Deserialize)]
pub(crate) struct RecordEnvelope {
    pub record: RecordInfo,
}

/// `{"dns_template": {...}}`
#[derive(Debug, Deserialize)]
pub(crate) struct TemplateEnvelope {
    pub dns_template: Template,
}

// ============ Requests ============

/// Form fields sent with write requests, e.g. `("record[name]", "www")`.
pub(crate) type FormFields = Vec<(&'static str, String)>;

/// A record to be created with [`Domain::add_record`](crate::Domain::add_record).
///
/// TTL defaults to 3600 and priority to 10.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub name: String,
    pub record_type: String,
    pub content: String,
    pub ttl: u32,
    pub prio: u32,
}

impl NewRecord {
    pub fn new(
        name: impl Into<String>,
        record_type: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            record_type: record_type.into(),
            content: content.into(),
            ttl: DEFAULT_TTL,
            prio: DEFAULT_PRIO,
        }
    }

    #[must_use]
    pub fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn prio(mut self, prio: u32) -> Self {
        self.prio = prio;
        self
    }

    pub(crate) fn to_form(&self) -> FormFields {
        vec![
            ("record[name]", self.name.clone()),
            ("record[record_type]", self.record_type.clone()),
            ("record[content]", self.content.clone()),
            ("record[ttl]", self.ttl.to_string()),
            ("record[prio]", self.prio.to_string()),
        ]
    }
}

/// A partial record update. Only the fields that are set are sent.
///
/// `name(String::new())` moves the record to the zone apex; leaving a field
/// unset keeps its current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordChanges {
    pub name: Option<String>,
    pub content: Option<String>,
    pub ttl: Option<u32>,
    pub prio: Option<u32>,
}

impl RecordChanges {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    #[must_use]
    pub fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    #[must_use]
    pub fn prio(mut self, prio: u32) -> Self {
        self.prio = Some(prio);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.content.is_none() && self.ttl.is_none() && self.prio.is_none()
    }

    pub(crate) fn to_form(&self) -> FormFields {
        let mut form = FormFields::new();
        if let Some(name) = &self.name {
            form.push(("record[name]", name.clone()));
        }
        if let Some(content) = &self.content {
            form.push(("record[content]", content.clone()));
        }
        if let Some(ttl) = self.ttl {
            form.push(("record[ttl]", ttl.to_string()));
        }
        if let Some(prio) = self.prio {
            form.push(("record[prio]", prio.to_string()));
        }
        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_defaults() {
        let record = NewRecord::new("www", "CNAME", "example.com");
        assert_eq!(record.ttl, 3600);
        assert_eq!(record.prio, 10);
        assert_eq!(
            record.to_form(),
            vec![
                ("record[name]", "www".to_string()),
                ("record[record_type]", "CNAME".to_string()),
                ("record[content]", "example.com".to_string()),
                ("record[ttl]", "3600".to_string()),
                ("record[prio]", "10".to_string()),
            ]
        );
    }

    #[test]
    fn new_record_overrides() {
        let record = NewRecord::new("", "MX", "mx.example.com").ttl(60).prio(5);
        let form = record.to_form();
        assert!(form.contains(&("record[ttl]", "60".to_string())));
        assert!(form.contains(&("record[prio]", "5".to_string())));
        assert!(form.contains(&("record[name]", String::new())));
    }

    #[test]
    fn empty_changes() {
        let changes = RecordChanges::new();
        assert!(changes.is_empty());
        assert!(changes.to_form().is_empty());
    }

    #[test]
    fn changes_render_only_set_fields() {
        let changes = RecordChanges::new().content("5.6.7.8").ttl(600);
        assert!(!changes.is_empty());
        assert_eq!(
            changes.to_form(),
            vec![
                ("record[content]", "5.6.7.8".to_string()),
                ("record[ttl]", "600".to_string()),
            ]
        );
    }

    #[test]
    fn empty_name_is_a_change() {
        let changes = RecordChanges::new().name("");
        assert!(!changes.is_empty());
        assert_eq!(changes.to_form(), vec![("record[name]", String::new())]);
    }

    #[test]
    fn domain_keeps_unknown_fields() {
        let json = serde_json::json!({
            "id": 42,
            "name": "example.com",
            "state": "hosted",
            "expires_on": "2030-01-15",
            "created_at": "2013-01-29T14:25:38Z",
            "updated_at": null,
            "token": "domain-token",
            "lockable": true
        });
        let domain: DomainInfo = serde_json::from_value(json).unwrap();
        assert_eq!(domain.id, 42);
        assert_eq!(domain.state.as_deref(), Some("hosted"));
        assert_eq!(domain.expires_on, NaiveDate::from_ymd_opt(2030, 1, 15));
        assert!(domain.created_at.is_some());
        assert!(domain.updated_at.is_none());
        assert_eq!(domain.extra.get("token"), Some(&Value::from("domain-token")));
        assert_eq!(domain.extra.get("lockable"), Some(&Value::Bool(true)));
        assert!(!domain.extra.contains_key("name"));
    }

    #[test]
    fn record_envelope_decodes() {
        let json = r#"{"record":{"id":7,"domain_id":42,"name":"","record_type":"A",
            "content":"1.2.3.4","ttl":3600,"prio":null,"system_record":false}}"#;
        let envelope: RecordEnvelope = serde_json::from_str(json).unwrap();
        let record = envelope.record;
        assert_eq!(record.id, 7);
        assert_eq!(record.name, "");
        assert_eq!(record.prio, None);
        assert_eq!(record.extra.get("system_record"), Some(&Value::Bool(false)));
    }

    #[test]
    fn template_envelope_decodes() {
        let json = r#"{"dns_template":{"id":1,"name":"Google Apps","short_name":"googlemx"}}"#;
        let envelope: TemplateEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.dns_template.short_name, "googlemx");
        assert!(envelope.dns_template.description.is_none());
    }
}
