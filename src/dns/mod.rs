pub mod dnsimple;

use serde::{Deserialize, Serialize};

/// TTL given to records created by this tool.
pub const DEFAULT_TTL: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Record {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub ttl: u32,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
}

impl NewRecord {
    pub fn a(name: &str, content: &str) -> Self {
        Self {
            record_type: "A".to_owned(),
            name: name.to_owned(),
            content: content.to_owned(),
            ttl: DEFAULT_TTL,
        }
    }
}

/// Partial update. Only the content is ever sent, so the record keeps its
/// current type and TTL on the provider side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordUpdate {
    pub content: String,
}

#[async_trait::async_trait]
pub trait Provider: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn list_records(&self, domain: &str) -> Result<Vec<Record>, Self::Error>;
    async fn create_record(&self, domain: &str, record: &NewRecord) -> Result<Record, Self::Error>;
    async fn update_record(
        &self,
        domain: &str,
        id: u64,
        update: &RecordUpdate,
    ) -> Result<Record, Self::Error>;
}

/// Returns the first record named exactly `subdomain`.
pub fn find_record<'a>(records: &'a [Record], subdomain: &str) -> Option<&'a Record> {
    records.iter().find(|r| r.name == subdomain)
}
