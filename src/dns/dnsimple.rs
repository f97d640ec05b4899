use reqwest::{header::ACCEPT, Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;
use super::{NewRecord, Record, RecordUpdate};

pub const PRODUCTION_URL: &str = "https://api.dnsimple.com/v2/";
pub const SANDBOX_URL: &str = "https://api.sandbox.dnsimple.com/v2/";

// Largest page DNSimple serves. Only the first page is ever read.
const PAGE_SIZE: &str = "100";

pub struct DnsimpleProvider {
    base_url: Url,
    token: String,
    account: String,
    client: Client,
}

impl DnsimpleProvider {
    /// Builds a provider for `account`, asking the API which account the
    /// token belongs to when none is given.
    pub async fn connect(
        base_url: Url,
        token: String,
        account: Option<String>,
    ) -> Result<Self, DnsimpleError> {
        let base_url = normalize_base(base_url)?;

        let mut provider = Self {
            base_url,
            token,
            account: account.unwrap_or_default(),
            client: Client::new(),
        };

        if provider.account.is_empty() {
            provider.account = provider.whoami().await?;
        }

        Ok(provider)
    }

    pub fn account(&self) -> &str { &self.account }

    #[tracing::instrument(skip(self))]
    async fn whoami(&self) -> Result<String, DnsimpleError> {
        let url = self.base_url.join("whoami")?;
        let whoami: Envelope<Whoami> = self.send(self.client.get(url)).await?;

        let account = whoami.data.account.ok_or(DnsimpleError::NoAccount)?;
        debug!(account = account.id, "resolved account from token");

        Ok(account.id.to_string())
    }

    fn records_url(&self, domain: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(&format!("{}/zones/{}/records", self.account, domain))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, DnsimpleError> {
        let response = request
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(DnsimpleError::Unauthorized);
        }
        if !status.is_success() {
            let message = response.json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("no details").to_owned());
            return Err(DnsimpleError::Api { status, message });
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl super::Provider for DnsimpleProvider {
    type Error = DnsimpleError;

    #[tracing::instrument(skip(self))]
    async fn list_records(&self, domain: &str) -> Result<Vec<Record>, Self::Error> {
        let url = self.records_url(domain)?;
        let page: RecordPage = self.send(
            self.client.get(url).query(&[("per_page", PAGE_SIZE)])
        ).await?;

        if let Some(p) = page.pagination.filter(|p| p.total_pages > 1) {
            warn!(
                total_entries = p.total_entries,
                total_pages = p.total_pages,
                "zone has more records than fit on one page, only the first {} are used",
                page.data.len(),
            );
        }

        debug!("got {} records from DNSimple", page.data.len());
        Ok(page.data)
    }

    #[tracing::instrument(skip(self))]
    async fn create_record(&self, domain: &str, record: &NewRecord) -> Result<Record, Self::Error> {
        let url = self.records_url(domain)?;
        let created: Envelope<Record> = self.send(self.client.post(url).json(record)).await?;

        info!(id = created.data.id, "created record");
        Ok(created.data)
    }

    #[tracing::instrument(skip(self))]
    async fn update_record(
        &self,
        domain: &str,
        id: u64,
        update: &RecordUpdate,
    ) -> Result<Record, Self::Error> {
        let url = self.records_url(domain)?;
        let url = url.join(&format!("records/{}", id))?;
        let updated: Envelope<Record> = self.send(self.client.patch(url).json(update)).await?;

        info!(id = updated.data.id, "updated record");
        Ok(updated.data)
    }
}

fn normalize_base(mut url: Url) -> Result<Url, DnsimpleError> {
    if url.cannot_be_a_base() {
        return Err(DnsimpleError::BadBaseUrl);
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[derive(Debug, Error)]
pub enum DnsimpleError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error("bad base url")]
    BadBaseUrl,
    #[error("authentication failed, check the API token")]
    Unauthorized,
    #[error("DNSimple returned {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("the token is not bound to an account, pass --account")]
    NoAccount,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct Whoami {
    account: Option<Account>,
}

#[derive(Debug, Deserialize)]
struct Account {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct RecordPage {
    data: Vec<Record>,
    pagination: Option<Pagination>,
}

#[derive(Debug, Deserialize)]
struct Pagination {
    total_entries: u64,
    total_pages: u64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}
