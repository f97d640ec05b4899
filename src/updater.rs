use std::{
    fmt::{Debug, Display, Formatter},
    io::{self, Write},
    net::Ipv4Addr,
};
use tracing::info;
use crate::{
    dns::{find_record, NewRecord, Provider, Record, RecordUpdate},
    ip::IpLookup,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Print the zone's records and touch nothing.
    List,
    /// Point `subdomain` at the public IP, creating the record if needed.
    Set { subdomain: String },
}

pub struct Updater<D: Provider, I: IpLookup> {
    provider: D,
    lookup: I,
    domain: String,
}

impl<D: Provider, I: IpLookup> Updater<D, I> {
    pub fn new(provider: D, lookup: I, domain: String) -> Self {
        Self {
            provider,
            lookup,
            domain,
        }
    }

    #[tracing::instrument(skip(self, out), fields(domain = %self.domain), level = "info")]
    pub async fn run<W: Write>(&self, mode: &Mode, out: &mut W) -> Result<(), SyncError<D, I>> {
        let records = self.provider.list_records(&self.domain)
            .await
            .map_err(SyncError::Provider)?;

        match mode {
            Mode::List => print_records(&records, out)?,
            Mode::Set { subdomain } => match find_record(&records, subdomain) {
                Some(record) => self.update(record, out).await?,
                None => self.create(subdomain, out).await?,
            },
        }

        Ok(())
    }

    async fn create<W: Write>(&self, subdomain: &str, out: &mut W) -> Result<(), SyncError<D, I>> {
        writeln!(out, "Creating {}.{}", subdomain, self.domain)?;
        let ip = self.public_ip(out).await?;

        let record = NewRecord::a(subdomain, &ip.to_string());
        self.provider.create_record(&self.domain, &record)
            .await
            .map_err(SyncError::Provider)?;

        Ok(())
    }

    async fn update<W: Write>(&self, record: &Record, out: &mut W) -> Result<(), SyncError<D, I>> {
        writeln!(out, "Updating IP for {}.{}", record.name, self.domain)?;
        let ip = self.public_ip(out).await?;

        let update = RecordUpdate { content: ip.to_string() };
        self.provider.update_record(&self.domain, record.id, &update)
            .await
            .map_err(SyncError::Provider)?;

        Ok(())
    }

    async fn public_ip<W: Write>(&self, out: &mut W) -> Result<Ipv4Addr, SyncError<D, I>> {
        let ip = self.lookup.public_ip()
            .await
            .map_err(SyncError::Lookup)?;

        info!(%ip, "resolved public IP");
        writeln!(out, "Public IP: {}", ip)?;
        Ok(ip)
    }
}

fn print_records<W: Write>(records: &[Record], out: &mut W) -> io::Result<()> {
    for record in records {
        writeln!(out, "{}", format_record(record))?;
    }
    Ok(())
}

fn format_record(record: &Record) -> String {
    format!(
        "{:<16} {:<8} {:>6} {}",
        record.name, record.record_type, record.ttl, record.content
    )
}

pub enum SyncError<D: Provider, I: IpLookup> {
    Provider(D::Error),
    Lookup(I::Error),
    Output(io::Error),
}

impl<D: Provider, I: IpLookup> From<io::Error> for SyncError<D, I> {
    fn from(e: io::Error) -> Self {
        SyncError::Output(e)
    }
}

impl<D: Provider, I: IpLookup> Debug for SyncError<D, I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::Provider(e) => f.debug_tuple("Provider").field(e).finish(),
            SyncError::Lookup(e) => f.debug_tuple("Lookup").field(e).finish(),
            SyncError::Output(e) => f.debug_tuple("Output").field(e).finish(),
        }
    }
}

impl<D: Provider, I: IpLookup> Display for SyncError<D, I> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncError::Provider(e) => Display::fmt(e, f),
            SyncError::Lookup(e) => Display::fmt(e, f),
            SyncError::Output(e) => write!(f, "failed to write output: {}", e),
        }
    }
}

impl<D: Provider, I: IpLookup> std::error::Error for SyncError<D, I> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Provider(e) => e.source(),
            SyncError::Lookup(e) => e.source(),
            SyncError::Output(e) => Some(e),
        }
    }
}
