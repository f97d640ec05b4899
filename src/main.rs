use crate::{
    dns::dnsimple::DnsimpleProvider,
    ip::http::HttpIpLookup,
    settings::Settings,
    updater::Updater,
};
use clap::Parser;
use std::{io, mem};
use tracing::debug;

mod dns;
mod ip;
mod settings;
mod updater;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Settings::parse();

    let subscriber = tracing_subscriber::fmt().with_writer(io::stderr);
    if cfg.json_logs {
        tracing::subscriber::set_global_default(subscriber.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(subscriber.finish())?;
    }

    run(cfg).await
}

async fn run(mut cfg: Settings) -> Result<(), Box<dyn std::error::Error>> {
    let mode = cfg.mode();
    let lookup = HttpIpLookup::new(cfg.ip_url.clone())?;

    let provider = DnsimpleProvider::connect(
        cfg.api_base()?,
        mem::take(&mut cfg.api_token),
        cfg.account.take(),
    ).await?;
    debug!(account = provider.account(), "connected to DNSimple");

    let updater = Updater::new(provider, lookup, mem::take(&mut cfg.domain));

    let mut out = io::stdout().lock();
    Ok(updater.run(&mode, &mut out).await?)
}
