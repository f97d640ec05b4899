pub mod http;

use std::net::Ipv4Addr;

/// Source of the address the machine is seen with from the internet.
#[async_trait::async_trait]
pub trait IpLookup: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn public_ip(&self) -> Result<Ipv4Addr, Self::Error>;
}
