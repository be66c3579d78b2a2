//! Backing-store probes
//!
//! A probe is the cheapest possible round trip to the store, issued only to
//! measure reachability and latency.

use async_trait::async_trait;
use tokio::net::TcpStream;

use crate::error::{Result, StoreError};

#[async_trait]
pub trait Probe: Send + Sync {
    /// Performs one minimal round trip.
    async fn ping(&self) -> Result<()>;
}

// == TCP Probe ==
/// Opens (and immediately drops) a TCP connection to the store's address.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    addr: String,
}

impl TcpProbe {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }
}

#[async_trait]
impl Probe for TcpProbe {
    async fn ping(&self) -> Result<()> {
        TcpStream::connect(&self.addr)
            .await
            .map(drop)
            .map_err(|err| {
                StoreError::transient(format!(
                    "Can't reach database server at {}: {}",
                    self.addr, err
                ))
            })
    }
}
