//! TCP connectivity probe.
//!
//! The display counts as online when a TCP connection to a well-known
//! address opens within the timeout.  Nothing is sent over the connection.

use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

use crate::application::network_status::ConnectivityProbe;

#[derive(Debug, Clone)]
pub struct TcpProbe {
    address: String,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(address: impl Into<String>, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            timeout,
        }
    }
}

#[async_trait]
impl ConnectivityProbe for TcpProbe {
    async fn is_online(&self) -> bool {
        match timeout(self.timeout, TcpStream::connect(&self.address)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                trace!(address = %self.address, "probe connect failed: {e}");
                false
            }
            Err(_) => {
                trace!(address = %self.address, "probe timed out");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_probe_online_when_listener_accepts() {
        // Arrange
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap().to_string();
        let probe = TcpProbe::new(address, Duration::from_secs(1));

        // Act / Assert
        assert!(probe.is_online().await);
    }

    #[tokio::test]
    async fn test_probe_offline_when_nothing_listens() {
        // Bind then drop to get a port that is very likely closed.
        let address = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().to_string()
        };
        let probe = TcpProbe::new(address, Duration::from_millis(500));

        assert!(!probe.is_online().await);
    }
}
