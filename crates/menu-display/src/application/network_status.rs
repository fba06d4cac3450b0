//! Online/offline tracking.
//!
//! [`NetworkStatusMonitor`] turns a stream of raw "am I online?" readings
//! into edge-triggered transitions, so a flapping probe that keeps reporting
//! the same value never causes repeated reloads.  The probe itself is a port
//! ([`ConnectivityProbe`]) implemented in the infrastructure layer.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Online,
    Offline,
}

impl Connectivity {
    pub fn from_online(online: bool) -> Self {
        if online {
            Self::Online
        } else {
            Self::Offline
        }
    }

    pub fn is_online(self) -> bool {
        self == Self::Online
    }
}

/// What changed after an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    WentOffline,
    CameOnline,
}

/// Edge detector over connectivity readings.
#[derive(Debug, Clone)]
pub struct NetworkStatusMonitor {
    state: Connectivity,
}

impl NetworkStatusMonitor {
    pub fn new(initial: Connectivity) -> Self {
        Self { state: initial }
    }

    pub fn state(&self) -> Connectivity {
        self.state
    }

    /// Records a reading and reports the transition it caused, if any.
    pub fn observe(&mut self, online: bool) -> Transition {
        let next = Connectivity::from_online(online);
        if next == self.state {
            return Transition::Unchanged;
        }
        self.state = next;
        match next {
            Connectivity::Online => {
                info!("connection restored");
                Transition::CameOnline
            }
            Connectivity::Offline => {
                warn!("connection lost");
                Transition::WentOffline
            }
        }
    }
}

/// Answers whether the network is currently reachable.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn is_online(&self) -> bool;
}

/// Polls `probe` every `period` and forwards each reading on `events`.
///
/// Readings are forwarded unfiltered; edge detection happens in the
/// consumer's [`NetworkStatusMonitor`].  The task ends when the receiver is
/// dropped.
pub fn spawn_connectivity_watch(
    probe: Arc<dyn ConnectivityProbe>,
    period: Duration,
    events: mpsc::Sender<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let online = probe.is_online().await;
            debug!(online, "connectivity probe");
            if events.send(online).await.is_err() {
                debug!("connectivity watch stopping, receiver dropped");
                break;
            }
        }
    })
}
