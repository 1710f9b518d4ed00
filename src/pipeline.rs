//! Concurrent collection of every configured source into one list

use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::getter::Getter;
use crate::models::ProxyList;

/// Per-getter deadline in seconds
pub const DEFAULT_DEADLINE: u64 = 60;
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Runs all getters at once and merges their proxies
///
/// Every getter gets its own task and shares a bounded channel with a single
/// collector, which is the only owner of the resulting list. A failing or
/// slow getter only loses its own proxies.
pub struct Pipeline {
    getters: Vec<Arc<dyn Getter>>,
    deadline: Duration,
    channel_capacity: usize,
}

impl Pipeline {
    pub fn new(getters: Vec<Arc<dyn Getter>>) -> Self {
        Pipeline {
            getters,
            deadline: Duration::from_secs(DEFAULT_DEADLINE),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }

    pub async fn collect(self) -> ProxyList {
        let (tx, mut rx) = mpsc::channel(self.channel_capacity);

        let collector = tokio::spawn(async move {
            let mut list = ProxyList::new();
            while let Some(proxy) = rx.recv().await {
                list.push_unique(proxy);
            }
            list
        });

        let mut workers = JoinSet::new();
        for getter in self.getters {
            let tx = tx.clone();
            let deadline = self.deadline;
            workers.spawn(async move { getter.get_to_chan(tx, deadline).await });
        }
        // the channel closes once every worker has dropped its sender
        drop(tx);

        let mut received = 0;
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(count) => received += count,
                Err(e) => error!("Getter task panicked: {}", e),
            }
        }

        let list = match collector.await {
            Ok(list) => list,
            Err(e) => {
                error!("Collector task failed: {}", e);
                ProxyList::new()
            }
        };

        if list.is_empty() {
            warn!("No proxies collected from any source");
        } else {
            info!(
                "Collected {} unique proxies out of {} received",
                list.len(),
                received
            );
        }
        list
    }
}
