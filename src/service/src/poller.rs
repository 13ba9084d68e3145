//! Polling cache over the balance reader.
//!
//! One background task per poller. It refreshes the snapshot of the current
//! account on a fixed interval and whenever it is invalidated. Only one read
//! is ever in flight: triggers that arrive during a read collapse into a
//! single follow-up read. Switching accounts clears the published snapshot and
//! abandons any read still running for the previous account.
//!
//! Every invalidation bumps a refresh generation. A published snapshot
//! carries the generation that was current when its read started, so a
//! caller can tell a read begun after its invalidation from one that was
//! already in flight.

use crate::metrics::SNAPSHOT_COUNTER;
use crate::reader::BalanceReader;
use faucet_core::types::{AccountAddress, BalanceSnapshot};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{oneshot, watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Default refresh interval.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Shortest accepted refresh interval.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// Something that can be told its cached balances are stale.
pub trait CacheInvalidator: Send + Sync {
    /// Requests a refresh as soon as possible.
    fn invalidate(&self);
}

/// State shared between the handle and the task.
struct Shared {
    account: watch::Sender<Option<AccountAddress>>,
    snapshot: watch::Sender<Option<Arc<BalanceSnapshot>>>,
    refresh: Notify,
    generation: AtomicU64,
}

impl Shared {
    fn invalidate(&self) {
        // bump before notifying so the follow-up read sees the new generation
        self.generation.fetch_add(1, Ordering::SeqCst);
        // notify_one keeps at most one permit, so bursts coalesce
        self.refresh.notify_one();
    }
}

/// Cheap, cloneable invalidation hook for a running poller.
#[derive(Clone)]
pub struct Invalidator {
    shared: Arc<Shared>,
}

impl CacheInvalidator for Invalidator {
    fn invalidate(&self) {
        self.shared.invalidate();
    }
}

/// Builder for a polling cache.
pub struct BalancePoller {
    reader: Arc<BalanceReader>,
    interval: Duration,
    account: Option<AccountAddress>,
}

impl BalancePoller {
    /// Creates a poller with the default interval and no account.
    pub fn new(reader: Arc<BalanceReader>) -> Self {
        Self {
            reader,
            interval: DEFAULT_REFRESH_INTERVAL,
            account: None,
        }
    }

    /// Sets the refresh interval, raised to [`MIN_REFRESH_INTERVAL`] if
    /// shorter.
    pub fn interval(mut self, interval: Duration) -> Self {
        if interval < MIN_REFRESH_INTERVAL {
            warn!(
                "Refresh interval {:?} too short, using {:?}",
                interval, MIN_REFRESH_INTERVAL
            );
        }
        self.interval = interval.max(MIN_REFRESH_INTERVAL);
        self
    }

    /// Sets the account to poll from the start.
    pub fn account(mut self, account: Option<AccountAddress>) -> Self {
        self.account = account;
        self
    }

    /// Starts the background task. It runs until the handle is shut down or
    /// dropped.
    pub fn spawn(self) -> PollerHandle {
        let (account_tx, account_rx) = watch::channel(self.account);
        let (snapshot_tx, _) = watch::channel(None);
        let shared = Arc::new(Shared {
            account: account_tx,
            snapshot: snapshot_tx,
            refresh: Notify::new(),
            generation: AtomicU64::new(0),
        });
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(run(
            self.reader,
            shared.clone(),
            self.interval,
            account_rx,
            shutdown_rx,
        ));

        PollerHandle {
            shared,
            task: Some(task),
            shutdown: Some(shutdown_tx),
        }
    }
}

/// Owns a running poller.
pub struct PollerHandle {
    shared: Arc<Shared>,
    task: Option<JoinHandle<()>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl PollerHandle {
    /// Returns the latest snapshot of the current account, if one has been read.
    pub fn latest(&self) -> Option<Arc<BalanceSnapshot>> {
        self.shared.snapshot.borrow().clone()
    }

    /// Subscribes to snapshot updates. `None` means no data for the current
    /// account yet.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<BalanceSnapshot>>> {
        self.shared.snapshot.subscribe()
    }

    /// Returns the account being polled.
    pub fn current_account(&self) -> Option<AccountAddress> {
        self.shared.account.borrow().clone()
    }

    /// Switches to another account, or stops polling with `None`.
    ///
    /// The published snapshot is cleared at once so no reader ever sees the
    /// previous account's balances under the new account.
    pub fn set_account(&self, account: Option<AccountAddress>) {
        if *self.shared.account.borrow() == account {
            return;
        }
        info!(
            "Polling balances for {}",
            account.as_ref().map(|a| a.as_str()).unwrap_or("no account")
        );
        // Holding the snapshot lock orders this against a concurrent publish.
        self.shared.snapshot.send_modify(|slot| {
            self.shared.account.send_replace(account);
            *slot = None;
        });
    }

    /// Requests an immediate refresh.
    pub fn invalidate(&self) {
        self.shared.invalidate();
    }

    /// Returns the current refresh generation.
    pub fn generation(&self) -> u64 {
        self.shared.generation.load(Ordering::SeqCst)
    }

    /// Waits for a snapshot whose read started after `generation` was left
    /// behind, i.e. after a later invalidation.
    ///
    /// Snapshots from reads that were already running when the invalidation
    /// arrived are skipped.
    pub async fn refreshed_after(&self, generation: u64) -> Arc<BalanceSnapshot> {
        let mut updates = self.subscribe();
        loop {
            if let Some(snapshot) = updates.borrow_and_update().clone() {
                if snapshot.generation > generation {
                    return snapshot;
                }
            }
            // the sender lives in `shared`, so this only fails once we are gone
            if updates.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }

    /// Returns a hook that invalidates this poller.
    pub fn invalidator(&self) -> Invalidator {
        Invalidator {
            shared: self.shared.clone(),
        }
    }

    /// Stops the task and waits for it to finish.
    pub async fn shutdown(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl CacheInvalidator for PollerHandle {
    fn invalidate(&self) {
        self.shared.invalidate();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run(
    reader: Arc<BalanceReader>,
    shared: Arc<Shared>,
    period: Duration,
    mut account_rx: watch::Receiver<Option<AccountAddress>>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    // Read right away for the initial account.
    let mut pending = true;

    loop {
        if !pending {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = ticker.tick() => {}
                _ = shared.refresh.notified() => debug!("Balance cache invalidated"),
                changed = account_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
        pending = false;

        let account = match account_rx.borrow_and_update().clone() {
            Some(account) => account,
            None => continue,
        };
        let generation = shared.generation.load(Ordering::SeqCst);

        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            changed = account_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                debug!("Account changed during read of {}, dropping it", account);
                pending = true;
            }
            snapshot = reader.read(&account) => {
                let mut snapshot = snapshot;
                snapshot.generation = generation;
                let published = shared.snapshot.send_if_modified(|slot| {
                    if shared.account.borrow().as_ref() != Some(&account) {
                        return false;
                    }
                    *slot = Some(Arc::new(snapshot));
                    true
                });
                if published {
                    SNAPSHOT_COUNTER.inc();
                    ticker.reset();
                }
            }
        }
    }

    debug!("Balance poller stopped");
}
