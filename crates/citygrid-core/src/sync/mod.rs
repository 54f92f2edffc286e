// ── Remote sync controller ──
//
// Polls the backend's three collections on a fixed interval and applies
// them as one snapshot, all or nothing. Simulations post a reading and
// patch the snapshot in place without waiting for the next poll.

mod draft;
mod snapshot;

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use citygrid_api::{ApiClient, SimulateRequest, SimulateResponse};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::SyncConfig;
use crate::error::{CONNECTION_ERROR_MESSAGE, CoreError};
use crate::model::RuleSet;
use crate::stream::Subscription;

pub use draft::{
    AIR_QUALITY_RANGE, SIMULATED_KINDS, SimulationDraft, TEMPERATURE_RANGE, TRAFFIC_RANGE,
};
pub use snapshot::LiveSnapshot;

/// Backend reachability, observable by views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    /// The last cycle failed; the previous snapshot is still served.
    Failed(String),
}

impl ConnectionState {
    /// Banner text to show, if any.
    pub fn banner(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Polling client for the assignment backend.
///
/// Cheaply cloneable. [`start()`](Self::start) fetches once and spawns the
/// poll loop; [`shutdown()`](Self::shutdown) cancels it along with any
/// request still in flight.
#[derive(Clone)]
pub struct RemoteSync {
    inner: Arc<SyncInner>,
}

struct SyncInner {
    config: SyncConfig,
    client: ApiClient,
    /// The single snapshot slot. Replaced whole, never edited.
    snapshot: ArcSwap<LiveSnapshot>,
    updates: watch::Sender<Arc<LiveSnapshot>>,
    connection_state: watch::Sender<ConnectionState>,
    cancel: CancellationToken,
    /// Child token for the current session; replaced on restart.
    cancel_child: Mutex<CancellationToken>,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl RemoteSync {
    pub fn new(config: SyncConfig) -> Result<Self, CoreError> {
        let client = ApiClient::new(config.url.clone(), &config.transport())?;
        Ok(Self::with_client(config, client))
    }

    /// Use a prebuilt client (tests, shared connection pools).
    pub fn with_client(config: SyncConfig, client: ApiClient) -> Self {
        let initial = Arc::new(LiveSnapshot::default());
        let (updates, _) = watch::channel(Arc::clone(&initial));
        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        let cancel = CancellationToken::new();
        let cancel_child = cancel.child_token();

        Self {
            inner: Arc::new(SyncInner {
                config,
                client,
                snapshot: ArcSwap::new(initial),
                updates,
                connection_state,
                cancel,
                cancel_child: Mutex::new(cancel_child),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.inner.config
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Fetch once, then poll every `poll_interval_secs` until shutdown.
    ///
    /// The poll loop is spawned even when the first fetch fails, so the
    /// view recovers on its own once the backend comes up. The first
    /// fetch's error is still returned.
    pub async fn start(&self) -> Result<(), CoreError> {
        self.inner
            .connection_state
            .send_replace(ConnectionState::Connecting);

        let child = self.inner.cancel.child_token();
        *self.inner.cancel_child.lock().await = child.clone();

        let first = self.refresh().await;

        let interval_secs = self.inner.config.poll_interval_secs;
        if interval_secs > 0 {
            let handle = tokio::spawn(poll_task(self.clone(), interval_secs, child));
            self.inner.task_handles.lock().await.push(handle);
        }

        first
    }

    /// Cancel polling and any in-flight request, then wait for the loop to
    /// exit. Late responses are dropped, never applied.
    pub async fn shutdown(&self) {
        self.inner.cancel_child.lock().await.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        self.inner
            .connection_state
            .send_replace(ConnectionState::Disconnected);
        debug!("remote sync stopped");
    }

    /// Fetch once, run `f`, shut down. No background polling.
    pub async fn oneshot<F, Fut, T>(config: SyncConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(RemoteSync) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let sync = RemoteSync::new(config.with_poll_interval(0))?;
        sync.start().await?;
        let result = f(sync.clone()).await;
        sync.shutdown().await;
        result
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Run one poll cycle.
    ///
    /// The three requests run concurrently. Only when all three succeed is
    /// the snapshot replaced; otherwise the last good snapshot stays and
    /// the state turns [`Failed`](ConnectionState::Failed).
    pub async fn refresh(&self) -> Result<(), CoreError> {
        let cancel = self.inner.cancel_child.lock().await.clone();
        let client = &self.inner.client;

        let fetched = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(CoreError::NotConnected),
            result = async {
                tokio::try_join!(
                    client.list_devices(),
                    client.list_vlan_assignments(),
                    client.get_rules(),
                )
            } => result,
        };

        match fetched {
            Ok((devices, vlans, rules)) => {
                let next = LiveSnapshot::from_fetch(&devices, &vlans, &rules);
                info!(
                    devices = next.device_count(),
                    rules = next.rules().rule_count(),
                    "applied backend snapshot"
                );
                self.publish(Arc::new(next));
                self.inner
                    .connection_state
                    .send_replace(ConnectionState::Connected);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "poll cycle failed, keeping last snapshot");
                self.inner
                    .connection_state
                    .send_replace(ConnectionState::Failed(CONNECTION_ERROR_MESSAGE.to_owned()));
                Err(e.into())
            }
        }
    }

    /// Post a simulated reading and merge the returned device (and its VLAN
    /// assignment, when present) into the current snapshot.
    ///
    /// A poll already in flight may still overwrite the patch when it
    /// lands; the next poll includes the device anyway.
    pub async fn simulate(&self, request: &SimulateRequest) -> Result<SimulateResponse, CoreError> {
        let cancel = self.inner.cancel_child.lock().await.clone();

        let result = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(CoreError::NotConnected),
            result = self.inner.client.simulate(request) => result,
        };

        let response = result.map_err(|e| {
            error!(error = %e, name = %request.name, "simulation failed");
            let err = CoreError::from(e);
            if err.is_connection() {
                err
            } else {
                CoreError::Simulation {
                    message: err.to_string(),
                }
            }
        })?;

        self.inner
            .snapshot
            .rcu(|current| Arc::new(current.with_simulation(&response)));
        self.notify();
        debug!(device = response.device_id(), vlan = ?response.vlan.as_ref().map(|v| v.vlan_id), "simulation merged");
        Ok(response)
    }

    /// Validate and save the rule table. The backend's echo replaces the
    /// local rules immediately.
    pub async fn update_rules(&self, rules: &RuleSet) -> Result<RuleSet, CoreError> {
        rules.validate()?;
        let cancel = self.inner.cancel_child.lock().await.clone();
        let wire = rules.to_rule_map();

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(CoreError::NotConnected),
            result = self.inner.client.update_rules(&wire) => result?,
        };

        let saved = RuleSet::from_rule_map(&response.rules);
        self.inner
            .snapshot
            .rcu(|current| Arc::new(current.with_rules(saved.clone())));
        self.notify();
        info!(rules = saved.rule_count(), status = %response.status, "rules saved");
        Ok(saved)
    }

    // ── State observation ────────────────────────────────────────────

    pub fn snapshot(&self) -> Arc<LiveSnapshot> {
        self.inner.snapshot.load_full()
    }

    pub fn subscribe(&self) -> Subscription<Arc<LiveSnapshot>> {
        Subscription::new(self.inner.updates.subscribe())
    }

    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    // ── Private helpers ──────────────────────────────────────────────

    fn publish(&self, next: Arc<LiveSnapshot>) {
        self.inner.snapshot.store(next);
        self.notify();
    }

    fn notify(&self) {
        self.inner
            .updates
            .send_replace(self.inner.snapshot.load_full());
    }
}

async fn poll_task(sync: RemoteSync, interval_secs: u64, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = sync.refresh().await {
                    debug!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}
