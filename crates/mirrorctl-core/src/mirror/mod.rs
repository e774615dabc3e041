// ── Mirror facade ──
//
// Owns the API client, the app-state store, and the per-item loading
// flags. Views talk to the mirror exclusively through this type and
// observe state through `watch` channels.

mod modules;
mod remote;
mod system;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicI64;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashSet;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use mirrorctl_api::MirrorClient;

use crate::blacklist::Blacklist;
use crate::config::MirrorConfig;
use crate::error::CoreError;
use crate::model::AppState;
use crate::store::{AppStateStore, FileStorage, MemoryStorage, StatePersistence};
use crate::system::SystemAction;

pub use modules::SuppressReport;

/// Brightness assumed until the mirror confirms a value.
pub const DEFAULT_BRIGHTNESS: i64 = 50;

/// Actions tried, in order, when suppressing a module.
pub const SUPPRESS_ACTIONS: &[&str] = &["disable", "stop", "turnOff", "deactivate"];

// ── Observable state ─────────────────────────────────────────────

/// Outcome of the most recent module fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshStatus {
    pub last_refresh: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub module_count: usize,
}

/// A request that is currently in flight. At most one per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PendingOp {
    /// Mirror visibility toggle for a module id.
    Module(String),
    System(SystemAction),
    Brightness,
}

impl fmt::Display for PendingOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module(id) => write!(f, "visibility change for {id}"),
            Self::System(action) => write!(f, "{}", action.title()),
            Self::Brightness => f.write_str("brightness change"),
        }
    }
}

// ── Mirror ───────────────────────────────────────────────────────

/// The main entry point for consumers.
///
/// Cheaply cloneable via `Arc<MirrorInner>`. Every clone shares the
/// same store, loading flags, and background tasks.
#[derive(Clone)]
pub struct Mirror {
    inner: Arc<MirrorInner>,
}

struct MirrorInner {
    config: MirrorConfig,
    client: MirrorClient,
    blacklist: Blacklist,
    store: Mutex<AppStateStore>,
    apps: watch::Sender<Arc<Vec<AppState>>>,
    status: watch::Sender<RefreshStatus>,
    pending: DashSet<PendingOp>,
    pending_tx: watch::Sender<Arc<Vec<PendingOp>>>,
    brightness: AtomicI64,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Mirror {
    /// Create a mirror handle from configuration.
    ///
    /// State is persisted under `config.state_dir`, or kept in memory
    /// when no directory is configured. Does no I/O against the mirror.
    pub fn new(config: MirrorConfig) -> Result<Self, CoreError> {
        let persistence: Box<dyn StatePersistence> = match config.state_dir {
            Some(ref dir) => Box::new(FileStorage::new(dir)),
            None => Box::new(MemoryStorage::new()),
        };
        Self::with_persistence(config, persistence)
    }

    /// Create a mirror handle with an explicit persistence adapter.
    pub fn with_persistence(
        config: MirrorConfig,
        persistence: Box<dyn StatePersistence>,
    ) -> Result<Self, CoreError> {
        let client = MirrorClient::new(config.url.clone(), &config.transport())?;
        Ok(Self::with_client(config, client, persistence))
    }

    /// Create a mirror handle around a pre-built client.
    pub fn with_client(
        config: MirrorConfig,
        client: MirrorClient,
        persistence: Box<dyn StatePersistence>,
    ) -> Self {
        let store = AppStateStore::load(persistence);
        let (apps, _) = watch::channel(Arc::new(store.all()));
        let (status, _) = watch::channel(RefreshStatus {
            module_count: store.len(),
            ..RefreshStatus::default()
        });
        let (pending_tx, _) = watch::channel(Arc::new(Vec::new()));
        let blacklist = Blacklist::new(config.extra_blacklist.clone());

        Self {
            inner: Arc::new(MirrorInner {
                config,
                client,
                blacklist,
                store: Mutex::new(store),
                apps,
                status,
                pending: DashSet::new(),
                pending_tx,
                brightness: AtomicI64::new(DEFAULT_BRIGHTNESS),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Access the mirror configuration.
    pub fn config(&self) -> &MirrorConfig {
        &self.inner.config
    }

    /// Access the raw API client.
    pub fn client(&self) -> &MirrorClient {
        &self.inner.client
    }

    pub(crate) fn cancel_token(&self) -> &CancellationToken {
        &self.inner.cancel
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Spawn background tasks: the module poller and any configured
    /// start-up suppressions.
    pub async fn start(&self) {
        let mut handles = self.inner.task_handles.lock().await;

        if let Some(handle) = self.spawn_poller(self.inner.config.poll_interval) {
            handles.push(handle);
        }

        for name in self.inner.config.suppress_on_start.clone() {
            let mirror = self.clone();
            let cancel = self.inner.cancel.child_token();
            handles.push(tokio::spawn(async move {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => {
                        debug!(module = %name, "start-up suppression cancelled");
                    }
                    report = mirror.suppress_module(&name) => {
                        debug!(?report, "start-up suppression finished");
                    }
                }
            }));
        }

        info!(url = %self.inner.config.url, "mirror session started");
    }

    /// Cancel background tasks, including requests still in flight, and
    /// wait for them to finish.
    pub async fn shutdown(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }
        debug!("mirror session stopped");
    }

    /// Spawn a task that re-runs `refresh_modules` every `interval`.
    ///
    /// The first fetch happens one interval from now. Polls never
    /// overlap each other. Returns `None` for a zero interval.
    pub fn spawn_poller(&self, interval: Duration) -> Option<JoinHandle<()>> {
        if interval.is_zero() {
            return None;
        }
        let mirror = self.clone();
        let cancel = self.inner.cancel.child_token();
        Some(tokio::spawn(poll_task(mirror, interval, cancel)))
    }

    // ── State observation ────────────────────────────────────────

    /// Current app-state snapshot, in fetch order.
    pub fn apps_snapshot(&self) -> Arc<Vec<AppState>> {
        Arc::clone(&self.inner.apps.borrow())
    }

    /// Subscribe to app-state snapshots.
    pub fn subscribe_apps(&self) -> watch::Receiver<Arc<Vec<AppState>>> {
        self.inner.apps.subscribe()
    }

    pub fn refresh_status(&self) -> RefreshStatus {
        self.inner.status.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<RefreshStatus> {
        self.inner.status.subscribe()
    }

    /// Requests currently in flight.
    pub fn pending_snapshot(&self) -> Arc<Vec<PendingOp>> {
        Arc::clone(&self.inner.pending_tx.borrow())
    }

    pub fn subscribe_pending(&self) -> watch::Receiver<Arc<Vec<PendingOp>>> {
        self.inner.pending_tx.subscribe()
    }

    pub fn is_pending(&self, op: &PendingOp) -> bool {
        self.inner.pending.contains(op)
    }

    // ── Internal helpers ─────────────────────────────────────────

    /// Mark `op` as in flight until the guard drops.
    fn claim(&self, op: PendingOp) -> Result<PendingGuard<'_>, CoreError> {
        if !self.inner.pending.insert(op.clone()) {
            return Err(CoreError::Busy {
                operation: op.to_string(),
            });
        }
        self.inner.publish_pending();
        Ok(PendingGuard {
            inner: &self.inner,
            op,
        })
    }

    async fn publish_apps(&self) {
        let snapshot = self.inner.store.lock().await.all();
        self.inner.apps.send_replace(Arc::new(snapshot));
    }
}

impl fmt::Debug for Mirror {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mirror")
            .field("url", &self.inner.config.url.as_str())
            .finish_non_exhaustive()
    }
}

impl MirrorInner {
    fn publish_pending(&self) {
        let mut ops: Vec<PendingOp> = self.pending.iter().map(|op| op.key().clone()).collect();
        ops.sort();
        self.pending_tx.send_replace(Arc::new(ops));
    }
}

/// Clears a loading flag on drop, whatever the outcome of the request.
struct PendingGuard<'a> {
    inner: &'a MirrorInner,
    op: PendingOp,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.inner.pending.remove(&self.op);
        self.inner.publish_pending();
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Periodically re-fetch active modules.
async fn poll_task(mirror: Mirror, period: Duration, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    result = mirror.refresh_modules() => {
                        if let Err(e) = result {
                            warn!(error = %e, "periodic refresh failed");
                        }
                    }
                }
            }
        }
    }
}
