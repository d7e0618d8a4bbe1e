//! Sync lifecycle shared by both stores
//!
//! ```text
//! Uninitialized ──load_local──▶ LocalLoaded ──reconcile──▶ RemoteReconciled
//!
//! commit: memory ─▶ mirror ─▶ spawn push        Idle ⇄ Syncing
//! ```
//!
//! Pushes are detached tasks. They are not queued, coalesced or cancelled, so
//! a slow earlier push can land after a later one and overwrite it remotely.
//!
//! Pushes run on the caller's Tokio runtime, else on the runtime the document
//! was created or mounted on. With neither available the push is skipped and
//! only the local mirror is written.

use crate::mirror::LocalMirror;
use crate::remote::RemoteDocuments;
use copydeck_core::Document;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Load phase of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    /// Nothing loaded yet
    #[default]
    Uninitialized,
    /// Local mirror read (possibly absent)
    LocalLoaded,
    /// Remote copy adopted at least once
    RemoteReconciled,
}

/// Push activity of a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncActivity {
    /// No push in flight
    Idle,
    /// At least one push in flight
    Syncing,
}

/// Handle on a detached push
///
/// Dropping it does not cancel the push.
#[derive(Debug)]
pub struct PushHandle {
    task: Option<JoinHandle<()>>,
}

impl PushHandle {
    /// Wait until the push has finished (successfully or not)
    ///
    /// Returns immediately if no push was started.
    pub async fn finished(self) {
        let Some(task) = self.task else { return };
        if let Err(e) = task.await {
            tracing::warn!("push task aborted: {}", e);
        }
    }

    /// Whether a push task was started
    #[inline]
    #[must_use]
    pub fn is_started(&self) -> bool {
        self.task.is_some()
    }
}

/// Value produced by a mutation, plus the push it started
#[derive(Debug)]
pub struct Committed<T> {
    /// Mutation result
    pub value: T,
    /// Remote push started by the mutation
    pub push: PushHandle,
}

struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// A document with a local mirror and a remote copy
#[derive(Debug)]
pub struct SyncedDocument<D: Document> {
    state: RwLock<D>,
    phase: RwLock<SyncPhase>,
    in_flight: Arc<AtomicUsize>,
    runtime: RwLock<Option<Handle>>,
    mirror: Arc<dyn LocalMirror>,
    remote: Arc<dyn RemoteDocuments>,
}

impl<D: Document> SyncedDocument<D> {
    /// Create document in `Uninitialized`, holding the default snapshot
    #[must_use]
    pub fn new(mirror: Arc<dyn LocalMirror>, remote: Arc<dyn RemoteDocuments>) -> Self {
        Self {
            state: RwLock::new(D::default()),
            phase: RwLock::new(SyncPhase::Uninitialized),
            in_flight: Arc::new(AtomicUsize::new(0)),
            runtime: RwLock::new(Handle::try_current().ok()),
            mirror,
            remote,
        }
    }

    /// Current load phase
    #[inline]
    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        *self.phase.read()
    }

    /// Current push activity
    #[must_use]
    pub fn activity(&self) -> SyncActivity {
        if self.in_flight.load(Ordering::SeqCst) > 0 {
            SyncActivity::Syncing
        } else {
            SyncActivity::Idle
        }
    }

    /// Clone of the in-memory snapshot
    #[must_use]
    pub fn snapshot(&self) -> D {
        self.state.read().clone()
    }

    /// Read the in-memory snapshot without cloning it
    pub fn read<R>(&self, f: impl FnOnce(&D) -> R) -> R {
        f(&*self.state.read())
    }

    /// Adopt the local mirror, if present and readable
    pub fn load_local(&self) {
        let key = D::KIND.mirror_key();
        match self.mirror.read(key) {
            Ok(Some(raw)) => match serde_json::from_str::<D>(&raw) {
                Ok(document) => *self.state.write() = document,
                Err(e) => tracing::warn!("ignoring corrupt local {}: {}", D::KIND, e),
            },
            Ok(None) => tracing::debug!("no local {} mirror", D::KIND),
            Err(e) => tracing::warn!("failed to read local {}: {}", D::KIND, e),
        }

        let mut phase = self.phase.write();
        if *phase == SyncPhase::Uninitialized {
            *phase = SyncPhase::LocalLoaded;
        }
    }

    /// Fetch the remote copy and adopt it if it is a non-empty document
    ///
    /// Returns whether the remote copy replaced local state. Failures leave
    /// local state untouched.
    pub async fn reconcile(&self) -> bool {
        let payload = match self.remote.fetch(D::KIND).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("failed to fetch remote {}: {}", D::KIND, e);
                return false;
            }
        };

        let document = match serde_json::from_value::<D>(payload) {
            Ok(document) => document,
            Err(e) => {
                tracing::warn!("ignoring malformed remote {}: {}", D::KIND, e);
                return false;
            }
        };

        if document.is_empty() {
            tracing::debug!("remote {} is empty; keeping local state", D::KIND);
            return false;
        }

        {
            let mut state = self.state.write();
            *state = document;
            self.write_mirror(&state);
        }
        *self.phase.write() = SyncPhase::RemoteReconciled;
        tracing::info!("reconciled {} from remote", D::KIND);
        true
    }

    /// Load the local mirror, then reconcile with the remote
    pub async fn mount(&self) {
        *self.runtime.write() = Some(Handle::current());
        self.load_local();
        self.reconcile().await;
    }

    /// Apply a mutation; if it reports a change, mirror and push the result
    ///
    /// `f` returns `None` to signal that nothing changed, in which case no
    /// mirror write or push happens.
    pub fn commit<R>(&self, f: impl FnOnce(&mut D) -> Option<R>) -> Option<Committed<R>> {
        let (value, snapshot) = {
            let mut state = self.state.write();
            let value = f(&mut *state)?;
            self.write_mirror(&state);
            (value, state.clone())
        };
        Some(Committed {
            value,
            push: self.spawn_push(snapshot),
        })
    }

    /// Apply a mutation, then mirror and push unconditionally
    pub fn commit_always<R>(&self, f: impl FnOnce(&mut D) -> R) -> Committed<R> {
        let (value, snapshot) = {
            let mut state = self.state.write();
            let value = f(&mut *state);
            self.write_mirror(&state);
            (value, state.clone())
        };
        Committed {
            value,
            push: self.spawn_push(snapshot),
        }
    }

    fn write_mirror(&self, document: &D) {
        let key = D::KIND.mirror_key();
        let result = serde_json::to_string(document)
            .map_err(crate::error::MirrorError::Serialize)
            .and_then(|raw| self.mirror.write(key, &raw));
        if let Err(e) = result {
            tracing::warn!("failed to write local {}: {}", D::KIND, e);
        }
    }

    fn push_runtime(&self) -> Option<Handle> {
        Handle::try_current()
            .ok()
            .or_else(|| self.runtime.read().clone())
    }

    fn spawn_push(&self, snapshot: D) -> PushHandle {
        let Some(runtime) = self.push_runtime() else {
            tracing::warn!("no async runtime available; {} kept local only", D::KIND);
            return PushHandle { task: None };
        };
        let remote = Arc::clone(&self.remote);
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let guard = InFlightGuard(Arc::clone(&self.in_flight));

        let task = runtime.spawn(async move {
            let _guard = guard;
            let payload = match serde_json::to_value(&snapshot) {
                Ok(payload) => payload,
                Err(e) => {
                    tracing::warn!("failed to encode {} for push: {}", D::KIND, e);
                    return;
                }
            };
            match remote.push(D::KIND, payload).await {
                Ok(()) => tracing::debug!("pushed {} to remote", D::KIND),
                Err(e) => tracing::warn!("failed to sync {} to remote: {}", D::KIND, e),
            }
        });
        PushHandle { task: Some(task) }
    }
}
