//! Session / instance registry
//!
//! Maps an opaque instance id to a [`Session`], and inside it an app name to
//! an [`AppState`]. Both levels are created lazily on first contact and live
//! for the rest of the process.
//!
//! ## Locking
//!
//! The registry map is behind an `RwLock`; each session behind its own
//! `Mutex`. The dispatcher holds a session's mutex for the whole (synchronous)
//! handler run, so actions for one instance never interleave mid-update while
//! different instances proceed independently.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use sdui_types::InstanceAddress;
use serde_json::{Map, Value};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Shared handle to one session.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Thread-safe in-memory registry of sessions keyed by instance id.
///
/// Entries are never evicted.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, SessionHandle>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: the same instance id always yields the same handle.
    pub async fn get_or_create(&self, instance: &str) -> SessionHandle {
        // Fast path
        {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(instance) {
                return Arc::clone(session);
            }
        }

        let mut sessions = self.sessions.write().await;
        let session = sessions.entry(instance.to_string()).or_insert_with(|| {
            debug!("Creating session for instance '{}'", instance);
            Arc::new(Mutex::new(Session::new(instance)))
        });
        Arc::clone(session)
    }

    /// Resolve both levels of an address, creating whatever is missing.
    pub async fn resolve(&self, address: &InstanceAddress) -> SessionHandle {
        let handle = self.get_or_create(&address.instance).await;
        handle.lock().await.app_state(&address.app);
        handle
    }

    pub async fn get(&self, instance: &str) -> Option<SessionHandle> {
        self.sessions.read().await.get(instance).cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// All app states of one instance.
#[derive(Debug)]
pub struct Session {
    instance: String,
    apps: HashMap<String, AppState>,
}

impl Session {
    pub fn new(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            apps: HashMap::new(),
        }
    }

    pub fn instance(&self) -> &str {
        &self.instance
    }

    /// The state for `app`, seeded empty on first use.
    pub fn app_state(&mut self, app: &str) -> &mut AppState {
        self.apps
            .entry(app.to_string())
            .or_insert_with(|| AppState::new(app))
    }

    pub fn get_app_state(&self, app: &str) -> Option<&AppState> {
        self.apps.get(app)
    }

    pub fn app_names(&self) -> impl Iterator<Item = &str> {
        self.apps.keys().map(String::as_str)
    }
}

/// Which panel the default app currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActivePanel {
    /// Never selected; renders the graph root.
    #[default]
    Unset,
    Panel(String),
    /// Last selection did not resolve; renders as cleared.
    NotFound,
}

impl ActivePanel {
    /// Wire/diagnostic value of [`ActivePanel::NotFound`].
    pub const NOT_FOUND_SENTINEL: i64 = -1;

    pub fn to_value(&self) -> Value {
        match self {
            ActivePanel::Unset => Value::Null,
            ActivePanel::Panel(id) => Value::String(id.clone()),
            ActivePanel::NotFound => Value::from(Self::NOT_FOUND_SENTINEL),
        }
    }
}

/// Mutable state scoped to one (instance, app) pair.
///
/// `state` is a free-form JSON bag; `extensions` holds typed values that do
/// not serialize (e.g. a running game clock). Only the app's own handlers
/// touch either.
pub struct AppState {
    app: String,
    pub state: Map<String, Value>,
    active_panel: ActivePanel,
    extensions: HashMap<TypeId, Box<dyn Any + Send>>,
}

impl AppState {
    pub fn new(app: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            state: Map::new(),
            active_panel: ActivePanel::Unset,
            extensions: HashMap::new(),
        }
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    pub fn active_panel(&self) -> &ActivePanel {
        &self.active_panel
    }

    pub fn set_active_panel(&mut self, active: ActivePanel) {
        self.active_panel = active;
    }

    pub fn insert_extension<T: Any + Send>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    pub fn extension<T: Any + Send>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|b| b.downcast_ref::<T>())
    }

    pub fn extension_mut<T: Any + Send>(&mut self) -> Option<&mut T> {
        self.extensions
            .get_mut(&TypeId::of::<T>())
            .and_then(|b| b.downcast_mut::<T>())
    }

    pub fn remove_extension<T: Any + Send>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|b| b.downcast::<T>().ok())
            .map(|b| *b)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("app", &self.app)
            .field("state", &self.state)
            .field("active_panel", &self.active_panel)
            .field("extensions", &self.extensions.len())
            .finish()
    }
}
