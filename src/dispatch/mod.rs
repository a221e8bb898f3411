//! Action Dispatcher
//!
//! Resolves an inbound action to a handler from the caller's app table and
//! runs it against that caller's session.
//!
//! ## Handler tables
//!
//! Each app declares its actions as a typed enum implementing
//! [`ActionKind`]. The table for an app is the default table overlaid with
//! the app's own entries (app entries win on name collision). Tables are
//! built on first use and cached for the process lifetime.
//!
//! ## Failure policy
//!
//! Nothing escapes [`Dispatcher::dispatch`] as an error: a missing action,
//! an unknown action, a handler error and a handler panic all become a
//! `warn` command for the same client. A successful dispatch never returns
//! an empty array.

pub mod normalize;

pub use normalize::{normalize, normalize_message, CallMethod, NormalizedInput};

use std::collections::{BTreeMap, HashMap};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use sdui_types::{Command, InstanceAddress, DEFAULT_NAME};
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use crate::error::ActionError;
use crate::graph::GraphStore;
use crate::panels::PanelBuilders;
use crate::session::{AppState, Session, SessionRegistry};

/// Capability of answering one action.
///
/// Handlers are synchronous: they run while the caller's session is locked
/// and must leave it consistent when they return.
pub trait ActionHandler: Send + Sync {
    fn handle(&self, ctx: &mut ActionContext<'_>) -> Result<Vec<Command>, ActionError>;
}

/// A closed set of actions handled by one app.
pub trait ActionKind: ActionHandler + Copy + 'static {
    const ALL: &'static [Self];

    /// Wire name of the action.
    fn name(self) -> &'static str;
}

/// Action name → handler.
#[derive(Clone, Default)]
pub struct HandlerTable {
    handlers: BTreeMap<&'static str, Arc<dyn ActionHandler>>,
}

impl HandlerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_kinds<K: ActionKind>() -> Self {
        let mut table = Self::new();
        for kind in K::ALL {
            table.insert(kind.name(), *kind);
        }
        table
    }

    pub fn insert<H: ActionHandler + 'static>(&mut self, name: &'static str, handler: H) {
        self.handlers.insert(name, Arc::new(handler));
    }

    pub fn get(&self, action: &str) -> Option<Arc<dyn ActionHandler>> {
        self.handlers.get(action).cloned()
    }

    /// This table with `other`'s entries layered on top.
    pub fn overlay(&self, other: &HandlerTable) -> HandlerTable {
        let mut merged = self.clone();
        for (name, handler) in &other.handlers {
            merged.handlers.insert(*name, Arc::clone(handler));
        }
        merged
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

/// A named bundle of handlers overriding or extending the default table.
pub trait App: Send + Sync {
    fn name(&self) -> &'static str;

    fn handlers(&self) -> HandlerTable;
}

/// Known apps plus the lazily merged, cached table for each app name.
pub struct AppCatalog {
    default: HandlerTable,
    apps: HashMap<&'static str, Box<dyn App>>,
    cache: RwLock<HashMap<String, Arc<HandlerTable>>>,
}

impl AppCatalog {
    pub fn new(default: HandlerTable) -> Self {
        Self {
            default,
            apps: HashMap::new(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn register<A: App + 'static>(&mut self, app: A) {
        self.apps.insert(app.name(), Box::new(app));
    }

    pub fn app_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.apps.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Merged table for `app`. Unknown apps get the default table.
    pub async fn table(&self, app: &str) -> Arc<HandlerTable> {
        {
            let cache = self.cache.read().await;
            if let Some(table) = cache.get(app) {
                return Arc::clone(table);
            }
        }

        let mut cache = self.cache.write().await;
        let table = cache.entry(app.to_string()).or_insert_with(|| {
            let merged = match self.apps.get(app) {
                Some(registered) => self.default.overlay(&registered.handlers()),
                None => {
                    if app != DEFAULT_NAME {
                        debug!("Unknown app '{}', using default handlers", app);
                    }
                    self.default.clone()
                }
            };
            debug!("Loaded handler table for app '{}': {:?}", app, merged.names());
            Arc::new(merged)
        });
        Arc::clone(table)
    }
}

/// Process-wide read-only collaborators handed to every handler.
pub struct Services {
    pub graph: GraphStore,
    pub builders: PanelBuilders,
}

impl Services {
    pub fn new(graph: GraphStore) -> Self {
        Self {
            graph,
            builders: PanelBuilders::standard(),
        }
    }
}

/// Everything a handler may look at or change.
pub struct ActionContext<'a> {
    pub input: &'a NormalizedInput,
    pub address: &'a InstanceAddress,
    pub services: &'a Services,
    session: &'a mut Session,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        input: &'a NormalizedInput,
        address: &'a InstanceAddress,
        services: &'a Services,
        session: &'a mut Session,
    ) -> Self {
        Self {
            input,
            address,
            services,
            session,
        }
    }

    pub fn instance(&self) -> &str {
        &self.address.instance
    }

    pub fn app(&self) -> &str {
        &self.address.app
    }

    /// The caller's own app state.
    pub fn app_state(&mut self) -> &mut AppState {
        self.session.app_state(&self.address.app)
    }

    pub fn graph(&self) -> &GraphStore {
        &self.services.graph
    }

    pub fn builders(&self) -> &PanelBuilders {
        &self.services.builders
    }
}

/// Entry point shared by every transport.
pub struct Dispatcher {
    sessions: SessionRegistry,
    catalog: AppCatalog,
    services: Services,
}

impl Dispatcher {
    pub fn new(services: Services, catalog: AppCatalog) -> Self {
        Self {
            sessions: SessionRegistry::new(),
            catalog,
            services,
        }
    }

    /// Dispatcher over `graph` with the built-in apps.
    pub fn standard(graph: GraphStore) -> Self {
        Self::new(Services::new(graph), crate::apps::catalog())
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn catalog(&self) -> &AppCatalog {
        &self.catalog
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Run one action for `address` and return its command array.
    pub async fn dispatch(&self, address: &InstanceAddress, input: NormalizedInput) -> Vec<Command> {
        let session = self.sessions.resolve(address).await;

        let mut commands = match input.action() {
            None => {
                warn!("Missing action from {} ({})", address, input.method());
                vec![ActionError::MissingAction.into_command()]
            }
            Some(action) => {
                debug!(
                    "Action '{}' for instance '{}' app '{}' via {}",
                    action,
                    address.instance,
                    address.app,
                    input.method()
                );
                let table = self.catalog.table(&address.app).await;
                match table.get(action) {
                    Some(handler) => {
                        let mut session = session.lock().await;
                        self.run(action, handler.as_ref(), address, &input, &mut session)
                    }
                    None => {
                        let error = ActionError::UnknownAction {
                            action: action.to_string(),
                            app: address.app.clone(),
                        };
                        warn!("{}", error);
                        vec![error.into_command()]
                    }
                }
            }
        };

        if commands.is_empty() {
            commands.push(Command::show_status(&address.instance));
        }
        if input.is_debug() {
            commands.push(Command::Debug {
                data: input.to_value(),
            });
        }
        commands
    }

    /// WebSocket path: parse one text frame, then dispatch it.
    pub async fn dispatch_message(&self, address: &InstanceAddress, text: &str) -> Vec<Command> {
        match normalize_message(text) {
            Ok(input) => self.dispatch(address, input).await,
            Err(e) => {
                warn!("Rejected message from {}: {}", address, e);
                vec![e.into_command()]
            }
        }
    }

    fn run(
        &self,
        action: &str,
        handler: &dyn ActionHandler,
        address: &InstanceAddress,
        input: &NormalizedInput,
        session: &mut Session,
    ) -> Vec<Command> {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let mut ctx = ActionContext::new(input, address, &self.services, session);
            handler.handle(&mut ctx)
        }));

        match outcome {
            Ok(Ok(commands)) => commands,
            Ok(Err(e)) => {
                warn!("Action '{}' for {} failed: {}", action, address, e);
                vec![e.into_command()]
            }
            Err(_) => {
                error!("Action '{}' for {} panicked", action, address);
                vec![ActionError::HandlerPanicked {
                    action: action.to_string(),
                }
                .into_command()]
            }
        }
    }
}
